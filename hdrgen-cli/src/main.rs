use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use hdrgen_codegen::HeaderGenerator;
use hdrgen_spec::parser::CONFIG_FILE_NAME;
use hdrgen_spec::types::class::DeclKind;
use hdrgen_spec::types::common::Severity;
use hdrgen_spec::types::config::HdrgenConfig;
use hdrgen_spec::ErrorEntry;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser)]
#[command(name = "hdrgen", about = "hdrgen – C++ class header generator")]
#[command(version, propagate_version = true)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Initialize a new hdrgen project
    Init {
        /// Project name
        name: String,
        /// Target directory (defaults to ./<name>)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Validate a project's class files
    Validate {
        /// Project directory (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// Check project and show summary info
    Check {
        /// Project directory (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// Generate headers from a project directory, a class file or a diagram
    Generate {
        /// Project directory, class file or *.puml diagram (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Output directory (defaults to the configured output dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Convert a PlantUML class diagram into class files
    Import {
        /// *.puml diagram
        path: PathBuf,
        /// Directory for the class files (defaults to the diagram's directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Overwrite class files that already exist
        #[arg(long)]
        force: bool,
    },
    /// Print the JSON Schema for class files or the project config
    Schema {
        #[arg(value_enum, default_value = "class")]
        kind: SchemaKind,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemaKind {
    Class,
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Command::Init { name, dir } => cmd_init(&name, dir.as_deref()),
        Command::Validate { path } => cmd_validate(&path),
        Command::Check { path } => cmd_check(&path),
        Command::Generate { path, output } => cmd_generate(&path, output.as_deref()),
        Command::Import { path, output, force } => cmd_import(&path, output.as_deref(), force),
        Command::Schema { kind } => cmd_schema(kind),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::from(1)
        }
    }
}

const SAMPLE_CLASS: &str = "\
name: Example
namespaces: [app]
description: Example class
constructors:
  - {}
destructor:
  noexcept: true
members:
  - name: name
    type: \"std::string\"
methods:
  - name: Name
    returns:
      name: \"std::string\"
      stereotypes: [const, lval_reference]
    qualifiers:
      const: true
      noexcept: true
";

fn cmd_init(name: &str, dir: Option<&Path>) -> Result<bool> {
    let project_dir = match dir {
        Some(d) => d.to_path_buf(),
        None => {
            validate_default_dir_name(name)?;
            PathBuf::from(name)
        }
    };

    if project_dir.exists() {
        anyhow::bail!("Directory '{}' already exists", project_dir.display());
    }

    std::fs::create_dir_all(&project_dir)
        .with_context(|| format!("Failed to create directory '{}'", project_dir.display()))?;

    let config = HdrgenConfig::standalone(name);
    std::fs::write(
        project_dir.join(CONFIG_FILE_NAME),
        serde_json::to_string_pretty(&config)?,
    )?;
    std::fs::write(project_dir.join("example.class.yaml"), SAMPLE_CLASS)?;

    println!(
        "{} Created project '{}' at {}",
        "✓".green().bold(),
        name.bold(),
        project_dir.display()
    );
    println!("  {} {}", "→".dimmed(), CONFIG_FILE_NAME);
    println!("  {} example.class.yaml", "→".dimmed());
    println!();
    println!("Next steps:");
    println!("  {} {}", "cd".dimmed(), project_dir.display());
    println!("  {} generate", "hdrgen".dimmed());

    Ok(true)
}

fn validate_default_dir_name(name: &str) -> Result<()> {
    if name.is_empty() {
        anyhow::bail!("Project name must not be empty");
    }
    if name.contains('/') || name.contains('\\') {
        anyhow::bail!("Project name must not contain path separators");
    }

    let mut components = Path::new(name).components();
    let Some(first) = components.next() else {
        anyhow::bail!("Project name must not be empty");
    };
    if components.next().is_some() {
        anyhow::bail!("Project name must be a single path component");
    }

    match first {
        std::path::Component::Normal(_) => Ok(()),
        _ => anyhow::bail!("Project name must be a normal directory name"),
    }
}

/// Load a project and run every validation rule over it.
fn load_and_validate(path: &Path) -> Result<(hdrgen_spec::LoadedProject, Vec<ErrorEntry>)> {
    let (project, load_report) = hdrgen_spec::load_project(path)
        .with_context(|| format!("Failed to load project at '{}'", path.display()))?;

    let validation_report = hdrgen_valid::validate_project(&project);
    let entries = load_report
        .errors
        .into_iter()
        .chain(validation_report.errors)
        .collect();
    Ok((project, entries))
}

fn count(entries: &[ErrorEntry], severity: Severity) -> usize {
    entries.iter().filter(|e| e.severity == severity).count()
}

fn print_entry(entry: &ErrorEntry) {
    let severity = match entry.severity {
        Severity::Error => "error".red().bold(),
        Severity::Warning => "warning".yellow().bold(),
        Severity::Info => "info".blue().bold(),
    };

    println!(
        "  {} [{}] {} ({}:{})",
        severity,
        entry.code.dimmed(),
        entry.message,
        entry.file.dimmed(),
        entry.path.dimmed(),
    );
    if let Some(suggestion) = &entry.suggestion {
        println!("    {} {}", "hint:".cyan(), suggestion);
    }
}

fn cmd_validate(path: &Path) -> Result<bool> {
    println!(
        "{} {}",
        "Validating".bold(),
        path.canonicalize()
            .unwrap_or_else(|_| path.to_path_buf())
            .display()
    );

    let (project, entries) = load_and_validate(path)?;
    for entry in &entries {
        print_entry(entry);
    }

    let error_count = count(&entries, Severity::Error);
    let warning_count = count(&entries, Severity::Warning);

    println!();
    if error_count == 0 && warning_count == 0 {
        println!(
            "{} Project is valid ({} class file(s))",
            "✓".green().bold(),
            project.classes.len(),
        );
        Ok(true)
    } else if error_count == 0 {
        println!("{} Valid with {} warning(s)", "⚠".yellow().bold(), warning_count);
        Ok(true)
    } else {
        println!(
            "{} {} error(s), {} warning(s)",
            "✗".red().bold(),
            error_count,
            warning_count,
        );
        Ok(false)
    }
}

fn cmd_check(path: &Path) -> Result<bool> {
    let (project, entries) = load_and_validate(path)?;
    let config = &project.config;

    println!("{}", "Project Info".bold().underline());
    println!("  Name:      {}", config.name);
    println!("  Version:   {}", config.version);
    println!("  Output:    {}", config.output.dir);
    println!(
        "  Files:     .{}{}",
        config.output.header_extension,
        if config.output.emit_sources {
            format!(" + .{}", config.output.source_extension)
        } else {
            String::new()
        }
    );

    println!();
    println!("{}", "Classes".bold().underline());
    for (file, class) in &project.classes {
        let detail = match class.kind {
            DeclKind::Enum => format!("{} value(s)", class.enum_values().len()),
            _ => format!(
                "{} member(s), {} method(s)",
                class.members.len(),
                class.methods.len()
            ),
        };
        println!(
            "  {} {} {} ({})",
            class.kind.as_str().dimmed(),
            class.qualified_name(),
            file.dimmed(),
            detail,
        );
    }

    println!();
    let error_count = count(&entries, Severity::Error);
    if error_count > 0 {
        println!("{} {} validation error(s) found", "✗".red().bold(), error_count);
        Ok(false)
    } else {
        println!("{} No validation errors", "✓".green().bold());
        Ok(true)
    }
}

fn cmd_generate(path: &Path, output: Option<&Path>) -> Result<bool> {
    println!(
        "{} {}",
        "Generating headers from".bold(),
        path.canonicalize()
            .unwrap_or_else(|_| path.to_path_buf())
            .display()
    );

    let (config, classes, default_output) = if path.is_file() {
        let found = hdrgen_spec::load_spec_file(path)
            .with_context(|| format!("Failed to load '{}'", path.display()))?;
        let file = path.to_string_lossy().into_owned();
        let stem = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.split('.').next())
            .unwrap_or("hdrgen")
            .to_string();
        let config = HdrgenConfig::standalone(stem);
        let out = path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(&config.output.dir);
        let classes = found.into_iter().map(|class| (file.clone(), class)).collect();
        (config, classes, out)
    } else {
        let (project, entries) = load_and_validate(path)?;
        let error_count = count(&entries, Severity::Error);
        if error_count > 0 {
            for entry in entries.iter().filter(|e| e.severity == Severity::Error) {
                print_entry(entry);
            }
            eprintln!(
                "{} {} validation error(s), fix them before generating",
                "✗".red().bold(),
                error_count
            );
            return Ok(false);
        }
        let out = project.root.join(&project.config.output.dir);
        (project.config, project.classes, out)
    };

    let generator = HeaderGenerator::new(&config);
    tracing::debug!(?generator, classes = classes.len(), "generating");
    let generated = generator
        .generate(&classes)
        .context("Generation failed")?;

    let output_dir = output.map(Path::to_path_buf).unwrap_or(default_output);
    generated
        .write_to_disk(&output_dir)
        .with_context(|| format!("Failed to write to '{}'", output_dir.display()))?;

    println!(
        "{} Generated {} file(s) → {}",
        "✓".green().bold(),
        generated.file_count(),
        output_dir.display()
    );
    for file_path in generated.files().keys() {
        println!("  {} {}", "→".dimmed(), file_path);
    }

    Ok(true)
}

fn cmd_import(path: &Path, output: Option<&Path>, force: bool) -> Result<bool> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    let import = hdrgen_spec::parse_uml(&content, &path.to_string_lossy())
        .with_context(|| format!("Failed to parse diagram '{}'", path.display()))?;

    for warning in &import.warnings {
        println!("  {} {}", "warning".yellow().bold(), warning);
    }

    let out_dir = match output {
        Some(dir) => dir.to_path_buf(),
        None => path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf(),
    };

    let mut written = Vec::new();
    for class in &import.classes {
        let mut rel: PathBuf = class.namespaces.iter().collect();
        rel.push(format!("{}.class.yaml", class.name));
        let target = out_dir.join(&rel);

        if target.exists() && !force {
            println!(
                "  {} {} exists, skipped (use --force to overwrite)",
                "⚠".yellow().bold(),
                rel.display()
            );
            continue;
        }
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create '{}'", parent.display()))?;
        }
        let yaml = serde_yaml::to_string(class)
            .with_context(|| format!("Failed to serialize class '{}'", class.name))?;
        std::fs::write(&target, yaml)
            .with_context(|| format!("Failed to write '{}'", target.display()))?;
        tracing::debug!(path = %target.display(), class = %class.name, "imported");
        written.push(rel);
    }

    println!(
        "{} Imported {} of {} declaration(s) → {}",
        "✓".green().bold(),
        written.len(),
        import.classes.len(),
        out_dir.display()
    );
    for rel in &written {
        println!("  {} {}", "→".dimmed(), rel.display());
    }

    Ok(true)
}

fn cmd_schema(kind: SchemaKind) -> Result<bool> {
    let schema = match kind {
        SchemaKind::Class => hdrgen_spec::schema_def::generate_class_schema(),
        SchemaKind::Config => hdrgen_spec::schema_def::generate_config_schema(),
    };
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(true)
}
