use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::parser::{self, SpecFileType, CONFIG_FILE_NAME};
use crate::schema_def;
use crate::types::class::ClassSpec;
use crate::types::config::HdrgenConfig;
use crate::types::error::{ErrorEntry, ValidationReport, E_PARSE_ERROR};
use crate::uml::{self, UmlError};

/// A loaded hdrgen project with all parsed class files
#[derive(Debug, Clone)]
pub struct LoadedProject {
    /// Project root directory
    pub root: PathBuf,
    pub config: HdrgenConfig,
    /// All parsed classes with their relative file paths, sorted by path
    pub classes: Vec<(String, ClassSpec)>,
}

/// Load and parse an entire project directory.
/// Accumulates per-file errors instead of failing on the first one.
#[allow(clippy::result_large_err)]
#[tracing::instrument(skip_all, fields(dir = %project_dir.display()))]
pub fn load_project(project_dir: &Path) -> Result<(LoadedProject, ValidationReport), LoadError> {
    let mut report = ValidationReport::success();

    if !project_dir.is_dir() {
        return Err(LoadError::ProjectNotFound(
            project_dir.to_string_lossy().into_owned(),
        ));
    }

    let config_path = project_dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Err(LoadError::ConfigNotFound(
            config_path.to_string_lossy().into_owned(),
        ));
    }

    let config_content = std::fs::read_to_string(&config_path)
        .map_err(|e| LoadError::IoError(config_path.to_string_lossy().into_owned(), e))?;

    let config = parser::parse_config(&config_content, CONFIG_FILE_NAME)
        .map_err(LoadError::ConfigParseError)?;

    let class_schema = schema_def::generate_class_schema();
    let mut classes = Vec::new();

    for entry in WalkDir::new(project_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let rel_path = path
            .strip_prefix(project_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned();

        // Generated output may sit inside the project
        let in_output_dir = !config.output.dir.is_empty()
            && Path::new(&rel_path).starts_with(&config.output.dir);
        if rel_path.starts_with('.') || in_output_dir {
            continue;
        }

        let file_type = match parser::detect_spec_type(path) {
            Some(t @ (SpecFileType::Class(_) | SpecFileType::Uml)) => t,
            _ => continue,
        };

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(file = %rel_path, error = %e, "skipping unreadable class file");
                report.push(ErrorEntry::error(
                    E_PARSE_ERROR,
                    format!("Failed to read file: {e}"),
                    &rel_path,
                    "$",
                ));
                continue;
            }
        };

        let parsed = match file_type {
            SpecFileType::Class(format) => {
                parse_checked(&content, &rel_path, format, &class_schema).map(|class| vec![class])
            }
            _ => parse_diagram(&content, &rel_path, &mut report),
        };

        match parsed {
            Ok(found) => {
                for class in found {
                    tracing::debug!(file = %rel_path, class = %class.name, "loaded class");
                    classes.push((rel_path.clone(), class));
                }
            }
            Err(entries) => {
                for e in entries {
                    report.push(e);
                }
            }
        }
    }

    let project = LoadedProject {
        root: project_dir.to_path_buf(),
        config,
        classes,
    };

    Ok((project, report))
}

/// Load a single class file outside of any project.
#[allow(clippy::result_large_err)]
#[tracing::instrument(skip_all, fields(file = %path.display()))]
pub fn load_class_file(path: &Path) -> Result<ClassSpec, LoadError> {
    let display = path.to_string_lossy().into_owned();
    let Some(SpecFileType::Class(format)) = parser::detect_spec_type(path) else {
        return Err(LoadError::UnknownFileType(display));
    };

    let content =
        std::fs::read_to_string(path).map_err(|e| LoadError::IoError(display.clone(), e))?;

    parse_checked(&content, &display, format, &schema_def::generate_class_schema())
        .map_err(|entries| LoadError::InvalidClassFile {
            file: display,
            entries,
        })
}

/// Load every class a spec file declares: one for class files, any
/// number for PlantUML diagrams. Diagram warnings are logged.
#[allow(clippy::result_large_err)]
#[tracing::instrument(skip_all, fields(file = %path.display()))]
pub fn load_spec_file(path: &Path) -> Result<Vec<ClassSpec>, LoadError> {
    let display = path.to_string_lossy().into_owned();
    match parser::detect_spec_type(path) {
        Some(SpecFileType::Uml) => {
            let content =
                std::fs::read_to_string(path).map_err(|e| LoadError::IoError(display.clone(), e))?;
            let import = uml::parse_uml(&content, &display).map_err(|source| LoadError::InvalidDiagram {
                file: display.clone(),
                source,
            })?;
            let file_name = &display;
            for warning in &import.warnings {
                tracing::warn!(file = %file_name, "{warning}");
            }
            Ok(import.classes)
        }
        _ => load_class_file(path).map(|class| vec![class]),
    }
}

fn parse_diagram(
    content: &str,
    file: &str,
    report: &mut ValidationReport,
) -> Result<Vec<ClassSpec>, Vec<ErrorEntry>> {
    let import = uml::parse_uml(content, file).map_err(|e| {
        vec![ErrorEntry::error(E_PARSE_ERROR, e.to_string(), file, "$")
            .with_suggestion("Check that every `{` in the diagram has a matching `}`")]
    })?;
    for warning in import.warnings {
        report.push(ErrorEntry::warning(E_PARSE_ERROR, warning, file, "$"));
    }
    Ok(import.classes)
}

fn parse_checked(
    content: &str,
    file: &str,
    format: parser::SpecFormat,
    schema: &serde_json::Value,
) -> Result<ClassSpec, Vec<ErrorEntry>> {
    let value = parser::parse_class_value(content, file, format).map_err(|e| vec![e])?;

    let violations: Vec<ErrorEntry> = schema_def::validate_against_schema(&value, schema)
        .into_iter()
        .map(|mut e| {
            e.file = file.to_string();
            e
        })
        .collect();
    if !violations.is_empty() {
        return Err(violations);
    }

    parser::class_from_value(value, file).map_err(|e| vec![e])
}

/// Errors that prevent loading entirely
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Project directory not found: {0}")]
    ProjectNotFound(String),

    #[error("hdrgen.config.json not found: {0}")]
    ConfigNotFound(String),

    #[error("Failed to parse hdrgen.config.json: {}", .0.message)]
    ConfigParseError(ErrorEntry),

    #[error("Not a class file (expected *.class.yaml, *.class.yml, *.class.json or *.puml): {0}")]
    UnknownFileType(String),

    #[error("Invalid diagram {file}: {source}")]
    InvalidDiagram { file: String, source: UmlError },

    #[error("Invalid class file {file}: {}", .entries.first().map(|e| e.message.as_str()).unwrap_or("unknown error"))]
    InvalidClassFile {
        file: String,
        entries: Vec<ErrorEntry>,
    },

    #[error("I/O error reading {0}: {1}")]
    IoError(String, std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_minimal_project(dir: &Path) {
        std::fs::write(
            dir.join(CONFIG_FILE_NAME),
            r#"{ "version": "1.0.0", "name": "test-project" }"#,
        )
        .unwrap();
    }

    #[test]
    fn test_load_minimal_project() {
        let tmp = TempDir::new().unwrap();
        create_minimal_project(tmp.path());

        let (project, report) = load_project(tmp.path()).unwrap();
        assert_eq!(project.config.name, "test-project");
        assert!(project.classes.is_empty());
        assert!(report.ok);
    }

    #[test]
    fn test_load_nested_class_files() {
        let tmp = TempDir::new().unwrap();
        create_minimal_project(tmp.path());
        std::fs::create_dir_all(tmp.path().join("ui")).unwrap();
        std::fs::write(
            tmp.path().join("ui/widget.class.yaml"),
            "name: Widget\nnamespaces: [ui]\n",
        )
        .unwrap();
        std::fs::write(
            tmp.path().join("button.class.json"),
            r#"{ "name": "Button" }"#,
        )
        .unwrap();
        std::fs::write(tmp.path().join("README.md"), "# notes").unwrap();

        let (project, report) = load_project(tmp.path()).unwrap();
        assert!(report.ok, "{:?}", report.errors);
        assert_eq!(project.classes.len(), 2);
        let names: Vec<_> = project.classes.iter().map(|(_, c)| c.name.as_str()).collect();
        assert!(names.contains(&"Widget"));
        assert!(names.contains(&"Button"));
    }

    #[test]
    fn test_load_skips_output_dir() {
        let tmp = TempDir::new().unwrap();
        create_minimal_project(tmp.path());
        std::fs::create_dir_all(tmp.path().join("generated")).unwrap();
        std::fs::write(
            tmp.path().join("generated/stale.class.json"),
            r#"{ "name": "Stale" }"#,
        )
        .unwrap();

        let (project, _) = load_project(tmp.path()).unwrap();
        assert!(project.classes.is_empty());
    }

    #[test]
    fn test_load_accumulates_errors() {
        let tmp = TempDir::new().unwrap();
        create_minimal_project(tmp.path());
        std::fs::write(tmp.path().join("bad.class.json"), "{ not json").unwrap();
        std::fs::write(
            tmp.path().join("wrong.class.yaml"),
            "name: Wrong\nmembers:\n  - name: id\n    type: int\n    access: friend\n",
        )
        .unwrap();
        std::fs::write(tmp.path().join("good.class.yaml"), "name: Good\n").unwrap();

        let (project, report) = load_project(tmp.path()).unwrap();
        assert_eq!(project.classes.len(), 1);
        assert!(!report.ok);
        assert!(report.errors.iter().any(|e| e.file == "bad.class.json"));
        assert!(report.errors.iter().any(|e| e.file == "wrong.class.yaml"));
    }

    #[test]
    fn test_missing_config() {
        let tmp = TempDir::new().unwrap();
        let err = load_project(tmp.path()).unwrap_err();
        assert!(matches!(err, LoadError::ConfigNotFound(_)));
    }

    #[test]
    fn test_missing_project_dir() {
        let err = load_project(Path::new("/nonexistent/hdrgen/project")).unwrap_err();
        assert!(matches!(err, LoadError::ProjectNotFound(_)));
    }

    #[test]
    fn test_load_project_reads_diagrams() {
        let tmp = TempDir::new().unwrap();
        create_minimal_project(tmp.path());
        std::fs::write(
            tmp.path().join("model.puml"),
            "@startuml\nnamespace ui {\n  interface IView {\n    + Draw() <<const>>\n    + Paint() <<inline>>\n  }\n  class Button implements IView {\n  }\n}\n@enduml\n",
        )
        .unwrap();
        std::fs::write(tmp.path().join("broken.puml"), "class A {\n").unwrap();

        let (project, report) = load_project(tmp.path()).unwrap();
        let names: Vec<_> = project
            .classes
            .iter()
            .map(|(file, c)| (file.as_str(), c.qualified_name()))
            .collect();
        assert_eq!(
            names,
            vec![("model.puml", "ui::IView".to_string()), ("model.puml", "ui::Button".to_string())]
        );

        let broken: Vec<_> = report.errors.iter().filter(|e| e.file == "broken.puml").collect();
        assert_eq!(broken.len(), 1);
        assert!(broken[0].message.contains("never closed"));
        assert!(report
            .errors
            .iter()
            .any(|e| e.file == "model.puml" && e.severity == crate::types::common::Severity::Warning));
    }

    #[test]
    fn test_load_spec_file() {
        let tmp = TempDir::new().unwrap();
        let diagram = tmp.path().join("pair.puml");
        std::fs::write(&diagram, "class A {\n}\nclass B {\n}\nA <|-- B\n").unwrap();
        let classes = load_spec_file(&diagram).unwrap();
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[1].bases[0].name, "A");

        let single = tmp.path().join("widget.class.yaml");
        std::fs::write(&single, "name: Widget\n").unwrap();
        assert_eq!(load_spec_file(&single).unwrap()[0].name, "Widget");

        std::fs::write(&diagram, "}\n").unwrap();
        assert!(matches!(
            load_spec_file(&diagram).unwrap_err(),
            LoadError::InvalidDiagram { .. }
        ));
    }

    #[test]
    fn test_load_class_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("widget.class.yaml");
        std::fs::write(&path, "name: Widget\n").unwrap();

        let class = load_class_file(&path).unwrap();
        assert_eq!(class.name, "Widget");

        let other = tmp.path().join("widget.yaml");
        std::fs::write(&other, "name: Widget\n").unwrap();
        assert!(matches!(
            load_class_file(&other).unwrap_err(),
            LoadError::UnknownFileType(_)
        ));
    }
}
