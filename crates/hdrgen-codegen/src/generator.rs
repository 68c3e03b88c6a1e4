use std::collections::BTreeMap;
use std::path::Path;

use hdrgen_spec::types::class::ClassSpec;
use hdrgen_spec::types::config::HdrgenConfig;
use hdrgen_spec::types::error::InvalidSpecError;

use crate::context::{EmitContext, IndentStyle};
use crate::emitters::{HeaderEmitter, SourceEmitter};
use crate::error::CodegenError;
use crate::includes::IncludeResolver;
use crate::traits::{ArtifactEmitter, ArtifactKind};

/// Render the header for one class with default settings.
///
/// The class is validated first; nothing is emitted when validation fails.
pub fn emit(class: &ClassSpec) -> Result<String, CodegenError> {
    ensure_valid(class)?;
    let mut ctx = EmitContext::new(IndentStyle::default());
    Ok(HeaderEmitter::default().emit(class, &mut ctx))
}

/// Render the source stub for one class with default settings.
///
/// Interfaces and enums have nothing to define and yield `None`.
pub fn emit_source(class: &ClassSpec) -> Result<Option<String>, CodegenError> {
    ensure_valid(class)?;
    let emitter = SourceEmitter::default();
    if !emitter.applies_to(class) {
        return Ok(None);
    }
    let mut ctx = EmitContext::new(IndentStyle::default());
    Ok(Some(emitter.emit(class, &mut ctx)))
}

fn ensure_valid(class: &ClassSpec) -> Result<(), InvalidSpecError> {
    let report = hdrgen_valid::validate_class(class);
    match InvalidSpecError::from_report(&report) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// A collection of generated files, keyed by relative path.
#[derive(Debug, Clone, Default)]
pub struct GeneratedProject {
    /// Files keyed by relative path (sorted for deterministic output)
    files: BTreeMap<String, String>,
}

impl GeneratedProject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    pub fn files(&self) -> &BTreeMap<String, String> {
        &self.files
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Write all generated files to the given output directory.
    pub fn write_to_disk(&self, output_dir: &Path) -> Result<(), std::io::Error> {
        for (rel_path, content) in &self.files {
            let full_path = output_dir.join(rel_path);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&full_path, content)?;
            tracing::debug!(path = %full_path.display(), "wrote file");
        }
        Ok(())
    }
}

/// Runs the configured emitters over a set of classes.
pub struct HeaderGenerator {
    emitters: Vec<Box<dyn ArtifactEmitter>>,
    indent: IndentStyle,
}

impl std::fmt::Debug for HeaderGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kinds: Vec<ArtifactKind> = self.emitters.iter().map(|e| e.kind()).collect();
        f.debug_struct("HeaderGenerator")
            .field("emitters", &kinds)
            .field("indent", &self.indent)
            .finish()
    }
}

impl HeaderGenerator {
    /// Build the emitters described by a project config.
    pub fn new(config: &HdrgenConfig) -> Self {
        let resolver = IncludeResolver::from_config(&config.includes);
        let mut emitters: Vec<Box<dyn ArtifactEmitter>> = vec![Box::new(HeaderEmitter::new(
            config.output.header_extension.clone(),
            resolver,
        ))];
        if config.output.emit_sources {
            emitters.push(Box::new(SourceEmitter::new(
                config.output.source_extension.clone(),
                config.output.header_extension.clone(),
            )));
        }

        let indent = if config.use_tabs {
            IndentStyle::Tabs
        } else {
            IndentStyle::Spaces(config.indent)
        };

        Self { emitters, indent }
    }

    /// Generate every file for every class.
    ///
    /// `classes` pairs each class with the file it came from, used to
    /// attribute validation failures. Stops at the first invalid class.
    #[tracing::instrument(skip_all, fields(classes = classes.len()))]
    pub fn generate(&self, classes: &[(String, ClassSpec)]) -> Result<GeneratedProject, CodegenError> {
        let mut output = GeneratedProject::new();

        for (file, class) in classes {
            ensure_valid(class).map_err(|source| CodegenError::InvalidClassFile {
                class: class.name.clone(),
                file: file.clone(),
                source,
            })?;

            for emitter in self.emitters.iter().filter(|e| e.applies_to(class)) {
                let mut ctx = EmitContext::new(self.indent);
                let content = emitter.emit(class, &mut ctx);
                let path = emitter.relative_path(class);
                tracing::debug!(class = %class.name, path = %path, kind = ?emitter.kind(), "emitted");
                output.add_file(path, content);
            }
        }

        Ok(output)
    }

    pub fn emitters(&self) -> impl Iterator<Item = &dyn ArtifactEmitter> {
        self.emitters.iter().map(|e| e.as_ref())
    }
}
