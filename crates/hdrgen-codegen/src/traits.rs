use hdrgen_spec::types::class::ClassSpec;

use crate::context::EmitContext;

/// What kind of file an emitter produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Header,
    Source,
}

/// Renders one file per class.
///
/// Emitters assume the class already passed validation; they never fail.
pub trait ArtifactEmitter {
    fn kind(&self) -> ArtifactKind;

    /// File extension without the dot (e.g., "h", "cpp").
    fn file_extension(&self) -> &str;

    /// Whether this emitter produces a file for `class` at all.
    fn applies_to(&self, _class: &ClassSpec) -> bool {
        true
    }

    /// Render the complete file text for `class`.
    fn emit(&self, class: &ClassSpec, ctx: &mut EmitContext) -> String;

    /// Output path relative to the output root: one directory per namespace segment.
    fn relative_path(&self, class: &ClassSpec) -> String {
        let mut parts: Vec<&str> = class.namespaces.iter().map(String::as_str).collect();
        let file = format!("{}.{}", class.name, self.file_extension());
        parts.push(&file);
        parts.join("/")
    }
}
