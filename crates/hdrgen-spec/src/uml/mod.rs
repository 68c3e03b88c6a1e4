pub mod parser;

pub use parser::parse_uml;

use crate::types::class::ClassSpec;

/// Classes recovered from a PlantUML class diagram.
#[derive(Debug, Clone)]
pub struct UmlImport {
    /// Declared classes, interfaces and enums in diagram order
    pub classes: Vec<ClassSpec>,
    /// Lines that were understood only partly, or not at all
    pub warnings: Vec<String>,
}

/// A diagram whose block structure cannot be followed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UmlError {
    #[error("line {line}: `}}` without an open block")]
    UnexpectedClose { line: usize },

    #[error("line {line}: block `{name}` is never closed")]
    Unclosed { name: String, line: usize },
}

impl UmlError {
    pub fn line(&self) -> usize {
        match self {
            UmlError::UnexpectedClose { line } | UmlError::Unclosed { line, .. } => *line,
        }
    }
}
