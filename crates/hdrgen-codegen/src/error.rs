use hdrgen_spec::types::error::InvalidSpecError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodegenError {
    #[error(transparent)]
    InvalidSpec(#[from] InvalidSpecError),

    #[error("class '{class}' in '{file}': {source}")]
    InvalidClassFile {
        class: String,
        file: String,
        #[source]
        source: InvalidSpecError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodegenError {
    /// The validation failure behind this error, if any.
    pub fn invalid_spec(&self) -> Option<&InvalidSpecError> {
        match self {
            CodegenError::InvalidSpec(e) => Some(e),
            CodegenError::InvalidClassFile { source, .. } => Some(source),
            CodegenError::Io(_) => None,
        }
    }
}
