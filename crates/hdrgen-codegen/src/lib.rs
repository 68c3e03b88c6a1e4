pub mod context;
pub mod error;
pub mod generator;
pub mod includes;
pub mod traits;

// Header and source emitters
pub mod emitters;

// Re-exports
pub use context::{EmitContext, IndentStyle};
pub use error::CodegenError;
pub use generator::{emit, emit_source, GeneratedProject, HeaderGenerator};
pub use includes::IncludeResolver;
pub use traits::{ArtifactEmitter, ArtifactKind};
