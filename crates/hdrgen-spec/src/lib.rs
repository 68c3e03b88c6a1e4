pub mod loader;
pub mod parser;
pub mod schema_def;
pub mod types;
pub mod uml;

pub use loader::{load_class_file, load_project, load_spec_file, LoadError, LoadedProject};
pub use types::class::ClassSpec;
pub use types::error::{ErrorEntry, InvalidSpecError, ValidationReport};
pub use uml::{parse_uml, UmlError, UmlImport};
