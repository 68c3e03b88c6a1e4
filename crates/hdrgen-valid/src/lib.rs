pub mod rules;
pub mod validator;

pub use validator::{validate_class, validate_project};
