pub mod arrays;
pub mod base_style;
pub mod duplicates;
pub mod identifiers;
pub mod kind_check;
pub mod override_check;
pub mod required_fields;
pub mod version_check;
