pub mod class;
pub mod common;
pub mod config;
pub mod error;
