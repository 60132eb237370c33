//! Configuration module
//!
//! YAML schema, loading pipeline, and validation for the controller.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigLoader, LoadResult, LoaderOptions};
pub use schema::JumpConfig;
pub use validation::Validator;
