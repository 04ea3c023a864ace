//! Pre-write sanity checks.

pub mod validate;

pub use validate::{validate_toolpath, ValidationResult};
