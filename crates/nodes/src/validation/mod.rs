//! Field validation: descriptors in, validity plus error records out.

pub mod descriptor;
pub mod result;
pub mod rules;

pub use descriptor::{FieldDescriptor, FieldRule, NumberCheck, StringFormat};
pub use result::{ValidationError, ValidationResult};
pub use rules::{check_field, validate, Violation};
