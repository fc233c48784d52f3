//! Vendor-specific custom tags.

pub mod registry;
pub mod validator;
pub mod vendors;

pub use registry::{TagDefinition, TagRegistry, TagViolation};
pub use validator::TagValidator;
pub use vendors::{UnknownVendor, Vendor};
