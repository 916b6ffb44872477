pub mod types;
pub mod validate;

// Re-export commonly used types
pub use types::{Assertion, CollectionSpec, EndpointDefault, TestcaseSpec};
pub use validate::{ShapeError, SpecError, parse_spec};
