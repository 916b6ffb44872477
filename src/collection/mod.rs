pub mod assembler;
pub mod model;

// Re-export commonly used types
pub use assembler::{ExportError, assemble, patch_items};
pub use model::KeyValue;
