pub mod collection;
pub mod compile;
pub mod error;
pub mod logger;
pub mod spec;

// Re-export commonly used types
pub use error::{PostgenError, Result};

use serde_json::Value;

/// Everything a caller needs after compiling one spec document: the
/// patched collection artifact, the compiled items (for reporting), and
/// the warnings collected along the way.
#[derive(Debug)]
pub struct BuildOutput {
    pub collection: Value,
    pub items: Vec<compile::Item>,
    pub diagnostics: compile::Diagnostics,
}

impl BuildOutput {
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// Compile a raw spec document into a ready-to-write collection artifact.
///
/// The input is the whole spec as parsed JSON; reading and writing bytes
/// is the caller's concern. Fatal errors (malformed spec, shape
/// violations, export count mismatch) abort before anything is produced.
pub fn build_collection(root: &Value) -> Result<BuildOutput> {
    let spec = spec::parse_spec(root)?;
    let (items, diagnostics) = compile::compile_spec(&spec)?;
    let collection = collection::assemble(&spec, &items)?;

    Ok(BuildOutput {
        collection,
        items,
        diagnostics,
    })
}
