use serde_json::Value;

use crate::collection::KeyValue;

/// Collection name used when the spec does not provide one.
pub const DEFAULT_COLLECTION_NAME: &str = "API Test Collection";

/// Typed form of the whole input document, produced by the validation
/// pass before anything downstream runs.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSpec {
    pub name: String,
    pub description: Option<String>,

    /// Collection variables in emission order: `baseUrl` always first,
    /// the remainder in lexicographic key order.
    pub variables: Vec<KeyValue>,

    /// Headers applied to every request unless a testcase overrides them.
    pub default_headers: Vec<KeyValue>,

    /// Collection-level fallback for method and path.
    pub endpoint: Option<EndpointDefault>,

    /// Testcases in input order. Entries that were not mappings have
    /// already been skipped.
    pub testcases: Vec<TestcaseSpec>,
}

impl CollectionSpec {
    /// Look up a collection variable by key.
    pub fn variable(&self, key: &str) -> Option<&str> {
        self.variables
            .iter()
            .find(|v| v.key == key)
            .map(|v| v.value.as_str())
    }
}

/// Fallback `{method, path}` applied to testcases that omit their own.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EndpointDefault {
    pub method: Option<String>,
    pub path: Option<String>,
}

/// One declarative testcase: the request shape plus the assertions to
/// compile into its verification script.
#[derive(Debug, Clone, PartialEq)]
pub struct TestcaseSpec {
    pub id: Option<String>,
    pub name: Option<String>,
    pub method: Option<String>,
    pub path: Option<String>,

    /// Flattened query entries in key-then-element order. Array-valued
    /// params repeat the key, one entry per non-null element.
    pub query: Vec<KeyValue>,

    /// Per-testcase headers, null values already dropped.
    pub headers: Vec<KeyValue>,

    pub body: Option<Value>,
    pub requires_auth: bool,
    pub assertions: Vec<Assertion>,
}

impl TestcaseSpec {
    /// Identity used in warnings and error contexts.
    pub fn identity(&self) -> &str {
        self.id
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("testcase")
    }
}

/// Declarative response assertion, dispatched by its `type` tag.
///
/// The vocabulary is closed; records with an unknown tag (or a known tag
/// whose payload is missing or ill-typed) lower to `Unknown` so a future
/// spec never breaks compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assertion {
    StatusEquals { equals: u16 },
    HeaderPresent { name: String },
    ContentTypeIncludes { value: String },
    JsonIsArray,
    JsonArrayMinLength { min: i64 },
    JsonPathExists { path: String },
    Unknown { tag: String },
}

impl Assertion {
    /// Whether the compiled statement needs the parsed response body.
    pub fn needs_json(&self) -> bool {
        matches!(
            self,
            Assertion::JsonIsArray
                | Assertion::JsonArrayMinLength { .. }
                | Assertion::JsonPathExists { .. }
        )
    }
}
