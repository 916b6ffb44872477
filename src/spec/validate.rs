use serde_json::{Map, Value};

use crate::collection::KeyValue;
use crate::spec::types::{
    Assertion, CollectionSpec, DEFAULT_COLLECTION_NAME, EndpointDefault, TestcaseSpec,
};

/// A configuration value does not have the shape the compiler expects.
#[derive(Debug, thiserror::Error)]
#[error("{context}: expected {expected}, got {actual}")]
pub struct ShapeError {
    pub context: String,
    pub expected: &'static str,
    pub actual: &'static str,
}

impl ShapeError {
    fn new(context: impl Into<String>, expected: &'static str, value: &Value) -> Self {
        Self {
            context: context.into(),
            expected,
            actual: type_name(value),
        }
    }
}

/// The document as a whole is unusable.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    #[error("top-level document must be a JSON object")]
    NotAnObject,

    #[error("missing \"testcases\" array")]
    MissingTestcases,

    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// Validate and lower a raw spec document into its typed form.
///
/// Every shape rule is checked here, before any resolver runs. Testcase
/// entries that are not mappings are skipped, not fatal; everything else
/// that violates a shape aborts the run.
pub fn parse_spec(root: &Value) -> Result<CollectionSpec, SpecError> {
    let obj = root.as_object().ok_or(SpecError::NotAnObject)?;

    let raw_testcases = obj
        .get("testcases")
        .and_then(Value::as_array)
        .ok_or(SpecError::MissingTestcases)?;

    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_COLLECTION_NAME)
        .to_string();

    let description = obj
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string);

    let variables = lower_variables(obj)?;
    let default_headers = lower_header_map(obj.get("defaultHeaders"), "defaultHeaders")?;
    let endpoint = lower_endpoint(obj.get("endpoint"))?;

    let mut testcases = Vec::new();
    for (index, entry) in raw_testcases.iter().enumerate() {
        match entry.as_object() {
            Some(map) => testcases.push(lower_testcase(map, index)?),
            None => {
                tracing::debug!(index, "skipping testcase entry that is not a mapping");
            }
        }
    }

    Ok(CollectionSpec {
        name,
        description,
        variables,
        default_headers,
        endpoint,
        testcases,
    })
}

/// Emission order: `baseUrl` first (falling back to the top-level
/// `baseUrl` field, then the empty string), then the remaining variables
/// in lexicographic key order.
fn lower_variables(root: &Map<String, Value>) -> Result<Vec<KeyValue>, ShapeError> {
    let vars = match root.get("variables") {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => Some(map),
        Some(other) => return Err(ShapeError::new("variables", "a plain mapping", other)),
    };

    let base_url = match vars.and_then(|m| m.get("baseUrl")).or_else(|| root.get("baseUrl")) {
        None | Some(Value::Null) => String::new(),
        Some(value) => scalar_to_string(value).ok_or_else(|| {
            ShapeError::new("variable \"baseUrl\"", "a primitive scalar", value)
        })?,
    };

    let mut out = vec![KeyValue::new("baseUrl", base_url)];
    if let Some(map) = vars {
        for (key, value) in map {
            if key == "baseUrl" {
                continue;
            }
            let rendered = match value {
                Value::Null => String::new(),
                other => scalar_to_string(other).ok_or_else(|| {
                    ShapeError::new(format!("variable \"{key}\""), "a primitive scalar", other)
                })?,
            };
            out.push(KeyValue::new(key.clone(), rendered));
        }
    }

    Ok(out)
}

/// Lower a shallow scalar mapping of headers. Null values are dropped,
/// never emitted as empty-string headers.
fn lower_header_map(value: Option<&Value>, context: &str) -> Result<Vec<KeyValue>, ShapeError> {
    let map = match value {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(ShapeError::new(
                format!("{context}: headers"),
                "a plain mapping of scalars",
                other,
            ));
        }
    };

    let mut out = Vec::new();
    for (key, value) in map {
        match value {
            Value::Null => continue,
            other => {
                let rendered = scalar_to_string(other).ok_or_else(|| {
                    ShapeError::new(
                        format!("{context}: header \"{key}\""),
                        "a primitive scalar",
                        other,
                    )
                })?;
                out.push(KeyValue::new(key.clone(), rendered));
            }
        }
    }

    Ok(out)
}

/// Flatten the query mapping into ordered entries. A scalar yields one
/// entry; an array yields one entry per non-null element with the key
/// repeated; nulls are skipped entirely.
fn lower_query(value: Option<&Value>, context: &str) -> Result<Vec<KeyValue>, ShapeError> {
    let map = match value {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(ShapeError::new(
                format!("{context}: query"),
                "a plain mapping",
                other,
            ));
        }
    };

    let mut out = Vec::new();
    for (key, value) in map {
        match value {
            Value::Null => continue,
            Value::Array(elements) => {
                for element in elements {
                    match element {
                        Value::Null => continue,
                        other => {
                            let rendered = scalar_to_string(other).ok_or_else(|| {
                                ShapeError::new(
                                    format!("{context}: query value for key \"{key}\""),
                                    "an array of primitive scalars",
                                    other,
                                )
                            })?;
                            out.push(KeyValue::new(key.clone(), rendered));
                        }
                    }
                }
            }
            other => {
                let rendered = scalar_to_string(other).ok_or_else(|| {
                    ShapeError::new(
                        format!("{context}: query value for key \"{key}\""),
                        "a primitive scalar or array of scalars",
                        other,
                    )
                })?;
                out.push(KeyValue::new(key.clone(), rendered));
            }
        }
    }

    Ok(out)
}

fn lower_endpoint(value: Option<&Value>) -> Result<Option<EndpointDefault>, ShapeError> {
    let map = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(ShapeError::new(
                "endpoint",
                "a mapping with method/path",
                other,
            ));
        }
    };

    Ok(Some(EndpointDefault {
        method: optional_scalar_string(map, "method", "endpoint")?,
        path: optional_scalar_string(map, "path", "endpoint")?,
    }))
}

fn lower_testcase(map: &Map<String, Value>, index: usize) -> Result<TestcaseSpec, ShapeError> {
    // Identity for error contexts, resolved before full lowering.
    let label = map
        .get("id")
        .and_then(Value::as_str)
        .or_else(|| map.get("name").and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| format!("#{index}"));
    let context = format!("testcase \"{label}\"");

    let id = optional_scalar_string(map, "id", &context)?;
    let name = optional_scalar_string(map, "name", &context)?;
    let method = optional_scalar_string(map, "method", &context)?;
    let path = optional_scalar_string(map, "path", &context)?;
    let query = lower_query(map.get("query"), &context)?;
    let headers = lower_header_map(map.get("headers"), &context)?;

    let body = match map.get("body") {
        None | Some(Value::Null) => None,
        Some(value) => Some(value.clone()),
    };

    // Only a literal `true` opts a testcase into auth.
    let requires_auth = matches!(map.get("requiresAuth"), Some(Value::Bool(true)));

    let assertions = lower_assertions(map.get("assertions"), &context)?;

    Ok(TestcaseSpec {
        id,
        name,
        method,
        path,
        query,
        headers,
        body,
        requires_auth,
        assertions,
    })
}

fn lower_assertions(value: Option<&Value>, context: &str) -> Result<Vec<Assertion>, ShapeError> {
    let list = match value {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(list)) => list,
        Some(other) => {
            return Err(ShapeError::new(
                format!("{context}: assertions"),
                "an array of assertion records",
                other,
            ));
        }
    };

    Ok(list.iter().filter_map(lower_assertion).collect())
}

/// Lower one assertion record. Records without a string tag are dropped;
/// a known tag with a missing or ill-typed payload falls back to
/// `Unknown` and compiles to a placeholder, never an error.
fn lower_assertion(record: &Value) -> Option<Assertion> {
    let map = record.as_object()?;
    let tag = map.get("type").and_then(Value::as_str)?;

    let assertion = match tag {
        "status" => map
            .get("equals")
            .and_then(Value::as_i64)
            .and_then(|n| u16::try_from(n).ok())
            .map(|equals| Assertion::StatusEquals { equals }),
        "header_present" => {
            non_empty_str(map, "name").map(|name| Assertion::HeaderPresent { name })
        }
        "content_type_includes" => {
            non_empty_str(map, "value").map(|value| Assertion::ContentTypeIncludes { value })
        }
        "json_is_array" => Some(Assertion::JsonIsArray),
        "json_array_min_length" => map
            .get("min")
            .and_then(Value::as_i64)
            .map(|min| Assertion::JsonArrayMinLength { min }),
        "json_path_exists" => {
            non_empty_str(map, "path").map(|path| Assertion::JsonPathExists { path })
        }
        _ => None,
    };

    Some(assertion.unwrap_or_else(|| Assertion::Unknown {
        tag: tag.to_string(),
    }))
}

fn optional_scalar_string(
    map: &Map<String, Value>,
    key: &str,
    context: &str,
) -> Result<Option<String>, ShapeError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => scalar_to_string(value).map(Some).ok_or_else(|| {
            ShapeError::new(
                format!("{context}: field \"{key}\""),
                "a primitive scalar",
                value,
            )
        }),
    }
}

fn non_empty_str(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
