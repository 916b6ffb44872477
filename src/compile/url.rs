use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::collection::KeyValue;
use crate::collection::model::Url;

/// Literal placeholder the runner resolves to the collection's base URL
/// at execution time. Never replaced with a concrete host here.
pub const BASE_URL_PLACEHOLDER: &str = "{{baseUrl}}";

/// Component encoding for query keys and values: escape everything but
/// alphanumerics and `-_.!~*'()`, the set collection runners leave
/// untouched.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Render a `{{variable}}` reference.
pub fn placeholder(name: &str) -> String {
    format!("{{{{{name}}}}}")
}

/// Build the structured request URL from a path template and the
/// flattened query entries.
///
/// An embedded `?suffix` in the template is stripped before segmenting;
/// segments split on `/` with empties dropped. The raw form keeps the
/// base-url placeholder as its origin and appends the percent-encoded
/// query string.
pub fn build(path_template: &str, query: &[KeyValue]) -> Url {
    let clean_path = path_template.split('?').next().unwrap_or("");

    let segments: Vec<String> = clean_path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    let raw = if query.is_empty() {
        format!("{BASE_URL_PLACEHOLDER}{clean_path}")
    } else {
        format!("{BASE_URL_PLACEHOLDER}{clean_path}?{}", query_string(query))
    };

    Url {
        raw,
        host: vec![BASE_URL_PLACEHOLDER.to_string()],
        path: segments,
        query: query.to_vec(),
    }
}

fn query_string(entries: &[KeyValue]) -> String {
    entries
        .iter()
        .map(|e| format!("{}={}", encode(&e.key), encode(&e.value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode(component: &str) -> String {
    utf8_percent_encode(component, QUERY_COMPONENT).to_string()
}
