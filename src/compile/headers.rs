use std::collections::HashMap;

use crate::collection::KeyValue;

/// Merge default and per-testcase headers.
///
/// Keys are compared case-insensitively. A testcase header overrides the
/// default with the same logical key; the merged entry keeps the
/// position of the first occurrence and the casing and value of the last
/// one applied. Null values were already dropped during validation.
pub fn resolve(defaults: &[KeyValue], overrides: &[KeyValue]) -> Vec<KeyValue> {
    let mut merged: Vec<KeyValue> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for header in defaults.iter().chain(overrides) {
        let logical = header.key.to_ascii_lowercase();
        match index.get(&logical) {
            Some(&at) => merged[at] = header.clone(),
            None => {
                index.insert(logical, merged.len());
                merged.push(header.clone());
            }
        }
    }

    merged
}

/// Case-insensitive membership test.
pub fn contains(headers: &[KeyValue], name: &str) -> bool {
    headers.iter().any(|h| h.key.eq_ignore_ascii_case(name))
}

/// Overwrite the header with the given logical name, or append it.
pub fn set(headers: &mut Vec<KeyValue>, name: &str, value: &str) {
    match headers.iter_mut().find(|h| h.key.eq_ignore_ascii_case(name)) {
        Some(header) => {
            header.key = name.to_string();
            header.value = value.to_string();
        }
        None => headers.push(KeyValue::new(name, value)),
    }
}
