use serde_json::Value;

use crate::Result;
use crate::collection::KeyValue;
use crate::collection::model::RequestBody;
use crate::compile::headers;

/// Normalize a testcase payload into a raw body and infer its
/// content-type header when absent.
///
/// A string body is used verbatim; any other value is rendered as its
/// compact canonical JSON text. `Content-Type: application/json` is
/// appended only when no logical Content-Type header exists yet.
pub fn encode(body: Option<&Value>, request_headers: &mut Vec<KeyValue>) -> Result<Option<RequestBody>> {
    let Some(value) = body else {
        return Ok(None);
    };

    let raw = match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string(other)?,
    };

    if !headers::contains(request_headers, "Content-Type") {
        request_headers.push(KeyValue::new("Content-Type", "application/json"));
    }

    Ok(Some(RequestBody::raw_json(raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_body_leaves_headers_untouched() {
        let mut headers = vec![KeyValue::new("Accept", "*/*")];
        let encoded = encode(None, &mut headers).unwrap();

        assert!(encoded.is_none());
        assert_eq!(headers, vec![KeyValue::new("Accept", "*/*")]);
    }

    #[test]
    fn test_structured_body_rendered_as_json() {
        let body = json!({"a": 1});
        let mut headers = Vec::new();

        let encoded = encode(Some(&body), &mut headers).unwrap().unwrap();
        assert_eq!(encoded.raw, r#"{"a":1}"#);
        assert_eq!(encoded.mode, "raw");
        assert_eq!(
            headers,
            vec![KeyValue::new("Content-Type", "application/json")]
        );
    }

    #[test]
    fn test_string_body_used_verbatim() {
        let body = json!("id=1&mode=fast");
        let mut headers = Vec::new();

        let encoded = encode(Some(&body), &mut headers).unwrap().unwrap();
        assert_eq!(encoded.raw, "id=1&mode=fast");
    }

    #[test]
    fn test_existing_content_type_preserved() {
        let body = json!({"a": 1});
        let mut headers = vec![KeyValue::new("content-type", "application/vnd.api+json")];

        encode(Some(&body), &mut headers).unwrap();

        assert_eq!(
            headers,
            vec![KeyValue::new("content-type", "application/vnd.api+json")]
        );
    }

    #[test]
    fn test_array_body() {
        let body = json!([1, 2, 3]);
        let mut headers = Vec::new();

        let encoded = encode(Some(&body), &mut headers).unwrap().unwrap();
        assert_eq!(encoded.raw, "[1,2,3]");
    }
}
