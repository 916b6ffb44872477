use crate::Result;
use crate::collection::KeyValue;
use crate::collection::model::{RequestBody, Url};
use crate::compile::diagnostics::Diagnostics;
use crate::compile::{auth, body, headers, script, url};
use crate::spec::{CollectionSpec, TestcaseSpec};

/// One request plus its verification script, ready for assembly.
///
/// The item carries the intended URL, headers and body exactly as
/// synthesized; the assembler later re-imposes these on the serialized
/// artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub name: String,
    pub method: String,
    pub url: Url,
    pub headers: Vec<KeyValue>,
    pub body: Option<RequestBody>,
    pub script: Vec<String>,

    /// Number of source assertions, kept for reporting.
    pub assertions: usize,
}

/// Compile every testcase of a validated spec, in input order.
///
/// Item order is an observable contract: downstream diffing relies on
/// it matching the spec order. Warnings accumulate in the returned
/// diagnostics; any error aborts the whole run.
pub fn compile_spec(spec: &CollectionSpec) -> Result<(Vec<Item>, Diagnostics)> {
    let mut items = Vec::with_capacity(spec.testcases.len());
    let mut diagnostics = Diagnostics::new();

    for testcase in &spec.testcases {
        items.push(compile_testcase(spec, testcase, &mut diagnostics)?);
    }

    Ok((items, diagnostics))
}

/// Run one testcase through the synthesis stages and emit its item.
pub fn compile_testcase(
    spec: &CollectionSpec,
    testcase: &TestcaseSpec,
    diagnostics: &mut Diagnostics,
) -> Result<Item> {
    // 1. Resolve method and path: testcase value, else the
    //    collection-level endpoint default, else GET /
    let endpoint = spec.endpoint.as_ref();
    let method = testcase
        .method
        .as_deref()
        .or_else(|| endpoint.and_then(|e| e.method.as_deref()))
        .unwrap_or("GET")
        .to_uppercase();
    let path = testcase
        .path
        .as_deref()
        .or_else(|| endpoint.and_then(|e| e.path.as_deref()))
        .unwrap_or("/");

    // 2. Merge default and per-testcase headers
    let mut request_headers = headers::resolve(&spec.default_headers, &testcase.headers);

    // 3. Inject auth (placeholder reference, warn-and-continue)
    auth::apply(
        &mut request_headers,
        testcase.requires_auth,
        spec,
        testcase.identity(),
        diagnostics,
    );

    // 4. Encode the body, which may append a Content-Type header
    let request_body = body::encode(testcase.body.as_ref(), &mut request_headers)?;

    // 5. Build the structured URL over the base-url placeholder
    let request_url = url::build(path, &testcase.query);

    // 6. Compile the assertions into the embedded script
    let script_lines = script::compile(&testcase.assertions);

    Ok(Item {
        name: item_name(testcase, &method, path),
        method,
        url: request_url,
        headers: request_headers,
        body: request_body,
        script: script_lines,
        assertions: testcase.assertions.len(),
    })
}

fn item_name(testcase: &TestcaseSpec, method: &str, path: &str) -> String {
    match (testcase.id.as_deref(), testcase.name.as_deref()) {
        (Some(id), Some(name)) => format!("{id} - {name}"),
        (None, Some(name)) => name.to_string(),
        (Some(id), None) => id.to_string(),
        (None, None) => format!("{method} {path}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::parse_spec;
    use serde_json::json;

    fn compile_one(spec_json: serde_json::Value) -> (Vec<Item>, Diagnostics) {
        let spec = parse_spec(&spec_json).unwrap();
        compile_spec(&spec).unwrap()
    }

    #[test]
    fn test_petstore_scenario() {
        let (items, diagnostics) = compile_one(json!({
            "testcases": [{
                "id": "t1",
                "method": "GET",
                "path": "/pets",
                "query": {"status": ["available", "sold"]},
                "assertions": [
                    {"type": "status", "equals": 200},
                    {"type": "json_is_array"}
                ]
            }]
        }));

        assert!(diagnostics.is_empty());
        assert_eq!(items.len(), 1);

        let item = &items[0];
        assert_eq!(item.name, "t1");
        assert_eq!(item.method, "GET");
        assert_eq!(item.url.raw, "{{baseUrl}}/pets?status=available&status=sold");

        // Status check compiles before the array check.
        let status_at = item.script.iter().position(|l| l.contains("Status is 200"));
        let array_at = item.script.iter().position(|l| l.contains("an('array')"));
        assert!(status_at.unwrap() < array_at.unwrap());
        assert_eq!(item.assertions, 2);
    }

    #[test]
    fn test_method_and_path_fall_back_to_endpoint() {
        let (items, _) = compile_one(json!({
            "endpoint": {"method": "post", "path": "/pets"},
            "testcases": [{"id": "t1"}, {"id": "t2", "method": "delete", "path": "/pets/1"}]
        }));

        assert_eq!(items[0].method, "POST");
        assert_eq!(items[0].url.raw, "{{baseUrl}}/pets");
        assert_eq!(items[1].method, "DELETE");
        assert_eq!(items[1].url.raw, "{{baseUrl}}/pets/1");
    }

    #[test]
    fn test_bare_defaults_are_get_root() {
        let (items, _) = compile_one(json!({"testcases": [{"id": "t1"}]}));

        assert_eq!(items[0].method, "GET");
        assert_eq!(items[0].url.raw, "{{baseUrl}}/");
        assert!(items[0].url.path.is_empty());
    }

    #[test]
    fn test_item_naming() {
        let (items, _) = compile_one(json!({
            "testcases": [
                {"id": "t1", "name": "list pets"},
                {"name": "only name"},
                {"id": "only-id"},
                {"method": "PUT", "path": "/x"}
            ]
        }));

        assert_eq!(items[0].name, "t1 - list pets");
        assert_eq!(items[1].name, "only name");
        assert_eq!(items[2].name, "only-id");
        assert_eq!(items[3].name, "PUT /x");
    }

    #[test]
    fn test_auth_header_via_pipeline() {
        let (items, diagnostics) = compile_one(json!({
            "variables": {"accessToken": "tok"},
            "testcases": [{"id": "t1", "requiresAuth": true}]
        }));

        assert!(diagnostics.is_empty());
        assert_eq!(
            items[0].headers,
            vec![KeyValue::new("Authorization", "Bearer {{accessToken}}")]
        );
    }

    #[test]
    fn test_missing_auth_variable_warns_once_and_continues() {
        let (items, diagnostics) = compile_one(json!({
            "testcases": [{"id": "t1", "requiresAuth": true}]
        }));

        assert_eq!(items.len(), 1);
        assert!(!items[0].headers.iter().any(|h| h.key == "Authorization"));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.warnings()[0].testcase, "t1");
    }

    #[test]
    fn test_body_adds_content_type_after_merge() {
        let (items, _) = compile_one(json!({
            "defaultHeaders": {"Accept": "application/json"},
            "testcases": [{"id": "t1", "method": "POST", "body": {"a": 1}}]
        }));

        let item = &items[0];
        assert_eq!(
            item.headers,
            vec![
                KeyValue::new("Accept", "application/json"),
                KeyValue::new("Content-Type", "application/json"),
            ]
        );
        assert_eq!(item.body.as_ref().unwrap().raw, r#"{"a":1}"#);
    }

    #[test]
    fn test_items_follow_spec_order() {
        let (items, _) = compile_one(json!({
            "testcases": [{"id": "c"}, {"id": "a"}, {"id": "b"}]
        }));

        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }
}
