use crate::collection::KeyValue;
use crate::compile::diagnostics::Diagnostics;
use crate::compile::{headers, url};
use crate::spec::CollectionSpec;

/// Collection variable holding the bearer token.
pub const ACCESS_TOKEN_VAR: &str = "accessToken";

/// Add the bearer `Authorization` header when a testcase asks for auth.
///
/// The header value references the token variable; the concrete secret
/// is substituted by the runner at execution time, never embedded here.
/// Without a usable token variable the headers are left unchanged and a
/// warning is recorded.
pub fn apply(
    request_headers: &mut Vec<KeyValue>,
    requires_auth: bool,
    spec: &CollectionSpec,
    testcase: &str,
    diagnostics: &mut Diagnostics,
) {
    if !requires_auth {
        return;
    }

    match spec.variable(ACCESS_TOKEN_VAR).filter(|v| !v.is_empty()) {
        Some(_) => {
            let value = format!("Bearer {}", url::placeholder(ACCESS_TOKEN_VAR));
            headers::set(request_headers, "Authorization", &value);
        }
        None => diagnostics.warn(
            testcase,
            format!(
                "requiresAuth is set but the {ACCESS_TOKEN_VAR} variable is missing or empty; \
                 proceeding without an Authorization header"
            ),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_with_variables(variables: Vec<KeyValue>) -> CollectionSpec {
        CollectionSpec {
            name: "demo".to_string(),
            description: None,
            variables,
            default_headers: Vec::new(),
            endpoint: None,
            testcases: Vec::new(),
        }
    }

    #[test]
    fn test_noop_without_requires_auth() {
        let spec = spec_with_variables(vec![KeyValue::new(ACCESS_TOKEN_VAR, "tok")]);
        let mut headers = Vec::new();
        let mut diagnostics = Diagnostics::new();

        apply(&mut headers, false, &spec, "t1", &mut diagnostics);

        assert!(headers.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_injects_placeholder_not_token() {
        let spec = spec_with_variables(vec![KeyValue::new(ACCESS_TOKEN_VAR, "s3cret")]);
        let mut headers = Vec::new();
        let mut diagnostics = Diagnostics::new();

        apply(&mut headers, true, &spec, "t1", &mut diagnostics);

        assert_eq!(
            headers,
            vec![KeyValue::new("Authorization", "Bearer {{accessToken}}")]
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_overwrites_existing_authorization() {
        let spec = spec_with_variables(vec![KeyValue::new(ACCESS_TOKEN_VAR, "tok")]);
        let mut headers = vec![KeyValue::new("authorization", "Basic abc")];
        let mut diagnostics = Diagnostics::new();

        apply(&mut headers, true, &spec, "t1", &mut diagnostics);

        assert_eq!(
            headers,
            vec![KeyValue::new("Authorization", "Bearer {{accessToken}}")]
        );
    }

    #[test]
    fn test_missing_variable_warns_and_skips() {
        let spec = spec_with_variables(Vec::new());
        let mut headers = Vec::new();
        let mut diagnostics = Diagnostics::new();

        apply(&mut headers, true, &spec, "t1", &mut diagnostics);

        assert!(headers.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.warnings()[0].testcase, "t1");
    }

    #[test]
    fn test_empty_variable_treated_as_missing() {
        let spec = spec_with_variables(vec![KeyValue::new(ACCESS_TOKEN_VAR, "")]);
        let mut headers = Vec::new();
        let mut diagnostics = Diagnostics::new();

        apply(&mut headers, true, &spec, "t1", &mut diagnostics);

        assert!(headers.is_empty());
        assert_eq!(diagnostics.len(), 1);
    }
}
