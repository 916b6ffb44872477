use serde::Serialize;

/// Collection schema the artifact declares itself against.
pub const SCHEMA_URL: &str =
    "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";

/// A key/value pair as it appears in collection JSON. Headers, query
/// entries and collection variables all share this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Structured request URL. `raw` is the fully rendered form; `host` is
/// always the base-url placeholder, resolved by the runner at execution
/// time, never here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Url {
    pub raw: String,
    pub host: Vec<String>,
    pub path: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub query: Vec<KeyValue>,
}

/// Raw request payload, tagged as JSON-flavored for the runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestBody {
    pub mode: String,
    pub raw: String,
    pub options: BodyOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BodyOptions {
    pub raw: RawOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawOptions {
    pub language: String,
}

impl RequestBody {
    /// Wrap an already-rendered payload as a raw JSON body.
    pub fn raw_json(raw: impl Into<String>) -> Self {
        Self {
            mode: "raw".to_string(),
            raw: raw.into(),
            options: BodyOptions {
                raw: RawOptions {
                    language: "json".to_string(),
                },
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collection {
    pub info: Info,
    pub variable: Vec<KeyValue>,
    pub item: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Info {
    #[serde(rename = "_postman_id")]
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub schema: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub name: String,
    pub request: Request,
    pub event: Vec<Event>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Request {
    pub method: String,
    pub header: Vec<KeyValue>,
    pub url: Url,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<RequestBody>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub listen: String,
    pub script: Script,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Script {
    #[serde(rename = "type")]
    pub script_type: String,
    pub exec: Vec<String>,
}

impl Event {
    /// A `test` event wrapping the given script lines.
    pub fn test(exec: Vec<String>) -> Self {
        Self {
            listen: "test".to_string(),
            script: Script {
                script_type: "text/javascript".to_string(),
                exec,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_serializes_without_empty_query() {
        let url = Url {
            raw: "{{baseUrl}}/pets".to_string(),
            host: vec!["{{baseUrl}}".to_string()],
            path: vec!["pets".to_string()],
            query: Vec::new(),
        };

        let json = serde_json::to_value(&url).unwrap();
        assert_eq!(json["raw"], "{{baseUrl}}/pets");
        assert!(json.get("query").is_none());
    }

    #[test]
    fn test_url_serializes_query_entries() {
        let url = Url {
            raw: "{{baseUrl}}/pets?status=sold".to_string(),
            host: vec!["{{baseUrl}}".to_string()],
            path: vec!["pets".to_string()],
            query: vec![KeyValue::new("status", "sold")],
        };

        let json = serde_json::to_value(&url).unwrap();
        assert_eq!(json["query"][0]["key"], "status");
        assert_eq!(json["query"][0]["value"], "sold");
    }

    #[test]
    fn test_raw_json_body_shape() {
        let body = RequestBody::raw_json(r#"{"a":1}"#);

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["mode"], "raw");
        assert_eq!(json["raw"], r#"{"a":1}"#);
        assert_eq!(json["options"]["raw"]["language"], "json");
    }

    #[test]
    fn test_test_event_shape() {
        let event = Event::test(vec!["pm.test('x', function () {});".to_string()]);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["listen"], "test");
        assert_eq!(json["script"]["type"], "text/javascript");
        assert_eq!(json["script"]["exec"].as_array().unwrap().len(), 1);
    }
}
