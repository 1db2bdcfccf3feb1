//! WireMock mapping model
//!
//! Only the fields the harness builds or inspects are typed; everything
//! else in a mapping is carried through untouched.

use crate::error::StubError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fs;
use std::path::Path;

/// A request matcher plus the response to serve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StubMapping {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,

    pub request: RequestPattern,

    pub response: ResponseDefinition,

    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPattern {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_pattern: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_path_pattern: Option<String>,

    /// Header name to matcher object, e.g. `{"equalTo": "application/json"}`
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub headers: Map<String, JsonValue>,

    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDefinition {
    /// WireMock answers 200 when a mapping leaves the status out
    #[serde(default = "default_status")]
    pub status: u16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_body: Option<JsonValue>,

    /// Header name to a string, or a list of strings for repeated headers
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub headers: Map<String, JsonValue>,

    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

fn default_status() -> u16 {
    200
}

impl StubMapping {
    pub fn new(request: RequestPattern, response: ResponseDefinition) -> Self {
        Self {
            id: None,
            name: None,
            priority: None,
            request,
            response,
            extra: Map::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Human-readable label for logs
    pub fn describe(&self) -> String {
        let method = self.request.method.as_deref().unwrap_or("ANY");
        let target = self
            .request
            .url
            .as_deref()
            .or(self.request.url_path.as_deref())
            .or(self.request.url_pattern.as_deref())
            .or(self.request.url_path_pattern.as_deref())
            .unwrap_or("*");
        format!("{} {} -> {}", method, target, self.response.status)
    }
}

impl RequestPattern {
    /// Match `method` on an exact URL, query string included
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: Some(method.into()),
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Match `method` on a path, ignoring the query string
    pub fn path(method: impl Into<String>, url_path: impl Into<String>) -> Self {
        Self {
            method: Some(method.into()),
            url_path: Some(url_path.into()),
            ..Default::default()
        }
    }

    /// Add a header matcher object
    pub fn with_header(mut self, name: impl Into<String>, matcher: JsonValue) -> Self {
        self.headers.insert(name.into(), matcher);
        self
    }
}

impl ResponseDefinition {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            body: None,
            json_body: None,
            headers: Map::new(),
            extra: Map::new(),
        }
    }

    /// A JSON response with a matching content type
    pub fn json(status: u16, body: JsonValue) -> Self {
        Self::new(status)
            .with_json_body(body)
            .with_header("Content-Type", "application/json")
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_json_body(mut self, body: JsonValue) -> Self {
        self.json_body = Some(body);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into(), JsonValue::String(value.into()));
        self
    }

    /// Values of a response header, in order; empty when it is not set
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        let value = self
            .headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value);

        match value {
            Some(JsonValue::String(single)) => vec![single.as_str()],
            Some(JsonValue::Array(values)) => values.iter().filter_map(JsonValue::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

/// The shape a mappings file may take
#[derive(Deserialize)]
#[serde(untagged)]
enum MappingsDocument {
    List(Vec<StubMapping>),
    Export { mappings: Vec<StubMapping> },
}

/// Read mappings from a JSON file
///
/// Accepts a bare list of mappings or the admin export shape
/// `{"mappings": [...]}`.
pub fn load_mappings(path: impl AsRef<Path>) -> Result<Vec<StubMapping>, StubError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| StubError::MappingsFile {
        path: path.to_path_buf(),
        source,
    })?;

    let document: MappingsDocument =
        serde_json::from_str(&content).map_err(|e| StubError::MappingsParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    Ok(match document {
        MappingsDocument::List(mappings) => mappings,
        MappingsDocument::Export { mappings } => mappings,
    })
}
