//! The loaded configuration document and its typed accessors

use crate::domains::HarnessSettings;
use crate::endpoint::{render_template, Placeholders};
use crate::env::resolve_environment;
use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Endpoint group used by [`ConfigDocument::get_api_endpoint`]
pub const API_ENDPOINT_GROUP: &str = "base_api";

/// Scanner URL used when `zap_url` is not configured
pub const DEFAULT_ZAP_URL: &str = "http://localhost:8090";

/// Login credentials from the `auth_credentials` key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthCredentials {
    pub username: String,
    pub password: String,
}

/// Configuration document, loaded once per session and immutable afterwards
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    source: Option<PathBuf>,
    environment: String,
    values: Map<String, Value>,
    settings: HarnessSettings,
}

impl ConfigDocument {
    pub(crate) fn new(
        source: Option<PathBuf>,
        environment: String,
        values: Map<String, Value>,
        settings: HarnessSettings,
    ) -> Self {
        Self {
            source,
            environment,
            values,
            settings,
        }
    }

    /// File the document was read from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Environment resolved at load time
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Typed harness settings
    pub fn settings(&self) -> &HarnessSettings {
        &self.settings
    }

    /// Raw top-level value; never fails for a missing key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Raw top-level value or the supplied default
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.values.get(key).cloned().unwrap_or(default)
    }

    /// Top-level string value, if present and a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Base URL for the given environment, or for the load-time environment.
    ///
    /// A `base_urls` mapping takes precedence; the scalar `base_url` is only
    /// consulted when no mapping is configured.
    pub fn get_base_url(&self, environment: Option<&str>) -> ConfigResult<String> {
        let environment = match environment {
            Some(env) => resolve_environment(Some(env)),
            None => self.environment.clone(),
        };

        let url = match self.values.get("base_urls") {
            Some(Value::Object(urls)) => urls.get(&environment).and_then(Value::as_str),
            Some(_) => {
                return Err(ConfigError::InvalidValue {
                    key: "base_urls".to_string(),
                    message: "expected a mapping of environment to URL".to_string(),
                })
            }
            None => self.get_str("base_url"),
        };

        match url.map(str::trim) {
            Some(url) if !url.is_empty() => Ok(url.to_string()),
            _ => Err(ConfigError::MissingBaseUrl { environment }),
        }
    }

    /// Raw endpoint template for a group/name pair
    pub fn endpoint_template(&self, group: &str, name: &str) -> ConfigResult<&str> {
        self.values
            .get("endpoints")
            .and_then(|endpoints| endpoints.get(group))
            .and_then(|group| group.get(name))
            .and_then(Value::as_str)
            .filter(|template| !template.trim().is_empty())
            .ok_or_else(|| ConfigError::EndpointNotFound {
                group: group.to_string(),
                name: name.to_string(),
            })
    }

    /// Resolve an endpoint template, substituting `{placeholder}` segments
    pub fn get_endpoint(
        &self,
        group: &str,
        name: &str,
        placeholders: &Placeholders,
    ) -> ConfigResult<String> {
        let template = self.endpoint_template(group, name)?;
        render_template(template, placeholders)
    }

    /// Shorthand for endpoints in the `base_api` group
    pub fn get_api_endpoint(&self, name: &str, placeholders: &Placeholders) -> ConfigResult<String> {
        self.get_endpoint(API_ENDPOINT_GROUP, name, placeholders)
    }

    /// Login endpoint path: `endpoints.auth.login`, falling back to `endpoints.base_api.login`
    pub fn login_endpoint(&self) -> Option<&str> {
        self.endpoint_template("auth", "login")
            .or_else(|_| self.endpoint_template(API_ENDPOINT_GROUP, "login"))
            .ok()
    }

    /// Stub server URL (`wiremock_url`)
    pub fn stub_url(&self) -> ConfigResult<&str> {
        self.get_str("wiremock_url")
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ConfigError::MissingKey("wiremock_url".to_string()))
    }

    /// Literal bearer token, when configured and non-empty
    pub fn auth_token(&self) -> Option<&str> {
        self.get_str("auth_token")
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Login credentials, when configured
    pub fn auth_credentials(&self) -> ConfigResult<Option<AuthCredentials>> {
        match self.values.get("auth_credentials") {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| ConfigError::InvalidValue {
                    key: "auth_credentials".to_string(),
                    message: e.to_string(),
                }),
        }
    }

    /// WebSocket endpoint, when configured
    pub fn websocket_url(&self) -> Option<&str> {
        self.get_str("websocket_url")
    }

    /// Security scanner proxy URL
    pub fn zap_url(&self) -> &str {
        self.get_str("zap_url").unwrap_or(DEFAULT_ZAP_URL)
    }
}
