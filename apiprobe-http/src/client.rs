//! API client implementation

use crate::errors::HttpError;
use crate::response::{ApiResponse, HttpResponse};
use crate::types::{Headers, HttpMethod};
use apiprobe_config::ConfigDocument;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION},
    Client,
};
use serde_json::{json, Value as JsonValue};
use std::str::FromStr;
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!("apiprobe/", env!("CARGO_PKG_VERSION"));

/// One HTTP session against the API under test
///
/// Every request carries `Authorization: Bearer <token>` while a token is
/// held. Caller headers are merged over that default and win on collision.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client with a literal bearer token (or none)
    pub fn with_token(
        base_url: impl Into<String>,
        token: Option<String>,
    ) -> Result<Self, HttpError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    /// Create a client from configuration
    ///
    /// A configured `auth_token` is used as is. Otherwise, when credentials
    /// and a login endpoint are configured, one login round trip is made.
    /// A failed login is logged and leaves the client without a token.
    pub async fn from_config(
        base_url: impl Into<String>,
        config: &ConfigDocument,
    ) -> Result<Self, HttpError> {
        let token = config.auth_token().map(str::to_string);
        let mut client = Self::with_token(base_url, token)?;

        if client.token.is_none() {
            match client.acquire_token(config).await {
                Ok(token) => client.token = token,
                Err(e) => warn!("{}", e),
            }
        }

        Ok(client)
    }

    /// Perform the login round trip and return the token
    ///
    /// `Ok(None)` means no credentials or no login endpoint are configured.
    pub async fn acquire_token(&self, config: &ConfigDocument) -> Result<Option<String>, HttpError> {
        let Some(credentials) = config.auth_credentials()? else {
            return Ok(None);
        };
        let Some(login_path) = config.login_endpoint() else {
            debug!("No login endpoint configured, skipping authentication");
            return Ok(None);
        };

        let body = json!({
            "username": credentials.username,
            "password": credentials.password,
        });

        let response = self
            .client
            .post(self.url_for(login_path))
            .json(&body)
            .send()
            .await
            .map_err(|e| HttpError::Authentication(format!("login request failed: {}", e)))?;
        let response = ApiResponse::read(response)
            .await
            .map_err(|e| HttpError::Authentication(format!("login response unreadable: {}", e)))?;

        if !response.is_success() {
            return Err(HttpError::Authentication(format!(
                "login returned status {}",
                response.status()
            )));
        }

        let token = response
            .json()
            .ok()
            .and_then(|body| body.get("token").and_then(JsonValue::as_str).map(str::to_string))
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                HttpError::Authentication("login response has no token field".to_string())
            })?;

        info!("Authenticated against {}", login_path);
        Ok(Some(token))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Replace the held token
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token.filter(|t| !t.is_empty());
    }

    /// Absolute URL: base URL followed by the endpoint path
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str, headers: Option<&Headers>) -> Result<ApiResponse, HttpError> {
        self.request(HttpMethod::Get, path, None, headers).await
    }

    pub async fn post(
        &self,
        path: &str,
        body: Option<&JsonValue>,
        headers: Option<&Headers>,
    ) -> Result<ApiResponse, HttpError> {
        self.request(HttpMethod::Post, path, body, headers).await
    }

    pub async fn put(
        &self,
        path: &str,
        body: Option<&JsonValue>,
        headers: Option<&Headers>,
    ) -> Result<ApiResponse, HttpError> {
        self.request(HttpMethod::Put, path, body, headers).await
    }

    pub async fn patch(
        &self,
        path: &str,
        body: Option<&JsonValue>,
        headers: Option<&Headers>,
    ) -> Result<ApiResponse, HttpError> {
        self.request(HttpMethod::Patch, path, body, headers).await
    }

    pub async fn delete(
        &self,
        path: &str,
        headers: Option<&Headers>,
    ) -> Result<ApiResponse, HttpError> {
        self.request(HttpMethod::Delete, path, None, headers).await
    }

    /// Issue one request; no retries and no timeout beyond the transport default
    pub async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&JsonValue>,
        headers: Option<&Headers>,
    ) -> Result<ApiResponse, HttpError> {
        let url = self.url_for(path);
        debug!("Building {} request to {}", method, url);

        let mut request = self
            .client
            .request(reqwest::Method::from(method), &url)
            .headers(self.merged_headers(headers)?);

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let response = ApiResponse::read(response).await?;

        info!("{} {} -> {}", method, url, response.status());
        Ok(response)
    }

    /// Default headers with caller headers layered on top
    fn merged_headers(&self, headers: Option<&Headers>) -> Result<HeaderMap, HttpError> {
        let mut header_map = HeaderMap::new();

        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| HttpError::InvalidHeaderValue(AUTHORIZATION.to_string()))?;
            header_map.insert(AUTHORIZATION, value);
        }

        if let Some(headers) = headers {
            for (key, value) in headers {
                let header_name = HeaderName::from_str(key)
                    .map_err(|_| HttpError::InvalidHeaderName(key.to_string()))?;
                let header_value = HeaderValue::from_str(value)
                    .map_err(|_| HttpError::InvalidHeaderValue(key.to_string()))?;
                header_map.insert(header_name, header_value);
            }
        }

        Ok(header_map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_concatenation() {
        let client = ApiClient::with_token("https://reqres.in/api", None).unwrap();
        assert_eq!(client.url_for("/users?page=2"), "https://reqres.in/api/users?page=2");
    }

    #[test]
    fn test_default_authorization_header() {
        let client = ApiClient::with_token("http://localhost", Some("abc".into())).unwrap();
        let headers = client.merged_headers(None).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc");
    }

    #[test]
    fn test_caller_headers_win_case_insensitively() {
        let client = ApiClient::with_token("http://localhost", Some("abc".into())).unwrap();
        let mut caller = Headers::new();
        caller.insert("authorization".to_string(), "Bearer override".to_string());
        caller.insert("X-Trace".to_string(), "1".to_string());

        let headers = client.merged_headers(Some(&caller)).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer override");
        assert_eq!(headers.get_all(AUTHORIZATION).iter().count(), 1);
        assert_eq!(headers.get("x-trace").unwrap(), "1");
    }

    #[test]
    fn test_no_token_no_authorization() {
        let client = ApiClient::with_token("http://localhost", Some(String::new())).unwrap();
        assert!(client.token().is_none());
        assert!(client.merged_headers(None).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_header_name() {
        let client = ApiClient::with_token("http://localhost", None).unwrap();
        let mut caller = Headers::new();
        caller.insert("bad header".to_string(), "x".to_string());
        assert!(matches!(
            client.merged_headers(Some(&caller)),
            Err(HttpError::InvalidHeaderName(_))
        ));
    }
}
