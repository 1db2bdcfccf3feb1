//! Response capability trait and the concrete response type

use crate::errors::HttpError;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

/// What a test can ask of a response
pub trait HttpResponse {
    /// Status code
    fn status(&self) -> u16;

    /// Raw body bytes
    fn body(&self) -> &[u8];

    /// Header value by case-insensitive name
    fn header(&self, name: &str) -> Option<&str>;

    /// Body decoded as UTF-8, lossily
    fn text(&self) -> String {
        String::from_utf8_lossy(self.body()).into_owned()
    }

    /// Body decoded as JSON
    fn json(&self) -> Result<JsonValue, HttpError> {
        serde_json::from_slice(self.body()).map_err(|source| HttpError::InvalidJson {
            status: self.status(),
            source,
        })
    }

    /// Body decoded into a typed value
    fn json_as<T: DeserializeOwned>(&self) -> Result<T, HttpError>
    where
        Self: Sized,
    {
        serde_json::from_slice(self.body()).map_err(|source| HttpError::InvalidJson {
            status: self.status(),
            source,
        })
    }

    fn is_success(&self) -> bool {
        (200..300).contains(&self.status())
    }
}

/// A fully read response from the API under test
#[derive(Debug, Clone)]
pub struct ApiResponse {
    url: String,
    status: u16,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(url: impl Into<String>, status: u16, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            url: url.into(),
            status,
            headers,
            body,
        }
    }

    /// Read the whole body of a `reqwest` response
    pub(crate) async fn read(response: reqwest::Response) -> Result<Self, HttpError> {
        let url = response.url().to_string();
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        Ok(Self::new(url, status, headers, body))
    }

    /// Final URL of the request
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

impl HttpResponse for ApiResponse {
    fn status(&self) -> u16 {
        self.status
    }

    fn body(&self) -> &[u8] {
        &self.body
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}
