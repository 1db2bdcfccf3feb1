//! ZAP JSON API client

use crate::alert::Alert;
use crate::error::ScanError;
use reqwest::Client;
use serde_json::Value as JsonValue;
use tracing::debug;

/// Client for the scanner's JSON API
#[derive(Debug, Clone)]
pub struct ZapClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl ZapClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ScanError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn call(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<reqwest::Response, ScanError> {
        let mut query: Vec<(&str, &str)> = params.to_vec();
        if let Some(key) = &self.api_key {
            query.push(("apikey", key.as_str()));
        }

        debug!("Scanner call {}", endpoint);
        Ok(self
            .client
            .get(format!("{}{}", self.base_url, endpoint))
            .query(&query)
            .send()
            .await?)
    }

    async fn call_json(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<JsonValue, ScanError> {
        let response = self.call(endpoint, params).await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ScanError::Api {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| ScanError::InvalidResponse {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }

    fn field<'a>(endpoint: &str, body: &'a JsonValue, name: &str) -> Result<&'a str, ScanError> {
        body.get(name)
            .and_then(JsonValue::as_str)
            .ok_or_else(|| ScanError::InvalidResponse {
                endpoint: endpoint.to_string(),
                message: format!("missing '{}' field", name),
            })
    }

    fn percent(endpoint: &str, body: &JsonValue) -> Result<u8, ScanError> {
        let status = Self::field(endpoint, body, "status")?;
        status
            .parse::<u8>()
            .map(|pct| pct.min(100))
            .map_err(|_| ScanError::InvalidResponse {
                endpoint: endpoint.to_string(),
                message: format!("status '{}' is not a percentage", status),
            })
    }

    /// Scanner version; fails when the scanner is not running
    pub async fn version(&self) -> Result<String, ScanError> {
        const ENDPOINT: &str = "/JSON/core/view/version/";
        let body = self.call_json(ENDPOINT, &[]).await?;
        Ok(Self::field(ENDPOINT, &body, "version")?.to_string())
    }

    /// Request `url` through the scanner so it lands in the site tree
    pub async fn access_url(&self, url: &str) -> Result<(), ScanError> {
        self.call_json(
            "/JSON/core/action/accessUrl/",
            &[("url", url), ("followRedirects", "false")],
        )
        .await
        .map(|_| ())
    }

    pub async fn spider_scan(&self, url: &str) -> Result<String, ScanError> {
        const ENDPOINT: &str = "/JSON/spider/action/scan/";
        let body = self.call_json(ENDPOINT, &[("url", url)]).await?;
        Ok(Self::field(ENDPOINT, &body, "scan")?.to_string())
    }

    pub async fn spider_status(&self, scan_id: &str) -> Result<u8, ScanError> {
        const ENDPOINT: &str = "/JSON/spider/view/status/";
        let body = self.call_json(ENDPOINT, &[("scanId", scan_id)]).await?;
        Self::percent(ENDPOINT, &body)
    }

    /// Start an active scan of `url`, returning the scan id
    pub async fn active_scan(&self, url: &str) -> Result<String, ScanError> {
        const ENDPOINT: &str = "/JSON/ascan/action/scan/";
        let not_started = |message: String| ScanError::ScanNotStarted {
            target: url.to_string(),
            message,
        };

        let body = match self.call_json(ENDPOINT, &[("url", url)]).await {
            Ok(body) => body,
            // The scanner reports unknown targets as an API error
            Err(ScanError::Api { body, .. }) if body.contains("does_not_exist") => {
                return Err(not_started(body));
            }
            Err(e) => return Err(e),
        };

        match Self::field(ENDPOINT, &body, "scan")? {
            "does_not_exist" => Err(not_started("target is not in the site tree".to_string())),
            scan_id => Ok(scan_id.to_string()),
        }
    }

    /// Active scan progress in percent
    pub async fn active_scan_status(&self, scan_id: &str) -> Result<u8, ScanError> {
        const ENDPOINT: &str = "/JSON/ascan/view/status/";
        let body = self.call_json(ENDPOINT, &[("scanId", scan_id)]).await?;
        Self::percent(ENDPOINT, &body)
    }

    /// Alerts raised for `base_url`
    pub async fn alerts(&self, base_url: &str) -> Result<Vec<Alert>, ScanError> {
        const ENDPOINT: &str = "/JSON/core/view/alerts/";
        let body = self.call_json(ENDPOINT, &[("baseurl", base_url)]).await?;
        let alerts = body.get("alerts").cloned().unwrap_or(JsonValue::Array(Vec::new()));
        serde_json::from_value(alerts).map_err(|e| ScanError::InvalidResponse {
            endpoint: ENDPOINT.to_string(),
            message: e.to_string(),
        })
    }

    /// HTML report of everything the scanner found
    pub async fn html_report(&self) -> Result<String, ScanError> {
        const ENDPOINT: &str = "/OTHER/core/other/htmlreport/";
        let response = self.call(ENDPOINT, &[]).await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ScanError::Api {
                endpoint: ENDPOINT.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}
