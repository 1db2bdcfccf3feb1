//! Client for the stub server admin API

use crate::error::StubError;
use crate::mapping::StubMapping;
use reqwest::{redirect, Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

/// Admin API of a WireMock-compatible stub server
#[derive(Debug, Clone)]
pub struct StubAdmin {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct MappingList {
    #[serde(default)]
    mappings: Vec<StubMapping>,
}

impl StubAdmin {
    /// Redirects are never followed: a 302 from `/__admin` already means "up"
    pub fn new(base_url: impl Into<String>) -> Result<Self, StubError> {
        let client = Client::builder().redirect(redirect::Policy::none()).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn admin_url(&self, path: &str) -> String {
        format!("{}/__admin{}", self.base_url, path)
    }

    /// Whether `GET /__admin` answers 200 or 302
    pub async fn is_reachable(&self) -> bool {
        match self.client.get(self.admin_url("")).send().await {
            Ok(response) => {
                let status = response.status();
                debug!("Stub admin answered {}", status);
                status == StatusCode::OK || status == StatusCode::FOUND
            }
            Err(e) => {
                debug!("Stub admin not reachable: {}", e);
                false
            }
        }
    }

    /// Register one mapping; only 200 and 201 count as accepted
    pub async fn register(&self, mapping: &StubMapping) -> Result<(), StubError> {
        let response = self
            .client
            .post(self.admin_url("/mappings"))
            .json(mapping)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            return Err(StubError::Rejected {
                operation: "mapping registration",
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        info!("Registered stub mapping {}", mapping.describe());
        Ok(())
    }

    /// Drop registered mappings, restoring those loaded from files
    pub async fn reset_mappings(&self) -> Result<(), StubError> {
        let response = self
            .client
            .post(self.admin_url("/mappings/reset"))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StubError::Rejected {
                operation: "mapping reset",
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        debug!("Stub mappings reset");
        Ok(())
    }

    /// Mappings currently known to the server
    pub async fn list_mappings(&self) -> Result<Vec<StubMapping>, StubError> {
        let response = self.client.get(self.admin_url("/mappings")).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StubError::Rejected {
                operation: "mapping listing",
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let text = response.text().await?;
        let list: MappingList =
            serde_json::from_str(&text).map_err(|e| StubError::InvalidResponse(e.to_string()))?;
        Ok(list.mappings)
    }
}
