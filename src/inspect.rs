use crate::env_keys::ENV_MOCK_INSPECT;
use crate::error::InspectError;
use serde::{Deserialize, Serialize};

const URI: &str = "https://searchconsole.googleapis.com/v1/urlInspection/index:inspect";

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct InspectRequest<'a> {
    inspection_url: &'a str,
    site_url: &'a str,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InspectResponse {
    pub inspection_result: Option<InspectionResult>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InspectionResult {
    pub inspection_result_link: Option<String>,
    pub index_status_result: Option<IndexStatusResult>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct IndexStatusResult {
    pub verdict: Option<String>,
    pub coverage_state: Option<String>,
}

impl InspectResponse {
    pub fn verdict(&self) -> Option<&str> {
        self.inspection_result
            .as_ref()?
            .index_status_result
            .as_ref()?
            .verdict
            .as_deref()
    }
}

/// Something that can submit one URL for inspection.
#[allow(async_fn_in_trait)]
pub trait Inspector {
    async fn inspect(&self, inspection_url: &str) -> Result<InspectResponse, InspectError>;
}

/// Search Console URL Inspection API client.
pub struct SearchConsole {
    token: String,
    site_url: String,
    endpoint: String,
}

impl SearchConsole {
    pub fn new(token: impl Into<String>, site_url: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            site_url: site_url.into(),
            endpoint: URI.to_owned(),
        }
    }

    /// Send requests to `endpoint` instead of the public API.
    #[cfg(test)]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl Inspector for SearchConsole {
    async fn inspect(&self, inspection_url: &str) -> Result<InspectResponse, InspectError> {
        if let Ok(path) = std::env::var(ENV_MOCK_INSPECT) {
            let data = std::fs::read_to_string(path)?;
            return Ok(serde_json::from_str(&data)?);
        }

        let payload = InspectRequest {
            inspection_url,
            site_url: &self.site_url,
        };
        tracing::debug!("POST {} for {}", self.endpoint, inspection_url);
        let mut res = surf::post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.token))
            .body_json(&payload)?
            .await?;
        let body = res.body_string().await?;
        if !res.status().is_success() {
            return Err(InspectError::Status {
                status: res.status().into(),
                body: body.trim().to_owned(),
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}
