//! REST adapter for the classification backend.
//!
//! Endpoints:
//! - `POST /upload` multipart, field `file`
//! - `GET /summary`
//! - `GET /bots`
//! - `GET /bot/{id}`

use super::{ClassificationStore, IngestionService, LogUpload, UploadReceipt};
use crate::config::ApiConfig;
use crate::error::{DashboardError, Result};
use crate::record::{BotRecord, SummaryRecord};
use async_trait::async_trait;
use reqwest::{multipart, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Classification backend reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Build a client with the configured timeout.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|source| DashboardError::Transport {
                operation: "client",
                source,
            })?;
        Ok(Self::with_client(client, &config.base_url))
    }

    /// Wrap an existing client.
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a backend path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get(&self, operation: &'static str, path: &str) -> Result<Response> {
        let url = self.endpoint(path);
        debug!(operation, url = %url, "GET");
        self.client
            .get(&url)
            .send()
            .await
            .map_err(|source| DashboardError::Transport { operation, source })
    }
}

/// Fail on non-success status, otherwise decode the JSON body.
async fn decode<T: DeserializeOwned>(operation: &'static str, response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(DashboardError::Status {
            operation,
            status: status.as_u16(),
        });
    }
    let body = response
        .bytes()
        .await
        .map_err(|source| DashboardError::Transport { operation, source })?;
    serde_json::from_slice(&body).map_err(|source| DashboardError::Decode { operation, source })
}

#[async_trait]
impl ClassificationStore for HttpBackend {
    async fn summary(&self) -> Result<SummaryRecord> {
        let response = self.get("summary", "summary").await?;
        let summary: Option<SummaryRecord> = decode("summary", response).await?;
        Ok(summary.unwrap_or_default())
    }

    async fn bots(&self) -> Result<Vec<BotRecord>> {
        let response = self.get("bots", "bots").await?;
        let bots: Option<Vec<BotRecord>> = decode("bots", response).await?;
        Ok(bots.unwrap_or_default())
    }

    async fn bot(&self, id: &str) -> Result<Option<BotRecord>> {
        let response = self.get("bot", &format!("bot/{}", id)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode("bot", response).await
    }
}

#[async_trait]
impl IngestionService for HttpBackend {
    async fn upload_log(&self, upload: LogUpload) -> Result<UploadReceipt> {
        let operation = "upload";
        let url = self.endpoint("upload");
        debug!(
            url = %url,
            file = %upload.file_name,
            bytes = upload.contents.len(),
            "POST"
        );

        let part = multipart::Part::bytes(upload.contents).file_name(upload.file_name);
        let form = multipart::Form::new().part("file", part);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|source| DashboardError::Transport { operation, source })?;

        decode(operation, response).await
    }
}
