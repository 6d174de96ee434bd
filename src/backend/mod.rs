//! Classification backend collaborators.
//!
//! The dashboard reads classification results through [`ClassificationStore`]
//! and pushes new logs through [`IngestionService`]. Both are async and may
//! fail; everything downstream of them is pure.

pub mod http;

pub use http::HttpBackend;

use crate::error::Result;
use crate::record::{BotRecord, SummaryRecord};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Outcome of a log upload as reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadReceipt {
    pub message: String,
    pub upload_id: Option<serde_json::Value>,
    pub total_lines: u64,
    pub processed_bots: u64,
}

/// A log file to hand to the ingestion service.
#[derive(Debug, Clone)]
pub struct LogUpload {
    pub file_name: String,
    pub contents: Vec<u8>,
}

impl LogUpload {
    /// Upload from in-memory contents.
    pub fn new(file_name: impl Into<String>, contents: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            contents,
        }
    }

    /// Read a log file from disk.
    pub async fn from_path(path: &std::path::Path) -> Result<Self> {
        let contents = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.log".to_string());
        Ok(Self::new(file_name, contents))
    }
}

/// Read side of the classification backend.
#[async_trait]
pub trait ClassificationStore: Send + Sync {
    /// Population-wide summary.
    async fn summary(&self) -> Result<SummaryRecord>;

    /// Every classified bot, in backend order.
    async fn bots(&self) -> Result<Vec<BotRecord>>;

    /// One bot by backend identifier. `None` when it does not exist.
    async fn bot(&self, id: &str) -> Result<Option<BotRecord>>;
}

/// Accepts raw access logs for classification.
#[async_trait]
pub trait IngestionService: Send + Sync {
    async fn upload_log(&self, upload: LogUpload) -> Result<UploadReceipt>;
}
