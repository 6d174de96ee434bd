//! Analytics dashboard for classified AI crawler traffic.
//!
//! Fetches classification results from the backend and turns them into
//! score distributions, per-bot series, depth/score correlation points and a
//! narrative summary, then drives chart and view sinks with them.
//!
//! # Features
//!
//! - Fixed-width score histogram
//! - Per-bot depth, burst and scatter series
//! - Threshold-based narrative with optional computed correlation
//! - Explicit refresh state machine with stale-data handling
//! - Single-owner chart slots, destroyed before re-creation
//!
//! # Example
//!
//! ```ignore
//! use crawler_intel_dashboard::{Dashboard, DashboardConfig, HttpBackend};
//! use crawler_intel_dashboard::render::{ConsoleView, TerminalRenderer};
//! use std::sync::Arc;
//!
//! let config = DashboardConfig::default();
//! let backend = Arc::new(HttpBackend::new(&config.api)?);
//! let mut dashboard = Dashboard::new(
//!     config,
//!     backend,
//!     TerminalRenderer::stdout(),
//!     ConsoleView::stdout(),
//! );
//! dashboard.refresh().await?;
//! ```

pub mod aggregate;
pub mod backend;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod present;
pub mod record;
pub mod registry;
pub mod render;

pub use backend::{ClassificationStore, HttpBackend, IngestionService, LogUpload, UploadReceipt};
pub use config::DashboardConfig;
pub use dashboard::{Dashboard, RefreshReport, RefreshState, Trigger};
pub use error::DashboardError;
pub use record::{BotRecord, BotType, SummaryRecord};
