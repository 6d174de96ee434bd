//! Refresh orchestration.
//!
//! One pass walks the states
//! `Idle → [Uploading] → FetchingSummary → FetchingBots → Aggregating → Rendering → Idle`.
//! A failed read ends the pass in `Failed`, marks the view stale and leaves the
//! previously rendered charts, table and narrative untouched.

use crate::aggregate::{aggregate, Aggregation};
use crate::backend::{ClassificationStore, IngestionService, LogUpload, UploadReceipt};
use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::present::{ids, table_rows, DisplaySummary};
use crate::record::BotRecord;
use crate::registry::ChartRegistry;
use crate::render::{ChartRenderer, ChartSpec, ViewSurface};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Where a refresh pass currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Idle,
    Uploading,
    FetchingSummary,
    FetchingBots,
    Aggregating,
    Rendering,
    /// The named backend read failed; the last good render is still shown.
    Failed { operation: &'static str },
}

impl RefreshState {
    /// Name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            RefreshState::Idle => "idle",
            RefreshState::Uploading => "uploading",
            RefreshState::FetchingSummary => "fetching_summary",
            RefreshState::FetchingBots => "fetching_bots",
            RefreshState::Aggregating => "aggregating",
            RefreshState::Rendering => "rendering",
            RefreshState::Failed { .. } => "failed",
        }
    }
}

/// Request to run a pass.
#[derive(Debug, Clone)]
pub enum Trigger {
    Refresh,
    /// Upload a log, then refresh
    Upload(LogUpload),
}

/// What a successful pass displayed.
#[derive(Debug, Clone)]
pub struct RefreshReport {
    pub summary: DisplaySummary,
    pub bots: usize,
    pub aggregation: Aggregation,
    /// Present when the pass started with a successful upload
    pub upload: Option<UploadReceipt>,
}

/// Drives the view from the classification backend.
pub struct Dashboard<R: ChartRenderer, V: ViewSurface> {
    config: DashboardConfig,
    store: Arc<dyn ClassificationStore>,
    ingestion: Option<Arc<dyn IngestionService>>,
    renderer: R,
    view: V,
    charts: ChartRegistry<R::Handle>,
    state: RefreshState,
    /// States entered during the most recent pass
    transitions: Vec<RefreshState>,
    stale: bool,
}

impl<R: ChartRenderer, V: ViewSurface> Dashboard<R, V> {
    /// Create an idle dashboard with no charts bound.
    pub fn new(
        config: DashboardConfig,
        store: Arc<dyn ClassificationStore>,
        renderer: R,
        view: V,
    ) -> Self {
        Self {
            config,
            store,
            ingestion: None,
            renderer,
            view,
            charts: ChartRegistry::new(),
            state: RefreshState::Idle,
            transitions: Vec::new(),
            stale: false,
        }
    }

    /// Enable log uploads.
    pub fn with_ingestion(mut self, ingestion: Arc<dyn IngestionService>) -> Self {
        self.ingestion = Some(ingestion);
        self
    }

    /// Current state.
    pub fn state(&self) -> RefreshState {
        self.state
    }

    /// States entered during the most recent pass.
    pub fn transitions(&self) -> &[RefreshState] {
        &self.transitions
    }

    /// True after a failed pass, until the next successful one.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Live chart handles by slot.
    pub fn charts(&self) -> &ChartRegistry<R::Handle> {
        &self.charts
    }

    /// The chart renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The view surface.
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Active configuration.
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Run one pass without uploading.
    pub async fn refresh(&mut self) -> Result<RefreshReport> {
        self.run_pass(None).await
    }

    /// Upload a log, then run a pass. Upload failure does not stop the pass.
    pub async fn refresh_with_upload(&mut self, upload: LogUpload) -> Result<RefreshReport> {
        self.run_pass(Some(upload)).await
    }

    /// Fetch a single bot for the detail view.
    pub async fn bot_detail(&self, id: &str) -> Result<Option<BotRecord>> {
        let bot = self.store.bot(id).await?;
        debug!(id, found = bot.is_some(), "Bot detail lookup complete");
        Ok(bot)
    }

    /// Process triggers until the channel closes. Returns the number of passes run.
    ///
    /// Triggers run strictly in order, one pass at a time. With
    /// `refresh.coalesce` set, triggers that queue up during a pass are
    /// collapsed by [`coalesce`].
    pub async fn run(&mut self, mut triggers: mpsc::Receiver<Trigger>) -> usize {
        let mut pending: VecDeque<Trigger> = VecDeque::new();
        let mut passes = 0;

        loop {
            let trigger = match pending.pop_front() {
                Some(t) => t,
                None => match triggers.recv().await {
                    Some(t) => t,
                    None => break,
                },
            };

            let result = match trigger {
                Trigger::Refresh => self.refresh().await,
                Trigger::Upload(upload) => self.refresh_with_upload(upload).await,
            };
            passes += 1;

            if let Err(e) = result {
                warn!(error = %e, "Refresh failed, previous render kept");
            }

            while let Ok(t) = triggers.try_recv() {
                pending.push_back(t);
            }
            if self.config.refresh.coalesce {
                let dropped = coalesce(&mut pending);
                if dropped > 0 {
                    debug!(dropped, queued = pending.len(), "Coalesced refresh triggers");
                }
            }
        }

        info!(passes, "Refresh loop finished");
        passes
    }

    /// Destroy every live chart.
    pub fn shutdown(&mut self) {
        self.charts.clear_all();
        self.transition(RefreshState::Idle);
    }

    fn transition(&mut self, next: RefreshState) {
        debug!(from = self.state.as_str(), to = next.as_str(), "Dashboard state");
        self.state = next;
        self.transitions.push(next);
    }

    fn fail(&mut self, err: DashboardError) -> DashboardError {
        let operation = err.operation().unwrap_or("refresh");
        self.transition(RefreshState::Failed { operation });
        self.stale = true;
        self.view.set_text(
            ids::STATUS,
            &format!("stale: {} failed, showing last successful data", operation),
        );
        warn!(operation, error = %err, "Backend read failed");
        err
    }

    async fn run_pass(&mut self, upload: Option<LogUpload>) -> Result<RefreshReport> {
        self.transitions.clear();
        let mut receipt = None;

        if let Some(upload) = upload {
            self.transition(RefreshState::Uploading);
            receipt = self.upload(upload).await;
        }

        self.transition(RefreshState::FetchingSummary);
        let summary = match self.store.summary().await {
            Ok(s) => s,
            Err(e) => return Err(self.fail(e)),
        };
        let display = DisplaySummary::from(&summary);
        for (field, value) in display.fields() {
            self.view.set_text(field, &value);
        }

        self.transition(RefreshState::FetchingBots);
        let bots = match self.store.bots().await {
            Ok(b) => b,
            Err(e) => return Err(self.fail(e)),
        };
        self.view.set_rows(ids::BOTS_TABLE, table_rows(&bots));

        self.transition(RefreshState::Aggregating);
        let aggregation = aggregate(&bots, &self.config.thresholds, &self.config.narrative);

        self.transition(RefreshState::Rendering);
        self.render(&aggregation);

        if self.stale {
            self.stale = false;
            self.view.set_text(ids::STATUS, "live");
        }
        self.transition(RefreshState::Idle);

        info!(
            bots = bots.len(),
            ai_like = aggregation.narrative.ai_like,
            suspicious = aggregation.narrative.suspicious,
            buckets = ?aggregation.buckets,
            "Dashboard refreshed"
        );

        Ok(RefreshReport {
            summary: display,
            bots: bots.len(),
            aggregation,
            upload: receipt,
        })
    }

    async fn upload(&self, upload: LogUpload) -> Option<UploadReceipt> {
        let Some(ingestion) = self.ingestion.clone() else {
            warn!(file = %upload.file_name, "No ingestion service configured, skipping upload");
            return None;
        };

        let file = upload.file_name.clone();
        match ingestion.upload_log(upload).await {
            Ok(receipt) => {
                info!(
                    file = %file,
                    total_lines = receipt.total_lines,
                    processed_bots = receipt.processed_bots,
                    "Log uploaded"
                );
                Some(receipt)
            }
            Err(e) => {
                warn!(file = %file, error = %e, "Log upload failed, refreshing anyway");
                None
            }
        }
    }

    fn render(&mut self, aggregation: &Aggregation) {
        for spec in ChartSpec::all_from(aggregation) {
            let slot = spec.slot;
            let renderer = &mut self.renderer;
            self.charts.replace_with(slot, || renderer.create(spec));
        }
        self.view
            .set_html(ids::INTELLIGENCE_SUMMARY, &aggregation.narrative.to_html());
    }
}

/// Collapse queued triggers.
///
/// Uploads are kept in order. Every plain refresh is dropped, and a single one
/// is re-queued at the end if any refresh arrived after the last upload, since
/// an upload pass already refreshes. Returns the number of triggers dropped.
pub fn coalesce(pending: &mut VecDeque<Trigger>) -> usize {
    let last_upload = pending
        .iter()
        .rposition(|t| matches!(t, Trigger::Upload(_)));
    let trailing_refresh = pending
        .iter()
        .skip(last_upload.map_or(0, |i| i + 1))
        .any(|t| matches!(t, Trigger::Refresh));

    let before = pending.len();
    pending.retain(|t| matches!(t, Trigger::Upload(_)));
    if trailing_refresh {
        pending.push_back(Trigger::Refresh);
    }
    before - pending.len()
}
