//! Rendering sinks the dashboard draws into.
//!
//! The dashboard never draws itself. It builds a [`ChartSpec`] per chart slot
//! and hands it to a [`ChartRenderer`], and writes text, rows and markup to a
//! [`ViewSurface`].

pub mod terminal;

pub use terminal::{ConsoleView, TerminalRenderer};

use crate::aggregate::{Aggregation, ScatterPoint, BUCKET_LABELS};
use crate::present::TableRow;
use serde::Serialize;

/// Named chart position. Each holds at most one live chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartSlot {
    ScoreDistribution,
    Depth,
    Burst,
    Scatter,
}

impl ChartSlot {
    pub const ALL: [ChartSlot; 4] = [
        ChartSlot::ScoreDistribution,
        ChartSlot::Depth,
        ChartSlot::Burst,
        ChartSlot::Scatter,
    ];

    /// Position of the slot in [`ChartSlot::ALL`].
    pub fn index(self) -> usize {
        match self {
            ChartSlot::ScoreDistribution => 0,
            ChartSlot::Depth => 1,
            ChartSlot::Burst => 2,
            ChartSlot::Scatter => 3,
        }
    }

    /// Stable name used in logs and headers.
    pub fn as_str(self) -> &'static str {
        match self {
            ChartSlot::ScoreDistribution => "score_distribution",
            ChartSlot::Depth => "depth",
            ChartSlot::Burst => "burst",
            ChartSlot::Scatter => "scatter",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Scatter,
}

/// Data plotted by a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChartSeries {
    Values(Vec<f64>),
    Points(Vec<ScatterPoint>),
}

impl ChartSeries {
    /// Number of plotted values or points.
    pub fn len(&self) -> usize {
        match self {
            ChartSeries::Values(v) => v.len(),
            ChartSeries::Points(p) => p.len(),
        }
    }

    /// True when there is nothing to plot.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Presentation options for one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartStyle {
    /// Dataset legend
    pub dataset_label: &'static str,
    /// Fill color, `#rrggbb`
    pub color: &'static str,
    pub x_title: Option<&'static str>,
    pub y_title: Option<&'static str>,
}

/// Everything a renderer needs to draw one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub slot: ChartSlot,
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub series: ChartSeries,
    pub style: ChartStyle,
}

impl ChartSpec {
    /// Bar chart of bot counts per score bucket.
    pub fn score_distribution(buckets: &[u32]) -> Self {
        Self {
            slot: ChartSlot::ScoreDistribution,
            kind: ChartKind::Bar,
            labels: BUCKET_LABELS.iter().map(|l| l.to_string()).collect(),
            series: ChartSeries::Values(buckets.iter().map(|c| f64::from(*c)).collect()),
            style: ChartStyle {
                dataset_label: "Bots",
                color: "#FF6B35",
                x_title: None,
                y_title: None,
            },
        }
    }

    /// Bar chart of average URL depth per bot.
    pub fn depth(labels: &[String], depths: &[f64]) -> Self {
        Self {
            slot: ChartSlot::Depth,
            kind: ChartKind::Bar,
            labels: labels.to_vec(),
            series: ChartSeries::Values(depths.to_vec()),
            style: ChartStyle {
                dataset_label: "Avg Depth",
                color: "#ffa366",
                x_title: None,
                y_title: None,
            },
        }
    }

    /// Bar chart of burst rate per bot.
    pub fn burst(labels: &[String], bursts: &[f64]) -> Self {
        Self {
            slot: ChartSlot::Burst,
            kind: ChartKind::Bar,
            labels: labels.to_vec(),
            series: ChartSeries::Values(bursts.to_vec()),
            style: ChartStyle {
                dataset_label: "Burst Rate",
                color: "#ff944d",
                x_title: None,
                y_title: None,
            },
        }
    }

    /// Depth vs score scatter.
    pub fn scatter(points: &[ScatterPoint]) -> Self {
        Self {
            slot: ChartSlot::Scatter,
            kind: ChartKind::Scatter,
            labels: Vec::new(),
            series: ChartSeries::Points(points.to_vec()),
            style: ChartStyle {
                dataset_label: "Depth vs AI Score",
                color: "#FF6B35",
                x_title: Some("Avg URL Depth"),
                y_title: Some("AI Score"),
            },
        }
    }

    /// Specs for every slot, in [`ChartSlot::ALL`] order.
    pub fn all_from(aggregation: &Aggregation) -> [ChartSpec; 4] {
        let series = &aggregation.series;
        [
            ChartSpec::score_distribution(&aggregation.buckets),
            ChartSpec::depth(&series.index_labels, &series.depths),
            ChartSpec::burst(&series.index_labels, &series.bursts),
            ChartSpec::scatter(&series.scatter_pairs),
        ]
    }
}

/// A live chart owned by the dashboard.
pub trait ChartHandle: Send {
    /// Release the chart and its draw surface.
    fn destroy(self);
}

/// Draws charts and hands back ownership of them.
pub trait ChartRenderer: Send {
    type Handle: ChartHandle;

    /// Draw a chart. An empty series must draw an empty axis.
    fn create(&mut self, spec: ChartSpec) -> Self::Handle;
}

/// Write-only binding to the page or terminal.
pub trait ViewSurface: Send {
    fn set_text(&mut self, field: &str, value: &str);

    /// Replace every row of the table.
    fn set_rows(&mut self, table: &str, rows: Vec<TableRow>);

    fn set_html(&mut self, panel: &str, html: &str);
}
