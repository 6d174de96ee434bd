//! Threshold-based narrative summary.
//!
//! Bots are split into score bands:
//! - `[ai_like, ∞)` high likelihood AI retrieval
//! - `[suspicious, ai_like)` moderate retrieval signals
//! - below `suspicious` not reported

use super::series::ScatterPoint;
use crate::config::{CorrelationMode, ThresholdConfig};
use crate::record::BotRecord;
use serde::Serialize;

/// Sentence shown when the correlation is not computed.
pub const STATIC_INSIGHT: &str =
    "Behavioral clustering indicates deeper crawl depth correlates with higher AI scoring.";

/// Coefficient magnitude below which depth and score are reported as unrelated.
const WEAK_CORRELATION: f64 = 0.3;

/// Score band a single bot falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    AiLike,
    Suspicious,
    Benign,
}

impl ScoreBand {
    /// Band for `score` under the configured thresholds.
    pub fn of(score: f64, thresholds: &ThresholdConfig) -> Self {
        if score >= thresholds.ai_like {
            ScoreBand::AiLike
        } else if score >= thresholds.suspicious {
            ScoreBand::Suspicious
        } else {
            ScoreBand::Benign
        }
    }
}

/// Counts and interpretive sentence for the intelligence panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Narrative {
    pub total: usize,
    pub ai_like: usize,
    pub suspicious: usize,
    /// Pearson coefficient of depth vs score, when computed and defined
    pub correlation: Option<f64>,
    pub insight: String,
}

impl Narrative {
    /// Render the panel markup.
    pub fn to_html(&self) -> String {
        format!(
            "<p>Total analyzed bots: <strong>{}</strong></p>\n\
             <p>High likelihood AI retrieval patterns: <strong>{}</strong></p>\n\
             <p>Moderate retrieval signals detected: <strong>{}</strong></p>\n\
             <p>{}</p>",
            self.total, self.ai_like, self.suspicious, self.insight
        )
    }
}

/// Count bots per band and pick the interpretive sentence.
pub fn classify(
    records: &[BotRecord],
    thresholds: &ThresholdConfig,
    mode: CorrelationMode,
) -> Narrative {
    let mut ai_like = 0;
    let mut suspicious = 0;
    for bot in records {
        match ScoreBand::of(bot.ai_score, thresholds) {
            ScoreBand::AiLike => ai_like += 1,
            ScoreBand::Suspicious => suspicious += 1,
            ScoreBand::Benign => {}
        }
    }

    let (correlation, insight) = match mode {
        CorrelationMode::Static => (None, STATIC_INSIGHT.to_string()),
        CorrelationMode::Computed => {
            let points: Vec<ScatterPoint> = records
                .iter()
                .map(|b| ScatterPoint {
                    x: b.avg_url_depth,
                    y: b.ai_score,
                })
                .collect();
            let r = pearson(&points);
            (r, describe_correlation(r))
        }
    };

    Narrative {
        total: records.len(),
        ai_like,
        suspicious,
        correlation,
        insight,
    }
}

/// Pearson correlation coefficient of the points.
///
/// `None` with fewer than two points or when either axis has zero variance.
pub fn pearson(points: &[ScatterPoint]) -> Option<f64> {
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.x).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.y).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for p in points {
        let dx = p.x - mean_x;
        let dy = p.y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    let r = cov / (var_x.sqrt() * var_y.sqrt());
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

fn describe_correlation(r: Option<f64>) -> String {
    match r {
        Some(r) if r >= WEAK_CORRELATION => format!(
            "Behavioral clustering indicates deeper crawl depth correlates with higher AI scoring (r = {:.2}).",
            r
        ),
        Some(r) if r <= -WEAK_CORRELATION => format!(
            "Deeper crawl depth is associated with lower AI scoring (r = {:.2}).",
            r
        ),
        Some(r) => format!(
            "Crawl depth shows no clear relationship with AI scoring (r = {:.2}).",
            r
        ),
        None => "Not enough variation in crawl depth and AI scoring to estimate a correlation."
            .to_string(),
    }
}
