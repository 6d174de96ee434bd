//! Presentation normalization between fetched records and the view surface.

use crate::record::{BotRecord, SummaryRecord};
use serde::Serialize;

/// View element identifiers.
pub mod ids {
    pub const TOTAL_BOTS: &str = "total_bots";
    pub const AI_BOTS: &str = "ai_bots";
    pub const SUSPICIOUS_BOTS: &str = "suspicious_bots";
    pub const AVG_SCORE: &str = "avg_score";
    pub const STATUS: &str = "status";
    pub const BOTS_TABLE: &str = "bots_table";
    pub const INTELLIGENCE_SUMMARY: &str = "intelligence_summary";
}

/// Column headers of the bots table.
pub const TABLE_COLUMNS: [&str; 7] = [
    "IP Address",
    "User Agent",
    "Requests",
    "Avg Depth",
    "Burst Rate",
    "AI Score",
    "Type",
];

/// Summary with every absent field replaced by zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DisplaySummary {
    pub total_bots: u64,
    pub ai_bots: u64,
    pub suspicious_bots: u64,
    pub average_ai_score: f64,
}

impl DisplaySummary {
    /// Zero-substitute any absent summary value.
    pub fn from_record(summary: &SummaryRecord) -> Self {
        Self {
            total_bots: summary.total_bots.unwrap_or(0),
            ai_bots: summary.ai_bots.unwrap_or(0),
            suspicious_bots: summary.suspicious_bots.unwrap_or(0),
            average_ai_score: summary.average_ai_score.unwrap_or(0.0),
        }
    }

    /// Average score with two decimals, or a bare `0` when there is none.
    pub fn average_text(&self) -> String {
        if self.average_ai_score == 0.0 {
            "0".to_string()
        } else {
            format!("{:.2}", self.average_ai_score)
        }
    }

    /// `(field id, text)` pairs in display order.
    pub fn fields(&self) -> [(&'static str, String); 4] {
        [
            (ids::TOTAL_BOTS, self.total_bots.to_string()),
            (ids::AI_BOTS, self.ai_bots.to_string()),
            (ids::SUSPICIOUS_BOTS, self.suspicious_bots.to_string()),
            (ids::AVG_SCORE, self.average_text()),
        ]
    }
}

impl From<&SummaryRecord> for DisplaySummary {
    fn from(summary: &SummaryRecord) -> Self {
        Self::from_record(summary)
    }
}

/// One rendered row of the bots table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub cells: [String; 7],
    /// Styling class, the bot type label
    pub class: String,
}

impl TableRow {
    /// Format one bot as a table row.
    pub fn from_record(bot: &BotRecord) -> Self {
        Self {
            cells: [
                bot.ip_address.clone(),
                bot.user_agent.clone(),
                bot.total_requests.to_string(),
                bot.avg_url_depth.to_string(),
                bot.burst_rate.to_string(),
                bot.ai_score.to_string(),
                bot.bot_type.as_str().to_string(),
            ],
            class: bot.bot_type.as_str().to_string(),
        }
    }
}

/// Rows for the whole bot list, in fetch order.
pub fn table_rows(records: &[BotRecord]) -> Vec<TableRow> {
    records.iter().map(TableRow::from_record).collect()
}
