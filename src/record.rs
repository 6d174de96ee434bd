//! Classified bot records as served by the classification backend.
//!
//! Records are decoded leniently: numeric fields may arrive as numbers,
//! numeric strings, `null`, or not at all. Missing bot metrics decode as zero,
//! missing summary metrics decode as absent and are zero-substituted later by
//! [`crate::present::DisplaySummary`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Display category assigned by the backend scorer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BotType {
    /// High likelihood AI retrieval crawler
    AiRetrieval,
    /// Moderate retrieval signals
    Suspicious,
    /// Traditional indexer
    Indexer,
    /// No label supplied
    #[default]
    Unknown,
    /// Label not known to this crate, kept verbatim
    Other(String),
}

impl BotType {
    /// Returns the label as the backend spells it.
    pub fn as_str(&self) -> &str {
        match self {
            BotType::AiRetrieval => "AI_Retrieval",
            BotType::Suspicious => "Suspicious",
            BotType::Indexer => "Indexer",
            BotType::Unknown => "",
            BotType::Other(label) => label,
        }
    }
}

impl From<String> for BotType {
    fn from(label: String) -> Self {
        match label.as_str() {
            "AI_Retrieval" => BotType::AiRetrieval,
            "Suspicious" => BotType::Suspicious,
            "Indexer" => BotType::Indexer,
            "" => BotType::Unknown,
            _ => BotType::Other(label),
        }
    }
}

impl From<BotType> for String {
    fn from(bot_type: BotType) -> Self {
        bot_type.as_str().to_string()
    }
}

/// One distinct observed client with its precomputed AI score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BotRecord {
    /// Backend row identifier, used by the detail view
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Client address, used as the display key
    #[serde(default, deserialize_with = "string_or_empty")]
    pub ip_address: String,

    #[serde(default, deserialize_with = "string_or_empty")]
    pub user_agent: String,

    #[serde(default, deserialize_with = "count_or_zero")]
    pub total_requests: u64,

    /// Mean path-segment depth of requested URLs
    #[serde(default, deserialize_with = "number_or_zero")]
    pub avg_url_depth: f64,

    /// Requests per short time window
    #[serde(default, deserialize_with = "number_or_zero")]
    pub burst_rate: f64,

    /// Likelihood of AI-driven retrieval, nominally 0-100
    #[serde(default, deserialize_with = "number_or_zero")]
    pub ai_score: f64,

    #[serde(default, deserialize_with = "bot_type_or_unknown")]
    pub bot_type: BotType,

    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub unique_urls: Option<u64>,

    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub html_ratio: Option<f64>,

    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub repeat_url_ratio: Option<f64>,

    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub sitemap_hits: Option<u64>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub confidence_level: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub first_seen: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<String>,
}

impl BotRecord {
    /// Create a record with the fields the dashboard aggregates over.
    pub fn new(ip_address: impl Into<String>, ai_score: f64) -> Self {
        Self {
            ip_address: ip_address.into(),
            ai_score,
            ..Default::default()
        }
    }

    /// Set the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the average URL depth.
    pub fn with_depth(mut self, avg_url_depth: f64) -> Self {
        self.avg_url_depth = avg_url_depth;
        self
    }

    /// Set the burst rate.
    pub fn with_burst_rate(mut self, burst_rate: f64) -> Self {
        self.burst_rate = burst_rate;
        self
    }

    /// Set the total request count.
    pub fn with_requests(mut self, total_requests: u64) -> Self {
        self.total_requests = total_requests;
        self
    }

    /// Set the backend's bot type label.
    pub fn with_bot_type(mut self, bot_type: BotType) -> Self {
        self.bot_type = bot_type;
        self
    }
}

/// Aggregate counts for the whole classified population.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_bots: Option<u64>,

    #[serde(default, deserialize_with = "lenient_count")]
    pub ai_bots: Option<u64>,

    #[serde(default, deserialize_with = "lenient_count")]
    pub suspicious_bots: Option<u64>,

    /// Absent when the backend has no bots yet
    #[serde(default, deserialize_with = "lenient_number")]
    pub average_ai_score: Option<f64>,
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_as_f64(&value))
}

fn number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(deserializer)?.unwrap_or(0.0))
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if let Value::Number(n) = &value {
        if let Some(count) = n.as_u64() {
            return Ok(Some(count));
        }
    }
    Ok(value_as_f64(&value)
        .filter(|v| *v >= 0.0)
        .map(|v| v.trunc() as u64))
}

fn count_or_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_count(deserializer)?.unwrap_or(0))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

fn bot_type_or_unknown<'de, D>(deserializer: D) -> Result<BotType, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.map_or(BotType::Unknown, BotType::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_type_round_trips_backend_labels() {
        assert_eq!(BotType::from("AI_Retrieval".to_string()), BotType::AiRetrieval);
        assert_eq!(BotType::from("Indexer".to_string()), BotType::Indexer);
        assert_eq!(BotType::from(String::new()), BotType::Unknown);
        assert_eq!(
            BotType::from("human".to_string()),
            BotType::Other("human".to_string())
        );
        assert_eq!(BotType::Other("human".to_string()).as_str(), "human");
    }

    #[test]
    fn test_bot_record_from_backend_row() {
        let json = r#"{
            "id": 17,
            "upload_id": 3,
            "ip_address": "66.249.66.1",
            "user_agent": "GPTBot/1.0",
            "total_requests": 42,
            "unique_urls": 40,
            "avg_url_depth": "3.5",
            "burst_rate": 4.2,
            "html_ratio": 0.9,
            "repeat_url_ratio": null,
            "sitemap_hits": 0,
            "ai_score": 71.25,
            "bot_type": "AI_Retrieval",
            "confidence_level": "High",
            "first_seen": "2024-01-01T00:00:00",
            "last_seen": "2024-01-01T00:05:00"
        }"#;

        let bot: BotRecord = serde_json::from_str(json).unwrap();
        assert_eq!(bot.id.as_deref(), Some("17"));
        assert_eq!(bot.total_requests, 42);
        assert_eq!(bot.avg_url_depth, 3.5);
        assert_eq!(bot.ai_score, 71.25);
        assert_eq!(bot.bot_type, BotType::AiRetrieval);
        assert_eq!(bot.repeat_url_ratio, None);
        assert_eq!(bot.confidence_level.as_deref(), Some("High"));
    }

    #[test]
    fn test_bot_record_missing_metrics_are_zero() {
        let bot: BotRecord =
            serde_json::from_str(r#"{"ip_address": "10.0.0.1", "ai_score": null}"#).unwrap();
        assert_eq!(bot.ai_score, 0.0);
        assert_eq!(bot.burst_rate, 0.0);
        assert_eq!(bot.total_requests, 0);
        assert_eq!(bot.bot_type, BotType::Unknown);
    }

    #[test]
    fn test_bot_record_null_strings_decode() {
        let bots: Vec<BotRecord> = serde_json::from_str(
            r#"[
                {"ip_address": "1.1.1.1", "ai_score": 70, "bot_type": null},
                {"ip_address": null, "user_agent": null, "ai_score": 20, "bot_type": "Indexer"}
            ]"#,
        )
        .unwrap();

        assert_eq!(bots.len(), 2);
        assert_eq!(bots[0].bot_type, BotType::Unknown);
        assert_eq!(bots[0].ai_score, 70.0);
        assert_eq!(bots[1].ip_address, "");
        assert_eq!(bots[1].user_agent, "");
        assert_eq!(bots[1].bot_type, BotType::Indexer);
    }

    #[test]
    fn test_bot_type_non_string_label() {
        let bot: BotRecord =
            serde_json::from_str(r#"{"ip_address": "10.0.0.2", "bot_type": 3}"#).unwrap();
        assert_eq!(bot.bot_type, BotType::Other("3".to_string()));
    }

    #[test]
    fn test_summary_accepts_nulls_and_strings() {
        let summary: SummaryRecord = serde_json::from_str(
            r#"{"total_bots": 4, "ai_bots": "2", "suspicious_bots": null, "average_ai_score": "51.25"}"#,
        )
        .unwrap();

        assert_eq!(summary.total_bots, Some(4));
        assert_eq!(summary.ai_bots, Some(2));
        assert_eq!(summary.suspicious_bots, None);
        assert_eq!(summary.average_ai_score, Some(51.25));
    }

    #[test]
    fn test_summary_empty_object() {
        let summary: SummaryRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(summary, SummaryRecord::default());
    }

    #[test]
    fn test_summary_non_numeric_string_is_absent() {
        let summary: SummaryRecord =
            serde_json::from_str(r#"{"average_ai_score": "n/a"}"#).unwrap();
        assert_eq!(summary.average_ai_score, None);
    }
}
