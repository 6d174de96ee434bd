//! Per-bot series projection.

use crate::record::BotRecord;
use serde::Serialize;

/// One (depth, score) coordinate for the correlation chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    /// Average URL depth
    pub x: f64,
    /// AI score
    pub y: f64,
}

/// Parallel series extracted from a bot list, all index-aligned with the input.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeriesSet {
    pub scores: Vec<f64>,
    pub depths: Vec<f64>,
    pub bursts: Vec<f64>,
    pub scatter_pairs: Vec<ScatterPoint>,
    /// Ordinal labels `Bot 1..Bot N`. Position, not identity.
    pub index_labels: Vec<String>,
}

impl SeriesSet {
    /// Number of bots in the set.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// True when no bots were extracted.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Ordinal x-axis label for the bot at `index`.
pub fn index_label(index: usize) -> String {
    format!("Bot {}", index + 1)
}

/// Project the bot list into series in one pass, preserving order.
pub fn extract(records: &[BotRecord]) -> SeriesSet {
    let mut set = SeriesSet {
        scores: Vec::with_capacity(records.len()),
        depths: Vec::with_capacity(records.len()),
        bursts: Vec::with_capacity(records.len()),
        scatter_pairs: Vec::with_capacity(records.len()),
        index_labels: Vec::with_capacity(records.len()),
    };

    for (i, bot) in records.iter().enumerate() {
        set.scores.push(bot.ai_score);
        set.depths.push(bot.avg_url_depth);
        set.bursts.push(bot.burst_rate);
        set.scatter_pairs.push(ScatterPoint {
            x: bot.avg_url_depth,
            y: bot.ai_score,
        });
        set.index_labels.push(index_label(i));
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let set = extract(&[]);
        assert!(set.is_empty());
        assert!(set.depths.is_empty());
        assert!(set.bursts.is_empty());
        assert!(set.scatter_pairs.is_empty());
        assert!(set.index_labels.is_empty());
    }

    #[test]
    fn test_alignment_and_order() {
        let records = vec![
            BotRecord::new("10.0.0.1", 12.0).with_depth(1.0).with_burst_rate(0.5),
            BotRecord::new("10.0.0.2", 88.0).with_depth(6.0).with_burst_rate(9.0),
            BotRecord::new("10.0.0.3", 40.0).with_depth(2.5).with_burst_rate(1.0),
        ];
        let set = extract(&records);

        assert_eq!(set.len(), 3);
        assert_eq!(set.scores, vec![12.0, 88.0, 40.0]);
        assert_eq!(set.depths, vec![1.0, 6.0, 2.5]);
        assert_eq!(set.bursts, vec![0.5, 9.0, 1.0]);
        assert_eq!(set.index_labels, vec!["Bot 1", "Bot 2", "Bot 3"]);
        for i in 0..set.len() {
            assert_eq!(set.scatter_pairs[i].x, set.depths[i]);
            assert_eq!(set.scatter_pairs[i].y, set.scores[i]);
        }
    }
}
