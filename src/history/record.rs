//! Archived session records.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::core::Players;

/// Identifier and creation date stamped onto a record when it is created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionStamp {
    /// Unique, time-derived record ID.
    pub id: String,
    /// Human-readable creation date.
    pub date: String,
}

impl SessionStamp {
    /// Stamp derived from a point in time: the ID is the millisecond Unix
    /// timestamp, the date is the local calendar date.
    #[must_use]
    pub fn at(time: DateTime<Local>) -> Self {
        Self {
            id: time.timestamp_millis().to_string(),
            date: time.format("%-m/%-d/%Y").to_string(),
        }
    }
}

/// A finished session as kept in the history log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PastSession {
    /// Unique, time-derived ID.
    pub id: String,

    /// Human-readable creation date.
    pub date: String,

    /// Player names in seat order.
    pub players: Players,

    /// Content theme played.
    pub theme: String,

    /// Prompts marked impactful, in the order they were shown.
    pub impactful_prompts: Vec<String>,

    /// Number of cards shown.
    pub card_count: usize,
}

impl PastSession {
    /// Check if any prompt was marked impactful.
    #[must_use]
    pub fn has_highlights(&self) -> bool {
        !self.impactful_prompts.is_empty()
    }

    /// One-line summary for history listings.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} | {} | {} | {} cards, {} impactful",
            self.date,
            self.players,
            self.theme,
            self.card_count,
            self.impactful_prompts.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_stamp_at() {
        let time = Local.with_ymd_and_hms(2024, 3, 9, 18, 30, 0).unwrap();
        let stamp = SessionStamp::at(time);

        assert_eq!(stamp.id, time.timestamp_millis().to_string());
        assert_eq!(stamp.date, "3/9/2024");
    }

    #[test]
    fn test_record_json_layout() {
        let record = PastSession {
            id: "1700000000000".into(),
            date: "11/14/2023".into(),
            players: Players::new("Ava", "Ben"),
            theme: "Deep Connections".into(),
            impactful_prompts: vec!["First".into()],
            card_count: 7,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["impactfulPrompts"], serde_json::json!(["First"]));
        assert_eq!(json["cardCount"], 7);
        assert_eq!(json["players"], serde_json::json!(["Ava", "Ben"]));

        let deserialized: PastSession = serde_json::from_value(json).unwrap();
        assert_eq!(record, deserialized);
        assert!(record.has_highlights());
        assert_eq!(
            record.summary(),
            "11/14/2023 | Ava & Ben | Deep Connections | 7 cards, 1 impactful"
        );
    }
}
