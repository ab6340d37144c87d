//! Score record types shared by the remote and local leaderboards

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a record is known to live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Acknowledged by the leaderboard service
    #[default]
    Remote,
    /// Only persisted on this device
    Local,
}

/// Which path produced an operation's result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Remote,
    Local,
}

/// A finished run on a leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub player_name: String,
    pub score: u64,
    pub level: u32,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub origin: Origin,
}

impl ScoreRecord {
    pub fn is_local(&self) -> bool {
        self.origin == Origin::Local
    }

    /// Same run, ignoring where it is stored
    pub fn same_run(&self, other: &ScoreRecord) -> bool {
        self.player_name == other.player_name
            && self.score == other.score
            && self.level == other.level
            && self.timestamp == other.timestamp
    }

    /// Wire body for the submit endpoint
    pub fn submission(&self) -> ScoreSubmission {
        ScoreSubmission {
            player_name: self.player_name.clone(),
            score: self.score,
            level: self.level,
            timestamp: self.timestamp,
        }
    }
}

/// Body sent to the leaderboard service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub player_name: String,
    pub score: u64,
    pub level: u32,
    pub timestamp: DateTime<Utc>,
}

/// Sort records best first. Stable, so equal scores keep their order.
pub fn sort_by_score_desc(records: &mut [ScoreRecord]) {
    records.sort_by(|a, b| b.score.cmp(&a.score));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format_is_camel_case() {
        let record = ScoreRecord {
            player_name: "Al".into(),
            score: 150,
            level: 2,
            timestamp: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            origin: Origin::Local,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["playerName"], "Al");
        assert_eq!(json["origin"], "local");

        let body = serde_json::to_value(record.submission()).unwrap();
        assert!(body.get("origin").is_none());
        assert_eq!(body["score"], 150);
    }

    #[test]
    fn test_missing_origin_defaults_to_remote() {
        let json = r#"{"playerName":"Bo","score":10,"level":1,"timestamp":"2024-05-01T12:00:00Z","id":"abc"}"#;
        let record: ScoreRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.origin, Origin::Remote);
        assert_eq!(record.player_name, "Bo");
    }
}
