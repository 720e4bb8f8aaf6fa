// Occupancy snapshot domain model
use serde::{Deserialize, Deserializer, Serialize};

/// Label shown for a slot whose duration entry is missing.
pub const DEFAULT_DURATION: &str = "0m";

/// One polled occupancy report covering all slots at an instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total: u32,
    pub occupied: u32,
    pub vacant: u32,
    pub utilization: f64,
    #[serde(default)]
    pub slots: Vec<bool>,
    #[serde(default, deserialize_with = "null_entries_as_empty")]
    pub durations: Vec<String>,
    // Older backends do not report the active source.
    #[serde(default)]
    pub source: String,
}

// A null entry renders like a missing one instead of failing the whole snapshot.
fn null_entries_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<Vec<Option<String>>>::deserialize(deserializer)?;
    Ok(entries
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}

/// Duration label for the slot at `index`, defaulting when the entry is missing or blank.
pub fn duration_or_default(durations: &[String], index: usize) -> &str {
    durations
        .get(index)
        .map(String::as_str)
        .filter(|d| !d.is_empty())
        .unwrap_or(DEFAULT_DURATION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_snapshot() {
        let json = r#"{
            "total": 3, "occupied": 2, "vacant": 1, "utilization": 66.66,
            "slots": [true, false, true], "durations": ["5m", "0m", "12m"],
            "source": "camA"
        }"#;
        let snapshot: StatsSnapshot = serde_json::from_str(json).unwrap();

        assert_eq!(snapshot.total, 3);
        assert_eq!(snapshot.slots, vec![true, false, true]);
        assert_eq!(duration_or_default(&snapshot.durations, 2), "12m");
        assert_eq!(snapshot.source, "camA");
    }

    #[test]
    fn test_decode_without_source_and_integer_utilization() {
        let json = r#"{"total": 0, "occupied": 0, "vacant": 0, "utilization": 0, "slots": [], "durations": []}"#;
        let snapshot: StatsSnapshot = serde_json::from_str(json).unwrap();

        assert_eq!(snapshot.utilization, 0.0);
        assert!(snapshot.source.is_empty());
    }

    #[test]
    fn test_null_durations_decode_as_default() {
        let json = r#"{
            "total": 4, "occupied": 2, "vacant": 2, "utilization": 50.0,
            "slots": [true, false, true, false], "durations": ["5m", null, "2m"],
            "source": "camA"
        }"#;
        let snapshot: StatsSnapshot = serde_json::from_str(json).unwrap();

        assert_eq!(duration_or_default(&snapshot.durations, 0), "5m");
        assert_eq!(duration_or_default(&snapshot.durations, 1), "0m");
        assert_eq!(duration_or_default(&snapshot.durations, 2), "2m");
        assert_eq!(duration_or_default(&snapshot.durations, 3), "0m");
    }

    #[test]
    fn test_null_durations_list_decodes_as_empty() {
        let json = r#"{"total": 1, "occupied": 1, "vacant": 0, "utilization": 100.0, "slots": [true], "durations": null}"#;
        let snapshot: StatsSnapshot = serde_json::from_str(json).unwrap();

        assert!(snapshot.durations.is_empty());
        assert_eq!(duration_or_default(&snapshot.durations, 0), "0m");
    }

    #[test]
    fn test_missing_duration_defaults() {
        let durations = vec!["5m".to_string(), String::new()];
        assert_eq!(duration_or_default(&durations, 0), "5m");
        assert_eq!(duration_or_default(&durations, 1), "0m");
        assert_eq!(duration_or_default(&durations, 2), "0m");
    }
}
