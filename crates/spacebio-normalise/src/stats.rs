//! `/stats` normalisation.

use serde_json::Value;
use spacebio_common::Stats;

use crate::frequency::normalize_frequency_table;
use crate::numeric::count_or_zero;

/// Fold the three facet frequency tables and the chunk count into `Stats`.
/// Pure: the same payload always yields an equal value.
pub fn normalize_stats(raw: &Value) -> Stats {
    Stats {
        organisms: normalize_frequency_table(&raw["organisms"]),
        stressors: normalize_frequency_table(&raw["stressors"]),
        platforms: normalize_frequency_table(&raw["platforms"]),
        chunks: count_or_zero(&raw["chunks"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> Value {
        json!({
            "organisms": [["Mouse", 120], ["Human", 80], ["Arabidopsis", 40]],
            "stressors": [["Microgravity", 200], ["Radiation", 90]],
            "platforms": {"ISS": 150, "Shuttle": "30"},
            "chunks": 5321
        })
    }

    #[test]
    fn test_stats_shape() {
        let s = normalize_stats(&payload());
        assert_eq!(s.chunks, 5321);
        assert_eq!(s.organisms.len(), 3);
        assert_eq!(s.organisms.entries()[0].label, "Mouse");
        assert_eq!(s.platforms.count_of("Shuttle"), Some(30));
        assert_eq!(s.platforms.entries()[0].label, "ISS");
    }

    #[test]
    fn test_stats_idempotent() {
        let raw = payload();
        assert_eq!(normalize_stats(&raw), normalize_stats(&raw));
    }

    #[test]
    fn test_empty_payload_defaults() {
        let s = normalize_stats(&json!({}));
        assert_eq!(s, Stats::default());
    }
}
