//! Latest-metrics extraction from free-text vital-sign log lines.
//!
//! Heuristic on purpose: values are pulled from the most recent entry
//! only, and anything that fails to parse is dropped without error.
//! Lines look like `"2024-09-01: Heart rate 72"` or
//! `"2024-09-02: BP 140/90"`.

use serde::Serialize;

/// Metrics recognized in the tail log entry. Absent fields are omitted
/// from the serialized mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LatestMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp: Option<f64>,
}

impl LatestMetrics {
    pub fn is_empty(&self) -> bool {
        self.heart_rate.is_none() && self.bp.is_none() && self.temp.is_none()
    }
}

/// Extract metrics from the last entry of an ordered log sequence.
///
/// Only the body after the first `": "` is inspected; an entry without
/// that separator yields nothing. The three patterns are checked
/// independently, so one body can produce several metrics.
pub fn latest_metrics(entries: &[String]) -> LatestMetrics {
    let mut metrics = LatestMetrics::default();
    let Some(last) = entries.last() else {
        return metrics;
    };
    let Some((_, body)) = last.split_once(": ") else {
        return metrics;
    };

    if body.contains("Heart rate") {
        metrics.heart_rate = body
            .split("Heart rate")
            .nth(1)
            .and_then(|tail| tail.trim().parse::<i64>().ok());
    }

    if body.contains("BP") {
        metrics.bp = body.split("BP").nth(1).map(|tail| tail.trim().to_string());
    }

    if body.contains("Temp") || body.contains("Temperature") {
        let numeric: String = body
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        metrics.temp = numeric.parse::<f64>().ok();
    }

    metrics
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn heart_rate_from_last_entry() {
        let logs = lines(&["2024-09-01: Heart rate 70", "2024-09-02: Heart rate 72"]);
        let metrics = latest_metrics(&logs);
        assert_eq!(metrics.heart_rate, Some(72));
        assert_eq!(metrics.bp, None);
        assert_eq!(metrics.temp, None);
    }

    #[test]
    fn blood_pressure_kept_as_string() {
        let logs = lines(&["2024-09-01: BP 140/90"]);
        let metrics = latest_metrics(&logs);
        assert_eq!(metrics.bp.as_deref(), Some("140/90"));
        assert_eq!(metrics.heart_rate, None);
    }

    #[test]
    fn temperature_parsed_from_digits() {
        let logs = lines(&["2024-09-01: Temp 36.8"]);
        let metrics = latest_metrics(&logs);
        assert_eq!(metrics.temp, Some(36.8));
    }

    #[test]
    fn temperature_long_form_recognized() {
        let logs = lines(&["2024-09-01: Temperature 37.2"]);
        assert_eq!(latest_metrics(&logs).temp, Some(37.2));
    }

    #[test]
    fn empty_sequence_yields_nothing() {
        let metrics = latest_metrics(&[]);
        assert!(metrics.is_empty());
    }

    #[test]
    fn entry_without_separator_yields_nothing() {
        let logs = lines(&["no separator here"]);
        assert!(latest_metrics(&logs).is_empty());
    }

    #[test]
    fn unparseable_heart_rate_is_dropped() {
        let logs = lines(&["2024-09-01: Heart rate elevated"]);
        let metrics = latest_metrics(&logs);
        assert_eq!(metrics.heart_rate, None);
        assert!(metrics.is_empty());
    }

    #[test]
    fn patterns_are_checked_independently() {
        let logs = lines(&["2024-09-01: BP 140/90 Heart rate 72"]);
        let metrics = latest_metrics(&logs);
        // "Heart rate 72" trails the BP marker, so bp captures both
        assert_eq!(metrics.bp.as_deref(), Some("140/90 Heart rate 72"));
        assert_eq!(metrics.heart_rate, Some(72));
    }

    #[test]
    fn only_last_entry_is_inspected() {
        let logs = lines(&["2024-09-01: Heart rate 72", "2024-09-02: Resting"]);
        assert!(latest_metrics(&logs).is_empty());
    }

    #[test]
    fn serializes_as_sparse_mapping() {
        let logs = lines(&["2024-09-02: Heart rate 72"]);
        let json = serde_json::to_value(latest_metrics(&logs)).unwrap();
        assert_eq!(json, serde_json::json!({ "heart_rate": 72 }));
    }
}
