//! Wire Types
//!
//! Payloads consumed from the train counter server: the two summary
//! resources, the engine sighting table and the live event stream.
//!
//! Every numeric field the server may omit is an `Option` here; defaults are
//! applied where the value is rendered, never at decode time. Optional fields
//! are decoded leniently: a value of the wrong type reads as absent instead of
//! rejecting the whole row or frame.

use serde::{Deserialize, Serialize};

/// Field decoders that treat a wrong-typed value as absent
mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// `Some` only if the value decodes as `T`
    pub fn option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(T::deserialize(value).ok())
    }

    fn text(value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Identifier text: strings as-is, numbers as their JSON text
    pub fn id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(text(Value::deserialize(deserializer)?))
    }

    /// Like [`id`], with anything unusable read as an empty label
    pub fn label<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(text(Value::deserialize(deserializer)?).unwrap_or_default())
    }

    /// Identifier entries of an array; a non-array is empty
    pub fn ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => items.into_iter().filter_map(text).collect(),
            _ => Vec::new(),
        })
    }
}

/// `{ "data": [...] }` wrapper used by every REST endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataEnvelope<T> {
    pub data: Vec<T>,
}

/// One row of `GET /api/summary/daily`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DailySummaryPoint {
    /// Day label, e.g. "2026-02-16"
    pub day: String,
    #[serde(rename = "trains_EB", default, deserialize_with = "lenient::option")]
    pub trains_eb: Option<f64>,
    #[serde(rename = "trains_WB", default, deserialize_with = "lenient::option")]
    pub trains_wb: Option<f64>,
    #[serde(rename = "cars_EB", default, deserialize_with = "lenient::option")]
    pub cars_eb: Option<f64>,
    #[serde(rename = "cars_WB", default, deserialize_with = "lenient::option")]
    pub cars_wb: Option<f64>,
}

impl DailySummaryPoint {
    /// Create a row with every count absent
    pub fn new(day: impl Into<String>) -> Self {
        Self {
            day: day.into(),
            trains_eb: None,
            trains_wb: None,
            cars_eb: None,
            cars_wb: None,
        }
    }
}

/// One row of `GET /api/trains/recent`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RecentTrainPoint {
    #[serde(default, deserialize_with = "lenient::label")]
    pub train_id: String,
    #[serde(default, deserialize_with = "lenient::option")]
    pub railcars: Option<f64>,
    /// "EB" or "WB"; anything else, including a non-string, is rendered as westbound
    #[serde(default, deserialize_with = "lenient::option")]
    pub direction: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub locomotives: Option<u64>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub start_ts: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub end_ts: Option<String>,
    #[serde(default, deserialize_with = "lenient::ids")]
    pub engine_numbers: Vec<String>,
}

impl RecentTrainPoint {
    pub fn is_eastbound(&self) -> bool {
        self.direction.as_deref() == Some("EB")
    }
}

/// One row of `GET /api/engines/by_direction`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EngineDirectionCount {
    pub engine: String,
    pub direction: String,
    pub count: u64,
}

/// Running locomotive/railcar counts carried by `count` and `train_end`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Totals {
    #[serde(default, deserialize_with = "lenient::option")]
    pub locomotive: Option<u64>,
    #[serde(default, deserialize_with = "lenient::option")]
    pub railcar: Option<u64>,
}

impl Totals {
    pub fn locomotives(&self) -> u64 {
        self.locomotive.unwrap_or(0)
    }

    pub fn railcars(&self) -> u64 {
        self.railcar.unwrap_or(0)
    }
}

/// A frame from the `/ws` event stream, discriminated by its `event` field
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StreamEvent {
    /// A new train entered the frame
    TrainStart {
        #[serde(default, deserialize_with = "lenient::id")]
        train_id: Option<String>,
        #[serde(default, deserialize_with = "lenient::option")]
        ts: Option<f64>,
    },
    /// A car or locomotive crossed the count line
    Count {
        #[serde(default, deserialize_with = "lenient::id")]
        train_id: Option<String>,
        #[serde(default, deserialize_with = "lenient::option")]
        track_id: Option<i64>,
        #[serde(default, deserialize_with = "lenient::option")]
        class: Option<String>,
        #[serde(default, deserialize_with = "lenient::option")]
        direction: Option<String>,
        #[serde(default, deserialize_with = "lenient::option")]
        speed_mph: Option<f64>,
        #[serde(default, deserialize_with = "lenient::option")]
        avg_speed_mph: Option<f64>,
        #[serde(default, deserialize_with = "lenient::option")]
        totals: Option<Totals>,
        #[serde(default, deserialize_with = "lenient::option")]
        ts: Option<f64>,
    },
    /// OCR recognized a locomotive number
    EngineNumber {
        #[serde(default, deserialize_with = "lenient::id")]
        train_id: Option<String>,
        #[serde(default, deserialize_with = "lenient::option")]
        track_id: Option<i64>,
        #[serde(default, deserialize_with = "lenient::id")]
        engine_number: Option<String>,
    },
    /// The train left the frame
    TrainEnd {
        #[serde(default, deserialize_with = "lenient::id")]
        train_id: Option<String>,
        #[serde(default, deserialize_with = "lenient::option")]
        direction: Option<String>,
        #[serde(default, deserialize_with = "lenient::option")]
        avg_speed_mph: Option<f64>,
        #[serde(default, deserialize_with = "lenient::option")]
        final_totals: Option<Totals>,
        #[serde(default, deserialize_with = "lenient::option")]
        ts: Option<f64>,
    },
    /// Any other `event` value
    #[serde(other)]
    Unknown,
}

impl StreamEvent {
    /// Wire name of the event kind
    pub fn kind(&self) -> &'static str {
        match self {
            StreamEvent::TrainStart { .. } => "train_start",
            StreamEvent::Count { .. } => "count",
            StreamEvent::EngineNumber { .. } => "engine_number",
            StreamEvent::TrainEnd { .. } => "train_end",
            StreamEvent::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_point_missing_fields() {
        let json = r#"{"data": [{"day": "2024-01-01", "trains_EB": 3}]}"#;
        let envelope: DataEnvelope<DailySummaryPoint> = serde_json::from_str(json).unwrap();
        let point = &envelope.data[0];
        assert_eq!(point.day, "2024-01-01");
        assert_eq!(point.trains_eb, Some(3.0));
        assert_eq!(point.trains_wb, None);
        assert_eq!(point.cars_eb, None);
        assert_eq!(point.cars_wb, None);
    }

    #[test]
    fn test_recent_train_full_row() {
        let json = r#"{
            "train_id": "TP_20260216_101500",
            "start_ts": "2026-02-16T10:15:00",
            "end_ts": null,
            "direction": "EB",
            "locomotives": 2,
            "railcars": 88,
            "engine_numbers": ["4502", "7731"]
        }"#;
        let point: RecentTrainPoint = serde_json::from_str(json).unwrap();
        assert!(point.is_eastbound());
        assert_eq!(point.railcars, Some(88.0));
        assert_eq!(point.end_ts, None);
        assert_eq!(point.engine_numbers.len(), 2);
    }

    #[test]
    fn test_recent_train_null_direction() {
        let json = r#"{"train_id": "T9", "railcars": 12, "direction": null}"#;
        let point: RecentTrainPoint = serde_json::from_str(json).unwrap();
        assert!(!point.is_eastbound());
        assert!(point.engine_numbers.is_empty());
    }

    #[test]
    fn test_stream_event_train_start() {
        let json = r#"{"event": "train_start", "train_id": "T1", "ts": 1700000000.5}"#;
        let event: StreamEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event,
            StreamEvent::TrainStart {
                train_id: Some("T1".to_string()),
                ts: Some(1700000000.5),
            }
        );
        assert_eq!(event.kind(), "train_start");
    }

    #[test]
    fn test_stream_event_count_with_class() {
        let json = r#"{
            "event": "count", "train_id": "T1", "track_id": 7, "class": "railcar",
            "direction": "WB", "speed_mph": 22.4, "avg_speed_mph": 21.0,
            "totals": {"railcar": 5}
        }"#;
        let event: StreamEvent = serde_json::from_str(json).unwrap();
        match event {
            StreamEvent::Count {
                class,
                totals,
                speed_mph,
                ..
            } => {
                assert_eq!(class.as_deref(), Some("railcar"));
                assert_eq!(speed_mph, Some(22.4));
                let totals = totals.unwrap();
                assert_eq!(totals.locomotives(), 0);
                assert_eq!(totals.railcars(), 5);
            }
            _ => panic!("Expected Count"),
        }
    }

    #[test]
    fn test_stream_event_unknown_kind() {
        let json = r#"{"event": "camera_status", "ok": true}"#;
        let event: StreamEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, StreamEvent::Unknown);
        assert_eq!(event.kind(), "unknown");
    }

    #[test]
    fn test_stream_event_missing_discriminator() {
        let json = r#"{"train_id": "T1"}"#;
        assert!(serde_json::from_str::<StreamEvent>(json).is_err());
    }

    #[test]
    fn test_recent_rows_with_malformed_direction_still_decode() {
        let json = r#"{"data": [
            {"train_id": "a", "railcars": 10, "direction": "EB"},
            {"train_id": "b", "railcars": 5, "direction": 7},
            {"train_id": "c", "railcars": 8, "direction": ["EB"]},
            {"train_id": 42, "railcars": "many", "engine_numbers": ["4502", 7731, null]}
        ]}"#;
        let envelope: DataEnvelope<RecentTrainPoint> = serde_json::from_str(json).unwrap();
        let rows = envelope.data;

        assert_eq!(rows.len(), 4);
        assert!(rows[0].is_eastbound());
        assert_eq!(rows[1].direction, None);
        assert!(!rows[1].is_eastbound());
        assert_eq!(rows[2].direction, None);
        assert!(!rows[2].is_eastbound());
        assert_eq!(rows[3].train_id, "42");
        assert_eq!(rows[3].railcars, None);
        assert_eq!(rows[3].engine_numbers, vec!["4502", "7731"]);
    }

    #[test]
    fn test_daily_point_wrong_typed_count_reads_as_absent() {
        let json = r#"{"day": "2024-01-01", "trains_EB": "3", "cars_WB": 12}"#;
        let point: DailySummaryPoint = serde_json::from_str(json).unwrap();
        assert_eq!(point.trains_eb, None);
        assert_eq!(point.cars_wb, Some(12.0));
    }

    #[test]
    fn test_stream_event_ignores_wrong_typed_side_fields() {
        let json = r#"{"event": "count", "track_id": "7", "class": 3, "ts": "2024-01-01T00:00:00",
                       "totals": {"locomotive": 2, "railcar": 40}}"#;
        match serde_json::from_str::<StreamEvent>(json).unwrap() {
            StreamEvent::Count {
                track_id,
                class,
                ts,
                totals,
                ..
            } => {
                assert_eq!(track_id, None);
                assert_eq!(class, None);
                assert_eq!(ts, None);
                assert_eq!(totals.unwrap().railcars(), 40);
            }
            other => panic!("Expected Count, got {:?}", other),
        }
    }

    #[test]
    fn test_stream_event_numeric_ids_keep_their_text() {
        let json = r#"{"event": "engine_number", "train_id": 17, "engine_number": 4502}"#;
        assert_eq!(
            serde_json::from_str::<StreamEvent>(json).unwrap(),
            StreamEvent::EngineNumber {
                train_id: Some("17".to_string()),
                track_id: None,
                engine_number: Some("4502".to_string()),
            }
        );

        let json = r#"{"event": "train_end", "train_id": {"id": 1}, "final_totals": [1, 2]}"#;
        match serde_json::from_str::<StreamEvent>(json).unwrap() {
            StreamEvent::TrainEnd {
                train_id,
                final_totals,
                ..
            } => {
                assert_eq!(train_id, None);
                assert_eq!(final_totals, None);
            }
            other => panic!("Expected TrainEnd, got {:?}", other),
        }
    }
}
