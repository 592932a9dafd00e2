// Telemetry sample domain models
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    #[serde(rename = "ts")]
    pub time_ms: i64,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(time_ms: i64, value: f64) -> Self {
        Self { time_ms, value }
    }
}

/// Column layout of a series: `timestamps[i]` always pairs with `values[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeriesColumns {
    pub timestamps: Vec<i64>,
    pub values: Vec<f64>,
}

impl SeriesColumns {
    /// Split points into columns, dropping samples whose value is not finite.
    pub fn from_points(points: &[TimeSeriesPoint]) -> Self {
        let mut columns = Self {
            timestamps: Vec::with_capacity(points.len()),
            values: Vec::with_capacity(points.len()),
        };

        for point in points {
            if point.value.is_finite() {
                columns.timestamps.push(point.time_ms);
                columns.values.push(point.value);
            }
        }

        let dropped = points.len() - columns.len();
        if dropped > 0 {
            tracing::debug!("Dropped {} non-finite samples", dropped);
        }

        columns
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn last(&self) -> Option<TimeSeriesPoint> {
        match (self.timestamps.last(), self.values.last()) {
            (Some(&ts), Some(&value)) => Some(TimeSeriesPoint::new(ts, value)),
            _ => None,
        }
    }
}
