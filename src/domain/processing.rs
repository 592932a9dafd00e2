// Series processing: outlier removal, smoothing and duration curves
use super::statistics::{mean, percentile, sorted_ascending, std_dev};
use serde::{Deserialize, Serialize};

pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;
pub const DEFAULT_ZSCORE_THRESHOLD: f64 = 3.0;

const MS_PER_MINUTE: f64 = 60_000.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutlierMethod {
    #[default]
    Iqr,
    Zscore,
    Manual,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutlierOptions {
    pub method: OutlierMethod,
    pub iqr_multiplier: f64,
    pub zscore_threshold: f64,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}

impl Default for OutlierOptions {
    fn default() -> Self {
        Self {
            method: OutlierMethod::Iqr,
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
            zscore_threshold: DEFAULT_ZSCORE_THRESHOLD,
            min_value: None,
            max_value: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutlierResult {
    pub values: Vec<f64>,
    pub timestamps: Vec<i64>,
    pub removed: usize,
}

/// Drop samples outside the fences of the selected method.
///
/// `values[i]` and `timestamps[i]` are kept or dropped together, so the
/// output stays index-aligned and in input order.
pub fn remove_outliers(values: &[f64], timestamps: &[i64], options: &OutlierOptions) -> OutlierResult {
    let (lower, upper) = match options.method {
        OutlierMethod::Manual => (
            options.min_value.unwrap_or(f64::NEG_INFINITY),
            options.max_value.unwrap_or(f64::INFINITY),
        ),
        OutlierMethod::Zscore => {
            let mean = mean(values);
            let sd = std_dev(values, mean);
            if sd == 0.0 {
                return unchanged(values, timestamps);
            }
            let threshold = options.zscore_threshold;
            return retain_where(values, timestamps, |v| (v - mean).abs() / sd <= threshold);
        }
        OutlierMethod::Iqr => iqr_fences(values, options.iqr_multiplier),
    };

    retain_where(values, timestamps, |v| v >= lower && v <= upper)
}

fn iqr_fences(values: &[f64], multiplier: f64) -> (f64, f64) {
    let sorted = sorted_ascending(values);
    let q1 = percentile(&sorted, 25.0);
    let q3 = percentile(&sorted, 75.0);
    let iqr = q3 - q1;

    if iqr == 0.0 {
        // Constant or near-constant data: symmetric band around the median
        let median = percentile(&sorted, 50.0);
        let range = (median.abs() * 0.5).max(1.0);
        return (median - range, median + range);
    }

    (q1 - multiplier * iqr, q3 + multiplier * iqr)
}

fn retain_where<F>(values: &[f64], timestamps: &[i64], keep: F) -> OutlierResult
where
    F: Fn(f64) -> bool,
{
    let mut kept_values = Vec::with_capacity(values.len());
    let mut kept_timestamps = Vec::with_capacity(timestamps.len());

    for (idx, &value) in values.iter().enumerate() {
        if keep(value) {
            kept_values.push(value);
            if let Some(&ts) = timestamps.get(idx) {
                kept_timestamps.push(ts);
            }
        }
    }

    let removed = values.len() - kept_values.len();
    if removed > 0 {
        tracing::debug!("Removed {} outliers out of {} samples", removed, values.len());
    }

    OutlierResult {
        values: kept_values,
        timestamps: kept_timestamps,
        removed,
    }
}

fn unchanged(values: &[f64], timestamps: &[i64]) -> OutlierResult {
    OutlierResult {
        values: values.to_vec(),
        timestamps: timestamps.to_vec(),
        removed: 0,
    }
}

/// Centered moving average. Edge windows shrink instead of padding.
pub fn moving_average(values: &[f64], window_size: usize) -> Vec<f64> {
    let n = values.len();
    let half = window_size / 2;

    (0..n)
        .map(|i| {
            let start = i.saturating_sub(half);
            let end = (i + half + 1).min(n);
            let window = &values[start..end];
            window.iter().sum::<f64>() / window.len() as f64
        })
        .collect()
}

/// Convert a smoothing duration into a sample count using the average
/// sampling interval of the whole series.
pub fn window_size_from_minutes(timestamps: &[i64], minutes: f64) -> usize {
    let (Some(&first), Some(&last)) = (timestamps.first(), timestamps.last()) else {
        return 1;
    };
    if timestamps.len() < 2 {
        return 1;
    }

    let avg_interval_ms = (last - first) as f64 / (timestamps.len() - 1) as f64;
    if avg_interval_ms <= 0.0 || !minutes.is_finite() {
        return 1;
    }

    let samples = (minutes * MS_PER_MINUTE / avg_interval_ms).round();
    if samples < 1.0 { 1 } else { samples as usize }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DurationPoint {
    /// Share of samples (percent) equal to or above `value`
    pub exceedance: f64,
    pub value: f64,
}

/// Values sorted descending, each tagged with its exceedance percentage.
pub fn duration_curve(values: &[f64]) -> Vec<DurationPoint> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));

    let last = sorted.len().saturating_sub(1);
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, value)| DurationPoint {
            exceedance: if last == 0 { 0.0 } else { i as f64 / last as f64 * 100.0 },
            value,
        })
        .collect()
}
