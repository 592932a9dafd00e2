// Descriptive statistics over sample values
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatisticsResult {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_timestamp: Option<i64>,
}

impl StatisticsResult {
    /// Attach the latest sample after processing.
    pub fn with_current(mut self, current: f64, last_timestamp: i64) -> Self {
        self.current = Some(current);
        self.last_timestamp = Some(last_timestamp);
        self
    }
}

/// Compute mean/median/min/max/sum/count. Empty input yields all zeros.
pub fn compute_statistics(values: &[f64]) -> StatisticsResult {
    if values.is_empty() {
        return StatisticsResult::default();
    }

    let sorted = sorted_ascending(values);
    let sum: f64 = values.iter().sum();
    let count = values.len();

    StatisticsResult {
        mean: sum / count as f64,
        median: percentile(&sorted, 50.0),
        min: sorted[0],
        max: sorted[count - 1],
        sum,
        count,
        current: None,
        last_timestamp: None,
    }
}

/// Linear interpolation between the bracketing order statistics.
/// `sorted` must already be in ascending order.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let idx = (p / 100.0) * (n - 1) as f64;
            let lower = idx.floor() as usize;
            let upper = idx.ceil() as usize;
            let weight = idx - lower as f64;
            sorted[lower] * (1.0 - weight) + sorted[upper] * weight
        }
    }
}

/// Population standard deviation (divides by n).
pub fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn sorted_ascending(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_all_zero() {
        let stats = compute_statistics(&[]);
        assert_eq!(stats, StatisticsResult::default());
        assert_eq!(stats.count, 0);
        assert_eq!(stats.sum, 0.0);
    }

    #[test]
    fn test_compute_statistics() {
        let stats = compute_statistics(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.sum, 10.0);
        assert_eq!(stats.mean, 2.5);
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert!(stats.current.is_none());
    }

    #[test]
    fn test_min_median_max_ordering() {
        let samples: [&[f64]; 4] = [
            &[7.0],
            &[-3.0, 12.5, 0.0],
            &[100.0, 100.0, -100.0, 5.0, 5.5],
            &[0.1, 0.2, 0.3, 1e9, -1e9, 42.0],
        ];
        for values in samples {
            let stats = compute_statistics(values);
            assert!(stats.min <= stats.median, "{:?}", values);
            assert!(stats.median <= stats.max, "{:?}", values);
        }
    }

    #[test]
    fn test_percentile_interpolates() {
        let sorted = [10.0, 20.0, 30.0, 40.0];
        // idx = 0.25 * 3 = 0.75
        assert!((percentile(&sorted, 25.0) - 17.5).abs() < 1e-9);
        assert_eq!(percentile(&sorted, 50.0), 25.0);
    }

    #[test]
    fn test_percentile_extremes() {
        let sorted = [-2.0, 0.5, 3.0, 8.0, 13.0];
        assert_eq!(percentile(&sorted, 0.0), -2.0);
        assert_eq!(percentile(&sorted, 100.0), 13.0);
    }

    #[test]
    fn test_percentile_small_inputs() {
        assert_eq!(percentile(&[], 50.0), 0.0);
        assert_eq!(percentile(&[9.0], 95.0), 9.0);
    }

    #[test]
    fn test_std_dev_is_population() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(std_dev(&values, mean(&values)), 2.0);
        assert_eq!(std_dev(&[], 0.0), 0.0);
    }

    #[test]
    fn test_with_current() {
        let stats = compute_statistics(&[1.0, 2.0]).with_current(2.0, 5_000);
        assert_eq!(stats.current, Some(2.0));
        assert_eq!(stats.last_timestamp, Some(5_000));
    }
}
