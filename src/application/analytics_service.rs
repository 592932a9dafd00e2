// Analytics service - Runs the processing pipeline for one chart series
use crate::application::settings::{AnalyticsSettings, SmoothingWindow};
use crate::domain::processing::{
    duration_curve, moving_average, remove_outliers, window_size_from_minutes, DurationPoint,
};
use crate::domain::statistics::{compute_statistics, percentile, sorted_ascending, StatisticsResult};
use crate::domain::telemetry::{SeriesColumns, TimeSeriesPoint};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentileValue {
    pub p: f64,
    pub value: f64,
}

/// Everything a chart needs for one series after processing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedSeries {
    pub timestamps: Vec<i64>,
    pub values: Vec<f64>,
    pub outliers_removed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoothing_window: Option<usize>,
    pub statistics: StatisticsResult,
    pub percentiles: Vec<PercentileValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_curve: Option<Vec<DurationPoint>>,
}

/// Outlier removal, then smoothing, then statistics over what remains.
pub fn process_series(points: &[TimeSeriesPoint], settings: &AnalyticsSettings) -> ProcessedSeries {
    let mut columns = SeriesColumns::from_points(points);

    let mut outliers_removed = 0;
    if let Some(options) = &settings.outliers {
        let result = remove_outliers(&columns.values, &columns.timestamps, options);
        outliers_removed = result.removed;
        columns = SeriesColumns {
            timestamps: result.timestamps,
            values: result.values,
        };
    }

    let smoothing_window = settings.smoothing.map(|window| match window {
        SmoothingWindow::Samples(size) => size.max(1),
        SmoothingWindow::Minutes(minutes) => window_size_from_minutes(&columns.timestamps, minutes),
    });
    if let Some(size) = smoothing_window {
        columns.values = moving_average(&columns.values, size);
    }

    let mut statistics = compute_statistics(&columns.values);
    if let Some(last) = columns.last() {
        statistics = statistics.with_current(last.value, last.time_ms);
    }

    let sorted = sorted_ascending(&columns.values);
    let percentiles = if sorted.is_empty() {
        Vec::new()
    } else {
        settings
            .percentiles
            .iter()
            .map(|&p| PercentileValue {
                p,
                value: percentile(&sorted, p),
            })
            .collect()
    };

    let duration_curve = settings.duration_curve.then(|| duration_curve(&columns.values));

    tracing::debug!(
        "Processed series: {} samples in, {} out, {} outliers removed",
        points.len(),
        columns.len(),
        outliers_removed
    );

    ProcessedSeries {
        timestamps: columns.timestamps,
        values: columns.values,
        outliers_removed,
        smoothing_window,
        statistics,
        percentiles,
        duration_curve,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::settings::WidgetSettings;
    use crate::domain::processing::OutlierMethod;

    fn points(values: &[f64]) -> Vec<TimeSeriesPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| TimeSeriesPoint::new(i as i64 * 60_000, v))
            .collect()
    }

    #[test]
    fn test_defaults_only_compute_statistics() {
        let settings = WidgetSettings::default().resolve().analytics;
        let processed = process_series(&points(&[1.0, 2.0, 3.0, 4.0, 5.0]), &settings);

        assert_eq!(processed.values, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(processed.outliers_removed, 0);
        assert_eq!(processed.smoothing_window, None);
        assert_eq!(processed.statistics.mean, 3.0);
        assert_eq!(processed.statistics.current, Some(5.0));
        assert_eq!(processed.statistics.last_timestamp, Some(240_000));
        assert_eq!(processed.percentiles.len(), 4);
        assert_eq!(processed.percentiles[1], PercentileValue { p: 25.0, value: 2.0 });
        assert!(processed.duration_curve.is_none());
    }

    #[test]
    fn test_outliers_then_smoothing() {
        let settings = WidgetSettings {
            remove_outliers: Some(true),
            outlier_method: Some(OutlierMethod::Manual),
            outlier_min_value: Some(0.0),
            outlier_max_value: Some(100.0),
            enable_smoothing: Some(true),
            smoothing_window_size: Some(3),
            ..Default::default()
        }
        .resolve()
        .analytics;

        let processed = process_series(&points(&[1.0, 500.0, 2.0, 3.0, 4.0, 5.0]), &settings);

        assert_eq!(processed.outliers_removed, 1);
        assert_eq!(processed.timestamps, vec![0, 120_000, 180_000, 240_000, 300_000]);
        assert_eq!(processed.values, vec![1.5, 2.0, 3.0, 4.0, 4.5]);
        assert_eq!(processed.smoothing_window, Some(3));
        assert_eq!(processed.statistics.count, 5);
    }

    #[test]
    fn test_smoothing_window_from_minutes() {
        let settings = WidgetSettings {
            enable_smoothing: Some(true),
            smoothing_window_minutes: Some(3.0),
            ..Default::default()
        }
        .resolve()
        .analytics;

        let processed = process_series(&points(&[1.0, 2.0, 3.0, 4.0, 5.0]), &settings);
        assert_eq!(processed.smoothing_window, Some(3));
        assert_eq!(processed.values, vec![1.5, 2.0, 3.0, 4.0, 4.5]);
    }

    #[test]
    fn test_empty_series() {
        let settings = WidgetSettings {
            remove_outliers: Some(true),
            enable_smoothing: Some(true),
            duration_curve: Some(true),
            ..Default::default()
        }
        .resolve()
        .analytics;

        let processed = process_series(&[], &settings);

        assert!(processed.values.is_empty());
        assert_eq!(processed.statistics, StatisticsResult::default());
        assert!(processed.percentiles.is_empty());
        assert_eq!(processed.duration_curve, Some(Vec::new()));
    }

    #[test]
    fn test_duration_curve_uses_processed_values() {
        let settings = WidgetSettings {
            duration_curve: Some(true),
            ..Default::default()
        }
        .resolve()
        .analytics;

        let processed = process_series(&points(&[3.0, 9.0, 6.0]), &settings);
        let curve = processed.duration_curve.unwrap();
        assert_eq!(curve.first().map(|p| p.value), Some(9.0));
        assert_eq!(curve.last().map(|p| p.exceedance), Some(100.0));
    }
}
