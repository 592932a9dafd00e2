// Widget settings: raw settings bag and its fully-defaulted resolution
use crate::domain::processing::{
    OutlierMethod, OutlierOptions, DEFAULT_IQR_MULTIPLIER, DEFAULT_ZSCORE_THRESHOLD,
};
use crate::domain::timewindow::{Aggregation, AggregationType, SelectorMode};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DAY_FORMAT: &str = "DD MMM YYYY";
pub const DEFAULT_WEEK_FORMAT: &str = "DD MMM YYYY";
pub const DEFAULT_MONTH_FORMAT: &str = "MMMM YYYY";
pub const DEFAULT_CUSTOM_FORMAT: &str = "DD.MM.YYYY HH:mm";
pub const DEFAULT_MAX_DATA_POINTS: u32 = 50_000;
pub const DEFAULT_SMOOTHING_WINDOW_SIZE: usize = 5;
pub const DEFAULT_PERCENTILES: [f64; 4] = [5.0, 25.0, 75.0, 95.0];

/// Settings as supplied by a dashboard or config file. Every field is
/// optional; `resolve` fills the gaps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetSettings {
    pub default_mode: Option<SelectorMode>,
    pub day_format: Option<String>,
    pub week_format: Option<String>,
    pub month_format: Option<String>,
    pub custom_format: Option<String>,
    pub custom_start_time: Option<String>,
    pub custom_end_time: Option<String>,
    pub aggregation_type: Option<AggregationType>,
    pub max_data_points: Option<u32>,
    pub remove_outliers: Option<bool>,
    pub outlier_method: Option<OutlierMethod>,
    pub iqr_multiplier: Option<f64>,
    pub zscore_threshold: Option<f64>,
    pub outlier_min_value: Option<f64>,
    pub outlier_max_value: Option<f64>,
    pub enable_smoothing: Option<bool>,
    pub smoothing_window_minutes: Option<f64>,
    pub smoothing_window_size: Option<usize>,
    pub percentiles: Option<Vec<f64>>,
    pub duration_curve: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    pub selector: SelectorSettings,
    pub analytics: AnalyticsSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectorSettings {
    pub default_mode: SelectorMode,
    pub day_format: String,
    pub week_format: String,
    pub month_format: String,
    pub custom_format: String,
    pub custom_start_time: Option<String>,
    pub custom_end_time: Option<String>,
    pub aggregation: Aggregation,
}

impl SelectorSettings {
    /// True when the settings declare at least one custom bound.
    pub fn has_custom_bounds(&self) -> bool {
        self.custom_start_time.is_some() || self.custom_end_time.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SmoothingWindow {
    Samples(usize),
    Minutes(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsSettings {
    pub outliers: Option<OutlierOptions>,
    pub smoothing: Option<SmoothingWindow>,
    pub percentiles: Vec<f64>,
    pub duration_curve: bool,
}

impl WidgetSettings {
    /// Field-wise overlay: values set in `overrides` win.
    pub fn overlay(self, overrides: WidgetSettings) -> WidgetSettings {
        WidgetSettings {
            default_mode: overrides.default_mode.or(self.default_mode),
            day_format: overrides.day_format.or(self.day_format),
            week_format: overrides.week_format.or(self.week_format),
            month_format: overrides.month_format.or(self.month_format),
            custom_format: overrides.custom_format.or(self.custom_format),
            custom_start_time: overrides.custom_start_time.or(self.custom_start_time),
            custom_end_time: overrides.custom_end_time.or(self.custom_end_time),
            aggregation_type: overrides.aggregation_type.or(self.aggregation_type),
            max_data_points: overrides.max_data_points.or(self.max_data_points),
            remove_outliers: overrides.remove_outliers.or(self.remove_outliers),
            outlier_method: overrides.outlier_method.or(self.outlier_method),
            iqr_multiplier: overrides.iqr_multiplier.or(self.iqr_multiplier),
            zscore_threshold: overrides.zscore_threshold.or(self.zscore_threshold),
            outlier_min_value: overrides.outlier_min_value.or(self.outlier_min_value),
            outlier_max_value: overrides.outlier_max_value.or(self.outlier_max_value),
            enable_smoothing: overrides.enable_smoothing.or(self.enable_smoothing),
            smoothing_window_minutes: overrides
                .smoothing_window_minutes
                .or(self.smoothing_window_minutes),
            smoothing_window_size: overrides.smoothing_window_size.or(self.smoothing_window_size),
            percentiles: overrides.percentiles.or(self.percentiles),
            duration_curve: overrides.duration_curve.or(self.duration_curve),
        }
    }

    pub fn resolve(&self) -> ResolvedSettings {
        let selector = SelectorSettings {
            default_mode: self.default_mode.unwrap_or_default(),
            day_format: format_or(&self.day_format, DEFAULT_DAY_FORMAT),
            week_format: format_or(&self.week_format, DEFAULT_WEEK_FORMAT),
            month_format: format_or(&self.month_format, DEFAULT_MONTH_FORMAT),
            custom_format: format_or(&self.custom_format, DEFAULT_CUSTOM_FORMAT),
            custom_start_time: non_blank(&self.custom_start_time),
            custom_end_time: non_blank(&self.custom_end_time),
            aggregation: Aggregation {
                kind: self.aggregation_type.unwrap_or_default(),
                limit: self
                    .max_data_points
                    .filter(|&n| n > 0)
                    .unwrap_or(DEFAULT_MAX_DATA_POINTS),
            },
        };

        let outliers = self.remove_outliers.unwrap_or(false).then(|| OutlierOptions {
            method: self.outlier_method.unwrap_or_default(),
            iqr_multiplier: self
                .iqr_multiplier
                .filter(|m| m.is_finite() && *m >= 0.0)
                .unwrap_or(DEFAULT_IQR_MULTIPLIER),
            zscore_threshold: self
                .zscore_threshold
                .filter(|t| t.is_finite() && *t > 0.0)
                .unwrap_or(DEFAULT_ZSCORE_THRESHOLD),
            min_value: self.outlier_min_value,
            max_value: self.outlier_max_value,
        });

        let smoothing = self.enable_smoothing.unwrap_or(false).then(|| {
            match self.smoothing_window_minutes.filter(|m| m.is_finite() && *m > 0.0) {
                Some(minutes) => SmoothingWindow::Minutes(minutes),
                None => SmoothingWindow::Samples(
                    self.smoothing_window_size
                        .unwrap_or(DEFAULT_SMOOTHING_WINDOW_SIZE),
                ),
            }
        });

        let percentiles = self
            .percentiles
            .clone()
            .unwrap_or_else(|| DEFAULT_PERCENTILES.to_vec())
            .into_iter()
            .filter(|p| (0.0..=100.0).contains(p))
            .collect();

        ResolvedSettings {
            selector,
            analytics: AnalyticsSettings {
                outliers,
                smoothing,
                percentiles,
                duration_curve: self.duration_curve.unwrap_or(false),
            },
        }
    }
}

fn format_or(value: &Option<String>, default: &str) -> String {
    non_blank(value).unwrap_or_else(|| default.to_string())
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl Default for ResolvedSettings {
    fn default() -> Self {
        WidgetSettings::default().resolve()
    }
}
