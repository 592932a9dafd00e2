use crate::application::settings::WidgetSettings;
use serde::Deserialize;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind_address: String,
    /// Push ranges to the dashboard-wide timewindow instead of the widget's own.
    pub use_dashboard_timewindow: bool,
}

pub fn load_service_config() -> anyhow::Result<ServiceConfig> {
    let settings = config::Config::builder()
        .set_default("server.bind_address", DEFAULT_BIND_ADDRESS)?
        .set_default("server.use_dashboard_timewindow", true)?
        .add_source(config::File::with_name("config/server").required(false))
        .add_source(config::Environment::with_prefix("WIDGETS").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Default widget settings, overlaid by whatever each widget sends on init.
pub fn load_widget_defaults() -> anyhow::Result<WidgetSettings> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/widgets").required(false))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::processing::OutlierMethod;
    use crate::domain::timewindow::SelectorMode;

    #[test]
    fn test_widget_defaults_from_toml() {
        let toml = r#"
            default_mode = "week"
            month_format = "MMM YYYY"
            remove_outliers = true
            outlier_method = "zscore"
            percentiles = [10.0, 90.0]
        "#;
        let settings: WidgetSettings = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.default_mode, Some(SelectorMode::Week));
        assert_eq!(settings.month_format.as_deref(), Some("MMM YYYY"));
        assert_eq!(settings.outlier_method, Some(OutlierMethod::Zscore));
        assert_eq!(settings.percentiles, Some(vec![10.0, 90.0]));
        assert_eq!(settings.day_format, None);
    }

    #[test]
    fn test_service_defaults() {
        let config: ServiceConfig = config::Config::builder()
            .set_default("server.bind_address", DEFAULT_BIND_ADDRESS)
            .unwrap()
            .set_default("server.use_dashboard_timewindow", true)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.bind_address, DEFAULT_BIND_ADDRESS);
        assert!(config.server.use_dashboard_timewindow);
    }
}
