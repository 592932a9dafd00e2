// Domain layer - Pure models and calculations
pub mod calendar;
pub mod date_format;
pub mod processing;
pub mod statistics;
pub mod telemetry;
pub mod timewindow;
