// Timewindow domain models
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectorMode {
    Day,
    Week,
    Month,
    #[default]
    Custom,
}

impl SelectorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectorMode::Day => "day",
            SelectorMode::Week => "week",
            SelectorMode::Month => "month",
            SelectorMode::Custom => "custom",
        }
    }

    pub fn is_calendar(&self) -> bool {
        !matches!(self, SelectorMode::Custom)
    }
}

impl fmt::Display for SelectorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown selector mode '{0}'")]
pub struct ParseModeError(pub String);

impl FromStr for SelectorMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(SelectorMode::Day),
            "week" => Ok(SelectorMode::Week),
            "month" => Ok(SelectorMode::Month),
            "custom" => Ok(SelectorMode::Custom),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

#[derive(Debug, Error, PartialEq)]
#[error("navigation direction must be -1 or 1, got {0}")]
pub struct InvalidDirection(pub i64);

impl TryFrom<i64> for Direction {
    type Error = InvalidDirection;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Direction::Previous),
            1 => Ok(Direction::Next),
            other => Err(InvalidDirection(other)),
        }
    }
}

/// Closed interval in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl TimeRange {
    pub fn new(start_ms: i64, end_ms: i64) -> Self {
        Self { start_ms, end_ms }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AggregationType {
    #[default]
    None,
    Avg,
    Min,
    Max,
    Sum,
    Count,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregation {
    #[serde(rename = "type")]
    pub kind: AggregationType,
    pub limit: u32,
}

/// What gets handed to the host dashboard on every push.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timewindow {
    pub fixed_window: TimeRange,
    pub aggregation: Aggregation,
}

impl Timewindow {
    pub fn new(fixed_window: TimeRange, aggregation: Aggregation) -> Self {
        Self {
            fixed_window,
            aggregation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode() {
        assert_eq!("week".parse::<SelectorMode>(), Ok(SelectorMode::Week));
        assert_eq!(" Month ".parse::<SelectorMode>(), Ok(SelectorMode::Month));
        assert_eq!(
            "year".parse::<SelectorMode>(),
            Err(ParseModeError("year".to_string()))
        );
        assert_eq!(SelectorMode::default(), SelectorMode::Custom);
    }

    #[test]
    fn test_direction_from_step() {
        assert_eq!(Direction::try_from(-1), Ok(Direction::Previous));
        assert_eq!(Direction::try_from(1), Ok(Direction::Next));
        assert_eq!(Direction::try_from(0), Err(InvalidDirection(0)));
    }

    #[test]
    fn test_timewindow_wire_format() {
        let tw = Timewindow::new(
            TimeRange::new(1_000, 2_000),
            Aggregation {
                kind: AggregationType::Avg,
                limit: 500,
            },
        );
        let json = serde_json::to_value(tw).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "fixed_window": {"start_ms": 1000, "end_ms": 2000},
                "aggregation": {"type": "AVG", "limit": 500}
            })
        );
    }
}
