// Host data context used to resolve ${attribute} references
use crate::domain::telemetry::TimeSeriesPoint;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Snapshot of what the host dashboard knows about the widget's entity.
/// Each source may be absent entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataContext {
    pub entity_attributes: Option<HashMap<String, Value>>,
    pub shared_attributes: Option<HashMap<String, Value>>,
    pub latest_telemetry: Option<HashMap<String, Vec<TimeSeriesPoint>>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeSource {
    Entity,
    Shared,
    Telemetry,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeLookup {
    Found { value: f64, source: AttributeSource },
    NotAvailable,
}

impl DataContext {
    /// Look up a numeric value by name: entity attributes first, then shared
    /// attributes, then the most recent telemetry sample.
    pub fn lookup_numeric(&self, name: &str) -> AttributeLookup {
        if let Some(value) = attribute_value(&self.entity_attributes, name) {
            return AttributeLookup::Found {
                value,
                source: AttributeSource::Entity,
            };
        }

        if let Some(value) = attribute_value(&self.shared_attributes, name) {
            return AttributeLookup::Found {
                value,
                source: AttributeSource::Shared,
            };
        }

        if let Some(value) = self.latest_value(name) {
            return AttributeLookup::Found {
                value,
                source: AttributeSource::Telemetry,
            };
        }

        AttributeLookup::NotAvailable
    }

    fn latest_value(&self, name: &str) -> Option<f64> {
        let telemetry = self.latest_telemetry.as_ref()?;
        let points = telemetry.get(name)?;
        points
            .iter()
            .filter(|p| p.value.is_finite())
            .max_by_key(|p| p.time_ms)
            .map(|p| p.value)
    }
}

fn attribute_value(attributes: &Option<HashMap<String, Value>>, name: &str) -> Option<f64> {
    let value = attributes.as_ref()?.get(name)?;
    numeric_value(value)
}

fn numeric_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}
