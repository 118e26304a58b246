//! Y axes of graph panels

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::constants::format::SHORT_FORMAT;
use crate::model::ToJsonData;

/// A single Y axis of a graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct YAxis {
    pub decimals: Option<u32>,
    pub format: String,
    pub label: Option<String>,
    pub log_base: u32,
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub show: bool,
}

impl Default for YAxis {
    fn default() -> Self {
        Self {
            decimals: None,
            format: SHORT_FORMAT.to_string(),
            label: None,
            log_base: 1,
            max: None,
            min: Some(0.0),
            show: true,
        }
    }
}

impl YAxis {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl ToJsonData for YAxis {
    fn to_json_data(&self) -> Value {
        json!({
            "decimals": self.decimals,
            "format": self.format,
            "label": self.label,
            "logBase": self.log_base,
            "max": self.max,
            "min": self.min,
            "show": self.show,
        })
    }
}

/// Left and right axes used when a graph is built without explicit ones
pub fn default_y_axes() -> Vec<YAxis> {
    vec![YAxis::default(), YAxis::default()]
}
