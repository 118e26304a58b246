//! Query targets feeding a panel

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::constants::target::{DEFAULT_INTERVAL_FACTOR, DEFAULT_STEP, TIME_SERIES_FORMAT};
use crate::model::ToJsonData;

/// A single query against a data source
///
/// `expr` may embed `#<refId>` references to sibling targets; the expanded
/// text lands in `target_full` once the panel's expressions are resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Target {
    #[serde(alias = "target")]
    pub expr: String,
    pub legend_format: String,
    pub ref_id: Option<String>,
    pub hide: bool,
    pub target_full: Option<String>,
    pub interval: String,
    pub interval_factor: u32,
    pub format: String,
    pub step: u32,
    pub instant: bool,
    pub datasource: Option<String>,
}

impl Default for Target {
    fn default() -> Self {
        Self {
            expr: String::new(),
            legend_format: String::new(),
            ref_id: None,
            hide: false,
            target_full: None,
            interval: String::new(),
            interval_factor: DEFAULT_INTERVAL_FACTOR,
            format: TIME_SERIES_FORMAT.to_string(),
            step: DEFAULT_STEP,
            instant: false,
            datasource: None,
        }
    }
}

impl Target {
    pub fn new(expr: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            ..Self::default()
        }
    }

    pub fn with_legend_format(mut self, legend_format: impl Into<String>) -> Self {
        self.legend_format = legend_format.into();
        self
    }

    pub fn with_ref_id(mut self, ref_id: impl Into<String>) -> Self {
        self.ref_id = Some(ref_id.into());
        self
    }

    pub fn with_hide(mut self, hide: bool) -> Self {
        self.hide = hide;
        self
    }
}

impl ToJsonData for Target {
    fn to_json_data(&self) -> Value {
        let mut data = json!({
            "expr": self.expr,
            "target": self.expr,
            "legendFormat": self.legend_format,
            "refId": self.ref_id.as_deref().unwrap_or_default(),
            "hide": self.hide,
            "interval": self.interval,
            "intervalFactor": self.interval_factor,
            "format": self.format,
            "step": self.step,
            "instant": self.instant,
        });
        if let Some(full) = &self.target_full {
            data["targetFull"] = json!(full);
        }
        if let Some(datasource) = &self.datasource {
            data["datasource"] = json!(datasource);
        }
        data
    }
}

/// CloudWatch metric query
///
/// Every field defaults to empty or false, and serialization always emits
/// the full key set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct CloudWatchTarget {
    pub region: String,
    pub namespace: String,
    pub metric_name: String,
    pub statistics: Vec<String>,
    pub dimensions: BTreeMap<String, String>,
    pub id: String,
    pub expression: String,
    pub period: String,
    pub alias: String,
    pub high_resolution: bool,
    pub ref_id: String,
    pub datasource: String,
    pub hide: bool,
}

impl ToJsonData for CloudWatchTarget {
    fn to_json_data(&self) -> Value {
        json!({
            "region": self.region,
            "namespace": self.namespace,
            "metricName": self.metric_name,
            "statistics": self.statistics,
            "dimensions": self.dimensions,
            "id": self.id,
            "expression": self.expression,
            "period": self.period,
            "alias": self.alias,
            "highResolution": self.high_resolution,
            "refId": self.ref_id,
            "datasource": self.datasource,
            "hide": self.hide,
        })
    }
}

/// Keys only a [`CloudWatchTarget`] definition carries
const CLOUDWATCH_KEYS: &[&str] = &[
    "region",
    "namespace",
    "metricName",
    "statistics",
    "dimensions",
    "id",
    "expression",
    "period",
    "alias",
    "highResolution",
];

/// Entry of a panel's target list
///
/// A definition holding any CloudWatch-only key is parsed as a
/// [`CloudWatchTarget`], anything else as a [`Target`]. Both reject unknown
/// keys, so a misspelt field fails instead of dropping the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryTarget {
    Standard(Target),
    CloudWatch(CloudWatchTarget),
}

impl<'de> Deserialize<'de> for QueryTarget {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let is_cloudwatch = value
            .as_object()
            .is_some_and(|fields| CLOUDWATCH_KEYS.iter().any(|key| fields.contains_key(*key)));

        let parsed = if is_cloudwatch {
            serde_json::from_value(value).map(QueryTarget::CloudWatch)
        } else {
            serde_json::from_value(value).map(QueryTarget::Standard)
        };
        parsed.map_err(serde::de::Error::custom)
    }
}

impl QueryTarget {
    /// Assigned refId, treating an empty string as unset
    pub fn ref_id(&self) -> Option<&str> {
        let id = match self {
            QueryTarget::Standard(t) => t.ref_id.as_deref(),
            QueryTarget::CloudWatch(t) => Some(t.ref_id.as_str()),
        };
        id.filter(|id| !id.is_empty())
    }

    pub fn set_ref_id(&mut self, ref_id: String) {
        match self {
            QueryTarget::Standard(t) => t.ref_id = Some(ref_id),
            QueryTarget::CloudWatch(t) => t.ref_id = ref_id,
        }
    }

    /// Raw expression text, before reference expansion
    pub fn expression(&self) -> &str {
        match self {
            QueryTarget::Standard(t) => &t.expr,
            QueryTarget::CloudWatch(t) => &t.expression,
        }
    }
}

impl From<Target> for QueryTarget {
    fn from(target: Target) -> Self {
        QueryTarget::Standard(target)
    }
}

impl From<CloudWatchTarget> for QueryTarget {
    fn from(target: CloudWatchTarget) -> Self {
        QueryTarget::CloudWatch(target)
    }
}

impl ToJsonData for QueryTarget {
    fn to_json_data(&self) -> Value {
        match self {
            QueryTarget::Standard(t) => t.to_json_data(),
            QueryTarget::CloudWatch(t) => t.to_json_data(),
        }
    }
}
