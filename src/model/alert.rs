//! Alert rules attached to graph panels

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::constants::alert_state::{STATE_ALERTING, STATE_NO_DATA};
use crate::constants::panel::THRESHOLD_COLOR_MODE;
use crate::error::{DashboardError, Result};
use crate::model::target::QueryTarget;
use crate::model::ToJsonData;

/// Threshold test applied to the reduced value of a query
///
/// Definitions use the document shape `{"type": "gt", "params": [10]}`; a
/// single-bound evaluator may also give `params` as a bare number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EvaluatorDefinition", into = "EvaluatorDefinition")]
pub enum Evaluator {
    GreaterThan(f64),
    LowerThan(f64),
    WithinRange(f64, f64),
    OutsideRange(f64, f64),
    NoValue,
}

#[derive(Serialize, Deserialize)]
struct EvaluatorDefinition {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, deserialize_with = "deserialize_params")]
    params: Vec<f64>,
}

/// Accepts `params` as either a number or a list of numbers
fn deserialize_params<'de, D>(deserializer: D) -> std::result::Result<Vec<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ScalarOrList {
        Scalar(f64),
        List(Vec<f64>),
    }

    match ScalarOrList::deserialize(deserializer)? {
        ScalarOrList::Scalar(value) => Ok(vec![value]),
        ScalarOrList::List(values) => Ok(values),
    }
}

impl TryFrom<EvaluatorDefinition> for Evaluator {
    type Error = String;

    fn try_from(definition: EvaluatorDefinition) -> std::result::Result<Self, Self::Error> {
        let evaluator = match (definition.kind.as_str(), definition.params.as_slice()) {
            ("gt", &[value]) => Evaluator::GreaterThan(value),
            ("lt", &[value]) => Evaluator::LowerThan(value),
            ("within_range", &[low, high]) => Evaluator::WithinRange(low, high),
            ("outside_range", &[low, high]) => Evaluator::OutsideRange(low, high),
            ("no_value", &[]) => Evaluator::NoValue,
            ("gt" | "lt" | "within_range" | "outside_range" | "no_value", params) => {
                return Err(format!(
                    "evaluator '{}' got {} params",
                    definition.kind,
                    params.len()
                ));
            }
            (kind, _) => return Err(format!("unknown evaluator type '{kind}'")),
        };
        Ok(evaluator)
    }
}

impl From<Evaluator> for EvaluatorDefinition {
    fn from(evaluator: Evaluator) -> Self {
        Self {
            kind: evaluator.type_name().to_string(),
            params: evaluator.params(),
        }
    }
}

impl Evaluator {
    pub fn type_name(&self) -> &'static str {
        match self {
            Evaluator::GreaterThan(_) => "gt",
            Evaluator::LowerThan(_) => "lt",
            Evaluator::WithinRange(..) => "within_range",
            Evaluator::OutsideRange(..) => "outside_range",
            Evaluator::NoValue => "no_value",
        }
    }

    pub fn params(&self) -> Vec<f64> {
        match *self {
            Evaluator::GreaterThan(v) | Evaluator::LowerThan(v) => vec![v],
            Evaluator::WithinRange(low, high) | Evaluator::OutsideRange(low, high) => vec![low, high],
            Evaluator::NoValue => Vec::new(),
        }
    }

    /// Graph thresholds drawn for this evaluator
    pub fn thresholds(&self) -> Vec<Value> {
        let bounds: Vec<(&str, f64)> = match *self {
            Evaluator::GreaterThan(v) => vec![("gt", v)],
            Evaluator::LowerThan(v) => vec![("lt", v)],
            Evaluator::WithinRange(low, high) => vec![("gt", low), ("lt", high)],
            Evaluator::OutsideRange(low, high) => vec![("lt", low), ("gt", high)],
            Evaluator::NoValue => Vec::new(),
        };
        bounds
            .into_iter()
            .map(|(op, value)| {
                json!({
                    "colorMode": THRESHOLD_COLOR_MODE,
                    "fill": true,
                    "line": true,
                    "op": op,
                    "value": value,
                })
            })
            .collect()
    }
}

impl ToJsonData for Evaluator {
    fn to_json_data(&self) -> Value {
        json!({
            "type": self.type_name(),
            "params": self.params(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub from: String,
    pub to: String,
}

impl TimeRange {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// One condition of an alert, pointing at a target of the owning graph by refId
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertCondition {
    #[serde(rename = "target")]
    pub target_ref_id: String,
    pub time_range: TimeRange,
    pub evaluator: Evaluator,
    pub reducer_type: String,
    pub operator: String,
}

impl AlertCondition {
    /// Build a condition over `target`, which must already carry a refId
    ///
    /// The refId is copied at construction, so assign it first with
    /// [`Target::with_ref_id`](crate::model::Target::with_ref_id) or by
    /// running [`Panel::auto_ref_ids`](crate::model::Panel::auto_ref_ids) on
    /// the panel the target belongs to. Fails with
    /// [`DashboardError::MissingField`] when the target has none.
    pub fn new(
        target: &QueryTarget,
        time_range: TimeRange,
        evaluator: Evaluator,
        reducer_type: &str,
        operator: &str,
    ) -> Result<Self> {
        let ref_id = target.ref_id().ok_or(DashboardError::MissingField {
            entity: "alert condition target",
            field: "refId",
        })?;
        Ok(Self {
            target_ref_id: ref_id.to_string(),
            time_range,
            evaluator,
            reducer_type: reducer_type.to_string(),
            operator: operator.to_string(),
        })
    }

    /// Serialize, embedding the referenced target's model when found in `targets`
    pub fn to_json_data_with(&self, targets: &[QueryTarget]) -> Value {
        let model = targets
            .iter()
            .find(|t| t.ref_id() == Some(self.target_ref_id.as_str()))
            .map(ToJsonData::to_json_data);
        json!({
            "evaluator": self.evaluator.to_json_data(),
            "operator": {"type": self.operator},
            "query": {
                "model": model,
                "params": [self.target_ref_id, self.time_range.from, self.time_range.to],
            },
            "reducer": {"params": [], "type": self.reducer_type},
            "type": "query",
        })
    }
}

impl ToJsonData for AlertCondition {
    fn to_json_data(&self) -> Value {
        self.to_json_data_with(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Alert {
    pub name: String,
    pub message: String,
    pub alert_conditions: Vec<AlertCondition>,
    pub execution_error_state: String,
    pub frequency: String,
    pub handler: u32,
    pub no_data_state: String,
    /// Notification channel uids
    pub notifications: Vec<String>,
    #[serde(rename = "for")]
    pub grace_period: String,
    pub alert_rule_tags: BTreeMap<String, String>,
}

impl Default for Alert {
    fn default() -> Self {
        Self {
            name: String::new(),
            message: String::new(),
            alert_conditions: Vec::new(),
            execution_error_state: STATE_ALERTING.to_string(),
            frequency: "60s".to_string(),
            handler: 1,
            no_data_state: STATE_NO_DATA.to_string(),
            notifications: Vec::new(),
            grace_period: "5m".to_string(),
            alert_rule_tags: BTreeMap::new(),
        }
    }
}

impl Alert {
    pub fn new(
        name: impl Into<String>,
        message: impl Into<String>,
        alert_conditions: Vec<AlertCondition>,
    ) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            alert_conditions,
            ..Self::default()
        }
    }

    /// Thresholds of every condition, in condition order
    pub fn thresholds(&self) -> Vec<Value> {
        self.alert_conditions
            .iter()
            .flat_map(|c| c.evaluator.thresholds())
            .collect()
    }

    pub fn to_json_data_with(&self, targets: &[QueryTarget]) -> Value {
        let notifications: Vec<Value> = self
            .notifications
            .iter()
            .map(|uid| json!({"uid": uid}))
            .collect();
        json!({
            "alertRuleTags": self.alert_rule_tags,
            "conditions": self
                .alert_conditions
                .iter()
                .map(|c| c.to_json_data_with(targets))
                .collect::<Vec<_>>(),
            "executionErrorState": self.execution_error_state,
            "for": self.grace_period,
            "frequency": self.frequency,
            "handler": self.handler,
            "message": self.message,
            "name": self.name,
            "noDataState": self.no_data_state,
            "notifications": notifications,
        })
    }
}

impl ToJsonData for Alert {
    fn to_json_data(&self) -> Value {
        self.to_json_data_with(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::operator::OP_AND;
    use crate::constants::reducer::RTYPE_MAX;
    use crate::model::target::Target;

    #[test]
    fn test_evaluator_thresholds() {
        assert_eq!(Evaluator::GreaterThan(10.0).thresholds().len(), 1);
        assert_eq!(Evaluator::GreaterThan(10.0).thresholds()[0]["op"], "gt");
        assert_eq!(Evaluator::WithinRange(1.0, 5.0).thresholds().len(), 2);
        assert!(Evaluator::NoValue.thresholds().is_empty());

        let outside = Evaluator::OutsideRange(1.0, 5.0).thresholds();
        assert_eq!(outside[0]["op"], "lt");
        assert_eq!(outside[1]["op"], "gt");
        assert_eq!(outside[1]["value"], 5.0);
    }

    #[test]
    fn test_evaluator_definition_format() {
        let evaluator: Evaluator = serde_json::from_str(r#"{"type": "gt", "params": 10}"#).unwrap();
        assert_eq!(evaluator, Evaluator::GreaterThan(10.0));

        let range: Evaluator =
            serde_json::from_str(r#"{"type": "within_range", "params": [1, 2]}"#).unwrap();
        assert_eq!(range, Evaluator::WithinRange(1.0, 2.0));
        assert_eq!(range.to_json_data()["params"], json!([1.0, 2.0]));
    }

    #[test]
    fn test_evaluator_params_list_form() {
        let evaluator: Evaluator = serde_json::from_str(r#"{"type": "gt", "params": [10]}"#).unwrap();
        assert_eq!(evaluator, Evaluator::GreaterThan(10.0));

        let none: Evaluator = serde_json::from_str(r#"{"type": "no_value", "params": []}"#).unwrap();
        assert_eq!(none, Evaluator::NoValue);
        let bare: Evaluator = serde_json::from_str(r#"{"type": "no_value"}"#).unwrap();
        assert_eq!(bare, Evaluator::NoValue);
    }

    #[test]
    fn test_evaluator_reads_its_own_output() {
        for evaluator in [
            Evaluator::LowerThan(3.5),
            Evaluator::OutsideRange(1.0, 5.0),
            Evaluator::NoValue,
        ] {
            let parsed: Evaluator = serde_json::from_value(evaluator.to_json_data()).unwrap();
            assert_eq!(parsed, evaluator);
            assert_eq!(serde_json::to_value(evaluator).unwrap(), evaluator.to_json_data());
        }
    }

    #[test]
    fn test_evaluator_rejects_bad_params() {
        let err = serde_json::from_str::<Evaluator>(r#"{"type": "within_range", "params": [1]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("within_range"));

        let err = serde_json::from_str::<Evaluator>(r#"{"type": "between", "params": [1, 2]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("between"));
    }

    #[test]
    fn test_condition_requires_ref_id() {
        let target = QueryTarget::from(Target::new("foo.bar"));
        let err = AlertCondition::new(
            &target,
            TimeRange::new("5m", "now"),
            Evaluator::GreaterThan(10.0),
            RTYPE_MAX,
            OP_AND,
        )
        .unwrap_err();
        assert!(matches!(err, DashboardError::MissingField { field: "refId", .. }));
    }

    #[test]
    fn test_condition_embeds_target_model() {
        let target = QueryTarget::from(Target::new("foo.bar").with_ref_id("A"));
        let condition = AlertCondition::new(
            &target,
            TimeRange::new("5m", "now"),
            Evaluator::GreaterThan(10.0),
            RTYPE_MAX,
            OP_AND,
        )
        .unwrap();

        let data = condition.to_json_data_with(std::slice::from_ref(&target));
        assert_eq!(data["query"]["params"], json!(["A", "5m", "now"]));
        assert_eq!(data["query"]["model"]["expr"], "foo.bar");
        assert_eq!(data["reducer"]["type"], "max");
        assert_eq!(data["operator"]["type"], "and");

        assert_eq!(condition.to_json_data()["query"]["model"], Value::Null);
    }

    #[test]
    fn test_alert_defaults() {
        let data = Alert::new("name", "message", Vec::new()).to_json_data();
        assert_eq!(data["executionErrorState"], "alerting");
        assert_eq!(data["noDataState"], "no_data");
        assert_eq!(data["frequency"], "60s");
        assert_eq!(data["for"], "5m");
    }
}
