//! Templating variables
//!
//! A template's `options` and `current` fields are derived from its query and
//! default unless the caller supplies an explicit options list.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{DashboardError, Result};
use crate::model::ToJsonData;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateType {
    #[default]
    Query,
    Custom,
    Interval,
    Constant,
    Datasource,
    Textbox,
    Adhoc,
}

impl TemplateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateType::Query => "query",
            TemplateType::Custom => "custom",
            TemplateType::Interval => "interval",
            TemplateType::Constant => "constant",
            TemplateType::Datasource => "datasource",
            TemplateType::Textbox => "textbox",
            TemplateType::Adhoc => "adhoc",
        }
    }

    /// Types whose query is a comma-separated list of candidate values
    fn has_listed_values(&self) -> bool {
        matches!(self, TemplateType::Custom | TemplateType::Interval)
    }
}

/// One selectable value of a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateOption {
    pub text: String,
    pub value: String,
    #[serde(default)]
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Template {
    pub name: String,
    pub label: Option<String>,
    pub query: String,
    #[serde(rename = "type")]
    pub kind: TemplateType,
    pub default: Option<String>,
    /// Explicit options; never regenerated when present
    pub options: Option<Vec<TemplateOption>>,
    pub data_source: Option<String>,
    /// 0 shows the variable, 1 hides its label, 2 hides it entirely
    pub hide: u8,
    pub include_all: bool,
    pub multi: bool,
    pub all_value: Option<String>,
    pub regex: String,
    /// 1 refreshes on dashboard load
    pub refresh: u8,
    pub sort: u8,
}

impl Default for Template {
    fn default() -> Self {
        Self {
            name: String::new(),
            label: None,
            query: String::new(),
            kind: TemplateType::default(),
            default: None,
            options: None,
            data_source: None,
            hide: 0,
            include_all: false,
            multi: false,
            all_value: None,
            regex: String::new(),
            refresh: 1,
            sort: 1,
        }
    }
}

impl Template {
    pub fn new(name: impl Into<String>, query: impl Into<String>, kind: TemplateType) -> Result<Self> {
        let template = Self {
            name: name.into(),
            query: query.into(),
            kind,
            ..Self::default()
        };
        template.validate()?;
        Ok(template)
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_options(mut self, options: Vec<TemplateOption>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(DashboardError::MissingField {
                entity: "template",
                field: "name",
            });
        }
        Ok(())
    }

    /// Options as they will be serialized
    ///
    /// Explicit options are returned untouched. Otherwise custom and interval
    /// templates split their query on `,`, marking the piece equal to the
    /// default as selected.
    pub fn options(&self) -> Vec<TemplateOption> {
        if let Some(options) = &self.options {
            return options.clone();
        }
        if !self.kind.has_listed_values() || self.query.is_empty() {
            return Vec::new();
        }
        self.query
            .split(',')
            .map(|piece| TemplateOption {
                text: piece.to_string(),
                value: piece.to_string(),
                selected: self.default.as_deref() == Some(piece),
            })
            .collect()
    }

    /// `(text, value)` of the current selection
    ///
    /// With explicit options this is the first option whose value equals the
    /// default, falling back to the literal default when none matches.
    pub fn current(&self) -> (Option<String>, Option<String>) {
        let literal = (self.default.clone(), self.default.clone());
        let Some(options) = &self.options else {
            return literal;
        };
        options
            .iter()
            .find(|option| self.default.as_deref() == Some(option.value.as_str()))
            .map(|option| (Some(option.text.clone()), Some(option.value.clone())))
            .unwrap_or(literal)
    }
}

impl ToJsonData for Template {
    fn to_json_data(&self) -> Value {
        let (text, value) = self.current();
        json!({
            "allValue": self.all_value,
            "current": {
                "text": text,
                "value": value,
                "tags": [],
            },
            "datasource": self.data_source,
            "hide": self.hide,
            "includeAll": self.include_all,
            "label": self.label,
            "multi": self.multi,
            "name": self.name,
            "options": self.options(),
            "query": self.query,
            "refresh": self.refresh,
            "regex": self.regex,
            "sort": self.sort,
            "type": self.kind.as_str(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(value: &str, text: &str, selected: bool) -> TemplateOption {
        TemplateOption {
            text: text.to_string(),
            value: value.to_string(),
            selected,
        }
    }

    #[test]
    fn test_interval_template_current_is_default() {
        let t = Template::new("test", "1m,5m,10m,30m,1h,3h,12h,1d", TemplateType::Interval)
            .unwrap()
            .with_default("1m");

        let data = t.to_json_data();
        assert_eq!(data["current"]["text"], "1m");
        assert_eq!(data["current"]["value"], "1m");
        assert_eq!(data["type"], "interval");
    }

    #[test]
    fn test_custom_template_derives_options() {
        let t = Template::new("test", "1,2,3", TemplateType::Custom)
            .unwrap()
            .with_default("1");

        let data = t.to_json_data();
        assert_eq!(data["options"].as_array().unwrap().len(), 3);
        assert_eq!(data["current"]["text"], "1");
        assert_eq!(data["current"]["value"], "1");
    }

    #[test]
    fn test_only_default_option_selected() {
        let t = Template::new("test", "a,b,c", TemplateType::Custom)
            .unwrap()
            .with_default("b");

        let options = t.options();
        assert_eq!(options.len(), 3);
        let selected: Vec<_> = options.iter().filter(|o| o.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].value, "b");
        assert_eq!(t.current(), (Some("b".to_string()), Some("b".to_string())));
    }

    #[test]
    fn test_no_matching_default_selects_nothing() {
        let t = Template::new("test", "a,b,c", TemplateType::Custom)
            .unwrap()
            .with_default("z");

        assert!(t.options().iter().all(|o| !o.selected));
        assert_eq!(t.to_json_data()["current"]["value"], "z");
    }

    #[test]
    fn test_empty_query_yields_no_options() {
        let t = Template::new("test", "", TemplateType::Custom).unwrap();
        assert!(t.options().is_empty());
        assert_eq!(t.to_json_data()["current"]["text"], Value::Null);
    }

    #[test]
    fn test_explicit_options_not_overridden() {
        let t = Template::new("test", "1,2,3", TemplateType::Custom)
            .unwrap()
            .with_default("1")
            .with_options(vec![
                option("1", "some text 1", true),
                option("2", "some text 2", false),
                option("3", "some text 3", false),
            ]);

        let data = t.to_json_data();
        assert_eq!(data["options"].as_array().unwrap().len(), 3);
        assert_eq!(data["options"][0]["text"], "some text 1");
        assert_eq!(data["current"]["text"], "some text 1");
        assert_eq!(data["current"]["value"], "1");
    }

    #[test]
    fn test_explicit_options_fall_back_to_literal_default() {
        let t = Template::new("test", "1,2", TemplateType::Custom)
            .unwrap()
            .with_default("9")
            .with_options(vec![option("1", "one", false), option("2", "two", false)]);

        assert_eq!(t.current(), (Some("9".to_string()), Some("9".to_string())));
    }

    #[test]
    fn test_explicit_options_first_match_wins() {
        let t = Template::new("test", "", TemplateType::Custom)
            .unwrap()
            .with_default("1")
            .with_options(vec![option("1", "first", false), option("1", "second", false)]);

        assert_eq!(t.current().0.as_deref(), Some("first"));
    }

    #[test]
    fn test_query_template_has_no_derived_options() {
        let t = Template::new("host", "label_values(up, instance)", TemplateType::Query)
            .unwrap()
            .with_default("web-1");
        assert!(t.options().is_empty());
        assert_eq!(t.to_json_data()["current"]["value"], "web-1");
    }

    #[test]
    fn test_missing_name_rejected() {
        let err = Template::new("  ", "1,2", TemplateType::Custom).unwrap_err();
        assert_eq!(
            err,
            DashboardError::MissingField {
                entity: "template",
                field: "name"
            }
        );
    }
}
