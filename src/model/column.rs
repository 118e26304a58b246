//! Table columns and their display styles

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::constants::format::SHORT_FORMAT;
use crate::model::ToJsonData;

/// Projection of one aggregated field into a table column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub text: String,
    pub value: String,
}

impl Column {
    pub fn new(text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            value: value.into(),
        }
    }
}

impl Default for Column {
    fn default() -> Self {
        Self::new("Avg", "avg")
    }
}

impl ToJsonData for Column {
    fn to_json_data(&self) -> Value {
        json!({
            "text": self.text,
            "value": self.value,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NumberStyle {
    pub unit: String,
    pub decimals: u32,
    pub thresholds: Vec<f64>,
    pub colors: Vec<String>,
    /// `cell`, `value` or `row`; no colouring when unset
    pub color_mode: Option<String>,
}

impl Default for NumberStyle {
    fn default() -> Self {
        Self {
            unit: SHORT_FORMAT.to_string(),
            decimals: 2,
            thresholds: Vec::new(),
            colors: vec![
                "rgba(245, 54, 54, 0.9)".to_string(),
                "rgba(237, 129, 40, 0.89)".to_string(),
                "rgba(50, 172, 45, 0.97)".to_string(),
            ],
            color_mode: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StringStyle {
    pub preserve_format: bool,
    pub sanitize: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DateStyle {
    pub date_format: String,
}

impl Default for DateStyle {
    fn default() -> Self {
        Self {
            date_format: "YYYY-MM-DD HH:mm:ss".to_string(),
        }
    }
}

/// How the cells matched by a style are rendered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColumnStyleKind {
    Number(NumberStyle),
    String(StringStyle),
    Date(DateStyle),
    Hidden,
}

impl Default for ColumnStyleKind {
    fn default() -> Self {
        ColumnStyleKind::Number(NumberStyle::default())
    }
}

impl ColumnStyleKind {
    fn extend(&self, data: &mut Map<String, Value>) {
        match self {
            ColumnStyleKind::Number(style) => {
                data.insert("type".into(), json!("number"));
                data.insert("unit".into(), json!(style.unit));
                data.insert("decimals".into(), json!(style.decimals));
                data.insert("thresholds".into(), json!(style.thresholds));
                data.insert("colors".into(), json!(style.colors));
                data.insert("colorMode".into(), json!(style.color_mode));
            }
            ColumnStyleKind::String(style) => {
                data.insert("type".into(), json!("string"));
                data.insert("preserveFormat".into(), json!(style.preserve_format));
                data.insert("sanitize".into(), json!(style.sanitize));
            }
            ColumnStyleKind::Date(style) => {
                data.insert("type".into(), json!("date"));
                data.insert("dateFormat".into(), json!(style.date_format));
            }
            ColumnStyleKind::Hidden => {
                data.insert("type".into(), json!("hidden"));
            }
        }
    }
}

/// Display style applied to the columns whose name matches `pattern`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnStyle {
    pub alias: String,
    pub pattern: String,
    pub align: String,
    pub link: bool,
    pub link_open_in_new_tab: bool,
    pub link_url: String,
    pub link_tooltip: String,
    pub kind: ColumnStyleKind,
}

impl Default for ColumnStyle {
    fn default() -> Self {
        Self {
            alias: String::new(),
            pattern: String::new(),
            align: "auto".to_string(),
            link: false,
            link_open_in_new_tab: true,
            link_url: String::new(),
            link_tooltip: String::new(),
            kind: ColumnStyleKind::default(),
        }
    }
}

impl ColumnStyle {
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }
}

impl ToJsonData for ColumnStyle {
    fn to_json_data(&self) -> Value {
        let mut data = Map::new();
        data.insert("alias".into(), json!(self.alias));
        data.insert("pattern".into(), json!(self.pattern));
        data.insert("align".into(), json!(self.align));
        data.insert("link".into(), json!(self.link));
        data.insert("linkTargetBlank".into(), json!(self.link_open_in_new_tab));
        data.insert("linkUrl".into(), json!(self.link_url));
        data.insert("linkTooltip".into(), json!(self.link_tooltip));
        self.kind.extend(&mut data);
        Value::Object(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style_is_number() {
        let data = ColumnStyle::default().to_json_data();
        assert_eq!(data["type"], "number");
        assert_eq!(data["unit"], "short");
        assert_eq!(data["decimals"], 2);
        assert_eq!(data["colorMode"], Value::Null);
    }

    #[test]
    fn test_hidden_style_has_no_number_keys() {
        let style = ColumnStyle {
            kind: ColumnStyleKind::Hidden,
            ..ColumnStyle::default()
        };
        let data = style.to_json_data();
        assert_eq!(data["type"], "hidden");
        assert!(data.get("unit").is_none());
    }

    #[test]
    fn test_style_definition_parses_nested_kind() {
        let style: ColumnStyle = serde_json::from_str(
            r#"{"alias": "When", "kind": {"type": "date", "dateFormat": "HH:mm"}}"#,
        )
        .unwrap();
        assert_eq!(style.alias, "When");
        assert_eq!(
            style.kind,
            ColumnStyleKind::Date(DateStyle {
                date_format: "HH:mm".to_string()
            })
        );
        assert_eq!(style.align, "auto");
    }
}
