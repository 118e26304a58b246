//! Dashboard root: metadata, panel tree, templating, annotations and links

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::constants::dashboard::{
    ANNOTATION_ICON_COLOR, DEFAULT_REFRESH, DEFAULT_REFRESH_INTERVALS, DEFAULT_STYLE, DEFAULT_TIME_FROM,
    DEFAULT_TIME_OPTIONS, DEFAULT_TIME_TO, DEFAULT_TIMEZONE, LINK_TYPE_LINK, SCHEMA_VERSION,
};
use crate::error::{DashboardError, Result};
use crate::model::panel::Panel;
use crate::model::template::Template;
use crate::model::ToJsonData;
use crate::normalize;

/// Time window shown when the dashboard opens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Time {
    pub from: String,
    pub to: String,
}

impl Default for Time {
    fn default() -> Self {
        Self {
            from: DEFAULT_TIME_FROM.to_string(),
            to: DEFAULT_TIME_TO.to_string(),
        }
    }
}

/// Event overlay drawn across every graph of the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Annotation {
    pub name: String,
    pub datasource: Option<String>,
    pub enable: bool,
    pub hide: bool,
    pub icon_color: String,
    pub expr: String,
    pub tags: Vec<String>,
}

impl Default for Annotation {
    fn default() -> Self {
        Self {
            name: String::new(),
            datasource: None,
            enable: true,
            hide: false,
            icon_color: ANNOTATION_ICON_COLOR.to_string(),
            expr: String::new(),
            tags: Vec::new(),
        }
    }
}

impl Annotation {
    pub fn new(name: impl Into<String>, expr: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expr: expr.into(),
            ..Self::default()
        }
    }
}

impl ToJsonData for Annotation {
    fn to_json_data(&self) -> Value {
        json!({
            "datasource": self.datasource,
            "enable": self.enable,
            "expr": self.expr,
            "hide": self.hide,
            "iconColor": self.icon_color,
            "name": self.name,
            "tags": self.tags,
        })
    }
}

/// Link shown in the dashboard header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct DashboardLink {
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub tags: Vec<String>,
    pub as_dropdown: bool,
    pub include_vars: bool,
    pub keep_time: bool,
    pub target_blank: bool,
}

impl Default for DashboardLink {
    fn default() -> Self {
        Self {
            title: String::new(),
            url: String::new(),
            kind: LINK_TYPE_LINK.to_string(),
            tags: Vec::new(),
            as_dropdown: false,
            include_vars: false,
            keep_time: true,
            target_blank: false,
        }
    }
}

impl DashboardLink {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            ..Self::default()
        }
    }
}

impl ToJsonData for DashboardLink {
    fn to_json_data(&self) -> Value {
        json!({
            "asDropdown": self.as_dropdown,
            "includeVars": self.include_vars,
            "keepTime": self.keep_time,
            "tags": self.tags,
            "targetBlank": self.target_blank,
            "title": self.title,
            "type": self.kind,
            "url": self.url,
        })
    }
}

/// Root of the object graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dashboard {
    pub title: String,
    pub uid: Option<String>,
    pub id: Option<u32>,
    pub description: String,
    pub panels: Vec<Panel>,
    pub templating: Vec<Template>,
    pub annotations: Vec<Annotation>,
    pub links: Vec<DashboardLink>,
    pub tags: Vec<String>,
    pub editable: bool,
    pub refresh: String,
    pub schema_version: u32,
    pub shared_crosshair: bool,
    pub style: String,
    pub time: Time,
    pub timezone: String,
    pub version: u32,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self {
            title: String::new(),
            uid: None,
            id: None,
            description: String::new(),
            panels: Vec::new(),
            templating: Vec::new(),
            annotations: Vec::new(),
            links: Vec::new(),
            tags: Vec::new(),
            editable: true,
            refresh: DEFAULT_REFRESH.to_string(),
            schema_version: SCHEMA_VERSION,
            shared_crosshair: false,
            style: DEFAULT_STYLE.to_string(),
            time: Time::default(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            version: 0,
        }
    }
}

impl Dashboard {
    pub fn new(title: impl Into<String>, panels: Vec<Panel>) -> Result<Self> {
        let dashboard = Self {
            title: title.into(),
            panels,
            ..Self::default()
        };
        dashboard.validate()?;
        Ok(dashboard)
    }

    pub fn with_templating(mut self, templating: Vec<Template>) -> Self {
        self.templating = templating;
        self
    }

    pub fn with_annotations(mut self, annotations: Vec<Annotation>) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn with_links(mut self, links: Vec<DashboardLink>) -> Self {
        self.links = links;
        self
    }

    /// Check fields that have no meaningful default
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(DashboardError::MissingField {
                entity: "dashboard",
                field: "title",
            });
        }
        self.templating.iter().try_for_each(Template::validate)
    }

    /// Give every panel lacking an id the next unused integer
    ///
    /// One counter runs across the whole panel tree, rows included, so ids
    /// stay unique dashboard-wide.
    pub fn auto_panel_ids(mut self) -> Self {
        normalize::assign_panel_ids(&mut self.panels);
        self
    }

    /// Rebuild the panel tree by passing every non-row panel through `f`
    pub fn try_map_panels<F, E>(mut self, mut f: F) -> std::result::Result<Self, E>
    where
        F: FnMut(Panel) -> std::result::Result<Panel, E>,
    {
        let panels = std::mem::take(&mut self.panels);
        self.panels = normalize::try_map_leaf_panels(panels, &mut f)?;
        Ok(self)
    }
}

impl ToJsonData for Dashboard {
    fn to_json_data(&self) -> Value {
        let panels: Vec<Value> = self.panels.iter().flat_map(Panel::json_entries).collect();
        let templates: Vec<Value> = self.templating.iter().map(ToJsonData::to_json_data).collect();
        let annotations: Vec<Value> = self.annotations.iter().map(ToJsonData::to_json_data).collect();
        let links: Vec<Value> = self.links.iter().map(ToJsonData::to_json_data).collect();
        json!({
            "__inputs": [],
            "annotations": {"list": annotations},
            "description": self.description,
            "editable": self.editable,
            "gnetId": null,
            "hideControls": false,
            "id": self.id,
            "links": links,
            "panels": panels,
            "refresh": self.refresh,
            "schemaVersion": self.schema_version,
            "sharedCrosshair": self.shared_crosshair,
            "style": self.style,
            "tags": self.tags,
            "templating": {"list": templates},
            "time": {"from": self.time.from, "to": self.time.to},
            "timepicker": {
                "hidden": false,
                "refresh_intervals": DEFAULT_REFRESH_INTERVALS,
                "time_options": DEFAULT_TIME_OPTIONS,
            },
            "timezone": self.timezone,
            "title": self.title,
            "uid": self.uid,
            "version": self.version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::dashboard::LINK_TYPE_DASHBOARDS;
    use crate::model::panel::{Graph, Row, Text};
    use crate::model::target::Target;
    use crate::model::template::TemplateType;

    #[test]
    fn test_missing_title_rejected() {
        let err = Dashboard::new("", Vec::new()).unwrap_err();
        assert_eq!(
            err,
            DashboardError::MissingField {
                entity: "dashboard",
                field: "title"
            }
        );
    }

    #[test]
    fn test_validate_checks_templates() {
        let mut dashboard = Dashboard::new("d", Vec::new()).unwrap();
        dashboard.templating.push(Template {
            kind: TemplateType::Custom,
            ..Template::default()
        });
        assert!(dashboard.validate().is_err());
    }

    #[test]
    fn test_rows_flatten_into_panel_list() {
        let dashboard = Dashboard::new(
            "d",
            vec![
                Row::new(vec![Graph::new("g", vec![Target::new("up").into()]).into()]).into(),
                Text::default().into(),
            ],
        )
        .unwrap();

        let data = dashboard.to_json_data();
        let panels = data["panels"].as_array().unwrap();
        assert_eq!(panels.len(), 2);
        assert_eq!(panels[0]["type"], "row");
        assert_eq!(panels[1]["type"], "text");
    }

    #[test]
    fn test_annotations_and_links_emitted() {
        let dashboard = Dashboard::new("d", Vec::new())
            .unwrap()
            .with_annotations(vec![Annotation::new("Deploys", "changes(deploy_total[5m]) > 0")])
            .with_links(vec![DashboardLink::new("Runbook", "https://runbooks.example/web")]);

        let data = dashboard.to_json_data();
        let annotation = &data["annotations"]["list"][0];
        assert_eq!(annotation["name"], "Deploys");
        assert_eq!(annotation["enable"], true);
        assert_eq!(annotation["iconColor"], ANNOTATION_ICON_COLOR);
        assert_eq!(data["links"][0]["url"], "https://runbooks.example/web");
        assert_eq!(data["links"][0]["type"], "link");
        assert_eq!(data["links"][0]["keepTime"], true);
    }

    #[test]
    fn test_annotations_and_links_from_definition() {
        let dashboard: Dashboard = serde_json::from_str(
            r#"{
                "title": "d",
                "annotations": [{"name": "Deploys", "datasource": "prometheus", "tags": ["deploy"]}],
                "links": [{"title": "Related", "type": "dashboards", "tags": ["web"], "asDropdown": true}]
            }"#,
        )
        .unwrap();
        assert_eq!(dashboard.annotations[0].datasource.as_deref(), Some("prometheus"));
        assert!(dashboard.annotations[0].enable);
        assert_eq!(dashboard.links[0].kind, LINK_TYPE_DASHBOARDS);
        assert!(dashboard.links[0].as_dropdown);

        let empty = Dashboard::new("d", Vec::new()).unwrap().to_json_data();
        assert_eq!(empty["annotations"], json!({"list": []}));
        assert_eq!(empty["links"], json!([]));
    }

    #[test]
    fn test_serialization_is_pure() {
        let dashboard = Dashboard::new("d", vec![Graph::new("g", Vec::new()).into()])
            .unwrap()
            .with_templating(vec![
                Template::new("interval", "1m,5m", TemplateType::Interval)
                    .unwrap()
                    .with_default("5m"),
            ]);
        let before = dashboard.clone();

        assert_eq!(dashboard.to_json_data(), dashboard.to_json_data());
        assert_eq!(dashboard, before);
        assert_eq!(dashboard.to_json_data()["panels"][0]["id"], Value::Null);
        assert_eq!(dashboard.to_json_data()["templating"]["list"][0]["current"]["text"], "5m");
    }
}
