//! Panel variants
//!
//! [`Panel`] is the closed set of panel kinds a dashboard can hold. Every
//! variant serializes to a single mapping except [`Row`], which serializes to
//! a one-element array so parents can flatten it into their panel list.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::constants::format::NO_FORMAT;
use crate::constants::panel::{
    DEFAULT_NULL_POINT_MODE, DEFAULT_ROW_HEIGHT, DEFAULT_ROW_TITLE, GRAPH_TYPE, ROW_TYPE,
    SINGLESTAT_TYPE, TABLE_TYPE, TEXT_TYPE,
};
use crate::error::Result;
use crate::model::alert::Alert;
use crate::model::axis::{default_y_axes, YAxis};
use crate::model::column::{Column, ColumnStyle};
use crate::model::target::QueryTarget;
use crate::model::ToJsonData;
use crate::{normalize, resolve};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Panel {
    Graph(Graph),
    #[serde(rename = "singlestat")]
    SingleStat(SingleStat),
    Table(Table),
    Text(Text),
    Row(Row),
}

impl Panel {
    /// Identifier slot of a non-row panel; rows carry no identifier
    pub fn id_mut(&mut self) -> Option<&mut Option<u32>> {
        match self {
            Panel::Graph(p) => Some(&mut p.id),
            Panel::SingleStat(p) => Some(&mut p.id),
            Panel::Table(p) => Some(&mut p.id),
            Panel::Text(p) => Some(&mut p.id),
            Panel::Row(_) => None,
        }
    }

    pub fn id(&self) -> Option<u32> {
        match self {
            Panel::Graph(p) => p.id,
            Panel::SingleStat(p) => p.id,
            Panel::Table(p) => p.id,
            Panel::Text(p) => p.id,
            Panel::Row(_) => None,
        }
    }

    pub fn targets(&self) -> &[QueryTarget] {
        match self {
            Panel::Graph(p) => &p.targets,
            Panel::SingleStat(p) => &p.targets,
            Panel::Table(p) => &p.targets,
            Panel::Text(_) | Panel::Row(_) => &[],
        }
    }

    fn targets_mut(&mut self) -> Option<&mut Vec<QueryTarget>> {
        match self {
            Panel::Graph(p) => Some(&mut p.targets),
            Panel::SingleStat(p) => Some(&mut p.targets),
            Panel::Table(p) => Some(&mut p.targets),
            Panel::Text(_) | Panel::Row(_) => None,
        }
    }

    /// Child panels of a row
    pub fn children(&self) -> &[Panel] {
        match self {
            Panel::Row(row) => &row.panels,
            _ => &[],
        }
    }

    /// Give every target of this panel lacking a refId the next free label
    ///
    /// Only this panel's own target list is touched; a row's children are
    /// not visited.
    pub fn auto_ref_ids(mut self) -> Self {
        if let Some(targets) = self.targets_mut() {
            normalize::assign_ref_ids(targets);
        }
        self
    }

    /// Expand `#<refId>` references in this panel's target expressions
    pub fn resolve_expression_refs(mut self) -> Result<Self> {
        if let Some(targets) = self.targets_mut() {
            resolve::resolve_targets(targets)?;
        }
        Ok(self)
    }

    /// Serialized entries this panel contributes to its parent's panel list
    pub fn json_entries(&self) -> Vec<Value> {
        match self.to_json_data() {
            Value::Array(entries) => entries,
            entry => vec![entry],
        }
    }
}

impl ToJsonData for Panel {
    fn to_json_data(&self) -> Value {
        match self {
            Panel::Graph(p) => p.to_json_data(),
            Panel::SingleStat(p) => p.to_json_data(),
            Panel::Table(p) => p.to_json_data(),
            Panel::Text(p) => p.to_json_data(),
            Panel::Row(p) => p.to_json_data(),
        }
    }
}

impl From<Graph> for Panel {
    fn from(panel: Graph) -> Self {
        Panel::Graph(panel)
    }
}

impl From<SingleStat> for Panel {
    fn from(panel: SingleStat) -> Self {
        Panel::SingleStat(panel)
    }
}

impl From<Table> for Panel {
    fn from(panel: Table) -> Self {
        Panel::Table(panel)
    }
}

impl From<Text> for Panel {
    fn from(panel: Text) -> Self {
        Panel::Text(panel)
    }
}

impl From<Row> for Panel {
    fn from(panel: Row) -> Self {
        Panel::Row(panel)
    }
}

/// Keys every non-row panel shares
#[allow(clippy::too_many_arguments)]
fn common_fields(
    kind: &str,
    id: Option<u32>,
    title: &str,
    description: &Option<String>,
    data_source: &Option<String>,
    span: Option<u32>,
    transparent: bool,
    targets: &[QueryTarget],
) -> Map<String, Value> {
    let mut data = Map::new();
    data.insert("type".into(), json!(kind));
    data.insert("id".into(), json!(id));
    data.insert("title".into(), json!(title));
    data.insert("description".into(), json!(description));
    data.insert("datasource".into(), json!(data_source));
    data.insert("span".into(), json!(span));
    data.insert("transparent".into(), json!(transparent));
    data.insert(
        "targets".into(),
        Value::Array(targets.iter().map(ToJsonData::to_json_data).collect()),
    );
    data
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Legend {
    pub show: bool,
    pub values: bool,
    pub min: bool,
    pub max: bool,
    pub current: bool,
    pub total: bool,
    pub avg: bool,
    pub align_as_table: bool,
    pub right_side: bool,
}

impl Default for Legend {
    fn default() -> Self {
        Self {
            show: true,
            values: false,
            min: false,
            max: false,
            current: false,
            total: false,
            avg: false,
            align_as_table: false,
            right_side: false,
        }
    }
}

impl ToJsonData for Legend {
    fn to_json_data(&self) -> Value {
        json!({
            "show": self.show,
            "values": self.values,
            "min": self.min,
            "max": self.max,
            "current": self.current,
            "total": self.total,
            "avg": self.avg,
            "alignAsTable": self.align_as_table,
            "rightSide": self.right_side,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Graph {
    pub id: Option<u32>,
    pub title: String,
    pub description: Option<String>,
    pub data_source: Option<String>,
    pub span: Option<u32>,
    pub transparent: bool,
    pub targets: Vec<QueryTarget>,
    pub y_axes: Vec<YAxis>,
    pub alert: Option<Alert>,
    pub legend: Legend,
    pub lines: bool,
    pub line_width: u32,
    pub fill: u32,
    pub bars: bool,
    pub points: bool,
    pub stack: bool,
    pub percentage: bool,
    pub null_point_mode: String,
}

impl Default for Graph {
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            description: None,
            data_source: None,
            span: None,
            transparent: false,
            targets: Vec::new(),
            y_axes: default_y_axes(),
            alert: None,
            legend: Legend::default(),
            lines: true,
            line_width: 2,
            fill: 1,
            bars: false,
            points: false,
            stack: false,
            percentage: false,
            null_point_mode: DEFAULT_NULL_POINT_MODE.to_string(),
        }
    }
}

impl Graph {
    pub fn new(title: impl Into<String>, targets: Vec<QueryTarget>) -> Self {
        Self {
            title: title.into(),
            targets,
            ..Self::default()
        }
    }

    pub fn with_data_source(mut self, data_source: impl Into<String>) -> Self {
        self.data_source = Some(data_source.into());
        self
    }

    pub fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_y_axes(mut self, y_axes: Vec<YAxis>) -> Self {
        self.y_axes = y_axes;
        self
    }

    pub fn with_alert(mut self, alert: Alert) -> Self {
        self.alert = Some(alert);
        self
    }
}

impl ToJsonData for Graph {
    fn to_json_data(&self) -> Value {
        let mut data = common_fields(
            GRAPH_TYPE,
            self.id,
            &self.title,
            &self.description,
            &self.data_source,
            self.span,
            self.transparent,
            &self.targets,
        );
        data.insert(
            "yaxes".into(),
            Value::Array(self.y_axes.iter().map(ToJsonData::to_json_data).collect()),
        );
        data.insert("legend".into(), self.legend.to_json_data());
        data.insert("lines".into(), json!(self.lines));
        data.insert("linewidth".into(), json!(self.line_width));
        data.insert("fill".into(), json!(self.fill));
        data.insert("bars".into(), json!(self.bars));
        data.insert("points".into(), json!(self.points));
        data.insert("stack".into(), json!(self.stack));
        data.insert("percentage".into(), json!(self.percentage));
        data.insert("nullPointMode".into(), json!(self.null_point_mode));
        data.insert("aliasColors".into(), json!({}));
        data.insert("seriesOverrides".into(), json!([]));
        data.insert(
            "tooltip".into(),
            json!({"shared": true, "sort": 0, "value_type": "cumulative"}),
        );
        data.insert("xaxis".into(), json!({"mode": "time", "show": true}));

        // Alert bounds are mirrored at panel level so the graph draws them
        let thresholds = self.alert.as_ref().map(Alert::thresholds).unwrap_or_default();
        data.insert("thresholds".into(), Value::Array(thresholds));
        if let Some(alert) = &self.alert {
            data.insert("alert".into(), alert.to_json_data_with(&self.targets));
        }
        Value::Object(data)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SingleStat {
    pub id: Option<u32>,
    pub title: String,
    pub description: Option<String>,
    pub data_source: Option<String>,
    pub span: Option<u32>,
    pub transparent: bool,
    pub targets: Vec<QueryTarget>,
    pub format: String,
    pub prefix: String,
    pub postfix: String,
    pub value_name: String,
    pub decimals: Option<u32>,
    /// Comma-separated bounds, e.g. `"50,80"`
    pub thresholds: String,
    pub colors: Vec<String>,
    pub color_background: bool,
    pub color_value: bool,
    pub sparkline: bool,
    pub gauge: bool,
    pub gauge_min: f64,
    pub gauge_max: f64,
}

impl Default for SingleStat {
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            description: None,
            data_source: None,
            span: None,
            transparent: false,
            targets: Vec::new(),
            format: NO_FORMAT.to_string(),
            prefix: String::new(),
            postfix: String::new(),
            value_name: "avg".to_string(),
            decimals: None,
            thresholds: String::new(),
            colors: vec![
                "#299c46".to_string(),
                "rgba(237, 129, 40, 0.89)".to_string(),
                "#d44a3a".to_string(),
            ],
            color_background: false,
            color_value: false,
            sparkline: false,
            gauge: false,
            gauge_min: 0.0,
            gauge_max: 100.0,
        }
    }
}

impl SingleStat {
    pub fn new(
        data_source: impl Into<String>,
        targets: Vec<QueryTarget>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            data_source: Some(data_source.into()),
            targets,
            title: title.into(),
            ..Self::default()
        }
    }
}

impl ToJsonData for SingleStat {
    fn to_json_data(&self) -> Value {
        let mut data = common_fields(
            SINGLESTAT_TYPE,
            self.id,
            &self.title,
            &self.description,
            &self.data_source,
            self.span,
            self.transparent,
            &self.targets,
        );
        data.insert("format".into(), json!(self.format));
        data.insert("prefix".into(), json!(self.prefix));
        data.insert("postfix".into(), json!(self.postfix));
        data.insert("valueName".into(), json!(self.value_name));
        data.insert("decimals".into(), json!(self.decimals));
        data.insert("thresholds".into(), json!(self.thresholds));
        data.insert("colors".into(), json!(self.colors));
        data.insert("colorBackground".into(), json!(self.color_background));
        data.insert("colorValue".into(), json!(self.color_value));
        data.insert(
            "sparkline".into(),
            json!({
                "show": self.sparkline,
                "full": false,
                "fillColor": "rgba(31, 118, 189, 0.18)",
                "lineColor": "rgb(31, 120, 193)",
            }),
        );
        data.insert(
            "gauge".into(),
            json!({
                "show": self.gauge,
                "minValue": self.gauge_min,
                "maxValue": self.gauge_max,
                "thresholdLabels": false,
                "thresholdMarkers": true,
            }),
        );
        data.insert("mappingType".into(), json!(1));
        data.insert(
            "valueMaps".into(),
            json!([{"op": "=", "text": "N/A", "value": "null"}]),
        );
        data.insert("nullPointMode".into(), json!(DEFAULT_NULL_POINT_MODE));
        Value::Object(data)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSort {
    pub col: u32,
    pub desc: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Table {
    pub id: Option<u32>,
    pub title: String,
    pub description: Option<String>,
    pub data_source: Option<String>,
    pub span: Option<u32>,
    pub transparent: bool,
    pub targets: Vec<QueryTarget>,
    pub columns: Vec<Column>,
    pub styles: Vec<ColumnStyle>,
    pub font_size: String,
    pub page_size: Option<u32>,
    pub show_header: bool,
    pub sort: Option<ColumnSort>,
    pub transform: String,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            description: None,
            data_source: None,
            span: None,
            transparent: false,
            targets: Vec::new(),
            columns: Vec::new(),
            styles: Vec::new(),
            font_size: "100%".to_string(),
            page_size: None,
            show_header: true,
            sort: None,
            transform: "timeseries_to_columns".to_string(),
        }
    }
}

impl Table {
    /// Build a table from columns paired with an optional style each
    ///
    /// Styles keep the column order but drop unstyled columns, and each
    /// style's pattern is replaced by its column's text.
    pub fn with_styled_columns(
        columns: Vec<(Column, Option<ColumnStyle>)>,
        data_source: impl Into<String>,
        targets: Vec<QueryTarget>,
        title: impl Into<String>,
    ) -> Self {
        let (columns, styles) = pair_styled_columns(columns);
        Self {
            columns,
            styles,
            data_source: Some(data_source.into()),
            targets,
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Split `(Column, Option<ColumnStyle>)` pairs into columns and pattern-bound styles
pub fn pair_styled_columns(
    pairs: Vec<(Column, Option<ColumnStyle>)>,
) -> (Vec<Column>, Vec<ColumnStyle>) {
    let mut columns = Vec::with_capacity(pairs.len());
    let mut styles = Vec::new();
    for (column, style) in pairs {
        if let Some(style) = style {
            styles.push(style.with_pattern(column.text.clone()));
        }
        columns.push(column);
    }
    (columns, styles)
}

impl ToJsonData for Table {
    fn to_json_data(&self) -> Value {
        let mut data = common_fields(
            TABLE_TYPE,
            self.id,
            &self.title,
            &self.description,
            &self.data_source,
            self.span,
            self.transparent,
            &self.targets,
        );
        data.insert(
            "columns".into(),
            Value::Array(self.columns.iter().map(ToJsonData::to_json_data).collect()),
        );
        data.insert(
            "styles".into(),
            Value::Array(self.styles.iter().map(ToJsonData::to_json_data).collect()),
        );
        data.insert("fontSize".into(), json!(self.font_size));
        data.insert("pageSize".into(), json!(self.page_size));
        data.insert("showHeader".into(), json!(self.show_header));
        data.insert("sort".into(), json!(self.sort));
        data.insert("transform".into(), json!(self.transform));
        Value::Object(data)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Text {
    pub id: Option<u32>,
    pub title: String,
    pub description: Option<String>,
    pub span: Option<u32>,
    pub transparent: bool,
    pub content: String,
    /// `markdown` or `html`
    pub mode: String,
}

impl Default for Text {
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            description: None,
            span: None,
            transparent: false,
            content: String::new(),
            mode: "markdown".to_string(),
        }
    }
}

impl ToJsonData for Text {
    fn to_json_data(&self) -> Value {
        let mut data = common_fields(
            TEXT_TYPE,
            self.id,
            &self.title,
            &self.description,
            &None,
            self.span,
            self.transparent,
            &[],
        );
        data.remove("targets");
        data.insert("content".into(), json!(self.content));
        data.insert("mode".into(), json!(self.mode));
        Value::Object(data)
    }
}

/// Horizontal group of child panels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Row {
    pub title: Option<String>,
    /// Defaults to whether a title was given
    pub show_title: Option<bool>,
    pub collapsed: bool,
    pub height: u32,
    pub repeat: Option<String>,
    pub panels: Vec<Panel>,
}

impl Default for Row {
    fn default() -> Self {
        Self {
            title: None,
            show_title: None,
            collapsed: false,
            height: DEFAULT_ROW_HEIGHT,
            repeat: None,
            panels: Vec::new(),
        }
    }
}

impl Row {
    pub fn new(panels: Vec<Panel>) -> Self {
        Self {
            panels,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_show_title(mut self, show_title: bool) -> Self {
        self.show_title = Some(show_title);
        self
    }
}

impl ToJsonData for Row {
    fn to_json_data(&self) -> Value {
        let panels: Vec<Value> = self.panels.iter().flat_map(Panel::json_entries).collect();
        json!([{
            "type": ROW_TYPE,
            "title": self.title.as_deref().unwrap_or(DEFAULT_ROW_TITLE),
            "showTitle": self.show_title.unwrap_or(self.title.is_some()),
            "collapsed": self.collapsed,
            "height": self.height,
            "repeat": self.repeat,
            "panels": panels,
        }])
    }
}
