//! Dashboard object model
//!
//! Every entity converts itself into the JSON mapping the rendering service
//! expects through [`ToJsonData`]. Conversion never mutates the entity and
//! works whether or not the normalization passes have run.

use serde_json::Value;

pub mod alert;
pub mod axis;
pub mod column;
pub mod dashboard;
pub mod panel;
pub mod target;
pub mod template;

pub use alert::{Alert, AlertCondition, Evaluator, TimeRange};
pub use axis::YAxis;
pub use column::{Column, ColumnStyle, ColumnStyleKind, DateStyle, NumberStyle, StringStyle};
pub use dashboard::{Annotation, Dashboard, DashboardLink, Time};
pub use panel::{ColumnSort, Graph, Legend, Panel, Row, SingleStat, Table, Text};
pub use target::{CloudWatchTarget, QueryTarget, Target};
pub use template::{Template, TemplateOption, TemplateType};

/// Conversion into the serializable mapping consumed by the document writer
pub trait ToJsonData {
    fn to_json_data(&self) -> Value;
}
