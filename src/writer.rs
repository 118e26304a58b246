//! Document writer
//!
//! Emits key-sorted, two-space-indented JSON so generated dashboards diff
//! cleanly between runs.

use anyhow::{Context, Result};
use serde_json::Value;
use std::io::{Read, Write};
use tracing::debug;

use crate::model::ToJsonData;

/// Render `object` into its textual document
pub fn to_json_string(object: &(impl ToJsonData + ?Sized)) -> Result<String> {
    // serde_json's default map is ordered by key, which keeps the output stable
    let mut text = serde_json::to_string_pretty(&object.to_json_data())
        .context("Failed to serialize dashboard to JSON")?;
    text.push('\n');
    Ok(text)
}

/// Write `object` as a JSON document to `sink`
pub fn write_dashboard<W: Write>(object: &(impl ToJsonData + ?Sized), mut sink: W) -> Result<()> {
    let text = to_json_string(object)?;
    sink.write_all(text.as_bytes())
        .context("Failed to write dashboard document")?;
    sink.flush().context("Failed to flush dashboard document")?;
    debug!(bytes = text.len(), "wrote dashboard document");
    Ok(())
}

/// Parse a previously written document back into its mapping
pub fn read_document<R: Read>(source: R) -> Result<Value> {
    serde_json::from_reader(source).context("Failed to parse dashboard document")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::format::SHORT_FORMAT;
    use crate::constants::operator::OP_AND;
    use crate::constants::reducer::RTYPE_MAX;
    use crate::model::{
        Alert, AlertCondition, Dashboard, Evaluator, Graph, QueryTarget, Row, Target, TimeRange, YAxis,
    };

    #[test]
    fn test_serialization() {
        let graph = Graph::new(
            "CPU Usage by Namespace (rate[5m])",
            vec![Target::new("namespace:container_cpu_usage_seconds_total:sum_rate")
                .with_legend_format("{{namespace}}")
                .with_ref_id("A")
                .into()],
        )
        .with_data_source("My data source")
        .with_id(1)
        .with_y_axes(vec![
            YAxis::new(SHORT_FORMAT).with_label("CPU seconds / second"),
            YAxis::new(SHORT_FORMAT),
        ]);

        let mut stream = Vec::new();
        write_dashboard(&graph, &mut stream).unwrap();
        assert!(!stream.is_empty());
    }

    #[test]
    fn test_alert_thresholds_round_trip() {
        let target = QueryTarget::from(Target::new("foo.bar").with_ref_id("A"));
        let condition = AlertCondition::new(
            &target,
            TimeRange::new("5m", "now"),
            Evaluator::GreaterThan(10.0),
            RTYPE_MAX,
            OP_AND,
        )
        .unwrap();
        let graph = Graph::new("Graph with alert", vec![target])
            .with_alert(Alert::new("alert name", "alert message", vec![condition]));

        let mut stream = Vec::new();
        write_dashboard(&graph, &mut stream).unwrap();
        let graph_json = read_document(stream.as_slice()).unwrap();

        assert!(!graph_json["thresholds"][0].is_null());
        assert_eq!(graph_json, graph.to_json_data());
    }

    #[test]
    fn test_output_is_stable_and_sorted() {
        let dashboard = Dashboard::new("Stable", vec![Row::new(vec![Graph::new("g", Vec::new()).into()]).into()])
            .unwrap();

        let first = to_json_string(&dashboard).unwrap();
        let second = to_json_string(&dashboard).unwrap();
        assert_eq!(first, second);
        assert!(first.ends_with('\n'));
        assert!(first.starts_with("{\n  \"__inputs\""));

        let annotations = first.find("\"annotations\"").unwrap();
        let version = first.find("\"version\"").unwrap();
        assert!(annotations < version);
    }

    #[test]
    fn test_read_document_rejects_garbage() {
        assert!(read_document("not json".as_bytes()).is_err());
    }
}
