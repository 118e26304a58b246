//! Definition loading and the normalization pipeline run by the CLI

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::config::GeneratorConfig;
use crate::error::DashboardError;
use crate::model::Dashboard;

/// Parse a JSON dashboard definition and check its required fields
pub fn parse_definition(contents: &str) -> Result<Dashboard> {
    let dashboard: Dashboard =
        serde_json::from_str(contents).context("Failed to parse dashboard definition")?;
    dashboard.validate()?;
    Ok(dashboard)
}

pub fn load_definition(path: &Path) -> Result<Dashboard> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read dashboard definition from {:?}", path))?;
    let dashboard =
        parse_definition(&contents).with_context(|| format!("Invalid definition in {:?}", path))?;
    info!(title = %dashboard.title, panels = dashboard.panels.len(), "Loaded dashboard definition");
    Ok(dashboard)
}

/// Run the passes enabled in `config`: panel ids, then per-panel refIds, then expression references
pub fn prepare(dashboard: Dashboard, config: &GeneratorConfig) -> Result<Dashboard, DashboardError> {
    let dashboard = if config.auto_panel_ids {
        dashboard.auto_panel_ids()
    } else {
        dashboard
    };

    dashboard.try_map_panels(|panel| {
        let panel = if config.auto_ref_ids { panel.auto_ref_ids() } else { panel };
        if config.resolve_expressions {
            panel.resolve_expression_refs()
        } else {
            Ok(panel)
        }
    })
}
