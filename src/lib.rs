//! Programmatic construction of monitoring dashboards
//!
//! Build a [`Dashboard`] from panels, targets and templates, optionally run
//! the normalization passes ([`Dashboard::auto_panel_ids`],
//! [`Panel::auto_ref_ids`], [`Panel::resolve_expression_refs`]) and hand the
//! result to [`writer::write_dashboard`].

#![forbid(unsafe_code)]

pub mod config;
pub mod constants;
pub mod error;
pub mod generator;
pub mod model;
pub mod normalize;
pub mod resolve;
pub mod writer;

pub use error::DashboardError;
pub use model::{Dashboard, Panel, ToJsonData};
