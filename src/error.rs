//! Error types for building and normalizing dashboards

/// Errors raised by the object model and its normalization passes
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum DashboardError {
    /// A field with no meaningful default was left empty
    #[error("{entity} is missing required field '{field}'")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    /// An expression references a refId that no target in the panel carries
    #[error("expression '{expression}' references unknown target '#{ref_id}'")]
    UnknownReference { ref_id: String, expression: String },

    /// Expanding a reference leads back to the target being expanded
    #[error("target '{ref_id}' references itself through its expression")]
    CyclicReference { ref_id: String },

    /// Two targets of one panel carry the same refId
    #[error("refId '{ref_id}' is used by more than one target")]
    DuplicateReference { ref_id: String },
}

pub type Result<T, E = DashboardError> = std::result::Result<T, E>;
