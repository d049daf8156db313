use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the OpsimNav library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Every variant is terminal for the request that produced it; nothing in the
/// estimation or reporting pipeline is retried.
#[derive(Debug, Error)]
pub enum Error {
    /// The mesh input could not be parsed as an STL surface.
    #[error("malformed mesh: {message}")]
    MalformedMesh { message: String },

    /// The mesh file could not be opened or read.
    #[error("failed to read mesh from {path}: {source}")]
    MeshRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A scenario parameter is missing or outside its declared range.
    #[error("invalid scenario: {field} {message}")]
    InvalidScenario { field: String, message: String },

    /// Raised when a ship class name is not present in the catalog.
    #[error("unknown ship class: {name}{}", format_suggestions(.suggestions))]
    UnknownShipClass {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when ship class catalog data fails validation.
    #[error("invalid ship class data: {message}")]
    ShipClassCatalog { message: String },

    /// Raised when duplicate class names are encountered during catalog load.
    #[error("duplicate ship class name encountered: {name}")]
    DuplicateShipClass { name: String },

    /// The regression model artifact could not be loaded.
    #[error("failed to load resistance model from {path}: {message}")]
    ModelLoad { path: PathBuf, message: String },

    /// The regression model produced an unusable value.
    #[error("resistance model evaluation failed: {message}")]
    ModelEvaluation { message: String },

    /// The report could not be written to its backing storage location.
    #[error("failed to write report to {path}: {source}")]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The byte stream is not a report produced by this crate.
    #[error("failed to parse report: {message}")]
    ReportParse { message: String },

    /// Raised when a configuration file is unreadable or inconsistent.
    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for configuration and reports")]
    ProjectDirsUnavailable,

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON (de)serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_scenario(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidScenario {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn malformed_mesh(message: impl Into<String>) -> Self {
        Self::MalformedMesh {
            message: message.into(),
        }
    }

    /// Name of the offending scenario field, when the error refers to one.
    pub fn scenario_field(&self) -> Option<&str> {
        match self {
            Error::InvalidScenario { field, .. } => Some(field),
            Error::UnknownShipClass { .. } => Some("ship_class"),
            _ => None,
        }
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
