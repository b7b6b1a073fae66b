//! Structured error types for routing and configuration.
//!
//! Both are displayable as-is in CLI and TUI contexts. A `RouteError` is
//! fatal for a single render pass; a missing asset is never an error (it
//! becomes an `Unavailable` plan item instead).

use std::path::PathBuf;

use thiserror::Error;

use crate::navigation::Page;

/// Errors raised while resolving a navigation state into a plan.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("unknown page '{0}' (valid: overview, dashboard, eda, first-iteration, final-methodology)")]
    UnknownPage(String),

    #[error("unknown data type '{0}' (valid: raw, imputed, imputed-transformed, all)")]
    UnknownDataType(String),

    #[error("unknown section '{0}' (valid: logistic-regression, xgboost, shap, comparative)")]
    UnknownSection(String),

    #[error("page '{}' has no entry in the routing table", .0.label())]
    PageNotRouted(Page),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors from loading or validating a routing table.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read routing table {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse routing table {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("page '{}' is routed more than once", .0.label())]
    DuplicatePage(Page),

    #[error("asset template '{0}' has an empty data-type scope")]
    EmptyScope(String),

    #[error("asset template on page '{page}' has an empty {field}")]
    EmptyField { page: String, field: &'static str },
}
