//! Widget error types.

use ctxmenu_core::DomError;
use thiserror::Error;

/// Failure to load a [`WidgetConfig`](crate::WidgetConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON input did not match the config shape
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    /// YAML input did not match the config shape
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

/// Failure to build or install a context menu.
#[derive(Debug, Error)]
pub enum WidgetError {
    /// The DOM rejected an operation
    #[error(transparent)]
    Dom(#[from] DomError),
    /// The configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result alias for widget operations.
pub type WidgetResult<T> = Result<T, WidgetError>;
