//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for an embedding
//! application. All types derive Serde traits for deserialization from config
//! files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for an application.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path prefix prepended to every registered route (e.g. `/blog` when the
    /// application is mounted under a subdirectory). Empty for the web root.
    pub app_root: String,

    /// Namespace prefix for controller registry lookups. A handler reference
    /// `Posts@index` resolves against `<namespace>::Posts` when this is
    /// non-empty.
    pub controller_namespace: String,

    /// Directory holding view templates.
    pub view_path: String,

    /// Name of the template engine the embedding application renders with.
    pub engine: String,

    /// When set, handlers additionally receive a reference to the live
    /// application, so closures can read configuration and local values.
    pub pass_application_to_handlers: bool,

    /// Logging settings.
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_root: String::new(),
            controller_namespace: String::new(),
            view_path: "views".to_string(),
            engine: "plain".to_string(),
            pass_application_to_handlers: false,
            log: LogConfig::default(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,

    /// Directory the error log is written under.
    pub path: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            path: PathBuf::from("logs"),
        }
    }
}
