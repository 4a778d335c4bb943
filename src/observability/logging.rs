//! Structured logging.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::schema::LogConfig;

const ERROR_LOG: &str = "error.log";

/// Log sink configured from the application config.
///
/// `register` installs a `tracing` subscriber writing to `error.log` under
/// the configured directory. `RUST_LOG` overrides the configured level.
#[derive(Debug)]
pub struct Logger {
    level: String,
    path: PathBuf,
}

impl Logger {
    pub fn new(level: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            level: level.into(),
            path: path.into(),
        }
    }

    pub fn from_config(config: &LogConfig) -> Self {
        Self::new(config.level.clone(), config.path.clone())
    }

    pub fn level(&self) -> &str {
        &self.level
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Install the global tracing subscriber.
    ///
    /// Only the first registration in a process takes effect; later calls
    /// (e.g. a second application constructed in the same test binary) keep
    /// the existing subscriber. Falls back to stderr when the log directory
    /// cannot be created or opened.
    pub fn register(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.level));

        let _ = std::fs::create_dir_all(&self.path);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path.join(ERROR_LOG));

        match file {
            Ok(file) => {
                let _ = tracing_subscriber::registry()
                    .with(filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .with_writer(Mutex::new(file))
                            .with_ansi(false),
                    )
                    .try_init();
            }
            Err(_) => {
                let _ = tracing_subscriber::registry()
                    .with(filter)
                    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                    .try_init();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let config = LogConfig {
            level: "debug".to_string(),
            path: PathBuf::from("/tmp/gantry-test-logs"),
        };
        let logger = Logger::from_config(&config);
        assert_eq!(logger.level(), "debug");
        assert_eq!(logger.path(), Path::new("/tmp/gantry-test-logs"));
    }

    #[test]
    fn test_register_creates_log_file() {
        let dir = tempfile::tempdir().unwrap();
        Logger::new("info", dir.path()).register();
        assert!(dir.path().join(ERROR_LOG).exists());
    }
}
