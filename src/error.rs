//! Framework-wide error definitions.

use thiserror::Error;

use crate::config::loader::ConfigError;

/// Errors raised while wiring or dispatching an application.
///
/// Every variant is a fatal configuration error: it propagates to the
/// embedding process and is never retried. A request that matches no route is
/// not an error (see `Application::run`, which reports it as a flag).
#[derive(Debug, Error)]
pub enum FrameworkError {
    /// A handler reference did not have the `Controller@action` shape.
    #[error("malformed handler reference `{0}`, expected `Controller@action`")]
    MalformedHandlerReference(String),

    /// A handler referenced a controller that is not in the registry.
    #[error("no controller registered under `{0}`")]
    UnknownController(String),

    /// A controller rejected the requested action name.
    #[error("controller `{controller}` has no action `{action}`")]
    UnknownAction { controller: String, action: String },

    /// A placeholder constraint fragment failed to compile.
    #[error("invalid constraint for placeholder `{name}`")]
    InvalidConstraint {
        name: String,
        #[source]
        source: regex::Error,
    },

    /// The request URI could not be parsed.
    #[error("invalid request uri")]
    InvalidUri(#[from] http::uri::InvalidUri),

    /// A header name or value was not representable on the wire.
    #[error("invalid header `{0}`")]
    InvalidHeader(String),

    /// A structured handler payload could not be serialized.
    #[error("response serialization failed")]
    Serialize(#[from] serde_json::Error),

    /// Configuration loading or validation failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for framework operations.
pub type FrameworkResult<T> = Result<T, FrameworkError>;
