//! Generic callback invocation for middleware hooks.
//!
//! Used by the group middleware form and by resource scaffolding: the caller
//! hands over a spec, the invoker runs it against the request and reports
//! whether the caller may continue. A `false` outcome aborts the caller.

use std::sync::Arc;

use crate::error::{FrameworkError, FrameworkResult};
use crate::http::Request;
use crate::routing::handler::{qualify, Payload};
use crate::routing::route::Params;
use crate::routing::ControllerRegistry;

/// A middleware closure: inspects the request, returns whether to continue.
pub type MiddlewareFn = Arc<dyn Fn(&Request) -> bool + Send + Sync>;

/// Middleware forms accepted by `group` and `resources`.
#[derive(Clone)]
pub enum CallbackSpec {
    /// A closure invoked directly.
    Func(MiddlewareFn),
    /// A `"Controller@action"` reference resolved through the registry.
    Reference(String),
}

impl CallbackSpec {
    pub fn func<F>(callback: F) -> Self
    where
        F: Fn(&Request) -> bool + Send + Sync + 'static,
    {
        CallbackSpec::Func(Arc::new(callback))
    }
}

impl From<&str> for CallbackSpec {
    fn from(reference: &str) -> Self {
        CallbackSpec::Reference(reference.to_string())
    }
}

/// Run a callback spec against the request.
///
/// A closure decides directly. A reference is resolved like a route handler;
/// the action aborts the caller only by returning the JSON value `false`,
/// every other payload counts as permission to continue.
pub fn invoke(
    spec: &CallbackSpec,
    request: &Request,
    namespace: &str,
    registry: Option<&ControllerRegistry>,
) -> FrameworkResult<bool> {
    match spec {
        CallbackSpec::Func(callback) => Ok(callback(request)),
        CallbackSpec::Reference(reference) => {
            let (controller, action) = reference
                .split_once('@')
                .ok_or_else(|| FrameworkError::MalformedHandlerReference(reference.clone()))?;
            let qualified = qualify(namespace, controller);
            let registry =
                registry.ok_or_else(|| FrameworkError::UnknownController(qualified.clone()))?;
            let instance = registry
                .instantiate(&qualified)
                .ok_or(FrameworkError::UnknownController(qualified))?;
            let payload = instance.invoke(action, request, &Params::default(), None)?;
            Ok(payload != Payload::Json(serde_json::Value::Bool(false)))
        }
    }
}
