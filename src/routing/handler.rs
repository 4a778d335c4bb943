//! Handler specification and controller resolution.
//!
//! # Responsibilities
//! - Describe what runs when a route matches: a closure, a
//!   `"Controller@action"` reference, or an already-bound pair
//! - Resolve references against an explicit controller registry at
//!   registration time, so typos fail during bootstrap rather than dispatch
//!
//! # Design Decisions
//! - Controller factories produce a fresh instance per invocation
//! - Registry keys are namespace-qualified (`ns::Name`) when the application
//!   config carries a namespace
//! - An unknown action is reported by the controller itself; the registry can
//!   only vouch for the controller name

use std::collections::HashMap;
use std::sync::Arc;

use crate::app::Application;
use crate::error::{FrameworkError, FrameworkResult};
use crate::http::Request;
use crate::routing::route::Params;

/// What a handler hands back to the dispatch loop.
///
/// Dispatch writes `Text` as the raw body and `Json` as a JSON body; `None`
/// still counts as a handled request but leaves the response untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    None,
    Text(String),
    Json(serde_json::Value),
}

impl Payload {
    pub fn text(body: impl Into<String>) -> Self {
        Payload::Text(body.into())
    }
}

/// A directly callable route handler.
///
/// Receives the request, the captured placeholder values and, when the
/// configuration opts in, the live application.
pub type HandlerFn = Arc<
    dyn Fn(&Request, &Params, Option<&Application>) -> FrameworkResult<Payload> + Send + Sync,
>;

/// Handler forms accepted by the registration API.
#[derive(Clone)]
pub enum HandlerSpec {
    /// A closure invoked directly.
    Func(HandlerFn),
    /// A `"Controller@action"` reference, resolved at registration.
    Reference(String),
    /// A controller/action pair that skips reference parsing.
    Bound { controller: String, action: String },
}

impl HandlerSpec {
    pub fn func<F>(handler: F) -> Self
    where
        F: Fn(&Request, &Params, Option<&Application>) -> FrameworkResult<Payload>
            + Send
            + Sync
            + 'static,
    {
        HandlerSpec::Func(Arc::new(handler))
    }
}

impl From<&str> for HandlerSpec {
    fn from(reference: &str) -> Self {
        HandlerSpec::Reference(reference.to_string())
    }
}

impl From<String> for HandlerSpec {
    fn from(reference: String) -> Self {
        HandlerSpec::Reference(reference)
    }
}

impl From<(&str, &str)> for HandlerSpec {
    fn from((controller, action): (&str, &str)) -> Self {
        HandlerSpec::Bound {
            controller: controller.to_string(),
            action: action.to_string(),
        }
    }
}

/// A resolved handler, stored inside a route.
#[derive(Clone)]
pub enum Handler {
    Func(HandlerFn),
    Controller { controller: String, action: String },
}

impl Handler {
    /// Resolve a spec against the registry. Reference and bound forms fail
    /// here when the controller is unknown or the reference is malformed.
    pub(crate) fn resolve(
        spec: HandlerSpec,
        namespace: &str,
        registry: &ControllerRegistry,
    ) -> FrameworkResult<Self> {
        match spec {
            HandlerSpec::Func(f) => Ok(Handler::Func(f)),
            HandlerSpec::Reference(reference) => {
                let (controller, action) = reference
                    .split_once('@')
                    .ok_or_else(|| FrameworkError::MalformedHandlerReference(reference.clone()))?;
                Self::bind(controller, action, namespace, registry)
            }
            HandlerSpec::Bound { controller, action } => {
                Self::bind(&controller, &action, namespace, registry)
            }
        }
    }

    fn bind(
        controller: &str,
        action: &str,
        namespace: &str,
        registry: &ControllerRegistry,
    ) -> FrameworkResult<Self> {
        let qualified = qualify(namespace, controller);
        if !registry.contains(&qualified) {
            return Err(FrameworkError::UnknownController(qualified));
        }
        Ok(Handler::Controller {
            controller: qualified,
            action: action.to_string(),
        })
    }

    pub(crate) fn invoke(
        &self,
        request: &Request,
        params: &Params,
        registry: &ControllerRegistry,
        app: Option<&Application>,
    ) -> FrameworkResult<Payload> {
        match self {
            Handler::Func(f) => f(request, params, app),
            Handler::Controller { controller, action } => {
                let instance = registry
                    .instantiate(controller)
                    .ok_or_else(|| FrameworkError::UnknownController(controller.clone()))?;
                instance.invoke(action, request, params, app)
            }
        }
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Handler::Func(_) => f.write_str("Handler::Func"),
            Handler::Controller { controller, action } => {
                write!(f, "Handler::Controller({controller}@{action})")
            }
        }
    }
}

/// A controller: a named bundle of actions dispatched by name.
///
/// Implementations should return [`FrameworkError::UnknownAction`] for action
/// names they do not recognize; that error is fatal and propagates out of
/// dispatch.
pub trait Controller: Send + Sync {
    fn invoke(
        &self,
        action: &str,
        request: &Request,
        params: &Params,
        app: Option<&Application>,
    ) -> FrameworkResult<Payload>;
}

type ControllerFactory = Arc<dyn Fn() -> Box<dyn Controller> + Send + Sync>;

/// Explicit mapping from controller names to factories.
///
/// A reference resolves here, by qualified name; there is no reflective
/// class lookup anywhere else.
#[derive(Clone, Default)]
pub struct ControllerRegistry {
    factories: HashMap<String, ControllerFactory>,
}

impl std::fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerRegistry")
            .field("factories", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under a (qualified) controller name.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Controller> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Build a fresh instance of the named controller.
    pub fn instantiate(&self, name: &str) -> Option<Box<dyn Controller>> {
        self.factories.get(name).map(|factory| factory())
    }
}

/// Join a namespace and a controller name into a registry key.
pub fn qualify(namespace: &str, controller: &str) -> String {
    if namespace.is_empty() {
        controller.to_string()
    } else {
        format!("{namespace}::{controller}")
    }
}
