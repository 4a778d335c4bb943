//! A single registered endpoint.

use regex::Regex;
use std::collections::HashMap;

use crate::app::Application;
use crate::error::FrameworkResult;
use crate::http::Request;
use crate::routing::handler::{Handler, HandlerSpec, Payload};
use crate::routing::ControllerRegistry;

/// Per-placeholder compiled constraints for one route path.
pub type ConstraintMap = HashMap<String, Regex>;

/// Placeholder values captured by a successful match, in path order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: Vec<(String, String)>,
}

impl Params {
    /// Value captured for a placeholder name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn push(&mut self, name: &str, value: &str) {
        self.values.push((name.to_string(), value.to_string()));
    }
}

/// One registered endpoint: an absolute path pattern and its handler.
///
/// The path is fixed at construction; placeholders use the `:name` form and
/// match a single segment each.
#[derive(Debug, Clone)]
pub struct Route {
    path: String,
    handler: Handler,
}

impl Route {
    /// Build a route, resolving the handler spec against the registry.
    ///
    /// Controller references fail here (unknown controller, malformed
    /// reference) so bootstrap errors surface at registration time.
    pub(crate) fn new(
        path: String,
        spec: HandlerSpec,
        namespace: &str,
        registry: &ControllerRegistry,
    ) -> FrameworkResult<Self> {
        let handler = Handler::resolve(spec, namespace, registry)?;
        Ok(Self { path, handler })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Test a request path against this route.
    ///
    /// Both sides are split on `/`; segment counts must agree, literal
    /// segments must be equal, and a `:name` segment must satisfy its
    /// constraint (or be non-empty when unconstrained, the `[^/]+` default).
    /// Returns the captured placeholder values on a full match.
    pub fn matches(&self, uri: &str, constraints: Option<&ConstraintMap>) -> Option<Params> {
        let pattern: Vec<&str> = self.path.split('/').collect();
        let candidate: Vec<&str> = uri.split('/').collect();
        if pattern.len() != candidate.len() {
            return None;
        }

        let mut params = Params::default();
        for (expected, actual) in pattern.into_iter().zip(candidate) {
            match expected.strip_prefix(':') {
                Some(name) => {
                    let ok = match constraints.and_then(|map| map.get(name)) {
                        Some(constraint) => constraint.is_match(actual),
                        None => !actual.is_empty(),
                    };
                    if !ok {
                        return None;
                    }
                    params.push(name, actual);
                }
                None => {
                    if expected != actual {
                        return None;
                    }
                }
            }
        }
        Some(params)
    }

    /// Invoke the handler for a request this route matched.
    pub(crate) fn call(
        &self,
        request: &Request,
        params: &Params,
        registry: &ControllerRegistry,
        app: Option<&Application>,
    ) -> FrameworkResult<Payload> {
        self.handler.invoke(request, params, registry, app)
    }
}
