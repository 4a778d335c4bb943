//! REST resource scaffolding.
//!
//! Generates the seven conventional routes for a controller in one call.
//! Generated paths carry a duplicated base URL; see
//! [`Application::resources`].

use crate::app::application::Application;
use crate::error::FrameworkResult;
use crate::support::callback::{self, CallbackSpec};

/// Structured controller spec for [`Application::resources`].
#[derive(Clone, Default)]
pub struct ResourceOptions {
    /// Controller name the routes are bound to.
    pub uses: String,
    /// Guard invoked before any route is generated; a `false` outcome aborts
    /// the whole call with no routes registered.
    pub middleware: Option<CallbackSpec>,
    /// Action names to skip.
    pub ignores: Vec<String>,
}

/// Controller spec accepted by [`Application::resources`]: a plain name or
/// options with a guard and exclusions.
#[derive(Clone)]
pub enum ControllerSpec {
    Name(String),
    Options(ResourceOptions),
}

impl From<&str> for ControllerSpec {
    fn from(name: &str) -> Self {
        ControllerSpec::Name(name.to_string())
    }
}

impl From<String> for ControllerSpec {
    fn from(name: String) -> Self {
        ControllerSpec::Name(name)
    }
}

impl From<ResourceOptions> for ControllerSpec {
    fn from(options: ResourceOptions) -> Self {
        ControllerSpec::Options(options)
    }
}

enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

/// The conventional REST surface, in generation order.
const RESOURCE_ROUTES: [(&str, &str, Verb); 7] = [
    ("/", "index", Verb::Get),
    ("/", "store", Verb::Post),
    ("/:id", "show", Verb::Get),
    ("/:id", "update", Verb::Put),
    ("/:id", "destroy", Verb::Delete),
    ("/:id/edit", "edit", Verb::Get),
    ("/create", "create", Verb::Get),
];

impl Application {
    /// Generate REST routes for a controller under `url`.
    ///
    /// `index` GET `/`, `store` POST `/`, `show` GET `/:id`, `update` PUT
    /// `/:id`, `destroy` DELETE `/:id`, `edit` GET `/:id/edit`, `create` GET
    /// `/create`: each bound to `Controller@action` and registered through
    /// the regular verb methods. Non-empty `constraints` are attached to
    /// every generated route.
    ///
    /// The base URL is trimmed of trailing slashes and then, when non-empty,
    /// doubled to `url + "/" + url` before the suffixes are appended: routes
    /// come out as e.g. `/posts//posts/:id`. Callers match against these
    /// doubled paths, so the doubling is part of the contract.
    pub fn resources(
        &mut self,
        url: &str,
        spec: impl Into<ControllerSpec>,
        constraints: &[(&str, &str)],
    ) -> FrameworkResult<&mut Self> {
        let (controller, ignores) = match spec.into() {
            ControllerSpec::Name(name) => (name, Vec::new()),
            ControllerSpec::Options(options) => {
                if let Some(middleware) = &options.middleware {
                    let proceed = callback::invoke(
                        middleware,
                        self.request(),
                        self.controller_namespace(),
                        Some(self.controllers()),
                    )?;
                    if !proceed {
                        return Ok(self);
                    }
                }
                (options.uses, options.ignores)
            }
        };

        let base = url.trim_end_matches('/');
        let base = if base.is_empty() {
            String::new()
        } else {
            format!("{base}/{base}")
        };

        for (suffix, action, verb) in &RESOURCE_ROUTES {
            if ignores.iter().any(|ignored| ignored == action) {
                continue;
            }
            let reference = format!("{controller}@{action}");
            let path = format!("{base}{suffix}");
            match verb {
                Verb::Get => self.get(&path, reference)?,
                Verb::Post => self.post(&path, reference)?,
                Verb::Put => self.put(&path, reference)?,
                Verb::Delete => self.delete(&path, reference)?,
            };
            if !constraints.is_empty() {
                self.constrain(constraints)?;
            }
        }

        Ok(self)
    }
}
