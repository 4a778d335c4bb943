//! The application orchestrator: registration API and dispatch loop.

use std::collections::HashMap;

use http::StatusCode;

use crate::config::schema::AppConfig;
use crate::error::{FrameworkError, FrameworkResult};
use crate::http::{Request, Response};
use crate::observability::Logger;
use crate::routing::handler::{Handler, HandlerSpec, Payload};
use crate::routing::route::{ConstraintMap, Params, Route};
use crate::routing::table::{ConstraintStore, RouteTable};
use crate::routing::ControllerRegistry;
use crate::support::callback::{self, CallbackSpec};

const X_POWERED_BY: &str = "Gantry";

/// Keys the `value`/`set` accessor shim forwards to the configuration
/// instead of the local store.
enum ConfigKey {
    View,
    Engine,
    Root,
}

impl ConfigKey {
    fn for_key(key: &str) -> Option<Self> {
        match key {
            "view" => Some(ConfigKey::View),
            "engine" => Some(ConfigKey::Engine),
            "root" => Some(ConfigKey::Root),
            _ => None,
        }
    }
}

/// The single orchestrator for one request lifecycle.
///
/// Owns the route table, the constraint store, the controller registry and
/// the request snapshot. Constructed once by the embedding process and passed
/// by reference wherever it is needed; there is no hidden global instance.
#[derive(Debug)]
pub struct Application {
    config: AppConfig,
    request: Request,
    logger: Logger,
    controllers: ControllerRegistry,
    routes: RouteTable,
    constraints: ConstraintStore,
    not_found: Option<Handler>,
    local: HashMap<String, String>,
    branch: String,
    current_method: String,
    current_path: String,
    special_method: Option<String>,
    disable_powered_by: bool,
}

impl Application {
    /// Build an application from its configuration and the request snapshot.
    ///
    /// Registers the logger right away so bootstrap problems are captured.
    pub fn configure(config: AppConfig, request: Request) -> Self {
        let logger = Logger::from_config(&config.log);
        logger.register();
        tracing::debug!(
            request_id = %request.id(),
            method = %request.method(),
            uri = %request.uri(),
            "application configured"
        );

        Self {
            config,
            request,
            logger,
            controllers: ControllerRegistry::new(),
            routes: RouteTable::new(),
            constraints: ConstraintStore::new(),
            not_found: None,
            local: HashMap::new(),
            branch: String::new(),
            current_method: String::new(),
            current_path: String::new(),
            special_method: None,
            disable_powered_by: false,
        }
    }

    // ------------------------------------------------------------------
    // Registration API
    // ------------------------------------------------------------------

    /// Register a GET route at `branch + path`.
    pub fn get(&mut self, path: &str, handler: impl Into<HandlerSpec>) -> FrameworkResult<&mut Self> {
        self.register_route("GET", path, handler.into())?;
        Ok(self)
    }

    /// Register a POST route, honoring form-spoofed method override.
    ///
    /// A `method` body field is captured as the override for `run`; when it
    /// names `DELETE` or `PUT` the registration is re-routed through the verb
    /// path and no POST route is created.
    pub fn post(&mut self, path: &str, handler: impl Into<HandlerSpec>) -> FrameworkResult<&mut Self> {
        let spec = handler.into();
        let body_method = self.request.body().get("method").map(str::to_string);
        if let Some(raw) = body_method {
            let method = raw.to_ascii_uppercase();
            self.special_method = Some(method.clone());
            if method == "DELETE" || method == "PUT" {
                return self.add_http_verb(&method, path, spec);
            }
        }
        self.register_route("POST", path, spec)?;
        Ok(self)
    }

    pub fn put(&mut self, path: &str, handler: impl Into<HandlerSpec>) -> FrameworkResult<&mut Self> {
        self.add_http_verb("PUT", path, handler.into())
    }

    pub fn delete(&mut self, path: &str, handler: impl Into<HandlerSpec>) -> FrameworkResult<&mut Self> {
        self.add_http_verb("DELETE", path, handler.into())
    }

    /// Register the same handler under POST, DELETE, PUT and GET, in that
    /// order, through the regular verb methods (override logic included).
    pub fn any(&mut self, path: &str, handler: impl Into<HandlerSpec>) -> FrameworkResult<&mut Self> {
        let spec = handler.into();
        self.post(path, spec.clone())?;
        self.delete(path, spec.clone())?;
        self.put(path, spec.clone())?;
        self.get(path, spec)?;
        Ok(self)
    }

    /// Register the handler under the request's real method for every listed
    /// method name that matches it, case-insensitively.
    ///
    /// Named `match_methods` because `match` is reserved in Rust.
    pub fn match_methods(
        &mut self,
        methods: &[&str],
        path: &str,
        handler: impl Into<HandlerSpec>,
    ) -> FrameworkResult<&mut Self> {
        let spec = handler.into();
        let real = self.request.method().to_string();
        for method in methods {
            if method.eq_ignore_ascii_case(&real) {
                self.register_route(&real, path, spec.clone())?;
            }
        }
        Ok(self)
    }

    /// Set the fallback handler invoked when no route matches.
    pub fn to404(&mut self, handler: impl Into<HandlerSpec>) -> FrameworkResult<&mut Self> {
        let handler = Handler::resolve(
            handler.into(),
            &self.config.controller_namespace,
            &self.controllers,
        )?;
        self.not_found = Some(handler);
        Ok(self)
    }

    /// Attach placeholder constraints to the most recently registered
    /// route's (method, path) pair.
    ///
    /// Fragments are compiled anchored (`^(?:frag)$`), so a bad pattern fails
    /// here rather than at dispatch. The store's first-call/merge asymmetry
    /// applies; see [`ConstraintStore::attach`].
    pub fn constrain(&mut self, rules: &[(&str, &str)]) -> FrameworkResult<&mut Self> {
        let mut map = ConstraintMap::new();
        for (name, fragment) in rules {
            let pattern = format!("^(?:{fragment})$");
            let compiled = regex::Regex::new(&pattern).map_err(|source| {
                FrameworkError::InvalidConstraint {
                    name: (*name).to_string(),
                    source,
                }
            })?;
            map.insert((*name).to_string(), compiled);
        }
        self.constraints
            .attach(&self.current_method, &self.current_path, map);
        Ok(self)
    }

    /// Run `body` with the branch prefix applied to every route it registers.
    ///
    /// The prefix is a single slot: a nested group replaces it wholesale and
    /// the exit path always resets it to empty, never to an enclosing prefix.
    /// The reset also happens when `body` fails, before the error propagates.
    pub fn group<F>(&mut self, branch: &str, body: F) -> FrameworkResult<&mut Self>
    where
        F: FnOnce(&mut Application, &Request) -> FrameworkResult<()>,
    {
        self.branch = branch.to_string();
        let request = self.request.clone();
        let outcome = body(self, &request);
        self.branch.clear();
        outcome?;
        Ok(self)
    }

    /// Middleware form of [`group`](Self::group): the spec runs through the
    /// callback invoker for its side effects, with the branch prefix set.
    pub fn group_invoke(&mut self, branch: &str, spec: &CallbackSpec) -> FrameworkResult<&mut Self> {
        self.branch = branch.to_string();
        let outcome = callback::invoke(
            spec,
            &self.request,
            &self.config.controller_namespace,
            Some(&self.controllers),
        );
        self.branch.clear();
        outcome?;
        Ok(self)
    }

    /// Suppress the `X-Powered-By` response header.
    pub fn disable_x_powered_by(&mut self) {
        self.disable_powered_by = true;
    }

    // ------------------------------------------------------------------
    // Config accessor shim
    // ------------------------------------------------------------------

    /// Read a named value: the request-local store first, then the mapped
    /// configuration keys (`view`, `engine`, `root`), else nothing.
    pub fn value(&self, key: &str) -> Option<String> {
        if let Some(stored) = self.local.get(key) {
            return Some(stored.clone());
        }
        match ConfigKey::for_key(key)? {
            ConfigKey::View => Some(self.config.view_path.clone()),
            ConfigKey::Engine => Some(self.config.engine.clone()),
            ConfigKey::Root => Some(self.config.app_root.clone()),
        }
    }

    /// Write a named value: mapped keys update the configuration, everything
    /// else lands in the request-local store, overwriting previous values.
    pub fn set(&mut self, key: &str, value: &str) -> &mut Self {
        match ConfigKey::for_key(key) {
            Some(ConfigKey::View) => self.config.view_path = value.to_string(),
            Some(ConfigKey::Engine) => self.config.engine = value.to_string(),
            Some(ConfigKey::Root) => self.config.app_root = value.to_string(),
            None => {
                self.local.insert(key.to_string(), value.to_string());
            }
        }
        self
    }

    // Explicit configuration delegation: every forwarded accessor is spelled
    // out, so an unknown one fails to compile instead of at dispatch.

    pub fn app_root(&self) -> &str {
        &self.config.app_root
    }

    pub fn set_app_root(&mut self, app_root: &str) {
        self.config.app_root = app_root.to_string();
    }

    pub fn controller_namespace(&self) -> &str {
        &self.config.controller_namespace
    }

    pub fn view_path(&self) -> &str {
        &self.config.view_path
    }

    pub fn set_view_path(&mut self, view_path: &str) {
        self.config.view_path = view_path.to_string();
    }

    pub fn engine(&self) -> &str {
        &self.config.engine
    }

    pub fn set_engine(&mut self, engine: &str) {
        self.config.engine = engine.to_string();
    }

    pub fn log_level(&self) -> &str {
        &self.config.log.level
    }

    pub fn log_path(&self) -> &std::path::Path {
        &self.config.log.path
    }

    pub fn pass_application_to_handlers(&self) -> bool {
        self.config.pass_application_to_handlers
    }

    /// The logger wired at construction.
    pub fn log(&self) -> &Logger {
        &self.logger
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn controllers(&self) -> &ControllerRegistry {
        &self.controllers
    }

    pub fn controllers_mut(&mut self) -> &mut ControllerRegistry {
        &mut self.controllers
    }

    // ------------------------------------------------------------------
    // Introspection (embedders and tests)
    // ------------------------------------------------------------------

    /// Routes registered under a method, in registration order.
    pub fn routes_for(&self, method: &str) -> &[Route] {
        self.routes.get(method)
    }

    /// Constraints stored for a (method, literal path) pair.
    pub fn constraints_for(&self, method: &str, path: &str) -> Option<&ConstraintMap> {
        self.constraints.lookup(method, path)
    }

    /// The branch prefix currently applied to registrations.
    pub fn branch(&self) -> &str {
        &self.branch
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Dispatch the request against the registered routes.
    ///
    /// Returns `Ok(true)` when no route matched (the 404 path ran), and
    /// `Ok(false)` when at least one route handled the request. Every
    /// structurally matching route is invoked in registration order; when
    /// several match, each overwrites the response body of the one before.
    ///
    /// The optional `pre_hook` runs first; a `true` return terminates the
    /// process immediately. It never comes back as a normal return.
    pub fn run(
        &mut self,
        response: &mut Response,
        pre_hook: Option<&dyn Fn(&Request) -> bool>,
    ) -> FrameworkResult<bool> {
        if !self.disable_powered_by {
            response.set("X-Powered-By", X_POWERED_BY)?;
        }

        if let Some(hook) = pre_hook {
            if hook(&self.request) {
                std::process::exit(0);
            }
        }

        self.branch.clear();
        let method = self.effective_method();
        tracing::debug!(
            request_id = %self.request.id(),
            method = %method,
            uri = %self.request.uri(),
            "dispatching"
        );

        let mut missed = true;
        for route in self.routes.get(&method) {
            let constraints = self.constraints.lookup(&method, route.path());
            if let Some(params) = route.matches(self.request.uri(), constraints) {
                let app = self.config.pass_application_to_handlers.then_some(&*self);
                let payload = route.call(&self.request, &params, &self.controllers, app)?;
                write_payload(response, payload)?;
                missed = false;
            }
        }

        if missed {
            tracing::warn!(
                request_id = %self.request.id(),
                method = %method,
                uri = %self.request.uri(),
                "no route matched"
            );
            if let Some(handler) = &self.not_found {
                let app = self.config.pass_application_to_handlers.then_some(&*self);
                let payload =
                    handler.invoke(&self.request, &Params::default(), &self.controllers, app)?;
                write_payload(response, payload)?;
            } else {
                response.send(format!("Cannot {} {} 404", method, self.request.uri()));
            }
            response.code(StatusCode::NOT_FOUND);
        }

        Ok(missed)
    }

    /// The method routes are looked up under: the request's real method,
    /// except that a POST with a captured override dispatches as the
    /// override. The override slot is shared across the whole registration
    /// phase, not scoped per route.
    fn effective_method(&self) -> String {
        if self.request.method() == "POST" {
            if let Some(special) = &self.special_method {
                return special.clone();
            }
        }
        self.request.method().to_string()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Append a route under `method` at `app_root + branch + path` and
    /// remember the pair for a following `constrain` call.
    fn register_route(&mut self, method: &str, path: &str, spec: HandlerSpec) -> FrameworkResult<()> {
        let full_path = format!("{}{}{}", self.config.app_root, self.branch, path);
        let route = Route::new(
            full_path.clone(),
            spec,
            &self.config.controller_namespace,
            &self.controllers,
        )?;
        tracing::debug!(method, path = %full_path, "route registered");
        self.routes.push(method, route);
        self.current_path = full_path;
        self.current_method = method.to_string();
        Ok(())
    }

    /// Shared PUT/DELETE registration with form-spoofing support.
    ///
    /// A body `method` field equal to the verb being registered re-keys the
    /// route under the request's real method; a body `method` field with any
    /// other value suppresses the registration entirely. Only a body without
    /// the field registers under the verb itself. The comparison is against
    /// the raw body value, unnormalized.
    fn add_http_verb(
        &mut self,
        method: &str,
        path: &str,
        spec: HandlerSpec,
    ) -> FrameworkResult<&mut Self> {
        let body_method = self.request.body().get("method").map(str::to_string);
        let mut plain = true;

        if let Some(value) = body_method {
            if value == method {
                let real = self.request.method().to_string();
                self.register_route(&real, path, spec.clone())?;
            }
            plain = false;
        }

        if plain {
            self.register_route(method, path, spec)?;
        }

        Ok(self)
    }
}

fn write_payload(response: &mut Response, payload: Payload) -> FrameworkResult<()> {
    match payload {
        Payload::Text(body) => {
            response.send(body);
        }
        Payload::Json(value) => {
            response.json(&value)?;
        }
        Payload::None => {}
    }
    Ok(())
}
