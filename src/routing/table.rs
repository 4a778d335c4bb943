//! Route and constraint bookkeeping.
//!
//! # Responsibilities
//! - Keep routes per HTTP method, in registration order
//! - Keep placeholder constraints per (method, literal path)
//!
//! # Design Decisions
//! - Constraints are keyed by the literal compiled path string, not by route
//!   identity: two routes sharing a path under the same method share them
//! - `ConstraintStore::attach` has asymmetric first-call semantics that
//!   callers depend on (see the method docs); tests pin all three branches

use std::collections::HashMap;

use crate::routing::route::{ConstraintMap, Route};

/// Ordered routes per HTTP method name.
#[derive(Debug, Default)]
pub struct RouteTable {
    entries: HashMap<String, Vec<Route>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route under a method. Duplicates are allowed; dispatch tries
    /// every entry in registration order.
    pub fn push(&mut self, method: &str, route: Route) {
        self.entries.entry(method.to_string()).or_default().push(route);
    }

    /// Routes registered under a method, oldest first.
    pub fn get(&self, method: &str) -> &[Route] {
        self.entries.get(method).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Method names with at least one route.
    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Placeholder constraints per (method, literal path).
#[derive(Debug, Default)]
pub struct ConstraintStore {
    entries: HashMap<String, HashMap<String, ConstraintMap>>,
}

impl ConstraintStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach constraints for the given method and path.
    ///
    /// The first call and later calls behave differently:
    /// - while the whole store is empty, the call creates a fresh single-path
    ///   entry for the method;
    /// - once the store holds anything, the call merges into the method's
    ///   path map when the method is already present;
    /// - when the store is non-empty but the method is absent, the rules are
    ///   dropped without effect.
    pub fn attach(&mut self, method: &str, path: &str, rules: ConstraintMap) {
        if self.entries.is_empty() {
            let mut paths = HashMap::new();
            paths.insert(path.to_string(), rules);
            self.entries.insert(method.to_string(), paths);
        } else if let Some(paths) = self.entries.get_mut(method) {
            paths.insert(path.to_string(), rules);
        }
    }

    /// Constraints stored for a (method, path) pair.
    pub fn lookup(&self, method: &str, path: &str) -> Option<&ConstraintMap> {
        self.entries.get(method).and_then(|paths| paths.get(path))
    }

    /// Paths with constraints under a method.
    pub fn paths_for(&self, method: &str) -> Vec<&str> {
        self.entries
            .get(method)
            .map(|paths| paths.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ConstraintMap {
        let mut map = ConstraintMap::new();
        map.insert(
            "id".to_string(),
            regex::Regex::new(r"^(?:\d+)$").unwrap(),
        );
        map
    }

    #[test]
    fn test_first_attach_creates_single_path_entry() {
        let mut store = ConstraintStore::new();
        store.attach("GET", "/a/:id", rules());
        assert_eq!(store.paths_for("GET"), vec!["/a/:id"]);
    }

    #[test]
    fn test_second_attach_same_method_merges() {
        let mut store = ConstraintStore::new();
        store.attach("GET", "/a/:id", rules());
        store.attach("GET", "/b/:id", rules());
        let mut paths = store.paths_for("GET");
        paths.sort();
        assert_eq!(paths, vec!["/a/:id", "/b/:id"]);
    }

    #[test]
    fn test_attach_to_unseen_method_is_dropped_once_store_is_populated() {
        let mut store = ConstraintStore::new();
        store.attach("GET", "/a/:id", rules());
        store.attach("POST", "/c/:id", rules());
        assert!(store.lookup("POST", "/c/:id").is_none());
        assert!(store.lookup("GET", "/a/:id").is_some());
    }

    #[test]
    fn test_attach_same_path_overwrites() {
        let mut store = ConstraintStore::new();
        store.attach("GET", "/a/:id", rules());
        store.attach("GET", "/a/:id", ConstraintMap::new());
        assert!(store.lookup("GET", "/a/:id").unwrap().is_empty());
    }

    #[test]
    fn test_route_table_preserves_order_and_duplicates() {
        use crate::routing::handler::{HandlerSpec, Payload};
        use crate::routing::ControllerRegistry;

        let registry = ControllerRegistry::new();
        let mut table = RouteTable::new();
        for _ in 0..2 {
            let route = Route::new(
                "/dup".to_string(),
                HandlerSpec::func(|_, _, _| Ok(Payload::None)),
                "",
                &registry,
            )
            .unwrap();
            table.push("GET", route);
        }
        assert_eq!(table.get("GET").len(), 2);
        assert!(table.get("POST").is_empty());
    }
}
