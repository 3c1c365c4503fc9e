//! Explicit routing table from payload roots to handlers.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use soap::{Element, PayloadRoot};
use tracing::warn;

use crate::error::ServerResult;

/// A handler turns a request payload into a response payload.
pub type Handler = Arc<dyn Fn(&Element) -> ServerResult<Element> + Send + Sync>;

/// Maps `(namespace, local part)` pairs to handlers.
///
/// Built once at startup, then shared read-only by the dispatcher.
///
/// ## Usage
/// ```ignore
/// let router = EndpointRouter::new()
///     .route(PayloadRoot::new(NAMESPACE_URI, "getMovieRequest"), |payload| { ... });
/// ```
#[derive(Clone, Default)]
pub struct EndpointRouter {
    routes: HashMap<PayloadRoot, Handler>,
}

impl EndpointRouter {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// Add a route (builder pattern). A later route for the same root
    /// replaces the earlier one.
    pub fn route<F>(mut self, root: PayloadRoot, handler: F) -> Self
    where
        F: Fn(&Element) -> ServerResult<Element> + Send + Sync + 'static,
    {
        if self.routes.contains_key(&root) {
            warn!(%root, "Replacing existing endpoint mapping");
        }
        self.routes.insert(root, Arc::new(handler));
        self
    }

    pub fn resolve(&self, root: &PayloadRoot) -> Option<&Handler> {
        self.routes.get(root)
    }

    /// Registered payload roots, sorted
    pub fn routes(&self) -> Vec<&PayloadRoot> {
        let mut roots: Vec<&PayloadRoot> = self.routes.keys().collect();
        roots.sort();
        roots
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl fmt::Debug for EndpointRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointRouter")
            .field("routes", &self.routes())
            .finish()
    }
}
