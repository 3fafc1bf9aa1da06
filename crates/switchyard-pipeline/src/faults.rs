//! Fault handler registry.
//!
//! Handlers are registered for an exact [`FaultClass`]. A lookup for a class
//! without a handler walks the class's parent chain and caches the answer,
//! including a negative one, under the class that was asked for.
//!
//! The cache is never invalidated: a class that resolved to "no handler"
//! keeps that answer even if a handler for one of its ancestors is mapped
//! afterwards. Map handlers before serving.

use dashmap::DashMap;
use switchyard_core::{Fault, FaultClass, FaultHandler, HandlerFault, RequestContext};
use tracing::trace;

/// Registry of fault handlers keyed by fault class.
#[derive(Default)]
pub struct FaultRegistry {
    handlers: DashMap<FaultClass, FaultHandler>,
    resolved: DashMap<FaultClass, Option<FaultHandler>>,
}

impl FaultRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps a handler to fault type `F`, replacing any previous handler.
    pub fn map<F, H>(&self, handler: H)
    where
        F: Fault,
        H: Fn(&HandlerFault, &mut RequestContext) + Send + Sync + 'static,
    {
        self.map_class(FaultClass::of::<F>(), std::sync::Arc::new(handler));
    }

    /// Maps an already erased handler to `class`.
    pub fn map_class(&self, class: FaultClass, handler: FaultHandler) {
        self.handlers.insert(class, handler);
    }

    /// Finds the handler for `class` or its nearest mapped ancestor.
    pub fn get_handler(&self, class: FaultClass) -> Option<FaultHandler> {
        if let Some(handler) = self.handlers.get(&class) {
            return Some(handler.value().clone());
        }

        if let Some(cached) = self.resolved.get(&class) {
            return cached.value().clone();
        }

        let found = class.ancestors().find_map(|ancestor| {
            self.handlers
                .get(&ancestor)
                .map(|handler| handler.value().clone())
        });
        trace!(fault.class = %class, found = found.is_some(), "resolved fault handler");

        self.resolved.insert(class, found.clone());
        found
    }

    /// Returns true if a handler is mapped to exactly `class`.
    #[must_use]
    pub fn contains(&self, class: FaultClass) -> bool {
        self.handlers.contains_key(&class)
    }

    /// Number of mapped handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true if no handler is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for FaultRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaultRegistry")
            .field("handlers", &self.handlers.len())
            .field("resolved", &self.resolved.len())
            .finish()
    }
}
