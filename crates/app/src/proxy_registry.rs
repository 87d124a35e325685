//! In-process proxy registry guarded by a tokio [`RwLock`].
//!
//! Maps a service name to the [`ProxyRoutes`] configured for it. Routes are
//! only recorded and resolved here; no traffic is forwarded.

use std::collections::BTreeMap;

use tokio::sync::RwLock;

use controlhub_domain::error::{ConflictError, ValidationError};
use controlhub_domain::proxy::{HttpVerb, ProxyRoutes, ResolvedRoute};

/// Proxy tables of every configured service.
#[derive(Debug, Default)]
pub struct ProxyRegistry {
    routes: RwLock<BTreeMap<String, ProxyRoutes>>,
}

impl ProxyRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `routes` for `service`.
    ///
    /// # Errors
    ///
    /// Returns [`ConflictError::ProxyAlreadyConfigured`] when `service` already
    /// has routes. The check and the insert happen under one write lock.
    pub async fn add(&self, service: &str, routes: ProxyRoutes) -> Result<(), ConflictError> {
        let mut guard = self.routes.write().await;
        if guard.contains_key(service) {
            return Err(ConflictError::ProxyAlreadyConfigured {
                service: service.to_string(),
            });
        }
        guard.insert(service.to_string(), routes);
        Ok(())
    }

    /// Forget the routes of `service`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ProxyNotConfigured`] when `service` has no
    /// routes.
    pub async fn remove(&self, service: &str) -> Result<ProxyRoutes, ValidationError> {
        self.routes
            .write()
            .await
            .remove(service)
            .ok_or_else(|| ValidationError::ProxyNotConfigured {
                service: service.to_string(),
            })
    }

    /// Routes configured for `service`.
    pub async fn get(&self, service: &str) -> Option<ProxyRoutes> {
        self.routes.read().await.get(service).cloned()
    }

    /// Find the service and backend path serving `verb` on public `path`.
    ///
    /// Services are tried in name order; the first match wins.
    pub async fn resolve(&self, verb: HttpVerb, path: &str) -> Option<ResolvedRoute> {
        self.routes
            .read()
            .await
            .iter()
            .find_map(|(service, routes)| {
                routes.resolve(verb, path).map(|backend_path| ResolvedRoute {
                    service: service.clone(),
                    backend_path,
                })
            })
    }
}
