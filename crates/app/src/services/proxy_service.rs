//! Proxy service: use-cases for the service proxy registry.

use std::sync::Arc;

use serde_json::Value;

use controlhub_domain::error::{ControlHubError, NotFoundError};
use controlhub_domain::proxy::{self, HttpVerb, ProxyRoutes, ResolvedRoute};

use crate::ports::ServiceRegistry;
use crate::proxy_registry::ProxyRegistry;

/// Application service that validates proxy requests against known services
/// and records them in a [`ProxyRegistry`].
pub struct ProxyService<R> {
    services: R,
    registry: Arc<ProxyRegistry>,
}

impl<R: ServiceRegistry> ProxyService<R> {
    /// Create a new service backed by the given service registry and proxy
    /// registry.
    pub fn new(services: R, registry: Arc<ProxyRegistry>) -> Self {
        Self { services, registry }
    }

    /// Configure the proxy described by `payload`, returning the service name.
    ///
    /// # Errors
    ///
    /// Returns [`ControlHubError::Validation`] when the payload is malformed,
    /// [`ControlHubError::NotFound`] when the service is unknown, or
    /// [`ControlHubError::Conflict`] when the service already has a proxy.
    #[tracing::instrument(skip(self, payload))]
    pub async fn add_proxy(&self, payload: &Value) -> Result<String, ControlHubError> {
        let service = proxy::service_name(payload)?;
        self.ensure_service(&service).await?;
        let routes = ProxyRoutes::from_payload(&service, payload)?;
        self.registry.add(&service, routes).await?;
        tracing::info!(%service, "proxy configured");
        Ok(service)
    }

    /// Stop proxying for `service`.
    ///
    /// # Errors
    ///
    /// Returns [`ControlHubError::NotFound`] when the service is unknown, or
    /// [`ControlHubError::Validation`] when no proxy is configured for it.
    #[tracing::instrument(skip(self))]
    pub async fn delete_proxy(&self, service: &str) -> Result<(), ControlHubError> {
        self.ensure_service(service).await?;
        self.registry.remove(service).await?;
        tracing::info!("proxy stopped");
        Ok(())
    }

    /// Find which service serves `verb` on public `path`.
    pub async fn resolve(&self, verb: HttpVerb, path: &str) -> Option<ResolvedRoute> {
        self.registry.resolve(verb, path).await
    }

    async fn ensure_service(&self, service: &str) -> Result<(), ControlHubError> {
        match self.services.get(service).await? {
            Some(_) => Ok(()),
            None => Err(NotFoundError::Service {
                name: service.to_string(),
            }
            .into()),
        }
    }
}
