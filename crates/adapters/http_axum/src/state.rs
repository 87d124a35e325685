//! Shared application state for axum handlers.

use std::sync::Arc;

use controlhub_app::ports::{
    AclRepository, ConfigurationManager, Scheduler, ScriptRepository, ServiceRegistry,
};
use controlhub_app::services::acl_service::AclService;
use controlhub_app::services::proxy_service::ProxyService;
use controlhub_app::services::script_service::ScriptService;
use controlhub_app::services::service_acl_service::ServiceAclService;

/// Application state shared across all axum handlers.
///
/// Generic over the ACL repository, script repository, configuration
/// manager, scheduler and service registry to avoid dynamic dispatch.
/// `Clone` is implemented manually so the underlying types themselves do not
/// need to be `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<AR, SR, CM, SC, REG> {
    /// Automation script CRUD and scheduling.
    pub script_service: Arc<ScriptService<SR, AR, CM, SC>>,
    /// ACL CRUD.
    pub acl_service: Arc<AclService<AR, SR>>,
    /// ACL attachment to services.
    pub service_acl_service: Arc<ServiceAclService<AR, CM, SC>>,
    /// Proxy route registration.
    pub proxy_service: Arc<ProxyService<REG>>,
}

impl<AR, SR, CM, SC, REG> Clone for AppState<AR, SR, CM, SC, REG> {
    fn clone(&self) -> Self {
        Self {
            script_service: Arc::clone(&self.script_service),
            acl_service: Arc::clone(&self.acl_service),
            service_acl_service: Arc::clone(&self.service_acl_service),
            proxy_service: Arc::clone(&self.proxy_service),
        }
    }
}

impl<AR, SR, CM, SC, REG> AppState<AR, SR, CM, SC, REG>
where
    AR: AclRepository + Send + Sync + 'static,
    SR: ScriptRepository + Send + Sync + 'static,
    CM: ConfigurationManager + Send + Sync + 'static,
    SC: Scheduler + Send + Sync + 'static,
    REG: ServiceRegistry + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        script_service: ScriptService<SR, AR, CM, SC>,
        acl_service: AclService<AR, SR>,
        service_acl_service: ServiceAclService<AR, CM, SC>,
        proxy_service: ProxyService<REG>,
    ) -> Self {
        Self {
            script_service: Arc::new(script_service),
            acl_service: Arc::new(acl_service),
            service_acl_service: Arc::new(service_acl_service),
            proxy_service: Arc::new(proxy_service),
        }
    }
}
