//! Service registry port: lookup of services known to the hub.

use std::future::Future;
use std::sync::Arc;

use controlhub_domain::error::ControlHubError;
use controlhub_domain::service::ServiceRecord;

/// Read access to registered [`ServiceRecord`]s.
///
/// `Ok(None)` is the "service does not exist" signal.
pub trait ServiceRegistry {
    /// Get a service by exact name.
    fn get(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<ServiceRecord>, ControlHubError>> + Send;
}

impl<T: ServiceRegistry + Send + Sync> ServiceRegistry for Arc<T> {
    fn get(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<ServiceRecord>, ControlHubError>> + Send {
        (**self).get(name)
    }
}
