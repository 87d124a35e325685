//! In-process service registry guarded by a tokio [`RwLock`].

use std::collections::BTreeMap;

use tokio::sync::RwLock;

use controlhub_domain::error::ControlHubError;
use controlhub_domain::service::ServiceRecord;

use crate::ports::ServiceRegistry;

/// Registry of known services, keyed by name.
#[derive(Debug, Default)]
pub struct InProcessServiceRegistry {
    services: RwLock<BTreeMap<String, ServiceRecord>>,
}

impl InProcessServiceRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `record`, returning the record it replaced.
    pub async fn register(&self, record: ServiceRecord) -> Option<ServiceRecord> {
        tracing::debug!(service = %record.name, "registering service");
        self.services
            .write()
            .await
            .insert(record.name.clone(), record)
    }

    /// Remove the service `name`.
    pub async fn unregister(&self, name: &str) -> Option<ServiceRecord> {
        self.services.write().await.remove(name)
    }

    /// All registered services, ordered by name.
    pub async fn all(&self) -> Vec<ServiceRecord> {
        self.services.read().await.values().cloned().collect()
    }
}

impl ServiceRegistry for InProcessServiceRegistry {
    async fn get(&self, name: &str) -> Result<Option<ServiceRecord>, ControlHubError> {
        Ok(self.services.read().await.get(name).cloned())
    }
}
