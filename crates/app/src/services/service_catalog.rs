//! Service catalog: makes configured services known to the hub at startup.
//!
//! Registering a service puts it in the service registry and ensures it has a
//! startup schedule and a configuration category of its own. Existing
//! schedules and categories are left alone.

use std::sync::Arc;

use controlhub_domain::category::Category;
use controlhub_domain::error::ControlHubError;
use controlhub_domain::schedule::{Schedule, ScheduleType};
use controlhub_domain::service::ServiceRecord;

use crate::ports::{ConfigurationManager, Scheduler};
use crate::service_registry::InProcessServiceRegistry;

/// Bootstrap use-case for configured services.
pub struct ServiceCatalog<C, K> {
    registry: Arc<InProcessServiceRegistry>,
    config: C,
    scheduler: K,
}

impl<C: ConfigurationManager, K: Scheduler> ServiceCatalog<C, K> {
    /// Create a new catalog writing into `registry`.
    pub fn new(registry: Arc<InProcessServiceRegistry>, config: C, scheduler: K) -> Self {
        Self {
            registry,
            config,
            scheduler,
        }
    }

    /// Register `record`, run by `process`.
    ///
    /// # Errors
    ///
    /// Returns [`ControlHubError::Validation`] when the schedule would be
    /// invalid, or a storage error from the collaborators.
    #[tracing::instrument(skip(self, record), fields(service = %record.name))]
    pub async fn register(
        &self,
        record: ServiceRecord,
        process: &str,
    ) -> Result<(), ControlHubError> {
        let schedules = self.scheduler.get_schedules().await?;
        if !schedules.iter().any(|schedule| schedule.name == record.name) {
            let schedule = Schedule::builder()
                .name(record.name.clone())
                .process_name(process)
                .schedule_type(ScheduleType::Startup)
                .build()?;
            self.scheduler.save_schedule(schedule).await?;
            tracing::info!("startup schedule created");
        }
        if self
            .config
            .get_category_all_items(&record.name)
            .await?
            .is_none()
        {
            let description = format!("{} {} service", record.name, record.service_type);
            self.config
                .create_category(Category::new(record.name.clone(), description))
                .await?;
        }
        self.registry.register(record).await;
        Ok(())
    }
}
