//! Service ACL service: attach and detach an ACL to a service's security
//! configuration.
//!
//! Attaching copies the ACL rules into a `{service}Security` category linked
//! under the service's own category. Detaching removes that category and
//! everything below it.

use serde_json::Value;

use controlhub_domain::acl::{attach_acl_name, security_category_name};
use controlhub_domain::error::{ConflictError, ControlHubError, NotFoundError, ValidationError};

use crate::ports::{AclRepository, ConfigurationManager, Scheduler};

/// Application service for the ACL attached to a service.
pub struct ServiceAclService<A, C, K> {
    acls: A,
    config: C,
    scheduler: K,
}

impl<A, C, K> ServiceAclService<A, C, K>
where
    A: AclRepository,
    C: ConfigurationManager,
    K: Scheduler,
{
    /// Create a new service backed by the given collaborators.
    pub fn new(acls: A, config: C, scheduler: K) -> Self {
        Self {
            acls,
            config,
            scheduler,
        }
    }

    /// Attach the ACL named in `payload` to `service`, returning the ACL name.
    ///
    /// The service is checked before the payload is read.
    ///
    /// # Errors
    ///
    /// Returns [`ControlHubError::NotFound`] when the service has no schedule
    /// or the ACL is missing, [`ControlHubError::Validation`] when the payload
    /// is malformed, [`ControlHubError::Conflict`] when the service already
    /// has an ACL, or a storage error from the collaborators.
    #[tracing::instrument(skip(self, payload))]
    pub async fn attach_acl(&self, service: &str, payload: &Value) -> Result<String, ControlHubError> {
        self.ensure_service(service).await?;
        let acl_name = attach_acl_name(payload)?;
        let acl = self
            .acls
            .get_by_name(&acl_name)
            .await?
            .ok_or_else(|| NotFoundError::AttachedAcl {
                name: acl_name.clone(),
            })?;

        let security = security_category_name(service);
        if self.config.get_category_all_items(&security).await?.is_some() {
            return Err(ConflictError::AclAlreadyAttached {
                service: service.to_string(),
            }
            .into());
        }
        self.config
            .create_category(acl.security_category(service))
            .await?;
        let children = self
            .config
            .create_child_category(service, std::slice::from_ref(&security))
            .await?;
        if !children.contains(&security) {
            return Err(ControlHubError::Storage(
                format!("{security} category was not linked under {service}").into(),
            ));
        }
        tracing::info!(acl = %acl.name, "ACL attached");
        Ok(acl.name)
    }

    /// Detach the ACL of `service`.
    ///
    /// # Errors
    ///
    /// Returns [`ControlHubError::NotFound`] when the service has no schedule,
    /// [`ControlHubError::Validation`] when no ACL is attached, or a storage
    /// error from the collaborators.
    #[tracing::instrument(skip(self))]
    pub async fn detach_acl(&self, service: &str) -> Result<(), ControlHubError> {
        self.ensure_service(service).await?;
        let security = security_category_name(service);
        if self.config.get_category_all_items(&security).await?.is_none() {
            return Err(ValidationError::NoAclAttached {
                service: service.to_string(),
            }
            .into());
        }
        self.config
            .delete_category_and_children_recursively(&security)
            .await?;
        tracing::info!("ACL detached");
        Ok(())
    }

    async fn ensure_service(&self, service: &str) -> Result<(), ControlHubError> {
        let schedules = self.scheduler.get_schedules().await?;
        if schedules.iter().any(|schedule| schedule.name == service) {
            Ok(())
        } else {
            Err(NotFoundError::ServiceSchedule {
                name: service.to_string(),
            }
            .into())
        }
    }
}
