//! ACL service: use-cases for managing access-control lists.

use controlhub_domain::acl::{Acl, AclUpdate};
use controlhub_domain::error::{ConflictError, ControlHubError, NotFoundError};

use crate::ports::{AclRepository, ScriptRepository};

/// Application service for ACL CRUD operations.
///
/// Scripts are consulted on delete so that a referenced ACL is never removed.
pub struct AclService<A, S> {
    acls: A,
    scripts: S,
}

impl<A: AclRepository, S: ScriptRepository> AclService<A, S> {
    /// Create a new service backed by the given repositories.
    pub fn new(acls: A, scripts: S) -> Self {
        Self { acls, scripts }
    }

    /// List all ACLs.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_acls(&self) -> Result<Vec<Acl>, ControlHubError> {
        self.acls.get_all().await
    }

    /// Look up an ACL by name.
    ///
    /// # Errors
    ///
    /// Returns [`ControlHubError::NotFound`] when no ACL named `name` exists,
    /// or a storage error from the repository.
    pub async fn get_acl(&self, name: &str) -> Result<Acl, ControlHubError> {
        self.acls.get_by_name(name).await?.ok_or_else(|| {
            NotFoundError::Acl {
                name: name.to_string(),
            }
            .into()
        })
    }

    /// Create a new ACL.
    ///
    /// # Errors
    ///
    /// Returns [`ControlHubError::Conflict`] when the name is taken, or a
    /// storage error from the repository.
    #[tracing::instrument(skip(self, acl), fields(acl_name = %acl.name))]
    pub async fn create_acl(&self, acl: Acl) -> Result<Acl, ControlHubError> {
        if self.acls.get_by_name(&acl.name).await?.is_some() {
            return Err(ConflictError::DuplicateAcl { name: acl.name }.into());
        }
        let acl = self.acls.create(acl).await?;
        tracing::info!("ACL created");
        Ok(acl)
    }

    /// Replace the supplied rule lists of ACL `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ControlHubError::NotFound`] when the ACL is missing, or a
    /// storage error from the repository.
    #[tracing::instrument(skip(self, update))]
    pub async fn update_acl(&self, name: &str, update: AclUpdate) -> Result<Acl, ControlHubError> {
        let mut acl = self.get_acl(name).await?;
        update.apply(&mut acl);
        self.acls.update(acl).await
    }

    /// Delete ACL `name` unless a script references it.
    ///
    /// # Errors
    ///
    /// Returns [`ControlHubError::NotFound`] when the ACL is missing,
    /// [`ControlHubError::Conflict`] when a script still references it, or a
    /// storage error from the repositories.
    #[tracing::instrument(skip(self))]
    pub async fn delete_acl(&self, name: &str) -> Result<(), ControlHubError> {
        let acl = self.get_acl(name).await?;
        if let Some(script) = self.scripts.get_by_acl(&acl.name).await?.into_iter().next() {
            tracing::warn!(script = %script.name, "ACL still referenced");
            return Err(ConflictError::AclInUse {
                acl: acl.name,
                script: script.name,
            }
            .into());
        }
        self.acls.delete(&acl.name).await?;
        tracing::info!("ACL deleted");
        Ok(())
    }
}
