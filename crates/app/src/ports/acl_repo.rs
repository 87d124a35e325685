//! ACL repository port: persistence for access-control lists.

use std::future::Future;
use std::sync::Arc;

use controlhub_domain::acl::Acl;
use controlhub_domain::error::ControlHubError;

/// Repository for persisting and querying [`Acl`]s, keyed by name.
pub trait AclRepository {
    /// Create a new ACL in storage.
    ///
    /// A name collision surfaces as a duplicate conflict.
    fn create(&self, acl: Acl) -> impl Future<Output = Result<Acl, ControlHubError>> + Send;

    /// Get an ACL by its exact name.
    fn get_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Acl>, ControlHubError>> + Send;

    /// Get all ACLs, ordered by name.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Acl>, ControlHubError>> + Send;

    /// Replace the rules of an existing ACL.
    fn update(&self, acl: Acl) -> impl Future<Output = Result<Acl, ControlHubError>> + Send;

    /// Delete an ACL by name.
    fn delete(&self, name: &str) -> impl Future<Output = Result<(), ControlHubError>> + Send;
}

impl<T: AclRepository + Send + Sync> AclRepository for Arc<T> {
    fn create(&self, acl: Acl) -> impl Future<Output = Result<Acl, ControlHubError>> + Send {
        (**self).create(acl)
    }

    fn get_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Acl>, ControlHubError>> + Send {
        (**self).get_by_name(name)
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Acl>, ControlHubError>> + Send {
        (**self).get_all()
    }

    fn update(&self, acl: Acl) -> impl Future<Output = Result<Acl, ControlHubError>> + Send {
        (**self).update(acl)
    }

    fn delete(&self, name: &str) -> impl Future<Output = Result<(), ControlHubError>> + Send {
        (**self).delete(name)
    }
}
