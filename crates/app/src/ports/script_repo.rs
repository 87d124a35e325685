//! Script repository port: persistence for automation scripts.

use std::future::Future;
use std::sync::Arc;

use controlhub_domain::error::ControlHubError;
use controlhub_domain::script::{Script, ScriptUpdate};

/// Repository for persisting and querying [`Script`]s, keyed by name.
pub trait ScriptRepository {
    /// Create a new script in storage.
    ///
    /// A name collision surfaces as a duplicate conflict.
    fn create(&self, script: Script)
    -> impl Future<Output = Result<Script, ControlHubError>> + Send;

    /// Get a script by its exact name.
    fn get_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Script>, ControlHubError>> + Send;

    /// Get all scripts, ordered by name.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Script>, ControlHubError>> + Send;

    /// Get every script referencing the ACL `acl`.
    fn get_by_acl(
        &self,
        acl: &str,
    ) -> impl Future<Output = Result<Vec<Script>, ControlHubError>> + Send;

    /// Write the supplied fields of `update` onto script `name`.
    fn update(
        &self,
        name: &str,
        update: &ScriptUpdate,
    ) -> impl Future<Output = Result<(), ControlHubError>> + Send;

    /// Delete a script by name.
    fn delete(&self, name: &str) -> impl Future<Output = Result<(), ControlHubError>> + Send;
}

impl<T: ScriptRepository + Send + Sync> ScriptRepository for Arc<T> {
    fn create(
        &self,
        script: Script,
    ) -> impl Future<Output = Result<Script, ControlHubError>> + Send {
        (**self).create(script)
    }

    fn get_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Script>, ControlHubError>> + Send {
        (**self).get_by_name(name)
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Script>, ControlHubError>> + Send {
        (**self).get_all()
    }

    fn get_by_acl(
        &self,
        acl: &str,
    ) -> impl Future<Output = Result<Vec<Script>, ControlHubError>> + Send {
        (**self).get_by_acl(acl)
    }

    fn update(
        &self,
        name: &str,
        update: &ScriptUpdate,
    ) -> impl Future<Output = Result<(), ControlHubError>> + Send {
        (**self).update(name, update)
    }

    fn delete(&self, name: &str) -> impl Future<Output = Result<(), ControlHubError>> + Send {
        (**self).delete(name)
    }
}
