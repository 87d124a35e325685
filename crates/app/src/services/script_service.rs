//! Script service: use-cases for managing and scheduling automation scripts.
//!
//! Scheduling binds the caller's parameters into the stored write steps,
//! registers a run category under the dispatcher, saves a manual schedule and
//! queues one immediate run. These calls are not transactional: a failure
//! midway leaves the earlier writes in place.

use controlhub_domain::category::DISPATCHER_CATEGORY;
use controlhub_domain::error::{ConflictError, ControlHubError, NotFoundError};
use controlhub_domain::schedule::{Schedule, Task};
use controlhub_domain::script::{Parameters, Script, ScriptUpdate};

use crate::ports::{AclRepository, ConfigurationManager, Scheduler, ScriptRepository};

/// Application service for automation script CRUD and scheduling.
pub struct ScriptService<S, A, C, K> {
    scripts: S,
    acls: A,
    config: C,
    scheduler: K,
}

impl<S, A, C, K> ScriptService<S, A, C, K>
where
    S: ScriptRepository,
    A: AclRepository,
    C: ConfigurationManager,
    K: Scheduler,
{
    /// Create a new service backed by the given collaborators.
    pub fn new(scripts: S, acls: A, config: C, scheduler: K) -> Self {
        Self {
            scripts,
            acls,
            config,
            scheduler,
        }
    }

    /// List all scripts.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_scripts(&self) -> Result<Vec<Script>, ControlHubError> {
        self.scripts.get_all().await
    }

    /// Look up a script by name.
    ///
    /// # Errors
    ///
    /// Returns [`ControlHubError::NotFound`] when no script named `name`
    /// exists, or a storage error from the repository.
    pub async fn get_script(&self, name: &str) -> Result<Script, ControlHubError> {
        self.scripts.get_by_name(name).await?.ok_or_else(|| {
            NotFoundError::Script {
                name: name.to_string(),
            }
            .into()
        })
    }

    /// Store a new script.
    ///
    /// # Errors
    ///
    /// Returns [`ControlHubError::Conflict`] when the name is taken,
    /// [`ControlHubError::NotFound`] when the referenced ACL is missing, or a
    /// storage error from the repositories.
    #[tracing::instrument(skip(self, script), fields(script_name = %script.name))]
    pub async fn create_script(&self, script: Script) -> Result<Script, ControlHubError> {
        if self.scripts.get_by_name(&script.name).await?.is_some() {
            return Err(ConflictError::DuplicateScript { name: script.name }.into());
        }
        if let Some(acl) = script.acl_name() {
            self.ensure_acl(acl).await?;
        }
        let script = self.scripts.create(script).await?;
        tracing::info!(steps = script.steps.len(), "script created");
        Ok(script)
    }

    /// Apply the supplied fields of `update` to script `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ControlHubError::NotFound`] when the script or the newly
    /// referenced ACL is missing, or a storage error from the repositories.
    #[tracing::instrument(skip(self, update))]
    pub async fn update_script(
        &self,
        name: &str,
        update: ScriptUpdate,
    ) -> Result<(), ControlHubError> {
        self.ensure_target(name).await?;
        if let Some(acl) = update.acl_name() {
            self.ensure_acl(acl).await?;
        }
        self.scripts.update(name, &update).await?;
        tracing::info!("script updated");
        Ok(())
    }

    /// Delete script `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ControlHubError::NotFound`] when the script is missing, or a
    /// storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_script(&self, name: &str) -> Result<(), ControlHubError> {
        self.ensure_target(name).await?;
        self.scripts.delete(name).await?;
        tracing::info!("script deleted");
        Ok(())
    }

    /// Create the schedule and run configuration of script `name`, then queue
    /// one run.
    ///
    /// Without `parameters` the write steps are stored as they are.
    ///
    /// # Errors
    ///
    /// Returns [`ControlHubError::NotFound`] when the script is missing or a
    /// placeholder and a parameter do not line up,
    /// [`ControlHubError::Validation`] when parameters are supplied for a
    /// script without write steps, [`ControlHubError::Conflict`] when the
    /// script already has a schedule or another category owns its name, or a
    /// storage error from the collaborators.
    #[tracing::instrument(skip(self, parameters))]
    pub async fn schedule_script(
        &self,
        name: &str,
        parameters: Option<Parameters>,
    ) -> Result<Task, ControlHubError> {
        let script = self.get_script(name).await?;
        let bound = match &parameters {
            Some(parameters) => script.steps.bind_parameters(&script.name, parameters)?,
            None => script.steps.clone(),
        };

        let schedules = self.scheduler.get_schedules().await?;
        if schedules
            .iter()
            .any(|schedule| schedule.is_automation_script_for(&script.name))
        {
            return Err(ConflictError::ScheduleAlreadyExists { name: script.name }.into());
        }
        if self
            .config
            .get_category_all_items(&script.name)
            .await?
            .is_some()
        {
            return Err(ConflictError::CategoryAlreadyExists { name: script.name }.into());
        }

        let category = script.run_category(&bound, parameters.as_ref());
        self.config.create_category(category).await?;
        let children = self
            .config
            .create_child_category(DISPATCHER_CATEGORY, std::slice::from_ref(&script.name))
            .await?;
        if !children.contains(&script.name) {
            return Err(ControlHubError::Storage(
                format!(
                    "{} category was not linked under {DISPATCHER_CATEGORY}",
                    script.name
                )
                .into(),
            ));
        }

        let schedule = self
            .scheduler
            .save_schedule(Schedule::automation_script(&script.name))
            .await?;
        let task = self.scheduler.queue_task(schedule.id, None).await?;
        tracing::info!(schedule_id = %schedule.id, task_id = %task.id, "script scheduled");
        Ok(task)
    }

    async fn ensure_target(&self, name: &str) -> Result<(), ControlHubError> {
        match self.scripts.get_by_name(name).await? {
            Some(_) => Ok(()),
            None => Err(NotFoundError::ScriptTarget {
                name: name.to_string(),
            }
            .into()),
        }
    }

    async fn ensure_acl(&self, name: &str) -> Result<(), ControlHubError> {
        match self.acls.get_by_name(name).await? {
            Some(_) => Ok(()),
            None => Err(NotFoundError::AclReference {
                name: name.to_string(),
            }
            .into()),
        }
    }
}
