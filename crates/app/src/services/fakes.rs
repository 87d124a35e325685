//! In-memory port implementations shared by the service tests.

use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::sync::Mutex;

use controlhub_domain::acl::Acl;
use controlhub_domain::category::Category;
use controlhub_domain::error::{ConflictError, ControlHubError, NotFoundError};
use controlhub_domain::id::ScheduleId;
use controlhub_domain::schedule::{Schedule, Task};
use controlhub_domain::script::{Script, ScriptUpdate};

use crate::ports::{AclRepository, ConfigurationManager, Scheduler, ScriptRepository};

#[derive(Default)]
pub struct InMemoryAclRepo {
    pub store: Mutex<BTreeMap<String, Acl>>,
}

impl InMemoryAclRepo {
    pub fn with(acls: impl IntoIterator<Item = Acl>) -> Self {
        let repo = Self::default();
        repo.store
            .lock()
            .unwrap()
            .extend(acls.into_iter().map(|acl| (acl.name.clone(), acl)));
        repo
    }
}

impl AclRepository for InMemoryAclRepo {
    fn create(&self, acl: Acl) -> impl Future<Output = Result<Acl, ControlHubError>> + Send {
        let mut store = self.store.lock().unwrap();
        let result = if store.contains_key(&acl.name) {
            Err(ConflictError::DuplicateAcl { name: acl.name }.into())
        } else {
            store.insert(acl.name.clone(), acl.clone());
            Ok(acl)
        };
        async move { result }
    }

    fn get_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Acl>, ControlHubError>> + Send {
        let result = self.store.lock().unwrap().get(name).cloned();
        async move { Ok(result) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Acl>, ControlHubError>> + Send {
        let result: Vec<Acl> = self.store.lock().unwrap().values().cloned().collect();
        async move { Ok(result) }
    }

    fn update(&self, acl: Acl) -> impl Future<Output = Result<Acl, ControlHubError>> + Send {
        self.store
            .lock()
            .unwrap()
            .insert(acl.name.clone(), acl.clone());
        async move { Ok(acl) }
    }

    fn delete(&self, name: &str) -> impl Future<Output = Result<(), ControlHubError>> + Send {
        self.store.lock().unwrap().remove(name);
        async { Ok(()) }
    }
}

#[derive(Default)]
pub struct InMemoryScriptRepo {
    pub store: Mutex<BTreeMap<String, Script>>,
}

impl InMemoryScriptRepo {
    pub fn with(scripts: impl IntoIterator<Item = Script>) -> Self {
        let repo = Self::default();
        repo.store
            .lock()
            .unwrap()
            .extend(scripts.into_iter().map(|script| (script.name.clone(), script)));
        repo
    }
}

impl ScriptRepository for InMemoryScriptRepo {
    fn create(
        &self,
        script: Script,
    ) -> impl Future<Output = Result<Script, ControlHubError>> + Send {
        let mut store = self.store.lock().unwrap();
        let result = if store.contains_key(&script.name) {
            Err(ConflictError::DuplicateScript { name: script.name }.into())
        } else {
            store.insert(script.name.clone(), script.clone());
            Ok(script)
        };
        async move { result }
    }

    fn get_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Script>, ControlHubError>> + Send {
        let result = self.store.lock().unwrap().get(name).cloned();
        async move { Ok(result) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Script>, ControlHubError>> + Send {
        let result: Vec<Script> = self.store.lock().unwrap().values().cloned().collect();
        async move { Ok(result) }
    }

    fn get_by_acl(
        &self,
        acl: &str,
    ) -> impl Future<Output = Result<Vec<Script>, ControlHubError>> + Send {
        let result: Vec<Script> = self
            .store
            .lock()
            .unwrap()
            .values()
            .filter(|script| script.acl.as_deref() == Some(acl))
            .cloned()
            .collect();
        async move { Ok(result) }
    }

    fn update(
        &self,
        name: &str,
        update: &ScriptUpdate,
    ) -> impl Future<Output = Result<(), ControlHubError>> + Send {
        if let Some(script) = self.store.lock().unwrap().get_mut(name) {
            if let Some(steps) = &update.steps {
                script.steps = steps.clone();
            }
            if let Some(acl) = &update.acl {
                script.acl = Some(acl.clone());
            }
        }
        async { Ok(()) }
    }

    fn delete(&self, name: &str) -> impl Future<Output = Result<(), ControlHubError>> + Send {
        self.store.lock().unwrap().remove(name);
        async { Ok(()) }
    }
}

#[derive(Default)]
pub struct InMemoryConfiguration {
    pub categories: Mutex<BTreeMap<String, Category>>,
    pub children: Mutex<BTreeMap<String, BTreeSet<String>>>,
}

impl InMemoryConfiguration {
    pub fn with(names: &[&str]) -> Self {
        let config = Self::default();
        config.categories.lock().unwrap().extend(
            names
                .iter()
                .map(|name| ((*name).to_string(), Category::new(*name, *name))),
        );
        config
    }

    pub fn has(&self, name: &str) -> bool {
        self.categories.lock().unwrap().contains_key(name)
    }

    pub fn children_of(&self, parent: &str) -> Vec<String> {
        self.children
            .lock()
            .unwrap()
            .get(parent)
            .map(|children| children.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl ConfigurationManager for InMemoryConfiguration {
    fn get_category_all_items(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Category>, ControlHubError>> + Send {
        let result = self.categories.lock().unwrap().get(name).cloned();
        async move { Ok(result) }
    }

    fn create_category(
        &self,
        category: Category,
    ) -> impl Future<Output = Result<(), ControlHubError>> + Send {
        self.categories
            .lock()
            .unwrap()
            .insert(category.name.clone(), category);
        async { Ok(()) }
    }

    fn create_child_category(
        &self,
        parent: &str,
        children: &[String],
    ) -> impl Future<Output = Result<Vec<String>, ControlHubError>> + Send {
        let result = if self.has(parent) {
            let mut links = self.children.lock().unwrap();
            let entry = links.entry(parent.to_string()).or_default();
            entry.extend(children.iter().cloned());
            Ok(entry.iter().cloned().collect())
        } else {
            Err(NotFoundError::Category {
                name: parent.to_string(),
            }
            .into())
        };
        async move { result }
    }

    fn delete_category_and_children_recursively(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<(), ControlHubError>> + Send {
        let mut pending = vec![name.to_string()];
        let mut categories = self.categories.lock().unwrap();
        let mut links = self.children.lock().unwrap();
        while let Some(current) = pending.pop() {
            categories.remove(&current);
            if let Some(children) = links.remove(&current) {
                pending.extend(children);
            }
        }
        for children in links.values_mut() {
            children.remove(name);
        }
        async { Ok(()) }
    }
}

#[derive(Default)]
pub struct InMemoryScheduler {
    pub schedules: Mutex<Vec<Schedule>>,
    pub tasks: Mutex<Vec<Task>>,
}

impl InMemoryScheduler {
    pub fn with(schedules: impl IntoIterator<Item = Schedule>) -> Self {
        let scheduler = Self::default();
        scheduler.schedules.lock().unwrap().extend(schedules);
        scheduler
    }
}

impl Scheduler for InMemoryScheduler {
    fn get_schedules(&self) -> impl Future<Output = Result<Vec<Schedule>, ControlHubError>> + Send {
        let result = self.schedules.lock().unwrap().clone();
        async move { Ok(result) }
    }

    fn save_schedule(
        &self,
        schedule: Schedule,
    ) -> impl Future<Output = Result<Schedule, ControlHubError>> + Send {
        let mut schedules = self.schedules.lock().unwrap();
        schedules.retain(|existing| existing.id != schedule.id);
        schedules.push(schedule.clone());
        async move { Ok(schedule) }
    }

    fn queue_task(
        &self,
        id: ScheduleId,
        argument: Option<String>,
    ) -> impl Future<Output = Result<Task, ControlHubError>> + Send {
        let schedule = self
            .schedules
            .lock()
            .unwrap()
            .iter()
            .find(|schedule| schedule.id == id)
            .cloned();
        let result = match schedule {
            Some(schedule) => {
                let task = Task::queued(&schedule, argument);
                self.tasks.lock().unwrap().push(task.clone());
                Ok(task)
            }
            None => Err(NotFoundError::Schedule { id: id.to_string() }.into()),
        };
        async move { result }
    }
}
