//! Scheduler port: schedules and the queue of pending runs.

use std::future::Future;
use std::sync::Arc;

use controlhub_domain::error::ControlHubError;
use controlhub_domain::id::ScheduleId;
use controlhub_domain::schedule::{Schedule, Task};

/// Persists [`Schedule`]s and queues [`Task`]s against them.
pub trait Scheduler {
    /// Get all schedules.
    fn get_schedules(&self) -> impl Future<Output = Result<Vec<Schedule>, ControlHubError>> + Send;

    /// Insert or replace a schedule.
    fn save_schedule(
        &self,
        schedule: Schedule,
    ) -> impl Future<Output = Result<Schedule, ControlHubError>> + Send;

    /// Queue one immediate run of schedule `id`.
    fn queue_task(
        &self,
        id: ScheduleId,
        argument: Option<String>,
    ) -> impl Future<Output = Result<Task, ControlHubError>> + Send;
}

impl<T: Scheduler + Send + Sync> Scheduler for Arc<T> {
    fn get_schedules(&self) -> impl Future<Output = Result<Vec<Schedule>, ControlHubError>> + Send {
        (**self).get_schedules()
    }

    fn save_schedule(
        &self,
        schedule: Schedule,
    ) -> impl Future<Output = Result<Schedule, ControlHubError>> + Send {
        (**self).save_schedule(schedule)
    }

    fn queue_task(
        &self,
        id: ScheduleId,
        argument: Option<String>,
    ) -> impl Future<Output = Result<Task, ControlHubError>> + Send {
        (**self).queue_task(id, argument)
    }
}
