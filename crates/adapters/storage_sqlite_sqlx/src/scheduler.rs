//! `SQLite` implementation of [`Scheduler`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use controlhub_app::ports::Scheduler;
use controlhub_domain::error::{ControlHubError, NotFoundError};
use controlhub_domain::id::ScheduleId;
use controlhub_domain::schedule::{Schedule, ScheduleType, Task};

use crate::error::{StorageError, decode_error};

struct Wrapper(Schedule);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Schedule> {
        value.map(|w| w.0)
    }
}

fn optional<T: TryFrom<i64>>(value: Option<i64>) -> Result<Option<T>, sqlx::Error>
where
    T::Error: std::error::Error + Send + Sync + 'static,
{
    value.map(T::try_from).transpose().map_err(decode_error)
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let name: String = row.try_get("schedule_name")?;
        let process_name: String = row.try_get("process_name")?;
        let schedule_type: String = row.try_get("schedule_type")?;
        let repeat_seconds: Option<i64> = row.try_get("schedule_interval")?;
        let time: Option<i64> = row.try_get("schedule_time")?;
        let day: Option<i64> = row.try_get("schedule_day")?;
        let exclusive: bool = row.try_get("exclusive")?;
        let enabled: bool = row.try_get("enabled")?;

        let id = ScheduleId::from_str(&id).map_err(decode_error)?;
        let schedule_type =
            ScheduleType::from_str(&schedule_type).map_err(|err| sqlx::Error::Decode(err.into()))?;

        Ok(Self(Schedule {
            id,
            name,
            process_name,
            schedule_type,
            repeat_seconds: optional(repeat_seconds)?,
            time: optional(time)?,
            day: optional(day)?,
            exclusive,
            enabled,
        }))
    }
}

const SELECT_ALL: &str = "SELECT * FROM schedules ORDER BY schedule_name";
const SELECT_BY_ID: &str = "SELECT * FROM schedules WHERE id = ?";

const UPSERT: &str = r"
    INSERT INTO schedules (
        id, schedule_name, process_name, schedule_type,
        schedule_interval, schedule_time, schedule_day, exclusive, enabled
    )
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT(id) DO UPDATE SET
        schedule_name = excluded.schedule_name,
        process_name = excluded.process_name,
        schedule_type = excluded.schedule_type,
        schedule_interval = excluded.schedule_interval,
        schedule_time = excluded.schedule_time,
        schedule_day = excluded.schedule_day,
        exclusive = excluded.exclusive,
        enabled = excluded.enabled
";

const INSERT_TASK: &str = r"
    INSERT INTO tasks (id, schedule_id, process_name, argument, state, queued_at)
    VALUES (?, ?, ?, ?, ?, ?)
";

/// `SQLite`-backed schedule store and task queue.
pub struct SqliteScheduler {
    pool: SqlitePool,
}

impl SqliteScheduler {
    /// Create a new scheduler using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl Scheduler for SqliteScheduler {
    async fn get_schedules(&self) -> Result<Vec<Schedule>, ControlHubError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn save_schedule(&self, schedule: Schedule) -> Result<Schedule, ControlHubError> {
        schedule.validate()?;

        sqlx::query(UPSERT)
            .bind(schedule.id.to_string())
            .bind(&schedule.name)
            .bind(&schedule.process_name)
            .bind(schedule.schedule_type.as_str())
            .bind(schedule.repeat_seconds)
            .bind(schedule.time)
            .bind(schedule.day)
            .bind(schedule.exclusive)
            .bind(schedule.enabled)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        tracing::debug!(schedule = %schedule.name, id = %schedule.id, "schedule saved");
        Ok(schedule)
    }

    async fn queue_task(
        &self,
        id: ScheduleId,
        argument: Option<String>,
    ) -> Result<Task, ControlHubError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;
        let schedule = Wrapper::maybe(row).ok_or_else(|| NotFoundError::Schedule {
            id: id.to_string(),
        })?;

        let task = Task::queued(&schedule, argument);
        sqlx::query(INSERT_TASK)
            .bind(task.id.to_string())
            .bind(task.schedule_id.to_string())
            .bind(&task.process_name)
            .bind(task.argument.as_deref())
            .bind(task.state.as_str())
            .bind(task.queued_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        tracing::debug!(schedule = %schedule.name, task = %task.id, "task queued");
        Ok(task)
    }
}
