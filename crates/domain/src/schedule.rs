//! Schedule: how and when a process is run by the scheduler.
//!
//! A queued [`Task`] records one pending run of a schedule. Tasks are only
//! recorded here; executing them is the scheduler's concern.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ControlHubError, ValidationError};
use crate::id::{ScheduleId, TaskId};
use crate::time::{Timestamp, now};

/// Process name of schedules that run automation scripts.
pub const AUTOMATION_SCRIPT_PROCESS: &str = "automation_script";

/// When a schedule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleType {
    /// Once, when the hub starts.
    Startup,
    /// At a time of day.
    Timed,
    /// Every `repeat_seconds`.
    Interval,
    /// Only when a run is queued explicitly.
    Manual,
}

impl ScheduleType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Startup => "STARTUP",
            Self::Timed => "TIMED",
            Self::Interval => "INTERVAL",
            Self::Manual => "MANUAL",
        }
    }
}

impl fmt::Display for ScheduleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScheduleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STARTUP" => Ok(Self::Startup),
            "TIMED" => Ok(Self::Timed),
            "INTERVAL" => Ok(Self::Interval),
            "MANUAL" => Ok(Self::Manual),
            other => Err(format!("unknown schedule type: {other}")),
        }
    }
}

/// A persisted schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: ScheduleId,
    pub name: String,
    pub process_name: String,
    #[serde(rename = "type")]
    pub schedule_type: ScheduleType,
    pub repeat_seconds: Option<u32>,
    /// Seconds past midnight, for timed schedules.
    pub time: Option<u32>,
    /// ISO weekday (1 = Monday), for timed schedules.
    pub day: Option<u8>,
    pub exclusive: bool,
    pub enabled: bool,
}

impl Schedule {
    /// Create a builder for constructing a [`Schedule`].
    #[must_use]
    pub fn builder() -> ScheduleBuilder {
        ScheduleBuilder::default()
    }

    /// The manual, exclusive, enabled schedule that runs script `name`.
    #[must_use]
    pub fn automation_script(name: impl Into<String>) -> Self {
        Self {
            id: ScheduleId::new(),
            name: name.into(),
            process_name: AUTOMATION_SCRIPT_PROCESS.to_string(),
            schedule_type: ScheduleType::Manual,
            repeat_seconds: None,
            time: None,
            day: None,
            exclusive: true,
            enabled: true,
        }
    }

    /// Whether this schedule runs the automation script `name`.
    #[must_use]
    pub fn is_automation_script_for(&self, name: &str) -> bool {
        self.process_name == AUTOMATION_SCRIPT_PROCESS && self.name == name
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ControlHubError::Validation`] when the name or process name
    /// is empty, or when an interval schedule has no positive repeat.
    pub fn validate(&self) -> Result<(), ControlHubError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::ScheduleNameEmpty.into());
        }
        if self.process_name.trim().is_empty() {
            return Err(ValidationError::ProcessNameEmpty.into());
        }
        if self.schedule_type == ScheduleType::Interval
            && self.repeat_seconds.is_none_or(|repeat| repeat == 0)
        {
            return Err(ValidationError::IntervalWithoutRepeat.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Schedule`].
#[derive(Debug)]
pub struct ScheduleBuilder {
    id: Option<ScheduleId>,
    name: Option<String>,
    process_name: Option<String>,
    schedule_type: ScheduleType,
    repeat_seconds: Option<u32>,
    exclusive: bool,
    enabled: bool,
}

impl Default for ScheduleBuilder {
    fn default() -> Self {
        Self {
            id: None,
            name: None,
            process_name: None,
            schedule_type: ScheduleType::Manual,
            repeat_seconds: None,
            exclusive: true,
            enabled: true,
        }
    }
}

impl ScheduleBuilder {
    #[must_use]
    pub fn id(mut self, id: ScheduleId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn process_name(mut self, process_name: impl Into<String>) -> Self {
        self.process_name = Some(process_name.into());
        self
    }

    #[must_use]
    pub fn schedule_type(mut self, schedule_type: ScheduleType) -> Self {
        self.schedule_type = schedule_type;
        self
    }

    #[must_use]
    pub fn repeat_seconds(mut self, repeat_seconds: u32) -> Self {
        self.repeat_seconds = Some(repeat_seconds);
        self
    }

    #[must_use]
    pub fn exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Consume the builder, validate, and return a [`Schedule`].
    ///
    /// # Errors
    ///
    /// Returns [`ControlHubError::Validation`] if the result breaks an
    /// invariant of [`Schedule::validate`].
    pub fn build(self) -> Result<Schedule, ControlHubError> {
        let schedule = Schedule {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            process_name: self.process_name.unwrap_or_default(),
            schedule_type: self.schedule_type,
            repeat_seconds: self.repeat_seconds,
            time: None,
            day: None,
            exclusive: self.exclusive,
            enabled: self.enabled,
        };
        schedule.validate()?;
        Ok(schedule)
    }
}

/// State of a queued run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Queued,
}

impl TaskState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
        }
    }
}

impl FromStr for TaskState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(Self::Queued),
            other => Err(format!("unknown task state: {other}")),
        }
    }
}

/// One pending run of a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub schedule_id: ScheduleId,
    pub process_name: String,
    pub argument: Option<String>,
    pub state: TaskState,
    pub queued_at: Timestamp,
}

impl Task {
    /// Queue a run of `schedule` now.
    #[must_use]
    pub fn queued(schedule: &Schedule, argument: Option<String>) -> Self {
        Self {
            id: TaskId::new(),
            schedule_id: schedule.id,
            process_name: schedule.process_name.clone(),
            argument,
            state: TaskState::Queued,
            queued_at: now(),
        }
    }
}
