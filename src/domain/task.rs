use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::DomainError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TaskId(pub Uuid);

impl Default for TaskId {
    fn default() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Closed task lifecycle status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    /// Canonical storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    /// Resolves a raw status string, rejecting anything outside the closed set.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            _ => Err(DomainError::InvalidStatus(raw.to_owned())),
        }
    }
}

/// Parses an RFC 3339 instant as supplied by a transport boundary or storage.
pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>, DomainError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| DomainError::InvalidDate(raw.to_owned()))
}

/// A task due date. Newly supplied values must not lie in the past;
/// values rehydrated from storage are trusted as-is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct DueDate(DateTime<Utc>);

impl DueDate {
    pub fn new(value: DateTime<Utc>) -> Result<Self, DomainError> {
        if value < Utc::now() {
            return Err(DomainError::PastDueDate(value));
        }
        Ok(Self(value))
    }

    /// Rehydrates a stored due date without the past-date check, so rows
    /// whose due date has elapsed since they were written still load.
    pub const fn from_stored(value: DateTime<Utc>) -> Self {
        Self(value)
    }

    pub fn value(self) -> DateTime<Utc> {
        self.0
    }

    /// True iff the due date lies within the next 24 hours, evaluated now.
    pub fn is_due_soon(self) -> bool {
        self.is_due_soon_at(Utc::now())
    }

    /// Exclusive at zero, inclusive at exactly 24 hours.
    pub fn is_due_soon_at(self, now: DateTime<Utc>) -> bool {
        let until = self.0 - now;
        until > Duration::zero() && until <= Duration::hours(24)
    }
}

/// A field in an update request: either left alone or replaced.
/// `Set(None)` on an optional field is an explicit clear, which is
/// distinct from `Unchanged`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    Unchanged,
    Set(T),
}

impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        Self::Unchanged
    }
}

impl<T> FieldUpdate<T> {
    fn resolve(self, current: T) -> T {
        match self {
            Self::Unchanged => current,
            Self::Set(value) => value,
        }
    }
}

/// Input for the task factory.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    /// Defaults to `Pending` when absent.
    pub status: Option<TaskStatus>,
}

/// Field changes applied by [`Task::apply`].
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: FieldUpdate<String>,
    pub description: FieldUpdate<Option<String>>,
    pub due_date: FieldUpdate<Option<DateTime<Utc>>>,
    pub status: FieldUpdate<TaskStatus>,
}

/// Raw row data for reconstructing a persisted task.
#[derive(Debug, Clone)]
pub struct PersistedTask {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Immutable task entity. All mutation goes through [`Task::apply`],
/// which produces a fresh instance; `id` and `created_at` never change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    title: String,
    description: Option<String>,
    due_date: Option<DueDate>,
    status: TaskStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task with a fresh identity and current timestamps.
    pub fn new(input: NewTask) -> Result<Self, DomainError> {
        let now = Utc::now();
        Ok(Self {
            id: TaskId::default(),
            title: input.title,
            description: input.description,
            due_date: input.due_date.map(DueDate::new).transpose()?,
            status: input.status.unwrap_or(TaskStatus::Pending),
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstructs a task from storage. The stored status string still goes
    /// through [`TaskStatus::parse`]; the due date is trusted even if it has
    /// since elapsed.
    pub fn from_persisted(data: PersistedTask) -> Result<Self, DomainError> {
        Ok(Self {
            id: data.id,
            title: data.title,
            description: data.description,
            due_date: data.due_date.map(DueDate::from_stored),
            status: TaskStatus::parse(&data.status)?,
            created_at: data.created_at,
            updated_at: data.updated_at,
        })
    }

    /// Returns a new task with the patch applied and `updated_at` refreshed.
    /// A newly set due date is validated like on creation; clearing or
    /// omitting it never re-validates the existing value.
    pub fn apply(&self, patch: TaskPatch) -> Result<Self, DomainError> {
        let due_date = match patch.due_date {
            FieldUpdate::Unchanged => self.due_date,
            FieldUpdate::Set(None) => None,
            FieldUpdate::Set(Some(value)) => Some(DueDate::new(value)?),
        };
        Ok(Self {
            id: self.id,
            title: patch.title.resolve(self.title.clone()),
            description: patch.description.resolve(self.description.clone()),
            due_date,
            status: patch.status.resolve(self.status),
            created_at: self.created_at,
            updated_at: Utc::now(),
        })
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn due_date(&self) -> Option<DueDate> {
        self.due_date
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_due_within_24_hours(&self) -> bool {
        self.due_date.is_some_and(DueDate::is_due_soon)
    }

    /// Plain data representation shared by the HTTP boundary and persistence.
    pub fn record(&self) -> TaskRecord {
        TaskRecord {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: self.due_date.map(DueDate::value),
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Serialized task shape: camelCase keys, RFC 3339 timestamps, explicit
/// nulls for absent description/due date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
