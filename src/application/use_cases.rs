use chrono::{DateTime, Utc};

use crate::domain::{
    repository::TaskRepository,
    task::{FieldUpdate, NewTask, Task, TaskId, TaskPatch, TaskStatus},
};

use super::error::AppError;

/// Creates a task with a fresh identity and persists it.
#[derive(Clone)]
pub struct CreateTask<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> CreateTask<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: NewTask) -> Result<Task, AppError> {
        let task = Task::new(input)?;
        Ok(self.repo.create(task).await?)
    }
}

#[derive(Clone)]
pub struct GetTaskById<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> GetTaskById<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: TaskId) -> Result<Task, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound(id))
    }
}

/// Lists tasks, optionally narrowed to a single status. The raw filter
/// string is resolved before the repository is consulted.
#[derive(Clone)]
pub struct GetAllTasks<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> GetAllTasks<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, status: Option<&str>) -> Result<Vec<Task>, AppError> {
        let filter = status.map(TaskStatus::parse).transpose()?;
        Ok(self.repo.find_all(filter).await?)
    }
}

/// Update request fields as received from the boundary; the status arrives
/// as a raw string and is resolved here.
#[derive(Debug, Clone, Default)]
pub struct UpdateFields {
    pub title: Option<String>,
    pub description: FieldUpdate<Option<String>>,
    pub due_date: FieldUpdate<Option<DateTime<Utc>>>,
    pub status: Option<String>,
}

#[derive(Clone)]
pub struct UpdateTask<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> UpdateTask<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: TaskId, fields: UpdateFields) -> Result<Task, AppError> {
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound(id))?;

        let status = fields.status.as_deref().map(TaskStatus::parse).transpose()?;
        let patch = TaskPatch {
            title: fields.title.map_or(FieldUpdate::Unchanged, FieldUpdate::Set),
            description: fields.description,
            due_date: fields.due_date,
            status: status.map_or(FieldUpdate::Unchanged, FieldUpdate::Set),
        };

        let updated = existing.apply(patch)?;
        Ok(self.repo.update(updated).await?)
    }
}

/// Deletes a task; existence is checked first so a missing id never issues
/// a delete against the repository.
#[derive(Clone)]
pub struct DeleteTask<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> DeleteTask<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: TaskId) -> Result<(), AppError> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(AppError::NotFound(id));
        }
        self.repo.delete(id).await?;
        Ok(())
    }
}
