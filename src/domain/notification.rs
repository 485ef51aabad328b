use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::task::{Task, TaskId};

/// Payload emitted for a task due within the next 24 hours.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub task_id: TaskId,
    pub title: String,
    pub due_date: Option<String>,
}

impl NotificationPayload {
    pub fn for_task(task: &Task) -> Self {
        Self {
            task_id: task.id(),
            title: task.title().to_owned(),
            due_date: task.due_date().map(|d| d.value().to_rfc3339()),
        }
    }
}

/// Delivery port for due-soon notifications. Enqueueing may fail; callers
/// above the adapter treat delivery as best-effort.
#[async_trait]
pub trait NotificationQueue: Send + Sync + 'static {
    async fn enqueue(&self, payload: NotificationPayload) -> anyhow::Result<()>;
}
