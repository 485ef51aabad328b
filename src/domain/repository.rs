use async_trait::async_trait;

use super::task::{Task, TaskId, TaskStatus};

/// Persistence port for task entities. The repository is the sole
/// persistence authority; implementations may normalize timestamps and
/// defaults on write.
#[async_trait]
pub trait TaskRepository: Send + Sync + 'static {
    async fn init(&self) -> anyhow::Result<()>;
    async fn create(&self, task: Task) -> anyhow::Result<Task>;
    async fn find_by_id(&self, id: TaskId) -> anyhow::Result<Option<Task>>;
    async fn find_all(&self, status: Option<TaskStatus>) -> anyhow::Result<Vec<Task>>;
    async fn update(&self, task: Task) -> anyhow::Result<Task>;
    async fn delete(&self, id: TaskId) -> anyhow::Result<bool>;
}
