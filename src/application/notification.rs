use crate::domain::{
    notification::{NotificationPayload, NotificationQueue},
    task::Task,
};

/// Due-soon notification policy: emits a payload when a task's due date
/// falls within the next 24 hours. Delivery is fire-and-forget; a queue
/// failure is logged and absorbed so it never aborts the triggering request.
#[derive(Clone)]
pub struct NotificationService<Q: NotificationQueue> {
    queue: Q,
}

impl<Q: NotificationQueue> NotificationService<Q> {
    pub fn new(queue: Q) -> Self {
        Self { queue }
    }

    pub async fn check_and_notify(&self, task: &Task) {
        if !task.is_due_within_24_hours() {
            return;
        }
        let payload = NotificationPayload::for_task(task);
        if let Err(err) = self.queue.enqueue(payload).await {
            tracing::warn!(task_id = %task.id(), error = %err, "failed to enqueue due-soon notification");
        }
    }
}
