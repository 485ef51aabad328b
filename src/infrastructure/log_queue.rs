use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::io::AsyncWriteExt;

use crate::domain::notification::{NotificationPayload, NotificationQueue};

/// File-backed notification transport: each due-soon payload becomes one
/// line in a local log, alongside a tracing event. This is the degraded
/// best-effort delivery path; there is deliberately no retry.
#[derive(Clone)]
pub struct LogNotificationQueue {
    path: PathBuf,
}

impl LogNotificationQueue {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Self {
        let path = std::env::var("NOTIFICATIONS_LOG")
            .unwrap_or_else(|_| "logs/notifications.log".to_string());
        Self::new(path)
    }
}

#[async_trait]
impl NotificationQueue for LogNotificationQueue {
    async fn enqueue(&self, payload: NotificationPayload) -> Result<()> {
        let line = format!(
            "[{}] Notification: Task \"{}\" (ID: {}) is due within 24 hours. Due date: {}\n",
            Utc::now().to_rfc3339(),
            payload.title,
            payload.task_id,
            payload.due_date.as_deref().unwrap_or("N/A"),
        );
        tracing::info!(task_id = %payload.task_id, title = %payload.title, "due-soon notification");

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        Ok(())
    }
}
