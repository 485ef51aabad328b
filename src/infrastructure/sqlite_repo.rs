use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    Pool, Row, Sqlite,
    sqlite::{SqlitePoolOptions, SqliteRow},
};
use uuid::Uuid;

use crate::domain::{
    repository::TaskRepository,
    task::{PersistedTask, Task, TaskId, TaskStatus},
};

const SELECT_FIELDS: &str = "id, title, description, due_date, status, created_at, updated_at";

#[derive(Clone)]
pub struct SqliteTaskRepository {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteTaskRepository {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self { pool: Arc::new(pool) })
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT,
                due_date TEXT,
                status TEXT NOT NULL DEFAULT 'pending',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    async fn create(&self, task: Task) -> Result<Task> {
        sqlx::query(
            "INSERT INTO tasks (id, title, description, due_date, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(task.id().to_string())
        .bind(task.title())
        .bind(task.description())
        .bind(task.due_date().map(|d| d.value().to_rfc3339()))
        .bind(task.status().as_str())
        .bind(task.created_at().to_rfc3339())
        .bind(task.updated_at().to_rfc3339())
        .execute(&*self.pool)
        .await?;
        Ok(task)
    }

    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>> {
        let row = sqlx::query(&format!("SELECT {SELECT_FIELDS} FROM tasks WHERE id = ?1"))
            .bind(id.to_string())
            .fetch_optional(&*self.pool)
            .await?;
        row.map(row_to_task).transpose()
    }

    async fn find_all(&self, status: Option<TaskStatus>) -> Result<Vec<Task>> {
        let rows = match status {
            Some(status) => {
                sqlx::query(&format!(
                    "SELECT {SELECT_FIELDS} FROM tasks WHERE status = ?1 ORDER BY created_at DESC"
                ))
                .bind(status.as_str())
                .fetch_all(&*self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {SELECT_FIELDS} FROM tasks ORDER BY created_at DESC"
                ))
                .fetch_all(&*self.pool)
                .await?
            }
        };
        rows.into_iter().map(row_to_task).collect()
    }

    async fn update(&self, task: Task) -> Result<Task> {
        sqlx::query(
            "UPDATE tasks SET title = ?2, description = ?3, due_date = ?4, status = ?5, updated_at = ?6
             WHERE id = ?1",
        )
        .bind(task.id().to_string())
        .bind(task.title())
        .bind(task.description())
        .bind(task.due_date().map(|d| d.value().to_rfc3339()))
        .bind(task.status().as_str())
        .bind(task.updated_at().to_rfc3339())
        .execute(&*self.pool)
        .await?;
        Ok(task)
    }

    async fn delete(&self, id: TaskId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?1")
            .bind(id.to_string())
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn row_to_task(row: SqliteRow) -> Result<Task> {
    let id_str: String = row.get("id");
    let id = TaskId(Uuid::parse_str(&id_str).with_context(|| format!("bad task id {id_str}"))?);
    let due_date = row
        .get::<Option<String>, _>("due_date")
        .map(|raw| parse_stored_instant(&raw))
        .transpose()?;
    let task = Task::from_persisted(PersistedTask {
        id,
        title: row.get("title"),
        description: row.get("description"),
        due_date,
        status: row.get("status"),
        created_at: parse_stored_instant(&row.get::<String, _>("created_at"))?,
        updated_at: parse_stored_instant(&row.get::<String, _>("updated_at"))?,
    })?;
    Ok(task)
}

fn parse_stored_instant(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .with_context(|| format!("bad stored timestamp {raw}"))
}
