mod tests {
    use super::super::error::AppError;
    use super::super::use_cases::{
        CreateTask, DeleteTask, GetAllTasks, GetTaskById, UpdateFields, UpdateTask,
    };
    use crate::domain::{
        error::DomainError,
        repository::TaskRepository,
        task::{FieldUpdate, NewTask, Task, TaskId, TaskStatus},
    };
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Default)]
    struct InMemoryRepo {
        items: std::sync::Arc<std::sync::Mutex<std::collections::HashMap<String, Task>>>,
        delete_calls: std::sync::Arc<AtomicUsize>,
    }

    #[async_trait]
    impl TaskRepository for InMemoryRepo {
        async fn init(&self) -> Result<()> {
            Ok(())
        }
        async fn create(&self, task: Task) -> Result<Task> {
            self.items.lock().unwrap().insert(task.id().to_string(), task.clone());
            Ok(task)
        }
        async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>> {
            Ok(self.items.lock().unwrap().get(&id.to_string()).cloned())
        }
        async fn find_all(&self, status: Option<TaskStatus>) -> Result<Vec<Task>> {
            let items = self.items.lock().unwrap();
            Ok(items
                .values()
                .filter(|t| status.is_none_or(|s| t.status() == s))
                .cloned()
                .collect())
        }
        async fn update(&self, task: Task) -> Result<Task> {
            self.items.lock().unwrap().insert(task.id().to_string(), task.clone());
            Ok(task)
        }
        async fn delete(&self, id: TaskId) -> Result<bool> {
            self.delete_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.items.lock().unwrap().remove(&id.to_string()).is_some())
        }
    }

    fn draft(title: &str) -> NewTask {
        NewTask { title: title.into(), description: None, due_date: None, status: None }
    }

    #[tokio::test]
    async fn create_persists_and_get_finds_it() {
        let repo = InMemoryRepo::default();
        let created = CreateTask::new(repo.clone()).execute(draft("X")).await.unwrap();
        assert_eq!(created.title(), "X");
        assert_eq!(created.status(), TaskStatus::Pending);

        let got = GetTaskById::new(repo).execute(created.id()).await.unwrap();
        assert_eq!(got.id(), created.id());
    }

    #[tokio::test]
    async fn create_rejects_past_due_date() {
        let repo = InMemoryRepo::default();
        let mut input = draft("Late");
        input.due_date = Some(Utc::now() - Duration::hours(1));
        let err = CreateTask::new(repo.clone()).execute(input).await.unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::PastDueDate(_))));
        assert!(repo.items.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_missing_task_is_not_found() {
        let repo = InMemoryRepo::default();
        let err = GetTaskById::new(repo).execute(TaskId::default()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_filters_by_status_and_unfiltered_returns_all() {
        let repo = InMemoryRepo::default();
        let create = CreateTask::new(repo.clone());
        let a = create.execute(draft("open")).await.unwrap();
        let b = create.execute(draft("done")).await.unwrap();
        UpdateTask::new(repo.clone())
            .execute(
                b.id(),
                UpdateFields { status: Some("completed".into()), ..UpdateFields::default() },
            )
            .await
            .unwrap();

        let list = GetAllTasks::new(repo.clone());
        let completed = list.execute(Some("completed")).await.unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id(), b.id());

        let pending = list.execute(Some("pending")).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id(), a.id());

        let all = list.execute(None).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn list_rejects_invalid_filter_string() {
        let repo = InMemoryRepo::default();
        let err = GetAllTasks::new(repo).execute(Some("archived")).await.unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::InvalidStatus(_))));
    }

    #[tokio::test]
    async fn update_missing_task_is_not_found() {
        let repo = InMemoryRepo::default();
        let err = UpdateTask::new(repo)
            .execute(TaskId::default(), UpdateFields::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_rejects_invalid_status_string() {
        let repo = InMemoryRepo::default();
        let task = CreateTask::new(repo.clone()).execute(draft("T")).await.unwrap();
        let err = UpdateTask::new(repo)
            .execute(
                task.id(),
                UpdateFields { status: Some("archived".into()), ..UpdateFields::default() },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::InvalidStatus(_))));
    }

    #[tokio::test]
    async fn update_clears_due_date_when_explicitly_set_to_none() {
        let repo = InMemoryRepo::default();
        let mut input = draft("Clearable");
        input.due_date = Some(Utc::now() + Duration::days(1));
        let task = CreateTask::new(repo.clone()).execute(input).await.unwrap();

        let untouched = UpdateTask::new(repo.clone())
            .execute(task.id(), UpdateFields::default())
            .await
            .unwrap();
        assert!(untouched.due_date().is_some());

        let cleared = UpdateTask::new(repo)
            .execute(
                task.id(),
                UpdateFields { due_date: FieldUpdate::Set(None), ..UpdateFields::default() },
            )
            .await
            .unwrap();
        assert!(cleared.due_date().is_none());
        assert_eq!(cleared.id(), task.id());
    }

    #[tokio::test]
    async fn delete_removes_existing_task() {
        let repo = InMemoryRepo::default();
        let task = CreateTask::new(repo.clone()).execute(draft("Gone")).await.unwrap();
        DeleteTask::new(repo.clone()).execute(task.id()).await.unwrap();
        assert!(repo.items.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_missing_task_fails_without_touching_repository() {
        let repo = InMemoryRepo::default();
        let err = DeleteTask::new(repo.clone()).execute(TaskId::default()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(repo.delete_calls.load(Ordering::SeqCst), 0);
    }
}
