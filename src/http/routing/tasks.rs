use axum::http::StatusCode;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::application::{
    error::AppError,
    notification::NotificationService,
    use_cases::{CreateTask, DeleteTask, GetAllTasks, GetTaskById, UpdateFields, UpdateTask},
};
use crate::domain::{
    notification::NotificationQueue,
    repository::TaskRepository,
    task::{FieldUpdate, NewTask, TaskId, TaskRecord, parse_instant},
};

use super::super::types::ApiError;

const MAX_TITLE_LEN: usize = 255;
const MAX_DESCRIPTION_LEN: usize = 1000;

#[derive(Clone)]
pub struct AppState<R, Q>
where
    R: TaskRepository + Clone,
    Q: NotificationQueue + Clone,
{
    pub create_task: CreateTask<R>,
    pub get_task: GetTaskById<R>,
    pub get_all_tasks: GetAllTasks<R>,
    pub update_task: UpdateTask<R>,
    pub delete_task: DeleteTask<R>,
    pub notifications: NotificationService<Q>,
}

impl<R, Q> AppState<R, Q>
where
    R: TaskRepository + Clone,
    Q: NotificationQueue + Clone,
{
    pub fn new(repo: R, queue: Q) -> Self {
        Self {
            create_task: CreateTask::new(repo.clone()),
            get_task: GetTaskById::new(repo.clone()),
            get_all_tasks: GetAllTasks::new(repo.clone()),
            update_task: UpdateTask::new(repo.clone()),
            delete_task: DeleteTask::new(repo),
            notifications: NotificationService::new(queue),
        }
    }
}

pub fn router<R, Q>(state: AppState<R, Q>) -> Router
where
    R: TaskRepository + Clone,
    Q: NotificationQueue + Clone,
{
    Router::new()
        .route("/tasks", post(create_task::<R, Q>).get(list_tasks::<R, Q>))
        .route(
            "/tasks/:id",
            get(get_task::<R, Q>)
                .put(update_task::<R, Q>)
                .delete(delete_task::<R, Q>),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTaskBody {
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    due_date: Option<String>,
}

/// Distinguishes an omitted field from an explicit `null`: missing keys
/// stay `None` via the default, present keys (null included) become `Some`.
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTaskBody {
    #[serde(default)]
    title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    due_date: Option<Option<String>>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListParams {
    status: Option<String>,
}

async fn create_task<R, Q>(
    State(state): State<AppState<R, Q>>,
    Json(body): Json<CreateTaskBody>,
) -> Result<(StatusCode, Json<TaskRecord>), ApiError>
where
    R: TaskRepository + Clone,
    Q: NotificationQueue + Clone,
{
    validate_title(&body.title)?;
    validate_description(body.description.as_deref())?;
    let due_date = parse_due_date(body.due_date.as_deref())?;

    let task = state
        .create_task
        .execute(NewTask {
            title: body.title,
            description: body.description,
            due_date,
            status: None,
        })
        .await?;
    state.notifications.check_and_notify(&task).await;
    Ok((StatusCode::CREATED, Json(task.record())))
}

async fn list_tasks<R, Q>(
    State(state): State<AppState<R, Q>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<TaskRecord>>, ApiError>
where
    R: TaskRepository + Clone,
    Q: NotificationQueue + Clone,
{
    let tasks = state.get_all_tasks.execute(params.status.as_deref()).await?;
    Ok(Json(tasks.iter().map(|t| t.record()).collect()))
}

async fn get_task<R, Q>(
    State(state): State<AppState<R, Q>>,
    Path(id): Path<String>,
) -> Result<Json<TaskRecord>, ApiError>
where
    R: TaskRepository + Clone,
    Q: NotificationQueue + Clone,
{
    let id = parse_id(&id)?;
    let task = state.get_task.execute(id).await?;
    Ok(Json(task.record()))
}

async fn update_task<R, Q>(
    State(state): State<AppState<R, Q>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateTaskBody>,
) -> Result<Json<TaskRecord>, ApiError>
where
    R: TaskRepository + Clone,
    Q: NotificationQueue + Clone,
{
    let id = parse_id(&id)?;
    if let Some(title) = &body.title {
        validate_title(title)?;
    }
    if let Some(description) = &body.description {
        validate_description(description.as_deref())?;
    }
    let due_date = match body.due_date {
        None => FieldUpdate::Unchanged,
        Some(None) => FieldUpdate::Set(None),
        Some(Some(raw)) => FieldUpdate::Set(parse_due_date(Some(&raw))?),
    };

    let fields = UpdateFields {
        title: body.title,
        description: body
            .description
            .map_or(FieldUpdate::Unchanged, FieldUpdate::Set),
        due_date,
        status: body.status,
    };
    let task = state.update_task.execute(id, fields).await?;
    state.notifications.check_and_notify(&task).await;
    Ok(Json(task.record()))
}

async fn delete_task<R, Q>(
    State(state): State<AppState<R, Q>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
    R: TaskRepository + Clone,
    Q: NotificationQueue + Clone,
{
    let id = parse_id(&id)?;
    state.delete_task.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_id(raw: &str) -> Result<TaskId, ApiError> {
    uuid::Uuid::parse_str(raw)
        .map(TaskId)
        .map_err(|_| ApiError::Validation(format!("invalid task id '{raw}'")))
}

fn parse_due_date(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, ApiError> {
    raw.map(parse_instant)
        .transpose()
        .map_err(|err| ApiError::from(AppError::from(err)))
}

fn validate_title(title: &str) -> Result<(), ApiError> {
    if title.is_empty() {
        return Err(ApiError::Validation("title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ApiError::Validation(format!(
            "title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_description(description: Option<&str>) -> Result<(), ApiError> {
    if description.is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_LEN) {
        return Err(ApiError::Validation(format!(
            "description must be at most {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(())
}
