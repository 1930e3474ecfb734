use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query};
use axum::routing::patch;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::Deserialize;

use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;

#[derive(Deserialize)]
struct TodoQueryParams {
    #[serde(default)]
    filter: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/", get(list_todos).post(create_todo))
        .route("/todos/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .route("/todos/{id}/done", patch(mark_todo_done))
        .with_state(state)
}

// Ids are unsigned on the wire; anything outside the storage range is unparsable.
fn todo_id(id: Result<Path<u64>, PathRejection>) -> Result<i64, AppError> {
    let Path(id) = id?;
    i64::try_from(id)
        .map_err(|_| AppError::BadRequest("not able to parse id parameter".to_string()))
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn list_todos(
    State(state): State<AppState>,
    Query(params): Query<TodoQueryParams>,
) -> Result<Json<Vec<TodoResponse>>, AppError> {
    let filter = params.filter.as_deref().map(ListFilter::from).unwrap_or_default();
    let todos = state.todos.get_list(filter).await?;
    Ok(Json(todos))
}

async fn create_todo(
    State(state): State<AppState>,
    req: Result<Json<NewTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoResponse>), AppError> {
    let Json(req) = req?;
    req.validate().map_err(AppError::Validation)?;
    let todo = state.todos.create(req).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn get_todo(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<TodoResponse>, AppError> {
    let id = todo_id(id)?;
    let todo = state.todos.get_by_id(id).await?;
    Ok(Json(todo))
}

async fn update_todo(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    req: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Json<TodoResponse>, AppError> {
    let id = todo_id(id)?;
    let Json(req) = req?;
    req.validate().map_err(AppError::Validation)?;
    let todo = state.todos.update(req, id).await?;
    Ok(Json(todo))
}

async fn mark_todo_done(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<TodoResponse>, AppError> {
    let id = todo_id(id)?;
    let todo = state.todos.mark_as_done(id).await?;
    Ok(Json(todo))
}

async fn delete_todo(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = todo_id(id)?;
    state.todos.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
