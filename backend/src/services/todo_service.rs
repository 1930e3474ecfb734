use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::db::TodoRepository;
use crate::error::AppError;
use crate::models::{ListFilter, NewTodoRequest, Todo, TodoResponse, UpdateTodoRequest};

/// Use cases over todos. Inputs are expected to be validated by the caller.
///
/// Each call loads its own copy of the todo; concurrent writers to the same
/// id are not serialised, the last write wins.
pub struct TodoService {
    repository: Arc<dyn TodoRepository>,
}

impl TodoService {
    pub fn new(repository: Arc<dyn TodoRepository>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, req: NewTodoRequest) -> Result<TodoResponse, AppError> {
        let mut todo = Todo::new(req.title, req.description, req.expired_at);
        self.repository.add(&mut todo).await?;
        Ok(TodoResponse::from(&todo))
    }

    pub async fn get_list(&self, filter: ListFilter) -> Result<Vec<TodoResponse>, AppError> {
        self.get_list_at(filter, Local::now()).await
    }

    /// Lists todos as if the wall clock read `now`.
    pub async fn get_list_at(
        &self,
        filter: ListFilter,
        now: DateTime<Local>,
    ) -> Result<Vec<TodoResponse>, AppError> {
        let todos = match filter.window(&now) {
            Some(window) => self.repository.get_incoming(window.start, window.end).await?,
            None => self.repository.get_all().await?,
        };
        Ok(todos.iter().map(TodoResponse::from).collect())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<TodoResponse, AppError> {
        let todo = self.repository.get_by_id(id).await?;
        Ok(TodoResponse::from(&todo))
    }

    pub async fn mark_as_done(&self, id: i64) -> Result<TodoResponse, AppError> {
        let mut todo = self.repository.get_by_id(id).await?;
        todo.mark_as_done()?;
        self.repository.update(&todo).await?;
        Ok(TodoResponse::from(&todo))
    }

    pub async fn update(&self, req: UpdateTodoRequest, id: i64) -> Result<TodoResponse, AppError> {
        let mut todo = self.repository.get_by_id(id).await?;
        todo.update(
            req.todo.expired_at,
            req.todo.title,
            req.todo.description,
            req.completion,
        )?;
        self.repository.update(&todo).await?;
        Ok(TodoResponse::from(&todo))
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let todo = self.repository.get_by_id(id).await?;
        self.repository.delete(&todo).await?;
        Ok(())
    }
}
