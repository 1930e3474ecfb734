use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, error};

use crate::models::Todo;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("no records found")]
    NotFound,

    #[error("storage operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Storage contract for todos. `add` assigns the stored id back onto the todo.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn add(&self, todo: &mut Todo) -> Result<(), RepositoryError>;
    async fn get_all(&self) -> Result<Vec<Todo>, RepositoryError>;
    async fn get_by_id(&self, id: i64) -> Result<Todo, RepositoryError>;
    /// Todos with `start <= expired_at < end`, earliest deadline first.
    async fn get_incoming(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Todo>, RepositoryError>;
    async fn update(&self, todo: &Todo) -> Result<(), RepositoryError>;
    async fn delete(&self, todo: &Todo) -> Result<(), RepositoryError>;
}

const SELECT_TODOS: &str = "SELECT id, expired_at, title, description, completion FROM todos";

pub struct SqliteTodoRepository {
    db: SqlitePool,
    timeout: Duration,
}

impl SqliteTodoRepository {
    pub fn new(db: SqlitePool, timeout: Duration) -> Self {
        Self { db, timeout }
    }

    async fn bounded<T, F>(&self, operation: &'static str, query: F) -> Result<T, RepositoryError>
    where
        F: Future<Output = Result<T, sqlx::Error>> + Send,
    {
        match tokio::time::timeout(self.timeout, query).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                error!(operation, "storage operation failed: {}", err);
                Err(err.into())
            }
            Err(_) => {
                error!(operation, "storage operation timed out after {:?}", self.timeout);
                Err(RepositoryError::Timeout(self.timeout))
            }
        }
    }
}

#[async_trait]
impl TodoRepository for SqliteTodoRepository {
    async fn add(&self, todo: &mut Todo) -> Result<(), RepositoryError> {
        let result = self
            .bounded(
                "add",
                sqlx::query(
                    "INSERT INTO todos (expired_at, title, description, completion) VALUES (?, ?, ?, ?)",
                )
                .bind(todo.expired_at())
                .bind(todo.title())
                .bind(todo.description())
                .bind(todo.completion())
                .execute(&self.db),
            )
            .await?;

        todo.assign_id(result.last_insert_rowid());
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<Todo>, RepositoryError> {
        let sql = format!("{SELECT_TODOS} ORDER BY id");
        self.bounded(
            "get_all",
            sqlx::query_as::<_, Todo>(&sql).fetch_all(&self.db),
        )
        .await
    }

    async fn get_by_id(&self, id: i64) -> Result<Todo, RepositoryError> {
        let sql = format!("{SELECT_TODOS} WHERE id = ?");
        let found = self
            .bounded(
                "get_by_id",
                sqlx::query_as::<_, Todo>(&sql).bind(id).fetch_optional(&self.db),
            )
            .await?;

        found.ok_or_else(|| {
            debug!(id, "todo not found");
            RepositoryError::NotFound
        })
    }

    async fn get_incoming(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Todo>, RepositoryError> {
        let sql = format!(
            "{SELECT_TODOS} WHERE expired_at >= ? AND expired_at < ? ORDER BY expired_at, id"
        );
        self.bounded(
            "get_incoming",
            sqlx::query_as::<_, Todo>(&sql)
                .bind(start)
                .bind(end)
                .fetch_all(&self.db),
        )
        .await
    }

    async fn update(&self, todo: &Todo) -> Result<(), RepositoryError> {
        let affected = self
            .bounded(
                "update",
                sqlx::query(
                    "UPDATE todos SET expired_at = ?, title = ?, description = ?, completion = ? WHERE id = ?",
                )
                .bind(todo.expired_at())
                .bind(todo.title())
                .bind(todo.description())
                .bind(todo.completion())
                .bind(todo.id())
                .execute(&self.db),
            )
            .await?
            .rows_affected();

        if affected == 0 {
            debug!(id = todo.id(), "todo to update not found");
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, todo: &Todo) -> Result<(), RepositoryError> {
        let affected = self
            .bounded(
                "delete",
                sqlx::query("DELETE FROM todos WHERE id = ?")
                    .bind(todo.id())
                    .execute(&self.db),
            )
            .await?
            .rows_affected();

        if affected == 0 {
            debug!(id = todo.id(), "todo to delete not found");
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
