use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;

use crate::db::SqliteTodoRepository;
use crate::services::TodoService;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub todos: Arc<TodoService>,
}

impl AppState {
    pub fn new(db: SqlitePool, db_timeout: Duration) -> Self {
        let repository = SqliteTodoRepository::new(db.clone(), db_timeout);
        Self {
            db,
            todos: Arc::new(TodoService::new(Arc::new(repository))),
        }
    }
}
