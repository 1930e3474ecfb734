use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

pub const DONE_COMPLETION: u32 = 100;

pub const MAX_TEXT_LEN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TodoError {
    #[error("cannot update, todo already marked as done")]
    AlreadyDone,

    #[error("cannot update, completion can not be greater than 100")]
    CompletionTooHigh,
}

/// A tracked task. Once `completion` reaches 100 the todo is done and
/// refuses any further mutation.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Todo {
    id: i64,
    expired_at: DateTime<Utc>,
    title: String,
    description: String,
    completion: u32,
}

impl Todo {
    /// New todos start at zero completion and carry id 0 until stored.
    pub fn new(title: String, description: String, expired_at: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            expired_at,
            title,
            description,
            completion: 0,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn expired_at(&self) -> DateTime<Utc> {
        self.expired_at
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn completion(&self) -> u32 {
        self.completion
    }

    pub fn is_done(&self) -> bool {
        self.completion == DONE_COMPLETION
    }

    pub(crate) fn assign_id(&mut self, id: i64) {
        self.id = id;
    }

    pub fn mark_as_done(&mut self) -> Result<(), TodoError> {
        if self.is_done() {
            return Err(TodoError::AlreadyDone);
        }
        self.completion = DONE_COMPLETION;
        Ok(())
    }

    /// Replaces every mutable field. Nothing is touched unless both checks
    /// pass; a too-high completion is reported ahead of an already-done todo.
    pub fn update(
        &mut self,
        expired_at: DateTime<Utc>,
        title: String,
        description: String,
        completion: u32,
    ) -> Result<(), TodoError> {
        if completion > DONE_COMPLETION {
            return Err(TodoError::CompletionTooHigh);
        }
        if self.is_done() {
            return Err(TodoError::AlreadyDone);
        }
        self.expired_at = expired_at;
        self.title = title;
        self.description = description;
        self.completion = completion;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTodoRequest {
    pub expired_at: DateTime<Utc>,
    pub title: String,
    pub description: String,
}

impl NewTodoRequest {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        check_text("title", &self.title, true, &mut errors);
        check_text("description", &self.description, false, &mut errors);
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(flatten)]
    pub todo: NewTodoRequest,
    pub completion: u32,
}

impl UpdateTodoRequest {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = match self.todo.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => errors,
        };
        if self.completion > DONE_COMPLETION {
            errors.push(format!("completion: must be at most {DONE_COMPLETION}"));
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn check_text(field: &str, value: &str, ascii_only: bool, errors: &mut Vec<String>) {
    let len = value.chars().count();
    if len == 0 {
        errors.push(format!("{field}: is required"));
    } else if len > MAX_TEXT_LEN {
        errors.push(format!("{field}: must be at most {MAX_TEXT_LEN} characters"));
    }
    if ascii_only && !value.is_ascii() {
        errors.push(format!("{field}: must contain only ASCII characters"));
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoResponse {
    pub id: i64,
    pub expired_at: String,
    pub title: String,
    pub description: String,
    pub completion: u32,
    pub done: bool,
}

impl From<&Todo> for TodoResponse {
    fn from(todo: &Todo) -> Self {
        Self {
            id: todo.id,
            expired_at: todo.expired_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            title: todo.title.clone(),
            description: todo.description.clone(),
            completion: todo.completion,
            done: todo.is_done(),
        }
    }
}
