pub mod filter;
pub mod todo;

pub use filter::{ListFilter, TimeWindow};
pub use todo::{NewTodoRequest, Todo, TodoError, TodoResponse, UpdateTodoRequest};
