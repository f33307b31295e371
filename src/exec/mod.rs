/// Reads a setup back and dispatches its tasks
mod adhoc_runner;
pub use adhoc_runner::AdhocRunner;

/// Hand tasks off to an external process
mod dispatch;
pub use dispatch::{Dispatch, DispatchCall, ScriptDispatcher};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Row {0} of the subtask table is for task \"{1}\", but the task list has \"{2}\"")]
    TaskMismatch(usize, String, String),
    #[error("Group {0} has {1} rows in its subtask table but {2} tasks in its task list")]
    RowCountMismatch(usize, usize, usize),
    #[error("Subtask table has no column for subtask \"{0}\"")]
    ColumnNotFound(String),
}
