mod block;
pub use block::{Block, RunSpec};

mod group;
pub use group::{Group, SubtaskType, TaskType, DEFAULT_GROUPS};

mod key;
pub use key::SubtaskKey;

mod task;
pub use task::{parse_task_name, Task};

mod theory;
pub use theory::TheoryTable;

mod species;
pub use species::SpeciesTable;

mod config;
pub use config::{SetupConfig, DEFAULT_OUT_DIR};

mod resolver;
pub use resolver::TaskResolver;

mod table;
pub use table::{SubtaskRow, SubtaskTable};

mod manifest;
pub use manifest::RunManifest;

pub use chem::SampleParams;

// used to separate task type from subtask type e.g. "els.spc"
pub const GROUP_DELIM: char = '.';
// first column of every subtask table
pub const TASK_COLUMN: &str = "task";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("No \"{0}\" assignment found in the input block")]
    MissingInputField(String),
    #[error("Theory level \"{0}\" not found in theory.dat")]
    LevelNotFound(String),
    #[error("Theory level \"{0}\" has no \"{1}\" field")]
    LevelFieldNotFound(String, String),
    #[error("Species {0} not found in species.csv ({1} species listed)")]
    SpeciesNotFound(usize, usize),
    #[error("Column \"{0}\" not found")]
    ColumnNotFound(String),
    #[error("Invalid value for \"{0}\": '{1}' (expected a non-negative number)")]
    InvalidNumber(String, String),
    #[error("Invalid subtask key: {0}")]
    InvalidSubtaskKey(String),
    #[error("Task \"{0}\" has {1} subtask keys but {2} worker counts")]
    WorkerCountMismatch(String, usize, usize),
    #[error("Invalid group \"{0}\" (expected 'TASK[.SUBTASK]', e.g. 'els.spc' or 'kin')")]
    InvalidGroup(String),
    #[error("Task line has no task name: '{0}'")]
    MissingTaskName(String),
    #[error("Row for task \"{0}\" has {1} paths but the table has {2} subtask columns")]
    RowLength(String, usize, usize),
}

/// Read a numeric field the way the run files write them, e.g. `8` or `8.0`.
/// Fractional values are truncated.
pub(crate) fn parse_count(field: &str, value: &str) -> Result<usize, Error> {
    match value.parse::<f64>() {
        Ok(num) if num.is_finite() && num >= 0.0 => Ok(num as usize),
        _ => Err(Error::InvalidNumber(field.to_owned(), value.to_owned())),
    }
}
