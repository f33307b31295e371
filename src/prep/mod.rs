/// Lays out one group's subtask directories and tables.
mod group_builder;
pub use group_builder::GroupBuilder;

/// Creates the paths of a task's subtask directories.
mod subtask_dir_paths;
use subtask_dir_paths::SubtaskDirPaths;

/// Utility for generating a subtask's `run.dat` file.
mod run_dat_builder;
use run_dat_builder::RunDatBuilder;
