use std::path::{Path, PathBuf};

use workflow::SubtaskKey;

use crate::fs::Fs;

/// Reusable container for the paths of one task's directories.
pub struct SubtaskDirPaths {
    /// $OUTPUT/<group_id>_<task_idx>_<task_name>
    task: PathBuf,
    /// $OUTPUT/<task_dir>/<key>
    subtask: PathBuf,
}

impl SubtaskDirPaths {
    pub fn new() -> Self {
        Self {
            task: PathBuf::with_capacity(512),
            subtask: PathBuf::with_capacity(512),
        }
    }

    pub fn make_task_path(&mut self, fs: &Fs, group_id: usize, task_idx: usize, name: &str) {
        fs.task_dir(group_id, task_idx, name, &mut self.task);
    }

    pub fn make_subtask_path(&mut self, fs: &Fs, key: &SubtaskKey) {
        fs.subtask_dir(&self.task, key, &mut self.subtask);
    }

    pub fn task(&self) -> &Path {
        &self.task
    }

    pub fn subtask(&self) -> &Path {
        &self.subtask
    }
}
