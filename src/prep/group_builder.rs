use std::path::PathBuf;

use anyhow::{Context, Result};

use workflow::{Group, RunSpec, SubtaskKey, SubtaskTable, Task};

use crate::fs::{path_str, Fs, InputFiles, RUN_DAT};
use crate::ui::Ui;

use super::{RunDatBuilder, SubtaskDirPaths};

/// Lays out the subtask directories of one group, and writes
/// the group's task list and subtask table.
pub struct GroupBuilder<'a> {
    fs: &'a Fs,
    ui: &'a Ui,
    run: &'a RunSpec,
    files: &'a InputFiles,
    paths: SubtaskDirPaths,
    pathbuf: PathBuf,
    strbuf: String,
}

impl<'a> GroupBuilder<'a> {
    pub fn new(fs: &'a Fs, ui: &'a Ui, run: &'a RunSpec, files: &'a InputFiles) -> Self {
        Self {
            fs,
            ui,
            run,
            files,
            paths: SubtaskDirPaths::new(),
            pathbuf: PathBuf::with_capacity(256),
            strbuf: String::with_capacity(1024),
        }
    }

    pub fn build(
        &mut self,
        group_id: usize,
        group: Group,
        keys: &[SubtaskKey],
        tasks: &[Task],
    ) -> Result<SubtaskTable> {
        let yaml = self.fs.group_yaml(group_id, &mut self.pathbuf);
        self.ui.status("Writing task specs to", yaml);
        self.fs.write_yaml(yaml, tasks)?;

        let mut table = SubtaskTable::new(keys);
        for (task_idx, task) in tasks.iter().enumerate() {
            self.paths
                .make_task_path(self.fs, group_id, task_idx, &task.name);
            self.ui
                .status("Setting up subtask directories in", self.paths.task());

            let mut row = Vec::with_capacity(task.subtask_keys.len());
            for key in &task.subtask_keys {
                self.paths.make_subtask_path(self.fs, key);
                self.write_subtask(group, task, key)
                    .with_context(|| format!("while setting up subtask {key} of task {}", task.name))?;
                row.push(path_str(self.paths.subtask())?);
            }
            table.push(&task.name, row)?;
        }

        let csv = self.fs.group_csv(group_id, &mut self.pathbuf);
        self.ui.status("Writing subtask table to", csv);
        self.fs.write_file(csv, &table.to_csv())?;
        Ok(table)
    }

    /// Create one subtask directory, with its own run.dat and copies of the other inputs.
    fn write_subtask(&mut self, group: Group, task: &Task, key: &SubtaskKey) -> Result<()> {
        let dir = self.paths.subtask();
        self.fs.create_dir(dir)?;
        RunDatBuilder::new(&mut self.strbuf).write_subtask(self.run, group, &task.line, key);
        let run_dat = self.strbuf.as_str();
        let files = self.files.iter().map(|(name, text)| {
            if name == RUN_DAT {
                (name, run_dat)
            } else {
                (name, text)
            }
        });
        self.fs.write_input_files(dir, files)
    }
}
