use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;

use workflow::{RunManifest, SubtaskTable, Task};

use crate::fs::Fs;
use crate::ui::Ui;

use super::{Dispatch, DispatchCall, Error};

// only the first group is dispatched for now; later groups depend on its results.
const GROUPS_TO_RUN: usize = 1;

/// `AdhocRunner` reads back the layout written by setup and dispatches its tasks.
///
/// Each row of a group's subtask table becomes one dispatch call, in row order.
/// Before anything is dispatched, every row is checked against the group's task list,
/// so a table and task list from different setups are never mixed.
pub struct AdhocRunner<D> {
    /// Filesystem interface
    fs: Fs,
    /// User interface
    ui: Ui,
    /// runs each task
    dispatcher: D,
    /// comma-separated list of nodes, passed through to the dispatcher
    nodes: Option<String>,
    /// shell commands for the remote environment, passed through to the dispatcher
    activation_hook: Option<String>,
    pathbuf: PathBuf,
    strbuf: String,
}

impl<D: Dispatch> AdhocRunner<D> {
    pub fn new(
        fs: Fs,
        ui: Ui,
        dispatcher: D,
        nodes: Option<String>,
        activation_hook: Option<String>,
    ) -> Self {
        Self {
            fs,
            ui,
            dispatcher,
            nodes,
            activation_hook,
            pathbuf: PathBuf::with_capacity(256),
            strbuf: String::with_capacity(4096),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        self.fs.ensure_setup_exists()?;
        let manifest: RunManifest = self
            .fs
            .read_yaml(self.fs.info_yaml(&mut self.pathbuf), &mut self.strbuf)
            .context("while reading setup info")?;
        log::debug!("Loaded setup info: {manifest:?}");

        for root in [&manifest.run_path, &manifest.save_path] {
            self.fs.allow_prefix(root);
            self.fs.create_dir(root)?;
        }

        for &group_id in manifest.group_ids.iter().take(GROUPS_TO_RUN) {
            self.run_group(group_id, &manifest)
                .with_context(|| format!("while running group {group_id}"))?;
        }
        eprintln!("{}\n", "Completed dispatch.".green());
        Ok(())
    }

    fn run_group(&mut self, group_id: usize, manifest: &RunManifest) -> Result<()> {
        let tasks: Vec<Task> = self
            .fs
            .read_yaml(self.fs.group_yaml(group_id, &mut self.pathbuf), &mut self.strbuf)?;

        let csv = self.fs.group_csv(group_id, &mut self.pathbuf);
        self.fs
            .read_to_buf(csv, &mut self.strbuf)
            .with_context(|| format!("while reading {csv:?}"))?;
        let table = SubtaskTable::from_csv(&self.strbuf)
            .with_context(|| format!("while parsing {csv:?}"))?;

        let calls = self.make_calls(group_id, manifest, &tasks, &table)?;
        for (task, call) in tasks.iter().zip(&calls) {
            self.ui.start_timer();
            eprintln!("{} {}\n{}\n", "RUN".green(), task.name, task.line);
            self.dispatcher
                .dispatch(call)
                .with_context(|| format!("while dispatching task \"{}\"", task.name))?;
            self.ui.print_elapsed("Task dispatch");
        }
        Ok(())
    }

    /// One call per task, with each subtask path repeated once per worker.
    fn make_calls(
        &self,
        group_id: usize,
        manifest: &RunManifest,
        tasks: &[Task],
        table: &SubtaskTable,
    ) -> Result<Vec<DispatchCall>> {
        if table.rows().len() != tasks.len() {
            return Err(Error::RowCountMismatch(group_id, table.rows().len(), tasks.len()).into());
        }

        let mut calls = Vec::with_capacity(tasks.len());
        for (idx, (row, task)) in table.rows().iter().zip(tasks).enumerate() {
            if row.task != task.name {
                return Err(Error::TaskMismatch(idx, row.task.clone(), task.name.clone()).into());
            }
            task.check_shape()?;

            let nreplicas: usize = task.subtask_nworkers.iter().sum();
            let mut paths = Vec::with_capacity(nreplicas);
            let mut logs = Vec::with_capacity(nreplicas);
            for (key, nworkers) in task.subtasks() {
                let path = table
                    .path(idx, key)
                    .ok_or_else(|| Error::ColumnNotFound(key.to_string()))?;
                paths.extend(std::iter::repeat(path.to_owned()).take(nworkers));
                logs.extend((0..nworkers).map(|i| format!("out{i}.log")));
            }

            calls.push(DispatchCall {
                work_path: manifest.work_path.clone(),
                mem: task.mem,
                nprocs: task.nprocs,
                paths,
                logs,
                nodes: self.nodes.clone(),
                activation_hook: self.activation_hook.clone(),
            });
        }
        Ok(calls)
    }
}

#[cfg(test)]
mod test {
    use std::path::{Path, PathBuf};

    use anyhow::Result;

    use workflow::{RunManifest, SubtaskKey, SubtaskTable, Task};

    use super::AdhocRunner;
    use crate::exec::{Dispatch, DispatchCall, Error};
    use crate::fs::Fs;
    use crate::ui::Ui;

    struct Unused;

    impl Dispatch for Unused {
        fn dispatch(&mut self, _call: &DispatchCall) -> Result<()> {
            unreachable!("calls are only built in these tests")
        }
    }

    fn manifest() -> RunManifest {
        RunManifest {
            group_ids: vec![0],
            run_path: PathBuf::from("/run"),
            save_path: PathBuf::from("/save"),
            work_path: PathBuf::from("/job"),
        }
    }

    fn task(name: &str, keys: &[SubtaskKey], nworkers: Vec<usize>) -> Task {
        Task {
            name: name.to_owned(),
            line: format!("spc {name}"),
            mem: Some(4),
            nprocs: Some(8),
            subtask_keys: keys.to_vec(),
            subtask_nworkers: nworkers,
        }
    }

    fn runner() -> AdhocRunner<Unused> {
        AdhocRunner::new(
            Fs::new(Path::new("/out")),
            Ui::new(0),
            Unused,
            Some("n1,n2".to_owned()),
            None,
        )
    }

    #[test]
    fn test_replicated_paths() -> Result<()> {
        let keys = [SubtaskKey::Species(1), SubtaskKey::Species(2)];
        let tasks = vec![
            task("init_geom", &keys, vec![1, 1]),
            task("conf_samp", &keys, vec![1, 3]),
        ];
        let mut table = SubtaskTable::new(&keys);
        table.push("init_geom", vec!["/out/0_00/01".to_owned(), "/out/0_00/02".to_owned()])?;
        table.push("conf_samp", vec!["/out/0_01/01".to_owned(), "/out/0_01/02".to_owned()])?;

        let calls = runner().make_calls(0, &manifest(), &tasks, &table)?;
        assert_eq!(2, calls.len());
        assert_eq!(vec!["/out/0_00/01", "/out/0_00/02"], calls[0].paths);
        assert_eq!(
            vec!["/out/0_01/01", "/out/0_01/02", "/out/0_01/02", "/out/0_01/02"],
            calls[1].paths
        );
        assert_eq!(
            vec!["out0.log", "out0.log", "out1.log", "out2.log"],
            calls[1].logs
        );
        assert_eq!(Some("n1,n2"), calls[1].nodes.as_deref());
        assert_eq!(Path::new("/job"), calls[1].work_path);
        Ok(())
    }

    #[test]
    fn test_mismatched_task() -> Result<()> {
        let keys = [SubtaskKey::All];
        let tasks = vec![task("run_mess", &keys, vec![1])];
        let mut table = SubtaskTable::new(&keys);
        table.push("write_mess", vec!["/out/3_00_write_mess/all".to_owned()])?;

        let err = runner()
            .make_calls(3, &manifest(), &tasks, &table)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::TaskMismatch(0, found, expected)) if found == "write_mess" && expected == "run_mess"
        ));
        Ok(())
    }

    #[test]
    fn test_row_count() -> Result<()> {
        let keys = [SubtaskKey::All];
        let tasks = vec![task("run_mess", &keys, vec![1])];
        let table = SubtaskTable::new(&keys);
        assert!(runner().make_calls(3, &manifest(), &tasks, &table).is_err());
        Ok(())
    }
}
