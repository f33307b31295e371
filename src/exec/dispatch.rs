use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use colored::Colorize;

/// Everything the external script needs to run one task:
/// each subtask path is repeated once per worker, with a log file name for each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchCall {
    pub work_path: PathBuf,
    pub mem: Option<usize>,
    pub nprocs: Option<usize>,
    pub paths: Vec<String>,
    pub logs: Vec<String>,
    pub nodes: Option<String>,
    pub activation_hook: Option<String>,
}

impl DispatchCall {
    /// Positional args, in the order the script reads them.
    /// Missing values are passed as empty strings.
    pub fn args(&self) -> Vec<String> {
        let opt = |val: Option<usize>| val.map(|v| v.to_string()).unwrap_or_default();
        vec![
            self.work_path.to_string_lossy().into_owned(),
            opt(self.mem),
            opt(self.nprocs),
            self.paths.join(","),
            self.logs.join(","),
            self.nodes.clone().unwrap_or_default(),
            self.activation_hook.clone().unwrap_or_default(),
        ]
    }
}

/// Hands a task off to whatever actually runs it.
pub trait Dispatch {
    fn dispatch(&mut self, call: &DispatchCall) -> Result<()>;
}

impl<T: Dispatch + ?Sized> Dispatch for &mut T {
    fn dispatch(&mut self, call: &DispatchCall) -> Result<()> {
        (**self).dispatch(call)
    }
}

/// Runs an external script once per task.
/// The script owns success and failure; we only report its exit status.
pub struct ScriptDispatcher {
    script: PathBuf,
    verbose: bool,
}

impl ScriptDispatcher {
    pub fn new(script: &Path, verbose: bool) -> Self {
        Self {
            script: script.to_path_buf(),
            verbose,
        }
    }
}

impl Dispatch for ScriptDispatcher {
    fn dispatch(&mut self, call: &DispatchCall) -> Result<()> {
        let mut cmd = Command::new(&self.script);
        cmd.args(call.args());
        if self.verbose {
            eprintln!("{} {:?}", "Running command".magenta(), cmd);
        }
        // wait for the script, so the next task doesn't start before this one ends:
        let status = cmd
            .status()
            .with_context(|| format!("while running dispatch script {:?}", self.script))?;
        if status.success() {
            log::info!("Dispatch script finished with {status}");
        } else {
            log::warn!("Dispatch script finished with {status}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use super::DispatchCall;

    #[test]
    fn test_args() {
        let call = DispatchCall {
            work_path: PathBuf::from("/home/user/job"),
            mem: Some(4),
            nprocs: None,
            paths: vec!["/out/a".to_owned(), "/out/a".to_owned(), "/out/b".to_owned()],
            logs: vec!["out0.log".to_owned(), "out1.log".to_owned(), "out0.log".to_owned()],
            nodes: Some("n1,n2".to_owned()),
            activation_hook: None,
        };
        assert_eq!(
            vec![
                "/home/user/job",
                "4",
                "",
                "/out/a,/out/a,/out/b",
                "out0.log,out1.log,out0.log",
                "n1,n2",
                ""
            ],
            call.args()
        );
    }
}
