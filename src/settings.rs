use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use workflow::{Group, SetupConfig};

use crate::args::{Args, Command, RunAdhocArgs, SetupArgs};

/// Settings are like Args, except all the logic has
/// been applied so e.g. defaults are added in and paths are absolute.
#[derive(Debug)]
pub struct Settings {
    pub verbose: u8,
    /// Directory the command was run from
    pub work_dir: PathBuf,
    pub action: Action,
}

#[derive(Debug)]
pub enum Action {
    Setup(SetupSettings),
    RunAdhoc(RunAdhocSettings),
}

#[derive(Debug, Clone)]
pub struct SetupSettings {
    pub job_dir: PathBuf,
    pub output: PathBuf,
    pub save_path: Option<PathBuf>,
    pub run_path: Option<PathBuf>,
    pub config: SetupConfig,
}

#[derive(Debug, Clone)]
pub struct RunAdhocSettings {
    pub output: PathBuf,
    pub nodes: Option<String>,
    pub activation_hook: Option<String>,
    pub script: PathBuf,
}

/// Make `path` absolute by joining it onto `work_dir` if it's relative.
pub fn resolve_path<T: AsRef<Path>>(work_dir: &Path, path: T) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        work_dir.join(path)
    }
}

impl TryFrom<Args> for Settings {
    type Error = anyhow::Error;
    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let work_dir = std::env::current_dir().context("while getting working directory")?;
        let action = match args.command {
            Command::Setup(setup) => Action::Setup(setup_settings(setup, &work_dir)?),
            Command::RunAdhoc(run) => Action::RunAdhoc(run_adhoc_settings(run, &work_dir)),
        };
        Ok(Self {
            verbose: args.verbose,
            work_dir,
            action,
        })
    }
}

fn setup_settings(args: SetupArgs, work_dir: &Path) -> Result<SetupSettings> {
    let config = if args.groups.is_empty() {
        SetupConfig::default()
    } else {
        let groups = args
            .groups
            .iter()
            .map(|group| group.parse::<Group>())
            .collect::<Result<Vec<_>, _>>()?;
        SetupConfig::with_groups(groups)
    };
    Ok(SetupSettings {
        job_dir: resolve_path(work_dir, &args.path),
        output: resolve_path(work_dir, &args.output),
        save_path: args.save_path.map(|p| resolve_path(work_dir, p)),
        run_path: args.run_path.map(|p| resolve_path(work_dir, p)),
        config,
    })
}

fn run_adhoc_settings(args: RunAdhocArgs, work_dir: &Path) -> RunAdhocSettings {
    // a bare script name is left alone so it can be found on $PATH:
    let script = if args.script.contains(std::path::MAIN_SEPARATOR) {
        resolve_path(work_dir, &args.script)
    } else {
        PathBuf::from(&args.script)
    };
    RunAdhocSettings {
        output: resolve_path(work_dir, &args.path),
        nodes: args.nodes,
        activation_hook: args.activation_hook,
        script,
    }
}
