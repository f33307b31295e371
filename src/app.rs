use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;

use workflow::{
    Group, RunManifest, RunSpec, SpeciesTable, SubtaskKey, Task, TaskResolver, TheoryTable,
};

use crate::exec::{AdhocRunner, Dispatch, ScriptDispatcher};
use crate::fs::{Fs, InputFiles, RUN_DAT, SPECIES_CSV, THEORY_DAT};
use crate::prep::GroupBuilder;
use crate::settings::{resolve_path, Action, RunAdhocSettings, Settings, SetupSettings};
use crate::ui::Ui;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("A dispatcher can only be supplied for the run-adhoc command")]
    NotRunAdhoc,
    #[error("Input file \"{0}\" was not loaded")]
    InputNotLoaded(&'static str),
}

/// This struct actually runs the command-line app.
pub struct App {
    /// Interpreted command line settings
    settings: Settings,
    /// User interface
    ui: Ui,
}

impl App {
    /// Create a new `App`.
    pub fn new(settings: Settings) -> Self {
        let ui = Ui::new(settings.verbose);
        Self { settings, ui }
    }

    /// Run the app, using settings to determine which command to run.
    pub fn run(mut self) -> Result<()> {
        match &self.settings.action {
            Action::Setup(setup) => {
                let setup = setup.clone();
                self.setup(&setup)
            }
            Action::RunAdhoc(run) => {
                let dispatcher = ScriptDispatcher::new(&run.script, self.ui.verbose);
                self.run_adhoc_with(dispatcher)
            }
        }
    }

    /// Run the `run-adhoc` command, handing each task to `dispatcher`.
    pub fn run_adhoc_with<D: Dispatch>(self, dispatcher: D) -> Result<()> {
        let Action::RunAdhoc(run) = self.settings.action else {
            return Err(Error::NotRunAdhoc.into());
        };
        let RunAdhocSettings {
            output,
            nodes,
            activation_hook,
            ..
        } = run;
        if self.ui.verbose {
            eprintln!("Using output directory {:?}", output);
        }
        let mut runner = AdhocRunner::new(Fs::new(&output), self.ui, dispatcher, nodes, activation_hook);
        runner.run()
    }
}

// SETUP //////////////////
impl App {
    fn setup(&mut self, setup: &SetupSettings) -> Result<()> {
        let mut fs = Fs::new(&setup.output);

        self.ui.verbose_progress_debug("Reading input files from", &setup.job_dir);
        let files = fs
            .read_input_files(&setup.job_dir)
            .with_context(|| format!("while reading inputs of job {:?}", setup.job_dir))?;
        self.ui.done();

        self.ui.verbose_progress("Parsing input files");
        self.ui.start_timer();
        let mut run = RunSpec::parse(input(&files, RUN_DAT)?).context("while parsing run.dat")?;
        let theory =
            TheoryTable::parse(input(&files, THEORY_DAT)?).context("while parsing theory.dat")?;
        let species =
            SpeciesTable::parse(input(&files, SPECIES_CSV)?).context("while parsing species.csv")?;
        self.ui.done();
        self.ui.print_elapsed("Parsing input files");
        log::debug!("Loaded {} species", species.len());

        let (save_path, run_path) = self.filesystem_roots(&run, setup)?;
        log::info!("Save filesystem: {save_path:?}; run filesystem: {run_path:?}");
        run.set_filesystem_prefixes(&save_path, &run_path);

        // resolve every group up front, so a bad task line leaves nothing half-written:
        self.ui.verbose_progress("Resolving tasks");
        self.ui.start_timer();
        let groups = resolve_groups(&run, &theory, &species, setup)?;
        self.ui.done();
        self.ui.print_elapsed("Resolving tasks");

        fs.ensure_output_dir_exists(self.ui.verbose)?;

        let mut builder = GroupBuilder::new(&fs, &self.ui, &run, &files);
        for (group_id, (group, keys, tasks)) in groups.iter().enumerate() {
            builder
                .build(group_id, *group, keys, tasks)
                .with_context(|| format!("while setting up group \"{group}\""))?;
            eprintln!();
        }

        let manifest = RunManifest {
            group_ids: (0..groups.len()).collect(),
            run_path,
            save_path,
            work_path: self.settings.work_dir.clone(),
        };
        let mut pathbuf = PathBuf::new();
        let info = fs.info_yaml(&mut pathbuf);
        self.ui.status("Writing setup info to", info);
        fs.write_yaml(info, &manifest)?;

        eprintln!("{}\n", "Setup complete.".green());
        Ok(())
    }

    /// Command-line overrides win; otherwise the prefixes in run.dat
    /// are used, relative to the directory the command was run from.
    fn filesystem_roots(&self, run: &RunSpec, setup: &SetupSettings) -> Result<(PathBuf, PathBuf)> {
        let work_dir: &Path = &self.settings.work_dir;
        let save = match &setup.save_path {
            Some(path) => path.clone(),
            None => resolve_path(work_dir, run.save_prefix()?),
        };
        let run = match &setup.run_path {
            Some(path) => path.clone(),
            None => resolve_path(work_dir, run.run_prefix()?),
        };
        Ok((save, run))
    }
}

fn input<'a>(files: &'a InputFiles, name: &'static str) -> Result<&'a str> {
    files.get(name).ok_or_else(|| Error::InputNotLoaded(name).into())
}

fn resolve_groups(
    run: &RunSpec,
    theory: &TheoryTable,
    species: &SpeciesTable,
    setup: &SetupSettings,
) -> Result<Vec<(Group, Vec<SubtaskKey>, Vec<Task>)>> {
    let resolver = TaskResolver::new(run, theory, species, &setup.config);
    let mut groups = Vec::with_capacity(setup.config.groups.len());
    for &group in &setup.config.groups {
        let keys = resolver.subtask_keys(group.subtask_type)?;
        let tasks = resolver
            .resolve(group)
            .with_context(|| format!("while resolving group \"{group}\""))?;
        groups.push((group, keys, tasks));
    }
    Ok(groups)
}
