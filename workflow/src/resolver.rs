use anyhow::{Context, Result};
use util::HashMap;

use crate::{
    parse_count, parse_task_name, Group, RunSpec, SetupConfig, SpeciesTable, SubtaskKey,
    SubtaskType, Task, TheoryTable,
};

const RUNLVL: &str = "runlvl";
const NPROCS: &str = "nprocs";
const MEM: &str = "mem";
const CNF_RANGE: &str = "cnf_range";
// `cnf_range=n50` caps the sample count at 50.
const CNF_CAP_PREFIX: char = 'n';

/// Turns the task lines of each group into [Task]s.
pub struct TaskResolver<'a> {
    run: &'a RunSpec,
    theory: &'a TheoryTable,
    species: &'a SpeciesTable,
    config: &'a SetupConfig,
}

impl<'a> TaskResolver<'a> {
    pub fn new(
        run: &'a RunSpec,
        theory: &'a TheoryTable,
        species: &'a SpeciesTable,
        config: &'a SetupConfig,
    ) -> Self {
        Self {
            run,
            theory,
            species,
            config,
        }
    }

    /// Resolve every task line of a group, in block order.
    pub fn resolve(&self, group: Group) -> Result<Vec<Task>> {
        let keys = self
            .subtask_keys(group.subtask_type)
            .with_context(|| format!("while listing subtasks for group \"{group}\""))?;
        let lines = self.run.task_lines(group.task_type, group.subtask_type);
        log::debug!(
            "Group \"{group}\": {} tasks, {} subtasks each",
            lines.len(),
            keys.len()
        );

        let mut tasks = Vec::with_capacity(lines.len());
        for line in lines {
            let task = self
                .resolve_task(line, &keys)
                .with_context(|| format!("while resolving task line '{line}'"))?;
            task.check_shape()?;
            tasks.push(task);
        }
        Ok(tasks)
    }

    /// List the subtask keys for a subtask type, in block order.
    pub fn subtask_keys(&self, subtask_type: Option<SubtaskType>) -> Result<Vec<SubtaskKey>> {
        let Some(subtask_type) = subtask_type else {
            return Ok(vec![SubtaskKey::All]);
        };
        let content = self.run.get(subtask_type.block());
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(match subtask_type {
            SubtaskType::Spc => syntax::parse_index_series(content)?
                .into_iter()
                .map(SubtaskKey::Species)
                .collect(),
            // the same channel may be listed on more than one line:
            SubtaskType::Pes => util::unique_everseen(
                syntax::parse_pes_entries(content)?
                    .into_iter()
                    .flat_map(|entry| {
                        let pes = entry.pes;
                        entry
                            .channels
                            .into_iter()
                            .map(move |channel| SubtaskKey::PesChannel(pes, channel))
                    }),
            ),
        })
    }

    fn resolve_task(&self, line: &str, keys: &[SubtaskKey]) -> Result<Task> {
        let name = parse_task_name(line)?;
        // later assignments of the same key win:
        let fields: HashMap<&str, &str> = syntax::parse_fields(line)?.into_iter().collect();

        let runlvl = fields.get(RUNLVL).copied();
        let mem = runlvl.map(|lvl| self.theory.count(lvl, MEM)).transpose()?;
        // the theory level's nprocs takes precedence over an nprocs on the line:
        let nprocs = match (runlvl, fields.get(NPROCS)) {
            (Some(lvl), _) => Some(self.theory.count(lvl, NPROCS)?),
            (None, Some(nprocs)) => Some(parse_count(NPROCS, nprocs)?),
            (None, None) => None,
        };

        let subtask_nworkers = self.worker_counts(line, name, &fields, keys)?;
        Ok(Task {
            name: name.to_owned(),
            line: line.to_owned(),
            mem,
            nprocs,
            subtask_keys: keys.to_vec(),
            subtask_nworkers,
        })
    }

    /// One worker per subtask, except for conformer sampling over species,
    /// which gets workers according to each species' torsion count.
    fn worker_counts(
        &self,
        line: &str,
        name: &str,
        fields: &HashMap<&str, &str>,
        keys: &[SubtaskKey],
    ) -> Result<Vec<usize>> {
        let cap = fields
            .get(CNF_RANGE)
            .and_then(|range| range.strip_prefix(CNF_CAP_PREFIX));
        let is_species_line =
            line.split_whitespace().next() == Some(SubtaskType::Spc.els_tag());
        if !is_species_line || !(self.config.is_sampling_task(name) || cap.is_some()) {
            return Ok(vec![1; keys.len()]);
        }

        let params = match cap {
            Some(cap) => self.config.sampling.with_cap(parse_count(CNF_RANGE, cap)?),
            None => self.config.sampling,
        };
        keys.iter()
            .map(|key| match key {
                SubtaskKey::Species(idx) => {
                    let chi = self.species.chi(*idx)?;
                    let nsamp = params
                        .sample_count_from_chi(chi)
                        .with_context(|| format!("while counting torsions of species {idx}"))?;
                    log::trace!("species {idx}: {nsamp} conformer samples");
                    Ok(chem::worker_count(nsamp))
                }
                _ => Ok(1),
            })
            .collect()
    }
}
