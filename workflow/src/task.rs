use serde::{Deserialize, Serialize};

use crate::{Error, SubtaskKey};

/// One line of a task block, resolved against the theory levels and species.
/// A task runs once per subtask key, with the matching number of workers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub line: String,
    pub mem: Option<usize>,
    pub nprocs: Option<usize>,
    pub subtask_keys: Vec<SubtaskKey>,
    pub subtask_nworkers: Vec<usize>,
}

impl Task {
    /// Fail unless there is exactly one worker count per subtask key.
    pub fn check_shape(&self) -> Result<(), Error> {
        if self.subtask_keys.len() == self.subtask_nworkers.len() {
            Ok(())
        } else {
            Err(Error::WorkerCountMismatch(
                self.name.clone(),
                self.subtask_keys.len(),
                self.subtask_nworkers.len(),
            ))
        }
    }

    pub fn subtasks(&self) -> impl Iterator<Item = (&SubtaskKey, usize)> {
        self.subtask_keys
            .iter()
            .zip(self.subtask_nworkers.iter().copied())
    }
}

/// Get the task name from a task line: the first word,
/// or the second if the first is a `spc` or `ts` tag.
pub fn parse_task_name(line: &str) -> Result<&str, Error> {
    let mut words = line.split_whitespace();
    let name = match words.next() {
        Some("spc" | "ts") => words.next(),
        other => other,
    };
    name.ok_or_else(|| Error::MissingTaskName(line.to_owned()))
}

#[cfg(test)]
mod test {
    use anyhow::Result;

    use super::{parse_task_name, Task};
    use crate::SubtaskKey;

    #[test]
    fn test_task_name() -> Result<()> {
        assert_eq!("conf_samp", parse_task_name("spc conf_samp runlvl=lvl_wbs")?);
        assert_eq!("find_ts", parse_task_name("  ts   find_ts")?);
        assert_eq!("run_mess", parse_task_name("run_mess")?);
        assert!(parse_task_name("spc").is_err());
        Ok(())
    }

    #[test]
    fn test_yaml_with_nulls() -> Result<()> {
        let task = Task {
            name: "run_mess".to_owned(),
            line: "run_mess".to_owned(),
            mem: None,
            nprocs: None,
            subtask_keys: vec![SubtaskKey::All],
            subtask_nworkers: vec![1],
        };
        let yaml = serde_yaml::to_string(&vec![task.clone()])?;
        assert!(yaml.contains("mem: null"));
        assert_eq!(vec![task], serde_yaml::from_str::<Vec<Task>>(&yaml)?);
        Ok(())
    }

    #[test]
    fn test_shape() {
        let task = Task {
            name: "init_geom".to_owned(),
            line: "spc init_geom".to_owned(),
            mem: Some(4),
            nprocs: Some(8),
            subtask_keys: vec![SubtaskKey::Species(1), SubtaskKey::Species(2)],
            subtask_nworkers: vec![1],
        };
        assert!(matches!(
            task.check_shape(),
            Err(crate::Error::WorkerCountMismatch(_, 2, 1))
        ));
    }
}
