use crate::{Group, SampleParams, DEFAULT_GROUPS};

pub const DEFAULT_OUT_DIR: &str = "subtasks";

const DEFAULT_SAMPLING_TASKS: [&str; 1] = ["conf_samp"];

/// Options for splitting a run into subtasks.
#[derive(Debug, Clone)]
pub struct SetupConfig {
    /// Groups to set up, in order; group ids are positions in this list.
    pub groups: Vec<Group>,
    /// Species tasks with these names get conformer-sampling worker counts.
    pub sampling_tasks: Vec<String>,
    pub sampling: SampleParams,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            groups: DEFAULT_GROUPS.to_vec(),
            sampling_tasks: DEFAULT_SAMPLING_TASKS.iter().map(|s| s.to_string()).collect(),
            sampling: SampleParams::default(),
        }
    }
}

impl SetupConfig {
    pub fn with_groups(groups: Vec<Group>) -> Self {
        Self {
            groups,
            ..Default::default()
        }
    }

    pub fn is_sampling_task(&self, name: &str) -> bool {
        self.sampling_tasks.iter().any(|task| task == name)
    }
}
