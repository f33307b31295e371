use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Written to info.yaml by setup, read back by run-adhoc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunManifest {
    pub group_ids: Vec<usize>,
    pub run_path: PathBuf,
    pub save_path: PathBuf,
    pub work_path: PathBuf,
}
