use std::path::{Path, PathBuf};

use workflow::SubtaskKey;

use super::Fs;

const INFO_YAML: &str = "info.yaml";
const INP_DIR: &str = "inp";

/// Utility fns for making common types of paths.
/// Every path a setup writes is a pure function of its arguments,
/// so a later run can find exactly what was set up.
impl Fs {
    /// $OUTPUT/info.yaml
    pub fn info_yaml<'a>(&self, buf: &'a mut PathBuf) -> &'a Path {
        self.parts2(&self.output_prefix, INFO_YAML, buf)
    }

    /// $OUTPUT/<group_id>.yaml
    pub fn group_yaml<'a>(&self, group_id: usize, buf: &'a mut PathBuf) -> &'a Path {
        self.parts2(&self.output_prefix, format!("{group_id}.yaml"), buf)
    }

    /// $OUTPUT/<group_id>.csv
    pub fn group_csv<'a>(&self, group_id: usize, buf: &'a mut PathBuf) -> &'a Path {
        self.parts2(&self.output_prefix, format!("{group_id}.csv"), buf)
    }

    /// $OUTPUT/<group_id>_<task_idx>_<task_name>
    pub fn task_dir<'a>(
        &self,
        group_id: usize,
        task_idx: usize,
        task_name: &str,
        buf: &'a mut PathBuf,
    ) -> &'a Path {
        self.parts2(
            &self.output_prefix,
            format!("{group_id}_{task_idx:02}_{task_name}"),
            buf,
        )
    }

    /// $OUTPUT/<task_dir>/<key>, e.g. .../01 or .../02_03
    pub fn subtask_dir<'a>(&self, task_dir: &Path, key: &SubtaskKey, buf: &'a mut PathBuf) -> &'a Path {
        self.parts2(task_dir, key.to_string(), buf)
    }

    /// <job_dir>/inp
    pub fn inp_dir<'a>(&self, job_dir: &Path, buf: &'a mut PathBuf) -> &'a Path {
        self.parts2(job_dir, INP_DIR, buf)
    }

    /// <job_dir>/inp/<name>
    pub fn input_file<'a>(&self, job_dir: &Path, name: &str, buf: &'a mut PathBuf) -> &'a Path {
        self.parts3(job_dir, INP_DIR, name, buf)
    }

    fn parts2<'a, T, U>(&self, p1: T, p2: U, buf: &'a mut PathBuf) -> &'a Path
    where
        T: AsRef<Path>,
        U: AsRef<Path>,
    {
        buf.clear();
        buf.push(p1);
        buf.push(p2);
        &*buf
    }

    fn parts3<'a, T, U, V>(&self, p1: T, p2: U, p3: V, buf: &'a mut PathBuf) -> &'a Path
    where
        T: AsRef<Path>,
        U: AsRef<Path>,
        V: AsRef<Path>,
    {
        buf.clear();
        buf.push(p1);
        buf.push(p2);
        buf.push(p3);
        &*buf
    }
}
