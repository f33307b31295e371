use std::path::Path;

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};

use super::Fs;

impl Fs {
    pub fn write_yaml<T, U>(&self, path: T, val: &U) -> Result<()>
    where
        T: AsRef<Path>,
        U: Serialize + ?Sized,
    {
        let path = path.as_ref();
        let text = serde_yaml::to_string(val)
            .with_context(|| format!("while serializing {path:?}"))?;
        self.write_file(path, &text)
    }

    pub fn read_yaml<T, U>(&self, path: T, strbuf: &mut String) -> Result<U>
    where
        T: AsRef<Path>,
        U: DeserializeOwned,
    {
        let path = path.as_ref();
        self.read_to_buf(path, strbuf)
            .with_context(|| format!("while reading {path:?}"))?;
        serde_yaml::from_str(strbuf).with_context(|| format!("while parsing {path:?}"))
    }
}
