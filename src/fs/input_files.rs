use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::{path_str, Error, Fs};

pub const RUN_DAT: &str = "run.dat";
pub const THEORY_DAT: &str = "theory.dat";
pub const MODELS_DAT: &str = "models.dat";
pub const MECHANISM_DAT: &str = "mechanism.dat";
pub const SPECIES_CSV: &str = "species.csv";

const INPUT_FILES: [&str; 5] = [RUN_DAT, THEORY_DAT, MODELS_DAT, MECHANISM_DAT, SPECIES_CSV];

/// Contents of the files in a job's `inp/` directory, in a fixed order.
#[derive(Debug)]
pub struct InputFiles {
    contents: Vec<String>,
}

impl InputFiles {
    pub fn get(&self, name: &str) -> Option<&str> {
        INPUT_FILES
            .iter()
            .position(|file| *file == name)
            .map(|i| self.contents[i].as_str())
    }

    /// (file name, contents) pairs, in a fixed order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        INPUT_FILES
            .iter()
            .copied()
            .zip(self.contents.iter().map(String::as_str))
    }
}

impl Fs {
    /// Read all five input files from `<job_dir>/inp/`.
    pub fn read_input_files(&self, job_dir: &Path) -> Result<InputFiles> {
        let mut buf = PathBuf::with_capacity(256);
        let mut contents = Vec::with_capacity(INPUT_FILES.len());
        for name in INPUT_FILES {
            let path = self.input_file(job_dir, name, &mut buf);
            if !path.is_file() {
                return Err(Error::MissingInputFile(path_str(path)?).into());
            }
            let mut text = String::new();
            self.read_to_buf(path, &mut text)
                .with_context(|| format!("while reading input file {path:?}"))?;
            contents.push(text);
        }
        Ok(InputFiles { contents })
    }

    /// Write a set of input files to `<dir>/inp/`, creating it if needed.
    pub fn write_input_files<'a, T>(&self, dir: &Path, files: T) -> Result<()>
    where
        T: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut path = PathBuf::with_capacity(256);
        self.create_dir(self.inp_dir(dir, &mut path))?;
        for (name, text) in files {
            self.write_file(self.input_file(dir, name, &mut path), text)?;
        }
        Ok(())
    }
}
