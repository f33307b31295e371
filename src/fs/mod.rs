use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use util::PathEncodingError;

/// Defines fns for creating common paths in the output directory
mod paths;

/// The fixed set of job input files
mod input_files;
pub use input_files::{InputFiles, RUN_DAT, SPECIES_CSV, THEORY_DAT};

/// Reading and writing YAML records
mod yaml;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Specified output directory \"{0}\" is not a directory")]
    NotDirectory(String),
    #[error("Can't perform IO operation: \"{0}\" is not whitelisted")]
    NotWhitelisted(String),
    #[error("Required input file not found: {0}")]
    MissingInputFile(String),
    #[error("No setup found at {0} (run `mechsplit setup` first)")]
    SetupNotFound(String),
}

/// All file operations in the crate should go through this struct.
///
/// All destructive operations check that the path in question is a child of
/// one of the whitelisted prefixes, otherwise they will not be performed.
/// The output dir is always whitelisted; the run phase adds the run and save roots.
#[derive(Debug)]
pub struct Fs {
    /// The output directory
    output_prefix: PathBuf,
    /// Other directories we are allowed to modify
    extra_prefixes: Vec<PathBuf>,
}

impl Fs {
    /// Create a new `Fs` with the given output directory.
    pub fn new(output_prefix: &Path) -> Self {
        Self {
            output_prefix: output_prefix.to_path_buf(),
            extra_prefixes: Vec::with_capacity(2),
        }
    }

    pub fn output_prefix(&self) -> &Path {
        &self.output_prefix
    }

    /// Allow destructive operations under `prefix`.
    pub fn allow_prefix(&mut self, prefix: &Path) {
        self.extra_prefixes.push(prefix.to_path_buf());
    }

    /// Check whether output dir exists, and create it if not.
    pub fn ensure_output_dir_exists(&mut self, verbose: bool) -> Result<()> {
        if !self.output_prefix.exists() {
            eprintln!(
                "Output directory {:?} doesn't exist. Creating.",
                self.output_prefix
            );
            fs::create_dir_all(&self.output_prefix).context("creating output directory")?;
        } else if !self.output_prefix.is_dir() {
            return Err(Error::NotDirectory(path_str(&self.output_prefix)?).into());
        } else if verbose {
            eprintln!(
                "Output directory {:?} already exists. Not creating.",
                self.output_prefix
            );
        }

        self.output_prefix = self.output_prefix.canonicalize()?;
        Ok(())
    }

    /// Check that the output dir holds a previous setup.
    pub fn ensure_setup_exists(&self) -> Result<()> {
        let mut info = PathBuf::new();
        if self.output_prefix.is_dir() && self.exists(self.info_yaml(&mut info)) {
            Ok(())
        } else {
            Err(Error::SetupNotFound(path_str(&self.output_prefix)?).into())
        }
    }

    /// Check if path exists on disk.
    pub fn exists<T: AsRef<Path>>(&self, path: T) -> bool {
        let path = path.as_ref();
        path.exists() || path.is_symlink()
    }

    /// Create a directory (uses `std::fs::create_dir_all`, so an entire tree of dirs can be created).
    /// Existing directories are left as they are.
    pub fn create_dir<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        let path = path.as_ref();
        self.check_whitelist(path)?;
        fs::create_dir_all(path).with_context(|| format!("creating dir {path:?}"))?;
        Ok(())
    }

    /// Write entire str to a file, replacing any existing contents.
    pub fn write_file<T: AsRef<Path>>(&self, path: T, text: &str) -> Result<()> {
        let path = path.as_ref();
        self.check_whitelist(path)?;
        fs::write(path, text).with_context(|| format!("writing file {path:?}"))?;
        Ok(())
    }

    /// Read entire file into a String.
    pub fn read_to_buf<T: AsRef<Path>>(&self, path: T, strbuf: &mut String) -> Result<()> {
        use std::io::Read;
        let path = path.as_ref();
        strbuf.clear();
        let cap = fs::metadata(path)?.len() as usize;
        if cap > strbuf.len() {
            strbuf.reserve(cap - strbuf.len());
        }
        let mut f = fs::File::open(path)?;
        f.read_to_string(strbuf)?;
        Ok(())
    }

    fn is_whitelisted<T: AsRef<Path>>(&self, path: T) -> bool {
        let path = path.as_ref();
        path.starts_with(&self.output_prefix)
            || self
                .extra_prefixes
                .iter()
                .any(|prefix| path.starts_with(prefix))
    }

    fn check_whitelist(&self, path: &Path) -> Result<()> {
        if !self.is_whitelisted(path) {
            Err(Error::NotWhitelisted(path_str(path)?).into())
        } else {
            Ok(())
        }
    }
}

/// Get a path as a str, failing if it isn't valid UTF-8.
pub fn path_str(path: &Path) -> Result<String, PathEncodingError> {
    path.to_str().map(str::to_owned).ok_or(PathEncodingError)
}

#[cfg(test)]
mod test {
    use anyhow::Result;

    use super::Fs;

    #[test]
    fn test_whitelist() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut fs = Fs::new(&dir.path().join("out"));
        fs.ensure_output_dir_exists(false)?;
        let out = fs.output_prefix().to_path_buf();

        fs.create_dir(out.join("a/b"))?;
        fs.write_file(out.join("a/b/c.txt"), "c")?;
        assert!(fs.write_file(dir.path().join("d.txt"), "d").is_err());

        fs.allow_prefix(dir.path());
        fs.write_file(dir.path().join("d.txt"), "d")?;

        let mut buf = String::new();
        fs.read_to_buf(out.join("a/b/c.txt"), &mut buf)?;
        assert_eq!("c", buf);
        Ok(())
    }

    #[test]
    fn test_setup_not_found() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let fs = Fs::new(dir.path());
        assert!(fs.ensure_setup_exists().is_err());
        Ok(())
    }
}
