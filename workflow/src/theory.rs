use anyhow::Result;
use util::HashMap;

use crate::{parse_count, Error};

const LEVEL: &str = "level";

/// Named theory levels from theory.dat, each a set of `key = value` fields:
///
/// ```text
/// level lvl_wbs
///     mem = 4
///     nprocs = 8
/// end level
/// ```
#[derive(Debug, Default)]
pub struct TheoryTable {
    levels: HashMap<String, HashMap<String, String>>,
}

impl TheoryTable {
    pub fn parse(theory_dat: &str) -> Result<Self> {
        let text = syntax::strip_comments(theory_dat)?;
        let mut levels = HashMap::default();
        for block in syntax::named_blocks(&text, LEVEL)? {
            let fields = syntax::parse_fields(block.content)?
                .into_iter()
                .map(|(key, val)| (key.to_owned(), val.to_owned()))
                .collect();
            levels.insert(block.name.to_owned(), fields);
        }
        log::debug!("Read {} theory levels", levels.len());
        Ok(Self { levels })
    }

    pub fn field(&self, level: &str, field: &str) -> Result<&str, Error> {
        self.levels
            .get(level)
            .ok_or_else(|| Error::LevelNotFound(level.to_owned()))?
            .get(field)
            .map(String::as_str)
            .ok_or_else(|| Error::LevelFieldNotFound(level.to_owned(), field.to_owned()))
    }

    /// Get a numeric field of a level, e.g. its `mem` or `nprocs`.
    pub fn count(&self, level: &str, field: &str) -> Result<usize, Error> {
        parse_count(field, self.field(level, field)?)
    }
}

#[cfg(test)]
mod test {
    use anyhow::Result;

    use super::TheoryTable;
    use crate::Error;

    const THEORY_DAT: &str = "
level lvl_wbs  # b2plypd3
    mem = 4.0
    nprocs = 8
    method = b2plypd3
end level

level lvl_cheap
    mem=1
end level
";

    #[test]
    fn test_lookup() -> Result<()> {
        let theory = TheoryTable::parse(THEORY_DAT)?;
        assert_eq!(4, theory.count("lvl_wbs", "mem")?);
        assert_eq!(8, theory.count("lvl_wbs", "nprocs")?);
        assert_eq!("b2plypd3", theory.field("lvl_wbs", "method")?);
        assert_eq!(1, theory.count("lvl_cheap", "mem")?);
        assert!(matches!(
            theory.count("lvl_cheap", "nprocs"),
            Err(Error::LevelFieldNotFound(..))
        ));
        assert!(matches!(
            theory.count("lvl_hf", "mem"),
            Err(Error::LevelNotFound(level)) if level == "lvl_hf"
        ));
        Ok(())
    }
}
