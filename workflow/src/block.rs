use std::path::Path;

use anyhow::Result;

use crate::{Error, SubtaskType, TaskType};

/// The top-level blocks of a run.dat file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Block {
    Input,
    Spc,
    Pes,
    Els,
    Thermo,
    Kin,
}

impl Block {
    /// All blocks, in the order they're written to a run.dat.
    pub const ALL: [Block; 6] = [
        Block::Input,
        Block::Spc,
        Block::Pes,
        Block::Els,
        Block::Thermo,
        Block::Kin,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Spc => "spc",
            Self::Pes => "pes",
            Self::Els => "els",
            Self::Thermo => "thermo",
            Self::Kin => "kin",
        }
    }
}

impl std::fmt::Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

const RUN_PREFIX: &str = "run_prefix";
const SAVE_PREFIX: &str = "save_prefix";

/// The six blocks of a run.dat, with comments stripped and each
/// block's content normalized (see [syntax::format_block]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSpec {
    input: String,
    spc: String,
    pes: String,
    els: String,
    thermo: String,
    kin: String,
}

impl RunSpec {
    pub fn parse(run_dat: &str) -> Result<Self> {
        let text = syntax::strip_comments(run_dat)?;
        let get = |block: Block| -> Result<String> {
            Ok(syntax::format_block(syntax::block(&text, block.keyword())?))
        };
        Ok(Self {
            input: get(Block::Input)?,
            spc: get(Block::Spc)?,
            pes: get(Block::Pes)?,
            els: get(Block::Els)?,
            thermo: get(Block::Thermo)?,
            kin: get(Block::Kin)?,
        })
    }

    pub fn get(&self, block: Block) -> &str {
        match block {
            Block::Input => &self.input,
            Block::Spc => &self.spc,
            Block::Pes => &self.pes,
            Block::Els => &self.els,
            Block::Thermo => &self.thermo,
            Block::Kin => &self.kin,
        }
    }

    pub fn set(&mut self, block: Block, content: &str) {
        let formatted = syntax::format_block(content);
        match block {
            Block::Input => self.input = formatted,
            Block::Spc => self.spc = formatted,
            Block::Pes => self.pes = formatted,
            Block::Els => self.els = formatted,
            Block::Thermo => self.thermo = formatted,
            Block::Kin => self.kin = formatted,
        }
    }

    /// Root of the save filesystem, as assigned in the input block.
    pub fn save_prefix(&self) -> Result<&str> {
        self.input_field(SAVE_PREFIX)
    }

    /// Root of the run filesystem, as assigned in the input block.
    pub fn run_prefix(&self) -> Result<&str> {
        self.input_field(RUN_PREFIX)
    }

    /// Replace the input block with just the run and save prefix assignments.
    pub fn set_filesystem_prefixes(&mut self, save: &Path, run: &Path) {
        let input = format!(
            "{RUN_PREFIX} = {}\n{SAVE_PREFIX} = {}",
            run.display(),
            save.display()
        );
        self.set(Block::Input, &input);
    }

    fn input_field(&self, name: &str) -> Result<&str> {
        syntax::parse_fields(&self.input)?
            .into_iter()
            .find(|(key, _)| *key == name)
            .map(|(_, val)| val)
            .ok_or_else(|| Error::MissingInputField(name.to_owned()).into())
    }

    /// Non-empty lines of a task block.
    /// Electronic structure lines are narrowed to the ones for species (`spc`)
    /// or transition states (`ts`), depending on the subtask type.
    pub fn task_lines(&self, task_type: TaskType, subtask_type: Option<SubtaskType>) -> Vec<&str> {
        let lines = self
            .get(task_type.block())
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty());
        match (task_type, subtask_type) {
            (TaskType::Els, Some(subtask_type)) => lines
                .filter(|line| line.split_whitespace().next() == Some(subtask_type.els_tag()))
                .collect(),
            _ => lines.collect(),
        }
    }
}
