use std::str::FromStr;

use crate::{Block, Error, GROUP_DELIM};

/// The run.dat block a group's task lines come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskType {
    Els,
    Thermo,
    Kin,
}

impl TaskType {
    pub fn block(self) -> Block {
        match self {
            Self::Els => Block::Els,
            Self::Thermo => Block::Thermo,
            Self::Kin => Block::Kin,
        }
    }
}

/// The run.dat block a group's subtasks are split along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubtaskType {
    Spc,
    Pes,
}

impl SubtaskType {
    pub fn block(self) -> Block {
        match self {
            Self::Spc => Block::Spc,
            Self::Pes => Block::Pes,
        }
    }

    /// Leading word of the els lines that belong to this subtask type.
    pub fn els_tag(self) -> &'static str {
        match self {
            Self::Spc => "spc",
            Self::Pes => "ts",
        }
    }
}

/// A set of tasks of one type, split into subtasks of one type.
/// A group without a subtask type runs each task once over everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Group {
    pub task_type: TaskType,
    pub subtask_type: Option<SubtaskType>,
}

pub const DEFAULT_GROUPS: [Group; 4] = [
    Group::new(TaskType::Els, Some(SubtaskType::Spc)),
    Group::new(TaskType::Els, Some(SubtaskType::Pes)),
    Group::new(TaskType::Thermo, Some(SubtaskType::Spc)),
    Group::new(TaskType::Kin, None),
];

impl Group {
    pub const fn new(task_type: TaskType, subtask_type: Option<SubtaskType>) -> Self {
        Self {
            task_type,
            subtask_type,
        }
    }

    /// The block a subtask's run.dat narrows down to its key.
    pub fn key_block(&self) -> Option<Block> {
        self.subtask_type.map(SubtaskType::block)
    }
}

impl FromStr for Group {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidGroup(s.to_owned());
        let (task, subtask) = match s.split_once(GROUP_DELIM) {
            Some((task, subtask)) => (task, Some(subtask)),
            None => (s, None),
        };
        let task_type = match task {
            "els" => TaskType::Els,
            "thermo" => TaskType::Thermo,
            "kin" => TaskType::Kin,
            _ => return Err(invalid()),
        };
        let subtask_type = match subtask {
            None => None,
            Some("spc") => Some(SubtaskType::Spc),
            Some("pes") => Some(SubtaskType::Pes),
            Some(_) => return Err(invalid()),
        };
        // els lines are split between species and transition states,
        // so we need to know which half to take:
        if task_type == TaskType::Els && subtask_type.is_none() {
            return Err(invalid());
        }
        Ok(Self::new(task_type, subtask_type))
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.task_type.block().keyword())?;
        if let Some(subtask_type) = self.subtask_type {
            write!(f, "{GROUP_DELIM}{}", subtask_type.block().keyword())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use anyhow::Result;

    use super::*;

    #[test]
    fn test_parse_group() -> Result<()> {
        assert_eq!(
            Group::new(TaskType::Els, Some(SubtaskType::Pes)),
            "els.pes".parse::<Group>()?
        );
        assert_eq!(Group::new(TaskType::Kin, None), "kin".parse::<Group>()?);
        assert!("els".parse::<Group>().is_err());
        assert!("kin.ts".parse::<Group>().is_err());
        assert!("trans.spc".parse::<Group>().is_err());
        Ok(())
    }

    #[test]
    fn test_display_roundtrip() -> Result<()> {
        for group in DEFAULT_GROUPS {
            assert_eq!(group, group.to_string().parse::<Group>()?);
        }
        assert_eq!("thermo.spc", DEFAULT_GROUPS[2].to_string());
        Ok(())
    }
}
