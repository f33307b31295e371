use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeTuple, Serializer};

use crate::Error;

const ALL: &str = "all";

/// Identifies one subtask of a task.
///
/// Serialized as `"all"`, a species index, or a `[pes, channel]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SubtaskKey {
    /// The task isn't split; the one subtask covers everything.
    All,
    /// One species, by 1-based index into species.csv.
    Species(usize),
    /// One channel of one potential energy surface.
    PesChannel(usize, usize),
}

impl SubtaskKey {
    /// Content of the spc or pes block that selects just this subtask,
    /// or `None` if the block should be left as-is.
    pub fn block_content(&self) -> Option<String> {
        match self {
            Self::All => None,
            Self::Species(idx) => Some(idx.to_string()),
            Self::PesChannel(pes, channel) => Some(format!("{pes}: {channel}")),
        }
    }
}

/// Directory name and table column for this subtask, e.g. `01` or `02_03`.
impl std::fmt::Display for SubtaskKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Species(idx) => write!(f, "{idx:02}"),
            Self::PesChannel(pes, channel) => write!(f, "{pes:02}_{channel:02}"),
        }
    }
}

impl Serialize for SubtaskKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::All => serializer.serialize_str(ALL),
            Self::Species(idx) => serializer.serialize_u64(*idx as u64),
            Self::PesChannel(pes, channel) => {
                let mut pair = serializer.serialize_tuple(2)?;
                pair.serialize_element(pes)?;
                pair.serialize_element(channel)?;
                pair.end()
            }
        }
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum RawKey {
    Index(usize),
    Pair(usize, usize),
    Name(String),
}

impl<'de> Deserialize<'de> for SubtaskKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawKey::deserialize(deserializer)? {
            RawKey::Index(idx) => Ok(Self::Species(idx)),
            RawKey::Pair(pes, channel) => Ok(Self::PesChannel(pes, channel)),
            RawKey::Name(name) if name == ALL => Ok(Self::All),
            RawKey::Name(name) => Err(de::Error::custom(Error::InvalidSubtaskKey(name))),
        }
    }
}
