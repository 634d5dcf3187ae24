use serde::{Deserialize, Serialize};

/// A single next-key option reachable from the typed sequence.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct MappingEntry {
    pub key: String,
    pub description: String,
    /// Pressing this key leads to further nested mappings rather than a command.
    #[serde(default, rename = "prefix")]
    pub is_prefix: bool,
}

impl MappingEntry {
    pub fn new(key: impl Into<String>, description: impl Into<String>, is_prefix: bool) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            is_prefix,
        }
    }

    pub fn command(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(key, description, false)
    }

    pub fn prefix(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(key, description, true)
    }
}

/// A mapping paired with the label it is displayed under.
///
/// The label usually equals `entry.key`, but callers may present the key in a
/// different notation than the one stored in the mapping tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Candidate {
    pub label: String,
    pub entry: MappingEntry,
}

impl Candidate {
    pub fn new(label: impl Into<String>, entry: MappingEntry) -> Self {
        Self { label: label.into(), entry }
    }
}

impl From<MappingEntry> for Candidate {
    fn from(entry: MappingEntry) -> Self { Self { label: entry.key.clone(), entry } }
}

/// Candidates passed to a single display request.
pub type CandidateSet = Vec<Candidate>;
