use serde::{Deserialize, Serialize};

/// A single entry of a commit's tree, addressed by its full path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeFile {
    pub path: String,
    pub kind: EntryType,
}

impl TreeFile {
    #[cfg(test)]
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryType::File,
        }
    }

    pub fn is_blob(&self) -> bool {
        self.kind == EntryType::File
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    File,
    Directory,
    Submodule,
}
