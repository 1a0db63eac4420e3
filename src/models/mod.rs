//! Value objects shared by the history provider, the analysis pipeline and
//! the JSON report.
//!
//! - `commit`: Commit, CommitAuthor as read from history
//! - `blame`: BlameLine for per-line author attribution, BlameMode
//! - `tree`: TreeFile, EntryType for the files of a commit
//! - `attribution`: AuthorRule, LineCountResult
//! - `area`: Area, AreaInfo, AreaAssignment and the built-in region data
//! - `report`: GenerateResult and nested DTOs serialized for output

pub mod area;
pub mod attribution;
pub mod blame;
pub mod commit;
pub mod report;
pub mod tree;

pub use area::*;
pub use attribution::*;
pub use blame::*;
pub use commit::*;
pub use report::*;
pub use tree::*;
