use git2::Status;
use serde::{Deserialize, Serialize};

/// Index state of a single path relative to the last commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StagingState {
    Unmodified,
    Untracked,
    Added,
    Modified,
    Deleted,
}

impl StagingState {
    /// Only index-side changes are considered staged.
    pub fn is_staged(self) -> bool {
        !matches!(self, StagingState::Unmodified | StagingState::Untracked)
    }
}

impl From<Status> for StagingState {
    fn from(st: Status) -> Self {
        if st.is_index_new() {
            StagingState::Added
        } else if st.is_index_modified() || st.is_index_typechange() || st.is_index_renamed() {
            StagingState::Modified
        } else if st.is_index_deleted() {
            StagingState::Deleted
        } else if st.is_wt_new() {
            StagingState::Untracked
        } else {
            StagingState::Unmodified
        }
    }
}
