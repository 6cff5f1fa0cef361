use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How a staged path differs from the last commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
}

/// A single staged file, with whichever sides of the change could be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: String,
    pub kind: ChangeKind,
    pub old_content: Option<Vec<u8>>,
    pub new_content: Option<Vec<u8>>,
}

/// Staged changes in status-report order
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    changes: Vec<FileChange>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, change: FileChange) {
        self.changes.push(change);
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileChange> {
        self.changes.iter()
    }

    /// Render every block into one diff document.
    ///
    /// Each block is a `diff --git` header, a `new file` / `deleted file`
    /// marker where it applies, the changed lines and a blank separator. There
    /// are no hunk headers or context lines; it is only meant as model input.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for change in &self.changes {
            render_change(change, &mut out);
        }
        out
    }
}

impl FromIterator<FileChange> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = FileChange>>(iter: I) -> Self {
        Self {
            changes: iter.into_iter().collect(),
        }
    }
}

fn render_change(change: &FileChange, out: &mut String) {
    let path = &change.path;
    out.push_str(&format!("diff --git a/{path} b/{path}\n"));

    match change.kind {
        ChangeKind::Added => {
            out.push_str("new file\n");
            if let Some(new) = &change.new_content {
                push_prefixed(out, '+', &String::from_utf8_lossy(new));
            }
        }
        ChangeKind::Deleted => {
            out.push_str("deleted file\n");
            if let Some(old) = &change.old_content {
                push_prefixed(out, '-', &String::from_utf8_lossy(old));
            }
        }
        ChangeKind::Modified => {
            if let Some(new) = &change.new_content {
                let old = change
                    .old_content
                    .as_deref()
                    .map(String::from_utf8_lossy)
                    .unwrap_or_default();
                out.push_str(&presence_diff(&old, &String::from_utf8_lossy(new)));
            }
        }
    }

    out.push('\n');
}

fn push_prefixed(out: &mut String, prefix: char, content: &str) {
    for line in content.lines() {
        out.push(prefix);
        out.push_str(line);
        out.push('\n');
    }
}

/// Line-presence diff between two versions of a file.
///
/// Emits every old line missing from the new version as `-`, then every new
/// line missing from the old version as `+`. This is not an edit script:
/// moved lines are invisible and repeated lines collapse to set membership.
/// Known simplification; the output shape is relied on as-is.
pub fn presence_diff(old: &str, new: &str) -> String {
    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();
    let old_set: HashSet<&str> = old_lines.iter().copied().collect();
    let new_set: HashSet<&str> = new_lines.iter().copied().collect();

    let mut out = String::new();
    for line in old_lines.iter().filter(|l| !new_set.contains(*l)) {
        out.push('-');
        out.push_str(line);
        out.push('\n');
    }
    for line in new_lines.iter().filter(|l| !old_set.contains(*l)) {
        out.push('+');
        out.push_str(line);
        out.push('\n');
    }
    out
}
