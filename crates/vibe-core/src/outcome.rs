use serde::{Deserialize, Serialize};

/// What a single `vibe` invocation ended up doing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    Committed {
        hash: String,
        message: String,
    },
    PullRequestOpened {
        number: u64,
        url: String,
        title: String,
        /// Whether the branch had to be pushed first
        pushed: bool,
    },
    /// The user declined; nothing was changed
    Cancelled { what: String },
}

impl RunOutcome {
    pub fn cancelled(what: impl Into<String>) -> Self {
        Self::Cancelled { what: what.into() }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// One-line summary for terminal output
    pub fn summary(&self) -> String {
        match self {
            Self::Committed { hash, message } => {
                let first_line = message.lines().next().unwrap_or_default();
                format!("Committed {hash}: {first_line}")
            }
            Self::PullRequestOpened { number, url, .. } => {
                format!("Pull request #{number} created: {url}")
            }
            Self::Cancelled { what } => {
                let mut chars = what.chars();
                match chars.next() {
                    Some(first) => format!("{}{} cancelled.", first.to_uppercase(), chars.as_str()),
                    None => "Cancelled.".to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_is_tagged() {
        let outcome = RunOutcome::Committed {
            hash: "abc1234".into(),
            message: "Add x".into(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "committed");
        assert_eq!(json["hash"], "abc1234");

        let json = serde_json::to_value(RunOutcome::cancelled("commit")).unwrap();
        assert_eq!(json["status"], "cancelled");
        assert_eq!(json["what"], "commit");
    }

    #[test]
    fn test_summaries() {
        let committed = RunOutcome::Committed {
            hash: "abc1234".into(),
            message: "Add x\n\nbody".into(),
        };
        assert_eq!(committed.summary(), "Committed abc1234: Add x");

        let opened = RunOutcome::PullRequestOpened {
            number: 7,
            url: "https://github.com/acme/widgets/pull/7".into(),
            title: "Add x".into(),
            pushed: true,
        };
        assert_eq!(
            opened.summary(),
            "Pull request #7 created: https://github.com/acme/widgets/pull/7"
        );

        assert_eq!(RunOutcome::cancelled("pull request").summary(), "Pull request cancelled.");
        assert!(RunOutcome::cancelled("commit").is_cancelled());
        assert!(!committed.is_cancelled());
    }
}
