use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ForgeError;

lazy_static! {
    static ref SSH_REMOTE_RE: Regex =
        Regex::new(r"^git@github\.com[:/]([^/]+)/([^/]+?)(?:\.git)?$").expect("ssh remote regex");
    static ref HTTPS_REMOTE_RE: Regex =
        Regex::new(r"^https?://github\.com/([^/]+)/([^/]+?)(?:\.git)?$").expect("https remote regex");
}

/// Owner and name of a hosted repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoInfo {
    pub owner: String,
    pub name: String,
}

impl std::fmt::Display for RepoInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Extract `{owner, name}` from a GitHub SSH or HTTPS remote URL
pub fn parse_remote_url(url: &str) -> Result<RepoInfo, ForgeError> {
    let trimmed = url.trim();
    [&*SSH_REMOTE_RE, &*HTTPS_REMOTE_RE]
        .iter()
        .find_map(|re| re.captures(trimmed))
        .map(|caps| RepoInfo {
            owner: caps[1].to_string(),
            name: caps[2].to_string(),
        })
        .ok_or_else(|| ForgeError::UnsupportedRemote(url.to_string()))
}
