use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::{Forge, ForgeError, PullRequest, PullRequestDraft};

pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";

/// GitHub REST client authenticated with a personal access token
pub struct GitHubClient {
    client: Client,
    api_base: String,
    token: String,
}

#[derive(Serialize)]
struct CreatePullBody<'a> {
    title: &'a str,
    body: &'a str,
    head: &'a str,
    base: &'a str,
}

#[derive(Deserialize)]
struct CreatePullResponse {
    number: u64,
    html_url: String,
}

#[derive(Deserialize, Default)]
struct ErrorResponse {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

impl GitHubClient {
    pub fn new(token: String, timeout: Duration) -> Result<Self, ForgeError> {
        if token.trim().is_empty() {
            return Err(ForgeError::MissingToken);
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ForgeError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_base: DEFAULT_GITHUB_API.to_string(),
            token,
        })
    }

    /// Point at a GitHub Enterprise or test server
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn pulls_endpoint(&self, draft: &PullRequestDraft) -> String {
        format!(
            "{}/repos/{}/{}/pulls",
            self.api_base.trim_end_matches('/'),
            draft.repo.owner,
            draft.repo.name
        )
    }
}

#[async_trait]
impl Forge for GitHubClient {
    fn name(&self) -> &str {
        "GitHub"
    }

    async fn create_pull_request(&self, draft: &PullRequestDraft) -> Result<PullRequest, ForgeError> {
        let body = CreatePullBody {
            title: &draft.title,
            body: &draft.body,
            head: &draft.head,
            base: &draft.base,
        };

        debug!(repo = %draft.repo, head = %draft.head, base = %draft.base, "Creating pull request");

        let response = self
            .client
            .post(self.pulls_endpoint(draft))
            .bearer_auth(&self.token)
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(API_VERSION_HEADER, API_VERSION)
            .header(USER_AGENT, concat!("vibe/", env!("CARGO_PKG_VERSION")))
            .json(&body)
            .send()
            .await
            .map_err(|e| ForgeError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ForgeError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(classify_github_error(status, &text));
        }

        let created: CreatePullResponse =
            serde_json::from_str(&text).map_err(|e| ForgeError::InvalidResponse(e.to_string()))?;

        info!(number = created.number, url = %created.html_url, "Pull request created");
        Ok(PullRequest {
            number: created.number,
            url: created.html_url,
        })
    }
}

/// Turn a failed GitHub response into something a user can act on
pub fn classify_github_error(status: StatusCode, body: &str) -> ForgeError {
    let parsed: ErrorResponse = serde_json::from_str(body).unwrap_or_default();

    match status {
        StatusCode::UNAUTHORIZED => ForgeError::Unauthorized,
        StatusCode::UNPROCESSABLE_ENTITY => {
            let details: Vec<String> = parsed
                .errors
                .into_iter()
                .filter_map(|e| e.message.or(e.code))
                .collect();
            if details.is_empty() {
                ForgeError::Validation(parsed.message)
            } else {
                ForgeError::Validation(details.join("; "))
            }
        }
        _ => ForgeError::Api {
            status: status.as_u16(),
            message: if parsed.message.is_empty() {
                body.to_string()
            } else {
                parsed.message
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RepoInfo;

    fn draft() -> PullRequestDraft {
        PullRequestDraft {
            repo: RepoInfo {
                owner: "acme".into(),
                name: "widgets".into(),
            },
            base: "main".into(),
            head: "feature/login".into(),
            title: "Add login".into(),
            body: "Adds a login page.".into(),
        }
    }

    #[test]
    fn test_missing_token() {
        let result = GitHubClient::new("".into(), Duration::from_secs(5));
        assert!(matches!(result, Err(ForgeError::MissingToken)));
    }

    #[test]
    fn test_pulls_endpoint() {
        let client = GitHubClient::new("ghp_test".into(), Duration::from_secs(5))
            .unwrap()
            .with_api_base("https://ghe.example.com/api/v3/");
        assert_eq!(
            client.pulls_endpoint(&draft()),
            "https://ghe.example.com/api/v3/repos/acme/widgets/pulls"
        );
    }

    #[test]
    fn test_classify_unauthorized() {
        let err = classify_github_error(StatusCode::UNAUTHORIZED, r#"{"message":"Bad credentials"}"#);
        assert!(matches!(err, ForgeError::Unauthorized));
    }

    #[test]
    fn test_classify_validation_details() {
        let body = r#"{"message":"Validation Failed","errors":[{"resource":"PullRequest","code":"custom","message":"A pull request already exists for acme:feature/login."}]}"#;
        match classify_github_error(StatusCode::UNPROCESSABLE_ENTITY, body) {
            ForgeError::Validation(msg) => {
                assert_eq!(msg, "A pull request already exists for acme:feature/login.")
            }
            other => panic!("unexpected error: {other:?}"),
        }

        match classify_github_error(StatusCode::UNPROCESSABLE_ENTITY, r#"{"message":"Validation Failed"}"#) {
            ForgeError::Validation(msg) => assert_eq!(msg, "Validation Failed"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_classify_other_errors() {
        match classify_github_error(StatusCode::NOT_FOUND, r#"{"message":"Not Found"}"#) {
            ForgeError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Not Found");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        match classify_github_error(StatusCode::BAD_GATEWAY, "<html>oops</html>") {
            ForgeError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "<html>oops</html>");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_request_body_shape() {
        let d = draft();
        let body = CreatePullBody {
            title: &d.title,
            body: &d.body,
            head: &d.head,
            base: &d.base,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["head"], "feature/login");
        assert_eq!(json["base"], "main");
        assert_eq!(json["title"], "Add login");
        assert_eq!(json["body"], "Adds a login page.");
    }
}
