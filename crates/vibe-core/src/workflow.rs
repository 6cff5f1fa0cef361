use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use vibe_forge::{parse_remote_url, Forge, PullRequestDraft};
use vibe_git::VersionControl;
use vibe_llm::{Generator, MessageComposer, MAX_DIFF_CHARS};
use vibe_logging::{LogEvent, Logger, WorkflowKind};

use crate::confirm::{Choice, Confirmation, GeneratedContent, Prompter};
use crate::error::WorkflowError;
use crate::outcome::RunOutcome;

/// Options for [`Assistant::pull_request`]
#[derive(Debug, Clone, Default)]
pub struct PullRequestOptions {
    /// Base branch; discovered from the repository when `None`
    pub base: Option<String>,
    /// Credential used when the branch has to be pushed
    pub token: String,
}

/// Runs the commit and pull request flows against its collaborators
pub struct Assistant<'a> {
    vcs: &'a dyn VersionControl,
    generator: &'a dyn Generator,
    prompter: &'a dyn Prompter,
    forge: Option<&'a dyn Forge>,
    logger: Arc<Logger>,
    working_dir: PathBuf,
}

impl<'a> Assistant<'a> {
    pub fn new(
        vcs: &'a dyn VersionControl,
        generator: &'a dyn Generator,
        prompter: &'a dyn Prompter,
        logger: Arc<Logger>,
    ) -> Self {
        Self {
            vcs,
            generator,
            prompter,
            forge: None,
            logger,
            working_dir: PathBuf::from("."),
        }
    }

    pub fn with_forge(mut self, forge: &'a dyn Forge) -> Self {
        self.forge = Some(forge);
        self
    }

    pub fn with_working_dir(mut self, working_dir: PathBuf) -> Self {
        self.working_dir = working_dir;
        self
    }

    /// Generate a message for the staged changes and commit them once confirmed
    pub async fn commit(&self) -> Result<RunOutcome, WorkflowError> {
        let result = self.run_commit().await;
        self.report(WorkflowKind::Commit, result)
    }

    /// Generate a title and description for the current branch and open a
    /// pull request once confirmed, pushing the branch first if needed
    pub async fn pull_request(&self, options: &PullRequestOptions) -> Result<RunOutcome, WorkflowError> {
        let result = self.run_pull_request(options).await;
        self.report(WorkflowKind::PullRequest, result)
    }

    async fn run_commit(&self) -> Result<RunOutcome, WorkflowError> {
        let workflow = WorkflowKind::Commit;
        self.logger.log(&LogEvent::WorkflowStarted {
            workflow,
            working_dir: self.working_dir.clone(),
        });

        if !self.vcs.has_staged_changes()? {
            return Err(WorkflowError::NoStagedChanges);
        }

        let diff = self.vcs.staged_diff()?;
        if diff.trim().is_empty() {
            return Err(WorkflowError::EmptyDiff);
        }
        self.log_diff(workflow, &diff);

        let composer = MessageComposer::new(self.generator);
        let started = Instant::now();
        self.log_generation_started(workflow);
        let message = composer.commit_message(&diff).await?;
        self.log_generation_completed(workflow, started);

        let outcome = Confirmation::new(self.prompter, GeneratedContent::commit_message(message)).run()?;
        self.log_confirmation(workflow, outcome.action);

        if outcome.action == Choice::Cancel {
            return Ok(self.cancelled(workflow, "commit"));
        }
        let found = outcome.payload.kind();
        let message = outcome
            .payload
            .into_commit_message()
            .ok_or(WorkflowError::ContentMismatch {
                expected: "commit message",
                found,
            })?;

        let hash = self.vcs.commit(&message)?;
        self.logger.log(&LogEvent::CommitCreated {
            hash: hash.clone(),
            message: message.clone(),
        });

        Ok(RunOutcome::Committed { hash, message })
    }

    async fn run_pull_request(&self, options: &PullRequestOptions) -> Result<RunOutcome, WorkflowError> {
        let workflow = WorkflowKind::PullRequest;
        self.logger.log(&LogEvent::WorkflowStarted {
            workflow,
            working_dir: self.working_dir.clone(),
        });

        let forge = self.forge.ok_or(WorkflowError::NoForge)?;

        let current = self.vcs.current_branch()?;
        let base = match &options.base {
            Some(base) => base.clone(),
            None => self.vcs.default_branch()?,
        };
        if current == base {
            return Err(WorkflowError::OnBaseBranch(base));
        }

        let commits = self.vcs.commits_ahead(&base)?;
        if commits.is_empty() {
            return Err(WorkflowError::NoCommitsAhead { base });
        }
        self.logger.log(&LogEvent::BranchesResolved {
            current: current.clone(),
            base: base.clone(),
            commits_ahead: commits.len(),
        });

        let diff = self.vcs.branch_diff(&base)?;
        if diff.is_empty() {
            return Err(WorkflowError::NoChanges { base });
        }
        self.log_diff(workflow, &diff);

        // Resolve the repository before spending a model call on it
        let repo = parse_remote_url(&self.vcs.remote_url()?)?;
        debug!(repo = %repo, "Resolved forge repository");

        let commit_lines = commits
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");

        let composer = MessageComposer::new(self.generator);
        let started = Instant::now();
        self.log_generation_started(workflow);
        let parsed = composer.pull_request(&commit_lines, &diff).await?;
        self.log_generation_completed(workflow, started);

        let outcome = Confirmation::new(self.prompter, GeneratedContent::PullRequest(parsed.content)).run()?;
        self.log_confirmation(workflow, outcome.action);

        if outcome.action == Choice::Cancel {
            return Ok(self.cancelled(workflow, "pull request"));
        }
        let found = outcome.payload.kind();
        let content = outcome
            .payload
            .into_pull_request()
            .ok_or(WorkflowError::ContentMismatch {
                expected: "pull request",
                found,
            })?;
        if content.title.trim().is_empty() {
            return Err(WorkflowError::EmptyTitle);
        }

        let pushed = self.vcs.needs_push()?;
        if pushed {
            info!(branch = %current, "Branch is not on the remote yet, pushing");
            self.vcs.push(&options.token)?;
            self.logger.log(&LogEvent::BranchPushed {
                remote: self.vcs.remote_name().to_string(),
                branch: current.clone(),
            });
        }

        let draft = PullRequestDraft {
            repo,
            base,
            head: current,
            title: content.title,
            body: content.description,
        };
        let created = forge.create_pull_request(&draft).await?;
        self.logger.log(&LogEvent::PullRequestCreated {
            number: created.number,
            url: created.url.clone(),
        });

        Ok(RunOutcome::PullRequestOpened {
            number: created.number,
            url: created.url,
            title: draft.title,
            pushed,
        })
    }

    fn report(
        &self,
        workflow: WorkflowKind,
        result: Result<RunOutcome, WorkflowError>,
    ) -> Result<RunOutcome, WorkflowError> {
        if let Err(ref e) = result {
            warn!(workflow = workflow.label(), error = %e, "Workflow failed");
            self.logger.log(&LogEvent::ErrorEncountered {
                workflow,
                error: e.to_string(),
            });
        }
        result
    }

    fn cancelled(&self, workflow: WorkflowKind, what: &str) -> RunOutcome {
        self.logger.log(&LogEvent::WorkflowCancelled { workflow });
        RunOutcome::cancelled(what)
    }

    fn log_diff(&self, workflow: WorkflowKind, diff: &str) {
        let diff_chars = diff.chars().count();
        self.logger.log(&LogEvent::DiffCaptured {
            workflow,
            diff_chars,
            truncated: diff_chars > MAX_DIFF_CHARS,
        });
    }

    fn log_generation_started(&self, workflow: WorkflowKind) {
        self.logger.log(&LogEvent::GenerationStarted {
            workflow,
            generator: self.generator.name().to_string(),
        });
    }

    fn log_generation_completed(&self, workflow: WorkflowKind, started: Instant) {
        self.logger.log(&LogEvent::GenerationCompleted {
            workflow,
            duration_secs: started.elapsed().as_secs_f64(),
        });
    }

    fn log_confirmation(&self, workflow: WorkflowKind, action: Choice) {
        self.logger.log(&LogEvent::ConfirmationResolved {
            workflow,
            action: action.as_str().to_string(),
        });
    }
}
