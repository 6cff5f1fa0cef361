use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Which flow produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowKind {
    Commit,
    PullRequest,
}

impl WorkflowKind {
    pub fn label(&self) -> &'static str {
        match self {
            WorkflowKind::Commit => "commit",
            WorkflowKind::PullRequest => "pr",
        }
    }
}

/// Structured log events for the commit and pull request flows
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LogEvent {
    WorkflowStarted {
        workflow: WorkflowKind,
        working_dir: PathBuf,
    },
    BranchesResolved {
        current: String,
        base: String,
        commits_ahead: usize,
    },
    DiffCaptured {
        workflow: WorkflowKind,
        diff_chars: usize,
        truncated: bool,
    },
    GenerationStarted {
        workflow: WorkflowKind,
        generator: String,
    },
    GenerationCompleted {
        workflow: WorkflowKind,
        duration_secs: f64,
    },
    ConfirmationResolved {
        workflow: WorkflowKind,
        action: String,
    },
    CommitCreated {
        hash: String,
        message: String,
    },
    BranchPushed {
        remote: String,
        branch: String,
    },
    PullRequestCreated {
        number: u64,
        url: String,
    },
    WorkflowCancelled {
        workflow: WorkflowKind,
    },
    ErrorEncountered {
        workflow: WorkflowKind,
        error: String,
    },
}

impl LogEvent {
    /// Add a timestamp to serialize with the event
    fn with_timestamp(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(obj) = value.as_object_mut() {
            obj.insert(
                "timestamp".to_string(),
                serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
            );
        }
        value
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors
    #[default]
    Pretty,
    /// JSON lines format for machine consumption
    Json,
    /// Compact single-line format
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// Logger for vibe events - handles both console output and file logging
pub struct Logger {
    format: LogFormat,
    file_writer: Option<Mutex<File>>,
}

impl Logger {
    pub fn new(format: LogFormat) -> Self {
        Self {
            format,
            file_writer: None,
        }
    }

    /// Create a logger with file output in addition to console
    pub fn with_file(format: LogFormat, log_path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        Ok(Self {
            format,
            file_writer: Some(Mutex::new(file)),
        })
    }

    pub fn log(&self, event: &LogEvent) {
        // File output is always JSON
        if let Some(ref writer) = self.file_writer {
            if let Ok(mut file) = writer.lock() {
                let json = event.with_timestamp();
                let _ = writeln!(file, "{}", json);
            }
        }

        let mut stderr = std::io::stderr();
        match self.format {
            LogFormat::Json => {
                if let Ok(json) = serde_json::to_string(event) {
                    let _ = writeln!(stderr, "{}", json);
                }
            }
            LogFormat::Pretty => {
                if let Some(line) = Self::render_pretty(event) {
                    let _ = writeln!(stderr, "{}", line);
                }
            }
            LogFormat::Compact => {
                let timestamp = chrono::Utc::now().format("%H:%M:%S");
                let _ = writeln!(stderr, "[{}] {}", timestamp, Self::render_compact(event));
            }
        }
    }

    /// One status line per event, or nothing for events the user sees elsewhere
    fn render_pretty(event: &LogEvent) -> Option<String> {
        let line = match event {
            LogEvent::WorkflowStarted { workflow, .. } => format!(
                "{} {}",
                "▶".bright_cyan(),
                format!("vibe {}", workflow.label()).bright_cyan().bold()
            ),
            LogEvent::BranchesResolved {
                current,
                base,
                commits_ahead,
            } => format!(
                "  {} {} → {} ({} {})",
                "Branch:".dimmed(),
                current.bright_white(),
                base.bright_white(),
                commits_ahead,
                if *commits_ahead == 1 { "commit" } else { "commits" }
            ),
            LogEvent::DiffCaptured {
                diff_chars,
                truncated,
                ..
            } => {
                let note = if *truncated { ", truncated for the model" } else { "" };
                format!("  {} {} chars{}", "Diff:".dimmed(), diff_chars, note)
            }
            LogEvent::GenerationStarted { generator, .. } => format!(
                "  {} {}",
                "⋯".bright_magenta(),
                format!("Asking {generator}...").dimmed()
            ),
            LogEvent::GenerationCompleted { duration_secs, .. } => {
                format!("  {} Generated ({:.1}s)", "✓".bright_green(), duration_secs)
            }
            LogEvent::ConfirmationResolved { .. } => return None,
            LogEvent::CommitCreated { hash, message } => format!(
                "{} Committed {} {}",
                "✓".bright_green(),
                hash.bright_yellow(),
                message
            ),
            LogEvent::BranchPushed { remote, branch } => format!(
                "{} Pushed {} to {}",
                "✓".bright_green(),
                branch.bright_white(),
                remote
            ),
            LogEvent::PullRequestCreated { number, url } => format!(
                "{} Opened pull request #{} {}",
                "✓".bright_green(),
                number,
                url.underline()
            ),
            LogEvent::WorkflowCancelled { workflow } => format!(
                "{} {} cancelled",
                "⚠".bright_yellow(),
                workflow.label()
            ),
            LogEvent::ErrorEncountered { error, .. } => {
                format!("{} {}", "✗".bright_red(), error.bright_red())
            }
        };
        Some(line)
    }

    fn render_compact(event: &LogEvent) -> String {
        match event {
            LogEvent::WorkflowStarted { workflow, .. } => format!("{}:start", workflow.label()),
            LogEvent::BranchesResolved {
                current,
                base,
                commits_ahead,
            } => format!("branch:{current}..{base} ahead={commits_ahead}"),
            LogEvent::DiffCaptured {
                workflow,
                diff_chars,
                truncated,
            } => format!("{}:diff chars={} truncated={}", workflow.label(), diff_chars, truncated),
            LogEvent::GenerationStarted { workflow, generator } => {
                format!("{}:generate {}", workflow.label(), generator)
            }
            LogEvent::GenerationCompleted {
                workflow,
                duration_secs,
            } => format!("{}:generated {:.1}s", workflow.label(), duration_secs),
            LogEvent::ConfirmationResolved { workflow, action } => {
                format!("{}:confirm {}", workflow.label(), action)
            }
            LogEvent::CommitCreated { hash, .. } => format!("commit:done {hash}"),
            LogEvent::BranchPushed { remote, branch } => format!("push:done {remote}/{branch}"),
            LogEvent::PullRequestCreated { number, url } => format!("pr:done #{number} {url}"),
            LogEvent::WorkflowCancelled { workflow } => format!("{}:cancelled", workflow.label()),
            LogEvent::ErrorEncountered { workflow, error } => {
                format!("{}:error {}", workflow.label(), error)
            }
        }
    }
}
