mod config;
mod prompt;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use vibe_core::{Assistant, PullRequestOptions, RunOutcome};
use vibe_forge::GitHubClient;
use vibe_git::GitRepository;
use vibe_llm::{GeneratorConfig, OpenAiGenerator};
use vibe_logging::{init_tracing, LogFormat, Logger};

use crate::config::Settings;
use crate::prompt::TerminalPrompter;

#[derive(Parser, Debug)]
#[command(
    name = "vibe",
    about = "AI-written commit messages and pull requests",
    version,
    author
)]
struct Cli {
    /// Working directory (default: current directory)
    #[arg(short = 'd', long, global = true)]
    working_dir: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty", global = true)]
    log_format: LogFormatChoice,

    /// Tracing filter when RUST_LOG is unset
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Output final result as JSON
    #[arg(long, global = true)]
    json_output: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a commit message for the staged changes and commit
    Commit,
    /// Generate a pull request for the current branch and open it on GitHub
    Pr {
        /// Base branch (default: main or master)
        #[arg(short, long)]
        base: Option<String>,
    },
    /// Print version and build information
    Version,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatChoice {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Pretty => LogFormat::Pretty,
            LogFormatChoice::Json => LogFormat::Json,
            LogFormatChoice::Compact => LogFormat::Compact,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Command::Version = cli.command {
        print_version();
        return Ok(());
    }

    let log_format: LogFormat = cli.log_format.into();
    init_tracing(&cli.log_level, log_format);

    let working_dir = match cli.working_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    let settings = Settings::load(&working_dir)?;

    let logger = match &settings.log_file {
        Some(path) => Logger::with_file(log_format, path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?,
        None => Logger::new(log_format),
    };
    let logger = Arc::new(logger);

    let api_key = require_env(
        "OPENAI_API_KEY",
        "Get a key at https://platform.openai.com/api-keys, then either:\n  export OPENAI_API_KEY=sk-...\nor add it to a .env file in your project.",
    )?;

    let repo = GitRepository::discover(&working_dir)
        .context("vibe must be run inside a git repository")?
        .with_remote(settings.remote.clone())
        .with_fallback_identity(settings.identity.clone());

    let generator = OpenAiGenerator::new(
        GeneratorConfig::new(api_key)
            .with_model(settings.model.clone())
            .with_api_base(settings.api_base.clone())
            .with_timeout(settings.timeout),
    )
    .context("Failed to create AI client")?;

    let prompter = TerminalPrompter;
    let assistant =
        Assistant::new(&repo, &generator, &prompter, logger).with_working_dir(working_dir);

    let result = match cli.command {
        Command::Commit => assistant.commit().await,
        Command::Pr { base } => {
            let token = require_env(
                "GITHUB_TOKEN",
                "Create a token with the 'repo' scope at https://github.com/settings/tokens, then:\n  export GITHUB_TOKEN=ghp_...",
            )?;
            let forge = GitHubClient::new(token.clone(), settings.timeout)
                .context("Failed to create GitHub client")?
                .with_api_base(settings.github_api.clone());
            let options = PullRequestOptions { base, token };
            assistant.with_forge(&forge).pull_request(&options).await
        }
        Command::Version => return Ok(()),
    };

    // Workflow errors have already been reported through the logger
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(_) => std::process::exit(1),
    };

    if cli.json_output {
        let json = serde_json::to_string_pretty(&outcome)?;
        println!("{}", json);
    } else {
        print_outcome(&outcome);
    }

    Ok(())
}

fn require_env(key: &str, hint: &str) -> Result<String> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => anyhow::bail!("{} environment variable is not set\n\n{}", key, hint),
    }
}

fn print_outcome(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Cancelled { .. } => eprintln!("{}", outcome.summary().dimmed()),
        _ => println!("{}", outcome.summary().bright_green()),
    }
}

fn print_version() {
    println!("vibe {}", env!("CARGO_PKG_VERSION"));
    if let Some(commit) = option_env!("VIBE_GIT_COMMIT") {
        println!("commit: {}", commit);
    }
    if let Some(built) = option_env!("VIBE_BUILD_TIME") {
        println!("built:  {}", built);
    }
}
