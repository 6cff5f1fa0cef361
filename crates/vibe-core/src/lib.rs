//! # vibe-core
//!
//! The commit and pull request workflows.
//!
//! Both flows share one shape: build a diff, ask a [`vibe_llm::Generator`]
//! for text, run the [`Confirmation`] state machine and only then perform
//! the mutating action. A cancelled confirmation never reaches the commit,
//! push or forge call.
//!
//! ## Key Types
//!
//! - [`Assistant`] - Runs a workflow against its collaborators
//! - [`Confirmation`] - Accept/edit/cancel state machine
//! - [`Prompter`] - Terminal interaction port
//! - [`RunOutcome`] - What happened

mod confirm;
mod error;
mod outcome;
mod workflow;

pub use confirm::{
    Choice, Confirmation, ConfirmationOutcome, EditableField, FieldEdit, GeneratedContent, PromptError,
    Prompter,
};
pub use error::WorkflowError;
pub use outcome::RunOutcome;
pub use workflow::{Assistant, PullRequestOptions};
