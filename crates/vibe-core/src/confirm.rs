use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use vibe_llm::PrContent;

#[derive(Error, Debug)]
pub enum PromptError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Terminal(String),
}

/// Text produced by the model, awaiting the user's verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeneratedContent {
    CommitMessage { message: String },
    PullRequest(PrContent),
}

impl GeneratedContent {
    pub fn commit_message(message: impl Into<String>) -> Self {
        Self::CommitMessage {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::CommitMessage { .. } => "commit message",
            Self::PullRequest(_) => "pull request",
        }
    }

    pub fn into_commit_message(self) -> Option<String> {
        match self {
            Self::CommitMessage { message } => Some(message),
            Self::PullRequest(_) => None,
        }
    }

    pub fn into_pull_request(self) -> Option<PrContent> {
        match self {
            Self::PullRequest(pr) => Some(pr),
            Self::CommitMessage { .. } => None,
        }
    }

    fn fields(&self) -> &'static [EditableField] {
        match self {
            Self::CommitMessage { .. } => &[EditableField::CommitMessage],
            Self::PullRequest(_) => &[EditableField::Title, EditableField::Description],
        }
    }

    fn field(&self, field: EditableField) -> &str {
        match (self, field) {
            (Self::CommitMessage { message }, _) => message,
            (Self::PullRequest(pr), EditableField::Title) => &pr.title,
            (Self::PullRequest(pr), _) => &pr.description,
        }
    }

    fn field_mut(&mut self, field: EditableField) -> &mut String {
        match (self, field) {
            (Self::CommitMessage { message }, _) => message,
            (Self::PullRequest(pr), EditableField::Title) => &mut pr.title,
            (Self::PullRequest(pr), _) => &mut pr.description,
        }
    }
}

/// A user-editable piece of [`GeneratedContent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditableField {
    CommitMessage,
    Title,
    Description,
}

impl EditableField {
    pub fn label(&self) -> &'static str {
        match self {
            Self::CommitMessage => "Commit message",
            Self::Title => "PR title",
            Self::Description => "PR description",
        }
    }

    /// Whether the field is usually more than one line
    pub fn is_multiline(&self) -> bool {
        !matches!(self, Self::Title)
    }
}

/// The user's answer at the choice prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Choice {
    Accept,
    Edit,
    Cancel,
}

impl Choice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Choice::Accept => "accept",
            Choice::Edit => "edit",
            Choice::Cancel => "cancel",
        }
    }
}

/// The user's answer when editing one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    /// Replacement text; blank keeps the current value
    Value(String),
    Cancel,
}

/// Terminal result of a confirmation; acted on exactly once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationOutcome {
    pub action: Choice,
    /// Original content for Accept and Cancel, merged edits for Edit
    pub payload: GeneratedContent,
}

/// Terminal interaction used by [`Confirmation`]
pub trait Prompter {
    /// Show generated content to the user
    fn present(&self, content: &GeneratedContent) -> Result<(), PromptError>;

    fn choose(&self) -> Result<Choice, PromptError>;

    /// Ask for replacement text for one field, showing the current value
    fn edit_field(&self, field: EditableField, current: &str) -> Result<FieldEdit, PromptError>;
}

enum State {
    Presenting,
    AwaitingChoice,
    Editing,
    Resolved(Choice),
}

/// Accept/edit/cancel gate in front of every mutating action.
///
/// `Presenting → AwaitingChoice → Resolved`, or
/// `AwaitingChoice → Editing → Resolved`. There is no way back to
/// `Presenting` and no timeout.
pub struct Confirmation<'a> {
    prompter: &'a dyn Prompter,
    content: GeneratedContent,
}

impl<'a> Confirmation<'a> {
    pub fn new(prompter: &'a dyn Prompter, content: GeneratedContent) -> Self {
        Self { prompter, content }
    }

    pub fn run(self) -> Result<ConfirmationOutcome, PromptError> {
        let Self { prompter, content } = self;
        let mut edited = content.clone();
        let mut state = State::Presenting;

        loop {
            state = match state {
                State::Presenting => {
                    prompter.present(&content)?;
                    State::AwaitingChoice
                }
                State::AwaitingChoice => match prompter.choose()? {
                    Choice::Edit => State::Editing,
                    choice => State::Resolved(choice),
                },
                State::Editing => {
                    if collect_edits(prompter, &mut edited)? {
                        State::Resolved(Choice::Edit)
                    } else {
                        State::Resolved(Choice::Cancel)
                    }
                }
                State::Resolved(action) => {
                    debug!(action = action.as_str(), "Confirmation resolved");
                    let payload = match action {
                        Choice::Edit => edited,
                        Choice::Accept | Choice::Cancel => content,
                    };
                    return Ok(ConfirmationOutcome { action, payload });
                }
            };
        }
    }
}

/// Ask for each field in turn; `false` if the user cancelled part-way
fn collect_edits(prompter: &dyn Prompter, content: &mut GeneratedContent) -> Result<bool, PromptError> {
    for &field in content.fields() {
        let current = content.field(field).to_string();
        match prompter.edit_field(field, &current)? {
            FieldEdit::Cancel => return Ok(false),
            FieldEdit::Value(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    *content.field_mut(field) = text.to_string();
                }
            }
        }
    }
    Ok(true)
}
