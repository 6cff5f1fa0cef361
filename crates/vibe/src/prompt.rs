//! Interactive confirmation in the terminal.

use colored::Colorize;
use dialoguer::{Editor, Input, Select};
use std::io::ErrorKind;

use vibe_core::{Choice, EditableField, FieldEdit, GeneratedContent, PromptError, Prompter};

const CHOICES: [(&str, Choice); 3] = [
    ("Accept", Choice::Accept),
    ("Edit", Choice::Edit),
    ("Cancel", Choice::Cancel),
];

const RULE_WIDTH: usize = 50;

/// [`Prompter`] backed by dialoguer; everything is drawn on stderr
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn present(&self, content: &GeneratedContent) -> Result<(), PromptError> {
        let rule = "-".repeat(RULE_WIDTH).dimmed();
        match content {
            GeneratedContent::CommitMessage { message } => {
                eprintln!();
                eprintln!("{}", "Generated commit message:".bold());
                eprintln!("{rule}");
                eprintln!("{message}");
                eprintln!("{rule}");
            }
            GeneratedContent::PullRequest(pr) => {
                eprintln!();
                eprintln!("{}", "Generated PR:".bold());
                eprintln!("{rule}");
                eprintln!("{} {}", "Title:".dimmed(), pr.title.bright_white().bold());
                eprintln!();
                eprintln!("{}", "Description:".dimmed());
                eprintln!("{}", pr.description);
                eprintln!("{rule}");
            }
        }
        Ok(())
    }

    fn choose(&self) -> Result<Choice, PromptError> {
        let items: Vec<&str> = CHOICES.iter().map(|(label, _)| *label).collect();
        let selection = Select::new()
            .with_prompt("What would you like to do?")
            .items(&items)
            .default(0)
            .interact_opt();

        // Esc, `q` and Ctrl+C all mean cancel
        match selection {
            Ok(Some(index)) => Ok(CHOICES[index].1),
            Ok(None) => Ok(Choice::Cancel),
            Err(e) => interrupted_or(e, Choice::Cancel),
        }
    }

    fn edit_field(&self, field: EditableField, current: &str) -> Result<FieldEdit, PromptError> {
        if field.is_multiline() {
            // An editor closed without saving leaves the field unchanged
            match Editor::new().edit(current).map_err(dialoguer::Error::from) {
                Ok(text) => Ok(FieldEdit::Value(text.unwrap_or_default())),
                Err(e) => interrupted_or(e, FieldEdit::Cancel),
            }
        } else {
            let input = Input::<String>::new()
                .with_prompt(field.label())
                .with_initial_text(current)
                .allow_empty(true)
                .interact_text();
            match input {
                Ok(text) => Ok(FieldEdit::Value(text)),
                Err(e) => interrupted_or(e, FieldEdit::Cancel),
            }
        }
    }
}

fn interrupted_or<T>(err: dialoguer::Error, on_interrupt: T) -> Result<T, PromptError> {
    match err {
        dialoguer::Error::IO(io) if io.kind() == ErrorKind::Interrupted => Ok(on_interrupt),
        dialoguer::Error::IO(io) => Err(PromptError::Io(io)),
    }
}
