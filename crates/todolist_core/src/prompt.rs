//! Toolkit-agnostic model of the add/edit prompt dialogs.
//!
//! # Responsibility
//! - Assemble a modal prompt from a title/message pair, text fields and
//!   actions, in builder style.
//! - Turn an action selection into a `(title, note)` pair for the caller.
//!
//! # Invariants
//! - The first text field holds the required title; an action is inert while
//!   it is missing or empty.
//! - The last text field, when distinct from the first, holds the optional
//!   note; otherwise the note is an empty string.
//! - A builder produces exactly one `Prompt`.

use std::error::Error;
use std::fmt::{Display, Formatter};

type ActionHandler = Box<dyn FnMut(&str, &str)>;

/// Visual/semantic role of an action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionStyle {
    #[default]
    Default,
    Cancel,
    Destructive,
}

/// Editable single-line input of a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    pub placeholder: String,
    pub text: Option<String>,
}

/// Button of a prompt with its optional callback.
pub struct PromptAction {
    title: String,
    style: ActionStyle,
    handler: Option<ActionHandler>,
}

impl PromptAction {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn style(&self) -> ActionStyle {
        self.style
    }
}

/// Result of selecting an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Title was present; the handler (if any) received these values.
    Submitted { title: String, note: String },
    /// Title was missing or empty; nothing was invoked.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptError {
    UnknownField(usize),
    UnknownAction(usize),
}

impl Display for PromptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownField(index) => write!(f, "prompt has no text field at index {index}"),
            Self::UnknownAction(index) => write!(f, "prompt has no action at index {index}"),
        }
    }
}

impl Error for PromptError {}

/// Fluent builder for a `Prompt`.
pub struct PromptBuilder {
    prompt: Prompt,
}

impl PromptBuilder {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            prompt: Prompt {
                title: title.into(),
                message: message.into(),
                fields: Vec::new(),
                actions: Vec::new(),
            },
        }
    }

    /// Appends a text field with a placeholder and optional prefilled text.
    pub fn text_field(mut self, placeholder: impl Into<String>, text: Option<&str>) -> Self {
        self.prompt.fields.push(TextField {
            placeholder: placeholder.into(),
            text: text.map(str::to_string),
        });
        self
    }

    /// Appends an action. `handler` receives `(title, note)` on submission.
    pub fn action<F>(
        mut self,
        title: impl Into<String>,
        style: ActionStyle,
        handler: Option<F>,
    ) -> Self
    where
        F: FnMut(&str, &str) + 'static,
    {
        self.prompt.actions.push(PromptAction {
            title: title.into(),
            style,
            handler: handler.map(|h| Box::new(h) as ActionHandler),
        });
        self
    }

    /// Appends an action without a callback, e.g. "Cancel".
    pub fn plain_action(mut self, title: impl Into<String>, style: ActionStyle) -> Self {
        self.prompt.actions.push(PromptAction {
            title: title.into(),
            style,
            handler: None,
        });
        self
    }

    pub fn build(self) -> Prompt {
        self.prompt
    }
}

/// Assembled prompt, ready to be shown by a UI layer.
pub struct Prompt {
    title: String,
    message: String,
    fields: Vec<TextField>,
    actions: Vec<PromptAction>,
}

impl Prompt {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn fields(&self) -> &[TextField] {
        &self.fields
    }

    pub fn actions(&self) -> &[PromptAction] {
        &self.actions
    }

    /// Replaces the text of one field, as user input would.
    pub fn set_field_text(
        &mut self,
        index: usize,
        text: impl Into<String>,
    ) -> Result<(), PromptError> {
        let field = self
            .fields
            .get_mut(index)
            .ok_or(PromptError::UnknownField(index))?;
        field.text = Some(text.into());
        Ok(())
    }

    /// Selects the action at `index`.
    ///
    /// Reads the first field as title and the last field as note. A prompt
    /// with a single field has no note field, so the note is empty.
    pub fn select(&mut self, index: usize) -> Result<ActionOutcome, PromptError> {
        let title = self
            .fields
            .first()
            .and_then(|field| field.text.clone())
            .unwrap_or_default();
        let note = match self.fields.as_slice() {
            [_, .., last] => last.text.clone().unwrap_or_default(),
            _ => String::new(),
        };

        let action = self
            .actions
            .get_mut(index)
            .ok_or(PromptError::UnknownAction(index))?;

        if title.is_empty() {
            return Ok(ActionOutcome::Ignored);
        }
        if let Some(handler) = action.handler.as_mut() {
            handler(&title, &note);
        }
        Ok(ActionOutcome::Submitted { title, note })
    }
}
