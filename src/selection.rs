use anyhow::Result;
use inquire::error::InquireError;
use inquire::list_option::ListOption;
use inquire::Select;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;

use crate::config::Config;

/// One entry of an interactive menu
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub value: String,
    /// Shown but not selectable when set
    pub disabled: Option<String>,
}

impl Choice {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            disabled: None,
        }
    }

    /// The entry that ends the run; its value is empty
    pub fn quit(label: impl Into<String>) -> Self {
        Self::new(label, String::new())
    }

    #[must_use]
    pub fn with_disabled(mut self, reason: Option<String>) -> Self {
        self.disabled = reason;
        self
    }

    #[must_use]
    pub fn is_quit(&self) -> bool {
        self.value.is_empty()
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.disabled {
            Some(reason) => write!(f, "{} ({})", self.label, reason),
            None => write!(f, "{}", self.label),
        }
    }
}

/// What the user picked
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    Chosen(String),
    Quit,
}

/// Trait for providing interactive selection functionality
/// This allows us to abstract away the interactive prompts for testing
pub trait SelectionProvider {
    /// Present a selection menu and return the user's choice
    ///
    /// Cancelling the prompt is reported as [`Selection::Quit`], not as an error.
    ///
    /// # Errors
    /// Returns an error if the provider cannot answer at all
    fn select(&self, prompt: &str, choices: Vec<Choice>) -> Result<Selection>;
}

/// Real implementation using `inquire::Select` for production use
#[derive(Clone, Copy, Debug)]
pub struct InquireSelectionProvider {
    page_size: usize,
    vim_mode: bool,
}

impl InquireSelectionProvider {
    #[must_use]
    pub const fn new(page_size: usize, vim_mode: bool) -> Self {
        Self {
            page_size,
            vim_mode,
        }
    }

    #[must_use]
    pub const fn from_config(config: &Config) -> Self {
        Self::new(config.page_size, config.vim_mode)
    }
}

impl SelectionProvider for InquireSelectionProvider {
    fn select(&self, prompt: &str, choices: Vec<Choice>) -> Result<Selection> {
        let mut cursor = 0;
        loop {
            let answer = Select::new(prompt, choices.clone())
                .with_page_size(self.page_size)
                .with_vim_mode(self.vim_mode)
                .with_starting_cursor(cursor)
                .raw_prompt();

            match answer {
                Ok(ListOption { index, value }) => {
                    if value.is_quit() {
                        return Ok(Selection::Quit);
                    }
                    if let Some(reason) = &value.disabled {
                        println!("⚠ {reason}");
                        cursor = index;
                        continue;
                    }
                    return Ok(Selection::Chosen(value.value));
                }
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                    println!("Cancelled.");
                    return Ok(Selection::Quit);
                }
                Err(e) => {
                    eprintln!("⚠ Warning: {e}");
                    return Ok(Selection::Quit);
                }
            }
        }
    }
}

/// Mock implementation for testing that answers from a script
///
/// Each response is either a choice value or `None` for quit. Every prompt
/// and the choices offered with it are recorded.
#[derive(Debug, Default)]
pub struct MockSelectionProvider {
    responses: RefCell<VecDeque<Option<String>>>,
    prompts: RefCell<Vec<(String, Vec<Choice>)>>,
}

impl MockSelectionProvider {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            responses: RefCell::new(
                responses
                    .into_iter()
                    .map(|response| response.map(Into::into))
                    .collect(),
            ),
            prompts: RefCell::default(),
        }
    }

    /// Prompts shown so far, with their choices
    #[must_use]
    pub fn prompts(&self) -> Vec<(String, Vec<Choice>)> {
        self.prompts.borrow().clone()
    }
}

impl SelectionProvider for MockSelectionProvider {
    fn select(&self, prompt: &str, choices: Vec<Choice>) -> Result<Selection> {
        self.prompts
            .borrow_mut()
            .push((prompt.to_string(), choices.clone()));

        let Some(response) = self.responses.borrow_mut().pop_front() else {
            anyhow::bail!("No mock response left for prompt '{}'", prompt)
        };

        let Some(value) = response else {
            return Ok(Selection::Quit);
        };

        match choices.iter().find(|c| c.value == value) {
            Some(choice) if choice.disabled.is_some() => {
                anyhow::bail!("Mock response '{}' is disabled", value)
            }
            Some(_) => Ok(Selection::Chosen(value)),
            None => anyhow::bail!("Mock response '{}' not found in options", value),
        }
    }
}
