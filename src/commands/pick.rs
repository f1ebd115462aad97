use anyhow::{Context, Result};
use clap::Args;
use futures::future::join_all;
use std::process::ExitCode;

use crate::actions::{ACTIONS, Action, ActionId, ActionOutcome, resolve_action};
use crate::config::Config;
use crate::git::{Branch, BranchListing, GitCli};
use crate::selection::{Choice, InquireSelectionProvider, Selection, SelectionProvider};
use crate::traits::GitOperations;

const BRANCH_PROMPT: &str = "Select branch";
const ACTION_PROMPT: &str = "Select command";

/// Command-line flags that pre-select an action
#[derive(Args, Clone, Copy, Debug, Default)]
pub struct ActionFlags {
    /// Checkout the selected branch
    #[arg(long)]
    pub checkout: bool,
    /// Edit the description of the selected branch
    #[arg(long)]
    pub edit: bool,
    /// Delete the selected branch
    #[arg(long)]
    pub delete: bool,
    /// Only show the selected branch
    #[arg(long)]
    pub show: bool,
}

impl ActionFlags {
    /// Identifier of the pre-selected action; the first flag set wins
    #[must_use]
    pub fn preset(&self) -> Option<&'static str> {
        [
            (self.checkout, ActionId::Checkout),
            (self.edit, ActionId::Edit),
            (self.delete, ActionId::Delete),
            (self.show, ActionId::Show),
        ]
        .into_iter()
        .find_map(|(set, id)| set.then_some(id.as_str()))
    }
}

/// How the run was requested
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InvocationMode {
    /// Use the current branch instead of asking
    pub select_current: bool,
    /// Action to run instead of asking
    pub preset: Option<String>,
}

impl InvocationMode {
    #[must_use]
    pub fn from_flags(select_current: bool, flags: &ActionFlags) -> Self {
        Self {
            select_current,
            preset: flags.preset().map(str::to_string),
        }
    }
}

/// How a run ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// The user quit at a menu
    Quit,
    /// Branch details were printed
    Shown { branch: String },
    /// An action was attempted
    Executed {
        branch: String,
        action: ActionId,
        outcome: ActionOutcome,
    },
}

impl RunOutcome {
    /// Whether the process should exit non-zero
    #[must_use]
    pub const fn is_failure(&self, fail_on_action_error: bool) -> bool {
        fail_on_action_error
            && matches!(
                self,
                Self::Executed {
                    outcome: ActionOutcome::Failed(_),
                    ..
                }
            )
    }

    /// Process exit code for this outcome
    #[must_use]
    pub fn exit_code(&self, fail_on_action_error: bool) -> ExitCode {
        if self.is_failure(fail_on_action_error) {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}

/// Runs the branch picker against the real git binary and terminal
///
/// # Errors
/// Returns an error if:
/// - The branch list cannot be obtained
/// - The pre-selected action is unknown
/// - The description editor cannot be started
pub async fn pick_branch(mode: &InvocationMode, config: &Config) -> Result<RunOutcome> {
    let git = GitCli::new(&config.git);
    let provider = InquireSelectionProvider::from_config(config);
    pick_branch_with_provider(mode, &git, &provider).await
}

/// Runs the branch picker with custom git and selection providers (for testing)
///
/// # Errors
/// Returns an error if:
/// - The branch list cannot be obtained
/// - The pre-selected action is unknown
/// - The description editor cannot be started
pub async fn pick_branch_with_provider(
    mode: &InvocationMode,
    git: &dyn GitOperations,
    provider: &dyn SelectionProvider,
) -> Result<RunOutcome> {
    let preset = mode.preset.as_deref().map(resolve_action).transpose()?;

    let listing = git
        .list_branches()
        .await
        .context("Failed to list branches")?;

    let (branch, description) = if mode.select_current {
        let description = git.fetch_description(&listing.current).await;
        (listing.current.clone(), description)
    } else {
        let descriptions = fetch_descriptions(git, &listing.branches).await;
        let choices = branch_choices(&listing.branches, &descriptions, preset);

        let Selection::Chosen(name) = provider.select(BRANCH_PROMPT, choices)? else {
            return Ok(RunOutcome::Quit);
        };
        let description = listing
            .branches
            .iter()
            .position(|b| b.name == name)
            .and_then(|i| descriptions.get(i).cloned())
            .unwrap_or_default();
        (name, description)
    };

    let is_current = branch == listing.current;

    let action = match preset {
        Some(action) => action,
        None => match select_action(provider, &branch, is_current)? {
            Some(action) => action,
            None => return Ok(RunOutcome::Quit),
        },
    };

    if action.id == ActionId::Show {
        print!("{}", branch_details(&listing, &branch, &description));
        return Ok(RunOutcome::Shown { branch });
    }

    let outcome = action.execute(git, &branch, is_current).await?;
    report(&outcome, action, &branch);

    Ok(RunOutcome::Executed {
        branch,
        action: action.id,
        outcome,
    })
}

/// Looks up every branch description concurrently; results follow `branches` order
async fn fetch_descriptions(git: &dyn GitOperations, branches: &[Branch]) -> Vec<String> {
    join_all(branches.iter().map(|b| git.fetch_description(&b.name))).await
}

/// Menu label for a branch: `"* name : description"` or `"  name"`
#[must_use]
pub fn branch_label(branch: &Branch, description: &str) -> String {
    // Only the first line fits in a menu row
    match description.lines().next().map(str::trim) {
        Some(summary) if !summary.is_empty() => {
            format!("{}{} : {}", branch.marker(), branch.name, summary)
        }
        _ => format!("{}{}", branch.marker(), branch.name),
    }
}

fn branch_choices(
    branches: &[Branch],
    descriptions: &[String],
    preset: Option<&Action>,
) -> Vec<Choice> {
    let mut choices: Vec<Choice> = branches
        .iter()
        .zip(descriptions)
        .map(|(branch, description)| {
            let disabled = preset.and_then(|a| a.refusal(&branch.name, branch.is_current));
            Choice::new(branch_label(branch, description), branch.name.clone())
                .with_disabled(disabled)
        })
        .collect();
    choices.push(Choice::quit("  Quit"));
    choices
}

fn action_choices(branch: &str, is_current: bool) -> Vec<Choice> {
    let mut choices: Vec<Choice> = ACTIONS
        .iter()
        .map(|action| {
            Choice::new(action.label, action.id.as_str())
                .with_disabled(action.refusal(branch, is_current))
        })
        .collect();
    choices.push(Choice::quit("Quit"));
    choices
}

fn select_action(
    provider: &dyn SelectionProvider,
    branch: &str,
    is_current: bool,
) -> Result<Option<&'static Action>> {
    match provider.select(ACTION_PROMPT, action_choices(branch, is_current))? {
        Selection::Chosen(id) => Ok(Some(resolve_action(&id)?)),
        Selection::Quit => Ok(None),
    }
}

/// Text printed in show mode: the marked name, then the description indented
fn branch_details(listing: &BranchListing, name: &str, description: &str) -> String {
    let mut details = match listing.find(name) {
        Some(branch) => format!("{}{}\n", branch.marker(), branch.name),
        None => format!("  {name}\n"),
    };
    for line in description.lines() {
        details.push_str("    ");
        details.push_str(line);
        details.push('\n');
    }
    details
}

fn report(outcome: &ActionOutcome, action: &Action, branch: &str) {
    match outcome {
        ActionOutcome::Completed => println!("✓ {} '{}' done", action.label, branch),
        ActionOutcome::Failed(message) => {
            tracing::warn!(action = %action.id, branch, "action failed");
            println!("⚠ Warning: {} failed: {}", action.label, message);
        }
        ActionOutcome::Refused(reason) => println!("⚠ {}", reason),
        ActionOutcome::Displayed => {}
    }
}
