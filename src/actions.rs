//! The fixed set of things that can be done to a selected branch.

use anyhow::Result;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::traits::GitOperations;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown action '{0}' (expected one of: checkout, edit, delete, show)")]
pub struct UnknownAction(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionId {
    Checkout,
    Edit,
    Delete,
    Show,
}

impl ActionId {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Checkout => "checkout",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::Show => "show",
        }
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionId {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        resolve_action(s).map(|action| action.id)
    }
}

/// How an action talks to git
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Invocation {
    /// Output is captured and echoed afterwards
    Captured(&'static [&'static str]),
    /// Runs on the controlling terminal so an editor can take over
    Attached(&'static [&'static str]),
    /// Nothing is run
    None,
}

#[derive(Debug)]
pub struct Action {
    pub id: ActionId,
    pub label: &'static str,
    pub invocation: Invocation,
    pub forbidden_on_current: bool,
    pub disabled_reason: Option<&'static str>,
}

/// Registry of every action, in menu order
pub static ACTIONS: [Action; 4] = [
    Action {
        id: ActionId::Checkout,
        label: "Checkout branch",
        invocation: Invocation::Captured(&["checkout"]),
        forbidden_on_current: true,
        disabled_reason: Some("Already on"),
    },
    Action {
        id: ActionId::Edit,
        label: "Edit description",
        invocation: Invocation::Attached(&["branch", "--edit-description"]),
        forbidden_on_current: false,
        disabled_reason: None,
    },
    Action {
        id: ActionId::Delete,
        label: "Delete branch",
        invocation: Invocation::Captured(&["branch", "-d"]),
        forbidden_on_current: true,
        disabled_reason: Some("Cannot delete"),
    },
    Action {
        id: ActionId::Show,
        label: "Show branch",
        invocation: Invocation::None,
        forbidden_on_current: false,
        disabled_reason: None,
    },
];

/// Looks up an action by its identifier
///
/// # Errors
/// Returns an error if no action is registered under `id`
pub fn resolve_action(id: &str) -> Result<&'static Action, UnknownAction> {
    ACTIONS
        .iter()
        .find(|action| action.id.as_str() == id)
        .ok_or_else(|| UnknownAction(id.to_string()))
}

/// Result of executing an action
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The git command ran and reported success
    Completed,
    /// The git command ran and reported an error
    Failed(String),
    /// The action is not allowed on this branch; nothing was run
    Refused(String),
    /// Display only; nothing was run
    Displayed,
}

impl Action {
    /// Full argument vector for this action, `None` when it runs nothing
    #[must_use]
    pub fn command(&self, branch: &str) -> Option<Vec<String>> {
        let base = match self.invocation {
            Invocation::Captured(args) | Invocation::Attached(args) => args,
            Invocation::None => return None,
        };
        let mut args: Vec<String> = base.iter().map(|arg| (*arg).to_string()).collect();
        args.push(branch.to_string());
        Some(args)
    }

    /// Reason this action cannot run on `branch`, if any
    #[must_use]
    pub fn refusal(&self, branch: &str, is_current: bool) -> Option<String> {
        if !(is_current && self.forbidden_on_current) {
            return None;
        }
        let reason = self.disabled_reason.unwrap_or("Not allowed on");
        Some(format!("{reason} '{branch}'"))
    }

    /// Runs the action against `branch`
    ///
    /// Errors reported by git itself come back as [`ActionOutcome::Failed`];
    /// only a failure to start the editor for `edit` is returned as an error.
    ///
    /// # Errors
    /// Returns an error if a terminal-attached command cannot be started
    pub async fn execute(
        &self,
        git: &dyn GitOperations,
        branch: &str,
        is_current: bool,
    ) -> Result<ActionOutcome> {
        if let Some(reason) = self.refusal(branch, is_current) {
            return Ok(ActionOutcome::Refused(reason));
        }

        let Some(args) = self.command(branch) else {
            return Ok(ActionOutcome::Displayed);
        };

        println!("git {}", args.join(" "));

        match self.invocation {
            Invocation::Attached(_) => {
                let output = git.run_attached(&args).await?;
                if output.success {
                    Ok(ActionOutcome::Completed)
                } else {
                    Ok(ActionOutcome::Failed(exit_message(output.code)))
                }
            }
            Invocation::Captured(_) | Invocation::None => {
                let output = match git.run_captured(&args).await {
                    Ok(output) => output,
                    Err(e) => {
                        tracing::warn!(action = %self.id, error = %e, "git invocation failed");
                        return Ok(ActionOutcome::Failed(e.to_string()));
                    }
                };

                let stdout = output.stdout.trim();
                if !stdout.is_empty() {
                    println!("{stdout}");
                }
                let stderr = output.stderr.trim();
                if !stderr.is_empty() {
                    println!("{stderr}");
                }

                if output.success {
                    Ok(ActionOutcome::Completed)
                } else if stderr.is_empty() {
                    Ok(ActionOutcome::Failed(exit_message(output.code)))
                } else {
                    Ok(ActionOutcome::Failed(stderr.to_string()))
                }
            }
        }
    }
}

fn exit_message(code: Option<i32>) -> String {
    code.map_or_else(
        || "git was terminated by a signal".to_string(),
        |code| format!("git exited with status {code}"),
    )
}
