//! Thin wrapper around the `git` binary.
//!
//! Every repository query and mutation goes through a subprocess; nothing is
//! read from `.git` directly. Arguments are always passed as an argument
//! vector, so branch names never pass through a shell.

use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::PathBuf;
use thiserror::Error;
use tokio::process::Command;

use crate::traits::GitOperations;

/// Marker git prints in front of the checked-out branch
const CURRENT_MARKER: char = '*';
/// Marker git prints in front of a branch checked out in another worktree
const WORKTREE_MARKER: char = '+';
/// Entries git prints in place of a branch name when HEAD is not on a branch
const DETACHED_PREFIXES: [&str; 2] = ["(HEAD detached", "(no branch"];

#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`git branch` failed: {stderr}")]
    ListingFailed { stderr: String },

    #[error("no current branch found in `git branch` output")]
    NoCurrentBranch,

    #[error("more than one branch marked as current: {}", .0.join(", "))]
    MultipleCurrentBranches(Vec<String>),

    #[error("HEAD is not on a branch {0}; check out a branch first")]
    DetachedHead(String),

    #[error("failed to read description of '{branch}': {stderr}")]
    DescriptionLookupFailed { branch: String, stderr: String },
}

/// A local branch as reported by `git branch`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Branch {
    pub name: String,
    pub is_current: bool,
    /// Checked out in a different worktree (`+` marker)
    pub checked_out_elsewhere: bool,
}

impl Branch {
    /// Two-column prefix used when rendering the branch in a list
    #[must_use]
    pub const fn marker(&self) -> &'static str {
        if self.is_current {
            "* "
        } else if self.checked_out_elsewhere {
            "+ "
        } else {
            "  "
        }
    }
}

/// Parsed `git branch` output, in the order git printed it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BranchListing {
    pub branches: Vec<Branch>,
    pub current: String,
}

impl BranchListing {
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Branch> {
        self.branches.iter().find(|branch| branch.name == name)
    }
}

/// Captured result of a finished git invocation
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Parses the output of `git branch --no-color --no-column`
///
/// # Errors
/// Returns an error if:
/// - No line carries the current-branch marker
/// - More than one line carries it
/// - The marked line is git's detached-HEAD pseudo entry
pub fn parse_branch_listing(output: &str) -> Result<BranchListing, GitError> {
    let mut branches = Vec::new();
    let mut current = Vec::new();

    for line in output.lines().filter(|line| !line.trim().is_empty()) {
        let mut chars = line.chars();
        let marker = chars.next();
        let name = chars.as_str().trim();

        let is_current = marker == Some(CURRENT_MARKER);
        if is_current {
            if DETACHED_PREFIXES.iter().any(|prefix| name.starts_with(prefix)) {
                return Err(GitError::DetachedHead(name.to_string()));
            }
            current.push(name.to_string());
        }

        branches.push(Branch {
            name: name.to_string(),
            is_current,
            checked_out_elsewhere: marker == Some(WORKTREE_MARKER),
        });
    }

    match current.len() {
        0 => Err(GitError::NoCurrentBranch),
        1 => Ok(BranchListing {
            branches,
            current: current.remove(0),
        }),
        _ => Err(GitError::MultipleCurrentBranches(current)),
    }
}

/// Runs git as an external process
#[derive(Clone, Debug)]
pub struct GitCli {
    program: PathBuf,
}

impl GitCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command<I, S>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        cmd
    }

    fn spawn_error(&self, source: std::io::Error) -> GitError {
        GitError::Spawn {
            program: self.program.display().to_string(),
            source,
        }
    }
}

#[async_trait]
impl GitOperations for GitCli {
    async fn list_branches(&self) -> Result<BranchListing, GitError> {
        tracing::debug!(program = %self.program.display(), "listing branches");
        let output = self
            // column.ui would otherwise pack several branches onto one line
            .command(["branch", "--no-color", "--no-column"])
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() || !stderr.is_empty() {
            return Err(GitError::ListingFailed { stderr });
        }

        parse_branch_listing(&String::from_utf8_lossy(&output.stdout))
    }

    async fn try_fetch_description(&self, branch: &str) -> Result<Option<String>, GitError> {
        let key = format!("branch.{branch}.description");
        let output = self
            .command(["config", key.as_str()])
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        // `git config` exits with 1 when the key is not set
        if output.status.code() == Some(1) {
            return Ok(None);
        }
        if !output.status.success() {
            return Err(GitError::DescriptionLookupFailed {
                branch: branch.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let description = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!description.is_empty()).then_some(description))
    }

    async fn run_captured(&self, args: &[String]) -> Result<CommandOutput, GitError> {
        tracing::debug!(?args, "running git");
        let output = self
            .command(args)
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    async fn run_attached(&self, args: &[String]) -> Result<CommandOutput, GitError> {
        tracing::debug!(?args, "running git attached to the terminal");
        let status = self
            .command(args)
            .status()
            .await
            .map_err(|e| self.spawn_error(e))?;

        Ok(CommandOutput {
            success: status.success(),
            code: status.code(),
            ..CommandOutput::default()
        })
    }
}
