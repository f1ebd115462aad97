use async_trait::async_trait;

use crate::git::{BranchListing, CommandOutput, GitError};

/// Trait for Git operations to enable mocking in tests
#[async_trait]
pub trait GitOperations: Send + Sync {
    /// Lists local branches along with the current one
    async fn list_branches(&self) -> Result<BranchListing, GitError>;

    /// Reads the description of a branch, `None` when none is configured
    async fn try_fetch_description(&self, branch: &str) -> Result<Option<String>, GitError>;

    /// Reads the description of a branch, treating every failure as "no description"
    async fn fetch_description(&self, branch: &str) -> String {
        match self.try_fetch_description(branch).await {
            Ok(description) => description.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(branch, error = %e, "description lookup failed");
                String::new()
            }
        }
    }

    /// Runs git with captured output
    async fn run_captured(&self, args: &[String]) -> Result<CommandOutput, GitError>;

    /// Runs git attached to the controlling terminal (for editors)
    async fn run_attached(&self, args: &[String]) -> Result<CommandOutput, GitError>;
}
