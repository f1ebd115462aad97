#![allow(clippy::unwrap_used)] // Tests use unwrap for simplicity

use anyhow::{Context, Result};
use assert_fs::prelude::*;
use assert_fs::TempDir;

use std::process::Command;

/// Name of the binary under test
pub const BIN_NAME: &str = "git-branch-select";

/// A real git repository with branches `bugfix`, `feature-x` (checked out) and `main`
pub struct CliTestEnvironment {
    pub repo_dir: assert_fs::fixture::ChildPath,
    pub config_file: assert_fs::fixture::ChildPath,
    temp_dir: TempDir, // Keep temp_dir private to ensure cleanup, but don't expose it
}

impl CliTestEnvironment {
    /// Creates a new test environment with a real git repository
    ///
    /// # Errors
    /// Returns an error if:
    /// - Failed to create temporary directory
    /// - Failed to initialize git repository
    /// - Failed to create the initial commit or branches
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new().context("Failed to create temporary directory")?;
        let repo_dir = temp_dir.child("test_repo");
        let config_file = temp_dir.child("config.toml");

        repo_dir.create_dir_all()?;
        // Empty config so the developer's own settings never leak into tests
        config_file.write_str("")?;

        Self::run_git_command(&repo_dir, &["init"])?;
        Self::run_git_command(&repo_dir, &["config", "user.name", "Test User"])?;
        Self::run_git_command(&repo_dir, &["config", "user.email", "test@example.com"])?;

        repo_dir.child("README.md").write_str("# Test Repo")?;
        Self::run_git_command(&repo_dir, &["add", "."])?;
        Self::run_git_command(&repo_dir, &["commit", "-m", "Initial commit"])?;

        // Ensure we have a main branch (some git versions default to 'master')
        Self::run_git_command(&repo_dir, &["branch", "-M", "main"])?;
        Self::run_git_command(&repo_dir, &["branch", "feature-x"])?;
        Self::run_git_command(&repo_dir, &["branch", "bugfix"])?;
        Self::run_git_command(&repo_dir, &["checkout", "-q", "feature-x"])?;

        Ok(Self {
            repo_dir,
            config_file,
            temp_dir,
        })
    }

    /// Run a git command in the repository directory and return its stdout
    ///
    /// # Errors
    /// Returns an error if git cannot be run or exits non-zero
    pub fn git(&self, args: &[&str]) -> Result<String> {
        Self::run_git_command(&self.repo_dir, args)
    }

    fn run_git_command(repo_path: &assert_fs::fixture::ChildPath, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(repo_path.path())
            .output()
            .context("Failed to execute git command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Git command failed: {}", stderr);
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Whether a local branch exists
    pub fn branch_exists(&self, name: &str) -> bool {
        let reference = format!("refs/heads/{}", name);
        self.git(&["show-ref", "--verify", "--quiet", &reference])
            .is_ok()
    }

    /// Set a branch description directly through git config
    ///
    /// # Errors
    /// Returns an error if git config fails
    pub fn set_description(&self, branch: &str, description: &str) -> Result<()> {
        let key = format!("branch.{}.description", branch);
        self.git(&["config", &key, description])?;
        Ok(())
    }

    /// A directory that is not inside any git repository
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created
    pub fn outside_dir(&self) -> Result<assert_fs::fixture::ChildPath> {
        let dir = self.temp_dir.child("not_a_repo");
        dir.create_dir_all()?;
        Ok(dir)
    }

    /// Execute a non-interactive CLI command with proper environment setup
    ///
    /// # Errors
    /// Returns an error if the command setup fails
    pub fn run_command(&self, args: &[&str]) -> Result<assert_cmd::Command> {
        let mut cmd = assert_cmd::Command::cargo_bin(BIN_NAME)
            .with_context(|| format!("Failed to find {} binary", BIN_NAME))?;

        cmd.current_dir(self.repo_dir.path())
            .env("BRANCH_SELECT_CONFIG", self.config_file.path())
            .env_remove("BRANCH_SELECT_GIT")
            .env_remove("BRANCH_SELECT_LOG")
            .env("GIT_CEILING_DIRECTORIES", self.temp_dir.path());

        cmd.args(args);
        Ok(cmd)
    }

    /// Check if we're running in a CI environment (where TTY is not available)
    pub fn is_ci() -> bool {
        // Check for common CI environment variables
        std::env::var("CI").is_ok()
            || std::env::var("GITHUB_ACTIONS").is_ok()
            || std::env::var("GITLAB_CI").is_ok()
            || std::env::var("TRAVIS").is_ok()
            || std::env::var("CIRCLECI").is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use predicates::prelude::*;

    #[test]
    fn test_cli_test_environment_creation() -> Result<()> {
        let env = CliTestEnvironment::new()?;

        env.repo_dir.assert(predicate::path::is_dir());
        env.repo_dir.child(".git").assert(predicate::path::exists());
        env.config_file.assert(predicate::path::exists());

        let branches = env.git(&["branch", "--no-color"])?;
        assert_eq!(branches, "  bugfix\n* feature-x\n  main\n");

        Ok(())
    }

    #[test]
    fn test_branch_helpers() -> Result<()> {
        let env = CliTestEnvironment::new()?;

        assert!(env.branch_exists("main"));
        assert!(!env.branch_exists("nope"));

        env.set_description("main", "Trunk")?;
        assert_eq!(env.git(&["config", "branch.main.description"])?.trim(), "Trunk");

        Ok(())
    }
}
