//! # branch-select
//!
//! An interactive picker for local git branches. It lists branches together
//! with their descriptions (`git branch --edit-description`), lets you pick
//! one, then pick what to do with it.
//!
//! ## Features
//!
//! - **Branch Descriptions** - Shows each branch's description next to its name
//! - **Guarded Actions** - Checkout and delete are disabled on the current branch
//! - **Shortcuts** - `--current` skips the branch menu, `--checkout`/`--edit`/`--delete`/`--show` skip the action menu
//! - **No Shell Involved** - Branch names are passed to git as separate arguments
//!
//! ## Quick Start
//!
//! ```bash
//! # Pick a branch, then an action
//! git branch-select
//!
//! # Edit the description of the current branch
//! git branch-select --current --edit
//!
//! # Pick a branch to delete
//! git branch-select --delete
//! ```
//!
//! ## Module Structure
//!
//! - [`commands`] - The branch picker flow and shell completions
//! - [`actions`] - Registry of checkout, edit, delete and show
//! - [`git`] - Runs the git binary and parses its output
//! - [`selection`] - Abstracts interactive selection prompts for testability
//! - [`config`] - Optional `config.toml` settings
//! - [`logging`] - `tracing` subscriber setup
//! - [`traits`] - Defines `GitOperations` trait for testability and abstraction

pub mod actions;
pub mod commands;
pub mod config;
pub mod git;
pub mod logging;
pub mod selection;
pub mod traits;

pub use anyhow::Result;
