//! CLI module for the soulscribe application
//!
//! This module handles the command-line interface for generating prayers and
//! working with the journal.
mod app;
mod args;

pub use app::*;
pub use args::*;
