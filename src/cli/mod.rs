//! Command-line interface components
//!
//! This module contains CLI-specific code for the Almanac Fetcher
//! application: argument parsing, invocation-environment checks, and the
//! command handlers that drive the update pipeline.

pub mod args;
pub mod commands;
pub mod startup;

pub use args::{CacheAction, CacheArgs, Cli, Commands, GlobalArgs, UpdateArgs};
pub use commands::{handle_cache, handle_update, resolve_plan, run_update};
pub use startup::running_under_ci;
