//! prizebot - Telegram front end for prizecore
//!
//! - `cli`: command line interface
//! - `actions`: reply decisions for each command and button, Telegram-free
//! - `maintenance`: seed, teasers and stats subcommands
//! - `scheduler`: periodic broadcast task
//! - `telegram`: bot setup, teaser delivery and the dispatcher handler tree

pub mod actions;
pub mod cli;
pub mod maintenance;
pub mod scheduler;
pub mod telegram;

