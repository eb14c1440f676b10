//! Host module for process management and command execution

pub mod command_runner;

pub use command_runner::{CommandError, CommandRunner};
