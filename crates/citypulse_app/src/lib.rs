//! The `citypulse` command line: argument parsing, environment configuration
//! and the commands wiring engine loops to the terminal.
pub mod cli;
pub mod commands;
pub mod config;
pub mod interrupt;
pub mod progress;
