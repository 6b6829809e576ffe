pub mod commands;
pub mod core;
mod forms;
pub mod help;
pub mod io;
pub mod output;
mod shell;
mod shell_context;
pub mod ui;

pub use shell::{run_cli, SCRIPT_ENV};
