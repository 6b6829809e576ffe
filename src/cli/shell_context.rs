use dialoguer::theme::ColorfulTheme;

use crate::{
    config::{Config, ConfigManager},
    session::Session,
};

use super::commands::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// Everything a command handler can touch during one shell run.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub session: Session,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
}
