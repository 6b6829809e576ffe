use std::path::PathBuf;

use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::core::utils::ensure_dir;
use crate::storage::export_ledger;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "export",
        "Write every transaction to a JSON file",
        "export [path]",
        cmd_export,
    )]
}

/// Without a path the configured export directory is used. A path ending in a
/// separator is treated as a directory.
fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let target = match args.first() {
        Some(raw) => {
            let path = PathBuf::from(raw);
            if raw.ends_with(std::path::MAIN_SEPARATOR) || raw.ends_with('/') {
                ensure_dir(&path)?;
            }
            path
        }
        None => {
            let dir = context
                .config
                .export_target(context.config_manager.base_dir());
            ensure_dir(&dir)?;
            dir
        }
    };

    let ledger = context.session.ledger();
    let written = export_ledger(ledger, &target)?;
    io::print_success(format!(
        "Exported {} transactions to {}.",
        ledger.len(),
        written.display()
    ));
    if !context.session.criteria().is_unset() {
        io::print_info("The export includes transactions hidden by the current filter.");
    }
    Ok(())
}
