use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::config::Config;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "config",
        "View and change shell preferences",
        "config [show|set <key> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        show_config(context);
        return Ok(());
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <{}> <value>",
                    Config::KEYS.join("|")
                )));
            }
            let key = args[1];
            let value = args[2..].join(" ");
            let mut updated = context.config.clone();
            updated.set_value(key, &value)?;
            context.persist_config(updated)?;
            io::print_success(format!("Set {} = {}.", key, value.trim()));
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{}` (use show or set)",
            other
        ))),
    }
}

fn show_config(context: &ShellContext) {
    let config = &context.config;
    let export_dir = config.export_target(context.config_manager.base_dir());
    output_section("Configuration");
    io::print_info(format!(
        "  export_dir       : {}{}",
        export_dir.display(),
        if config.export_dir.is_none() { " (default)" } else { "" }
    ));
    io::print_info(format!("  amount_precision : {}", config.amount_precision));
    io::print_info(format!(
        "  color            : {}",
        if config.color { "on" } else { "off" }
    ));
    io::print_info(format!(
        "  file             : {}",
        context.config_manager.path().display()
    ));
}
