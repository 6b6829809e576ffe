use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::ledger::FilterField;

const USAGE: &str = "usage: filter [<type|category|from|to> <value>]... | filter reset";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "filter",
        "Show or change the list filter",
        "filter [<type|category|from|to> <value>]... | filter reset",
        cmd_filter,
    )]
}

fn cmd_filter(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            context.show_criteria();
            io::print_hint("Use `filter <field> <value>`; `all` clears a field.");
            return Ok(());
        }
        [keyword]
            if keyword.eq_ignore_ascii_case("reset") || keyword.eq_ignore_ascii_case("clear") =>
        {
            context.session.reset_filter();
            io::print_success("Filter cleared.");
            return Ok(());
        }
        _ => {}
    }

    let updates = parse_updates(args)?;

    // Validate the whole line before touching the session.
    let mut staged = context.session.criteria().clone();
    for (field, value) in &updates {
        staged.set(*field, value)?;
    }
    for (field, value) in &updates {
        context.session.set_filter(*field, value)?;
    }

    context.show_criteria();
    let view = context.session.view();
    io::print_info(format!(
        "{} of {} transactions match.",
        view.len(),
        context.session.ledger().len()
    ));
    Ok(())
}

/// `filter type` alone clears that field; otherwise arguments come in pairs.
fn parse_updates<'a>(args: &[&'a str]) -> Result<Vec<(FilterField, &'a str)>, CommandError> {
    if let [field] = args {
        return Ok(vec![(field.parse()?, "")]);
    }
    if args.len() % 2 != 0 {
        return Err(CommandError::InvalidArguments(USAGE.into()));
    }
    args.chunks(2)
        .map(|pair| -> Result<_, CommandError> {
            Ok((pair[0].parse::<FilterField>()?, pair[1]))
        })
        .collect()
}
