use crate::cli::commands::CommandDefinition;
use crate::cli::core::{short_id, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::session::FormField;

const ADD_USAGE: &str = "usage: add <date> <amount> <income|expense> <salary|groceries|bills|other>";
const EDIT_USAGE: &str = "usage: edit <row|id> [<date> <amount> <type> <category>]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "add",
            "Record a new transaction",
            "add [<date> <amount> <income|expense> <category>]",
            cmd_add,
        ),
        CommandDefinition::new(
            "edit",
            "Load a transaction into the form for editing",
            "edit <row|id> [<date> <amount> <type> <category>]",
            cmd_edit,
        ),
        CommandDefinition::new(
            "set",
            "Change one field of the pending form",
            "set <date|amount|type|category> <value>",
            cmd_set,
        ),
        CommandDefinition::new(
            "form",
            "Show the pending form and edit state",
            "form",
            cmd_form,
        ),
        CommandDefinition::new("submit", "Save the pending form", "submit", cmd_submit),
        CommandDefinition::new(
            "cancel",
            "Discard the pending form and stop editing",
            "cancel",
            cmd_cancel,
        ),
        CommandDefinition::new(
            "delete",
            "Remove a transaction",
            "delete <row|id>",
            cmd_delete,
        ),
        CommandDefinition::new(
            "list",
            "Show filtered transactions with totals",
            "list",
            cmd_list,
        ),
        CommandDefinition::new(
            "summary",
            "Show totals for the filtered transactions",
            "summary",
            cmd_summary,
        ),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if context.session.is_editing() {
        return Err(CommandError::InvalidArguments(
            "an edit is in progress; `submit` or `cancel` it first".into(),
        ));
    }
    match args.len() {
        0 if context.can_prompt() => context.run_transaction_wizard(),
        4 => {
            let result = context
                .stage_form_values(args)
                .and_then(|()| context.submit_form());
            if result.is_err() {
                // Rejected values must not linger for a later `submit`.
                context.session.cancel_edit();
            }
            result
        }
        _ => Err(CommandError::InvalidArguments(ADD_USAGE.into())),
    }
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((reference, values)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(EDIT_USAGE.into()));
    };
    if !values.is_empty() && values.len() != 4 {
        return Err(CommandError::InvalidArguments(EDIT_USAGE.into()));
    }

    let id = context.resolve_reference(reference)?;
    context.session.begin_edit(id)?;

    if values.is_empty() && !context.can_prompt() {
        context.show_form();
        io::print_hint("Use `set <field> <value>`, then `submit` or `cancel`.");
        return Ok(());
    }

    // Inline values and the wizard either commit the edit or leave it.
    let result = if values.is_empty() {
        context.run_transaction_wizard()
    } else {
        context
            .stage_form_values(values)
            .and_then(|()| context.submit_form())
    };
    if context.session.is_editing() {
        context.session.cancel_edit();
        io::print_info(format!("Transaction {} left unchanged.", short_id(id)));
    }
    result
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((field, value)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: set <date|amount|type|category> <value>".into(),
        ));
    };
    let field: FormField = field.parse()?;
    let value = value.join(" ");
    context.session.set_form_field(field, &value)?;
    io::print_success(format!("Form {} set to `{}`.", field.as_str(), value.trim()));
    Ok(())
}

fn cmd_form(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.show_form();
    Ok(())
}

fn cmd_submit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.submit_form()
}

fn cmd_cancel(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.session.is_editing() {
        context.session.cancel_edit();
        io::print_info("Edit cancelled.");
    } else if !context.session.form().is_blank() {
        context.session.cancel_edit();
        io::print_info("Form cleared.");
    } else {
        io::print_info("Nothing to cancel.");
    }
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [reference] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: delete <row|id>".into(),
        ));
    };
    let id = context.resolve_reference(reference)?;
    let was_editing = context.session.is_editing();
    let removed = context.session.delete(id)?;

    io::print_success(format!(
        "Deleted {} {} {} {} ({}).",
        removed.date,
        removed.kind,
        removed.category,
        context.format_amount(removed.amount),
        short_id(removed.id)
    ));
    if was_editing && !context.session.is_editing() {
        io::print_info("The deleted transaction was being edited; edit cancelled.");
    }
    Ok(())
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.render_view();
    Ok(())
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let view = context.session.view();
    output_section("Summary");
    context.show_criteria();
    context.print_totals(&view.totals);
    io::print_info(format!(
        "Matching transactions: {} of {}",
        view.len(),
        context.session.ledger().len()
    ));
    Ok(())
}
