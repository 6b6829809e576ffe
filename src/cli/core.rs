//! Dispatch, error reporting, and shared helpers for command handlers.

use std::io;

use dialoguer::theme::ColorfulTheme;
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use tracing::warn;
use uuid::Uuid;

use crate::{
    config::{Config, ConfigManager},
    core::errors::BudgetError,
    core::services::Totals,
    ledger::FilterCriteria,
    session::{EditState, FormField, Session, SubmitOutcome},
};

pub use crate::core::errors::CliError;

use super::commands::{self, CommandRegistry};
use super::forms::{FormResult, TransactionWizard};
use super::io as cli_io;
use super::output::{self, section as output_section, OutputPreferences};
pub use super::shell_context::{CliMode, ShellContext};
use super::ui::table_renderer::{Table, TableColumn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

impl ShellContext {
    pub fn new(mode: CliMode) -> Self {
        Self::with_config_manager(mode, ConfigManager::new())
    }

    pub fn with_config_manager(mode: CliMode, config_manager: ConfigManager) -> Self {
        let config = match config_manager.load() {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %config_manager.path().display(), error = %err, "config unreadable");
                cli_io::print_warning(format!("Ignoring unreadable config: {}", err));
                Config::default()
            }
        };
        apply_output_preferences(&config);

        Self {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            session: Session::new(),
            theme: ColorfulTheme::default(),
            config_manager,
            config,
        }
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn prompt(&self) -> String {
        let mut prompt = String::from("budget");
        if !self.session.criteria().is_unset() {
            prompt.push_str(" (filtered)");
        }
        if let EditState::Editing(id) = self.session.edit_state() {
            prompt.push_str(&format!(" [edit {}]", short_id(id)));
        }
        prompt.push_str("> ");
        prompt
    }

    pub(crate) fn can_prompt(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = self.closest_command(input) {
            cli_io::print_info(format!("Suggestion: `{}`?", best));
        }
    }

    fn closest_command(&self, input: &str) -> Option<&'static str> {
        let needle = input.to_lowercase();
        self.registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance)
            .filter(|(distance, _)| *distance <= 3)
            .map(|(_, name)| name)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action(&self.theme, "Exit shell?", true)?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                self.print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Core(BudgetError::MissingField(field)) => {
                self.print_error(&format!("Cannot submit: {} is required.", field));
                self.print_hint(&format!(
                    "Use `set {} <value>` and then `submit`, or `cancel`.",
                    field
                ));
                Ok(())
            }
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        cli_io::print_error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    pub(crate) fn print_hint(&self, message: &str) {
        cli_io::print_hint(message);
    }

    pub(crate) fn format_amount(&self, amount: f64) -> String {
        format!("{:.*}", self.config.amount_precision, amount)
    }

    /// Resolves a row number or id prefix typed by the user.
    pub(crate) fn resolve_reference(&self, reference: &str) -> Result<Uuid, CommandError> {
        Ok(self.session.resolve(reference)?)
    }

    /// Stages the four positional form values `date amount type category`.
    pub(crate) fn stage_form_values(&mut self, values: &[&str]) -> CommandResult {
        let [date, amount, kind, category] = values else {
            return Err(CommandError::InvalidArguments(
                "expected <date> <amount> <income|expense> <category>".into(),
            ));
        };
        let session = &mut self.session;
        session.set_form_field(FormField::Date, date)?;
        session.set_form_field(FormField::Amount, amount)?;
        session.set_form_field(FormField::Type, kind)?;
        session.set_form_field(FormField::Category, category)?;
        Ok(())
    }

    /// Prompts for every field, then submits. Returns without changes when the
    /// user backs out.
    pub(crate) fn run_transaction_wizard(&mut self) -> CommandResult {
        let wizard = TransactionWizard::new(&self.theme, self.session.form());
        match wizard.run()? {
            FormResult::Completed(form) => {
                let values = [
                    form.date.as_str(),
                    form.amount.as_str(),
                    form.kind.as_str(),
                    form.category.as_str(),
                ];
                self.stage_form_values(&values)?;
                self.submit_form()
            }
            FormResult::Cancelled => {
                cli_io::print_info("Operation cancelled.");
                Ok(())
            }
        }
    }

    pub(crate) fn submit_form(&mut self) -> CommandResult {
        match self.session.submit()? {
            SubmitOutcome::Added(id) => {
                cli_io::print_success(format!("Transaction {} added.", short_id(id)))
            }
            SubmitOutcome::Updated(id) => {
                cli_io::print_success(format!("Transaction {} updated.", short_id(id)))
            }
        }
        Ok(())
    }

    pub(crate) fn show_form(&self) {
        output_section("Form");
        match self.session.edit_state() {
            EditState::Idle => cli_io::print_info("  Mode    : new transaction"),
            EditState::Editing(id) => {
                cli_io::print_info(format!("  Mode    : editing {}", short_id(id)))
            }
        }
        let form = self.session.form();
        cli_io::print_info(format!("  Date    : {}", or_unset(&form.date)));
        cli_io::print_info(format!("  Amount  : {}", or_unset(&form.amount)));
        cli_io::print_info(format!("  Type    : {}", form.kind));
        cli_io::print_info(format!("  Category: {}", form.category));
    }

    pub(crate) fn show_criteria(&self) {
        let criteria: &FilterCriteria = self.session.criteria();
        if criteria.is_unset() {
            cli_io::print_info("Filter: none");
        } else {
            cli_io::print_info(format!("Filter: {}", criteria));
        }
    }

    /// Renders the filtered view with row numbers usable by `edit`/`delete`.
    pub(crate) fn render_view(&self) {
        let view = self.session.view();
        output_section("Transactions");
        self.show_criteria();

        if view.is_empty() {
            if self.session.ledger().is_empty() {
                cli_io::print_info("No transactions recorded yet. Use `add` to create one.");
            } else {
                cli_io::print_info("No transactions match the current filter.");
            }
        } else {
            let editing = match self.session.edit_state() {
                EditState::Editing(id) => Some(id),
                EditState::Idle => None,
            };
            let mut table = Table::new(vec![
                TableColumn::right("#"),
                TableColumn::left("Date"),
                TableColumn::left("Type"),
                TableColumn::left("Category"),
                TableColumn::right("Amount"),
                TableColumn::left("Id"),
            ]);
            for (idx, txn) in view.rows.iter().enumerate() {
                let marker = if editing == Some(txn.id) { "*" } else { "" };
                table.push_row(vec![
                    format!("{}{}", idx + 1, marker),
                    txn.date.format("%Y-%m-%d").to_string(),
                    txn.kind.label().to_string(),
                    txn.category.label().to_string(),
                    self.format_amount(txn.amount),
                    short_id(txn.id),
                ]);
            }
            output::raw(table.render());
        }

        self.print_totals(&view.totals);
        cli_io::print_info(format!(
            "Showing {} of {} transactions.",
            view.len(),
            self.session.ledger().len()
        ));
    }

    pub(crate) fn print_totals(&self, totals: &Totals) {
        cli_io::print_info(format!(
            "  Total income : {}",
            self.format_amount(totals.total_income)
        ));
        cli_io::print_info(format!(
            "  Total expense: {}",
            self.format_amount(totals.total_expense)
        ));
        cli_io::print_info(format!(
            "  Balance      : {}",
            self.format_amount(totals.balance)
        ));
    }

    pub(crate) fn persist_config(&mut self, config: Config) -> CommandResult {
        self.config_manager.save(&config)?;
        apply_output_preferences(&config);
        self.config = config;
        Ok(())
    }
}

pub(crate) fn apply_output_preferences(config: &Config) {
    output::set_preferences(OutputPreferences {
        plain_mode: !config.color,
    });
}

pub(crate) fn short_id(id: Uuid) -> String {
    let mut short = id.simple().to_string();
    short.truncate(8);
    short
}

fn or_unset(value: &str) -> &str {
    if value.is_empty() {
        "<unset>"
    } else {
        value
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] BudgetError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Core(inner) => CliError::Core(inner),
            other => CliError::Command(other.to_string()),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<ReadlineError> for CliError {
    fn from(err: ReadlineError) -> Self {
        CliError::Command(err.to_string())
    }
}

#[cfg(test)]
pub(crate) fn process_script(
    base: &std::path::Path,
    lines: &[&str],
) -> Result<ShellContext, CliError> {
    let manager = ConfigManager::with_base_dir(base.to_path_buf());
    let mut app = ShellContext::with_config_manager(CliMode::Script, manager);
    for line in lines {
        if crate::cli::shell::run_line(&mut app, line)? == LoopControl::Exit {
            break;
        }
    }
    Ok(app)
}
