//! Command declarations and their canonical, validated form.

use super::action::Action;
use super::option::CommandOption;
use super::parameter::Parameter;
use super::registry::Registry;
use crate::error::RegistrationError;

/// What a caller registers under a name: either a bare action or a full
/// declaration. Both normalize into a [`Command`] at registration time.
#[derive(Debug, Clone)]
pub enum CommandEntry {
    Bare(Action),
    Full(CommandSpec),
}

impl From<Action> for CommandEntry {
    fn from(action: Action) -> Self {
        CommandEntry::Bare(action)
    }
}

impl From<CommandSpec> for CommandEntry {
    fn from(spec: CommandSpec) -> Self {
        CommandEntry::Full(spec)
    }
}

/// Full command declaration, built fluently.
///
/// ```
/// use shelltree::{Action, CommandSpec, Parameter};
///
/// let spec = CommandSpec::new(Action::noop())
///     .description("Copy files")
///     .option("force")
///     .parameter("from")
///     .parameter(Parameter::new("to").optional())
///     .alias("cp");
/// # let _ = spec;
/// ```
#[derive(Debug, Clone)]
pub struct CommandSpec {
    action: Action,
    description: Option<String>,
    options: Vec<CommandOption>,
    parameters: Vec<Parameter>,
    subcommands: Vec<(String, CommandEntry)>,
    aliases: Vec<String>,
}

impl CommandSpec {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            description: None,
            options: Vec::new(),
            parameters: Vec::new(),
            subcommands: Vec::new(),
            aliases: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn option(mut self, option: impl Into<CommandOption>) -> Self {
        self.options.push(option.into());
        self
    }

    pub fn options<I, O>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<CommandOption>,
    {
        self.options.extend(options.into_iter().map(Into::into));
        self
    }

    pub fn parameter(mut self, parameter: impl Into<Parameter>) -> Self {
        self.parameters.push(parameter.into());
        self
    }

    pub fn parameters<I, P>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Parameter>,
    {
        self.parameters
            .extend(parameters.into_iter().map(Into::into));
        self
    }

    pub fn subcommand(mut self, name: impl Into<String>, entry: impl Into<CommandEntry>) -> Self {
        self.subcommands.push((name.into(), entry.into()));
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }
}

/// A registered command. Immutable once built; its subcommand registry is
/// owned exclusively.
#[derive(Debug, Clone)]
pub struct Command {
    name: String,
    action: Action,
    description: Option<String>,
    options: Vec<CommandOption>,
    parameters: Vec<Parameter>,
    subcommands: Registry,
    aliases: Vec<String>,
}

impl Command {
    /// Normalize and validate an entry. Subcommands are registered
    /// recursively, so their parameter and alias errors surface here too.
    pub(crate) fn from_entry(name: &str, entry: CommandEntry) -> Result<Self, RegistrationError> {
        let spec = match entry {
            CommandEntry::Bare(action) => CommandSpec::new(action),
            CommandEntry::Full(spec) => spec,
        };

        validate_parameters(name, &spec.parameters)?;

        let mut subcommands = Registry::new();
        for (sub_name, sub_entry) in spec.subcommands {
            subcommands.insert(sub_name, sub_entry)?;
        }

        Ok(Self {
            name: name.to_string(),
            action: spec.action,
            description: spec.description,
            options: spec.options,
            parameters: spec.parameters,
            subcommands,
            aliases: spec.aliases,
        })
    }

    /// Name the command was registered under (never an alias).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn options(&self) -> &[CommandOption] {
        &self.options
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn subcommands(&self) -> &Registry {
        &self.subcommands
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn required_count(&self) -> usize {
        self.parameters.iter().filter(|p| p.is_required()).count()
    }

    pub fn optional_count(&self) -> usize {
        self.parameters.iter().filter(|p| p.is_optional()).count()
    }

    pub fn rest_parameter(&self) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.rest)
    }
}

/// Required parameters must precede optional ones; a rest parameter, if
/// any, must come last (which also rules out a second one).
fn validate_parameters(command: &str, parameters: &[Parameter]) -> Result<(), RegistrationError> {
    let mut first_optional: Option<&str> = None;

    for (idx, param) in parameters.iter().enumerate() {
        if param.rest {
            if idx + 1 != parameters.len() {
                return Err(RegistrationError::RestNotLast {
                    command: command.to_string(),
                    label: param.label.clone(),
                });
            }
            continue;
        }

        if param.optional {
            first_optional.get_or_insert(param.label.as_str());
        } else if let Some(optional) = first_optional {
            return Err(RegistrationError::RequiredAfterOptional {
                command: command.to_string(),
                label: param.label.clone(),
                optional: optional.to_string(),
            });
        }
    }

    Ok(())
}
