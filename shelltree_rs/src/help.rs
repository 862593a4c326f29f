//! Help text generation for registered commands.
//!
//! The session decides when help is shown and for which command path; a
//! [`HelpRenderer`] decides what it looks like. [`TableHelp`] is the default.

use std::sync::Arc;

use crate::command::{Command, Parameter, Registry};
use crate::config::ShellConfig;

/// Renders help text. Implement this to replace the default layout.
pub trait HelpRenderer: Send + Sync {
    /// Top-level listing of every registered command.
    fn overview(&self, registry: &Registry, config: &ShellConfig) -> String;

    /// Usage for one command; `path` is the command as typed, e.g. `do something`.
    fn command(&self, path: &str, command: &Command, config: &ShellConfig) -> String;
}

/// Two-column layout: usage on the left, description on the right.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableHelp;

const MIN_COLUMN_WIDTH: usize = 30;
const INDENT: &str = "    ";

impl HelpRenderer for TableHelp {
    fn overview(&self, registry: &Registry, config: &ShellConfig) -> String {
        let mut help = String::new();

        if let Some(name) = &config.name {
            match &config.version {
                Some(version) => help.push_str(&format!("\n{name} - {version}\n")),
                None => help.push_str(&format!("\n{name}\n")),
            }
        }
        if let Some(info) = &config.info {
            help.push_str(&format!("\n{info}\n"));
        }

        help.push_str(&format!("\nUsage:\n\n{INDENT}<cmd>\n\n"));
        help.push_str("Available commands:\n\n");

        let mut rows = vec![(
            format!("{} <cmd>", config.help_command),
            "Show help for a command".to_string(),
        )];
        rows.extend(
            registry
                .commands()
                .map(|cmd| (usage(cmd.name(), cmd), summary(registry, cmd))),
        );
        help.push_str(&columns(&rows));
        help.push('\n');
        help
    }

    fn command(&self, path: &str, command: &Command, config: &ShellConfig) -> String {
        let mut help = String::from("\n");

        if let Some(description) = command.description() {
            help.push_str(&format!("{description}\n\n"));
        }

        help.push_str("Usage:\n\n");
        help.push_str(&format!("{INDENT}{}\n\n", usage(path, command)));

        if !command.options().is_empty() {
            help.push_str("Options:\n\n");
            let rows: Vec<_> = command
                .options()
                .iter()
                .map(|opt| {
                    (
                        format!("{}{}", config.option_sigil, opt.label),
                        opt.description.clone().unwrap_or_default(),
                    )
                })
                .collect();
            help.push_str(&columns(&rows));
            help.push('\n');
        }

        let params: Vec<_> = command
            .parameters()
            .iter()
            .filter_map(|p| {
                p.description
                    .as_ref()
                    .map(|d| (parameter_token(p), d.clone()))
            })
            .collect();
        if !params.is_empty() {
            help.push_str("Parameters:\n\n");
            help.push_str(&columns(&params));
            help.push('\n');
        }

        if !command.subcommands().is_empty() {
            help.push_str("Sub-Commands:\n\n");
            let rows: Vec<_> = command
                .subcommands()
                .commands()
                .map(|sub| (usage(sub.name(), sub), summary(command.subcommands(), sub)))
                .collect();
            help.push_str(&columns(&rows));
            help.push('\n');
        }

        help
    }
}

/// `name [options] <required> [optional] <rest...>`
fn usage(name: &str, command: &Command) -> String {
    let mut usage = name.to_string();
    if !command.options().is_empty() {
        usage.push_str(" [options]");
    }
    for param in command.parameters() {
        usage.push(' ');
        usage.push_str(&parameter_token(param));
    }
    usage
}

fn parameter_token(param: &Parameter) -> String {
    if param.rest {
        format!("<{}...>", param.label)
    } else if param.optional {
        format!("[{}]", param.label)
    } else {
        format!("<{}>", param.label)
    }
}

/// Description plus the aliases that still resolve in `registry`.
fn summary(registry: &Registry, command: &Arc<Command>) -> String {
    let description = command.description().unwrap_or_default();
    let aliases = registry.aliases_of(command);
    if aliases.is_empty() {
        return description.to_string();
    }
    let aliases = format!("(aliases: {})", aliases.join(", "));
    if description.is_empty() {
        aliases
    } else {
        format!("{description} {aliases}")
    }
}

/// Left column padded to at least `MIN_COLUMN_WIDTH`, whole table indented.
fn columns(rows: &[(String, String)]) -> String {
    let width = rows
        .iter()
        .map(|(left, _)| left.chars().count() + 1)
        .max()
        .unwrap_or(0)
        .max(MIN_COLUMN_WIDTH);

    rows.iter()
        .map(|(left, right)| {
            let line = format!("{INDENT}{left:<width$}{right}");
            format!("{}\n", line.trim_end())
        })
        .collect()
}
