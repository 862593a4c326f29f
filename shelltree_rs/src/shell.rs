//! The interactive session: registration API and the prompt-read-execute loop.
//!
//! ```text
//!   prompt ──► read line ──► tokenize ──► help? ──► render help
//!     ▲                                      │
//!     │                                      ▼
//!     │                         resolve → flags → bind → dispatch
//!     │                                      │
//!     └──────── while active ◄───────────────┘
//! ```
//!
//! Only one line is in flight at a time. Registration needs `&mut Shell`,
//! which the running loop holds, so the tree never changes mid-dispatch.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::command::{Action, CommandEntry, CommandSpec, Registry};
use crate::config::ShellConfig;
use crate::dispatch::dispatch;
use crate::error::{ParseError, RegistrationError};
use crate::help::{HelpRenderer, TableHelp};
use crate::parser::{Invocation, parse_invocation, resolve, suggest_similar_command, tokenize};

/// Whether the loop issues new prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Inactive,
    Active,
}

/// Cloneable switch for the session, usable from inside actions.
///
/// Hiding stops the next prompt; it never interrupts a running action.
#[derive(Debug, Clone, Default)]
pub struct ShellHandle {
    active: Arc<AtomicBool>,
}

impl ShellHandle {
    pub fn hide(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> SessionState {
        if self.is_active() {
            SessionState::Active
        } else {
            SessionState::Inactive
        }
    }

    fn activate(&self) {
        self.active.store(true, Ordering::SeqCst);
    }
}

/// What happened to one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// The help keyword was used.
    Help,
    /// The action ran and completed.
    Completed,
    /// The action (or a parameter converter) failed; the failure was reported.
    Failed,
    /// No command matched.
    NotFound,
    /// The command matched but its flags or parameters did not.
    Rejected,
}

/// An embeddable command interpreter.
///
/// ```no_run
/// use shelltree::{Action, CommandSpec, Parameter, Shell};
/// use tokio::io::BufReader;
///
/// # async fn run() -> anyhow::Result<()> {
/// let mut shell = Shell::new();
/// shell
///     .add_command(
///         "greet",
///         CommandSpec::new(Action::sync(|params, flags| {
///             let name = params.str("name").unwrap_or("world");
///             if flags.is_set("loud") {
///                 println!("HELLO {}!", name.to_uppercase());
///             } else {
///                 println!("hello {name}");
///             }
///             Ok(())
///         }))
///         .option("loud")
///         .parameter(Parameter::new("name").optional()),
///     )?
///     .add_exit_command("exit")?;
///
/// shell
///     .show(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct Shell {
    registry: Registry,
    config: ShellConfig,
    help: Box<dyn HelpRenderer>,
    handle: ShellHandle,
}

impl Default for Shell {
    fn default() -> Self {
        Self::with_config(ShellConfig::default())
    }
}

impl Shell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ShellConfig) -> Self {
        Self {
            registry: Registry::new(),
            config,
            help: Box::new(TableHelp),
            handle: ShellHandle::default(),
        }
    }

    /// Replace the default help layout.
    pub fn with_help_renderer(mut self, renderer: impl HelpRenderer + 'static) -> Self {
        self.help = Box::new(renderer);
        self
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn set_delimiter(&mut self, delimiter: impl Into<String>) -> &mut Self {
        self.config.delimiter = delimiter.into();
        self
    }

    pub fn delimiter(&self) -> &str {
        &self.config.delimiter
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register a command (or bare action) under `name`, with its aliases and
    /// subcommands. Parameter ordering and alias collisions are checked here.
    pub fn add_command(
        &mut self,
        name: impl Into<String>,
        entry: impl Into<CommandEntry>,
    ) -> Result<&mut Self, RegistrationError> {
        let command = self.registry.insert(name, entry)?;
        debug!(command = command.name(), aliases = ?command.aliases(), "registered command");
        Ok(self)
    }

    /// Register several commands. Stops at the first error; commands before
    /// it stay registered.
    pub fn add_commands<I, N, E>(&mut self, commands: I) -> Result<&mut Self, RegistrationError>
    where
        I: IntoIterator<Item = (N, E)>,
        N: Into<String>,
        E: Into<CommandEntry>,
    {
        for (name, entry) in commands {
            self.add_command(name, entry)?;
        }
        Ok(self)
    }

    /// Remove a command (and its aliases) or a single alias.
    /// Returns whether anything was registered under `name`.
    pub fn remove_command(&mut self, name: &str) -> bool {
        self.registry.remove(name)
    }

    pub fn remove_all_commands(&mut self) -> &mut Self {
        self.registry.clear();
        self
    }

    /// Register a command that ends the session. The process keeps running;
    /// [`Shell::show`] returns once the current line finishes.
    pub fn add_exit_command(&mut self, name: impl Into<String>) -> Result<&mut Self, RegistrationError> {
        let handle = self.handle();
        self.add_command(
            name,
            CommandSpec::new(Action::sync(move |_, _| {
                handle.hide();
                Ok(())
            }))
            .description("Leave the shell"),
        )
    }

    pub fn has_command(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Distinct commands at the top level; aliases are not counted.
    pub fn command_count(&self) -> usize {
        self.registry.command_count()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    // ------------------------------------------------------------------
    // Session state
    // ------------------------------------------------------------------

    pub fn handle(&self) -> ShellHandle {
        self.handle.clone()
    }

    pub fn state(&self) -> SessionState {
        self.handle.state()
    }

    pub fn hide(&self) -> &Self {
        self.handle.hide();
        self
    }

    /// Activate the session and run the loop until it is hidden or `input`
    /// reaches end of file. Command failures are reported to `output` and
    /// never end the loop; only I/O errors on `input`/`output` do.
    pub async fn show<R, W>(&mut self, mut input: R, mut output: W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        self.handle.activate();
        info!(
            delimiter = %self.config.delimiter,
            commands = self.command_count(),
            "session started"
        );

        let mut buf = Vec::new();
        while self.handle.is_active() {
            output
                .write_all(format!("{} ", self.config.delimiter).as_bytes())
                .await?;
            output.flush().await?;

            buf.clear();
            if input.read_until(b'\n', &mut buf).await? == 0 {
                debug!("input closed");
                self.handle.hide();
                break;
            }
            let line = decode_line(&buf);

            let outcome = self.execute(&line, &mut output).await?;
            debug!(line = %line, outcome = ?outcome, "line done");
        }

        info!("session ended");
        Ok(())
    }

    /// Run one input line through the pipeline, writing any help or failure
    /// report to `output`.
    pub async fn execute<W>(&self, line: &str, output: &mut W) -> io::Result<LineOutcome>
    where
        W: AsyncWrite + Unpin,
    {
        let tokens = tokenize(line);

        if tokens.first() == Some(&self.config.help_command) {
            let text = self.help_text(&tokens[1..]);
            output.write_all(text.as_bytes()).await?;
            output.flush().await?;
            return Ok(LineOutcome::Help);
        }

        let outcome = match self.parse(&tokens) {
            Ok(invocation) => {
                match dispatch(&invocation.command, invocation.params, invocation.flags).await {
                    Ok(()) => LineOutcome::Completed,
                    Err(err) => {
                        self.report_failure(&invocation.path.join(" "), &err, output)
                            .await?;
                        LineOutcome::Failed
                    }
                }
            }
            Err(ParseError::NotFound(name)) => {
                self.report_not_found(&name, output).await?;
                LineOutcome::NotFound
            }
            Err(ParseError::Invalid { reason }) => {
                debug!(reason = %reason, "rejected line");
                let text = format!("{reason}\n{}", self.help_text(&tokens));
                output.write_all(text.as_bytes()).await?;
                LineOutcome::Rejected
            }
            Err(err @ ParseError::Conversion { .. }) => {
                let path = self.command_path(&tokens);
                let err = anyhow::Error::new(err);
                self.report_failure(&path, &err, output).await?;
                LineOutcome::Failed
            }
        };

        output.flush().await?;
        Ok(outcome)
    }

    /// Resolve, extract flags and bind parameters without running anything.
    pub fn parse(&self, tokens: &[String]) -> Result<Invocation, ParseError> {
        parse_invocation(tokens, &self.registry, self.config.option_sigil)
    }

    /// Help for a partial command path: the overview when `tokens` is empty
    /// or names nothing, otherwise usage for the deepest matched command.
    pub fn help_text(&self, tokens: &[String]) -> String {
        match resolve(tokens, &self.registry) {
            Some(resolution) => {
                let path = tokens[..resolution.consumed].join(" ");
                self.help.command(&path, resolution.command, &self.config)
            }
            None => self.help.overview(&self.registry, &self.config),
        }
    }

    /// The command path as typed, e.g. `do something`; empty when nothing
    /// matches.
    fn command_path(&self, tokens: &[String]) -> String {
        resolve(tokens, &self.registry)
            .map(|resolution| tokens[..resolution.consumed].join(" "))
            .unwrap_or_default()
    }

    async fn report_not_found<W>(&self, name: &str, output: &mut W) -> io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let mut text = format!("{}\n", self.config.invalid_command_message);
        if self.config.suggest_similar
            && !name.is_empty()
            && let Some(suggestion) = suggest_similar_command(name, self.registry.names())
        {
            text.push_str(&format!("Did you mean: {suggestion}?\n"));
        }
        text.push_str(&self.help.overview(&self.registry, &self.config));
        output.write_all(text.as_bytes()).await
    }

    async fn report_failure<W>(
        &self,
        path: &str,
        err: &anyhow::Error,
        output: &mut W,
    ) -> io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let message = format!("{err:#}");
        warn!(command = path, error = %message, "command failed");
        output
            .write_all(format!("Error: {message}\n").as_bytes())
            .await
    }
}

/// Lossy UTF-8 with the `\n` or `\r\n` terminator stripped, so a stray
/// byte reaches the pipeline instead of ending the session.
fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
