//! shelltree - demo shell over stdin/stdout.
//!
//! Registers a handful of sample commands and runs the prompt loop until
//! `exit` or end of input. Logs go to stderr so they never mix with the
//! prompt.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tokio::io::BufReader;
use tracing::info;

use shelltree::{Action, CommandOption, CommandSpec, Parameter, Shell, ShellConfig, Value};

#[derive(Parser, Debug)]
#[command(name = "shelltree")]
#[command(about = "Interactive demo for the shelltree command interpreter")]
#[command(version)]
struct Args {
    /// TOML file with session settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Prompt delimiter (overrides the config file)
    #[arg(long)]
    delimiter: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.parse().unwrap_or_default()),
        )
        .init();

    let mut config = match &args.config {
        Some(path) => ShellConfig::load_from_path(path),
        None => ShellConfig::default(),
    };
    if let Some(delimiter) = args.delimiter {
        config.delimiter = delimiter;
    }
    config.name.get_or_insert_with(|| "shelltree".to_string());
    config
        .version
        .get_or_insert_with(|| env!("CARGO_PKG_VERSION").to_string());

    let mut shell = Shell::with_config(config);
    register_demo_commands(&mut shell).context("failed to register demo commands")?;

    info!("Starting shelltree v{}", env!("CARGO_PKG_VERSION"));
    shell
        .show(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await?;
    Ok(())
}

fn register_demo_commands(shell: &mut Shell) -> Result<()> {
    shell
        .add_command(
            "echo",
            CommandSpec::new(Action::sync(|params, flags| {
                let line = words(params.list("words").unwrap_or_default()).join(" ");
                if flags.is_set("upper") {
                    println!("{}", line.to_uppercase());
                } else {
                    println!("{line}");
                }
                Ok(())
            }))
            .description("Print the words back")
            .option(CommandOption::new("upper").description("Uppercase the output"))
            .parameter(Parameter::new("words").rest()),
        )?
        .add_command(
            "sum",
            CommandSpec::new(Action::sync(|params, _| {
                let total: f64 = numbers(params.list("values").unwrap_or_default()).sum();
                println!("{total}");
                Ok(())
            }))
            .description("Add numbers")
            .parameter(Parameter::new("values").number().rest()),
        )?
        .add_command(
            "greet",
            CommandSpec::new(Action::sync(|params, flags| {
                let name = params.str("name").unwrap_or_default();
                let greeting = params.str("greeting").unwrap_or("Hello");
                let line = format!("{greeting}, {name}!");
                if flags.is_set("loud") {
                    println!("{}", line.to_uppercase());
                } else {
                    println!("{line}");
                }
                Ok(())
            }))
            .description("Greet someone")
            .option(CommandOption::new("loud").description("Shout"))
            .parameter(Parameter::new("name").description("Who to greet"))
            .parameter(
                Parameter::new("greeting")
                    .optional()
                    .description("Defaults to Hello"),
            )
            .alias("hi"),
        )?
        .add_command(
            "math",
            CommandSpec::new(Action::noop())
                .description("Arithmetic")
                .subcommand(
                    "add",
                    CommandSpec::new(Action::sync(|params, _| {
                        println!("{}", binary(&params, |a, b| a + b));
                        Ok(())
                    }))
                    .description("Add two numbers")
                    .parameters([
                        Parameter::new("a").number(),
                        Parameter::new("b").number(),
                    ]),
                )
                .subcommand(
                    "mul",
                    CommandSpec::new(Action::sync(|params, _| {
                        println!("{}", binary(&params, |a, b| a * b));
                        Ok(())
                    }))
                    .description("Multiply two numbers")
                    .parameters([
                        Parameter::new("a").number(),
                        Parameter::new("b").number(),
                    ]),
                ),
        )?
        .add_command(
            "sleep",
            CommandSpec::new(Action::future(|params, _| async move {
                let ms = params.number("ms").unwrap_or_default();
                if !ms.is_finite() || ms < 0.0 {
                    bail!("cannot sleep for {ms} ms");
                }
                tokio::time::sleep(Duration::from_millis(ms as u64)).await;
                println!("slept {ms} ms");
                Ok(())
            }))
            .description("Wait, then report")
            .parameter(Parameter::new("ms").number()),
        )?
        .add_command(
            "fail",
            CommandSpec::new(Action::sync(|_, _| bail!("this command always fails")))
                .description("Report a failure"),
        )?
        .add_exit_command("exit")?;
    Ok(())
}

fn words(values: &[Value]) -> Vec<&str> {
    values.iter().filter_map(Value::as_str).collect()
}

fn numbers(values: &[Value]) -> impl Iterator<Item = f64> + '_ {
    values.iter().filter_map(Value::as_number)
}

fn binary(params: &shelltree::Params, op: impl Fn(f64, f64) -> f64) -> f64 {
    let a = params.number("a").unwrap_or_default();
    let b = params.number("b").unwrap_or_default();
    op(a, b)
}
