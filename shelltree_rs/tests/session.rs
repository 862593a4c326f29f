//! Session tests: drive the prompt loop with scripted input and inspect what
//! the actions received and what the shell wrote back.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use serde_json::json;
use shelltree::{
    Action, CommandSpec, Flags, Parameter, RegistrationError, SessionState, Shell, Value,
};

type Calls = Arc<Mutex<Vec<(serde_json::Value, Flags)>>>;

fn calls() -> Calls {
    Arc::new(Mutex::new(Vec::new()))
}

/// Action that records its params and flags.
fn recorder(calls: &Calls) -> Action {
    let calls = Arc::clone(calls);
    Action::sync(move |params, flags| {
        calls.lock().unwrap().push((params.to_json(), flags));
        Ok(())
    })
}

async fn run(shell: &mut Shell, input: &str) -> String {
    let mut out = Vec::new();
    shell.show(input.as_bytes(), &mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

fn prompts(output: &str) -> usize {
    output.matches("-> ").count()
}

// ============================================
// Resolution and execution
// ============================================

mod execution {
    use super::*;

    #[tokio::test]
    async fn executes_registered_command() {
        let seen = calls();
        let mut shell = Shell::new();
        shell
            .add_command("hello", CommandSpec::new(recorder(&seen)))
            .unwrap();

        run(&mut shell, "hello\n").await;
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, json!({}));
    }

    #[tokio::test]
    async fn bare_action_shorthand() {
        let seen = calls();
        let mut shell = Shell::new();
        shell.add_command("hello", recorder(&seen)).unwrap();

        run(&mut shell, "hello\n").await;
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn subcommand_runs_instead_of_parent() {
        let parent = calls();
        let child = calls();
        let mut shell = Shell::new();
        shell
            .add_command(
                "bie",
                CommandSpec::new(recorder(&parent)).subcommand("something", recorder(&child)),
            )
            .unwrap();

        run(&mut shell, "bie something\n").await;
        assert!(parent.lock().unwrap().is_empty());
        assert_eq!(child.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn falls_back_to_parent_for_non_subcommand_token() {
        let parent = calls();
        let child = calls();
        let mut shell = Shell::new();
        shell
            .add_command(
                "do",
                CommandSpec::new(recorder(&parent))
                    .parameter(Parameter::new("what"))
                    .subcommand("something", recorder(&child)),
            )
            .unwrap();

        run(&mut shell, "do laundry\n").await;
        assert_eq!(parent.lock().unwrap()[0].0, json!({ "what": "laundry" }));
        assert!(child.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn alias_reaches_the_same_command() {
        let seen = calls();
        let mut shell = Shell::new();
        shell
            .add_command(
                "greet",
                CommandSpec::new(recorder(&seen))
                    .parameter(Parameter::new("name"))
                    .aliases(["hi", "hey"]),
            )
            .unwrap();

        run(&mut shell, "hi ada\nhey bob\ngreet cy\n").await;
        let names: Vec<_> = seen
            .lock()
            .unwrap()
            .iter()
            .map(|(params, _)| params["name"].clone())
            .collect();
        assert_eq!(names, [json!("ada"), json!("bob"), json!("cy")]);
        assert_eq!(shell.command_count(), 1);
    }

    #[tokio::test]
    async fn waits_for_async_action_before_next_prompt() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&order);
        let mut shell = Shell::new();
        shell
            .add_command(
                "slow",
                Action::future(move |_, _| {
                    let log = Arc::clone(&log);
                    async move {
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        log.lock().unwrap().push("slow");
                        Ok(())
                    }
                }),
            )
            .unwrap();
        let log = Arc::clone(&order);
        shell
            .add_command(
                "fast",
                Action::sync(move |_, _| {
                    log.lock().unwrap().push("fast");
                    Ok(())
                }),
            )
            .unwrap();

        run(&mut shell, "slow\nfast\n").await;
        assert_eq!(*order.lock().unwrap(), ["slow", "fast"]);
    }
}

// ============================================
// Parameters and options
// ============================================

mod binding {
    use super::*;

    #[tokio::test]
    async fn converts_parameter_kinds() {
        let seen = calls();
        let mut shell = Shell::new();
        shell
            .add_command(
                "set",
                CommandSpec::new(recorder(&seen)).parameters([
                    Parameter::new("key"),
                    Parameter::new("count").number(),
                    Parameter::new("enabled").boolean(),
                    Parameter::new("point").custom(|raw: &str| {
                        let parts: Vec<Value> = raw
                            .split(',')
                            .map(|p| Value::Number(p.trim().parse().unwrap_or(f64::NAN)))
                            .collect();
                        Ok(Value::List(parts))
                    }),
                ]),
            )
            .unwrap();

        run(&mut shell, "set name 42 False 1,2\n").await;
        assert_eq!(
            seen.lock().unwrap()[0].0,
            json!({ "key": "name", "count": 42.0, "enabled": false, "point": [1.0, 2.0] })
        );
    }

    #[tokio::test]
    async fn string_labels_are_string_parameters() {
        let seen = calls();
        let mut shell = Shell::new();
        shell
            .add_command("pair", CommandSpec::new(recorder(&seen)).parameters(["a", "b"]))
            .unwrap();

        run(&mut shell, "pair 1 2\n").await;
        assert_eq!(seen.lock().unwrap()[0].0, json!({ "a": "1", "b": "2" }));
    }

    #[tokio::test]
    async fn quoted_and_json_tokens() {
        let seen = calls();
        let mut shell = Shell::new();
        shell
            .add_command(
                "test",
                CommandSpec::new(recorder(&seen)).parameters([
                    Parameter::new("text"),
                    Parameter::new("payload").custom(|raw: &str| {
                        Ok(Value::Json(serde_json::from_str(raw)?))
                    }),
                ]),
            )
            .unwrap();

        run(
            &mut shell,
            "test \"This is the 'weather'\" '{\"text\":\"This is the weather\"}'\n",
        )
        .await;
        assert_eq!(
            seen.lock().unwrap()[0].0,
            json!({
                "text": "This is the 'weather'",
                "payload": { "text": "This is the weather" }
            })
        );
    }

    #[tokio::test]
    async fn missing_optional_parameter_is_absent() {
        let seen = calls();
        let mut shell = Shell::new();
        shell
            .add_command(
                "greet",
                CommandSpec::new(recorder(&seen)).parameters([
                    Parameter::new("name"),
                    Parameter::new("greeting").optional(),
                ]),
            )
            .unwrap();

        run(&mut shell, "greet ada\ngreet ada hey\n").await;
        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].0, json!({ "name": "ada" }));
        assert_eq!(seen[1].0, json!({ "name": "ada", "greeting": "hey" }));
    }

    #[tokio::test]
    async fn options_anywhere_on_the_line() {
        let seen = calls();
        let mut shell = Shell::new();
        shell
            .add_command(
                "copy",
                CommandSpec::new(recorder(&seen))
                    .options(["force", "dry"])
                    .parameters(["from", "to"]),
            )
            .unwrap();

        run(&mut shell, "copy @force a b\ncopy a b\n").await;
        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].0, json!({ "from": "a", "to": "b" }));
        assert_eq!(seen[0].1.get("force"), Some(true));
        assert_eq!(seen[0].1.get("dry"), Some(false));
        assert_eq!(seen[1].1.get("force"), Some(false));
    }

    #[tokio::test]
    async fn rest_parameter_collects_tail() {
        let seen = calls();
        let mut shell = Shell::new();
        shell
            .add_command(
                "do",
                CommandSpec::new(Action::noop()).subcommand(
                    "something",
                    CommandSpec::new(recorder(&seen))
                        .parameter(Parameter::new("nums").number().rest()),
                ),
            )
            .unwrap();

        run(&mut shell, "do something 1 2\ndo something\n").await;
        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].0, json!({ "nums": [1.0, 2.0] }));
        assert_eq!(seen[1].0, json!({ "nums": [] }));
    }
}

// ============================================
// Registration
// ============================================

mod registration {
    use super::*;

    #[test]
    fn required_after_optional_is_rejected() {
        let mut shell = Shell::new();
        let err = shell
            .add_command(
                "bad",
                CommandSpec::new(Action::noop())
                    .parameters([Parameter::new("a").optional(), Parameter::new("b")]),
            )
            .err()
            .unwrap();
        assert!(matches!(err, RegistrationError::RequiredAfterOptional { .. }));
        assert!(!shell.has_command("bad"));
    }

    #[test]
    fn rest_must_be_last() {
        let mut shell = Shell::new();
        let err = shell
            .add_command(
                "bad",
                CommandSpec::new(Action::noop())
                    .parameters([Parameter::new("all").rest(), Parameter::new("b").optional()]),
            )
            .err()
            .unwrap();
        assert!(matches!(err, RegistrationError::RestNotLast { .. }));
    }

    #[test]
    fn alias_collision_is_rejected() {
        let mut shell = Shell::new();
        shell
            .add_command("hello", CommandSpec::new(Action::noop()).alias("hi"))
            .unwrap();
        let err = shell
            .add_command("howdy", CommandSpec::new(Action::noop()).alias("hi"))
            .err()
            .unwrap();
        assert_eq!(
            err.to_string(),
            "could not create alias hi for howdy. hi was already taken"
        );
        assert!(!shell.has_command("howdy"));
        assert_eq!(shell.command_count(), 1);
    }

    #[test]
    fn delimiter_and_counts() {
        let mut shell = Shell::new();
        assert_eq!(shell.delimiter(), "->");
        shell.set_delimiter("$");
        assert_eq!(shell.delimiter(), "$");

        shell
            .add_command("a", Action::noop())
            .unwrap()
            .add_command("b", CommandSpec::new(Action::noop()).alias("bee"))
            .unwrap();
        assert_eq!(shell.command_count(), 2);
        assert!(shell.remove_command("b"));
        assert!(!shell.has_command("bee"));
        shell.remove_all_commands();
        assert_eq!(shell.command_count(), 0);
    }
}

// ============================================
// Reporting and help
// ============================================

mod reporting {
    use super::*;

    fn shell() -> Shell {
        let mut shell = Shell::new();
        shell
            .add_command(
                "hello",
                CommandSpec::new(Action::noop())
                    .description("Say hello")
                    .option("loud")
                    .parameter(Parameter::new("name").optional()),
            )
            .unwrap()
            .add_command(
                "fail",
                Action::future(|_, _| async { Err(anyhow!("disk on fire")) }),
            )
            .unwrap();
        shell
    }

    #[tokio::test]
    async fn failed_action_still_prompts_again() {
        let mut shell = shell();
        let out = run(&mut shell, "fail\nhello\n").await;
        assert!(out.contains("Error: disk on fire\n"));
        assert_eq!(prompts(&out), 3);
    }

    #[tokio::test]
    async fn panicking_action_is_reported() {
        let mut shell = shell();
        shell
            .add_command("boom", Action::sync(|_, _| panic!("kaboom")))
            .unwrap();
        let out = run(&mut shell, "boom\n").await;
        assert!(out.contains("Error: command 'boom' panicked: kaboom"));
        assert_eq!(prompts(&out), 2);
    }

    #[tokio::test]
    async fn converter_failure_is_reported_as_error() {
        let mut shell = shell();
        shell
            .add_command(
                "load",
                CommandSpec::new(Action::noop()).parameter(
                    Parameter::new("doc").custom(|raw: &str| {
                        Ok(Value::Json(serde_json::from_str(raw)?))
                    }),
                ),
            )
            .unwrap();
        let out = run(&mut shell, "load {oops\n").await;
        assert!(out.contains("Error: parameter 'doc' could not convert '{oops'"));
    }

    #[tokio::test]
    async fn unknown_command_prints_overview() {
        let mut shell = shell();
        let out = run(&mut shell, "byebye\n").await;
        assert!(out.contains("Invalid Command\n"));
        assert!(out.contains("Available commands:"));
        assert!(out.contains("Say hello"));
        assert!(!out.contains("Did you mean"));
    }

    #[tokio::test]
    async fn unknown_command_suggests_close_name() {
        let mut shell = shell();
        let out = run(&mut shell, "helo\n").await;
        assert!(out.contains("Did you mean: hello?"));
    }

    #[tokio::test]
    async fn blank_line_is_invalid_command() {
        let mut shell = shell();
        let out = run(&mut shell, "\n").await;
        assert!(out.contains("Invalid Command\n"));
    }

    #[tokio::test]
    async fn unknown_option_prints_usage() {
        let mut shell = shell();
        let out = run(&mut shell, "hello @quiet\n").await;
        assert!(out.contains("unknown option @quiet for 'hello'"));
        assert!(out.contains("    hello [options] [name]"));
        assert!(!out.contains("Invalid Command"));
    }

    #[tokio::test]
    async fn too_many_tokens_prints_usage() {
        let mut shell = shell();
        let out = run(&mut shell, "hello a b\n").await;
        assert!(out.contains("'hello' takes at most 1 parameter(s), got 2"));
        assert!(out.contains("Usage:"));
    }

    #[tokio::test]
    async fn removed_alias_is_not_advertised() {
        let mut shell = Shell::new();
        shell
            .add_command(
                "list",
                CommandSpec::new(Action::noop()).aliases(["ls", "l"]),
            )
            .unwrap();

        assert!(shell.remove_command("ls"));
        let overview = shell.help_text(&[]);
        assert!(overview.contains("(aliases: l)"));
        assert!(!overview.contains("ls,") && !overview.contains(", ls"));

        let out = run(&mut shell, "ls\n").await;
        assert!(out.contains("Invalid Command"));
    }

    #[tokio::test]
    async fn help_keyword() {
        let mut shell = shell();
        let out = run(&mut shell, "help\nhelp hello\n").await;
        assert!(out.contains("Available commands:"));
        assert!(out.contains("    @loud"));
    }
}

// ============================================
// Session state
// ============================================

mod session {
    use super::*;

    #[tokio::test]
    async fn exit_command_stops_loop() {
        let seen = calls();
        let mut shell = Shell::new();
        shell
            .add_command("hello", recorder(&seen))
            .unwrap()
            .add_exit_command("exit")
            .unwrap();

        let out = run(&mut shell, "exit\nhello\n").await;
        assert_eq!(prompts(&out), 1);
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(shell.state(), SessionState::Inactive);
    }

    #[tokio::test]
    async fn undecodable_line_keeps_the_session_going() {
        let seen = calls();
        let mut shell = Shell::new();
        shell.add_command("hello", recorder(&seen)).unwrap();

        let mut out = Vec::new();
        shell
            .show(&b"\xff\xfe\nhello\n"[..], &mut out)
            .await
            .unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Invalid Command"));
        assert_eq!(prompts(&out), 3);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn crlf_line_endings_are_stripped() {
        let seen = calls();
        let mut shell = Shell::new();
        shell
            .add_command("say", CommandSpec::new(recorder(&seen)).parameter("word"))
            .unwrap();

        run(&mut shell, "say hi\r\n").await;
        assert_eq!(seen.lock().unwrap()[0].0, json!({ "word": "hi" }));
    }

    #[tokio::test]
    async fn end_of_input_ends_session() {
        let mut shell = Shell::new();
        let out = run(&mut shell, "").await;
        assert_eq!(prompts(&out), 1);
        assert_eq!(shell.state(), SessionState::Inactive);
    }

    #[tokio::test]
    async fn action_can_hide_through_handle() {
        let mut shell = Shell::new();
        let handle = shell.handle();
        shell
            .add_command(
                "quit",
                Action::sync(move |_, _| {
                    handle.hide();
                    Ok(())
                }),
            )
            .unwrap();

        let out = run(&mut shell, "quit\nquit\n").await;
        assert_eq!(prompts(&out), 1);
    }

    #[tokio::test]
    async fn show_can_run_again_after_hide() {
        let mut shell = Shell::new();
        shell.add_exit_command("exit").unwrap();

        run(&mut shell, "exit\n").await;
        let out = run(&mut shell, "exit\n").await;
        assert_eq!(prompts(&out), 1);
    }

    #[tokio::test]
    async fn custom_delimiter_is_the_prompt() {
        let mut shell = Shell::new();
        shell.set_delimiter("db>");
        let out = run(&mut shell, "").await;
        assert_eq!(out, "db> ");
    }
}
