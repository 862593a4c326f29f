//! Walk the registry tree to find the invoked command.

use std::sync::Arc;

use crate::command::{Command, Registry};

/// The deepest command matched by a token prefix.
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    pub command: &'a Arc<Command>,
    /// How many leading tokens named the command path.
    pub consumed: usize,
    /// Tokens after the command path, flags included.
    pub remaining: &'a [String],
}

/// Resolve `tokens` against `registry`.
///
/// A matching subcommand always wins over its parent; when the next token
/// names no subcommand the parent itself is the match. Returns `None` when
/// the first token is unknown or there are no tokens.
pub fn resolve<'a>(tokens: &'a [String], registry: &'a Registry) -> Option<Resolution<'a>> {
    let (first, rest) = tokens.split_first()?;
    let command = registry.get(first)?;

    if let Some(mut sub) = resolve(rest, command.subcommands()) {
        sub.consumed += 1;
        return Some(sub);
    }

    Some(Resolution {
        command,
        consumed: 1,
        remaining: rest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Action, CommandSpec, Parameter};

    fn tokens(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_string).collect()
    }

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.insert("hello", Action::noop()).unwrap();
        registry
            .insert(
                "do",
                CommandSpec::new(Action::noop())
                    .subcommand(
                        "something",
                        CommandSpec::new(Action::noop())
                            .parameter(Parameter::new("values").number().rest()),
                    )
                    .subcommand(
                        "nested",
                        CommandSpec::new(Action::noop()).subcommand("deeper", Action::noop()),
                    )
                    .alias("d"),
            )
            .unwrap();
        registry
    }

    #[test]
    fn empty_tokens_never_match() {
        assert!(resolve(&[], &registry()).is_none());
        assert!(resolve(&[], &Registry::new()).is_none());
    }

    #[test]
    fn unknown_first_token_is_not_found() {
        assert!(resolve(&tokens("nope"), &registry()).is_none());
        assert!(resolve(&tokens("something 1"), &registry()).is_none());
    }

    #[test]
    fn subcommand_takes_priority() {
        let reg = registry();
        let toks = tokens("do something 1 2");
        let res = resolve(&toks, &reg).unwrap();
        assert_eq!(res.command.name(), "something");
        assert_eq!(res.consumed, 2);
        assert_eq!(res.remaining, ["1", "2"]);
    }

    #[test]
    fn parent_is_match_when_next_token_is_not_a_subcommand() {
        let reg = registry();
        let toks = tokens("do other 1");
        let res = resolve(&toks, &reg).unwrap();
        assert_eq!(res.command.name(), "do");
        assert_eq!(res.consumed, 1);
        assert_eq!(res.remaining, ["other", "1"]);

        let toks = tokens("do");
        let res = resolve(&toks, &reg).unwrap();
        assert_eq!(res.command.name(), "do");
        assert!(res.remaining.is_empty());
    }

    #[test]
    fn resolves_through_aliases_and_depth() {
        let reg = registry();
        let toks = tokens("d nested deeper @x");
        let res = resolve(&toks, &reg).unwrap();
        assert_eq!(res.command.name(), "deeper");
        assert_eq!(res.consumed, 3);
        assert_eq!(res.remaining, ["@x"]);

        let toks = tokens("d nested nope");
        let res = resolve(&toks, &reg).unwrap();
        assert_eq!(res.command.name(), "nested");
        assert_eq!(res.remaining, ["nope"]);
    }

    #[test]
    fn leaf_consumes_one_token() {
        let reg = registry();
        let toks = tokens("hello there");
        let res = resolve(&toks, &reg).unwrap();
        assert_eq!(res.command.name(), "hello");
        assert_eq!(res.remaining, ["there"]);
    }
}
