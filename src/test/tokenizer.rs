use std::sync::Arc;

use super::*;
use crate::{
    tokenize, NamingPolicy, OptionValueKind, OptionValueMatch, ParseCallbacks, ParsingResult,
    PositionalValueMatch,
};

/// Declares a fixed table of options and records every callback.
#[derive(Default)]
struct Recorder {
    assigned:    Vec<(String, Option<String>, String)>,
    positionals: Vec<usize>,
}

impl Recorder {
    const OPTIONS: [(&'static str, OptionValueKind); 4] = [
        ("flag", OptionValueKind::Boolean),
        ("name", OptionValueKind::Normal),
        ("list", OptionValueKind::List),
        ("define", OptionValueKind::Dictionary),
    ];

    fn lookup(&self, name: &str) -> Option<OptionValueMatch> {
        let i = Recorder::OPTIONS
            .iter()
            .position(|(n, _)| *n == name || n[..1] == *name)?;
        let (n, kind) = Recorder::OPTIONS[i];
        Some(OptionValueMatch {
            property_name:  Arc::from(n),
            property_index: i,
            value_kind:     kind,
        })
    }

    fn assigned(&self) -> Vec<(&str, Option<&str>, &str)> {
        self.assigned
            .iter()
            .map(|(p, k, v)| (&**p, k.as_deref(), &**v))
            .collect()
    }
}

impl ParseCallbacks for Recorder {
    fn match_long_option(&mut self, name: &str, _: bool, _: NamingPolicy) -> Option<OptionValueMatch> {
        self.lookup(name).filter(|_| name.len() > 1)
    }

    fn match_short_option(&mut self, name: &str, _: bool) -> Option<OptionValueMatch> {
        self.lookup(name).filter(|_| name.len() == 1)
    }

    fn match_positional(&mut self, _: &str, index: usize) -> Option<PositionalValueMatch> {
        self.positionals.push(index);
        (index < 2).then(|| PositionalValueMatch {
            property_name:  Arc::from(format!("pos{index}")),
            property_index: 100 + index,
        })
    }

    fn assign_value(&mut self, property_name: &str, _: usize, key: Option<&str>, value: &str) {
        self.assigned.push((
            property_name.to_string(),
            key.map(str::to_string),
            value.to_string(),
        ));
    }
}

fn run(style: &StyleProfile, options: TokenizerOptions, argv: &[&str]) -> (ParsingResult, Recorder) {
    let mut rec = Recorder::default();
    let result = tokenize(argv, style, options, &mut rec);
    (result, rec)
}

#[test]
fn one_assignment_per_item() {
    let (result, rec) = run(&StyleProfile::GNU, TokenizerOptions::default(), &[
        "--define=a=1,b=2",
        "--list=x,,y",
        "src",
    ]);
    assert!(result.is_success());
    assert_eq!(rec.assigned(), [
        ("define", Some("a"), "1"),
        ("define", Some("b"), "2"),
        ("list", None, "x"),
        ("list", None, ""),
        ("list", None, "y"),
        ("pos0", None, "src"),
    ]);
}

#[test]
fn commands_are_skipped() {
    let opts = TokenizerOptions {
        skip: 2,
        ..TokenizerOptions::default()
    };
    let (result, rec) = run(&StyleProfile::GNU, opts, &["remote", "--flag", "a", "b"]);
    assert!(result.is_success());
    // `--flag` is a command here, so `a` is the first positional.
    assert_eq!(rec.assigned(), [("pos0", None, "a"), ("pos1", None, "b")]);
    assert_eq!(rec.positionals, [0, 1]);
}

#[test]
fn booleans_arrive_canonical() {
    let (result, rec) = run(&StyleProfile::FLEXIBLE, TokenizerOptions::default(), &[
        "--flag", "OFF", "--flag:Yes", "--flag",
    ]);
    assert!(result.is_success());
    assert_eq!(rec.assigned(), [
        ("flag", None, "false"),
        ("flag", None, "true"),
        ("flag", None, "true"),
    ]);
}

#[test]
fn bad_values_do_not_stop_the_walk() {
    let (result, rec) = run(&StyleProfile::DOTNET, TokenizerOptions::default(), &[
        "--flag:maybe",
        "--define:novalue",
        "--name:kept",
    ]);
    // The later failure is the one reported.
    assert_eq!(result.error_kind(), Some(ParseErrorKind::DictionaryValueParseError));
    assert_eq!(rec.assigned(), [("name", None, "kept")]);
}

#[test]
fn structural_failure_stops_the_walk() {
    let (result, rec) = run(&StyleProfile::GNU, TokenizerOptions::default(), &[
        "--flag:maybe",
        "--nope",
        "--name=lost",
    ]);
    assert_eq!(result.error_kind(), Some(ParseErrorKind::OptionalArgumentNotFound));
    assert_eq!(result.error_message(), Some("Unknown option: '--flag:maybe'."));
    assert!(rec.assigned().is_empty());
}

#[test]
fn ignored_unknowns_continue() {
    let opts = TokenizerOptions {
        ignore_unknown_options: true,
        ignore_unknown_positionals: true,
        ..TokenizerOptions::default()
    };
    let (result, rec) = run(&StyleProfile::GNU, opts, &[
        "--nope", "a", "b", "c", "-fz", "--name", "n",
    ]);
    assert!(result.is_success());
    assert_eq!(rec.assigned(), [
        ("pos0", None, "a"),
        ("pos1", None, "b"),
        ("flag", None, "true"),
        ("name", None, "n"),
    ]);
    assert_eq!(rec.positionals, [0, 1, 2]);
}

#[test]
fn unknown_positional_fails_without_toggle() {
    let (result, _) = run(&StyleProfile::GNU, TokenizerOptions::default(), &["a", "b", "c"]);
    assert_eq!(result.error_kind(), Some(ParseErrorKind::PositionalArgumentNotFound));
    assert_eq!(result.error_message(), Some("Unexpected positional argument: 'c'."));
}

#[test]
fn empty_argv() {
    for style in StyleProfile::ALL {
        let (result, rec) = run(style, TokenizerOptions::default(), &[]);
        assert!(result.is_success(), "{style}");
        assert!(rec.assigned.is_empty());
    }
}
