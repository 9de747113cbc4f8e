use crate::{
    parse::TokenizerOptions, OptionSet, ParseErrorKind, ParseFailure, StyleProfile, Value, Values,
};

fn get_values(style: &StyleProfile, set: &OptionSet, argv: &[&str]) -> Values {
    match set.bind(argv, style, TokenizerOptions::default()) {
        Err(err) => panic!("{:?}: {}", err.kind, err),
        Ok(vals) => vals,
    }
}

fn get_failure(style: &StyleProfile, set: &OptionSet, argv: &[&str]) -> ParseFailure {
    match set.bind(argv, style, TokenizerOptions::default()) {
        Err(err) => err,
        Ok(vals) => panic!("Should have been a user error, got {vals:?}"),
    }
}

fn same_values(expected: &[(&str, Value)], got: &Values) {
    for (k, ve) in expected {
        match got.get(k) {
            None => panic!("EXPECTED has '{k}' but GOT does not."),
            Some(vg) => assert!(ve == vg, "{k}: EXPECTED = '{ve:?}' != '{vg:?}' = GOT"),
        }
    }
}

fn plain(s: &str) -> Value {
    Value::Plain(Some(s.to_string()))
}

fn list(items: &[&str]) -> Value {
    Value::List(items.iter().map(|s| s.to_string()).collect())
}

fn dict(items: &[(&str, &str)]) -> Value {
    Value::Dict(
        items
            .iter()
            .map(|&(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    )
}

macro_rules! test_expect(
    ($name:ident, $style:expr, $set:expr, $args:expr, $expected:expr) => (
        #[test]
        fn $name() {
            let vals = get_values(&$style, &$set, $args);
            same_values(&$expected, &vals);
        }
    );
);

macro_rules! test_user_error(
    ($name:ident, $style:expr, $set:expr, $args:expr, $kind:ident) => (
        #[test]
        fn $name() {
            let err = get_failure(&$style, &$set, $args);
            assert_eq!(err.kind, ParseErrorKind::$kind, "{}", err.message);
        }
    );
);

mod suggestions;
mod tokenizer;
