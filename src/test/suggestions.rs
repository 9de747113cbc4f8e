use super::*;

macro_rules! test_suggest(
    ($name:ident, $style:expr, $set:expr, $args:expr, $expected:expr) => (
        #[test]
        fn $name() {
            let err = get_failure(&$style, &$set, $args);
            assert_eq!(err.kind, ParseErrorKind::OptionalArgumentNotFound);
            assert_eq!(err.message, $expected);
        }
    );
);

test_suggest!(test_suggest_1, StyleProfile::GNU, OptionSet::new().flag("release", None),
              &["--releas"], "Unknown option: '--releas'. Did you mean '--release'?");

test_suggest!(test_suggest_2, StyleProfile::GNU,
              OptionSet::new().flag("archive", Some("a")).positional("source"),
              &["-d"], "Unknown option: '-d'.");

test_suggest!(test_suggest_3, StyleProfile::GNU,
              OptionSet::new().flag("archive", Some("a")).flag("export", Some("e")),
              &["--expotr"], "Unknown option: '--expotr'. Did you mean '--export'?");

test_suggest!(test_suggest_windows, StyleProfile::WINDOWS,
              OptionSet::new().value("OutputDirectory", Some("o")),
              &["/OutputDirectry:bin"],
              "Unknown option: '/OutputDirectry:bin'. Did you mean '/OutputDirectory'?");

test_suggest!(test_suggest_kebab, StyleProfile::FLEXIBLE,
              OptionSet::new().value("OutputDirectory", None),
              &["--output-directroy", "x"],
              "Unknown option: '--output-directroy'. Did you mean '--output-directory'?");
