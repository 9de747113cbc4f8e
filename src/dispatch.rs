//! Routing a command line to one of several verb handlers.
//!
//! Verbs are the leading words of a command line (`remote add` in
//! `git remote add origin url`). Each verb has its own `OptionSet` and a
//! handler that receives the bound values. A handler registered without a
//! verb is the default, used when no verb matches.

use log::debug;

use crate::{
    command_line::CommandLine,
    errors::{Error, ParseFailure, Result},
    naming::{self, NamingPolicy},
    options::{OptionSet, Values},
    style::StyleProfile,
};

type Handler<'h, T> = Box<dyn FnMut(&Values) -> T + 'h>;
type Fallback<'h, T> = Box<dyn FnMut(&ParseFailure) -> T + 'h>;

struct Verb<'h, T> {
    name:    String,
    words:   Vec<String>,
    options: OptionSet,
    handler: Handler<'h, T>,
}

/// Selects and runs the handler of the longest verb a command line starts
/// with.
///
/// ```
/// use argvox::{CommandLine, Dispatcher, OptionSet, ParsingOptions, StyleProfile};
///
/// let mut d = Dispatcher::new(&StyleProfile::GNU);
/// d.register(Some("remote"), OptionSet::new(), |_| "remote").unwrap();
/// d.register(Some("remote add"), OptionSet::new().positional("name"), |v| {
///     if v.get_str("name") == "origin" { "add origin" } else { "add" }
/// })
/// .unwrap();
///
/// let opts = ParsingOptions::new().style(StyleProfile::GNU);
/// let cl = CommandLine::parse(["remote", "add", "origin"], &opts);
/// assert_eq!(d.dispatch(&cl).unwrap(), "add origin");
/// ```
pub struct Dispatcher<'h, T> {
    naming_policy:  NamingPolicy,
    case_sensitive: bool,
    /// Longest verbs (in words) first.
    verbs:          Vec<Verb<'h, T>>,
    default:        Option<Verb<'h, T>>,
    fallback:       Option<Fallback<'h, T>>,
}

impl<'h, T> Dispatcher<'h, T> {
    /// Verbs are matched with the naming policy and case sensitivity of
    /// `style`.
    pub fn new(style: &StyleProfile) -> Dispatcher<'h, T> {
        Dispatcher::with_naming(style.naming_policy, style.case_sensitive)
    }

    pub fn with_naming(naming_policy: NamingPolicy, case_sensitive: bool) -> Dispatcher<'h, T> {
        Dispatcher {
            naming_policy,
            case_sensitive,
            verbs: vec![],
            default: None,
            fallback: None,
        }
    }

    /// Registers `handler` for `verb`, or as the default handler if `verb`
    /// is `None` or blank.
    ///
    /// Fails with `Error::AmbiguousVerb` if another verb (or default)
    /// has the same number of words and each word is an accepted spelling
    /// of the other's, e.g. `Build` and `BUILD` when case is ignored.
    pub fn register<F>(&mut self, verb: Option<&str>, options: OptionSet, handler: F) -> Result<&mut Self>
    where
        F: FnMut(&Values) -> T + 'h,
    {
        let name = verb.map(str::trim).unwrap_or("");
        let handler: Handler<'h, T> = Box::new(handler);
        if name.is_empty() {
            if self.default.is_some() {
                return Err(Error::AmbiguousVerb {
                    verb: String::new(),
                });
            }
            self.default = Some(Verb {
                name: String::new(),
                words: vec![],
                options,
                handler,
            });
            return Ok(self);
        }

        let words: Vec<String> = name.split_whitespace().map(str::to_string).collect();
        let name = words.join(" ");
        if let Some(existing) = self.verbs.iter().find(|v| self.same_words(&v.words, &words)) {
            debug!("verb '{name}' collides with '{}'", existing.name);
            return Err(Error::AmbiguousVerb { verb: name });
        }

        let at = self.verbs.partition_point(|v| v.words.len() >= words.len());
        self.verbs.insert(at, Verb {
            name,
            words,
            options,
            handler,
        });
        Ok(self)
    }

    /// Handles parse failures of the selected verb. Without a fallback they
    /// are returned as `Error::Parse`.
    pub fn fallback<F>(&mut self, fallback: F) -> &mut Self
    where
        F: FnMut(&ParseFailure) -> T + 'h,
    {
        self.fallback = Some(Box::new(fallback));
        self
    }

    /// Runs the handler of the longest registered verb that `cl` starts
    /// with, or the default handler.
    ///
    /// The verb's words are skipped and the rest is bound against the
    /// verb's options.
    pub fn dispatch(&mut self, cl: &CommandLine) -> Result<T> {
        let verb = match self.select(cl.args()) {
            Some(i) => &mut self.verbs[i],
            None => match self.default.as_mut() {
                Some(verb) => verb,
                None => return Err(Error::NoHandler),
            },
        };
        debug!("dispatching to verb '{}'", verb.name);
        match cl.bind_after(verb.words.len(), &verb.options) {
            Ok(values) => Ok((verb.handler)(&values)),
            Err(e) => match self.fallback.as_mut() {
                Some(fallback) => {
                    debug!("verb '{}' failed to parse, running fallback: {e}", verb.name);
                    Ok(fallback(&e))
                }
                None => Err(Error::Parse(e)),
            },
        }
    }

    /// The index of the longest verb whose words begin `args`. Verbs only
    /// match on whole words, so `remote` does not match `remotes`.
    fn select(&self, args: &[String]) -> Option<usize> {
        self.verbs.iter().position(|v| {
            args.len() >= v.words.len()
                && v.words.iter().zip(args).all(|(w, arg)| self.word_matches(w, arg))
        })
    }

    /// Whether `input` is an accepted spelling of the verb word `declared`,
    /// resolved the same way as option names.
    fn word_matches(&self, declared: &str, input: &str) -> bool {
        naming::resolve([declared], input, self.case_sensitive, self.naming_policy).is_some()
    }

    /// Two verbs collide if either one's words would select the other.
    fn same_words(&self, a: &[String], b: &[String]) -> bool {
        a.len() == b.len()
            && a.iter()
                .zip(b)
                .all(|(x, y)| self.word_matches(x, y) || self.word_matches(y, x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{command_line::ParsingOptions, errors::ParseErrorKind};

    fn cl(args: &[&str]) -> CommandLine {
        CommandLine::parse(args.iter().copied(), &ParsingOptions::new().style(StyleProfile::GNU))
    }

    #[test]
    fn ambiguous_registration() {
        let mut d: Dispatcher<'_, ()> = Dispatcher::new(&StyleProfile::FLEXIBLE);
        d.register(Some("AddRemote"), OptionSet::new(), |_| ()).unwrap();
        let err = d
            .register(Some("add-remote"), OptionSet::new(), |_| ())
            .err()
            .unwrap();
        assert!(matches!(err, Error::AmbiguousVerb { ref verb } if verb == "add-remote"));

        d.register(None, OptionSet::new(), |_| ()).unwrap();
        assert!(matches!(
            d.register(Some("  "), OptionSet::new(), |_| ()),
            Err(Error::AmbiguousVerb { .. })
        ));
    }

    #[test]
    fn longest_whole_word_match() {
        let mut d = Dispatcher::new(&StyleProfile::GNU);
        d.register(Some("remote"), OptionSet::new().positionals("rest"), |v| {
            format!("remote {:?}", v.get_vec("rest"))
        })
        .unwrap();
        d.register(Some("remote add"), OptionSet::new().positionals("rest"), |v| {
            format!("remote add {:?}", v.get_vec("rest"))
        })
        .unwrap();
        d.register(None, OptionSet::new().positionals("rest"), |v| {
            format!("default {:?}", v.get_vec("rest"))
        })
        .unwrap();

        assert_eq!(d.dispatch(&cl(&["remote", "add", "x"])).unwrap(), r#"remote add ["x"]"#);
        assert_eq!(d.dispatch(&cl(&["remote", "show"])).unwrap(), r#"remote ["show"]"#);
        assert_eq!(d.dispatch(&cl(&["remotes"])).unwrap(), r#"default ["remotes"]"#);
        assert_eq!(d.dispatch(&cl(&[])).unwrap(), "default []");
    }

    #[test]
    fn verbs_follow_naming_policy() {
        let mut d = Dispatcher::with_naming(NamingPolicy::Both, false);
        d.register(Some("ListItems"), OptionSet::new(), |_| 1).unwrap();
        for verb in ["list-items", "ListItems", "listItems", "List-Items"] {
            assert_eq!(d.dispatch(&cl(&[verb])).ok(), Some(1), "{verb}");
        }
        assert_eq!(d.dispatch(&cl(&["listitems"])).ok(), Some(1));
        assert_eq!(d.dispatch(&cl(&["LIST-ITEMS"])).ok(), Some(1));

        let mut d = Dispatcher::with_naming(NamingPolicy::KebabCase, true);
        d.register(Some("ListItems"), OptionSet::new(), |_| 1).unwrap();
        for verb in ["list-items", "ListItems"] {
            assert_eq!(d.dispatch(&cl(&[verb])).ok(), Some(1), "{verb}");
        }
        for verb in ["listitems", "List-Items"] {
            assert!(matches!(d.dispatch(&cl(&[verb])), Err(Error::NoHandler)), "{verb}");
        }
    }

    #[test]
    fn verbs_ignore_case_in_windows_style() {
        let opts = ParsingOptions::new().style(StyleProfile::WINDOWS);
        let mut d = Dispatcher::new(&StyleProfile::WINDOWS);
        d.register(Some("Build"), OptionSet::new().flag("Release", None), |v| v.get_bool("Release"))
            .unwrap();
        for args in [&["BUILD", "/RELEASE"][..], &["build", "/release"], &["Build", "/Release"]] {
            let cl = CommandLine::parse(args.iter().copied(), &opts);
            assert_eq!(d.dispatch(&cl).ok(), Some(true), "{args:?}");
        }

        let err = d
            .register(Some("BUILD"), OptionSet::new(), |_| false)
            .err()
            .unwrap();
        assert!(matches!(err, Error::AmbiguousVerb { ref verb } if verb == "BUILD"));
    }

    #[test]
    fn no_handler() {
        let mut d: Dispatcher<'_, ()> = Dispatcher::new(&StyleProfile::GNU);
        d.register(Some("run"), OptionSet::new(), |_| ()).unwrap();
        assert!(matches!(d.dispatch(&cl(&["walk"])), Err(Error::NoHandler)));
    }

    #[test]
    fn parse_failure_goes_to_fallback() {
        let mut d = Dispatcher::new(&StyleProfile::GNU);
        d.register(Some("run"), OptionSet::new().flag("fast", None), |_| None)
            .unwrap();

        let err = d.dispatch(&cl(&["run", "--slow"])).err().unwrap();
        assert_eq!(err.parse_kind(), Some(ParseErrorKind::OptionalArgumentNotFound));

        d.fallback(|e| Some(e.kind));
        assert_eq!(
            d.dispatch(&cl(&["run", "--slow"])).unwrap(),
            Some(ParseErrorKind::OptionalArgumentNotFound)
        );
        assert_eq!(d.dispatch(&cl(&["run", "--fast"])).unwrap(), None);
    }
}
