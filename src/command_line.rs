use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    errors::{ParseFailure, ParsingResult, Result},
    options::{OptionSet, Values},
    parse::{tokenize, ParseCallbacks, TokenizerOptions},
    style::{self, StyleProfile},
    uri,
};

/// How a `CommandLine` is read.
///
/// Deserializable so that it can live in a configuration file. `style` is
/// either the name of a canned dialect or a complete profile:
///
/// ```
/// use argvox::{ParsingOptions, StyleProfile};
///
/// let opts: ParsingOptions = serde_json::from_str(r#"{
///     "style": "gnu",
///     "url_schemes": ["app"]
/// }"#).unwrap();
/// assert_eq!(opts.style, StyleProfile::GNU);
/// assert!(!opts.ignore_unknown_options);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingOptions {
    #[serde(deserialize_with = "style::deserialize_named_or_full")]
    pub style:                      StyleProfile,
    /// URL schemes this program handles.
    pub url_schemes:                Vec<String>,
    pub ignore_unknown_options:     bool,
    pub ignore_unknown_positionals: bool,
}

impl Default for ParsingOptions {
    fn default() -> Self {
        ParsingOptions {
            style:                      StyleProfile::FLEXIBLE,
            url_schemes:                vec![],
            ignore_unknown_options:     false,
            ignore_unknown_positionals: false,
        }
    }
}

impl ParsingOptions {
    pub fn new() -> ParsingOptions {
        ParsingOptions::default()
    }

    /// Set the dialect.
    pub fn style(mut self, style: StyleProfile) -> ParsingOptions {
        self.style = style;
        self
    }

    /// Accept invocations of the form `scheme://...`.
    pub fn url_scheme(mut self, scheme: &str) -> ParsingOptions {
        self.url_schemes.push(scheme.to_string());
        self
    }

    /// Skip undeclared options instead of failing.
    pub fn ignore_unknown_options(mut self, yes: bool) -> ParsingOptions {
        self.ignore_unknown_options = yes;
        self
    }

    /// Skip positional arguments without a slot instead of failing.
    pub fn ignore_unknown_positionals(mut self, yes: bool) -> ParsingOptions {
        self.ignore_unknown_positionals = yes;
        self
    }
}

/// An argument vector together with the dialect it is read in.
///
/// If the arguments are a single URL of a registered scheme, they are
/// rewritten first and the dialect becomes `StyleProfile::URL`.
#[derive(Clone, Debug)]
pub struct CommandLine {
    args:                       Vec<String>,
    style:                      StyleProfile,
    url_scheme:                 Option<String>,
    ignore_unknown_options:     bool,
    ignore_unknown_positionals: bool,
}

impl CommandLine {
    pub fn parse<I, S>(args: I, options: &ParsingOptions) -> CommandLine
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let (args, style, url_scheme) = match uri::normalize(&args, &options.url_schemes) {
            Some(n) => (n.args, StyleProfile::URL, Some(n.scheme)),
            None => (args, options.style.clone(), None),
        };
        debug!("command line {args:?} in the {style} style");
        CommandLine {
            args,
            style,
            url_scheme,
            ignore_unknown_options: options.ignore_unknown_options,
            ignore_unknown_positionals: options.ignore_unknown_positionals,
        }
    }

    /// The arguments of this process, without the program name.
    pub fn from_env(options: &ParsingOptions) -> CommandLine {
        CommandLine::parse(std::env::args().skip(1), options)
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn style(&self) -> &StyleProfile {
        &self.style
    }

    /// The scheme, if the arguments were rewritten from a URL.
    pub fn url_scheme(&self) -> Option<&str> {
        self.url_scheme.as_deref()
    }

    /// Runs the tokenizer over the arguments after the first `skip`.
    pub fn tokenize<C: ParseCallbacks + ?Sized>(&self, skip: usize, callbacks: &mut C) -> ParsingResult {
        tokenize(&self.args, &self.style, self.tokenizer_options(skip), callbacks)
    }

    /// Binds all arguments against `set`.
    pub fn bind(&self, set: &OptionSet) -> Result<Values> {
        Ok(self.bind_after(0, set)?)
    }

    pub(crate) fn bind_after(&self, skip: usize, set: &OptionSet) -> std::result::Result<Values, ParseFailure> {
        set.bind(&self.args, &self.style, self.tokenizer_options(skip))
    }

    fn tokenizer_options(&self, skip: usize) -> TokenizerOptions {
        TokenizerOptions {
            skip,
            ignore_unknown_options: self.ignore_unknown_options,
            ignore_unknown_positionals: self.ignore_unknown_positionals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_invocation_switches_style() {
        let opts = ParsingOptions::new().style(StyleProfile::POSIX).url_scheme("app");
        let cl = CommandLine::parse(["app://open/report.pdf?readonly=true"], &opts);
        assert_eq!(cl.style(), &StyleProfile::URL);
        assert_eq!(cl.url_scheme(), Some("app"));

        let set = OptionSet::new()
            .flag("readonly", None)
            .positional("verb")
            .positional("file");
        let vals = cl.bind(&set).unwrap();
        assert_eq!(vals.get_str("verb"), "open");
        assert_eq!(vals.get_str("file"), "report.pdf");
        assert!(vals.get_bool("readonly"));
    }

    #[test]
    fn plain_invocation_keeps_style() {
        let opts = ParsingOptions::new().style(StyleProfile::GNU).url_scheme("app");
        let cl = CommandLine::parse(["https://example.com"], &opts);
        assert_eq!(cl.style(), &StyleProfile::GNU);
        assert_eq!(cl.url_scheme(), None);
        assert_eq!(cl.args(), ["https://example.com"]);
    }

    #[test]
    fn options_from_config() {
        let opts: ParsingOptions = serde_json::from_str(
            r#"{"style": "Windows", "ignore_unknown_positionals": true}"#,
        )
        .unwrap();
        assert_eq!(opts.style, StyleProfile::WINDOWS);
        assert!(opts.ignore_unknown_positionals);
        assert!(opts.url_schemes.is_empty());

        let custom = StyleProfile {
            case_sensitive: true,
            ..StyleProfile::WINDOWS
        };
        let json = serde_json::to_string(&ParsingOptions::new().style(custom.clone())).unwrap();
        let back: ParsingOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back.style, custom);

        assert!(serde_json::from_str::<ParsingOptions>(r#"{"style": "powershell"}"#).is_err());
    }

    #[test]
    fn ignore_toggles_reach_the_tokenizer() {
        let opts = ParsingOptions::new()
            .style(StyleProfile::GNU)
            .ignore_unknown_options(true)
            .ignore_unknown_positionals(true);
        let cl = CommandLine::parse(["--nope", "-v", "stray"], &opts);
        let vals = cl.bind(&OptionSet::new().flag("verbose", Some("v"))).unwrap();
        assert!(vals.get_bool("verbose"));
    }
}
