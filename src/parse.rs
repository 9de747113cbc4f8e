// The tokenizer walks the argument vector once, left to right. Every
// argument is classified into a `ParseToken` relative to the previous token
// and the active `StyleProfile`, and the token is then applied: option names
// and positional values are resolved through the caller's `ParseCallbacks`,
// and values are written back through `assign_value`.
//
// Two pieces of state carry over between arguments:
//
//   - `last`: the kind of the previously applied token. After `--` every
//     argument is positional, whatever it looks like.
//   - `current`: an option that is still waiting for a value. It is only
//     set when the dialect allows the value to come as the next argument,
//     so its presence alone decides how the next argument is read:
//
//       Boolean            the next argument is its value only if it is a
//                          boolean literal; otherwise the option is `true`
//                          and the argument is classified from scratch.
//       Normal             the next argument is its value, unconditionally.
//       List, Dictionary   arguments are appended until one looks like an
//                          option (or is `--`).
//
// Structural failures (unknown option, malformed option syntax) stop the
// walk at once. Bad values (a boolean option given `maybe`, a dictionary
// item without `=`) are folded into the result with `ParsingResult::combine`
// and the walk goes on.

use std::{mem, sync::Arc};

use log::{debug, trace};

use crate::{
    errors::{ParseErrorKind, ParseFailure, ParsingResult},
    naming::NamingPolicy,
    style::{OptionPrefix, StyleProfile},
    value::{bool_str, parse_bool, split_collection, split_dictionary},
};

macro_rules! err(
    ($kind:ident, $($arg:tt)*) => (
        return Err(ParseFailure::new(ParseErrorKind::$kind, format!($($arg)*)))
    )
);

/// The shape of an option's value, as declared by the binding layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OptionValueKind {
    /// One string; the last occurrence wins.
    Normal,
    /// A switch. Present means `true` unless an explicit literal follows.
    Boolean,
    /// Several strings, split on the collection separators.
    List,
    /// `key=value` items, split on the collection separators.
    Dictionary,
}

/// A declared option that user input resolved to.
///
/// Callbacks return `None` when nothing matches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionValueMatch {
    pub property_name:  Arc<str>,
    pub property_index: usize,
    pub value_kind:     OptionValueKind,
}

/// A declared positional slot that a positional argument resolved to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PositionalValueMatch {
    pub property_name:  Arc<str>,
    pub property_index: usize,
}

/// What the tokenizer needs from whoever owns the option declarations.
///
/// The tokenizer never stores values itself. It asks which declared option
/// or positional slot a piece of input belongs to, then hands the value
/// back through `assign_value`, once per list item or dictionary entry.
pub trait ParseCallbacks {
    /// Resolves a long option name such as `output-directory`.
    fn match_long_option(
        &mut self,
        name: &str,
        case_sensitive: bool,
        naming_policy: NamingPolicy,
    ) -> Option<OptionValueMatch>;

    /// Resolves a short option name such as `o` (or `tl` in dialects with
    /// multi-character short options).
    fn match_short_option(&mut self, name: &str, case_sensitive: bool) -> Option<OptionValueMatch>;

    /// Resolves the `index`-th positional argument.
    fn match_positional(&mut self, value: &str, index: usize) -> Option<PositionalValueMatch>;

    /// Stores one value. `key` is set only for dictionary entries. Boolean
    /// values arrive as `"true"` or `"false"`.
    fn assign_value(&mut self, property_name: &str, property_index: usize, key: Option<&str>, value: &str);
}

/// Per-call knobs that are not part of the dialect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TokenizerOptions {
    /// Number of leading arguments that are commands (verbs) and are not
    /// parsed.
    pub skip: usize,
    /// Skip undeclared options instead of failing.
    pub ignore_unknown_options: bool,
    /// Skip positional arguments without a slot instead of failing.
    pub ignore_unknown_positionals: bool,
}

/// Parses `args` under `style`, reporting every match and value through
/// `callbacks`.
pub fn tokenize<S, C>(
    args: &[S],
    style: &StyleProfile,
    options: TokenizerOptions,
    callbacks: &mut C,
) -> ParsingResult
where
    S: AsRef<str>,
    C: ParseCallbacks + ?Sized,
{
    let tokenizer = Tokenizer {
        style,
        opts: options,
        cb: callbacks,
        current: None,
        positional_index: 0,
        last: TokenKind::Start,
        result: ParsingResult::SUCCESS,
    };
    tokenizer.run(args)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Start,
    Command,
    PositionalArgument,
    LongOption,
    LongOptionWithValue,
    ShortOption,
    ShortOptionWithValue,
    /// An option whose long or short identity is decided at match time.
    Option,
    OptionWithValue,
    ErrorOption,
    MultiShortOptions,
    OptionValue,
    PositionalArgumentSeparator,
    PostPositionalArgument,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct ParseToken<'t> {
    kind:  TokenKind,
    /// The whole argument, for messages.
    raw:   &'t str,
    name:  &'t str,
    value: Option<&'t str>,
}

impl<'t> ParseToken<'t> {
    fn new(kind: TokenKind, raw: &'t str) -> ParseToken<'t> {
        ParseToken {
            kind,
            raw,
            name: "",
            value: None,
        }
    }

    fn named(kind: TokenKind, raw: &'t str, name: &'t str) -> ParseToken<'t> {
        ParseToken {
            kind,
            raw,
            name,
            value: None,
        }
    }

    fn with_value(kind: TokenKind, raw: &'t str, name: &'t str, value: &'t str) -> ParseToken<'t> {
        ParseToken {
            kind,
            raw,
            name,
            value: Some(value),
        }
    }
}

type Step = Result<(), ParseFailure>;

struct Tokenizer<'a, C: ?Sized> {
    style:            &'a StyleProfile,
    opts:             TokenizerOptions,
    cb:               &'a mut C,
    current:          Option<OptionValueMatch>,
    positional_index: usize,
    last:             TokenKind,
    result:           ParsingResult,
}

impl<'a, C: ParseCallbacks + ?Sized> Tokenizer<'a, C> {
    fn run<S: AsRef<str>>(mut self, args: &[S]) -> ParsingResult {
        for (i, arg) in args.iter().enumerate() {
            if i < self.opts.skip {
                self.last = TokenKind::Command;
                continue;
            }
            if let Err(e) = self.step(arg.as_ref()) {
                debug!("parse stopped at argument {i}: {e}");
                return self.result.combine(e.into());
            }
        }
        if let Err(e) = self.finish() {
            return self.result.combine(e.into());
        }
        self.result
    }

    fn step(&mut self, arg: &str) -> Step {
        let token = self.classify(arg);
        trace!("{arg:?} => {:?}", token.kind);
        self.apply(token)?;
        self.last = token.kind;
        Ok(())
    }

    fn finish(&mut self) -> Step {
        let Some(m) = self.current.take() else {
            return Ok(());
        };
        match m.value_kind {
            OptionValueKind::Boolean => self.assign(&m, None, bool_str(true)),
            OptionValueKind::Normal => err!(
                OptionalArgumentParseError,
                "Option '{}' requires a value but reached the end of arguments.",
                m.property_name
            ),
            OptionValueKind::List | OptionValueKind::Dictionary => {}
        }
        Ok(())
    }

    // Classification.

    fn classify<'t>(&mut self, arg: &'t str) -> ParseToken<'t> {
        match self.last {
            TokenKind::Start | TokenKind::Command => return self.classify_fresh(arg),
            TokenKind::PositionalArgumentSeparator | TokenKind::PostPositionalArgument => {
                return ParseToken::new(TokenKind::PostPositionalArgument, arg);
            }
            _ => {}
        }
        let Some(kind) = self.current.as_ref().map(|m| m.value_kind) else {
            return self.classify_fresh(arg);
        };
        match kind {
            OptionValueKind::Normal => ParseToken::new(TokenKind::OptionValue, arg),
            OptionValueKind::Boolean => {
                if parse_bool(arg).is_some() {
                    return ParseToken::new(TokenKind::OptionValue, arg);
                }
                // Not a literal: the switch stands on its own.
                if let Some(m) = self.current.take() {
                    self.assign(&m, None, bool_str(true));
                }
                self.classify_fresh(arg)
            }
            OptionValueKind::List | OptionValueKind::Dictionary => {
                let fresh = self.classify_fresh(arg);
                if fresh.kind == TokenKind::PositionalArgument {
                    ParseToken::new(TokenKind::OptionValue, arg)
                } else {
                    self.current = None;
                    fresh
                }
            }
        }
    }

    /// Option-or-positional classification, ignoring any previous token.
    fn classify_fresh<'t>(&self, arg: &'t str) -> ParseToken<'t> {
        if arg == "--" {
            return ParseToken::new(TokenKind::PositionalArgumentSeparator, arg);
        }
        let prefix = self.style.option_prefix;
        if let Some(rest) = arg.strip_prefix("--") {
            match prefix {
                OptionPrefix::DoubleDash | OptionPrefix::Any => return self.long_token(arg, rest),
                OptionPrefix::SingleDash | OptionPrefix::SlashOrDash => {
                    return ParseToken::named(TokenKind::ErrorOption, arg, rest);
                }
                OptionPrefix::Slash => {}
            }
        }
        match prefix {
            OptionPrefix::DoubleDash => {
                if let Some(rest) = arg.strip_prefix('-').filter(|r| !r.is_empty()) {
                    return self.short_token(arg, rest);
                }
            }
            OptionPrefix::SingleDash => {
                if let Some(rest) = arg.strip_prefix('-') {
                    if let Some(token) = self.undetermined_token(arg, rest, false) {
                        return token;
                    }
                }
            }
            OptionPrefix::Slash => {
                if let Some(rest) = arg.strip_prefix('/') {
                    if let Some(token) = self.undetermined_token(arg, rest, true) {
                        return token;
                    }
                }
            }
            OptionPrefix::SlashOrDash | OptionPrefix::Any => {
                let token = match arg.strip_prefix('-') {
                    Some(rest) => self.undetermined_token(arg, rest, false),
                    None => arg
                        .strip_prefix('/')
                        .and_then(|rest| self.undetermined_token(arg, rest, true)),
                };
                if let Some(token) = token {
                    return token;
                }
            }
        }
        ParseToken::new(TokenKind::PositionalArgument, arg)
    }

    fn long_token<'t>(&self, arg: &'t str, rest: &'t str) -> ParseToken<'t> {
        if !self.style.supports_long_option {
            return ParseToken::named(TokenKind::ErrorOption, arg, rest);
        }
        match self.split_value(rest) {
            Some(("", _)) => ParseToken::named(TokenKind::ErrorOption, arg, rest),
            Some((name, value)) => {
                ParseToken::with_value(TokenKind::LongOptionWithValue, arg, name, value)
            }
            None => ParseToken::named(TokenKind::LongOption, arg, rest),
        }
    }

    fn short_token<'t>(&self, arg: &'t str, rest: &'t str) -> ParseToken<'t> {
        if !self.style.supports_short_option {
            return ParseToken::named(TokenKind::ErrorOption, arg, rest);
        }
        match self.split_value(rest) {
            Some(("", _)) => return ParseToken::named(TokenKind::ErrorOption, arg, rest),
            Some((name, value))
                if is_single_char(name) || self.style.supports_multi_char_short_option() =>
            {
                return ParseToken::with_value(TokenKind::ShortOptionWithValue, arg, name, value);
            }
            // `-ofile=x`: the separator belongs to the inline value of `-o`.
            Some(_) => {}
            None if is_single_char(rest) => {
                return ParseToken::named(TokenKind::ShortOption, arg, rest);
            }
            None => {}
        }
        ParseToken::named(TokenKind::MultiShortOptions, arg, rest)
    }

    /// `-name`, `/name`, `-name:value`. Returns `None` when the text after
    /// the prefix cannot be an option name, so `-` and `/usr/bin` stay
    /// positional.
    fn undetermined_token<'t>(
        &self,
        arg: &'t str,
        rest: &'t str,
        slash: bool,
    ) -> Option<ParseToken<'t>> {
        let (name, value) = match self.split_value(rest) {
            Some((name, value)) => (name, Some(value)),
            None => (rest, None),
        };
        if name.is_empty() || (slash && name.contains('/')) {
            return None;
        }
        Some(match value {
            Some(value) => ParseToken::with_value(TokenKind::OptionWithValue, arg, name, value),
            None => ParseToken::named(TokenKind::Option, arg, name),
        })
    }

    /// Splits `name<sep>value` at the first option value separator.
    fn split_value<'t>(&self, s: &'t str) -> Option<(&'t str, &'t str)> {
        let i = self.style.option_value_separators.find_in(s)?;
        let sep_len = s[i..].chars().next().map_or(1, char::len_utf8);
        Some((&s[..i], &s[i + sep_len..]))
    }

    // Application.

    fn apply(&mut self, token: ParseToken<'_>) -> Step {
        let style = self.style;
        let cs = style.case_sensitive;
        match token.kind {
            TokenKind::Start | TokenKind::Command | TokenKind::PositionalArgumentSeparator => Ok(()),
            TokenKind::PositionalArgument | TokenKind::PostPositionalArgument => {
                self.apply_positional(token.raw)
            }
            TokenKind::LongOption | TokenKind::LongOptionWithValue => {
                match self.cb.match_long_option(token.name, cs, style.naming_policy) {
                    None => self.not_found(token.raw),
                    Some(m) => self.apply_option(m, token),
                }
            }
            TokenKind::ShortOption | TokenKind::ShortOptionWithValue => {
                if !is_single_char(token.name) && !style.supports_multi_char_short_option() {
                    err!(
                        MultiCharShortOptionalArgumentNotSupported,
                        "Short option '-{}' has more than one character, which the {} style does \
                         not support.",
                        token.name,
                        style.name
                    )
                }
                match self.cb.match_short_option(token.name, cs) {
                    None => self.not_found(token.raw),
                    Some(m) => self.apply_option(m, token),
                }
            }
            TokenKind::Option | TokenKind::OptionWithValue => self.apply_undetermined(token),
            TokenKind::MultiShortOptions => self.apply_multi_short(token),
            TokenKind::OptionValue => {
                let Some(m) = self.current.take() else {
                    // Only produced while an option is waiting.
                    return self.apply_positional(token.raw);
                };
                self.option_with_value(m, token.raw)
            }
            TokenKind::ErrorOption => err!(
                OptionalArgumentNotFound,
                "Unknown option: '{}'. The {} style does not accept this option syntax.",
                token.raw,
                style.name
            ),
        }
    }

    fn apply_option(&mut self, m: OptionValueMatch, token: ParseToken<'_>) -> Step {
        trace!("{} => property '{}'", token.raw, m.property_name);
        match token.value {
            Some(value) => self.option_with_value(m, value),
            None => self.option_without_value(m, token.raw),
        }
    }

    /// `-name` in dialects with one option prefix: long first, then short.
    fn apply_undetermined(&mut self, token: ParseToken<'_>) -> Step {
        let style = self.style;
        let cs = style.case_sensitive;
        if style.supports_long_option {
            if let Some(m) = self.cb.match_long_option(token.name, cs, style.naming_policy) {
                return self.apply_option(m, token);
            }
        }
        if style.supports_short_option {
            if is_single_char(token.name) || style.supports_multi_char_short_option() {
                if let Some(m) = self.cb.match_short_option(token.name, cs) {
                    return self.apply_option(m, token);
                }
            } else if token.value.is_none()
                && (style.supports_short_option_combination()
                    || style.supports_short_option_value_without_separator)
            {
                return self.apply_multi_short(token);
            } else if !style.supports_long_option {
                err!(
                    MultiCharShortOptionalArgumentNotSupported,
                    "Short option '{}' has more than one character, which the {} style does not \
                     support.",
                    token.raw,
                    style.name
                )
            }
        }
        self.not_found(token.raw)
    }

    /// `-xyz`: one multi-character short option, stacked boolean options,
    /// or `-x` with the inline value `yz`, in that order.
    fn apply_multi_short(&mut self, token: ParseToken<'_>) -> Step {
        let style = self.style;
        let cs = style.case_sensitive;
        let name = token.name;

        if style.supports_multi_char_short_option() {
            if let Some(m) = self.cb.match_short_option(name, cs) {
                return self.option_without_value(m, token.raw);
            }
        }

        let Some(first) = name.chars().next() else {
            return self.not_found(token.raw);
        };
        let (head, rest) = name.split_at(first.len_utf8());
        let Some(m) = self.cb.match_short_option(head, cs) else {
            return self.not_found(token.raw);
        };

        if m.value_kind == OptionValueKind::Boolean && style.supports_short_option_combination() {
            self.assign(&m, None, bool_str(true));
            for (i, c) in rest.char_indices() {
                let short = &rest[i..i + c.len_utf8()];
                match self.cb.match_short_option(short, cs) {
                    None => {
                        self.not_found(&format!("-{short}"))?;
                    }
                    Some(next) if next.value_kind != OptionValueKind::Boolean => err!(
                        ArgumentCombinationIsNotBoolean,
                        "Option '-{short}' in '{}' takes a value, so it cannot be combined with \
                         other options.",
                        token.raw
                    ),
                    Some(next) => self.assign(&next, None, bool_str(true)),
                }
            }
            return Ok(());
        }

        if m.value_kind != OptionValueKind::Boolean
            && style.supports_short_option_value_without_separator
        {
            trace!("{} => property '{}' with inline value", token.raw, m.property_name);
            return self.option_with_value(m, rest);
        }

        self.not_found(token.raw)
    }

    fn option_without_value(&mut self, m: OptionValueMatch, raw: &str) -> Step {
        let style = self.style;
        match m.value_kind {
            OptionValueKind::Boolean => {
                if style.supports_explicit_boolean_option_value {
                    self.current = Some(m);
                } else {
                    self.assign(&m, None, bool_str(true));
                }
            }
            OptionValueKind::Normal | OptionValueKind::List | OptionValueKind::Dictionary => {
                if !style.supports_space_separated_option_value {
                    match style.option_value_separators.as_slice().first() {
                        Some(sep) => err!(
                            OptionalArgumentSeparatorNotSupported,
                            "Option '{raw}' requires a value written as '{raw}{sep}value'; the {} \
                             style does not accept a separate value argument.",
                            style.name
                        ),
                        None => err!(
                            OptionalArgumentSeparatorNotSupported,
                            "Option '{raw}' requires a value, but the {} style accepts no value \
                             separator.",
                            style.name
                        ),
                    }
                }
                self.current = Some(m);
            }
        }
        Ok(())
    }

    fn option_with_value(&mut self, m: OptionValueMatch, value: &str) -> Step {
        match m.value_kind {
            OptionValueKind::Normal => self.assign(&m, None, value),
            OptionValueKind::Boolean => match parse_bool(value) {
                Some(b) => self.assign(&m, None, bool_str(b)),
                None => self.record(
                    ParseErrorKind::BooleanValueParseError,
                    format!(
                        "Option '{}' takes a boolean, but got '{value}'.",
                        m.property_name
                    ),
                ),
            },
            OptionValueKind::List | OptionValueKind::Dictionary => {
                self.assign_collection(&m, value);
                if self.style.supports_space_separated_collection_values {
                    self.current = Some(m);
                }
            }
        }
        Ok(())
    }

    fn assign_collection(&mut self, m: &OptionValueMatch, value: &str) {
        let seps = &self.style.collection_value_separators;
        if m.value_kind == OptionValueKind::Dictionary {
            match split_dictionary(value, seps) {
                Ok(pairs) => {
                    for (k, v) in pairs {
                        self.assign(m, Some(k), v);
                    }
                }
                Err(e) => self.record(
                    ParseErrorKind::DictionaryValueParseError,
                    format!("Invalid value '{value}' for option '{}': {e}.", m.property_name),
                ),
            }
        } else {
            match split_collection(value, seps) {
                Ok(items) => {
                    for item in items {
                        self.assign(m, None, item);
                    }
                }
                Err(e) => self.record(
                    ParseErrorKind::OptionalArgumentParseError,
                    format!("Invalid value '{value}' for option '{}': {e}.", m.property_name),
                ),
            }
        }
    }

    fn apply_positional(&mut self, value: &str) -> Step {
        match self.cb.match_positional(value, self.positional_index) {
            Some(p) => {
                self.cb
                    .assign_value(&p.property_name, p.property_index, None, value);
                self.positional_index += 1;
                Ok(())
            }
            None if self.opts.ignore_unknown_positionals => {
                debug!("ignoring unexpected positional argument '{value}'");
                Ok(())
            }
            None => err!(
                PositionalArgumentNotFound,
                "Unexpected positional argument: '{value}'."
            ),
        }
    }

    fn not_found(&self, option: &str) -> Step {
        if self.opts.ignore_unknown_options {
            debug!("ignoring unknown option '{option}'");
            return Ok(());
        }
        err!(OptionalArgumentNotFound, "Unknown option: '{option}'.")
    }

    #[inline]
    fn assign(&mut self, m: &OptionValueMatch, key: Option<&str>, value: &str) {
        self.cb
            .assign_value(&m.property_name, m.property_index, key, value);
    }

    fn record(&mut self, kind: ParseErrorKind, message: String) {
        debug!("{kind}: {message}");
        let prev = mem::take(&mut self.result);
        self.result = prev.combine(ParsingResult::failure(kind, message));
    }
}

#[inline]
fn is_single_char(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some() && chars.next().is_none()
}
