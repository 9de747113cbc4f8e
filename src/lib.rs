//! Argvox parses command lines in the dialect the user expects.
//!
//! The same program can be driven as `tool --output-dir=out -v` on Linux,
//! `tool /OutputDir:out /v` on Windows, `tool -o out` with POSIX short options,
//! or `tool://run?output-dir=out` from a browser link. A `StyleProfile`
//! describes one such dialect; the tokenizer reads an argument vector under
//! a profile and reports what it finds through `ParseCallbacks`.
//!
//! Most programs use the higher layers instead of the callbacks:
//!
//! * `OptionSet` declares options and positional slots and binds an argument
//!   vector into `Values`.
//! * `CommandLine` pairs an argument vector with `ParsingOptions`, rewriting
//!   `scheme://` invocations into ordinary arguments.
//! * `Dispatcher` routes a command line to per-verb handlers.
//!
//! # Example
//!
//! ```
//! use argvox::{CommandLine, OptionSet, ParsingOptions, StyleProfile};
//!
//! let set = OptionSet::new()
//!     .value("OutputDirectory", Some("o"))
//!     .flag("Verbose", Some("v"))
//!     .positional("input");
//!
//! let opts = ParsingOptions::new().style(StyleProfile::WINDOWS);
//! let cl = CommandLine::parse(["/outputdirectory:build", "-v", "main.c"], &opts);
//! let vals = cl.bind(&set).unwrap_or_else(|e| e.exit());
//!
//! assert_eq!(vals.get_str("OutputDirectory"), "build");
//! assert!(vals.get_bool("verbose"));
//! assert_eq!(vals.get_str("input"), "main.c");
//! ```
//!
//! # Dialects
//!
//! | style      | options                         | values                  |
//! |------------|---------------------------------|-------------------------|
//! | `POSIX`    | `-a -b`, `-ab`                  | `-o file`, `-ofile`     |
//! | `GNU`      | `--long`, `-s`, `-ab`           | `--long=v`, `--long v`  |
//! | `DOTNET`   | `--long`, `-long`, `/long`      | `--long:v`, `--long v`  |
//! | `WINDOWS`  | `/Long`, `-Long`                | `/Long:v`, `/Long v`    |
//! | `FLEXIBLE` | any of the above                | any of the above        |
//! | `URL`      | rewritten `scheme://` links     | `--key=v`               |
//!
//! Fields of a profile can be overridden with struct update syntax, and a
//! profile (or a dialect name) can be read from configuration through serde.
//!
//! # Logging
//!
//! The crate logs through the `log` facade: every classified argument at
//! `trace`, values, ignored input and parse failures at `debug`.

pub use crate::{
    command_line::{CommandLine, ParsingOptions},
    dispatch::Dispatcher,
    errors::{Error, ParseErrorKind, ParseFailure, ParsingResult, Result},
    naming::{
        eq_names, is_kebab_case, resolve, to_camel_case, to_kebab_case, to_pascal_case,
        NamingPolicy,
    },
    options::{OptionSet, Value, Values},
    parse::{
        tokenize, OptionValueKind, OptionValueMatch, ParseCallbacks, PositionalValueMatch,
        TokenizerOptions,
    },
    separators::{SeparatorError, SeparatorSet},
    style::{OptionPrefix, ShortOptionGrouping, StyleProfile},
    uri::NormalizedUrl,
    value::{parse_bool, split_collection, split_dictionary, CollectionFormatError},
};

#[macro_use]
mod utils;

mod command_line;
mod dispatch;
mod errors;
pub mod naming;
mod options;
mod parse;
mod separators;
mod style;
mod synonym;
pub mod uri;
mod value;

#[cfg(test)]
mod test;
