//! Command line dialects.
//!
//! A `StyleProfile` is a bag of capability flags describing one command line
//! convention. Six profiles ship with the crate; anything else can be built
//! with struct update syntax from one of them:
//!
//! ```
//! use argvox::{NamingPolicy, StyleProfile};
//!
//! let style = StyleProfile {
//!     case_sensitive: false,
//!     naming_policy: NamingPolicy::Both,
//!     ..StyleProfile::GNU
//! };
//! assert!(style.supports_short_option_combination());
//! ```

use std::{borrow::Cow, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

use crate::{errors::Error, naming::NamingPolicy, separators::SeparatorSet};

/// Which characters introduce an option.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionPrefix {
    /// `--long` and `-s`.
    DoubleDash,
    /// `-name` only.
    SingleDash,
    /// `/name` only.
    Slash,
    /// `-name` or `/name`.
    SlashOrDash,
    /// `--name`, `-name` or `/name`.
    Any,
}

/// How a short option token longer than one character is read.
///
/// Combination (`-abc` is `-a -b -c`) and multi-character short names
/// (`-abc` is the option `abc`) cannot both be active, so the choice is a
/// single enum instead of two flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortOptionGrouping {
    /// Short options are always a single character.
    None,
    /// Boolean short options may be stacked: `-abc`.
    Combination,
    /// A short option name may have several characters: `-tl`.
    MultiChar,
}

/// A complete description of one command line dialect.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StyleProfile {
    /// Diagnostic name only.
    pub name: Cow<'static, str>,
    pub case_sensitive: bool,
    pub supports_long_option: bool,
    pub supports_short_option: bool,
    pub short_option_grouping: ShortOptionGrouping,
    /// `-ovalue` assigns `value` to `-o`.
    pub supports_short_option_value_without_separator: bool,
    /// `--name value` assigns `value` to `--name`.
    pub supports_space_separated_option_value: bool,
    /// `--flag false` reads `false` as the value of a boolean option.
    pub supports_explicit_boolean_option_value: bool,
    /// `--items a b c` keeps appending to a list or dictionary option.
    pub supports_space_separated_collection_values: bool,
    pub naming_policy: NamingPolicy,
    pub option_prefix: OptionPrefix,
    pub option_value_separators: SeparatorSet,
    pub collection_value_separators: SeparatorSet,
}

impl StyleProfile {
    /// `-a -b -c`, `-abc`, `-ofile`. No long options.
    pub const POSIX: StyleProfile = StyleProfile {
        name: Cow::Borrowed("posix"),
        case_sensitive: true,
        supports_long_option: false,
        supports_short_option: true,
        short_option_grouping: ShortOptionGrouping::Combination,
        supports_short_option_value_without_separator: true,
        supports_space_separated_option_value: true,
        supports_explicit_boolean_option_value: false,
        supports_space_separated_collection_values: false,
        naming_policy: NamingPolicy::PascalCase,
        option_prefix: OptionPrefix::DoubleDash,
        option_value_separators: SeparatorSet::EMPTY,
        collection_value_separators: SeparatorSet::of(&[',']),
    };

    /// `--long-name=value`, `--long-name value`, `-abc`, `-ofile`.
    pub const GNU: StyleProfile = StyleProfile {
        name: Cow::Borrowed("gnu"),
        case_sensitive: true,
        supports_long_option: true,
        supports_short_option: true,
        short_option_grouping: ShortOptionGrouping::Combination,
        supports_short_option_value_without_separator: true,
        supports_space_separated_option_value: true,
        supports_explicit_boolean_option_value: false,
        supports_space_separated_collection_values: false,
        naming_policy: NamingPolicy::KebabCase,
        option_prefix: OptionPrefix::DoubleDash,
        option_value_separators: SeparatorSet::of(&['=']),
        collection_value_separators: SeparatorSet::of(&[',']),
    };

    /// `--name:value`, `-n value`, `/name=value`, `-tl`.
    pub const DOTNET: StyleProfile = StyleProfile {
        name: Cow::Borrowed("dotnet"),
        case_sensitive: true,
        supports_long_option: true,
        supports_short_option: true,
        short_option_grouping: ShortOptionGrouping::MultiChar,
        supports_short_option_value_without_separator: false,
        supports_space_separated_option_value: true,
        supports_explicit_boolean_option_value: true,
        supports_space_separated_collection_values: true,
        naming_policy: NamingPolicy::KebabCase,
        option_prefix: OptionPrefix::Any,
        option_value_separators: SeparatorSet::of(&[':', '=']),
        collection_value_separators: SeparatorSet::of(&[',', ';']),
    };

    /// `/Name:value`, `-Name value`, case-insensitive.
    pub const WINDOWS: StyleProfile = StyleProfile {
        name: Cow::Borrowed("windows"),
        case_sensitive: false,
        supports_long_option: true,
        supports_short_option: true,
        short_option_grouping: ShortOptionGrouping::MultiChar,
        supports_short_option_value_without_separator: false,
        supports_space_separated_option_value: true,
        supports_explicit_boolean_option_value: true,
        supports_space_separated_collection_values: true,
        naming_policy: NamingPolicy::PascalCase,
        option_prefix: OptionPrefix::SlashOrDash,
        option_value_separators: SeparatorSet::of(&[':', '=']),
        collection_value_separators: SeparatorSet::of(&[',', ';']),
    };

    /// Accepts most of what the other dialects accept.
    pub const FLEXIBLE: StyleProfile = StyleProfile {
        name: Cow::Borrowed("flexible"),
        case_sensitive: false,
        supports_long_option: true,
        supports_short_option: true,
        short_option_grouping: ShortOptionGrouping::MultiChar,
        supports_short_option_value_without_separator: false,
        supports_space_separated_option_value: true,
        supports_explicit_boolean_option_value: true,
        supports_space_separated_collection_values: true,
        naming_policy: NamingPolicy::Both,
        option_prefix: OptionPrefix::Any,
        option_value_separators: SeparatorSet::of(&[':', '=']),
        collection_value_separators: SeparatorSet::of(&[',', ';']),
    };

    /// The dialect of an argument vector rewritten from a `scheme://` URL.
    pub const URL: StyleProfile = StyleProfile {
        name: Cow::Borrowed("url"),
        case_sensitive: false,
        supports_long_option: true,
        supports_short_option: false,
        short_option_grouping: ShortOptionGrouping::None,
        supports_short_option_value_without_separator: false,
        supports_space_separated_option_value: true,
        supports_explicit_boolean_option_value: true,
        supports_space_separated_collection_values: false,
        naming_policy: NamingPolicy::Both,
        option_prefix: OptionPrefix::DoubleDash,
        option_value_separators: SeparatorSet::of(&['=']),
        collection_value_separators: SeparatorSet::of(&[',']),
    };

    /// All canned dialects.
    pub const ALL: [&'static StyleProfile; 6] = [
        &StyleProfile::POSIX,
        &StyleProfile::GNU,
        &StyleProfile::DOTNET,
        &StyleProfile::WINDOWS,
        &StyleProfile::FLEXIBLE,
        &StyleProfile::URL,
    ];

    /// Looks up a canned dialect by name, ignoring case.
    pub fn from_name(name: &str) -> Option<StyleProfile> {
        let name = name.trim().to_ascii_lowercase();
        let style = match &*name {
            "posix" => &StyleProfile::POSIX,
            "gnu" => &StyleProfile::GNU,
            "dotnet" | ".net" | "net" => &StyleProfile::DOTNET,
            "windows" => &StyleProfile::WINDOWS,
            "flexible" => &StyleProfile::FLEXIBLE,
            "url" => &StyleProfile::URL,
            _ => return None,
        };
        Some(style.clone())
    }

    #[inline]
    pub fn supports_short_option_combination(&self) -> bool {
        self.short_option_grouping == ShortOptionGrouping::Combination
    }

    #[inline]
    pub fn supports_multi_char_short_option(&self) -> bool {
        self.short_option_grouping == ShortOptionGrouping::MultiChar
    }
}

impl Default for StyleProfile {
    fn default() -> Self {
        StyleProfile::FLEXIBLE
    }
}

impl FromStr for StyleProfile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StyleProfile::from_name(s).ok_or_else(|| Error::UnknownStyle(s.to_string()))
    }
}

impl fmt::Display for StyleProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Deserializes a style from either a dialect name or a full profile.
pub(crate) fn deserialize_named_or_full<'de, D>(de: D) -> Result<StyleProfile, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Named(String),
        Full(StyleProfile),
    }

    match Repr::deserialize(de)? {
        Repr::Named(name) => StyleProfile::from_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown command line style '{name}'"))),
        Repr::Full(style) => Ok(style),
    }
}
