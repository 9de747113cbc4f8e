//! Utilities that needed a home.

use std::sync::OnceLock;

/// Wrapper for lazily compiled regexes.
pub struct RegexWrap(&'static str, OnceLock<regex::Regex>);

impl RegexWrap {
    /// Create a new const instance with the given regex.
    pub const fn new(re: &'static str) -> Self {
        Self(re, OnceLock::new())
    }
}

impl std::ops::Deref for RegexWrap {
    type Target = regex::Regex;

    fn deref(&self) -> &Self::Target {
        // The patterns are crate literals, so a failure here is a bug.
        self.1
            .get_or_init(|| regex::Regex::new(self.0).expect("BUG: invalid regex literal"))
    }
}

/// Declares a lazy static regex.
macro_rules! decl_regex {
    ($($name:ident : $re:literal; )*) => {
        $(
            static $name: $crate::utils::RegexWrap = $crate::utils::RegexWrap::new($re);
        )*
    };
}

pub(crate) fn cap_or_empty<'t>(caps: &regex::Captures<'t>, name: &str) -> &'t str {
    caps.name(name).map_or("", |m| m.as_str())
}
