//! Option naming conventions.
//!
//! Declared option names are written once (for example `OutputDirectory`)
//! but users type them in the convention of their platform:
//! `--output-directory`, `/OutputDirectory`, `--outputDirectory`. The
//! functions here produce the accepted spellings and resolve user input
//! against a list of declared names.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Which spellings of a declared name are accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingPolicy {
    /// Only the declared spelling.
    Ordinal,
    /// The kebab-case form of the declared spelling.
    KebabCase,
    /// PascalCase and camelCase forms (and kebab-case).
    PascalCase,
    /// The declared spelling and every transformed form.
    Both,
}

impl NamingPolicy {
    /// Whether the raw declared spelling is itself an accepted form.
    #[inline]
    pub fn supports_ordinal(self) -> bool {
        matches!(self, NamingPolicy::Ordinal | NamingPolicy::Both)
    }

    /// The accepted spellings of `declared`, most specific first, without
    /// duplicates.
    pub fn spellings(self, declared: &str) -> Vec<Cow<'_, str>> {
        let mut out = Vec::with_capacity(4);
        match self {
            NamingPolicy::Ordinal => push_unique(&mut out, Cow::Borrowed(declared)),
            NamingPolicy::KebabCase => push_unique(&mut out, to_kebab_case(declared)),
            NamingPolicy::PascalCase => {
                push_unique(&mut out, Cow::Owned(to_pascal_case(declared)));
                push_unique(&mut out, Cow::Owned(to_camel_case(declared)));
                push_unique(&mut out, to_kebab_case(declared));
            }
            NamingPolicy::Both => {
                push_unique(&mut out, Cow::Borrowed(declared));
                push_unique(&mut out, Cow::Owned(to_pascal_case(declared)));
                push_unique(&mut out, Cow::Owned(to_camel_case(declared)));
                push_unique(&mut out, to_kebab_case(declared));
            }
        }
        out
    }
}

fn push_unique<'a>(out: &mut Vec<Cow<'a, str>>, s: Cow<'a, str>) {
    if !out.contains(&s) {
        out.push(s);
    }
}

/// Converts `name` to kebab-case.
///
/// A `-` is inserted before every uppercase letter that is not the first
/// character and does not already follow a `-`; everything is lowercased.
/// Already kebab-case input is returned borrowed.
pub fn to_kebab_case(name: &str) -> Cow<'_, str> {
    if is_kebab_case(name) {
        return Cow::Borrowed(name);
    }
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    for c in name.chars() {
        if c.is_uppercase() && prev.is_some_and(|p| p != '-') {
            out.push('-');
        }
        out.extend(c.to_lowercase());
        prev = Some(c);
    }
    Cow::Owned(out)
}

/// Whether `name` is already kebab-case, i.e. `to_kebab_case` leaves it
/// unchanged.
#[inline]
pub fn is_kebab_case(name: &str) -> bool {
    !name.chars().any(char::is_uppercase)
}

/// `output-directory`, `outputDirectory` and `OutputDirectory` all become
/// `OutputDirectory`.
pub fn to_pascal_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut word_start = true;
    for c in name.chars() {
        if c == '-' || c == '_' {
            word_start = true;
            continue;
        }
        if word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        word_start = false;
    }
    out
}

/// Like `to_pascal_case`, with the first letter lowercased.
pub fn to_camel_case(name: &str) -> String {
    let pascal = to_pascal_case(name);
    let mut chars = pascal.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}

/// Compares two spellings with the given case sensitivity.
#[inline]
pub fn eq_names(a: &str, b: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        a == b
    } else if a.is_ascii() && b.is_ascii() {
        a.eq_ignore_ascii_case(b)
    } else {
        a.chars()
            .flat_map(char::to_lowercase)
            .eq(b.chars().flat_map(char::to_lowercase))
    }
}

/// Resolves user input against declared names and returns the index of the
/// winning name.
///
/// The passes run in a fixed order, each over every declared name:
///
/// 1. the raw declared spelling, with the configured case sensitivity;
/// 2. the raw declared spelling with the opposite case sensitivity, when the
///    policy accepts ordinal spellings;
/// 3. the policy-transformed spellings, with the configured case
///    sensitivity.
///
/// The order decides which name wins when several could match, so it must
/// not change.
pub fn resolve<'n, I>(
    declared: I,
    input: &str,
    case_sensitive: bool,
    policy: NamingPolicy,
) -> Option<usize>
where
    I: IntoIterator<Item = &'n str>,
    I::IntoIter: Clone,
{
    let names = declared.into_iter();
    if let Some(i) = names.clone().position(|n| eq_names(n, input, case_sensitive)) {
        return Some(i);
    }
    if policy.supports_ordinal() {
        if let Some(i) = names.clone().position(|n| eq_names(n, input, !case_sensitive)) {
            return Some(i);
        }
    }
    names.enumerate().find_map(|(i, n)| {
        policy
            .spellings(n)
            .iter()
            .any(|s| s != n && eq_names(s, input, case_sensitive))
            .then_some(i)
    })
}
