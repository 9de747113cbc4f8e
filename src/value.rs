//! Turning raw option text into values: boolean literals, and quote-aware
//! splitting of list and dictionary values.

use ahash::AHashMap;

use crate::separators::SeparatorSet;

/// Why a collection value could not be split.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CollectionFormatError {
    #[error("a quote at offset {0} follows an unquoted value")]
    QuoteInsideValue(usize),
    #[error("unexpected character after the closing quote at offset {0}")]
    AfterClosingQuote(usize),
    #[error("unterminated quote")]
    UnterminatedQuote,
    #[error("'{0}' is not of the form key=value")]
    MissingEquals(String),
}

/// Reads a boolean literal.
///
/// `true`, `yes`, `on`, `1` and the empty string are true; `false`, `no`,
/// `off` and `0` are false. Letters are matched case-insensitively.
/// Anything else is `None`.
pub fn parse_bool(s: &str) -> Option<bool> {
    let is = |lit: &str| s.eq_ignore_ascii_case(lit);
    match s.len() {
        0 => Some(true),
        1 if s == "1" => Some(true),
        1 if s == "0" => Some(false),
        2 if is("on") => Some(true),
        2 if is("no") => Some(false),
        3 if is("yes") => Some(true),
        3 if is("off") => Some(false),
        4 if is("true") => Some(true),
        5 if is("false") => Some(false),
        _ => None,
    }
}

/// The canonical text of a boolean.
#[inline]
pub(crate) fn bool_str(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SplitState {
    Start,
    QuoteStart,
    QuotedValue,
    QuotedSeparator,
    QuoteEnd,
    Value,
    Separator,
}

/// Splits a list value on any of `seps`.
///
/// Separators between double quotes are literal. `""` is an empty item, and
/// every leading, trailing or doubled separator produces an empty item. An
/// empty input has no items.
///
/// ```
/// use argvox::{split_collection, SeparatorSet};
///
/// let items = split_collection(r#"a,b,"c,d","#, &SeparatorSet::of(&[','])).unwrap();
/// assert_eq!(items, ["a", "b", "c,d", ""]);
/// ```
pub fn split_collection<'a>(
    s: &'a str,
    seps: &SeparatorSet,
) -> Result<Vec<&'a str>, CollectionFormatError> {
    use self::SplitState::*;

    let mut items = vec![];
    if s.is_empty() {
        return Ok(items);
    }
    let mut state = Start;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        let is_sep = seps.contains(c);
        state = match state {
            Start | Separator => {
                if c == '"' {
                    start = i + 1;
                    QuoteStart
                } else if is_sep {
                    items.push("");
                    Separator
                } else {
                    start = i;
                    Value
                }
            }
            QuoteStart => {
                if c == '"' {
                    items.push("");
                    QuoteEnd
                } else if is_sep {
                    QuotedSeparator
                } else {
                    QuotedValue
                }
            }
            QuotedValue | QuotedSeparator => {
                if c == '"' {
                    items.push(&s[start..i]);
                    QuoteEnd
                } else if is_sep {
                    QuotedSeparator
                } else {
                    QuotedValue
                }
            }
            QuoteEnd => {
                if !is_sep {
                    return Err(CollectionFormatError::AfterClosingQuote(i));
                }
                Separator
            }
            Value => {
                if c == '"' {
                    return Err(CollectionFormatError::QuoteInsideValue(i));
                }
                if is_sep {
                    items.push(&s[start..i]);
                    Separator
                } else {
                    Value
                }
            }
        };
    }
    match state {
        Start | QuoteEnd => {}
        Separator => items.push(""),
        Value => items.push(&s[start..]),
        QuoteStart | QuotedValue | QuotedSeparator => {
            return Err(CollectionFormatError::UnterminatedQuote);
        }
    }
    Ok(items)
}

/// Splits a dictionary value into `key=value` pairs.
///
/// Items are split like `split_collection`, then each item at its first `=`.
/// When a key repeats, the last value wins and keeps the position of the
/// first occurrence.
pub fn split_dictionary<'a>(
    s: &'a str,
    seps: &SeparatorSet,
) -> Result<Vec<(&'a str, &'a str)>, CollectionFormatError> {
    let items = split_collection(s, seps)?;
    let mut pairs: Vec<(&'a str, &'a str)> = Vec::with_capacity(items.len());
    let mut seen: AHashMap<&'a str, usize> = AHashMap::new();
    for item in items {
        let (key, value) = item
            .split_once('=')
            .ok_or_else(|| CollectionFormatError::MissingEquals(item.to_string()))?;
        match seen.get(key) {
            Some(&i) => pairs[i].1 = value,
            None => {
                seen.insert(key, pairs.len());
                pairs.push((key, value));
            }
        }
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comma() -> SeparatorSet {
        SeparatorSet::of(&[','])
    }

    #[test]
    fn boolean_totality() {
        for s in ["1", "true", "TRUE", "True", "yes", "YeS", "on", "ON", ""] {
            assert_eq!(parse_bool(s), Some(true), "{s:?}");
        }
        for s in ["0", "false", "FALSE", "no", "No", "off", "oFF"] {
            assert_eq!(parse_bool(s), Some(false), "{s:?}");
        }
        for s in ["2", "t", "f", "y", "n", "truee", "falsey", "enabled", " true", "-1"] {
            assert_eq!(parse_bool(s), None, "{s:?}");
        }
    }

    #[test]
    fn split_quoted_and_trailing() {
        assert_eq!(split_collection(r#"a,b,"c,d","#, &comma()).unwrap(), [
            "a", "b", "c,d", ""
        ]);
    }

    #[test]
    fn split_gaps() {
        let semi = SeparatorSet::of(&[';']);
        assert_eq!(split_collection("a;;b", &semi).unwrap(), ["a", "", "b"]);
        assert_eq!(split_collection(",a", &comma()).unwrap(), ["", "a"]);
        assert_eq!(split_collection(",", &comma()).unwrap(), ["", ""]);
        assert!(split_collection("", &comma()).unwrap().is_empty());
    }

    #[test]
    fn split_several_separators() {
        let seps = SeparatorSet::of(&[',', ';']);
        assert_eq!(split_collection("a;b,c", &seps).unwrap(), ["a", "b", "c"]);
    }

    #[test]
    fn split_empty_quotes() {
        assert_eq!(split_collection(r#""",a"#, &comma()).unwrap(), ["", "a"]);
        assert_eq!(split_collection(r#"a,"""#, &comma()).unwrap(), ["a", ""]);
    }

    #[test]
    fn split_format_errors() {
        assert_eq!(
            split_collection(r#"a,"b"#, &comma()),
            Err(CollectionFormatError::UnterminatedQuote)
        );
        assert_eq!(
            split_collection(r#""a,b"#, &comma()),
            Err(CollectionFormatError::UnterminatedQuote)
        );
        assert_eq!(
            split_collection(r#"ab"c""#, &comma()),
            Err(CollectionFormatError::QuoteInsideValue(2))
        );
        assert_eq!(
            split_collection(r#""a"b"#, &comma()),
            Err(CollectionFormatError::AfterClosingQuote(3))
        );
    }

    #[test]
    fn dictionary() {
        let pairs = split_dictionary("a=1,b=x=y,a=3", &comma()).unwrap();
        assert_eq!(pairs, [("a", "3"), ("b", "x=y")]);
        assert_eq!(
            split_dictionary("a=1,b", &comma()),
            Err(CollectionFormatError::MissingEquals("b".into()))
        );
        assert_eq!(split_dictionary(r#""k=a,b""#, &comma()).unwrap(), [("k", "a,b")]);
    }
}
