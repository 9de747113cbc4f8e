//! Small fixed-capacity character sets used for option value and
//! collection item separators.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The maximum number of characters a `SeparatorSet` can hold.
pub const MAX_SEPARATORS: usize = 4;

/// An ordered set of at most four distinct separator characters.
///
/// The set is `Copy` and lives inline, so checking a character against it
/// never allocates. The empty set is valid and means "no separator".
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeparatorSet {
    chars: [char; MAX_SEPARATORS],
    len:   u8,
}

/// Why a `SeparatorSet` could not be built.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SeparatorError {
    #[error("a separator set holds at most 4 characters, but {0} were given")]
    TooMany(usize),
    #[error("separator '{0}' appears more than once")]
    Duplicate(char),
    #[error("the NUL character cannot be used as a separator")]
    Nul,
}

impl SeparatorSet {
    /// The set that contains nothing.
    pub const EMPTY: SeparatorSet = SeparatorSet {
        chars: ['\0'; MAX_SEPARATORS],
        len:   0,
    };

    /// Builds a set at compile time. Invalid input fails const evaluation.
    pub const fn of(chars: &[char]) -> SeparatorSet {
        assert!(chars.len() <= MAX_SEPARATORS, "too many separators");
        let mut set = SeparatorSet::EMPTY;
        let mut i = 0;
        while i < chars.len() {
            assert!(chars[i] != '\0', "NUL separator");
            let mut j = 0;
            while j < i {
                assert!(chars[j] != chars[i], "duplicate separator");
                j += 1;
            }
            set.chars[i] = chars[i];
            i += 1;
        }
        set.len = chars.len() as u8;
        set
    }

    /// Builds a set, validating capacity, uniqueness and the absence of NUL.
    pub fn new(chars: &[char]) -> Result<SeparatorSet, SeparatorError> {
        if chars.len() > MAX_SEPARATORS {
            return Err(SeparatorError::TooMany(chars.len()));
        }
        let mut set = SeparatorSet::EMPTY;
        for (i, &c) in chars.iter().enumerate() {
            if c == '\0' {
                return Err(SeparatorError::Nul);
            }
            if chars[..i].contains(&c) {
                return Err(SeparatorError::Duplicate(c));
            }
            set.chars[i] = c;
        }
        set.len = chars.len() as u8;
        Ok(set)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[char] {
        &self.chars[..self.len()]
    }

    #[inline]
    pub fn contains(&self, c: char) -> bool {
        // Unused slots hold NUL, which is never a member.
        c != '\0' && self.chars.contains(&c)
    }

    /// Byte offset of the first separator in `s`, if any.
    #[inline]
    pub fn find_in(&self, s: &str) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        s.find(|c: char| self.contains(c))
    }

    /// Whether `s` contains any character of this set.
    #[inline]
    pub fn contains_any(&self, s: &str) -> bool {
        self.find_in(s).is_some()
    }
}

impl Default for SeparatorSet {
    fn default() -> Self {
        SeparatorSet::EMPTY
    }
}

impl fmt::Debug for SeparatorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.as_slice()).finish()
    }
}

impl fmt::Display for SeparatorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.as_slice() {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl TryFrom<String> for SeparatorSet {
    type Error = SeparatorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        SeparatorSet::new(&s.chars().collect::<Vec<char>>())
    }
}

impl From<SeparatorSet> for String {
    fn from(set: SeparatorSet) -> String {
        set.to_string()
    }
}
