//! Codepoint identifiers and token coercion

use std::fmt;

/// A Unicode codepoint identifying one downloadable page
///
/// Codepoints order by their integer value. The value is not required to be a
/// valid Unicode scalar value; surrogates simply cannot be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Codepoint(pub u32);

impl Codepoint {
    /// Highest codepoint in the Unicode codespace
    pub const MAX: Codepoint = Codepoint(0x10FFFF);

    /// Returns the integer value of this codepoint
    pub fn value(self) -> u32 {
        self.0
    }

    /// Returns the character for this codepoint, if it is a Unicode scalar value
    pub fn as_char(self) -> Option<char> {
        char::from_u32(self.0)
    }

    /// Returns the following codepoint, or `None` on integer overflow
    pub fn next(self) -> Option<Codepoint> {
        self.0.checked_add(1).map(Codepoint)
    }
}

impl fmt::Display for Codepoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U+{:04X}", self.0)
    }
}

impl From<char> for Codepoint {
    fn from(c: char) -> Self {
        Codepoint(c as u32)
    }
}

impl From<u32> for Codepoint {
    fn from(value: u32) -> Self {
        Codepoint(value)
    }
}

/// Coerces a range token into a codepoint
///
/// A token is tried as a number first, then as a literal character:
///
/// 1. Decimal (`19968`), hex (`0x4e00`) or Unicode notation (`U+4E00`)
/// 2. A token of exactly one character yields that character's codepoint
///
/// Surrounding whitespace is ignored. Anything else (the empty token, or
/// several non-numeric characters) fails coercion and returns `None`.
///
/// # Examples
///
/// ```
/// use koohii_mirror::range::{coerce_codepoint, Codepoint};
///
/// assert_eq!(coerce_codepoint("19968"), Some(Codepoint(0x4e00)));
/// assert_eq!(coerce_codepoint("一"), Some(Codepoint(0x4e00)));
/// assert_eq!(coerce_codepoint("a"), Some(Codepoint(97)));
/// assert_eq!(coerce_codepoint(""), None);
/// ```
pub fn coerce_codepoint(token: &str) -> Option<Codepoint> {
    let token = token.trim();

    if let Some(value) = parse_numeric(token) {
        return Some(Codepoint(value));
    }

    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(Codepoint::from(c)),
        _ => None,
    }
}

/// Parses the numeric forms accepted by [`coerce_codepoint`]
fn parse_numeric(token: &str) -> Option<u32> {
    let hex = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .or_else(|| token.strip_prefix("U+"))
        .or_else(|| token.strip_prefix("u+"));

    match hex {
        Some(digits) if is_plain_digits(digits, 16) => u32::from_str_radix(digits, 16).ok(),
        Some(_) => None,
        None if is_plain_digits(token, 10) => token.parse().ok(),
        None => None,
    }
}

// `from_str_radix` tolerates a leading '+', which would let "+5" through as a number
fn is_plain_digits(s: &str, radix: u32) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_digit(radix))
}
