//! 6-digit code extraction from free-form chat text.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// A standalone run of exactly six digits with word boundaries on both sides.
///
/// `\b` is Unicode-aware, so a neighbouring digit of any script (or a letter)
/// blocks the match and codes are never cut out of longer numbers.
static OTP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-9]{6}\b").expect("otp pattern compiles"));

/// A one-time password: exactly six ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OtpCode(String);

impl OtpCode {
    /// Validate a raw string as a code.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.len() == 6 && raw.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(raw.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Find the leftmost standalone 6-digit code in `text`.
///
/// Later codes in the same text are ignored.
pub fn extract_otp(text: &str) -> Option<OtpCode> {
    OTP_PATTERN
        .find(text)
        .map(|m| OtpCode(m.as_str().to_string()))
}
