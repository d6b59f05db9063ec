//! Integer percentage rates.

use super::patterns::PERCENT_TOKEN;
use super::{FieldKind, MismatchReason, TokenMatcher};

/// Matches one `N%` token with N in 0..=100.
pub struct PercentageMatcher;

impl TokenMatcher for PercentageMatcher {
    type Output = u8;

    fn field(&self) -> FieldKind {
        FieldKind::Percentage
    }

    fn match_token(&self, token: &str) -> Result<u8, MismatchReason> {
        let caps = PERCENT_TOKEN.captures(token).ok_or(MismatchReason::Shape)?;
        parse_percentage(token).ok_or_else(|| match caps[1].parse::<u8>() {
            Ok(_) => MismatchReason::OutOfRange,
            Err(_) => MismatchReason::Parse,
        })
    }
}

/// Parse a rate such as "70%" or "70" into an integer percentage.
pub fn parse_percentage(s: &str) -> Option<u8> {
    let s = s.trim();
    let digits = s.strip_suffix('%').unwrap_or(s).trim_end();
    digits.parse::<u8>().ok().filter(|v| *v <= 100)
}
