//! Euro amount parsing with comma decimals.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::DECIMAL_TOKEN;
use super::{FieldKind, MismatchReason, TokenMatcher};

/// Matches one euro amount token, comma or dot decimals.
pub struct DecimalMatcher;

impl TokenMatcher for DecimalMatcher {
    type Output = Decimal;

    fn field(&self) -> FieldKind {
        FieldKind::Amount
    }

    fn match_token(&self, token: &str) -> Result<Decimal, MismatchReason> {
        if !DECIMAL_TOKEN.is_match(token) {
            return Err(MismatchReason::Shape);
        }
        parse_euro_amount(token).ok_or(MismatchReason::Parse)
    }
}

/// Parse a statement amount (e.g., "17,50€", "25,00" or "-3.5").
///
/// The euro sign is dropped and a comma is read as the decimal point.
/// Thousands separators are not supported.
pub fn parse_euro_amount(s: &str) -> Option<Decimal> {
    let cleaned = s.replace('€', "");
    let cleaned = cleaned.trim();
    let cleaned = cleaned.strip_prefix('+').unwrap_or(cleaned);

    if cleaned.is_empty()
        || !cleaned
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
    {
        return None;
    }
    if cleaned.matches([',', '.']).count() > 1 || cleaned.chars().skip(1).any(|c| c == '-') {
        return None;
    }

    Decimal::from_str(&cleaned.replace(',', ".")).ok()
}

/// Format an amount the way statements print it (17,50).
pub fn format_euro_amount(amount: Decimal) -> String {
    format!("{:.2}", amount).replace('.', ",")
}
