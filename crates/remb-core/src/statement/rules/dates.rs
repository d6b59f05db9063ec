//! Care date tokens.

use super::patterns::DATE_TOKEN;
use super::{FieldKind, MismatchReason, TokenMatcher};

/// chrono format of statement dates.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Matches one `DD/MM/YYYY` token and keeps it as written.
pub struct DateMatcher;

impl TokenMatcher for DateMatcher {
    type Output = String;

    fn field(&self) -> FieldKind {
        FieldKind::Date
    }

    fn match_token(&self, token: &str) -> Result<String, MismatchReason> {
        if DATE_TOKEN.is_match(token) {
            Ok(token.to_string())
        } else {
            Err(MismatchReason::Shape)
        }
    }
}
