//! Label words and procedure codes.

use super::patterns::{
    DETAILED_LABEL_TOKEN, GLUED_PROCEDURE_CODE, PROCEDURE_CODE, STANDARD_LABEL_TOKEN,
};
use super::{FieldKind, MismatchReason, TokenMatcher};

/// Matches one word of an uppercase care label.
pub enum LabelMatcher {
    /// Letters and hyphens.
    Standard,
    /// Letters and parentheses.
    Detailed,
}

impl TokenMatcher for LabelMatcher {
    type Output = String;

    fn field(&self) -> FieldKind {
        FieldKind::Label
    }

    fn match_token(&self, token: &str) -> Result<String, MismatchReason> {
        let pattern = match self {
            LabelMatcher::Standard => &*STANDARD_LABEL_TOKEN,
            LabelMatcher::Detailed => &*DETAILED_LABEL_TOKEN,
        };
        if pattern.is_match(token) {
            Ok(token.to_string())
        } else {
            Err(MismatchReason::Shape)
        }
    }
}

/// Matches a parenthesised alphanumeric procedure code.
pub struct CodeMatcher;

impl CodeMatcher {
    /// Split `LABEL(CODE)` into the label word and the code.
    pub fn split_glued<'a>(&self, token: &'a str) -> Option<(&'a str, &'a str)> {
        let caps = GLUED_PROCEDURE_CODE.captures(token)?;
        let prefix = caps.get(1)?.as_str();
        let code = caps.get(2)?.as_str();
        Some((prefix, code))
    }
}

impl TokenMatcher for CodeMatcher {
    type Output = String;

    fn field(&self) -> FieldKind {
        FieldKind::ProcedureCode
    }

    fn match_token(&self, token: &str) -> Result<String, MismatchReason> {
        PROCEDURE_CODE
            .captures(token)
            .map(|caps| caps[1].to_string())
            .ok_or(MismatchReason::Shape)
    }
}
