//! Typed token rules for reimbursement lines.

pub mod amounts;
pub mod dates;
pub mod labels;
pub mod patterns;
pub mod rates;

pub use amounts::{format_euro_amount, parse_euro_amount, DecimalMatcher};
pub use dates::{DateMatcher, DATE_FORMAT};
pub use labels::{CodeMatcher, LabelMatcher};
pub use patterns::REIMBURSEMENT_MARKER;
pub use rates::{parse_percentage, PercentageMatcher};

use std::fmt;

/// Trait for single-token field matchers.
pub trait TokenMatcher {
    /// The type of value this matcher produces.
    type Output;

    /// Field reported when the token is rejected.
    fn field(&self) -> FieldKind;

    /// Match and convert one token.
    fn match_token(&self, token: &str) -> Result<Self::Output, MismatchReason>;
}

/// Field a rule was trying to read when a line was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// The simple-layout marker word.
    Marker,
    Date,
    Description,
    Label,
    ProcedureCode,
    Amount,
    Percentage,
    /// Tokens left over after the last field.
    LineEnd,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Marker => "marker",
            FieldKind::Date => "date",
            FieldKind::Description => "description",
            FieldKind::Label => "label",
            FieldKind::ProcedureCode => "procedure code",
            FieldKind::Amount => "amount",
            FieldKind::Percentage => "percentage",
            FieldKind::LineEnd => "end of line",
        };
        f.write_str(name)
    }
}

/// Why a token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchReason {
    /// The line ended before the field.
    Missing,
    /// The token does not have the field's shape.
    Shape,
    /// The token has the right shape but does not convert.
    Parse,
    /// The value converts but is outside the allowed range.
    OutOfRange,
    /// The line has too few tokens for the layout.
    TooFewTokens { found: usize },
    /// A token was found where the line should end.
    Unexpected,
}

impl fmt::Display for MismatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MismatchReason::Missing => f.write_str("missing"),
            MismatchReason::Shape => f.write_str("unexpected shape"),
            MismatchReason::Parse => f.write_str("not a number"),
            MismatchReason::OutOfRange => f.write_str("out of range"),
            MismatchReason::TooFewTokens { found } => write!(f, "only {} tokens", found),
            MismatchReason::Unexpected => f.write_str("trailing token"),
        }
    }
}

/// Why a line produced no record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMismatch {
    /// Field being matched.
    pub field: FieldKind,
    /// Zero-based index of the offending token.
    pub position: usize,
    /// The offending token, if any.
    pub token: Option<String>,
    pub reason: MismatchReason,
}

impl LineMismatch {
    pub fn new(
        field: FieldKind,
        position: usize,
        token: Option<&str>,
        reason: MismatchReason,
    ) -> Self {
        Self {
            field,
            position,
            token: token.map(str::to_string),
            reason,
        }
    }

    /// Whether the line got past the leading field (marker or date).
    ///
    /// Lines rejected on their leading field are ordinary statement text;
    /// the rest looked like entries and are worth reporting.
    pub fn is_candidate(&self) -> bool {
        !matches!(self.field, FieldKind::Marker | FieldKind::Date)
    }
}

impl fmt::Display for LineMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.token {
            Some(token) => write!(
                f,
                "{} at token {} ('{}'): {}",
                self.field,
                self.position + 1,
                token,
                self.reason
            ),
            None => write!(f, "{} at token {}: {}", self.field, self.position + 1, self.reason),
        }
    }
}

/// Walks the whitespace-separated tokens of one line, left to right.
pub struct TokenCursor<'a> {
    tokens: Vec<&'a str>,
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    pub fn new(line: &'a str) -> Self {
        Self {
            tokens: line.split_whitespace().collect(),
            pos: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).copied()
    }

    pub fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Match the next token, which must be present.
    pub fn expect<M: TokenMatcher>(&mut self, matcher: &M) -> Result<M::Output, LineMismatch> {
        let token = self.peek().ok_or_else(|| {
            LineMismatch::new(matcher.field(), self.pos, None, MismatchReason::Missing)
        })?;
        let value = matcher
            .match_token(token)
            .map_err(|reason| LineMismatch::new(matcher.field(), self.pos, Some(token), reason))?;
        self.pos += 1;
        Ok(value)
    }

    /// Match the next token if it fits, leaving the cursor in place otherwise.
    pub fn accept<M: TokenMatcher>(&mut self, matcher: &M) -> Option<M::Output> {
        let value = matcher.match_token(self.peek()?).ok()?;
        self.pos += 1;
        Some(value)
    }

    /// Match as many consecutive tokens as fit, at least one.
    pub fn expect_many<M: TokenMatcher>(
        &mut self,
        matcher: &M,
    ) -> Result<Vec<M::Output>, LineMismatch> {
        let first = self.expect(matcher)?;
        let mut values = vec![first];
        while let Some(value) = self.accept(matcher) {
            values.push(value);
        }
        Ok(values)
    }

    /// Fail if any token is left.
    pub fn finish(&self) -> Result<(), LineMismatch> {
        match self.peek() {
            Some(token) => Err(LineMismatch::new(
                FieldKind::LineEnd,
                self.pos,
                Some(token),
                MismatchReason::Unexpected,
            )),
            None => Ok(()),
        }
    }
}
