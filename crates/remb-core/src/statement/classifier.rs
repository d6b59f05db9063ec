//! Layout-specific line rules.

use rust_decimal::Decimal;

use crate::models::record::{
    DetailedRecord, ReimbursementRecord, SchemaVariant, SimpleRecord, StandardRecord,
};

use super::rules::{
    parse_euro_amount, CodeMatcher, DateMatcher, DecimalMatcher, FieldKind, LabelMatcher,
    LineMismatch, MismatchReason, PercentageMatcher, TokenCursor, TokenMatcher,
    REIMBURSEMENT_MARKER,
};
use super::LineClassifier;

/// Classifier applying the rule of one statement layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantClassifier {
    variant: SchemaVariant,
}

impl VariantClassifier {
    pub fn new(variant: SchemaVariant) -> Self {
        Self { variant }
    }

    /// Marker heuristic: date first, amount last, description in between.
    fn simple(&self, line: &str) -> Result<ReimbursementRecord, LineMismatch> {
        if !line.to_uppercase().contains(REIMBURSEMENT_MARKER) {
            return Err(LineMismatch::new(
                FieldKind::Marker,
                0,
                None,
                MismatchReason::Missing,
            ));
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 3 {
            return Err(LineMismatch::new(
                FieldKind::Description,
                tokens.len(),
                None,
                MismatchReason::TooFewTokens { found: tokens.len() },
            ));
        }

        let last = tokens.len() - 1;
        let amount = parse_euro_amount(tokens[last]).ok_or_else(|| {
            LineMismatch::new(FieldKind::Amount, last, Some(tokens[last]), MismatchReason::Parse)
        })?;

        Ok(SimpleRecord {
            date: tokens[0].to_string(),
            description: tokens[1..last].join(" "),
            amount,
        }
        .into())
    }

    /// `date LABEL base amount rate% reimbursed`
    fn standard(&self, line: &str) -> Result<ReimbursementRecord, LineMismatch> {
        let mut cursor = TokenCursor::new(line);

        let date = cursor.expect(&DateMatcher)?;
        let label = cursor.expect_many(&LabelMatcher::Standard)?.join(" ");
        let base_amount = cursor.expect(&DecimalMatcher)?;
        cursor.expect(&DecimalMatcher)?;
        cursor.expect(&PercentageMatcher)?;
        let reimbursed_amount = cursor.expect(&DecimalMatcher)?;
        cursor.finish()?;

        Ok(StandardRecord {
            date,
            label,
            base_amount,
            reimbursed_amount,
        }
        .into())
    }

    /// `date LABEL [(CODE)] paid base rate% paid_out rate% supplement`
    fn detailed(&self, line: &str) -> Result<ReimbursementRecord, LineMismatch> {
        let mut cursor = TokenCursor::new(line);

        let date = cursor.expect(&DateMatcher)?;
        let (label, procedure_code) = label_and_code(&mut cursor)?;
        let paid_amount = cursor.expect(&DecimalMatcher)?;
        let reimbursement_base = cursor.expect(&DecimalMatcher)?;
        let reimbursement_rate = cursor.expect(&PercentageMatcher)?;
        let paid_out = cursor.expect(&DecimalMatcher)?;
        let supplement_rate = cursor.expect(&PercentageMatcher)?;
        let supplement_amount: Decimal = cursor.expect(&DecimalMatcher)?;
        cursor.finish()?;

        Ok(DetailedRecord {
            date,
            label,
            procedure_code,
            paid_amount,
            reimbursement_base,
            reimbursement_rate,
            paid_out,
            supplement_rate,
            supplement_amount,
        }
        .into())
    }
}

/// Read a detailed-layout label and its optional procedure code.
///
/// The code is either its own `(CODE)` token or glued to the last label
/// word. A letters-only code like `(CS)` also fits the label shape, so the
/// last label word is taken as the code when at least one word precedes it.
fn label_and_code(
    cursor: &mut TokenCursor<'_>,
) -> Result<(String, Option<String>), LineMismatch> {
    let label_matcher = LabelMatcher::Detailed;
    let mut words = Vec::new();
    while let Some(word) = cursor.accept(&label_matcher) {
        words.push(word);
    }

    let mut code = cursor.accept(&CodeMatcher);

    if code.is_none() {
        if let Some(token) = cursor.peek() {
            if let Some((prefix, glued)) = CodeMatcher.split_glued(token) {
                if label_matcher.match_token(prefix).is_ok() {
                    words.push(prefix.to_string());
                    code = Some(glued.to_string());
                    cursor.advance();
                }
            }
        }
    }

    if code.is_none() && !words.is_empty() {
        let last = words.len() - 1;
        let glued = CodeMatcher
            .split_glued(&words[last])
            .map(|(prefix, glued)| (prefix.to_string(), glued.to_string()));

        if let Some((prefix, glued)) = glued {
            words[last] = prefix;
            code = Some(glued);
        } else if last >= 1 {
            if let Ok(standalone) = CodeMatcher.match_token(&words[last]) {
                code = Some(standalone);
                words.pop();
            }
        }
    }

    if words.is_empty() {
        let reason = if cursor.peek().is_some() {
            MismatchReason::Shape
        } else {
            MismatchReason::Missing
        };
        return Err(LineMismatch::new(
            FieldKind::Label,
            cursor.position(),
            cursor.peek(),
            reason,
        ));
    }

    Ok((words.join(" "), code))
}

impl LineClassifier for VariantClassifier {
    fn variant(&self) -> SchemaVariant {
        self.variant
    }

    fn diagnose(&self, line: &str) -> Result<ReimbursementRecord, LineMismatch> {
        match self.variant {
            SchemaVariant::Simple => self.simple(line),
            SchemaVariant::Standard => self.standard(line),
            SchemaVariant::Detailed => self.detailed(line),
        }
    }
}
