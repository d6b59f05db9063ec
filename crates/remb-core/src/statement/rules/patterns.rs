//! Token shapes for reimbursement statement lines.
//!
//! Every pattern is anchored and applies to a single whitespace-delimited
//! token, never to a whole line.

use lazy_static::lazy_static;
use regex::Regex;

/// Marker flagging candidate lines in the simple layout.
pub const REIMBURSEMENT_MARKER: &str = "REMBOURSEMENT";

lazy_static! {
    // Care date, DD/MM/YYYY (not calendar checked)
    pub static ref DATE_TOKEN: Regex = Regex::new(
        r"^\d{2}/\d{2}/\d{4}$"
    ).unwrap();

    // Standard layout label words: uppercase Latin letters, accented forms, hyphens
    pub static ref STANDARD_LABEL_TOKEN: Regex = Regex::new(
        r"^[A-ZÀ-ÖØ-ÞŒŸ-]+$"
    ).unwrap();

    // Detailed layout label words: uppercase Latin letters, accented forms, parentheses
    pub static ref DETAILED_LABEL_TOKEN: Regex = Regex::new(
        r"^[A-ZÀ-ÖØ-ÞŒŸ()]+$"
    ).unwrap();

    // Procedure code as its own token: (C), (GS), (K15)
    pub static ref PROCEDURE_CODE: Regex = Regex::new(
        r"^\(([A-Za-z0-9]+)\)$"
    ).unwrap();

    // Procedure code glued to the last label word: CONSULTATION(C)
    pub static ref GLUED_PROCEDURE_CODE: Regex = Regex::new(
        r"^(.+?)\(([A-Za-z0-9]+)\)$"
    ).unwrap();

    // Euro amount: 25,00  -3,5  120  17,50€  8.40
    pub static ref DECIMAL_TOKEN: Regex = Regex::new(
        r"^[+-]?\d+(?:[,.]\d+)?€?$"
    ).unwrap();

    // Integer rate: 70%  100%
    pub static ref PERCENT_TOKEN: Regex = Regex::new(
        r"^(\d{1,3})%$"
    ).unwrap();
}
