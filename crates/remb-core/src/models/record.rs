//! Reimbursement record models, one shape per statement layout.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::statement::rules::DATE_FORMAT;

/// Statement layout a run is parsed against.
///
/// Selected before parsing and fixed for the whole document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaVariant {
    /// Marker heuristic: `date description... amount`.
    #[default]
    Simple,
    /// `date LABEL base amount rate% reimbursed`.
    Standard,
    /// `date LABEL (CODE) paid base rate% paid_out rate% supplement`.
    Detailed,
}

const SIMPLE_COLUMNS: &[&str] = &["date", "description", "amount"];

const STANDARD_COLUMNS: &[&str] = &["date", "label", "baseAmount", "reimbursedAmount"];

const DETAILED_COLUMNS: &[&str] = &[
    "date",
    "label",
    "procedureCode",
    "paidAmount",
    "reimbursementBase",
    "reimbursementRate",
    "paidOut",
    "supplementRate",
    "supplementAmount",
];

impl SchemaVariant {
    /// All layouts, in declaration order.
    pub const ALL: [SchemaVariant; 3] = [
        SchemaVariant::Simple,
        SchemaVariant::Standard,
        SchemaVariant::Detailed,
    ];

    /// Output column names, in order.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            SchemaVariant::Simple => SIMPLE_COLUMNS,
            SchemaVariant::Standard => STANDARD_COLUMNS,
            SchemaVariant::Detailed => DETAILED_COLUMNS,
        }
    }

    /// Lowercase name, as used in config files and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            SchemaVariant::Simple => "simple",
            SchemaVariant::Standard => "standard",
            SchemaVariant::Detailed => "detailed",
        }
    }
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SchemaVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(SchemaVariant::Simple),
            "standard" => Ok(SchemaVariant::Standard),
            "detailed" => Ok(SchemaVariant::Detailed),
            other => Err(format!(
                "unknown layout '{}', expected one of: simple, standard, detailed",
                other
            )),
        }
    }
}

/// Record from the simple layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleRecord {
    /// First token of the line.
    pub date: String,

    /// Tokens between the date and the amount, single-space joined.
    pub description: String,

    /// Amount in euros.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

/// Record from the standard layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardRecord {
    /// Care date (`DD/MM/YYYY`).
    pub date: String,

    /// Care label.
    pub label: String,

    /// Base amount in euros.
    #[serde(with = "rust_decimal::serde::str")]
    pub base_amount: Decimal,

    /// Reimbursed amount in euros.
    #[serde(with = "rust_decimal::serde::str")]
    pub reimbursed_amount: Decimal,
}

/// Record from the detailed layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedRecord {
    /// Care date (`DD/MM/YYYY`).
    pub date: String,

    /// Care label.
    pub label: String,

    /// Procedure code, without parentheses.
    pub procedure_code: Option<String>,

    /// Amount paid by the patient.
    #[serde(with = "rust_decimal::serde::str")]
    pub paid_amount: Decimal,

    /// Reimbursement base.
    #[serde(with = "rust_decimal::serde::str")]
    pub reimbursement_base: Decimal,

    /// Reimbursement rate in percent.
    pub reimbursement_rate: u8,

    /// Amount paid out by the insurer.
    #[serde(with = "rust_decimal::serde::str")]
    pub paid_out: Decimal,

    /// Supplementary cover rate in percent.
    pub supplement_rate: u8,

    /// Supplementary cover amount.
    #[serde(with = "rust_decimal::serde::str")]
    pub supplement_amount: Decimal,
}

/// A structured reimbursement line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReimbursementRecord {
    Simple(SimpleRecord),
    Standard(StandardRecord),
    Detailed(DetailedRecord),
}

impl ReimbursementRecord {
    /// Layout this record was extracted with.
    pub fn variant(&self) -> SchemaVariant {
        match self {
            ReimbursementRecord::Simple(_) => SchemaVariant::Simple,
            ReimbursementRecord::Standard(_) => SchemaVariant::Standard,
            ReimbursementRecord::Detailed(_) => SchemaVariant::Detailed,
        }
    }

    /// The date cell as written in the statement.
    pub fn date(&self) -> &str {
        match self {
            ReimbursementRecord::Simple(r) => &r.date,
            ReimbursementRecord::Standard(r) => &r.date,
            ReimbursementRecord::Detailed(r) => &r.date,
        }
    }

    /// Parse the date cell as a calendar date.
    ///
    /// Records keep the raw text; this is for hosts that want to sort or
    /// group by date. Returns `None` for impossible dates like `31/02/2023`.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date(), DATE_FORMAT).ok()
    }

    /// Amount that reached the insured person for this line.
    ///
    /// Detailed lines add the supplementary cover to the insurer's payment.
    pub fn reimbursed_total(&self) -> Decimal {
        match self {
            ReimbursementRecord::Simple(r) => r.amount,
            ReimbursementRecord::Standard(r) => r.reimbursed_amount,
            ReimbursementRecord::Detailed(r) => r.paid_out + r.supplement_amount,
        }
    }

    /// Cells in column order, decimals rendered with a dot.
    pub fn to_row(&self) -> Vec<String> {
        match self {
            ReimbursementRecord::Simple(r) => vec![
                r.date.clone(),
                r.description.clone(),
                r.amount.to_string(),
            ],
            ReimbursementRecord::Standard(r) => vec![
                r.date.clone(),
                r.label.clone(),
                r.base_amount.to_string(),
                r.reimbursed_amount.to_string(),
            ],
            ReimbursementRecord::Detailed(r) => vec![
                r.date.clone(),
                r.label.clone(),
                r.procedure_code.clone().unwrap_or_default(),
                r.paid_amount.to_string(),
                r.reimbursement_base.to_string(),
                r.reimbursement_rate.to_string(),
                r.paid_out.to_string(),
                r.supplement_rate.to_string(),
                r.supplement_amount.to_string(),
            ],
        }
    }
}

impl From<SimpleRecord> for ReimbursementRecord {
    fn from(record: SimpleRecord) -> Self {
        ReimbursementRecord::Simple(record)
    }
}

impl From<StandardRecord> for ReimbursementRecord {
    fn from(record: StandardRecord) -> Self {
        ReimbursementRecord::Standard(record)
    }
}

impl From<DetailedRecord> for ReimbursementRecord {
    fn from(record: DetailedRecord) -> Self {
        ReimbursementRecord::Detailed(record)
    }
}
