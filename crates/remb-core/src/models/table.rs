//! Append-only record table with a fixed column schema.

use crate::error::ExtractionError;

use super::record::{ReimbursementRecord, SchemaVariant};

/// Accumulates records of one layout in arrival order.
///
/// Records can only be appended. [`TableBuilder::finish`] freezes the
/// builder into a [`ReimbursementTable`].
#[derive(Debug, Clone)]
pub struct TableBuilder {
    variant: SchemaVariant,
    records: Vec<ReimbursementRecord>,
}

impl TableBuilder {
    /// Create an empty builder for the given layout.
    pub fn new(variant: SchemaVariant) -> Self {
        Self {
            variant,
            records: Vec::new(),
        }
    }

    /// Append a record.
    ///
    /// Fails if the record was extracted with a different layout.
    pub fn push(&mut self, record: ReimbursementRecord) -> Result<(), ExtractionError> {
        let found = record.variant();
        if found != self.variant {
            return Err(ExtractionError::VariantMismatch {
                expected: self.variant,
                found,
            });
        }
        self.records.push(record);
        Ok(())
    }

    pub fn variant(&self) -> SchemaVariant {
        self.variant
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Freeze into a table.
    pub fn finish(self) -> ReimbursementTable {
        ReimbursementTable {
            variant: self.variant,
            records: self.records,
        }
    }
}

/// Finished, immutable table of reimbursement records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReimbursementTable {
    variant: SchemaVariant,
    records: Vec<ReimbursementRecord>,
}

impl ReimbursementTable {
    pub fn variant(&self) -> SchemaVariant {
        self.variant
    }

    /// Column names for this table's layout.
    pub fn columns(&self) -> &'static [&'static str] {
        self.variant.columns()
    }

    /// Records in order of appearance.
    pub fn records(&self) -> &[ReimbursementRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReimbursementRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no qualifying line was found.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Row-oriented view: one vector of cells per record, in column order.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.records.iter().map(ReimbursementRecord::to_row).collect()
    }
}

impl<'a> IntoIterator for &'a ReimbursementTable {
    type Item = &'a ReimbursementRecord;
    type IntoIter = std::slice::Iter<'a, ReimbursementRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
