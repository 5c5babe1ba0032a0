pub mod values;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LicitaError;
use crate::model::{
    CleanedRecord, ColumnSchema, RawRow, COL_DESCRIPTION, COL_FAMILY, COL_NAME, COL_NOTES,
    COL_QUANTITY, COL_UNIT,
};
use values::parse_quantity;

/// Why a raw row did not become a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    Blank,
    MissingName,
    InvalidQuantity,
}

/// Aggregate count of rows excluded during cleaning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropReport {
    pub blank: usize,
    pub missing_name: usize,
    pub invalid_quantity: usize,
}

impl DropReport {
    pub fn total(&self) -> usize {
        self.blank + self.missing_name + self.invalid_quantity
    }

    fn record(&mut self, reason: DropReason) {
        match reason {
            DropReason::Blank => self.blank += 1,
            DropReason::MissingName => self.missing_name += 1,
            DropReason::InvalidQuantity => self.invalid_quantity += 1,
        }
    }
}

impl fmt::Display for DropReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} row(s) dropped: {} blank, {} without name, {} with invalid quantity",
            self.total(),
            self.blank,
            self.missing_name,
            self.invalid_quantity
        )
    }
}

/// Records that passed validation, plus what was left out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedRecords {
    pub records: Vec<CleanedRecord>,
    pub dropped: DropReport,
}

/// Turn raw rows into cleaned records.
///
/// Rows are dropped, in this order of checks, when every cell is blank, when
/// the name is missing or blank, or when the quantity is not a non-negative
/// number. Fails with [`LicitaError::NoValidRecords`] if nothing survives.
pub fn normalize_rows(
    rows: &[RawRow],
    schema: &ColumnSchema,
) -> Result<NormalizedRecords, LicitaError> {
    let fields = FieldIndex::new(schema)?;
    let mut records = Vec::with_capacity(rows.len());
    let mut dropped = DropReport::default();

    for row in rows {
        match clean_row(row, &fields) {
            Ok(record) => records.push(record),
            Err(reason) => {
                tracing::debug!(
                    page = row.origin.page_number,
                    row = row.origin.row_index,
                    ?reason,
                    cells = ?row.cells,
                    "row dropped"
                );
                dropped.record(reason);
            }
        }
    }

    if records.is_empty() {
        return Err(LicitaError::NoValidRecords { dropped });
    }

    tracing::info!(
        valid = records.len(),
        dropped = dropped.total(),
        "cleaning complete"
    );

    Ok(NormalizedRecords { records, dropped })
}

/// Column positions resolved once per run.
struct FieldIndex {
    quantity: usize,
    name: usize,
    description: Option<usize>,
    family: Option<usize>,
    unit: Option<usize>,
    notes: Option<usize>,
    extra_start: usize,
    width: usize,
}

impl FieldIndex {
    fn new(schema: &ColumnSchema) -> Result<Self, LicitaError> {
        let required = |name: &str| {
            schema
                .index_of(name)
                .ok_or_else(|| LicitaError::MissingColumn(name.to_string()))
        };
        Ok(FieldIndex {
            quantity: required(COL_QUANTITY)?,
            name: required(COL_NAME)?,
            description: schema.index_of(COL_DESCRIPTION),
            family: schema.index_of(COL_FAMILY),
            unit: schema.index_of(COL_UNIT),
            notes: schema.index_of(COL_NOTES),
            extra_start: schema.width() - schema.extra_columns().len(),
            width: schema.width(),
        })
    }
}

fn clean_row(row: &RawRow, fields: &FieldIndex) -> Result<CleanedRecord, DropReason> {
    if row.is_blank() {
        return Err(DropReason::Blank);
    }

    let name = trimmed(row, Some(fields.name));
    if name.is_empty() {
        return Err(DropReason::MissingName);
    }

    let quantity = row
        .cell(fields.quantity)
        .and_then(parse_quantity)
        .ok_or(DropReason::InvalidQuantity)?;

    let extra = (fields.extra_start..fields.width)
        .map(|i| trimmed(row, Some(i)))
        .collect();

    Ok(CleanedRecord {
        origin: row.origin,
        quantity,
        name,
        description: trimmed(row, fields.description),
        family_label: trimmed(row, fields.family),
        unit: trimmed(row, fields.unit),
        notes: trimmed(row, fields.notes),
        extra,
    })
}

fn trimmed(row: &RawRow, index: Option<usize>) -> String {
    index
        .and_then(|i| row.cell(i))
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}
