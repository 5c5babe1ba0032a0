pub mod xlsx;

use rust_decimal::Decimal;
use std::path::Path;

use crate::error::LicitaError;
use crate::model::{
    CleanedRecord, ColumnSchema, ConsolidatedLot, MacroCategory, COL_DESCRIPTION, COL_FAMILY,
    COL_NAME, COL_NOTES, COL_QUANTITY, COL_REPETITIONS, COL_UNIT,
};
use crate::split::CategorySummary;

pub use xlsx::{read_lots_xlsx, write_workbook};

pub const SHEET_CONSOLIDATED: &str = "Lotes Consolidados";
pub const SHEET_ORIGINAL: &str = "Datos Extraidos";
pub const SHEET_SUMMARY: &str = "Resumen";

/// Column order of a consolidated-lot sheet.
pub const LOT_COLUMNS: [&str; 7] = [
    COL_QUANTITY,
    COL_NAME,
    COL_DESCRIPTION,
    COL_FAMILY,
    COL_UNIT,
    COL_REPETITIONS,
    COL_NOTES,
];

pub const SUMMARY_COLUMNS: [&str; 4] = ["categoria", "archivo", "lotes", "cantidad_total"];

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(Decimal),
    Count(usize),
}

/// Named columns and the rows under them, ready for a spreadsheet writer.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

fn text(s: &str) -> CellValue {
    CellValue::Text(s.to_string())
}

/// Cleaned records laid out with the columns of the extraction schema.
pub fn records_table(schema: &ColumnSchema, records: &[CleanedRecord]) -> SheetTable {
    let rows = records
        .iter()
        .map(|r| {
            let mut fixed = vec![
                CellValue::Number(r.quantity),
                text(&r.name),
                text(&r.description),
                text(&r.family_label),
                text(&r.unit),
                text(&r.notes),
            ];
            fixed.truncate(schema.width());
            fixed.extend(r.extra.iter().map(|e| text(e)));
            fixed
        })
        .collect();

    SheetTable {
        columns: schema.columns.clone(),
        rows,
    }
}

pub fn lots_table(lots: &[ConsolidatedLot]) -> SheetTable {
    let rows = lots
        .iter()
        .map(|l| {
            vec![
                CellValue::Number(l.quantity),
                text(&l.name),
                text(&l.description),
                text(&l.family_label),
                text(&l.unit),
                CellValue::Count(l.repetition_count),
                text(&l.notes),
            ]
        })
        .collect();

    SheetTable {
        columns: LOT_COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows,
    }
}

/// One row per category group; `file_name` names the output holding the group.
pub fn summary_table(
    summary: &[CategorySummary],
    file_name: impl Fn(MacroCategory) -> String,
) -> SheetTable {
    let rows = summary
        .iter()
        .map(|s| {
            vec![
                text(s.category.as_str()),
                CellValue::Text(file_name(s.category)),
                CellValue::Count(s.lot_count),
                CellValue::Number(s.total_quantity),
            ]
        })
        .collect();

    SheetTable {
        columns: SUMMARY_COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows,
    }
}

/// Read consolidated lots from an `.xlsx` or `.json` file.
pub fn read_lots(path: &Path) -> Result<Vec<ConsolidatedLot>, LicitaError> {
    if !path.exists() {
        return Err(LicitaError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = std::fs::read(path)?;
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        read_lots_json(&bytes)
    } else {
        read_lots_xlsx(&bytes)
    }
}

pub fn read_lots_json(bytes: &[u8]) -> Result<Vec<ConsolidatedLot>, LicitaError> {
    Ok(serde_json::from_slice(bytes)?)
}
