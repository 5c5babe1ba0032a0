use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Format, Workbook};

use crate::error::LicitaError;
use crate::model::{
    ConsolidatedLot, COL_DESCRIPTION, COL_FAMILY, COL_NAME, COL_NOTES, COL_QUANTITY,
    COL_REPETITIONS, COL_UNIT,
};
use crate::normalize::values::parse_quantity;
use crate::sheet::{CellValue, SheetTable};

/// Render a table as a single-sheet xlsx workbook, header row in bold.
///
/// The workbook is built in memory so callers can prepare every output
/// before touching the filesystem.
pub fn write_workbook(sheet_label: &str, table: &SheetTable) -> Result<Vec<u8>, LicitaError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_label)?;

    for (col, name) in table.columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col_num(col)?, name.as_str(), &header)?;
    }

    for (i, row) in table.rows.iter().enumerate() {
        let row_num = u32::try_from(i + 1)
            .map_err(|_| LicitaError::Sheet(format!("too many rows ({})", table.rows.len())))?;
        for (col, cell) in row.iter().enumerate() {
            let col = col_num(col)?;
            match cell {
                CellValue::Text(s) => {
                    worksheet.write_string(row_num, col, s.as_str())?;
                }
                CellValue::Number(d) => {
                    let value = d.to_f64().ok_or_else(|| {
                        LicitaError::Sheet(format!(
                            "quantity {d} does not fit a spreadsheet number"
                        ))
                    })?;
                    worksheet.write_number(row_num, col, value)?;
                }
                CellValue::Count(n) => {
                    worksheet.write_number(row_num, col, *n as f64)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn col_num(col: usize) -> Result<u16, LicitaError> {
    u16::try_from(col).map_err(|_| LicitaError::Sheet(format!("too many columns ({col})")))
}

/// Parse the first sheet of a consolidated-lot workbook.
///
/// The header row is matched by column name, so column order does not
/// matter. `Cantidad`, `Nombre` and `Familia` are required; a missing
/// `Veces_Repetido` column counts every lot once.
pub fn read_lots_xlsx(bytes: &[u8]) -> Result<Vec<ConsolidatedLot>, LicitaError> {
    let cursor = Cursor::new(bytes);
    let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(cursor)
        .map_err(|e| LicitaError::Sheet(format!("failed to open xlsx: {e}")))?;

    let sheet = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LicitaError::Sheet("workbook has no sheets".into()))?
        .map_err(|e| LicitaError::Sheet(format!("failed to read first sheet: {e}")))?;

    let mut rows = sheet.rows();
    let header: Vec<String> = rows
        .next()
        .ok_or_else(|| LicitaError::Sheet("sheet is empty".into()))?
        .iter()
        .map(|c| cell_as_string(c).unwrap_or_default())
        .collect();

    let position = |name: &str| header.iter().position(|h| h == name);
    let required = |name: &str| {
        position(name).ok_or_else(|| LicitaError::MissingColumn(name.to_string()))
    };

    let quantity_col = required(COL_QUANTITY)?;
    let name_col = required(COL_NAME)?;
    let family_col = required(COL_FAMILY)?;
    let description_col = position(COL_DESCRIPTION);
    let unit_col = position(COL_UNIT);
    let repetitions_col = position(COL_REPETITIONS);
    let notes_col = position(COL_NOTES);

    let mut lots = Vec::new();
    // Sheet row numbers are 1-based and the header is row 1.
    for (sheet_row, row) in rows.enumerate().map(|(i, r)| (i + 2, r)) {
        let text_at = |col: Option<usize>| {
            col.and_then(|c| row.get(c))
                .and_then(cell_as_string)
                .unwrap_or_default()
        };

        let name = text_at(Some(name_col));
        if name.is_empty() {
            continue;
        }

        let quantity = row
            .get(quantity_col)
            .and_then(cell_as_decimal)
            .ok_or_else(|| {
                LicitaError::Sheet(format!(
                    "row {sheet_row}: '{}' is not a valid quantity",
                    text_at(Some(quantity_col))
                ))
            })?;

        let repetition_count = match repetitions_col.and_then(|c| row.get(c)) {
            None | Some(Data::Empty) => 1,
            Some(cell) => cell_as_count(cell).ok_or_else(|| {
                LicitaError::Sheet(format!(
                    "row {sheet_row}: '{cell}' is not a valid repetition count"
                ))
            })?,
        };

        lots.push(ConsolidatedLot {
            quantity,
            name,
            description: text_at(description_col),
            family_label: text_at(Some(family_col)),
            unit: text_at(unit_col),
            repetition_count,
            notes: text_at(notes_col),
        });
    }

    tracing::debug!(lots = lots.len(), "read consolidated workbook");
    Ok(lots)
}

fn cell_as_string(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Empty => None,
        _ => Some(format!("{cell}")),
    }
}

fn cell_as_decimal(cell: &Data) -> Option<Decimal> {
    match cell {
        Data::Float(f) => f64_to_decimal(*f),
        Data::Int(i) => Some(Decimal::from(*i)),
        Data::String(s) => parse_quantity(s),
        _ => None,
    }
}

fn cell_as_count(cell: &Data) -> Option<usize> {
    match cell {
        Data::Float(f) => f64_to_decimal(*f)
            .filter(|d| d.fract().is_zero())
            .and_then(|d| d.to_usize())
            .filter(|n| *n >= 1),
        Data::Int(i) => usize::try_from(*i).ok().filter(|n| *n >= 1),
        Data::String(s) => s.trim().parse::<usize>().ok().filter(|n| *n >= 1),
        _ => None,
    }
}

/// Convert f64 to Decimal, preserving reasonable precision.
///
/// Uses string round-trip to avoid floating-point artifacts
/// (e.g., 0.35_f64 becoming 0.34999...).
fn f64_to_decimal(f: f64) -> Option<Decimal> {
    let s = format!("{f}");
    s.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::try_from(f).ok())
        .filter(|d| !d.is_sign_negative())
        .map(|d| d.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::{lots_table, LOT_COLUMNS, SHEET_CONSOLIDATED};
    use rust_decimal_macros::dec;

    fn lot(qty: Decimal, name: &str, reps: usize, notes: &str) -> ConsolidatedLot {
        ConsolidatedLot {
            quantity: qty,
            name: name.into(),
            description: "NEGRA".into(),
            family_label: "MOBILIARIO".into(),
            unit: "PIEZA".into(),
            repetition_count: reps,
            notes: notes.into(),
        }
    }

    #[test]
    fn f64_to_decimal_preserves_precision() {
        assert_eq!(f64_to_decimal(0.35), Some(dec!(0.35)));
        assert_eq!(f64_to_decimal(68.0), Some(dec!(68)));
        assert_eq!(f64_to_decimal(-1.0), None);
    }

    #[test]
    fn float_counts_must_be_whole_and_in_range() {
        assert_eq!(cell_as_count(&Data::Float(3.0)), Some(3));
        assert_eq!(cell_as_count(&Data::Float(2.5)), None);
        assert_eq!(cell_as_count(&Data::Float(0.0)), None);
        assert_eq!(cell_as_count(&Data::Float(-2.0)), None);
        assert_eq!(cell_as_count(&Data::Float(1e20)), None);
        assert_eq!(cell_as_count(&Data::Float(1e300)), None);
        assert_eq!(cell_as_count(&Data::Float(f64::NAN)), None);
    }

    #[test]
    fn consolidated_workbook_reads_back() {
        let lots = vec![
            lot(dec!(12.5), "SILLA EJECUTIVA", 3, "urgente | planta baja"),
            lot(dec!(1), "ARCHIVERO", 1, ""),
        ];
        let bytes = write_workbook(SHEET_CONSOLIDATED, &lots_table(&lots)).unwrap();
        let back = read_lots_xlsx(&bytes).unwrap();
        assert_eq!(back, lots);
    }

    #[test]
    fn missing_required_column_is_reported() {
        let mut table = lots_table(&[lot(dec!(1), "A", 1, "")]);
        let family = LOT_COLUMNS.iter().position(|c| *c == COL_FAMILY).unwrap();
        table.columns[family] = "Categoria".into();
        let bytes = write_workbook("x", &table).unwrap();
        assert!(matches!(
            read_lots_xlsx(&bytes),
            Err(LicitaError::MissingColumn(c)) if c == COL_FAMILY
        ));
    }

    #[test]
    fn invalid_quantity_names_the_row() {
        let mut table = lots_table(&[lot(dec!(1), "A", 1, "")]);
        table.rows[0][0] = CellValue::Text("N/D".into());
        let bytes = write_workbook("x", &table).unwrap();
        let err = read_lots_xlsx(&bytes).unwrap_err().to_string();
        assert!(err.contains("row 2"), "{err}");
    }

    #[test]
    fn garbage_bytes_are_a_sheet_error() {
        assert!(matches!(
            read_lots_xlsx(b"not a workbook"),
            Err(LicitaError::Sheet(_))
        ));
    }
}
