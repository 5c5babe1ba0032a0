pub mod pdftotext;
pub mod table;

use serde::{Deserialize, Serialize};

use crate::error::LicitaError;
use crate::model::{ColumnSchema, RawRow, RowOrigin, MIN_ROW_WIDTH};

/// A table as detected on a page: rows of text cells, header row first.
pub type Table = Vec<Vec<String>>;

/// Tables detected on a single page of a document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageTables {
    pub page_number: usize,
    pub tables: Vec<Table>,
}

/// Trait for document table extraction backends.
pub trait TableBackend: Send + Sync {
    /// Extract the tables of every page, in page order.
    fn extract_tables(&self, pdf_bytes: &[u8]) -> Result<Vec<PageTables>, LicitaError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Rows accepted from a document together with the schema they share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedRows {
    pub schema: ColumnSchema,
    pub rows: Vec<RawRow>,
    pub pages_scanned: usize,
    pub tables_found: usize,
}

/// Collect data rows from every table of every page.
///
/// The first row of each table is its header and is skipped. A row is kept
/// when it has at least one non-blank cell and at least [`MIN_ROW_WIDTH`]
/// cells. The schema is fixed by the width of the first kept row.
pub fn extract_rows(pages: &[PageTables]) -> Result<ExtractedRows, LicitaError> {
    let mut rows = Vec::new();
    let mut tables_found = 0;

    for page in pages {
        if page.page_number == 1 || page.page_number % 10 == 0 {
            tracing::debug!(page = page.page_number, total = pages.len(), "processing page");
        }

        for (table_index, table) in page.tables.iter().enumerate() {
            if table.len() < 2 {
                continue;
            }
            tables_found += 1;

            for (row_index, cells) in table.iter().enumerate().skip(1) {
                if !accept_row(cells) {
                    continue;
                }
                rows.push(RawRow {
                    origin: RowOrigin {
                        page_number: page.page_number,
                        table_index,
                        row_index,
                    },
                    cells: cells.clone(),
                });
            }
        }
    }

    let Some(first) = rows.first() else {
        return Err(LicitaError::NoTabularData);
    };
    let schema = ColumnSchema::for_width(first.cells.len());

    tracing::info!(
        pages = pages.len(),
        tables = tables_found,
        rows = rows.len(),
        columns = schema.width(),
        "extraction complete"
    );

    Ok(ExtractedRows {
        schema,
        rows,
        pages_scanned: pages.len(),
        tables_found,
    })
}

fn accept_row(cells: &[String]) -> bool {
    cells.len() >= MIN_ROW_WIDTH && cells.iter().any(|c| !c.trim().is_empty())
}
