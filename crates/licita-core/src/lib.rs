pub mod classify;
pub mod consolidate;
pub mod error;
pub mod extraction;
pub mod model;
pub mod normalize;
pub mod rules;
pub mod sheet;
pub mod split;

use serde::{Deserialize, Serialize};

use consolidate::ConsolidationSummary;
use error::LicitaError;
use extraction::{PageTables, TableBackend};
use model::{CleanedRecord, ColumnSchema, ConsolidatedLot};
use normalize::DropReport;
use rules::schema::KeywordRuleSet;
use split::CategorySplit;

/// Everything produced by one extraction → cleaning → consolidation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidationRun {
    pub schema: ColumnSchema,
    pub pages_scanned: usize,
    pub tables_found: usize,
    pub extracted_rows: usize,
    /// Cleaned rows, in document order.
    pub records: Vec<CleanedRecord>,
    pub dropped: DropReport,
    /// Consolidated lots, largest quantity first.
    pub lots: Vec<ConsolidatedLot>,
    pub summary: ConsolidationSummary,
}

/// Main API entry point: extract, clean and consolidate the tables of a PDF.
pub fn consolidate_pdf(
    pdf_bytes: &[u8],
    backend: &dyn TableBackend,
) -> Result<ConsolidationRun, LicitaError> {
    tracing::info!(backend = backend.backend_name(), "extracting tables");
    let pages = backend.extract_tables(pdf_bytes)?;
    consolidate_pages(&pages)
}

/// Run the pipeline on tables already extracted from a document.
pub fn consolidate_pages(pages: &[PageTables]) -> Result<ConsolidationRun, LicitaError> {
    let extracted = extraction::extract_rows(pages)?;
    let normalized = normalize::normalize_rows(&extracted.rows, &extracted.schema)?;
    let lots = consolidate::consolidate(&normalized.records)?;
    let summary = consolidate::summarize(&normalized.records, &lots)?;

    Ok(ConsolidationRun {
        schema: extracted.schema,
        pages_scanned: extracted.pages_scanned,
        tables_found: extracted.tables_found,
        extracted_rows: extracted.rows.len(),
        records: normalized.records,
        dropped: normalized.dropped,
        lots,
        summary,
    })
}

/// Route consolidated lots to their macro-categories.
pub fn split_lots(
    lots: &[ConsolidatedLot],
    ruleset: &KeywordRuleSet,
) -> Result<CategorySplit, LicitaError> {
    tracing::info!(lots = lots.len(), ruleset = %ruleset.name, "splitting by category");
    split::split_by_category(lots, ruleset)
}
