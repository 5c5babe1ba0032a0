use crate::error::LicitaError;
use crate::extraction::table::detect_tables;
use crate::extraction::{PageTables, TableBackend};
use std::io::Write;
use std::process::Command;

/// Table extraction backend using pdftotext (from poppler-utils).
///
/// Uses `pdftotext -layout` to preserve whitespace alignment of tables, then
/// rebuilds table rows from column positions.
pub struct PdftotextBackend;

impl PdftotextBackend {
    pub fn new() -> Self {
        PdftotextBackend
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftotextBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl TableBackend for PdftotextBackend {
    fn extract_tables(&self, pdf_bytes: &[u8]) -> Result<Vec<PageTables>, LicitaError> {
        let mut tmpfile =
            tempfile::NamedTempFile::new().map_err(|e| LicitaError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(pdf_bytes)
            .map_err(|e| LicitaError::Extraction(e.to_string()))?;

        let output = Command::new("pdftotext")
            .arg("-layout")
            .arg(tmpfile.path())
            .arg("-") // output to stdout
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    LicitaError::PdftotextNotFound
                } else {
                    LicitaError::Extraction(format!("pdftotext failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(LicitaError::PdftotextFailed { code, stderr });
        }

        let text = String::from_utf8_lossy(&output.stdout);
        Ok(split_pages(&text))
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

/// Split layout text into pages (form feed separated) and detect the tables
/// of each page.
fn split_pages(text: &str) -> Vec<PageTables> {
    let mut pages: Vec<PageTables> = text
        .split('\x0c')
        .enumerate()
        .map(|(i, page_text)| {
            let lines: Vec<String> = page_text.lines().map(|l| l.to_string()).collect();
            PageTables {
                page_number: i + 1,
                tables: detect_tables(&lines),
            }
        })
        .collect();

    // pdftotext terminates the last page with a form feed too
    if pages.len() > 1 && text.ends_with('\x0c') {
        pages.pop();
    }

    pages
}
