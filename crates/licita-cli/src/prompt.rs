use licita_core::error::LicitaError;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// File offered to `licita split` when no input is given.
pub const DEFAULT_CONSOLIDATED_FILE: &str = "REQCONS_CONSOLIDADO.xlsx";

/// Ask for the consolidated file, offering the default one when it exists.
pub fn consolidated_file() -> Result<PathBuf, LicitaError> {
    let default = Path::new(DEFAULT_CONSOLIDATED_FILE);
    if default.exists() {
        eprintln!("Found {}", default.display());
        let answer = ask("Use this file? (S/N): ")?;
        if answer.eq_ignore_ascii_case("s") {
            return Ok(default.to_path_buf());
        }
    }
    path("Path to the consolidated file: ")
}

/// Ask for the PDF to consolidate.
pub fn pdf_file() -> Result<PathBuf, LicitaError> {
    eprintln!("Example: C:\\Users\\me\\Documents\\licitacion.pdf");
    path("Path to the PDF: ")
}

fn path(question: &str) -> Result<PathBuf, LicitaError> {
    let answer = ask(question)?;
    Ok(PathBuf::from(strip_quotes(&answer)))
}

fn ask(question: &str) -> Result<String, LicitaError> {
    let mut stderr = io::stderr();
    write!(stderr, "{question}")?;
    stderr.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Paths pasted from a file manager often come wrapped in quotes.
fn strip_quotes(s: &str) -> &str {
    s.trim().trim_matches('"')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_are_stripped() {
        assert_eq!(strip_quotes(" \"C:\\docs\\req.pdf\" "), "C:\\docs\\req.pdf");
        assert_eq!(strip_quotes("req.pdf"), "req.pdf");
    }
}
