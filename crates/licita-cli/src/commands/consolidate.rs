use licita_core::error::LicitaError;
use licita_core::extraction::pdftotext::PdftotextBackend;
use licita_core::sheet::{self, SHEET_CONSOLIDATED, SHEET_ORIGINAL};
use licita_core::ConsolidationRun;
use std::path::{Path, PathBuf};

use crate::commands::{write_outputs, Output};
use crate::{output, prompt};

pub fn run(
    pdf_file: Option<PathBuf>,
    out_dir: &Path,
    output_format: &str,
) -> Result<(), LicitaError> {
    let pdf_file = match pdf_file {
        Some(path) => path,
        None => prompt::pdf_file()?,
    };
    if !pdf_file.exists() {
        return Err(LicitaError::InputNotFound { path: pdf_file });
    }
    if !PdftotextBackend::is_available() {
        return Err(LicitaError::PdftotextNotFound);
    }

    let pdf_bytes = std::fs::read(&pdf_file)?;
    let backend = PdftotextBackend::new();
    let run = licita_core::consolidate_pdf(&pdf_bytes, &backend)?;

    let outputs = render(&run, &pdf_file, out_dir)?;
    write_outputs(out_dir, &outputs)?;

    let written: Vec<&Path> = outputs.iter().map(|(p, _)| p.as_path()).collect();
    match output_format {
        "json" => output::json::print(&run.summary)?,
        _ => output::table::print_consolidation(&run, &written),
    }

    Ok(())
}

/// `<stem>_CONSOLIDADO.xlsx` and `<stem>_DATOS_ORIGINALES.xlsx` under `out_dir`.
fn output_paths(pdf_file: &Path, out_dir: &Path) -> (PathBuf, PathBuf) {
    let stem = pdf_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "licitacion".into());
    (
        out_dir.join(format!("{stem}_CONSOLIDADO.xlsx")),
        out_dir.join(format!("{stem}_DATOS_ORIGINALES.xlsx")),
    )
}

fn render(
    run: &ConsolidationRun,
    pdf_file: &Path,
    out_dir: &Path,
) -> Result<Vec<Output>, LicitaError> {
    let (consolidated, original) = output_paths(pdf_file, out_dir);
    Ok(vec![
        (
            consolidated,
            sheet::write_workbook(SHEET_CONSOLIDATED, &sheet::lots_table(&run.lots))?,
        ),
        (
            original,
            sheet::write_workbook(
                SHEET_ORIGINAL,
                &sheet::records_table(&run.schema, &run.records),
            )?,
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use licita_core::extraction::PageTables;

    fn sample_run() -> ConsolidationRun {
        let rows = [
            ["CANT", "NOMBRE", "DESCRIPCION", "FAMILIA", "UNIDAD"],
            ["3", "SILLA", "NEGRA", "MOBILIARIO", "PIEZA"],
            ["2", "SILLA", "NEGRA", "MOBILIARIO", "PIEZA"],
            ["1", "LAPTOP", "14 PULGADAS", "COMPUTADORA", "PIEZA"],
        ];
        let table: Vec<Vec<String>> = rows
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect();
        licita_core::consolidate_pages(&[PageTables {
            page_number: 1,
            tables: vec![table],
        }])
        .unwrap()
    }

    #[test]
    fn outputs_are_named_after_the_pdf() {
        let (consolidated, original) =
            output_paths(Path::new("/docs/REQCONS.pdf"), Path::new("salida"));
        assert_eq!(consolidated, Path::new("salida/REQCONS_CONSOLIDADO.xlsx"));
        assert_eq!(original, Path::new("salida/REQCONS_DATOS_ORIGINALES.xlsx"));
    }

    #[test]
    fn consolidated_workbook_is_readable_by_split() {
        let dir = tempfile::tempdir().unwrap();
        let run = sample_run();

        let outputs = render(&run, Path::new("REQCONS.pdf"), dir.path()).unwrap();
        write_outputs(dir.path(), &outputs).unwrap();

        let lots = sheet::read_lots(&dir.path().join("REQCONS_CONSOLIDADO.xlsx")).unwrap();
        assert_eq!(lots, run.lots);
        assert_eq!(lots[0].repetition_count, 2);
        assert!(dir.path().join("REQCONS_DATOS_ORIGINALES.xlsx").is_file());
    }
}
