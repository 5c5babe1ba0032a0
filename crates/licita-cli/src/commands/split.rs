use licita_core::error::LicitaError;
use licita_core::model::MacroCategory;
use licita_core::sheet::{self, SHEET_SUMMARY};
use licita_core::split::{family_breakdown, CategorySplit};
use std::path::{Path, PathBuf};

use crate::commands::{load_rules, write_outputs, Output};
use crate::{output, prompt};

pub const SUMMARY_FILE: &str = "RESUMEN_CATEGORIAS.xlsx";

fn category_file(out_dir: &Path, category: MacroCategory) -> PathBuf {
    out_dir.join(format!("{category}.xlsx"))
}

pub fn run(
    input_file: Option<PathBuf>,
    rule_file: Option<PathBuf>,
    out_dir: &Path,
    output_format: &str,
) -> Result<(), LicitaError> {
    let input_file = match input_file {
        Some(path) => path,
        None => prompt::consolidated_file()?,
    };
    let lots = sheet::read_lots(&input_file)?;
    if lots.is_empty() {
        return Err(LicitaError::Sheet(format!(
            "no lots found in {}",
            input_file.display()
        )));
    }
    let ruleset = load_rules(rule_file)?;

    let split = licita_core::split_lots(&lots, &ruleset)?;

    let outputs = render(&split, out_dir)?;
    write_outputs(out_dir, &outputs)?;

    match output_format {
        "json" => output::json::print(&split.summary)?,
        _ => output::table::print_split(&split, out_dir, |c| category_file(out_dir, c)),
    }

    Ok(())
}

/// One workbook per category group plus the summary workbook.
fn render(split: &CategorySplit, out_dir: &Path) -> Result<Vec<Output>, LicitaError> {
    let mut outputs = Vec::with_capacity(split.groups.len() + 1);
    for group in &split.groups {
        outputs.push((
            category_file(out_dir, group.category),
            sheet::write_workbook(group.category.as_str(), &sheet::lots_table(&group.lots))?,
        ));
    }
    let summary = sheet::summary_table(&split.summary, |c| {
        category_file(out_dir, c).display().to_string()
    });
    outputs.push((
        out_dir.join(SUMMARY_FILE),
        sheet::write_workbook(SHEET_SUMMARY, &summary)?,
    ));
    Ok(outputs)
}

pub fn families(input_file: &Path, rule_file: Option<PathBuf>) -> Result<(), LicitaError> {
    let lots = sheet::read_lots(input_file)?;
    let ruleset = load_rules(rule_file)?;
    let families = family_breakdown(&lots)?;
    output::table::print_families(&families, &ruleset, lots.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use licita_core::model::ConsolidatedLot;
    use licita_core::rules::builtin::default_ruleset;
    use std::ffi::OsString;

    fn lot(quantity: u32, name: &str, family: &str) -> ConsolidatedLot {
        ConsolidatedLot {
            quantity: quantity.into(),
            name: name.into(),
            description: String::new(),
            family_label: family.into(),
            unit: "PIEZA".into(),
            repetition_count: 1,
            notes: String::new(),
        }
    }

    #[test]
    fn category_files_are_named_after_the_category() {
        assert_eq!(
            category_file(Path::new("CATEGORIAS_SEPARADAS"), MacroCategory::EquipoMedico),
            Path::new("CATEGORIAS_SEPARADAS/EQUIPO_MEDICO.xlsx")
        );
    }

    #[test]
    fn split_writes_one_workbook_per_group_and_a_summary() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("CATEGORIAS_SEPARADAS");
        let lots = vec![
            lot(4, "SILLA", "MOBILIARIO"),
            lot(2, "OXIMETRO", "OXIMETRO DE PULSO"),
            lot(1, "ENGRAPADORA", "PAPELERIA"),
            lot(6, "MESA", "MESA DE JUNTAS"),
        ];
        let split = licita_core::split_lots(&lots, &default_ruleset().unwrap()).unwrap();

        let outputs = render(&split, &out).unwrap();
        write_outputs(&out, &outputs).unwrap();

        let mut names: Vec<OsString> = std::fs::read_dir(&out)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                OsString::from("EQUIPO_MEDICO.xlsx"),
                OsString::from("MOBILIARIO.xlsx"),
                OsString::from("OTROS.xlsx"),
                OsString::from(SUMMARY_FILE),
            ]
        );

        let furniture = sheet::read_lots(&out.join("MOBILIARIO.xlsx")).unwrap();
        let names: Vec<&str> = furniture.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["MESA", "SILLA"]);
    }
}
