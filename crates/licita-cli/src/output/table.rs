use licita_core::classify::classify;
use licita_core::model::MacroCategory;
use licita_core::rules::schema::KeywordRuleSet;
use licita_core::split::{CategorySplit, FamilyStats};
use licita_core::ConsolidationRun;
use std::path::{Path, PathBuf};

pub fn print_consolidation(run: &ConsolidationRun, written: &[&Path]) {
    let summary = &run.summary;

    println!("=== Consolidation ===\n");
    println!(
        "  Pages scanned: {}  tables: {}  rows extracted: {}",
        run.pages_scanned, run.tables_found, run.extracted_rows
    );
    println!("  Rows kept: {}", summary.source_rows);
    if run.dropped.total() > 0 {
        println!("  Rows dropped: {}", run.dropped);
    }
    println!(
        "  Lots: {}  ({} repeated, {} rows merged)",
        summary.lot_count,
        summary.repeated_lots,
        summary.source_rows - summary.lot_count
    );
    println!("  Total quantity: {}\n", summary.total_quantity);

    if !summary.most_repeated.is_empty() {
        println!("  Most repeated:");
        let width = summary
            .most_repeated
            .iter()
            .map(|r| r.name.chars().count())
            .max()
            .unwrap_or(10);
        for r in &summary.most_repeated {
            println!(
                "    {:<width$}  x{}  (quantity {})",
                r.name,
                r.repetition_count,
                r.quantity,
                width = width
            );
        }
        println!();
    }

    for path in written {
        println!("  Wrote {}", path.display());
    }
}

pub fn print_split(
    split: &CategorySplit,
    out_dir: &Path,
    file_for: impl Fn(MacroCategory) -> PathBuf,
) {
    println!("=== Categories ({}) ===\n", out_dir.display());

    for s in &split.summary {
        println!(
            "  {:<24} {:>5} lots  {:>12}  -> {}",
            s.category.as_str(),
            s.lot_count,
            s.total_quantity,
            file_for(s.category).display()
        );
    }
    println!();

    if let Some(otros) = split.group(MacroCategory::Otros) {
        println!(
            "  {} lots matched no keyword and need manual review in {}.",
            otros.lots.len(),
            file_for(MacroCategory::Otros).display()
        );
    }
}

pub fn print_families(families: &[FamilyStats], ruleset: &KeywordRuleSet, lot_count: usize) {
    println!(
        "=== Families ({} distinct, {} lots) ===\n",
        families.len(),
        lot_count
    );

    let width = families
        .iter()
        .map(|f| f.family_label.chars().count())
        .max()
        .unwrap_or(10);

    for f in families {
        println!(
            "  {:<width$}  {:>5} lots  {:>12}  -> {}",
            f.family_label,
            f.lot_count,
            f.total_quantity,
            classify(&f.family_label, ruleset),
            width = width
        );
    }
}
