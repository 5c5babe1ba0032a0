use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LicitaError;
use crate::model::{CleanedRecord, ConsolidatedLot, NOTES_SEPARATOR};

/// How many lots the summary lists as most repeated.
pub const MOST_REPEATED_LIMIT: usize = 5;

/// Running totals for one `(name, description)` key.
struct LotAccumulator {
    quantity: Decimal,
    family_label: String,
    unit: String,
    repetition_count: usize,
    notes: Vec<String>,
}

impl LotAccumulator {
    fn seed(record: &CleanedRecord) -> Self {
        let mut acc = LotAccumulator {
            quantity: record.quantity,
            family_label: record.family_label.clone(),
            unit: record.unit.clone(),
            repetition_count: 1,
            notes: Vec::new(),
        };
        acc.add_note(&record.notes);
        acc
    }

    /// Fold a later record with the same key. Family and unit keep the
    /// values of the first record.
    fn merge(&mut self, record: &CleanedRecord) -> Result<(), LicitaError> {
        self.quantity = self
            .quantity
            .checked_add(record.quantity)
            .ok_or_else(|| LicitaError::QuantityOverflow(format!("lot '{}'", record.name)))?;
        self.repetition_count += 1;
        self.add_note(&record.notes);
        Ok(())
    }

    fn add_note(&mut self, note: &str) {
        if !note.is_empty() && !self.notes.iter().any(|n| n == note) {
            self.notes.push(note.to_string());
        }
    }
}

/// Merge records sharing `(name, description)` into lots.
///
/// Lots are returned by quantity, largest first; equal quantities keep the
/// order in which their key was first seen. Fails with
/// [`LicitaError::QuantityOverflow`] if a lot's total does not fit a `Decimal`.
pub fn consolidate(records: &[CleanedRecord]) -> Result<Vec<ConsolidatedLot>, LicitaError> {
    let mut groups: IndexMap<(&str, &str), LotAccumulator> = IndexMap::new();

    for record in records {
        match groups.get_mut(&record.key()) {
            Some(acc) => acc.merge(record)?,
            None => {
                groups.insert(record.key(), LotAccumulator::seed(record));
            }
        }
    }

    let mut lots: Vec<ConsolidatedLot> = groups
        .into_iter()
        .map(|((name, description), acc)| ConsolidatedLot {
            quantity: acc.quantity,
            name: name.to_string(),
            description: description.to_string(),
            family_label: acc.family_label,
            unit: acc.unit,
            repetition_count: acc.repetition_count,
            notes: acc.notes.join(NOTES_SEPARATOR),
        })
        .collect();

    sort_by_quantity_desc(&mut lots);

    tracing::info!(
        records = records.len(),
        lots = lots.len(),
        "consolidation complete"
    );

    Ok(lots)
}

/// Sum quantities, failing instead of overflowing `Decimal`.
///
/// `context` names what is being totalled in the error.
pub fn checked_total<I>(quantities: I, context: &str) -> Result<Decimal, LicitaError>
where
    I: IntoIterator<Item = Decimal>,
{
    quantities.into_iter().try_fold(Decimal::ZERO, |acc, q| {
        acc.checked_add(q)
            .ok_or_else(|| LicitaError::QuantityOverflow(context.to_string()))
    })
}

/// Stable sort, largest quantity first.
pub fn sort_by_quantity_desc(lots: &mut [ConsolidatedLot]) {
    lots.sort_by(|a, b| b.quantity.cmp(&a.quantity));
}

/// Figures reported after a consolidation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidationSummary {
    pub source_rows: usize,
    pub lot_count: usize,
    /// Lots built from more than one source row.
    pub repeated_lots: usize,
    pub total_quantity: Decimal,
    pub most_repeated: Vec<RepeatedLot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepeatedLot {
    pub name: String,
    pub quantity: Decimal,
    pub repetition_count: usize,
}

pub fn summarize(
    records: &[CleanedRecord],
    lots: &[ConsolidatedLot],
) -> Result<ConsolidationSummary, LicitaError> {
    let mut by_repetition: Vec<&ConsolidatedLot> = lots.iter().collect();
    by_repetition.sort_by(|a, b| b.repetition_count.cmp(&a.repetition_count));

    Ok(ConsolidationSummary {
        source_rows: records.len(),
        lot_count: lots.len(),
        repeated_lots: lots.iter().filter(|l| l.repetition_count > 1).count(),
        total_quantity: checked_total(lots.iter().map(|l| l.quantity), "all lots")?,
        most_repeated: by_repetition
            .into_iter()
            .take(MOST_REPEATED_LIMIT)
            .map(|l| RepeatedLot {
                name: l.name.clone(),
                quantity: l.quantity,
                repetition_count: l.repetition_count,
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RowOrigin;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;

    fn record(qty: Decimal, name: &str, desc: &str, family: &str, notes: &str) -> CleanedRecord {
        CleanedRecord {
            origin: RowOrigin {
                page_number: 1,
                table_index: 0,
                row_index: 0,
            },
            quantity: qty,
            name: name.into(),
            description: desc.into(),
            family_label: family.into(),
            unit: "PIEZA".into(),
            notes: notes.into(),
            extra: vec![],
        }
    }

    #[test]
    fn duplicate_rows_merge_into_one_lot() {
        let records = vec![
            record(dec!(3), "SILLA EJECUTIVA", "NEGRA", "MOBILIARIO", ""),
            record(dec!(2), "SILLA EJECUTIVA", "NEGRA", "MOBILIARIO", ""),
        ];
        let lots = consolidate(&records).unwrap();
        assert_eq!(lots.len(), 1);
        assert_eq!(lots[0].quantity, dec!(5));
        assert_eq!(lots[0].repetition_count, 2);
    }

    #[test]
    fn description_is_part_of_the_key() {
        let records = vec![
            record(dec!(1), "SILLA", "NEGRA", "MOBILIARIO", ""),
            record(dec!(1), "SILLA", "AZUL", "MOBILIARIO", ""),
        ];
        assert_eq!(consolidate(&records).unwrap().len(), 2);
    }

    #[test]
    fn first_family_and_unit_win() {
        let mut second = record(dec!(1), "MESA", "", "MESA INSTRUMENTAL", "");
        second.unit = "JUEGO".into();
        let records = vec![record(dec!(1), "MESA", "", "MOBILIARIO", ""), second];
        let lots = consolidate(&records).unwrap();
        assert_eq!(lots[0].family_label, "MOBILIARIO");
        assert_eq!(lots[0].unit, "PIEZA");
    }

    #[test]
    fn notes_are_distinct_in_first_seen_order() {
        let records = vec![
            record(dec!(1), "A", "", "", "urgente"),
            record(dec!(1), "A", "", "", ""),
            record(dec!(1), "A", "", "", "planta baja"),
            record(dec!(1), "A", "", "", "urgente"),
        ];
        let lots = consolidate(&records).unwrap();
        assert_eq!(lots[0].notes, "urgente | planta baja");
        assert_eq!(lots[0].repetition_count, 4);
    }

    #[test]
    fn sorted_by_quantity_with_stable_ties() {
        let records = vec![
            record(dec!(2), "B", "", "", ""),
            record(dec!(9), "A", "", "", ""),
            record(dec!(2), "C", "", "", ""),
        ];
        let names: Vec<String> = consolidate(&records)
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn quantity_and_repetitions_are_conserved() {
        let records: Vec<CleanedRecord> = (0..40)
            .map(|i| {
                record(
                    Decimal::from(i % 7) + dec!(0.5),
                    &format!("ITEM {}", i % 9),
                    if i % 2 == 0 { "X" } else { "Y" },
                    "",
                    "",
                )
            })
            .collect();
        let lots = consolidate(&records).unwrap();

        let input_total: Decimal = records.iter().map(|r| r.quantity).sum();
        let output_total: Decimal = lots.iter().map(|l| l.quantity).sum();
        assert_eq!(input_total, output_total);

        let repetitions: usize = lots.iter().map(|l| l.repetition_count).sum();
        assert_eq!(repetitions, records.len());

        let keys: HashSet<(&str, &str)> = lots
            .iter()
            .map(|l| (l.name.as_str(), l.description.as_str()))
            .collect();
        assert_eq!(keys.len(), lots.len());
        assert!(lots.iter().all(|l| l.repetition_count >= 1));
    }

    #[test]
    fn summary_counts_repeated_lots() {
        let records = vec![
            record(dec!(3), "A", "", "", ""),
            record(dec!(2), "A", "", "", ""),
            record(dec!(1), "B", "", "", ""),
        ];
        let lots = consolidate(&records).unwrap();
        let summary = summarize(&records, &lots).unwrap();
        assert_eq!(summary.source_rows, 3);
        assert_eq!(summary.lot_count, 2);
        assert_eq!(summary.repeated_lots, 1);
        assert_eq!(summary.total_quantity, dec!(6));
        assert_eq!(summary.most_repeated[0].name, "A");
        assert_eq!(summary.most_repeated[0].repetition_count, 2);
    }

    #[test]
    fn lot_total_beyond_decimal_range_is_an_error() {
        let huge = "50000000000000000000000000000".parse::<Decimal>().unwrap();
        let records = vec![
            record(huge, "TORNILLO", "", "", ""),
            record(huge, "TORNILLO", "", "", ""),
        ];
        assert!(matches!(
            consolidate(&records),
            Err(LicitaError::QuantityOverflow(ref what)) if what.contains("TORNILLO")
        ));
    }

    #[test]
    fn summary_total_beyond_decimal_range_is_an_error() {
        let huge = "50000000000000000000000000000".parse::<Decimal>().unwrap();
        let records = vec![
            record(huge, "A", "", "", ""),
            record(huge, "B", "", "", ""),
        ];
        let lots = consolidate(&records).unwrap();
        assert_eq!(lots.len(), 2);
        assert!(matches!(
            summarize(&records, &lots),
            Err(LicitaError::QuantityOverflow(_))
        ));
    }
}
