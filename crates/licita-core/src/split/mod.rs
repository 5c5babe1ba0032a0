use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::classify::classify;
use crate::consolidate::{checked_total, sort_by_quantity_desc};
use crate::error::LicitaError;
use crate::model::{ConsolidatedLot, MacroCategory};
use crate::rules::schema::KeywordRuleSet;

/// Lots routed to one macro-category, largest quantity first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub category: MacroCategory,
    pub lots: Vec<ConsolidatedLot>,
}

/// Cross-category figures for one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: MacroCategory,
    pub lot_count: usize,
    pub total_quantity: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySplit {
    /// Groups in the order their category was first produced.
    pub groups: Vec<CategoryGroup>,
    pub summary: Vec<CategorySummary>,
}

impl CategorySplit {
    pub fn group(&self, category: MacroCategory) -> Option<&CategoryGroup> {
        self.groups.iter().find(|g| g.category == category)
    }
}

/// Classify every lot by its family label and partition by category.
pub fn split_by_category(
    lots: &[ConsolidatedLot],
    ruleset: &KeywordRuleSet,
) -> Result<CategorySplit, LicitaError> {
    let mut buckets: IndexMap<MacroCategory, Vec<ConsolidatedLot>> = IndexMap::new();

    for lot in lots {
        let category = classify(&lot.family_label, ruleset);
        buckets.entry(category).or_default().push(lot.clone());
    }

    let groups: Vec<CategoryGroup> = buckets
        .into_iter()
        .map(|(category, mut lots)| {
            sort_by_quantity_desc(&mut lots);
            CategoryGroup { category, lots }
        })
        .collect();

    let summary = groups
        .iter()
        .map(|g| {
            let total = checked_total(g.lots.iter().map(|l| l.quantity), g.category.as_str())?;
            Ok(CategorySummary {
                category: g.category,
                lot_count: g.lots.len(),
                total_quantity: total,
            })
        })
        .collect::<Result<Vec<_>, LicitaError>>()?;

    for g in &groups {
        tracing::debug!(category = %g.category, lots = g.lots.len(), "category group");
    }

    Ok(CategorySplit { groups, summary })
}

/// Lot count and quantity per distinct family label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyStats {
    pub family_label: String,
    pub lot_count: usize,
    pub total_quantity: Decimal,
}

/// Distinct family labels of a consolidated dataset, in first-seen order.
pub fn family_breakdown(lots: &[ConsolidatedLot]) -> Result<Vec<FamilyStats>, LicitaError> {
    let mut families: IndexMap<&str, FamilyStats> = IndexMap::new();

    for lot in lots {
        let stats = families
            .entry(lot.family_label.as_str())
            .or_insert_with(|| FamilyStats {
                family_label: lot.family_label.clone(),
                lot_count: 0,
                total_quantity: Decimal::ZERO,
            });
        stats.lot_count += 1;
        stats.total_quantity = stats
            .total_quantity
            .checked_add(lot.quantity)
            .ok_or_else(|| {
                LicitaError::QuantityOverflow(format!("family '{}'", lot.family_label))
            })?;
    }

    Ok(families.into_values().collect())
}
