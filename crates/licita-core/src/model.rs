use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const COL_QUANTITY: &str = "Cantidad";
pub const COL_NAME: &str = "Nombre";
pub const COL_DESCRIPTION: &str = "Descripcion";
pub const COL_FAMILY: &str = "Familia";
pub const COL_UNIT: &str = "Unidad";
pub const COL_NOTES: &str = "Observaciones";
pub const COL_REPETITIONS: &str = "Veces_Repetido";

/// Canonical positions of a procurement table, left to right.
pub const CANONICAL_COLUMNS: [&str; 6] = [
    COL_QUANTITY,
    COL_NAME,
    COL_DESCRIPTION,
    COL_FAMILY,
    COL_UNIT,
    COL_NOTES,
];

/// Minimum row width accepted from a table: quantity, name, description, family.
pub const MIN_ROW_WIDTH: usize = 4;

/// Where a raw row came from in the source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowOrigin {
    pub page_number: usize,
    pub table_index: usize,
    pub row_index: usize,
}

/// One table row as extracted, before any typing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    pub origin: RowOrigin,
    pub cells: Vec<String>,
}

impl RawRow {
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(|s| s.as_str())
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }
}

/// Column names shared by every row of one extraction run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub columns: Vec<String>,
}

impl ColumnSchema {
    /// Build the schema for rows of the given width.
    ///
    /// Narrower rows truncate the canonical column list from the right; wider
    /// rows get `Columna_Extra_<n>` names for the positions past the canonical six.
    pub fn for_width(width: usize) -> Self {
        let columns = (0..width)
            .map(|i| match CANONICAL_COLUMNS.get(i) {
                Some(name) => (*name).to_string(),
                None => format!("Columna_Extra_{}", i + 1),
            })
            .collect();
        ColumnSchema { columns }
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Names of the positions beyond the canonical columns.
    pub fn extra_columns(&self) -> &[String] {
        let start = CANONICAL_COLUMNS.len().min(self.columns.len());
        &self.columns[start..]
    }
}

/// A validated line item: numeric quantity and non-empty name guaranteed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedRecord {
    pub origin: RowOrigin,
    pub quantity: Decimal,
    pub name: String,
    pub description: String,
    pub family_label: String,
    pub unit: String,
    pub notes: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<String>,
}

impl CleanedRecord {
    /// Identity of the lot this record belongs to.
    pub fn key(&self) -> (&str, &str) {
        (&self.name, &self.description)
    }
}

/// All records sharing one `(name, description)` pair, merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidatedLot {
    pub quantity: Decimal,
    pub name: String,
    pub description: String,
    pub family_label: String,
    pub unit: String,
    pub repetition_count: usize,
    /// Distinct notes in order of first appearance, joined with `" | "`.
    pub notes: String,
}

pub const NOTES_SEPARATOR: &str = " | ";

/// Procurement domain a lot is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MacroCategory {
    EquipoDeComputo,
    EquipoMedico,
    InstrumentalCientifico,
    Mobiliario,
    Otros,
}

impl MacroCategory {
    pub const ALL: [MacroCategory; 5] = [
        MacroCategory::EquipoDeComputo,
        MacroCategory::EquipoMedico,
        MacroCategory::InstrumentalCientifico,
        MacroCategory::Mobiliario,
        MacroCategory::Otros,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MacroCategory::EquipoDeComputo => "EQUIPO_DE_COMPUTO",
            MacroCategory::EquipoMedico => "EQUIPO_MEDICO",
            MacroCategory::InstrumentalCientifico => "INSTRUMENTAL_CIENTIFICO",
            MacroCategory::Mobiliario => "MOBILIARIO",
            MacroCategory::Otros => "OTROS",
        }
    }
}

impl fmt::Display for MacroCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
