use serde::{Deserialize, Serialize};

use crate::model::MacroCategory;

/// An ordered keyword table for routing lots to macro-categories.
///
/// Categories are checked top to bottom; the first one with a keyword found
/// in the family label wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRuleSet {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    pub categories: Vec<CategoryRule>,
}

/// Keywords that route a label to one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: MacroCategory,
    #[serde(default)]
    pub description: Option<String>,
    /// Upper-case substrings matched anywhere in the upper-cased label.
    pub keywords: Vec<String>,
}
