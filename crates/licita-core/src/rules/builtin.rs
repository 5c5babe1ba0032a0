use crate::error::LicitaError;
use crate::rules::parse_ruleset_str;
use crate::rules::schema::KeywordRuleSet;

const CATEGORIAS_JSON: &str = include_str!("../../../../rules/categorias.json");

/// Available predefined keyword tables.
pub const PRESETS: &[&str] = &["default"];

/// Load a predefined keyword table by name.
pub fn load_preset(name: &str) -> Result<KeywordRuleSet, LicitaError> {
    match name {
        "default" => parse_ruleset_str(CATEGORIAS_JSON),
        _ => Err(LicitaError::RulesetInvalid(format!(
            "unknown preset '{}'. Available: {}",
            name,
            PRESETS.join(", ")
        ))),
    }
}

/// The keyword table used when no custom rule file is given.
pub fn default_ruleset() -> Result<KeywordRuleSet, LicitaError> {
    load_preset("default")
}
