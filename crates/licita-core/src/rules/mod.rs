pub mod builtin;
pub mod schema;

use crate::error::LicitaError;
use crate::model::MacroCategory;
use schema::KeywordRuleSet;
use std::collections::HashSet;
use std::path::Path;

/// Load a keyword table from a JSON file.
pub fn load_ruleset(path: &Path) -> Result<KeywordRuleSet, LicitaError> {
    let content = std::fs::read_to_string(path).map_err(|e| LicitaError::RulesetLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_ruleset(&content, path)
}

/// Parse a keyword table from a JSON string.
pub fn parse_ruleset(json: &str, source: &Path) -> Result<KeywordRuleSet, LicitaError> {
    let ruleset: KeywordRuleSet =
        serde_json::from_str(json).map_err(|e| LicitaError::RulesetLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_ruleset(&ruleset)?;
    Ok(ruleset)
}

/// Parse a keyword table from a JSON string (no file path context).
pub fn parse_ruleset_str(json: &str) -> Result<KeywordRuleSet, LicitaError> {
    let ruleset: KeywordRuleSet = serde_json::from_str(json).map_err(LicitaError::Json)?;
    validate_ruleset(&ruleset)?;
    Ok(ruleset)
}

/// Validate that a keyword table is well-formed.
pub fn validate_ruleset(ruleset: &KeywordRuleSet) -> Result<(), LicitaError> {
    if ruleset.categories.is_empty() {
        return Err(LicitaError::RulesetInvalid(
            "categories must not be empty".into(),
        ));
    }

    let mut seen = HashSet::new();
    for rule in &ruleset.categories {
        if rule.category == MacroCategory::Otros {
            return Err(LicitaError::RulesetInvalid(
                "OTROS is the fallback category and cannot have keywords".into(),
            ));
        }

        if !seen.insert(rule.category) {
            return Err(LicitaError::RulesetInvalid(format!(
                "category '{}' appears more than once",
                rule.category
            )));
        }

        if rule.keywords.is_empty() {
            return Err(LicitaError::RulesetInvalid(format!(
                "category '{}' has no keywords",
                rule.category
            )));
        }

        let mut keywords = HashSet::new();
        for keyword in &rule.keywords {
            if keyword.trim().is_empty() {
                return Err(LicitaError::RulesetInvalid(format!(
                    "category '{}' has an empty keyword",
                    rule.category
                )));
            }
            if *keyword != keyword.to_ascii_uppercase() {
                return Err(LicitaError::RulesetInvalid(format!(
                    "keyword '{}' in category '{}' must be upper-case",
                    keyword, rule.category
                )));
            }
            if !keywords.insert(keyword.as_str()) {
                return Err(LicitaError::RulesetInvalid(format!(
                    "keyword '{}' is listed twice in category '{}'",
                    keyword, rule.category
                )));
            }
        }
    }

    Ok(())
}
