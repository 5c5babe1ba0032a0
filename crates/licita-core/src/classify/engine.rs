use serde::Serialize;

use crate::model::MacroCategory;
use crate::rules::schema::KeywordRuleSet;

/// The category a label was routed to and the keyword that decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeywordMatch<'r> {
    pub category: MacroCategory,
    /// `None` when no keyword matched and the label fell through to OTROS.
    pub keyword: Option<&'r str>,
}

/// Classify a family label into a macro-category.
pub fn classify(family_label: &str, ruleset: &KeywordRuleSet) -> MacroCategory {
    classify_with_match(family_label, ruleset).category
}

/// Classify a family label and report the deciding keyword.
///
/// The label is upper-cased (ASCII only) and the keyword sets are tried in
/// ruleset order. The first set with a keyword occurring anywhere in the
/// label decides; a label matching nothing is [`MacroCategory::Otros`].
pub fn classify_with_match<'r>(
    family_label: &str,
    ruleset: &'r KeywordRuleSet,
) -> KeywordMatch<'r> {
    let upper = family_label.to_ascii_uppercase();

    for rule in &ruleset.categories {
        if let Some(keyword) = rule.keywords.iter().find(|k| upper.contains(k.as_str())) {
            return KeywordMatch {
                category: rule.category,
                keyword: Some(keyword.as_str()),
            };
        }
    }

    KeywordMatch {
        category: MacroCategory::Otros,
        keyword: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::builtin::default_ruleset;
    use crate::rules::parse_ruleset_str;

    #[test]
    fn medical_beats_furniture() {
        let rs = default_ruleset().unwrap();
        assert_eq!(
            classify("MONITOR DE SIGNOS VITALES CON MESA", &rs),
            MacroCategory::EquipoMedico
        );
        assert_eq!(classify("MESA DE EXPLORACION", &rs), MacroCategory::Mobiliario);
        assert_eq!(classify("MESA EXPLORACION", &rs), MacroCategory::EquipoMedico);
    }

    #[test]
    fn compute_checked_first() {
        let rs = default_ruleset().unwrap();
        let m = classify_with_match("LAPTOP PARA OFICINA", &rs);
        assert_eq!(m.category, MacroCategory::EquipoDeComputo);
        assert_eq!(m.keyword, Some("LAPTOP"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let rs = default_ruleset().unwrap();
        assert_eq!(classify("Silla ejecutiva", &rs), MacroCategory::Mobiliario);
        assert_eq!(classify("microscopio optico", &rs), MacroCategory::InstrumentalCientifico);
    }

    #[test]
    fn accents_are_not_stripped() {
        let rs = default_ruleset().unwrap();
        // "É" does not fold to "E", so MÉDICO is not MEDICO
        assert_eq!(classify("MATERIAL MÉDICO", &rs), MacroCategory::Otros);
    }

    #[test]
    fn unmatched_label_is_otros() {
        let rs = default_ruleset().unwrap();
        let m = classify_with_match("PAPELERIA", &rs);
        assert_eq!(m.category, MacroCategory::Otros);
        assert_eq!(m.keyword, None);
        assert_eq!(classify("", &rs), MacroCategory::Otros);
    }

    #[test]
    fn ruleset_order_decides_overlaps() {
        let rs = parse_ruleset_str(
            r#"{
                "name": "t", "version": "1",
                "categories": [
                    { "category": "MOBILIARIO", "keywords": ["MESA"] },
                    { "category": "EQUIPO_MEDICO", "keywords": ["MESA PEDIATRICA"] }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(classify("MESA PEDIATRICA", &rs), MacroCategory::Mobiliario);
    }

    #[test]
    fn classification_is_total_and_deterministic() {
        let rs = default_ruleset().unwrap();
        let labels = [
            "SILLA",
            "CARRO ROJO",
            "BALANZA ANALITICA",
            "SERVIDOR RACK",
            "???",
            "  ",
            "ñandú",
            "MOBILIARIO MEDICO",
        ];
        for label in labels {
            let first = classify(label, &rs);
            assert_eq!(first, classify(label, &rs));
            assert!(MacroCategory::ALL.contains(&first));
        }
    }
}
