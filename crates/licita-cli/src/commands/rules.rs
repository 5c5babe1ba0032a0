use licita_core::classify::classify_with_match;
use licita_core::error::LicitaError;
use licita_core::rules::builtin;
use std::path::{Path, PathBuf};

use crate::commands::load_rules;

pub fn list() -> Result<(), LicitaError> {
    println!("Available keyword tables:\n");
    for name in builtin::PRESETS {
        let rs = builtin::load_preset(name)?;
        println!("  {:<8} {} (v{})", name, rs.name, rs.version);
        if let Some(ref desc) = rs.description {
            println!("           {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn explain(preset: &str) -> Result<(), LicitaError> {
    let rs = builtin::load_preset(preset)?;

    println!("{} (version {})\n", rs.name, rs.version);
    if let Some(ref desc) = rs.description {
        println!("{}\n", desc);
    }

    println!("Categories are checked in this order; the first one with a keyword");
    println!("found in the upper-cased family label wins. Labels matching nothing");
    println!("go to OTROS for manual review.\n");

    for (i, rule) in rs.categories.iter().enumerate() {
        print!("  {}. {}", i + 1, rule.category);
        match rule.description {
            Some(ref desc) => println!(" -- {}", desc),
            None => println!(),
        }
        println!("     {}", rule.keywords.join(", "));
        println!();
    }

    Ok(())
}

pub fn validate(file: &Path) -> Result<(), LicitaError> {
    let rs = licita_core::rules::load_ruleset(file)?;

    println!("Keyword table '{}' (v{}) is valid.", rs.name, rs.version);
    for rule in &rs.categories {
        println!("  {:<24} {} keywords", rule.category, rule.keywords.len());
    }

    // A keyword that contains an earlier category's keyword can never decide.
    let mut warnings = Vec::new();
    for (i, rule) in rs.categories.iter().enumerate() {
        for keyword in &rule.keywords {
            for earlier in &rs.categories[..i] {
                let shadow = earlier
                    .keywords
                    .iter()
                    .find(|k| keyword.contains(k.as_str()));
                if let Some(shadow) = shadow {
                    warnings.push(format!(
                        "'{}' ({}) always matches '{}' ({}) first",
                        keyword, rule.category, shadow, earlier.category
                    ));
                }
            }
        }
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}

pub fn match_label(label: &str, rule_file: Option<PathBuf>) -> Result<(), LicitaError> {
    let rs = load_rules(rule_file)?;
    let m = classify_with_match(label, &rs);
    match m.keyword {
        Some(keyword) => println!("{}  (keyword '{}')", m.category, keyword),
        None => println!("{}  (no keyword matched)", m.category),
    }
    Ok(())
}
