//! Path and caption templates.
//!
//! Placeholders:
//! - `{folder}`: data-type folder (`Raw`, `Imputed`, `Imputed_Transformed`)
//! - `{token}`: folder lower-cased (`raw`, `imputed`, `imputed_transformed`)
//! - `{label}`: display label (`Raw Data`, …)
//!
//! Substitution is bit-exact: the resolver has to find pre-existing files.

use crate::error::ConfigError;
use crate::navigation::DataType;

pub const PLACEHOLDERS: [&str; 3] = ["folder", "token", "label"];

/// Extract the placeholder names of a template, rejecting unknown names and
/// unbalanced braces.
pub fn placeholders(template: &str) -> Result<Vec<&str>, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidTemplate {
        template: template.to_string(),
        reason,
    };

    let mut found = Vec::new();
    let mut rest = template;
    while let Some(open) = rest.find(['{', '}']) {
        if rest[open..].starts_with('}') {
            return Err(invalid(format!("unmatched '}}' at byte {}", template.len() - rest.len() + open)));
        }
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| invalid("unclosed '{'".to_string()))?;
        let name = &after[..close];
        if name.contains('{') {
            return Err(invalid("nested '{'".to_string()));
        }
        if !PLACEHOLDERS.contains(&name) {
            return Err(invalid(format!(
                "unknown placeholder '{{{name}}}' (valid: {{folder}}, {{token}}, {{label}})"
            )));
        }
        found.push(name);
        rest = &after[close + 1..];
    }
    Ok(found)
}

/// Substitute the data-type placeholders. Templates are validated when the
/// routing table is loaded, so unknown names cannot reach this point.
pub fn substitute(template: &str, data_type: DataType) -> String {
    template
        .replace("{folder}", data_type.folder())
        .replace("{token}", data_type.token())
        .replace("{label}", data_type.label())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_all_placeholders() {
        assert_eq!(
            substitute("{folder}/XGB_{token}.png", DataType::Imputed),
            "Imputed/XGB_imputed.png"
        );
        assert_eq!(
            substitute("SHAP/{folder}/SHAP_LR_{token}.png", DataType::ImputedTransformed),
            "SHAP/Imputed_Transformed/SHAP_LR_imputed_transformed.png"
        );
        assert_eq!(
            substitute("XGBoost for {label}", DataType::Raw),
            "XGBoost for Raw Data"
        );
    }

    #[test]
    fn lists_placeholders_in_order() {
        assert_eq!(
            placeholders("{folder}/x_{token}.png").unwrap(),
            vec!["folder", "token"]
        );
        assert!(placeholders("Comparisons/LR_vs_XGB_initial.png").unwrap().is_empty());
    }

    #[test]
    fn rejects_unknown_placeholder() {
        let err = placeholders("{folder}/{model}.png").unwrap_err();
        assert!(err.to_string().contains("unknown placeholder '{model}'"));
    }

    #[test]
    fn rejects_unbalanced_braces() {
        assert!(placeholders("{folder/x.png").is_err());
        assert!(placeholders("folder}/x.png").is_err());
        assert!(placeholders("{{folder}}").is_err());
    }
}
