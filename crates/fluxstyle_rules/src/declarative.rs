//! Declarative style sheets
//!
//! Applies a json description through a manager:
//!
//! ```json
//! {
//!   "rules": { ".btn": { "color": "blue", "padding": 4, ":hover": { "color": "navy" } } },
//!   "media": { "(max-width: 600px)": { ".btn": { "width": "100%" } } }
//! }
//! ```
//!
//! Inside a rule, strings and numbers are declarations, `null` removes a declaration and an object
//! extends the selector with its key.
use crate::handle::RuleHandle;
use crate::manager::StyleSheetManager;
use crate::property::StyleValue;
use fluxstyle_interface::cssom::CssomSystem;
use fluxstyle_shared::errors::{CssResult, CssomError};
use serde_json::{Map, Value};

/// Parses `json` and applies it
pub fn apply_str<S: CssomSystem>(manager: &StyleSheetManager<S>, json: &str) -> CssResult<()> {
    let value: Value = serde_json::from_str(json).map_err(|err| CssomError::Declarative(err.to_string()))?;
    apply_json(manager, &value)
}

pub fn apply_json<S: CssomSystem>(manager: &StyleSheetManager<S>, value: &Value) -> CssResult<()> {
    for (section, content) in expect_object(value, "<root>")? {
        match section.as_str() {
            "rules" => {
                for (selector, body) in expect_object(content, "rules")? {
                    let rule = manager.get_or_insert_rule(selector)?;
                    apply_rule_body(&rule, body)?;
                }
            }
            "media" => {
                for (query, rules) in expect_object(content, "media")? {
                    let block = manager.get_or_insert_media_block(query)?;
                    for (selector, body) in expect_object(rules, query)? {
                        let rule = block.get_or_insert_rule(selector)?;
                        apply_rule_body(&rule, body)?;
                    }
                }
            }
            other => return Err(CssomError::Declarative(format!("unknown section '{other}'"))),
        }
    }

    Ok(())
}

fn apply_rule_body<S: CssomSystem>(rule: &RuleHandle<S>, body: &Value) -> CssResult<()> {
    for (key, value) in expect_object(body, rule.selector())? {
        match value {
            Value::String(text) => rule.set_declaration(key, text.as_str())?,
            Value::Number(number) => {
                let number = number.as_f64().ok_or_else(|| {
                    CssomError::Declarative(format!("'{key}' in '{}' is not a usable number", rule.selector()))
                })?;
                rule.set_declaration(key, number)?;
            }
            Value::Null => rule.set_declaration(key, StyleValue::Unset)?,
            Value::Object(_) => {
                let extended = rule.extend(key)?;
                apply_rule_body(&extended, value)?;
            }
            Value::Bool(_) | Value::Array(_) => {
                return Err(CssomError::Declarative(format!(
                    "unsupported value for '{key}' in '{}'",
                    rule.selector()
                )))
            }
        }
    }

    Ok(())
}

fn expect_object<'a>(value: &'a Value, path: &str) -> CssResult<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| CssomError::Declarative(format!("'{path}' must be an object")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ManagerConfig;
    use fluxstyle_cssom::memory::{MemoryCssom, MemoryStyleSheet};

    fn manager() -> StyleSheetManager<MemoryCssom> {
        StyleSheetManager::new("test", MemoryStyleSheet::new(), ManagerConfig::default())
    }

    #[test]
    fn applies_rules_extensions_and_media() {
        let manager = manager();
        apply_str(
            &manager,
            r#"{
                "rules": { ".btn": { "color": "blue", "padding": 4, ":hover": { "color": "navy" } } },
                "media": { "(max-width: 600px)": { ".btn": { "width": "100%" } } }
            }"#,
        )
        .unwrap();

        assert_eq!(
            manager.css_text(),
            ".btn { color: blue; padding: 4px; }\n\
             .btn:hover { color: navy; }\n\
             @media (max-width: 600px) {\n  .btn { width: 100%; }\n}"
        );
    }

    #[test]
    fn null_unsets_and_reapplying_is_idempotent() {
        let manager = manager();
        apply_str(&manager, r#"{ "rules": { ".a": { "opacity": 0.5, "zIndex": 3 } } }"#).unwrap();
        apply_str(&manager, r#"{ "rules": { ".a": { "opacity": null } } }"#).unwrap();

        assert_eq!(manager.rule_count(), 1);
        assert_eq!(manager.css_text(), ".a { z-index: 3; }");
    }

    #[test]
    fn errors_name_the_problem() {
        let manager = manager();

        let err = apply_str(&manager, "[]").unwrap_err();
        assert_eq!(err, CssomError::Declarative("'<root>' must be an object".into()));

        let err = apply_str(&manager, r#"{ "fonts": {} }"#).unwrap_err();
        assert_eq!(err, CssomError::Declarative("unknown section 'fonts'".into()));

        let err = apply_str(&manager, r#"{ "rules": { ".a": { "color": true } } }"#).unwrap_err();
        assert_eq!(
            err,
            CssomError::Declarative("unsupported value for 'color' in '.a'".into())
        );

        assert!(matches!(apply_str(&manager, "{"), Err(CssomError::Declarative(_))));
    }
}
