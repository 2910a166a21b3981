//! Splits rule text as passed to `insert_rule()` into its prelude and declarations.
//!
//! This is not a css parser. It understands exactly what the rule manager produces (`selector{}`,
//! `@media query{}`) plus declaration bodies and nested `@media` blocks, which is enough for the
//! in-memory object model.
use fluxstyle_shared::errors::{CssResult, CssomError};

/// A rule as found in the rule text
#[derive(Debug, PartialEq, Clone)]
pub enum ParsedRule {
    Style {
        selector: String,
        declarations: Vec<(String, String)>,
    },
    Media {
        condition: String,
        rules: Vec<ParsedRule>,
    },
}

/// Parses text that must hold exactly one rule
pub fn parse_rule(text: &str) -> CssResult<ParsedRule> {
    let mut rules = parse_rule_list(text)?;
    match rules.len() {
        0 => Err(CssomError::Syntax("no rule found".into())),
        1 => Ok(rules.remove(0)),
        n => Err(CssomError::Syntax(format!("expected a single rule, found {n}"))),
    }
}

/// Parses a sequence of rules
pub fn parse_rule_list(text: &str) -> CssResult<Vec<ParsedRule>> {
    let mut rules = Vec::new();

    let mut rest = text.trim();
    while !rest.is_empty() {
        let Some(open) = opening_brace(rest) else {
            return Err(CssomError::Syntax(format!("missing '{{' in '{rest}'")));
        };
        let close = matching_brace(rest, open)?;

        rules.push(build_rule(rest[..open].trim(), &rest[open + 1..close])?);
        rest = rest[close + 1..].trim_start();
    }

    Ok(rules)
}

/// Parses a declaration body (`color: red; width: 10px`). Declarations without a name or a value are
/// dropped, the same way a browser drops invalid declarations.
pub fn parse_declarations(body: &str) -> Vec<(String, String)> {
    split_top_level(body, ';')
        .into_iter()
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                return None;
            }

            // Custom properties are case-sensitive
            let name = if name.starts_with("--") {
                name.to_string()
            } else {
                name.to_ascii_lowercase()
            };
            Some((name, value.to_string()))
        })
        .collect()
}

fn build_rule(prelude: &str, body: &str) -> CssResult<ParsedRule> {
    if prelude.is_empty() {
        return Err(CssomError::Syntax("rule without a selector".into()));
    }

    if let Some(condition) = prelude.strip_prefix("@media") {
        return Ok(ParsedRule::Media {
            condition: condition.trim().to_string(),
            rules: parse_rule_list(body)?,
        });
    }

    if prelude.starts_with('@') {
        return Err(CssomError::Syntax(format!("unsupported at-rule: {prelude}")));
    }

    Ok(ParsedRule::Style {
        selector: prelude.to_string(),
        declarations: parse_declarations(body),
    })
}

/// Finds the first `{` outside quotes (attribute selectors may hold braces: `[data-x="{"]`)
fn opening_brace(text: &str) -> Option<usize> {
    let mut quote: Option<char> = None;

    for (offset, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '{') => return Some(offset),
            _ => {}
        }
    }

    None
}

/// Finds the `}` that closes the `{` at byte offset `open`
fn matching_brace(text: &str, open: usize) -> CssResult<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for (offset, c) in text[open..].char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '{') => depth += 1,
            (None, '}') => {
                depth -= 1;
                if depth == 0 {
                    return Ok(open + offset);
                }
            }
            _ => {}
        }
    }

    Err(CssomError::Syntax(format!("unbalanced braces in '{text}'")))
}

/// Splits on `sep`, ignoring separators inside quotes and parentheses (ie: `url(data:...;base64,...)`)
fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (offset, c) in text.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, c) if c == sep && depth == 0 => {
                parts.push(&text[start..offset]);
                start = offset + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);

    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_style_rule() {
        let rule = parse_rule(".btn{}").unwrap();
        assert_eq!(
            rule,
            ParsedRule::Style {
                selector: ".btn".into(),
                declarations: vec![],
            }
        );
    }

    #[test]
    fn style_rule_with_declarations() {
        let rule = parse_rule(".a > span { Color: red; width:10px;; --Gap: 4px }").unwrap();
        assert_eq!(
            rule,
            ParsedRule::Style {
                selector: ".a > span".into(),
                declarations: vec![
                    ("color".into(), "red".into()),
                    ("width".into(), "10px".into()),
                    ("--Gap".into(), "4px".into()),
                ],
            }
        );
    }

    #[test]
    fn semicolon_inside_url_is_kept() {
        let decls = parse_declarations("background: url(data:image/png;base64,AAAA); color: red");
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].1, "url(data:image/png;base64,AAAA)");
    }

    #[test]
    fn media_rule_with_nested_rules() {
        let rule = parse_rule("@media (max-width: 600px) { .a { color: red } .b {} }").unwrap();
        let ParsedRule::Media { condition, rules } = rule else {
            panic!("expected a media rule");
        };
        assert_eq!(condition, "(max-width: 600px)");
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn braces_inside_quoted_selector() {
        let rule = parse_rule(r#".box[data-x="{"]{}"#).unwrap();
        assert_eq!(
            rule,
            ParsedRule::Style {
                selector: r#".box[data-x="{"]"#.into(),
                declarations: vec![],
            }
        );

        let rule = parse_rule(".box[data-x='}'] { content: \"{\" }").unwrap();
        assert_eq!(
            rule,
            ParsedRule::Style {
                selector: ".box[data-x='}']".into(),
                declarations: vec![("content".into(), "\"{\"".into())],
            }
        );
    }

    #[test]
    fn errors() {
        assert!(matches!(parse_rule(""), Err(CssomError::Syntax(_))));
        assert!(matches!(parse_rule(".a"), Err(CssomError::Syntax(_))));
        assert!(matches!(parse_rule(".a {"), Err(CssomError::Syntax(_))));
        assert!(matches!(parse_rule("{}"), Err(CssomError::Syntax(_))));
        assert!(matches!(parse_rule(".a{} .b{}"), Err(CssomError::Syntax(_))));
        assert!(matches!(parse_rule("@font-face{}"), Err(CssomError::Syntax(_))));
    }
}
