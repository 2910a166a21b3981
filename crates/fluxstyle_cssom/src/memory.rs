//! In-memory CSS object model
//!
//! Behaves like the browser's `CSSStyleSheet`/`CSSMediaRule` pair: rules live in index-addressable
//! lists, `delete_rule()` shifts every following rule down, and a removed rule loses its parent style
//! sheet (nested rules of a removed `@media` block lose it as well).
use crate::declaration::CssStyleDeclaration;
use crate::text::{parse_rule, ParsedRule};
use fluxstyle_interface::cssom::{
    CssMediaRule, CssRule, CssRuleContainer, CssStyleRule, CssStyleSheet, CssomSystem, StyleDocument,
};
use fluxstyle_shared::errors::{CssResult, CssomError};
use log::debug;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Object model system for the in-memory host
#[derive(Clone, Debug, Default)]
pub struct MemoryCssom;

impl CssomSystem for MemoryCssom {
    type Rule = MemoryRule;
    type StyleRule = MemoryStyleRule;
    type MediaRule = MemoryMediaRule;
    type StyleSheet = MemoryStyleSheet;
    type Document = MemoryDocument;
}

/// Where a rule is attached to
#[derive(Clone, Debug)]
enum ParentLink {
    Detached,
    Sheet(Weak<RefCell<SheetData>>),
    Media(Weak<RefCell<MediaData>>),
}

impl ParentLink {
    fn style_sheet(&self) -> Option<MemoryStyleSheet> {
        match self {
            ParentLink::Detached => None,
            ParentLink::Sheet(sheet) => sheet.upgrade().map(MemoryStyleSheet),
            ParentLink::Media(media) => {
                let media = media.upgrade()?;
                let parent = media.borrow().parent.clone();
                parent.style_sheet()
            }
        }
    }
}

#[derive(Debug)]
struct StyleData {
    selector_text: String,
    style: CssStyleDeclaration,
    parent: ParentLink,
}

#[derive(Debug)]
struct MediaData {
    condition_text: String,
    rules: Vec<MemoryRule>,
    parent: ParentLink,
}

#[derive(Debug, Default)]
struct SheetData {
    rules: Vec<MemoryRule>,
}

#[derive(Clone, Debug)]
pub struct MemoryStyleRule(Rc<RefCell<StyleData>>);

#[derive(Clone, Debug)]
pub struct MemoryMediaRule(Rc<RefCell<MediaData>>);

#[derive(Clone, Debug)]
pub struct MemoryStyleSheet(Rc<RefCell<SheetData>>);

/// Any rule in a rule list
#[derive(Clone, Debug)]
pub enum MemoryRule {
    Style(MemoryStyleRule),
    Media(MemoryMediaRule),
}

impl MemoryRule {
    fn build(parsed: ParsedRule, parent: ParentLink) -> Self {
        match parsed {
            ParsedRule::Style { selector, declarations } => MemoryRule::Style(MemoryStyleRule(Rc::new(RefCell::new(
                StyleData {
                    selector_text: selector,
                    style: CssStyleDeclaration::from_pairs(declarations),
                    parent,
                },
            )))),
            ParsedRule::Media { condition, rules } => {
                let media = Rc::new(RefCell::new(MediaData {
                    condition_text: condition,
                    rules: Vec::new(),
                    parent,
                }));

                let link = Rc::downgrade(&media);
                let children = rules
                    .into_iter()
                    .map(|rule| MemoryRule::build(rule, ParentLink::Media(link.clone())))
                    .collect();
                media.borrow_mut().rules = children;

                MemoryRule::Media(MemoryMediaRule(media))
            }
        }
    }

    fn set_parent(&self, parent: ParentLink) {
        match self {
            MemoryRule::Style(rule) => rule.0.borrow_mut().parent = parent,
            MemoryRule::Media(rule) => rule.0.borrow_mut().parent = parent,
        }
    }
}

impl CssRule<MemoryCssom> for MemoryRule {
    fn css_text(&self) -> String {
        match self {
            MemoryRule::Style(rule) => rule.css_text(),
            MemoryRule::Media(rule) => rule.css_text(),
        }
    }

    fn parent_style_sheet(&self) -> Option<MemoryStyleSheet> {
        match self {
            MemoryRule::Style(rule) => rule.0.borrow().parent.style_sheet(),
            MemoryRule::Media(rule) => rule.0.borrow().parent.style_sheet(),
        }
    }

    fn as_style_rule(&self) -> Option<MemoryStyleRule> {
        match self {
            MemoryRule::Style(rule) => Some(rule.clone()),
            MemoryRule::Media(_) => None,
        }
    }

    fn as_media_rule(&self) -> Option<MemoryMediaRule> {
        match self {
            MemoryRule::Media(rule) => Some(rule.clone()),
            MemoryRule::Style(_) => None,
        }
    }
}

fn insert_into(rules: &mut Vec<MemoryRule>, text: &str, index: usize, parent: ParentLink) -> CssResult<usize> {
    if index > rules.len() {
        return Err(CssomError::IndexOutOfRange {
            index,
            length: rules.len(),
        });
    }

    let rule = MemoryRule::build(parse_rule(text)?, parent);
    rules.insert(index, rule);
    Ok(index)
}

fn delete_from(rules: &mut Vec<MemoryRule>, index: usize) -> CssResult<()> {
    if index >= rules.len() {
        return Err(CssomError::IndexOutOfRange {
            index,
            length: rules.len(),
        });
    }

    let rule = rules.remove(index);
    rule.set_parent(ParentLink::Detached);
    Ok(())
}

/// Serializes a list of rules, one per line, indented by `indent` spaces
fn rules_to_css(rules: &[MemoryRule], indent: usize) -> String {
    let pad = " ".repeat(indent);
    rules
        .iter()
        .flat_map(|rule| {
            rule.css_text()
                .lines()
                .map(|line| format!("{pad}{line}"))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl CssStyleRule<MemoryCssom> for MemoryStyleRule {
    fn selector_text(&self) -> String {
        self.0.borrow().selector_text.clone()
    }

    fn css_text(&self) -> String {
        let data = self.0.borrow();
        if data.style.length() == 0 {
            format!("{} {{ }}", data.selector_text)
        } else {
            format!("{} {{ {} }}", data.selector_text, data.style.css_text())
        }
    }

    fn parent_style_sheet(&self) -> Option<MemoryStyleSheet> {
        self.0.borrow().parent.style_sheet()
    }

    fn is_same_rule(&self, other: &MemoryRule) -> bool {
        match other {
            MemoryRule::Style(rule) => Rc::ptr_eq(&self.0, &rule.0),
            MemoryRule::Media(_) => false,
        }
    }

    fn set_property(&self, property: &str, value: &str) -> CssResult<()> {
        self.0.borrow_mut().style.set_property(property, value);
        Ok(())
    }

    fn remove_property(&self, property: &str) -> CssResult<()> {
        self.0.borrow_mut().style.remove_property(property);
        Ok(())
    }

    fn get_property_value(&self, property: &str) -> Option<String> {
        self.0.borrow().style.get_property_value(property).map(str::to_string)
    }
}

impl CssRuleContainer<MemoryCssom> for MemoryMediaRule {
    fn length(&self) -> usize {
        self.0.borrow().rules.len()
    }

    fn item(&self, index: usize) -> Option<MemoryRule> {
        self.0.borrow().rules.get(index).cloned()
    }

    fn insert_rule(&self, rule: &str, index: usize) -> CssResult<usize> {
        let link = ParentLink::Media(Rc::downgrade(&self.0));
        insert_into(&mut self.0.borrow_mut().rules, rule, index, link)
    }

    fn delete_rule(&self, index: usize) -> CssResult<()> {
        delete_from(&mut self.0.borrow_mut().rules, index)
    }
}

impl CssMediaRule<MemoryCssom> for MemoryMediaRule {
    fn condition_text(&self) -> String {
        self.0.borrow().condition_text.clone()
    }

    fn css_text(&self) -> String {
        let data = self.0.borrow();
        if data.rules.is_empty() {
            format!("@media {} {{\n}}", data.condition_text)
        } else {
            format!("@media {} {{\n{}\n}}", data.condition_text, rules_to_css(&data.rules, 2))
        }
    }

    fn parent_style_sheet(&self) -> Option<MemoryStyleSheet> {
        self.0.borrow().parent.style_sheet()
    }

    fn is_same_rule(&self, other: &MemoryRule) -> bool {
        match other {
            MemoryRule::Media(rule) => Rc::ptr_eq(&self.0, &rule.0),
            MemoryRule::Style(_) => false,
        }
    }
}

impl MemoryStyleSheet {
    #[must_use]
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(SheetData::default())))
    }
}

impl Default for MemoryStyleSheet {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for MemoryStyleSheet {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl CssRuleContainer<MemoryCssom> for MemoryStyleSheet {
    fn length(&self) -> usize {
        self.0.borrow().rules.len()
    }

    fn item(&self, index: usize) -> Option<MemoryRule> {
        self.0.borrow().rules.get(index).cloned()
    }

    fn insert_rule(&self, rule: &str, index: usize) -> CssResult<usize> {
        let link = ParentLink::Sheet(Rc::downgrade(&self.0));
        insert_into(&mut self.0.borrow_mut().rules, rule, index, link)
    }

    fn delete_rule(&self, index: usize) -> CssResult<()> {
        delete_from(&mut self.0.borrow_mut().rules, index)
    }
}

impl CssStyleSheet<MemoryCssom> for MemoryStyleSheet {
    fn css_text(&self) -> String {
        rules_to_css(&self.0.borrow().rules, 0)
    }
}

#[derive(Debug, Default)]
struct DocumentData {
    /// Style elements in document order, keyed by their element id
    style_elements: Vec<(String, MemoryStyleSheet)>,
}

/// A document that only knows about its `<style>` elements
#[derive(Clone, Debug, Default)]
pub struct MemoryDocument(Rc<RefCell<DocumentData>>);

impl MemoryDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the sheet of the style element with the given id, without creating it
    pub fn style_sheet(&self, id: &str) -> Option<MemoryStyleSheet> {
        self.0
            .borrow()
            .style_elements
            .iter()
            .find(|(element_id, _)| element_id == id)
            .map(|(_, sheet)| sheet.clone())
    }

    pub fn style_sheet_ids(&self) -> Vec<String> {
        self.0
            .borrow()
            .style_elements
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Serialized form of all style elements in document order
    pub fn css_text(&self) -> String {
        self.0
            .borrow()
            .style_elements
            .iter()
            .map(|(_, sheet)| sheet.css_text())
            .filter(|css| !css.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl StyleDocument<MemoryCssom> for MemoryDocument {
    fn find_or_create_style_sheet(&self, id: &str) -> CssResult<MemoryStyleSheet> {
        if let Some(sheet) = self.style_sheet(id) {
            return Ok(sheet);
        }

        debug!("cssom: creating style element '{id}'");
        let sheet = MemoryStyleSheet::new();
        self.0
            .borrow_mut()
            .style_elements
            .push((id.to_string(), sheet.clone()));
        Ok(sheet)
    }

    fn remove_style_sheet(&self, id: &str) -> CssResult<bool> {
        let mut data = self.0.borrow_mut();
        let Some(pos) = data.style_elements.iter().position(|(element_id, _)| element_id == id) else {
            return Ok(false);
        };

        data.style_elements.remove(pos);
        Ok(true)
    }
}
