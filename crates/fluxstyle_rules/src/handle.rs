//! Handles to rules and media blocks inserted by a `StyleSheetManager`.
//!
//! A handle is attached as long as its native rule lives in a style sheet. Once the rule is deleted the
//! handle is detached for good: structural operations on it are no-ops, except for selector extension,
//! which fails.
use crate::manager::{RuleScope, SheetState};
use crate::property::{css_property_name, StyleValue};
use fluxstyle_interface::cssom::{CssMediaRule, CssRuleContainer, CssStyleRule, CssomSystem};
use fluxstyle_shared::errors::{CssResult, CssomError};
use log::debug;
use std::cell::RefCell;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

/// A single style rule, either at the top level of the sheet or nested in a media block
pub struct RuleHandle<S: CssomSystem> {
    state: Rc<RefCell<SheetState<S>>>,
    scope: RuleScope,
    /// Index at the time the handle was created
    index: usize,
    selector: String,
    rule: S::StyleRule,
}

impl<S: CssomSystem> Clone for RuleHandle<S> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
            scope: self.scope.clone(),
            index: self.index,
            selector: self.selector.clone(),
            rule: self.rule.clone(),
        }
    }
}

impl<S: CssomSystem> Debug for RuleHandle<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleHandle")
            .field("selector", &self.selector)
            .field("scope", &self.scope)
            .field("index", &self.index)
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl<S: CssomSystem> RuleHandle<S> {
    pub(crate) fn new(
        state: Rc<RefCell<SheetState<S>>>,
        scope: RuleScope,
        index: usize,
        selector: &str,
        rule: S::StyleRule,
    ) -> Self {
        Self {
            state,
            scope,
            index,
            selector: selector.to_string(),
            rule,
        }
    }

    /// The selector this rule was looked up with
    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn scope(&self) -> &RuleScope {
        &self.scope
    }

    /// Index of the rule in its list at the time the handle was created. Later deletions of other rules
    /// may have moved the rule since; the manager keeps track of that, this value does not.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The native rule
    pub fn native(&self) -> &S::StyleRule {
        &self.rule
    }

    pub fn is_attached(&self) -> bool {
        !self.state.borrow().disposed && self.rule.parent_style_sheet().is_some()
    }

    /// Sets a declaration. `property` may be given in camelCase (`backgroundColor`) or css form.
    /// Numbers get the configured length unit, unless the property is unitless. `StyleValue::Unset`
    /// removes the property.
    pub fn set_declaration(&self, property: &str, value: impl Into<StyleValue>) -> CssResult<()> {
        if !self.is_attached() {
            debug!("stylesheet: ignoring declaration {property} on removed rule '{}'", self.selector);
            return Ok(());
        }

        let property = css_property_name(property);
        let unit = self.state.borrow().config.length_unit.clone();

        match value.into().to_css(&property, &unit)? {
            Some(css) => self.rule.set_property(&property, &css),
            None => self.rule.remove_property(&property),
        }
    }

    /// Sets a number of declarations in one go
    pub fn set_declarations<I, K, V>(&self, declarations: I) -> CssResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<StyleValue>,
    {
        for (property, value) in declarations {
            self.set_declaration(property.as_ref(), value)?;
        }
        Ok(())
    }

    /// Current value of a declaration. `property` may be given in camelCase.
    pub fn declaration(&self, property: &str) -> Option<String> {
        self.rule.get_property_value(&css_property_name(property))
    }

    pub fn css_text(&self) -> String {
        self.rule.css_text()
    }

    /// Deletes the rule. Deleting a rule that is already gone does nothing.
    pub fn delete(&self) -> CssResult<()> {
        self.state
            .borrow_mut()
            .delete_rule(&self.scope, &self.selector, &self.rule)?;
        Ok(())
    }

    /// Returns the rule for this selector followed by `suffix`, in the same scope. Fails when this rule
    /// has been removed.
    pub fn extend(&self, suffix: &str) -> CssResult<RuleHandle<S>> {
        if !self.is_attached() {
            return Err(CssomError::detached(&self.selector));
        }

        let selector = format!("{}{}", self.selector, suffix);
        let (index, rule) = self
            .state
            .borrow_mut()
            .get_or_insert_rule(&self.scope, &selector)?;

        Ok(RuleHandle::new(
            Rc::clone(&self.state),
            self.scope.clone(),
            index,
            &selector,
            rule,
        ))
    }

    pub fn hover(&self) -> CssResult<RuleHandle<S>> {
        self.extend(":hover")
    }

    pub fn focus(&self) -> CssResult<RuleHandle<S>> {
        self.extend(":focus")
    }

    pub fn active(&self) -> CssResult<RuleHandle<S>> {
        self.extend(":active")
    }

    pub fn disabled(&self) -> CssResult<RuleHandle<S>> {
        self.extend(":disabled")
    }
}

/// A `@media` block at the top level of the sheet
pub struct MediaBlockHandle<S: CssomSystem> {
    state: Rc<RefCell<SheetState<S>>>,
    query: String,
    index: usize,
    rule: S::MediaRule,
}

impl<S: CssomSystem> Clone for MediaBlockHandle<S> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
            query: self.query.clone(),
            index: self.index,
            rule: self.rule.clone(),
        }
    }
}

impl<S: CssomSystem> Debug for MediaBlockHandle<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaBlockHandle")
            .field("query", &self.query)
            .field("index", &self.index)
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl<S: CssomSystem> MediaBlockHandle<S> {
    pub(crate) fn new(state: Rc<RefCell<SheetState<S>>>, query: &str, index: usize, rule: S::MediaRule) -> Self {
        Self {
            state,
            query: query.to_string(),
            index,
            rule,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Index of the block in the sheet at the time the handle was created
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn native(&self) -> &S::MediaRule {
        &self.rule
    }

    pub fn is_attached(&self) -> bool {
        !self.state.borrow().disposed && self.rule.parent_style_sheet().is_some()
    }

    /// Returns the rule for `selector` inside this block, inserting it at the end of the block when
    /// needed. Fails when the block has been removed.
    pub fn get_or_insert_rule(&self, selector: &str) -> CssResult<RuleHandle<S>> {
        if !self.is_attached() {
            return Err(CssomError::detached(&format!("@media {} {{ {selector} }}", self.query)));
        }

        let scope = RuleScope::Media(self.query.clone());
        let (index, rule) = self.state.borrow_mut().get_or_insert_rule(&scope, selector)?;

        Ok(RuleHandle::new(Rc::clone(&self.state), scope, index, selector, rule))
    }

    /// Number of rules nested in the block
    pub fn rule_count(&self) -> usize {
        self.rule.length()
    }

    pub fn css_text(&self) -> String {
        self.rule.css_text()
    }

    /// Removes the block and everything in it. Removing a block that is already gone does nothing.
    pub fn remove(&self) -> CssResult<()> {
        self.state.borrow_mut().delete_media_block(&self.query, &self.rule)?;
        Ok(())
    }
}
