//! The style sheet rule manager
//!
//! A manager owns one native style sheet and remembers which rule it inserted for which selector
//! (and which `@media` block for which query). Asking twice for the same selector hands out the same
//! native rule, so call sites can attach pseudo-class and media styles to a generated class name as
//! often as they like without growing the sheet.
//!
//! Cached indices are kept exact: when a rule is deleted, every cached index behind it in the same
//! list moves down by one. On top of that, an index is checked against the rule it should point to
//! before the manager mutates anything through it (see `ManagerConfig::verify_indices`), so a stale
//! handle can never delete or extend a rule it does not own.
use crate::config::ManagerConfig;
use crate::handle::{MediaBlockHandle, RuleHandle};
use crate::property::StyleValue;
use fluxstyle_interface::cssom::{CssMediaRule, CssRule, CssRuleContainer, CssStyleRule, CssStyleSheet, CssomSystem};
use fluxstyle_shared::errors::{CssResult, CssomError};
use log::{debug, warn};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

/// The list a rule lives in
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuleScope {
    /// Top level of the style sheet
    Sheet,
    /// Inside the `@media` block with the given query
    Media(String),
}

/// Where a native rule was last seen
pub(crate) struct RuleSlot<R> {
    pub index: usize,
    pub rule: R,
}

pub(crate) struct MediaBlock<S: CssomSystem> {
    pub slot: RuleSlot<S::MediaRule>,
    /// Rules nested in this block, by selector
    pub rules: HashMap<String, RuleSlot<S::StyleRule>>,
}

pub(crate) struct SheetState<S: CssomSystem> {
    pub id: String,
    pub sheet: S::StyleSheet,
    pub config: ManagerConfig,
    /// Top level rules, by selector
    pub rules: HashMap<String, RuleSlot<S::StyleRule>>,
    /// Media blocks, by query
    pub media: HashMap<String, MediaBlock<S>>,
    pub disposed: bool,
}

/// Finds the live index of a rule. `cached` is where the rule is expected to be.
///
/// Without verification the cached index is trusted as long as it is in range. With verification the
/// rule at the cached index must be the expected one; if it is not, the whole list is scanned.
fn locate<S, C>(container: &C, cached: usize, verify: bool, is_same: impl Fn(&S::Rule) -> bool) -> Option<usize>
where
    S: CssomSystem,
    C: CssRuleContainer<S>,
{
    let length = container.length();
    if !verify {
        return (cached < length).then_some(cached);
    }

    if container.item(cached).is_some_and(|rule| is_same(&rule)) {
        return Some(cached);
    }

    let found = (0..length).find(|&index| container.item(index).is_some_and(|rule| is_same(&rule)));
    if let Some(index) = found {
        warn!("stylesheet: cached index {cached} was stale, rule found at {index}");
    }
    found
}

/// Moves every index behind a deleted one down by one
fn shift_after_delete<'a>(indices: impl Iterator<Item = &'a mut usize>, removed: usize) {
    for index in indices {
        if *index > removed {
            *index -= 1;
        }
    }
}

fn lookup_or_insert<S, C>(
    container: &C,
    slots: &mut HashMap<String, RuleSlot<S::StyleRule>>,
    selector: &str,
    verify: bool,
) -> CssResult<(usize, S::StyleRule)>
where
    S: CssomSystem,
    C: CssRuleContainer<S>,
{
    let cached = slots.get(selector).map(|slot| (slot.index, slot.rule.clone()));
    if let Some((cached_index, rule)) = cached {
        if let Some(index) = locate::<S, C>(container, cached_index, verify, |other| rule.is_same_rule(other)) {
            if let Some(slot) = slots.get_mut(selector) {
                slot.index = index;
            }
            return Ok((index, rule));
        }

        warn!("stylesheet: rule '{selector}' vanished from its list, inserting it again");
        slots.remove(selector);
    }

    let index = container.insert_rule(&format!("{selector}{{}}"), container.length())?;
    let Some(rule) = container.item(index).and_then(|rule| rule.as_style_rule()) else {
        // The host accepted the text as some other kind of rule; it must not stay behind untracked
        container.delete_rule(index)?;
        return Err(CssomError::Syntax(format!("'{selector}' is not a style rule selector")));
    };

    debug!("stylesheet: inserted rule '{selector}' at index {index}");
    slots.insert(
        selector.to_string(),
        RuleSlot {
            index,
            rule: rule.clone(),
        },
    );

    Ok((index, rule))
}

/// Deletes `rule` from `container`. Returns the index it was deleted from, or `None` when the rule was
/// not found.
fn remove_from<S, C>(
    container: &C,
    slots: &mut HashMap<String, RuleSlot<S::StyleRule>>,
    selector: &str,
    rule: &S::StyleRule,
    verify: bool,
) -> CssResult<Option<usize>>
where
    S: CssomSystem,
    C: CssRuleContainer<S>,
{
    let hint = slots.get(selector).map(|slot| slot.index);
    let verify = verify || hint.is_none();

    let Some(index) = locate::<S, C>(container, hint.unwrap_or(0), verify, |other| rule.is_same_rule(other)) else {
        return Ok(None);
    };

    container.delete_rule(index)?;
    if slots.get(selector).is_some_and(|slot| slot.index == index) {
        slots.remove(selector);
    }
    shift_after_delete(slots.values_mut().map(|slot| &mut slot.index), index);

    Ok(Some(index))
}

impl<S: CssomSystem> SheetState<S> {
    fn ensure_live(&self) -> CssResult<()> {
        if self.disposed {
            return Err(CssomError::Disposed(self.id.clone()));
        }
        Ok(())
    }

    pub fn get_or_insert_rule(&mut self, scope: &RuleScope, selector: &str) -> CssResult<(usize, S::StyleRule)> {
        self.ensure_live()?;
        let verify = self.config.verify_indices;

        match scope {
            RuleScope::Sheet => {
                let sheet = self.sheet.clone();
                lookup_or_insert::<S, _>(&sheet, &mut self.rules, selector, verify)
            }
            RuleScope::Media(query) => {
                let Some(block) = self
                    .media
                    .get_mut(query)
                    .filter(|block| block.slot.rule.parent_style_sheet().is_some())
                else {
                    return Err(CssomError::detached(&format!("@media {query} {{ {selector} }}")));
                };

                let container = block.slot.rule.clone();
                lookup_or_insert::<S, _>(&container, &mut block.rules, selector, verify)
            }
        }
    }

    pub fn get_or_insert_media_block(&mut self, query: &str) -> CssResult<(usize, S::MediaRule)> {
        self.ensure_live()?;
        let verify = self.config.verify_indices;

        let cached = self.media.get(query).map(|block| (block.slot.index, block.slot.rule.clone()));
        if let Some((cached_index, rule)) = cached {
            if let Some(index) =
                locate::<S, _>(&self.sheet, cached_index, verify, |other| rule.is_same_rule(other))
            {
                if let Some(block) = self.media.get_mut(query) {
                    block.slot.index = index;
                }
                return Ok((index, rule));
            }

            warn!("stylesheet: media block '{query}' vanished from the sheet, inserting it again");
            self.media.remove(query);
        }

        let index = self
            .sheet
            .insert_rule(&format!("@media {query}{{}}"), self.sheet.length())?;
        let Some(rule) = self.sheet.item(index).and_then(|rule| rule.as_media_rule()) else {
            self.sheet.delete_rule(index)?;
            return Err(CssomError::Syntax(format!("'{query}' is not a media query")));
        };

        debug!("stylesheet: inserted media block '{query}' at index {index}");
        self.media.insert(
            query.to_string(),
            MediaBlock {
                slot: RuleSlot {
                    index,
                    rule: rule.clone(),
                },
                rules: HashMap::new(),
            },
        );

        Ok((index, rule))
    }

    /// Deletes a style rule. Rules that are already gone are left alone.
    pub fn delete_rule(&mut self, scope: &RuleScope, selector: &str, rule: &S::StyleRule) -> CssResult<bool> {
        if self.disposed || rule.parent_style_sheet().is_none() {
            debug!("stylesheet: rule '{selector}' is already removed");
            return Ok(false);
        }
        let verify = self.config.verify_indices;

        let removed = match scope {
            RuleScope::Sheet => {
                let sheet = self.sheet.clone();
                let removed = remove_from::<S, _>(&sheet, &mut self.rules, selector, rule, verify)?;
                if let Some(index) = removed {
                    // Media blocks share the index space of the top level rules
                    shift_after_delete(self.media.values_mut().map(|block| &mut block.slot.index), index);
                }
                removed
            }
            RuleScope::Media(query) => match self.media.get_mut(query) {
                Some(block) => {
                    let container = block.slot.rule.clone();
                    remove_from::<S, _>(&container, &mut block.rules, selector, rule, verify)?
                }
                None => None,
            },
        };

        match removed {
            Some(index) => {
                debug!("stylesheet: deleted rule '{selector}' at index {index}");
                Ok(true)
            }
            None => {
                debug!("stylesheet: rule '{selector}' not found, nothing to delete");
                Ok(false)
            }
        }
    }

    /// Deletes a media block with all its nested rules. Blocks that are already gone are left alone.
    pub fn delete_media_block(&mut self, query: &str, rule: &S::MediaRule) -> CssResult<bool> {
        if self.disposed || rule.parent_style_sheet().is_none() {
            debug!("stylesheet: media block '{query}' is already removed");
            return Ok(false);
        }

        let hint = self.media.get(query).map(|block| block.slot.index);
        let verify = self.config.verify_indices || hint.is_none();

        let Some(index) = locate::<S, _>(&self.sheet, hint.unwrap_or(0), verify, |other| rule.is_same_rule(other))
        else {
            debug!("stylesheet: media block '{query}' not found, nothing to delete");
            return Ok(false);
        };

        self.sheet.delete_rule(index)?;
        if self.media.get(query).is_some_and(|block| block.slot.index == index) {
            self.media.remove(query);
        }
        shift_after_delete(self.rules.values_mut().map(|slot| &mut slot.index), index);
        shift_after_delete(self.media.values_mut().map(|block| &mut block.slot.index), index);

        debug!("stylesheet: deleted media block '{query}' at index {index}");
        Ok(true)
    }

    /// Empties the native sheet and forgets every rule. The state cannot be used afterwards.
    pub fn dispose(&mut self) -> CssResult<()> {
        for index in (0..self.sheet.length()).rev() {
            self.sheet.delete_rule(index)?;
        }

        self.rules.clear();
        self.media.clear();
        self.disposed = true;
        Ok(())
    }
}

/// Manages the rules of one style sheet (one logical style scope).
///
/// Cloning a manager is cheap and yields another reference to the same scope. Everything is
/// single-threaded: managers and handles are neither `Send` nor `Sync`.
pub struct StyleSheetManager<S: CssomSystem> {
    state: Rc<RefCell<SheetState<S>>>,
}

impl<S: CssomSystem> Clone for StyleSheetManager<S> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<S: CssomSystem> Debug for StyleSheetManager<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("StyleSheetManager")
            .field("id", &state.id)
            .field("rules", &state.rules.len())
            .field("media", &state.media.len())
            .field("disposed", &state.disposed)
            .finish()
    }
}

impl<S: CssomSystem> StyleSheetManager<S> {
    /// Creates a manager for the given sheet. `id` names the scope in logs and errors; normally it is
    /// the id of the style element that holds the sheet.
    pub fn new(id: &str, sheet: S::StyleSheet, config: ManagerConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(SheetState {
                id: id.to_string(),
                sheet,
                config,
                rules: HashMap::new(),
                media: HashMap::new(),
                disposed: false,
            })),
        }
    }

    pub fn id(&self) -> String {
        self.state.borrow().id.clone()
    }

    pub fn style_sheet(&self) -> S::StyleSheet {
        self.state.borrow().sheet.clone()
    }

    pub fn config(&self) -> ManagerConfig {
        self.state.borrow().config.clone()
    }

    /// Returns true when both managers work on the same scope
    pub fn same_scope(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    pub fn is_disposed(&self) -> bool {
        self.state.borrow().disposed
    }

    /// Returns the rule for `selector` at the top level of the sheet, inserting an empty rule at the
    /// end of the sheet when there is none yet.
    pub fn get_or_insert_rule(&self, selector: &str) -> CssResult<RuleHandle<S>> {
        let (index, rule) = self
            .state
            .borrow_mut()
            .get_or_insert_rule(&RuleScope::Sheet, selector)?;

        Ok(RuleHandle::new(
            Rc::clone(&self.state),
            RuleScope::Sheet,
            index,
            selector,
            rule,
        ))
    }

    /// Returns the `@media` block for `query`, inserting an empty one at the end of the sheet when there
    /// is none yet. Every handle for the same query shares the nested rules.
    pub fn get_or_insert_media_block(&self, query: &str) -> CssResult<MediaBlockHandle<S>> {
        let (index, rule) = self.state.borrow_mut().get_or_insert_media_block(query)?;
        Ok(MediaBlockHandle::new(Rc::clone(&self.state), query, index, rule))
    }

    /// Sets (or with `StyleValue::Unset`, removes) a declaration on the rule of the handle
    pub fn set_declaration(&self, handle: &RuleHandle<S>, property: &str, value: impl Into<StyleValue>) -> CssResult<()> {
        handle.set_declaration(property, value)
    }

    /// Deletes the rule of the handle. Deleting a rule twice is fine.
    pub fn delete_rule(&self, handle: &RuleHandle<S>) -> CssResult<()> {
        handle.delete()
    }

    pub fn delete_media_block(&self, handle: &MediaBlockHandle<S>) -> CssResult<()> {
        handle.remove()
    }

    /// Returns the rule for the selector of the handle followed by `suffix` (ie: `:hover`, ` > span`),
    /// in the same scope as the handle. Fails when the rule of the handle has been removed.
    pub fn extend_selector(&self, handle: &RuleHandle<S>, suffix: &str) -> CssResult<RuleHandle<S>> {
        handle.extend(suffix)
    }

    /// Number of top level rules in the native sheet (media blocks count as one)
    pub fn rule_count(&self) -> usize {
        self.state.borrow().sheet.length()
    }

    pub fn media_block_count(&self) -> usize {
        self.state.borrow().media.len()
    }

    /// Serialized form of the native sheet
    pub fn css_text(&self) -> String {
        self.state.borrow().sheet.css_text()
    }

    pub(crate) fn dispose(&self) -> CssResult<()> {
        self.state.borrow_mut().dispose()
    }
}
