use crate::config::ManagerConfig;
use crate::manager::StyleSheetManager;
use fluxstyle_interface::cssom::{CssomSystem, StyleDocument};
use fluxstyle_shared::errors::CssResult;
use log::debug;
use std::collections::HashMap;

/// Hands out one `StyleSheetManager` per style element id of a document.
///
/// The style element is found (or created and attached) the first time an id is asked for; every
/// later call with the same id returns the same manager. `dispose()` and `reset()` tear scopes down
/// again, which mostly matters for tests.
pub struct StyleSheetRegistry<S: CssomSystem> {
    document: S::Document,
    config: ManagerConfig,
    managers: HashMap<String, StyleSheetManager<S>>,
}

impl<S: CssomSystem> StyleSheetRegistry<S> {
    pub fn new(document: S::Document, config: ManagerConfig) -> Self {
        Self {
            document,
            config,
            managers: HashMap::new(),
        }
    }

    pub fn document(&self) -> &S::Document {
        &self.document
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Returns the manager for the style element with the given id, creating both when needed
    pub fn get_or_create(&mut self, id: &str) -> CssResult<StyleSheetManager<S>> {
        if let Some(manager) = self.managers.get(id) {
            return Ok(manager.clone());
        }

        let sheet = self.document.find_or_create_style_sheet(id)?;
        let manager = StyleSheetManager::new(id, sheet, self.config.clone());
        debug!("stylesheet: created scope '{id}'");

        self.managers.insert(id.to_string(), manager.clone());
        Ok(manager)
    }

    /// Returns the manager for the configured default id
    pub fn default_manager(&mut self) -> CssResult<StyleSheetManager<S>> {
        let id = self.config.default_id.clone();
        self.get_or_create(&id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.managers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.managers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }

    /// Disposes the scope with the given id: its rules are deleted, the style element is removed from
    /// the document and the manager (and any clone of it) refuses further inserts. Returns false when
    /// there was no such scope.
    pub fn dispose(&mut self, id: &str) -> CssResult<bool> {
        let Some(manager) = self.managers.remove(id) else {
            return Ok(false);
        };

        manager.dispose()?;
        self.document.remove_style_sheet(id)?;
        debug!("stylesheet: disposed scope '{id}'");
        Ok(true)
    }

    /// Disposes every scope
    pub fn reset(&mut self) -> CssResult<()> {
        let ids: Vec<String> = self.managers.keys().cloned().collect();
        for id in ids {
            self.dispose(&id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluxstyle_cssom::memory::{MemoryCssom, MemoryDocument};
    use fluxstyle_shared::errors::CssomError;

    fn registry() -> StyleSheetRegistry<MemoryCssom> {
        StyleSheetRegistry::new(MemoryDocument::new(), ManagerConfig::default())
    }

    #[test]
    fn same_id_same_manager() {
        let mut registry = registry();
        let first = registry.get_or_create("scope").unwrap();
        let second = registry.get_or_create("scope").unwrap();
        let other = registry.get_or_create("other").unwrap();

        assert!(first.same_scope(&second));
        assert!(!first.same_scope(&other));
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.document().style_sheet_ids(),
            vec!["scope".to_string(), "other".to_string()]
        );

        first.get_or_insert_rule(".a").unwrap();
        second.get_or_insert_rule(".a").unwrap();
        assert_eq!(first.rule_count(), 1);
    }

    #[test]
    fn default_manager_uses_configured_id() {
        let mut registry = registry();
        let manager = registry.default_manager().unwrap();
        assert_eq!(manager.id(), "fluxstyle-dynamic");
        assert!(registry.contains("fluxstyle-dynamic"));
    }

    #[test]
    fn dispose_tears_the_scope_down() {
        let mut registry = registry();
        let manager = registry.get_or_create("scope").unwrap();
        let rule = manager.get_or_insert_rule(".a").unwrap();

        assert!(registry.dispose("scope").unwrap());
        assert!(!registry.dispose("scope").unwrap());

        assert!(manager.is_disposed());
        assert!(!rule.is_attached());
        assert!(registry.document().style_sheet("scope").is_none());
        assert_eq!(
            manager.get_or_insert_rule(".b").unwrap_err(),
            CssomError::Disposed("scope".into())
        );

        let fresh = registry.get_or_create("scope").unwrap();
        assert!(!fresh.same_scope(&manager));
        assert_eq!(fresh.rule_count(), 0);
    }

    #[test]
    fn reset_disposes_everything() {
        let mut registry = registry();
        let a = registry.get_or_create("a").unwrap();
        registry.get_or_create("b").unwrap();

        registry.reset().unwrap();
        assert!(registry.is_empty());
        assert!(a.is_disposed());
        assert!(registry.document().style_sheet_ids().is_empty());
    }
}
