use fluxstyle_config::ConfigStore;

/// Settings a manager works with. Read once when the manager (or registry) is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Id of the style element used by `StyleSheetRegistry::default_manager()`
    pub default_id: String,
    /// Unit appended to numbers for properties that are not unitless
    pub length_unit: String,
    /// When set, a cached index is checked against the rule it should point to before it is used
    pub verify_indices: bool,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            default_id: "fluxstyle-dynamic".to_string(),
            length_unit: "px".to_string(),
            verify_indices: true,
        }
    }
}

impl ManagerConfig {
    /// Builds the configuration from the `stylesheet.*` settings of the given store
    pub fn from_store(store: &ConfigStore) -> Self {
        let defaults = Self::default();

        Self {
            default_id: store
                .get("stylesheet.default_id")
                .map_or(defaults.default_id, |s| s.as_string()),
            length_unit: store
                .get("stylesheet.length_unit")
                .map_or(defaults.length_unit, |s| s.as_string()),
            verify_indices: store
                .get("stylesheet.verify_indices")
                .map_or(defaults.verify_indices, |s| s.to_bool()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluxstyle_config::settings::Setting;

    #[test]
    fn store_defaults_match() {
        assert_eq!(ManagerConfig::from_store(&ConfigStore::default()), ManagerConfig::default());
    }

    #[test]
    fn store_overrides() {
        let store = ConfigStore::default();
        store.set("stylesheet.length_unit", Setting::String("rem".into()));
        store.set("stylesheet.verify_indices", Setting::Bool(false));

        let config = ManagerConfig::from_store(&store);
        assert_eq!(config.length_unit, "rem");
        assert!(!config.verify_indices);
    }
}
