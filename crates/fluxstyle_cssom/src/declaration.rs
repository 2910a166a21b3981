/// A declaration block of a style rule. Properties keep the order in which they were first set.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CssStyleDeclaration {
    /// All the properties that are defined
    property_list: Vec<(String, String)>,
}

impl CssStyleDeclaration {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut decl = Self::new();
        for (property, value) in pairs {
            decl.set_property(&property, &value);
        }
        decl
    }

    pub fn length(&self) -> usize {
        self.property_list.len()
    }

    /// Returns the name of the property at the given position
    pub fn item(&self, idx: usize) -> Option<&str> {
        self.property_list.get(idx).map(|(name, _)| name.as_str())
    }

    pub fn get_property_value(&self, property: &str) -> Option<&str> {
        self.property_list
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    /// Sets the property. An empty value removes the property, just like `CSSStyleDeclaration.setProperty()`.
    pub fn set_property(&mut self, property: &str, value: &str) {
        if value.is_empty() {
            self.remove_property(property);
            return;
        }

        match self.property_list.iter_mut().find(|(name, _)| name == property) {
            Some((_, current)) => *current = value.to_string(),
            None => self
                .property_list
                .push((property.to_string(), value.to_string())),
        }
    }

    /// Removes the property and returns its old value
    pub fn remove_property(&mut self, property: &str) -> Option<String> {
        let pos = self.property_list.iter().position(|(name, _)| name == property)?;
        Some(self.property_list.remove(pos).1)
    }

    pub fn css_text(&self) -> String {
        self.property_list
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
