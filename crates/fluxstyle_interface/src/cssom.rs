use fluxstyle_shared::errors::CssResult;
use std::fmt::Debug;

/// The `CssomSystem` trait ties together all the object model types of a single host. The rule manager
/// is generic over this trait, so it never has to know whether it talks to a browser or to the in-memory
/// implementation.
pub trait CssomSystem: Clone + Debug + 'static {
    /// Any rule found in a rule list
    type Rule: CssRule<Self>;
    /// A plain `selector { declarations }` rule
    type StyleRule: CssStyleRule<Self>;
    /// A `@media` grouping rule
    type MediaRule: CssMediaRule<Self>;
    /// A style sheet attached to a document
    type StyleSheet: CssStyleSheet<Self>;
    /// The document that owns the style sheets
    type Document: StyleDocument<Self>;
}

/// A rule as returned from a rule list. It can be narrowed down to one of the concrete rule types.
pub trait CssRule<S: CssomSystem>: Clone + Debug {
    /// Serialized form of the rule
    fn css_text(&self) -> String;

    /// Returns the style sheet this rule lives in, or `None` when the rule has been removed
    fn parent_style_sheet(&self) -> Option<S::StyleSheet>;

    fn as_style_rule(&self) -> Option<S::StyleRule>;

    fn as_media_rule(&self) -> Option<S::MediaRule>;
}

/// A list of rules that can be added to and removed from by index. Style sheets and grouping
/// rules (`@media`) both behave like this.
pub trait CssRuleContainer<S: CssomSystem>: Clone + Debug {
    /// Number of rules currently in the list
    fn length(&self) -> usize;

    /// Returns the rule at the given index
    fn item(&self, index: usize) -> Option<S::Rule>;

    /// Parses `rule` and inserts it at `index`. Returns the index where the rule was inserted.
    fn insert_rule(&self, rule: &str, index: usize) -> CssResult<usize>;

    /// Removes the rule at `index`. Every rule after it shifts down by one.
    fn delete_rule(&self, index: usize) -> CssResult<()>;
}

pub trait CssStyleRule<S: CssomSystem>: Clone + Debug {
    fn selector_text(&self) -> String;

    fn css_text(&self) -> String;

    fn parent_style_sheet(&self) -> Option<S::StyleSheet>;

    /// Returns true when `other` refers to this very rule object (not merely an equal one)
    fn is_same_rule(&self, other: &S::Rule) -> bool;

    /// Sets a property in the declaration block. The name must already be in its css form.
    fn set_property(&self, property: &str, value: &str) -> CssResult<()>;

    fn remove_property(&self, property: &str) -> CssResult<()>;

    /// Returns the value of the property, or `None` when the declaration block does not define it
    fn get_property_value(&self, property: &str) -> Option<String>;
}

pub trait CssMediaRule<S: CssomSystem>: CssRuleContainer<S> {
    /// The media query text (ie: `(max-width: 600px)`)
    fn condition_text(&self) -> String;

    fn css_text(&self) -> String;

    fn parent_style_sheet(&self) -> Option<S::StyleSheet>;

    fn is_same_rule(&self, other: &S::Rule) -> bool;
}

pub trait CssStyleSheet<S: CssomSystem>: CssRuleContainer<S> {
    /// Serialized form of all the rules in the sheet
    fn css_text(&self) -> String;
}

/// The document side of the host: it knows how to find (or create) the style holding element by id.
pub trait StyleDocument<S: CssomSystem>: Clone + Debug {
    /// Returns the sheet of the style element with the given id. When there is no such element, it is
    /// created and attached to the document first.
    fn find_or_create_style_sheet(&self, id: &str) -> CssResult<S::StyleSheet>;

    /// Detaches the style element with the given id. Returns false when there was nothing to remove.
    fn remove_style_sheet(&self, id: &str) -> CssResult<bool>;
}
