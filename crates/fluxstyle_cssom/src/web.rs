//! Browser object model, backed by `web-sys`
use fluxstyle_interface::cssom::{
    CssMediaRule, CssRule, CssRuleContainer, CssStyleRule, CssStyleSheet, CssomSystem, StyleDocument,
};
use fluxstyle_shared::errors::{CssResult, CssomError};
use log::debug;
use wasm_bindgen::{JsCast, JsValue};

#[derive(Clone, Debug, Default)]
pub struct WebCssom;

impl CssomSystem for WebCssom {
    type Rule = WebRule;
    type StyleRule = WebStyleRule;
    type MediaRule = WebMediaRule;
    type StyleSheet = WebStyleSheet;
    type Document = WebDocument;
}

#[derive(Clone, Debug)]
pub struct WebRule(web_sys::CssRule);

#[derive(Clone, Debug)]
pub struct WebStyleRule(web_sys::CssStyleRule);

#[derive(Clone, Debug)]
pub struct WebMediaRule(web_sys::CssMediaRule);

#[derive(Clone, Debug)]
pub struct WebStyleSheet(web_sys::CssStyleSheet);

#[derive(Clone, Debug)]
pub struct WebDocument(web_sys::Document);

fn js_error(err: JsValue) -> CssomError {
    CssomError::Host(format!("{err:?}"))
}

fn to_js_index(index: usize) -> CssResult<u32> {
    u32::try_from(index).map_err(|_| CssomError::IndexOutOfRange {
        index,
        length: u32::MAX as usize,
    })
}

fn same_object(a: &JsValue, b: &JsValue) -> bool {
    a == b
}

impl CssRule<WebCssom> for WebRule {
    fn css_text(&self) -> String {
        self.0.css_text()
    }

    fn parent_style_sheet(&self) -> Option<WebStyleSheet> {
        self.0.parent_style_sheet().map(WebStyleSheet)
    }

    fn as_style_rule(&self) -> Option<WebStyleRule> {
        self.0.dyn_ref::<web_sys::CssStyleRule>().cloned().map(WebStyleRule)
    }

    fn as_media_rule(&self) -> Option<WebMediaRule> {
        self.0.dyn_ref::<web_sys::CssMediaRule>().cloned().map(WebMediaRule)
    }
}

impl CssStyleRule<WebCssom> for WebStyleRule {
    fn selector_text(&self) -> String {
        self.0.selector_text()
    }

    fn css_text(&self) -> String {
        self.0.css_text()
    }

    fn parent_style_sheet(&self) -> Option<WebStyleSheet> {
        self.0.parent_style_sheet().map(WebStyleSheet)
    }

    fn is_same_rule(&self, other: &WebRule) -> bool {
        same_object(self.0.as_ref(), other.0.as_ref())
    }

    fn set_property(&self, property: &str, value: &str) -> CssResult<()> {
        self.0.style().set_property(property, value).map_err(js_error)
    }

    fn remove_property(&self, property: &str) -> CssResult<()> {
        self.0.style().remove_property(property).map(|_| ()).map_err(js_error)
    }

    fn get_property_value(&self, property: &str) -> Option<String> {
        // The browser returns an empty string for properties that are not set
        self.0
            .style()
            .get_property_value(property)
            .ok()
            .filter(|value| !value.is_empty())
    }
}

impl WebStyleSheet {
    /// Cross-origin sheets refuse access to their rules
    fn rule_list(&self) -> Option<web_sys::CssRuleList> {
        self.0.css_rules().ok()
    }
}

impl WebMediaRule {
    fn rule_list(&self) -> Option<web_sys::CssRuleList> {
        Some(self.0.css_rules())
    }
}

/// Builds a rule container implementation on top of the `insertRule`/`deleteRule`/`cssRules` trio
/// of a web-sys type.
macro_rules! web_rule_container {
    ($type:ty) => {
        impl CssRuleContainer<WebCssom> for $type {
            fn length(&self) -> usize {
                self.rule_list().map_or(0, |list| list.length() as usize)
            }

            fn item(&self, index: usize) -> Option<WebRule> {
                let index = u32::try_from(index).ok()?;
                self.rule_list()?.item(index).map(WebRule)
            }

            fn insert_rule(&self, rule: &str, index: usize) -> CssResult<usize> {
                let inserted = self
                    .0
                    .insert_rule_with_index(rule, to_js_index(index)?)
                    .map_err(js_error)?;
                Ok(inserted as usize)
            }

            fn delete_rule(&self, index: usize) -> CssResult<()> {
                self.0.delete_rule(to_js_index(index)?).map_err(js_error)
            }
        }
    };
}

web_rule_container!(WebStyleSheet);
web_rule_container!(WebMediaRule);

impl CssMediaRule<WebCssom> for WebMediaRule {
    fn condition_text(&self) -> String {
        self.0.media().media_text()
    }

    fn css_text(&self) -> String {
        self.0.css_text()
    }

    fn parent_style_sheet(&self) -> Option<WebStyleSheet> {
        self.0.parent_style_sheet().map(WebStyleSheet)
    }

    fn is_same_rule(&self, other: &WebRule) -> bool {
        same_object(self.0.as_ref(), other.0.as_ref())
    }
}

impl CssStyleSheet<WebCssom> for WebStyleSheet {
    fn css_text(&self) -> String {
        let mut out = Vec::new();
        for index in 0..self.length() {
            if let Some(rule) = self.item(index) {
                out.push(rule.css_text());
            }
        }
        out.join("\n")
    }
}

impl WebDocument {
    /// Wraps the document of the current window
    pub fn current() -> CssResult<Self> {
        let window = web_sys::window().ok_or_else(|| CssomError::host("no window"))?;
        let document = window.document().ok_or_else(|| CssomError::host("no document"))?;
        Ok(Self(document))
    }

    #[must_use]
    pub fn new(document: web_sys::Document) -> Self {
        Self(document)
    }
}

fn sheet_of(element: &web_sys::HtmlStyleElement) -> CssResult<WebStyleSheet> {
    element
        .sheet()
        .ok_or_else(|| CssomError::host("style element has no sheet (is it attached?)"))?
        .dyn_into::<web_sys::CssStyleSheet>()
        .map(WebStyleSheet)
        .map_err(|_| CssomError::host("style element sheet is not a CSSStyleSheet"))
}

impl StyleDocument<WebCssom> for WebDocument {
    fn find_or_create_style_sheet(&self, id: &str) -> CssResult<WebStyleSheet> {
        if let Some(element) = self.0.get_element_by_id(id) {
            let element = element
                .dyn_into::<web_sys::HtmlStyleElement>()
                .map_err(|_| CssomError::Host(format!("element '{id}' is not a <style> element")))?;
            return sheet_of(&element);
        }

        debug!("cssom: creating style element '{id}'");
        let element = self
            .0
            .create_element("style")
            .map_err(js_error)?
            .dyn_into::<web_sys::HtmlStyleElement>()
            .map_err(|_| CssomError::host("created element is not a <style> element"))?;
        element.set_id(id);

        let head = self.0.head().ok_or_else(|| CssomError::host("document has no head"))?;
        head.append_child(&element).map_err(js_error)?;

        sheet_of(&element)
    }

    fn remove_style_sheet(&self, id: &str) -> CssResult<bool> {
        match self.0.get_element_by_id(id) {
            Some(element) => {
                element.remove();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
