use fluxstyle_config::config_store;
use fluxstyle_cssom::web::{WebCssom, WebDocument};
use fluxstyle_rules::declarative::apply_str;
use fluxstyle_rules::{ManagerConfig, StyleSheetRegistry};
use fluxstyle_shared::errors::CssResult;
use log::info;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;

thread_local! {
    static REGISTRY: RefCell<Option<StyleSheetRegistry<WebCssom>>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_ok() {
        info!("Initialized");
    }
}

fn to_js(err: impl ToString) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Runs `f` against the registry of the current document, creating the registry on first use
fn with_registry<T>(f: impl FnOnce(&mut StyleSheetRegistry<WebCssom>) -> CssResult<T>) -> Result<T, JsValue> {
    REGISTRY.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            let document = WebDocument::current().map_err(to_js)?;
            let config = ManagerConfig::from_store(&config_store());
            *slot = Some(StyleSheetRegistry::new(document, config));
        }

        let Some(registry) = slot.as_mut() else {
            return Err(JsValue::from_str("style registry is not available"));
        };
        f(registry).map_err(to_js)
    })
}

/// Applies a declarative style description (see `fluxstyle_rules::declarative`) to the style element
/// with the given id, or to the default one.
#[wasm_bindgen(js_name = applyStyles)]
pub fn apply_styles(sheet_id: Option<String>, json: &str) -> Result<(), JsValue> {
    with_registry(|registry| {
        let manager = match sheet_id.as_deref() {
            Some(id) => registry.get_or_create(id)?,
            None => registry.default_manager()?,
        };
        apply_str(&manager, json)
    })
}

/// Removes the style element with the given id together with all its rules
#[wasm_bindgen(js_name = disposeStyles)]
pub fn dispose_styles(sheet_id: &str) -> Result<bool, JsValue> {
    with_registry(|registry| registry.dispose(sheet_id))
}

#[wasm_bindgen(js_name = resetStyles)]
pub fn reset_styles() -> Result<(), JsValue> {
    with_registry(StyleSheetRegistry::reset)
}
