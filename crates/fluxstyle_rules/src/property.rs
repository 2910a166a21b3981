//! Property name and value normalization for declarations.
//!
//! Call sites use the platform naming (`backgroundColor`, `WebkitTransform`) and plain numbers for
//! lengths. The declaration block wants css names (`background-color`, `-webkit-transform`) and
//! values with units.
use fluxstyle_shared::errors::{CssResult, CssomError};
use std::fmt::{Display, Formatter};

/// Vendor prefixes that lose their leading dash in camelCase naming
const VENDOR_PREFIXES: [&str; 4] = ["webkit", "moz", "ms", "o"];

/// Value of a declaration
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    /// Used as-is
    Text(String),
    /// Gets the length unit appended, unless the property is unitless
    Number(f64),
    /// Removes the property from the declaration block
    Unset,
}

impl StyleValue {
    /// Renders the value for the given (css form) property. Returns `None` for `Unset`.
    pub fn to_css(&self, property: &str, unit: &str) -> CssResult<Option<String>> {
        match self {
            StyleValue::Unset => Ok(None),
            StyleValue::Text(text) => Ok(Some(text.clone())),
            StyleValue::Number(number) if !number.is_finite() => Err(CssomError::Syntax(format!(
                "cannot use {number} as value for {property}"
            ))),
            StyleValue::Number(number) if is_unitless(property) => Ok(Some(number.to_string())),
            StyleValue::Number(number) => Ok(Some(format!("{number}{unit}"))),
        }
    }
}

impl Display for StyleValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StyleValue::Text(text) => write!(f, "{text}"),
            StyleValue::Number(number) => write!(f, "{number}"),
            StyleValue::Unset => write!(f, "<unset>"),
        }
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Text(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        StyleValue::Text(value)
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        StyleValue::Number(value)
    }
}

impl From<f32> for StyleValue {
    fn from(value: f32) -> Self {
        StyleValue::Number(f64::from(value))
    }
}

impl From<i32> for StyleValue {
    fn from(value: i32) -> Self {
        StyleValue::Number(f64::from(value))
    }
}

impl From<u32> for StyleValue {
    fn from(value: u32) -> Self {
        StyleValue::Number(f64::from(value))
    }
}

impl<T: Into<StyleValue>> From<Option<T>> for StyleValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(StyleValue::Unset, Into::into)
    }
}

/// Converts a property name to its css form.
///
/// - `backgroundColor` becomes `background-color`
/// - `WebkitTransform` and `webkitTransform` become `-webkit-transform`
/// - `msTransform` becomes `-ms-transform`
/// - `cssFloat` becomes `float`
/// - names already in css form and custom properties (`--gap`) are returned unchanged
pub fn css_property_name(name: &str) -> String {
    if name == "cssFloat" {
        return "float".to_string();
    }
    if name.starts_with("--") || !name.chars().any(|c| c.is_ascii_uppercase()) {
        return name.to_string();
    }

    let mut out = String::with_capacity(name.len() + 4);
    if has_vendor_prefix(name) {
        out.push('-');
    }

    for (index, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if index > 0 {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}

/// `msTransform`, `WebkitTransform`: a vendor prefix in either case directly followed by an uppercase
/// letter
fn has_vendor_prefix(name: &str) -> bool {
    VENDOR_PREFIXES.iter().any(|prefix| {
        name.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
            && name[prefix.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_uppercase())
    })
}

/// Strips `-webkit-`, `-moz-`, `-ms-` and `-o-`
fn unprefixed(property: &str) -> &str {
    VENDOR_PREFIXES
        .iter()
        .find_map(|prefix| {
            property
                .strip_prefix('-')
                .and_then(|rest| rest.strip_prefix(prefix))
                .and_then(|rest| rest.strip_prefix('-'))
        })
        .unwrap_or(property)
}

/// Returns true for (css form) properties whose numeric values carry no unit. Custom properties are
/// treated as unitless as well.
pub fn is_unitless(property: &str) -> bool {
    if property.starts_with("--") {
        return true;
    }

    matches!(
        unprefixed(property),
        "animation-iteration-count"
            | "aspect-ratio"
            | "border-image-outset"
            | "border-image-slice"
            | "border-image-width"
            | "box-flex"
            | "box-flex-group"
            | "box-ordinal-group"
            | "column-count"
            | "columns"
            | "fill-opacity"
            | "flex"
            | "flex-grow"
            | "flex-negative"
            | "flex-order"
            | "flex-positive"
            | "flex-shrink"
            | "flood-opacity"
            | "font-weight"
            | "grid-area"
            | "grid-column"
            | "grid-column-end"
            | "grid-column-span"
            | "grid-column-start"
            | "grid-row"
            | "grid-row-end"
            | "grid-row-span"
            | "grid-row-start"
            | "initial-letter"
            | "line-clamp"
            | "line-height"
            | "opacity"
            | "order"
            | "orphans"
            | "scale"
            | "stop-opacity"
            | "stroke-dasharray"
            | "stroke-dashoffset"
            | "stroke-miterlimit"
            | "stroke-opacity"
            | "stroke-width"
            | "tab-size"
            | "widows"
            | "z-index"
            | "zoom"
    )
}
