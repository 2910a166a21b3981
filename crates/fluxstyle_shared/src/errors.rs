//! Error results that can be returned from the style sheet layers
use thiserror::Error;

/// Errors raised by the object model and the rule manager.
///
/// Deleting a rule that is already gone is not an error: it is a no-op and never shows up here.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CssomError {
    /// Selector extension was requested on a rule that no longer lives in a sheet
    #[error("cannot extend selector '{selector}': rule is detached from its style sheet")]
    DetachedSelectorExtension { selector: String },

    #[error("rule index {index} is out of range (length {length})")]
    IndexOutOfRange { index: usize, length: usize },

    #[error("syntax error: {0}")]
    Syntax(String),

    /// Failure reported by the host object model (browser exceptions and the like)
    #[error("host error: {0}")]
    Host(String),

    #[error("style sheet '{0}' has been disposed")]
    Disposed(String),

    #[error("declarative sheet error: {0}")]
    Declarative(String),
}

impl CssomError {
    #[must_use]
    pub fn detached(selector: &str) -> Self {
        CssomError::DetachedSelectorExtension {
            selector: selector.to_string(),
        }
    }

    #[must_use]
    pub fn host(message: &str) -> Self {
        CssomError::Host(message.to_string())
    }
}

pub type CssResult<T> = Result<T, CssomError>;
