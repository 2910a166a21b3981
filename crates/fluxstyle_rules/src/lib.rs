//! Dynamic style sheet rules
//!
//! Lets call sites attach styles to selectors (and to selectors inside `@media` blocks) without
//! writing style sheets: rules are inserted into a native style sheet on first use and reused after
//! that.
//!
//! ```ignore
//! let mut registry = StyleSheetRegistry::<MemoryCssom>::new(MemoryDocument::new(), ManagerConfig::default());
//! let manager = registry.default_manager()?;
//!
//! let button = manager.get_or_insert_rule(".btn")?;
//! button.set_declaration("backgroundColor", "blue")?;
//! button.hover()?.set_declaration("backgroundColor", "navy")?;
//!
//! let narrow = manager.get_or_insert_media_block("(max-width: 600px)")?;
//! narrow.get_or_insert_rule(".btn")?.set_declaration("width", "100%")?;
//! ```

pub mod config;
pub mod declarative;
pub mod handle;
pub mod manager;
pub mod property;
pub mod registry;

pub use config::ManagerConfig;
pub use handle::{MediaBlockHandle, RuleHandle};
pub use manager::{RuleScope, StyleSheetManager};
pub use property::StyleValue;
pub use registry::StyleSheetRegistry;
