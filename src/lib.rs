//! Fluxstyle: rules in a live style sheet, managed by selector.
//!
//! The work is done by the crates in `crates/`; this crate bundles them, hosts the command line tools in
//! `src/bin` and, on wasm32, the browser entry points.

pub use fluxstyle_config as config;
pub use fluxstyle_cssom as cssom;
pub use fluxstyle_interface as interface;
pub use fluxstyle_rules as rules;
pub use fluxstyle_shared as shared;

#[cfg(target_arch = "wasm32")]
pub mod wasm;
