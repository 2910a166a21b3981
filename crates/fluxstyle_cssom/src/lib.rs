//! CSS object model hosts
//!
//! Two implementations of the `fluxstyle_interface::cssom` traits live here: an in-memory model that
//! behaves like a browser's `CSSStyleSheet` (used on native targets and in tests), and a `web-sys`
//! backed model for `wasm32` builds that talks to the real document.

pub mod declaration;
pub mod memory;
pub mod text;
#[cfg(target_arch = "wasm32")]
pub mod web;
