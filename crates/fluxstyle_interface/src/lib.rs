//! Interfaces between the rule manager and the object model of its host.
//!
//! Any host that can hand out a style sheet with an index-addressable, live list of rules
//! (a browser through `web-sys`, or the in-memory model in `fluxstyle_cssom`) implements
//! the traits in [`cssom`].

pub mod cssom;
