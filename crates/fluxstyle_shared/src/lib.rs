//! Shared functionality
//!
//! This crate supplies the error and result types used by all fluxstyle crates.
//!

pub mod errors;
pub mod types;
