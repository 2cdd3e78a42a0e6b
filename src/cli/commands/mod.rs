//! Command implementations for lsp-wire
//!
//! Each command is implemented in its own module.

pub mod check;
pub mod config;
pub mod language;
pub mod methods;
