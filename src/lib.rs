//! lsp-wire - Language Server Protocol wire-format data model
//!
//! Typed, lossless representations of LSP message payloads: positions and
//! ranges, text and workspace edits, diagnostics, window messages, progress
//! tokens and workspace synchronization. Every type decodes from and encodes
//! to the exact JSON shape peers exchange (see [`codec`]), and [`protocol`]
//! binds method names to their payload types.

pub mod app;
pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod models;
pub mod protocol;

pub use codec::{Wire, decode, encode};
pub use error::{WireError, WireResult};
