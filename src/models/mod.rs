//! LSP data model
//!
//! One module per component group. Every type here encodes to and decodes
//! from the exact JSON shape peers exchange.

mod macros;
pub mod serde_util;

pub mod basic;
pub mod diagnostic;
pub mod edit;
pub mod general;
pub mod language;
pub mod progress;
pub mod window;
pub mod workspace;

// Re-export commonly used types
pub use basic::{
    Command, DocumentUri, Location, LocationLink, MarkupContent, MarkupKind, Position, Range,
    TextDocumentIdentifier, TextDocumentItem, TextDocumentPositionParams, Uri,
    VersionedTextDocumentIdentifier,
};
pub use diagnostic::{
    Diagnostic, DiagnosticCode, DiagnosticSeverity, DiagnosticTag, PublishDiagnosticsParams,
};
pub use edit::{DocumentChange, EditPlan, ResourceOp, TextDocumentEdit, TextEdit, WorkspaceEdit};
pub use general::{ClientCapabilities, InitializeParams, InitializeResult, ServerCapabilities};
pub use language::LanguageIdentifier;
pub use progress::{
    PartialResultParams, ProgressParams, ProgressToken, ProgressTracker, WorkDoneProgress,
    WorkDoneProgressParams,
};
pub use window::{LogMessageParams, MessageType, ShowMessageParams, ShowMessageRequestParams};
pub use workspace::{
    ApplyWorkspaceEditParams, ApplyWorkspaceEditResponse, FileChangeType, FileEvent,
    FileSystemWatcher, WatchKind, WorkspaceFolder, WorkspaceSymbolParams,
};
