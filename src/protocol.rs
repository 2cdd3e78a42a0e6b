//! Method bindings for the modelled LSP messages
//!
//! Each method is a zero-sized marker type implementing [`Notification`] or
//! [`Request`], which ties the method name to its params (and result) types.
//! A runtime registry maps method names back to those types so raw params can
//! be checked without knowing the method at compile time.

use serde::Serialize;
use serde_json::Value;

use crate::codec::{self, Wire};
use crate::error::{WireError, WireResult};
use crate::models::diagnostic::PublishDiagnosticsParams;
use crate::models::edit::WorkspaceEdit;
use crate::models::general::{InitializeParams, InitializeResult, InitializedParams, SetTraceParams};
use crate::models::progress::ProgressParams;
use crate::models::window::{
    LogMessageParams, LogTraceParams, MessageActionItem, ShowDocumentParams, ShowDocumentResult,
    ShowMessageParams, ShowMessageRequestParams, WorkDoneProgressCancelParams,
    WorkDoneProgressCreateParams,
};
use crate::models::workspace::{
    ApplyWorkspaceEditParams, ApplyWorkspaceEditResponse, ConfigurationParams, CreateFilesParams,
    DeleteFilesParams, DidChangeConfigurationParams, DidChangeWatchedFilesParams,
    DidChangeWorkspaceFoldersParams, ExecuteCommandParams, RegistrationParams, RenameFilesParams,
    SymbolInformation, UnregistrationParams, WorkspaceSymbolParams,
};

/// Fire-and-forget message.
pub trait Notification {
    type Params: Wire;
    const METHOD: &'static str;
}

/// Message answered with a result.
pub trait Request {
    type Params: Wire;
    type Result: Wire;
    const METHOD: &'static str;
}

macro_rules! notification {
    ($(#[$meta:meta])* $name:ident, $method:literal, $params:ty) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub enum $name {}

        impl Notification for $name {
            type Params = $params;
            const METHOD: &'static str = $method;
        }
    };
}

macro_rules! request {
    ($(#[$meta:meta])* $name:ident, $method:literal, $params:ty, $result:ty) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub enum $name {}

        impl Request for $name {
            type Params = $params;
            type Result = $result;
            const METHOD: &'static str = $method;
        }
    };
}

// ============================================================================
// Lifecycle
// ============================================================================

request!(Initialize, "initialize", InitializeParams, InitializeResult);
notification!(Initialized, "initialized", InitializedParams);
request!(Shutdown, "shutdown", (), ());
notification!(Exit, "exit", ());
notification!(SetTrace, "$/setTrace", SetTraceParams);
notification!(LogTrace, "$/logTrace", LogTraceParams);
request!(RegisterCapability, "client/registerCapability", RegistrationParams, ());
request!(UnregisterCapability, "client/unregisterCapability", UnregistrationParams, ());

// ============================================================================
// Diagnostics & Window
// ============================================================================

notification!(PublishDiagnostics, "textDocument/publishDiagnostics", PublishDiagnosticsParams);
notification!(ShowMessage, "window/showMessage", ShowMessageParams);
request!(
    /// Resolves to the chosen action, or `null` when dismissed.
    ShowMessageRequest,
    "window/showMessageRequest",
    ShowMessageRequestParams,
    Option<MessageActionItem>
);
notification!(LogMessage, "window/logMessage", LogMessageParams);
request!(ShowDocument, "window/showDocument", ShowDocumentParams, ShowDocumentResult);

// ============================================================================
// Progress
// ============================================================================

notification!(Progress, "$/progress", ProgressParams);
request!(
    WorkDoneProgressCreate,
    "window/workDoneProgress/create",
    WorkDoneProgressCreateParams,
    ()
);
notification!(
    WorkDoneProgressCancel,
    "window/workDoneProgress/cancel",
    WorkDoneProgressCancelParams
);

// ============================================================================
// Workspace
// ============================================================================

notification!(
    DidChangeWorkspaceFolders,
    "workspace/didChangeWorkspaceFolders",
    DidChangeWorkspaceFoldersParams
);
notification!(
    DidChangeConfiguration,
    "workspace/didChangeConfiguration",
    DidChangeConfigurationParams
);
request!(
    /// One result entry per requested item, in order.
    WorkspaceConfiguration,
    "workspace/configuration",
    ConfigurationParams,
    Vec<Value>
);
notification!(
    DidChangeWatchedFiles,
    "workspace/didChangeWatchedFiles",
    DidChangeWatchedFilesParams
);
request!(
    WorkspaceSymbol,
    "workspace/symbol",
    WorkspaceSymbolParams,
    Option<Vec<SymbolInformation>>
);
request!(
    ExecuteCommand,
    "workspace/executeCommand",
    ExecuteCommandParams,
    Option<Value>
);
request!(
    ApplyWorkspaceEdit,
    "workspace/applyEdit",
    ApplyWorkspaceEditParams,
    ApplyWorkspaceEditResponse
);
request!(WillCreateFiles, "workspace/willCreateFiles", CreateFilesParams, Option<WorkspaceEdit>);
notification!(DidCreateFiles, "workspace/didCreateFiles", CreateFilesParams);
request!(WillRenameFiles, "workspace/willRenameFiles", RenameFilesParams, Option<WorkspaceEdit>);
notification!(DidRenameFiles, "workspace/didRenameFiles", RenameFilesParams);
request!(WillDeleteFiles, "workspace/willDeleteFiles", DeleteFilesParams, Option<WorkspaceEdit>);
notification!(DidDeleteFiles, "workspace/didDeleteFiles", DeleteFilesParams);

// ============================================================================
// Registry
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Request,
    Notification,
}

/// Which peer sends the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    ClientToServer,
    ServerToClient,
    Both,
}

type Roundtrip = fn(Value) -> WireResult<Value>;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MethodInfo {
    pub method: &'static str,
    pub kind: MessageKind,
    pub direction: Direction,
    #[serde(skip)]
    roundtrip: Roundtrip,
}

impl MethodInfo {
    /// Decode `params` with the method's params type and encode it again.
    pub fn roundtrip(&self, params: Value) -> WireResult<Value> {
        (self.roundtrip)(params)
    }
}

fn roundtrip<P: Wire>(params: Value) -> WireResult<Value> {
    let decoded: P = codec::decode_value(params)?;
    codec::encode_value(&decoded)
}

macro_rules! entry {
    (notification $name:ident, $direction:ident) => {
        MethodInfo {
            method: <$name as Notification>::METHOD,
            kind: MessageKind::Notification,
            direction: Direction::$direction,
            roundtrip: roundtrip::<<$name as Notification>::Params>,
        }
    };
    (request $name:ident, $direction:ident) => {
        MethodInfo {
            method: <$name as Request>::METHOD,
            kind: MessageKind::Request,
            direction: Direction::$direction,
            roundtrip: roundtrip::<<$name as Request>::Params>,
        }
    };
}

static METHODS: &[MethodInfo] = &[
    entry!(request Initialize, ClientToServer),
    entry!(notification Initialized, ClientToServer),
    entry!(request Shutdown, ClientToServer),
    entry!(notification Exit, ClientToServer),
    entry!(notification SetTrace, ClientToServer),
    entry!(notification LogTrace, ServerToClient),
    entry!(request RegisterCapability, ServerToClient),
    entry!(request UnregisterCapability, ServerToClient),
    entry!(notification PublishDiagnostics, ServerToClient),
    entry!(notification ShowMessage, ServerToClient),
    entry!(request ShowMessageRequest, ServerToClient),
    entry!(notification LogMessage, ServerToClient),
    entry!(request ShowDocument, ServerToClient),
    entry!(notification Progress, Both),
    entry!(request WorkDoneProgressCreate, ServerToClient),
    entry!(notification WorkDoneProgressCancel, ClientToServer),
    entry!(notification DidChangeWorkspaceFolders, ClientToServer),
    entry!(notification DidChangeConfiguration, ClientToServer),
    entry!(request WorkspaceConfiguration, ServerToClient),
    entry!(notification DidChangeWatchedFiles, ClientToServer),
    entry!(request WorkspaceSymbol, ClientToServer),
    entry!(request ExecuteCommand, ClientToServer),
    entry!(request ApplyWorkspaceEdit, ServerToClient),
    entry!(request WillCreateFiles, ClientToServer),
    entry!(notification DidCreateFiles, ClientToServer),
    entry!(request WillRenameFiles, ClientToServer),
    entry!(notification DidRenameFiles, ClientToServer),
    entry!(request WillDeleteFiles, ClientToServer),
    entry!(notification DidDeleteFiles, ClientToServer),
];

/// Every registered method, grouped by component.
pub fn all_methods() -> &'static [MethodInfo] {
    METHODS
}

pub fn lookup(method: &str) -> Option<MethodInfo> {
    METHODS.iter().find(|info| info.method == method).copied()
}

/// Decode `params` as the params type of `method` and re-encode them.
pub fn roundtrip_params(method: &str, params: Value) -> WireResult<Value> {
    let info = lookup(method).ok_or_else(|| WireError::UnknownMethod(method.to_string()))?;
    tracing::debug!("Round-tripping params of {}", info.method);
    info.roundtrip(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::error_codes;
    use crate::models::progress::ProgressToken;
    use serde_json::json;
    use std::collections::HashSet;

    fn method_of<N: Notification>() -> &'static str {
        N::METHOD
    }

    #[test]
    fn test_marker_methods() {
        assert_eq!(method_of::<PublishDiagnostics>(), "textDocument/publishDiagnostics");
        assert_eq!(method_of::<Progress>(), "$/progress");
        assert_eq!(<WorkspaceSymbol as Request>::METHOD, "workspace/symbol");
    }

    #[test]
    fn test_methods_unique() {
        let names: HashSet<&str> = all_methods().iter().map(|m| m.method).collect();
        assert_eq!(names.len(), all_methods().len());
    }

    #[test]
    fn test_lookup() {
        let info = lookup("workspace/applyEdit").unwrap();
        assert_eq!(info.kind, MessageKind::Request);
        assert_eq!(info.direction, Direction::ServerToClient);
        assert!(lookup("textDocument/hover").is_none());
    }

    #[test]
    fn test_roundtrip_unknown_method() {
        let err = roundtrip_params("textDocument/hover", json!({})).unwrap_err();
        assert!(matches!(err, WireError::UnknownMethod(_)));
        assert_eq!(err.error_code(), error_codes::METHOD_NOT_FOUND);
    }

    #[test]
    fn test_roundtrip_normalizes() {
        let out = roundtrip_params(
            "textDocument/publishDiagnostics",
            json!({
                "uri": "file:///a.go",
                "diagnostics": [{
                    "range": {"start": {"line": 0.0, "character": 0}, "end": {"line": 0, "character": 5}},
                    "severity": 1,
                    "message": "unused import",
                    "vendorField": true
                }]
            }),
        )
        .unwrap();
        assert_eq!(
            out,
            json!({
                "uri": "file:///a.go",
                "diagnostics": [{
                    "range": {"start": {"line": 0, "character": 0}, "end": {"line": 0, "character": 5}},
                    "severity": 1,
                    "message": "unused import"
                }]
            })
        );
    }

    #[test]
    fn test_roundtrip_decode_error() {
        let err = roundtrip_params("window/showMessage", json!({"type": "loud", "message": "x"}))
            .unwrap_err();
        assert_eq!(err.path(), Some("/type"));
        assert_eq!(err.error_code(), error_codes::INVALID_PARAMS);
    }

    #[test]
    fn test_roundtrip_unit_params() {
        assert_eq!(roundtrip_params("shutdown", Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_progress_params_keep_token_type() {
        let out = roundtrip_params(
            "$/progress",
            json!({"token": 1569, "value": {"kind": "end"}}),
        )
        .unwrap();
        assert_eq!(out["token"], json!(1569));

        let params: <Progress as Notification>::Params = codec::decode_value(out).unwrap();
        assert_eq!(params.token, ProgressToken::number(1569));
    }
}
