//! Lifecycle messages: initialize handshake, capabilities and tracing

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::basic::{DocumentUri, Integer, Uri};
use super::edit::{FailureHandlingKind, ResourceOperationKind};
use super::macros::string_enum;
use super::progress::{ProgressToken, WorkDoneProgressOptions};
use super::serde_util;
use super::workspace::{ExecuteCommandOptions, WorkspaceFolder};

string_enum! {
    /// Verbosity of `$/logTrace` notifications.
    pub struct TraceValue {
        OFF = "off",
        MESSAGES = "messages",
        VERBOSE = "verbose",
    }
}

/// Either of two shapes, tried in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOf<A, B> {
    Left(A),
    Right(B),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

// ============================================================================
// Initialize
// ============================================================================

/// Params of `initialize`.
///
/// `processId` and `rootUri` must be present but may be `null`. `rootPath`
/// and `workspaceFolders` keep absent and `null` apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_done_token: Option<ProgressToken>,

    #[serde(deserialize_with = "serde_util::opt_integer")]
    pub process_id: Option<Integer>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_info: Option<ClientInfo>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    /// Deprecated in favour of `rootUri`
    #[serde(
        default,
        deserialize_with = "serde_util::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub root_path: Option<Option<String>>,

    #[serde(deserialize_with = "serde_util::required_nullable")]
    pub root_uri: Option<DocumentUri>,

    #[serde(
        default,
        deserialize_with = "serde_util::opaque",
        skip_serializing_if = "Option::is_none"
    )]
    pub initialization_options: Option<Value>,

    pub capabilities: ClientCapabilities,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<TraceValue>,

    /// `Some(None)` means the client supports folders but none are open
    #[serde(
        default,
        deserialize_with = "serde_util::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub workspace_folders: Option<Option<Vec<WorkspaceFolder>>>,
}

impl InitializeParams {
    pub fn new(process_id: Option<Integer>, root_uri: Option<DocumentUri>) -> Self {
        Self {
            work_done_token: None,
            process_id,
            client_info: None,
            locale: None,
            root_path: None,
            root_uri,
            initialization_options: None,
            capabilities: ClientCapabilities::default(),
            trace: None,
            workspace_folders: None,
        }
    }

    /// Workspace roots, preferring `workspaceFolders` over `rootUri`.
    pub fn workspace_roots(&self) -> Vec<Uri> {
        match &self.workspace_folders {
            Some(Some(folders)) if !folders.is_empty() => {
                folders.iter().map(|f| f.uri.clone()).collect()
            }
            _ => self.root_uri.iter().cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub capabilities: ServerCapabilities,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_info: Option<ServerInfo>,
}

/// Params of `initialized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InitializedParams {}

/// Params of `$/setTrace`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetTraceParams {
    pub value: TraceValue,
}

// ============================================================================
// Client Capabilities
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicRegistrationCapability {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_registration: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceEditClientCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_changes: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_operations: Option<Vec<ResourceOperationKind>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_handling: Option<FailureHandlingKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalizes_line_endings: Option<bool>,
    #[serde(
        default,
        deserialize_with = "serde_util::opaque",
        skip_serializing_if = "Option::is_none"
    )]
    pub change_annotation_support: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidChangeWatchedFilesClientCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_registration: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_pattern_support: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceClientCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply_edit: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_edit: Option<WorkspaceEditClientCapabilities>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub did_change_configuration: Option<DynamicRegistrationCapability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub did_change_watched_files: Option<DidChangeWatchedFilesClientCapabilities>,
    #[serde(
        default,
        deserialize_with = "serde_util::opaque",
        skip_serializing_if = "Option::is_none"
    )]
    pub symbol: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execute_command: Option<DynamicRegistrationCapability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_folders: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<bool>,
    #[serde(
        default,
        deserialize_with = "serde_util::opaque",
        skip_serializing_if = "Option::is_none"
    )]
    pub file_operations: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageActionItemCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties_support: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowMessageRequestClientCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_action_item: Option<MessageActionItemCapabilities>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShowDocumentClientCapabilities {
    pub support: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowClientCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_done_progress: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_message: Option<ShowMessageRequestClientCapabilities>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_document: Option<ShowDocumentClientCapabilities>,
}

/// Client capabilities. Sections outside workspace and window are kept as
/// raw JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<WorkspaceClientCapabilities>,
    #[serde(
        default,
        deserialize_with = "serde_util::opaque",
        skip_serializing_if = "Option::is_none"
    )]
    pub text_document: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<WindowClientCapabilities>,
    #[serde(
        default,
        deserialize_with = "serde_util::opaque",
        skip_serializing_if = "Option::is_none"
    )]
    pub general: Option<Value>,
    #[serde(
        default,
        deserialize_with = "serde_util::opaque",
        skip_serializing_if = "Option::is_none"
    )]
    pub experimental: Option<Value>,
}

impl ClientCapabilities {
    fn workspace_edit(&self) -> Option<&WorkspaceEditClientCapabilities> {
        self.workspace.as_ref()?.workspace_edit.as_ref()
    }

    pub fn supports_apply_edit(&self) -> bool {
        self.workspace
            .as_ref()
            .and_then(|w| w.apply_edit)
            .unwrap_or(false)
    }

    /// Whether a server may send `documentChanges` instead of `changes`.
    pub fn supports_document_changes(&self) -> bool {
        self.workspace_edit()
            .and_then(|e| e.document_changes)
            .unwrap_or(false)
    }

    pub fn supports_resource_operation(&self, kind: &ResourceOperationKind) -> bool {
        self.workspace_edit()
            .and_then(|e| e.resource_operations.as_ref())
            .is_some_and(|ops| ops.contains(kind))
    }

    pub fn supports_work_done_progress(&self) -> bool {
        self.window
            .and_then(|w| w.work_done_progress)
            .unwrap_or(false)
    }

    pub fn supports_show_document(&self) -> bool {
        self.window
            .and_then(|w| w.show_document)
            .is_some_and(|s| s.support)
    }

    pub fn supports_workspace_folders(&self) -> bool {
        self.workspace
            .as_ref()
            .and_then(|w| w.workspace_folders)
            .unwrap_or(false)
    }
}

// ============================================================================
// Server Capabilities
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceFoldersServerCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported: Option<bool>,
    /// Registration id string, or `true` for static registration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_notifications: Option<OneOf<String, bool>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceServerCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_folders: Option<WorkspaceFoldersServerCapabilities>,
    #[serde(
        default,
        deserialize_with = "serde_util::opaque",
        skip_serializing_if = "Option::is_none"
    )]
    pub file_operations: Option<Value>,
}

/// Server capabilities. Providers outside the workspace surface are kept
/// verbatim in `other`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_symbol_provider: Option<OneOf<bool, WorkDoneProgressOptions>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execute_command_provider: Option<ExecuteCommandOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<WorkspaceServerCapabilities>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experimental: Option<Value>,
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

impl ServerCapabilities {
    pub fn has_workspace_symbol(&self) -> bool {
        match &self.workspace_symbol_provider {
            Some(OneOf::Left(enabled)) => *enabled,
            Some(OneOf::Right(_)) => true,
            None => false,
        }
    }
}

// Decoded key by key instead of through `#[serde(flatten)]`, which buffers the
// whole object and loses the position of a bad field.
struct ServerCapabilitiesVisitor;

impl<'de> Visitor<'de> for ServerCapabilitiesVisitor {
    type Value = ServerCapabilities;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("server capabilities")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut caps = ServerCapabilities::default();
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "positionEncoding" => caps.position_encoding = map.next_value()?,
                "workspaceSymbolProvider" => caps.workspace_symbol_provider = map.next_value()?,
                "executeCommandProvider" => caps.execute_command_provider = map.next_value()?,
                "workspace" => caps.workspace = map.next_value()?,
                "experimental" => caps.experimental = Some(map.next_value()?),
                _ => {
                    let value = map.next_value()?;
                    caps.other.insert(key, value);
                }
            }
        }
        Ok(caps)
    }
}

impl<'de> Deserialize<'de> for ServerCapabilities {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ServerCapabilitiesVisitor)
    }
}
