//! Workspace synchronization: folders, configuration, watched files,
//! symbols, commands, edits and dynamic registration

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::basic::{Location, UInteger, Uri};
use super::edit::WorkspaceEdit;
use super::macros::int_enum;
use super::progress::ProgressToken;
use super::serde_util;
use crate::codec;
use crate::error::WireResult;

// ============================================================================
// Workspace Folders
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkspaceFolder {
    pub uri: Uri,
    /// Name used to refer to the folder in the user interface
    pub name: String,
}

impl WorkspaceFolder {
    pub fn new(uri: impl Into<Uri>, name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkspaceFoldersChangeEvent {
    pub added: Vec<WorkspaceFolder>,
    pub removed: Vec<WorkspaceFolder>,
}

impl WorkspaceFoldersChangeEvent {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Params of `workspace/didChangeWorkspaceFolders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DidChangeWorkspaceFoldersParams {
    pub event: WorkspaceFoldersChangeEvent,
}

// ============================================================================
// Configuration
// ============================================================================

/// Params of `workspace/didChangeConfiguration`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DidChangeConfigurationParams {
    pub settings: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_uri: Option<Uri>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

impl ConfigurationItem {
    pub fn section(section: impl Into<String>) -> Self {
        Self {
            scope_uri: None,
            section: Some(section.into()),
        }
    }
}

/// Params of `workspace/configuration`; the response holds one value per item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationParams {
    pub items: Vec<ConfigurationItem>,
}

// ============================================================================
// Watched Files
// ============================================================================

int_enum! {
    pub struct FileChangeType(i32) {
        CREATED = 1 => "created",
        CHANGED = 2 => "changed",
        DELETED = 3 => "deleted",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEvent {
    pub uri: Uri,
    #[serde(rename = "type")]
    pub typ: FileChangeType,
}

impl FileEvent {
    pub fn new(uri: impl Into<Uri>, typ: FileChangeType) -> Self {
        Self {
            uri: uri.into(),
            typ,
        }
    }
}

/// Params of `workspace/didChangeWatchedFiles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DidChangeWatchedFilesParams {
    pub changes: Vec<FileEvent>,
}

bitflags::bitflags! {
    /// Events a file system watcher is interested in.
    ///
    /// Bits outside the named set are retained so they survive a round trip.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WatchKind: u32 {
        const CREATE = 1;
        const CHANGE = 2;
        const DELETE = 4;
    }
}

impl Serialize for WatchKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for WatchKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_util::uinteger(deserializer).map(Self::from_bits_retain)
    }
}

impl fmt::Display for WatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let mut parts: Vec<String> = self
            .iter_names()
            .map(|(name, _)| name.to_ascii_lowercase())
            .collect();
        let unknown = self.bits() & !Self::all().bits();
        if unknown != 0 {
            parts.push(format!("{:#x}", unknown));
        }
        f.write_str(&parts.join("|"))
    }
}

/// Base of a [`RelativePattern`]: a workspace folder or a plain URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BaseUri {
    Folder(WorkspaceFolder),
    Uri(Uri),
}

/// Glob resolved against a base location rather than the workspace root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelativePattern {
    pub base_uri: BaseUri,
    pub pattern: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GlobPattern {
    String(String),
    Relative(RelativePattern),
}

impl From<&str> for GlobPattern {
    fn from(pattern: &str) -> Self {
        Self::String(pattern.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSystemWatcher {
    pub glob_pattern: GlobPattern,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<WatchKind>,
}

impl FileSystemWatcher {
    pub fn new(glob_pattern: impl Into<GlobPattern>) -> Self {
        Self {
            glob_pattern: glob_pattern.into(),
            kind: None,
        }
    }

    /// Absent kind watches create, change and delete.
    pub fn effective_kind(&self) -> WatchKind {
        self.kind.unwrap_or_else(WatchKind::all)
    }

    pub fn watches(&self, typ: FileChangeType) -> bool {
        let kind = self.effective_kind();
        match typ {
            FileChangeType::CREATED => kind.contains(WatchKind::CREATE),
            FileChangeType::CHANGED => kind.contains(WatchKind::CHANGE),
            FileChangeType::DELETED => kind.contains(WatchKind::DELETE),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DidChangeWatchedFilesRegistrationOptions {
    pub watchers: Vec<FileSystemWatcher>,
}

// ============================================================================
// Workspace Symbols
// ============================================================================

int_enum! {
    /// Symbol classification as reported by servers.
    pub struct SymbolKind(i32) {
        FILE = 1 => "file",
        MODULE = 2 => "module",
        NAMESPACE = 3 => "namespace",
        PACKAGE = 4 => "package",
        CLASS = 5 => "class",
        METHOD = 6 => "method",
        PROPERTY = 7 => "property",
        FIELD = 8 => "field",
        CONSTRUCTOR = 9 => "constructor",
        ENUM = 10 => "enum",
        INTERFACE = 11 => "interface",
        FUNCTION = 12 => "function",
        VARIABLE = 13 => "variable",
        CONSTANT = 14 => "constant",
        STRING = 15 => "string",
        NUMBER = 16 => "number",
        BOOLEAN = 17 => "boolean",
        ARRAY = 18 => "array",
        OBJECT = 19 => "object",
        KEY = 20 => "key",
        NULL = 21 => "null",
        ENUM_MEMBER = 22 => "enum_member",
        STRUCT = 23 => "struct",
        EVENT = 24 => "event",
        OPERATOR = 25 => "operator",
        TYPE_PARAMETER = 26 => "type_parameter",
    }
}

impl SymbolKind {
    /// Check if this is a type definition
    pub fn is_type(self) -> bool {
        matches!(
            self,
            Self::CLASS | Self::INTERFACE | Self::STRUCT | Self::ENUM | Self::TYPE_PARAMETER
        )
    }

    pub fn is_callable(self) -> bool {
        matches!(self, Self::FUNCTION | Self::METHOD | Self::CONSTRUCTOR)
    }
}

int_enum! {
    pub struct SymbolTag(i32) {
        DEPRECATED = 1 => "deprecated",
    }
}

/// Params of `workspace/symbol`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSymbolParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_done_token: Option<ProgressToken>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial_result_token: Option<ProgressToken>,
    /// Empty string requests all symbols
    pub query: String,
}

impl WorkspaceSymbolParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInformation {
    pub name: String,
    pub kind: SymbolKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<SymbolTag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_name: Option<String>,
}

// ============================================================================
// Commands
// ============================================================================

/// Params of `workspace/executeCommand`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteCommandParams {
    pub command: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_done_token: Option<ProgressToken>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteCommandOptions {
    pub commands: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_done_progress: Option<bool>,
}

// ============================================================================
// Apply Edit
// ============================================================================

/// Params of `workspace/applyEdit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyWorkspaceEditParams {
    /// Shown in the user interface, e.g. on an undo stack
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub edit: WorkspaceEdit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyWorkspaceEditResponse {
    pub applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    /// Index into `documentChanges` of the first change that failed
    #[serde(
        default,
        deserialize_with = "serde_util::opt_uinteger",
        skip_serializing_if = "Option::is_none"
    )]
    pub failed_change: Option<UInteger>,
}

impl ApplyWorkspaceEditResponse {
    pub fn applied() -> Self {
        Self {
            applied: true,
            failure_reason: None,
            failed_change: None,
        }
    }

    pub fn failed(reason: impl Into<String>, failed_change: Option<UInteger>) -> Self {
        Self {
            applied: false,
            failure_reason: Some(reason.into()),
            failed_change,
        }
    }
}

// ============================================================================
// File Operations
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCreate {
    pub uri: String,
}

/// Params of `workspace/willCreateFiles` and `workspace/didCreateFiles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateFilesParams {
    pub files: Vec<FileCreate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRename {
    pub old_uri: String,
    pub new_uri: String,
}

/// Params of `workspace/willRenameFiles` and `workspace/didRenameFiles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameFilesParams {
    pub files: Vec<FileRename>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDelete {
    pub uri: String,
}

/// Params of `workspace/willDeleteFiles` and `workspace/didDeleteFiles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteFilesParams {
    pub files: Vec<FileDelete>,
}

// ============================================================================
// Dynamic Registration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Used to unregister the request again
    pub id: String,
    pub method: String,
    #[serde(
        default,
        deserialize_with = "serde_util::opaque",
        skip_serializing_if = "Option::is_none"
    )]
    pub register_options: Option<Value>,
}

impl Registration {
    pub fn new(id: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            method: method.into(),
            register_options: None,
        }
    }

    pub fn with_options<T: Serialize>(mut self, options: &T) -> WireResult<Self> {
        self.register_options = Some(codec::encode_value(options)?);
        Ok(self)
    }

    /// Decode `registerOptions` into the type the method expects.
    pub fn options<T: DeserializeOwned>(&self) -> WireResult<Option<T>> {
        self.register_options
            .clone()
            .map(codec::decode_value)
            .transpose()
    }
}

/// Params of `client/registerCapability`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationParams {
    pub registrations: Vec<Registration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unregistration {
    pub id: String,
    pub method: String,
}

/// Params of `client/unregisterCapability`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnregistrationParams {
    /// The protocol spells this key `unregisterations`.
    #[serde(rename = "unregisterations")]
    pub unregistrations: Vec<Unregistration>,
}
