//! Basic protocol structures
//!
//! Positions, ranges, locations and document identifiers shared by every
//! other part of the model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::language::LanguageIdentifier;
use super::macros::string_enum;
use super::serde_util;

/// A URI identifying a text document (transmitted as a string).
pub type DocumentUri = String;

/// A URI that is not necessarily a document.
pub type Uri = String;

/// LSP `integer`.
pub type Integer = i32;

/// LSP `uinteger`.
pub type UInteger = u32;

// ============================================================================
// Positions and Ranges
// ============================================================================

/// Position within a document (0-indexed)
///
/// `character` is not clamped to the line length here; consumers do that
/// against their own view of the document.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    #[serde(deserialize_with = "serde_util::uinteger")]
    pub line: UInteger,
    #[serde(deserialize_with = "serde_util::uinteger")]
    pub character: UInteger,
}

impl Position {
    pub const fn new(line: UInteger, character: UInteger) -> Self {
        Self { line, character }
    }
}

/// Half-open range within a document: `end` is exclusive.
///
/// `start <= end` is expected but not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Zero-width range at `pos`
    pub const fn point(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.start <= pos && pos < self.end
    }

    pub fn contains_range(&self, other: &Range) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

// ============================================================================
// Locations
// ============================================================================

/// A range inside a resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub uri: DocumentUri,
    pub range: Range,
}

impl Location {
    pub fn new(uri: impl Into<DocumentUri>, range: Range) -> Self {
        Self {
            uri: uri.into(),
            range,
        }
    }
}

/// A link between a source and a target location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationLink {
    /// Span of the origin of this link; defaults to the word range at the
    /// request position when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_selection_range: Option<Range>,
    pub target_uri: DocumentUri,
    /// The full target range, e.g. a whole function body.
    pub target_range: Range,
    /// The range to select and reveal, e.g. the function name. Must be
    /// contained in `target_range`.
    pub target_selection_range: Range,
}

impl LocationLink {
    pub fn to_location(&self) -> Location {
        Location {
            uri: self.target_uri.clone(),
            range: self.target_selection_range,
        }
    }

    /// Whether the selection range lies inside the target range.
    pub fn selection_within_target(&self) -> bool {
        self.target_range
            .contains_range(&self.target_selection_range)
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Reference to a command, with a title shown in the UI.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Command {
    /// Title of the command, like `save`.
    pub title: String,
    /// Identifier of the actual command handler.
    pub command: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<Value>,
}

impl Command {
    pub fn new(title: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            command: command.into(),
            arguments: Vec::new(),
        }
    }

    pub fn with_arguments(mut self, arguments: Vec<Value>) -> Self {
        self.arguments = arguments;
        self
    }
}

// ============================================================================
// Text Documents
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextDocumentIdentifier {
    pub uri: DocumentUri,
}

impl TextDocumentIdentifier {
    pub fn new(uri: impl Into<DocumentUri>) -> Self {
        Self { uri: uri.into() }
    }
}

/// An item to transfer a text document from the client to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextDocumentItem {
    pub uri: DocumentUri,
    pub language_id: LanguageIdentifier,
    #[serde(deserialize_with = "serde_util::integer")]
    pub version: Integer,
    pub text: String,
}

/// Document identifier pinned to a version.
///
/// The `version` key is mandatory on the wire but may be `null`, meaning the
/// version is unknown and the content on disk is the truth.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionedTextDocumentIdentifier {
    pub uri: DocumentUri,
    #[serde(deserialize_with = "serde_util::opt_integer")]
    pub version: Option<Integer>,
}

impl VersionedTextDocumentIdentifier {
    pub fn new(uri: impl Into<DocumentUri>, version: Integer) -> Self {
        Self {
            uri: uri.into(),
            version: Some(version),
        }
    }

    /// Identifier whose version is unknown (`"version": null`).
    pub fn unversioned(uri: impl Into<DocumentUri>) -> Self {
        Self {
            uri: uri.into(),
            version: None,
        }
    }
}

/// Name used by newer protocol revisions for the nullable-version identifier.
pub type OptionalVersionedTextDocumentIdentifier = VersionedTextDocumentIdentifier;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextDocumentPositionParams {
    pub text_document: TextDocumentIdentifier,
    pub position: Position,
}

/// Denotes a document through properties like language, scheme or pattern.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<LanguageIdentifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

pub type DocumentSelector = Vec<DocumentFilter>;

// ============================================================================
// Markup
// ============================================================================

string_enum! {
    /// Content format of a [`MarkupContent`].
    pub struct MarkupKind {
        PLAIN_TEXT = "plaintext",
        MARKDOWN = "markdown",
    }
}

/// A string value whose interpretation depends on its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupContent {
    pub kind: MarkupKind,
    pub value: String,
}

impl MarkupContent {
    pub fn markdown(value: impl Into<String>) -> Self {
        Self {
            kind: MarkupKind::MARKDOWN,
            value: value.into(),
        }
    }

    pub fn plain_text(value: impl Into<String>) -> Self {
        Self {
            kind: MarkupKind::PLAIN_TEXT,
            value: value.into(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
