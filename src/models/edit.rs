//! Text edits and workspace edits

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

use super::basic::{DocumentUri, OptionalVersionedTextDocumentIdentifier, Position, Range};
use super::macros::string_enum;

/// Identifier of a [`ChangeAnnotation`] within a workspace edit.
pub type ChangeAnnotationIdentifier = String;

// ============================================================================
// Text Edit Types
// ============================================================================

/// Replace `range` with `new_text`.
///
/// An empty `new_text` deletes; an empty range inserts. When `annotation_id`
/// is set this is an annotated edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEdit {
    pub range: Range,
    pub new_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation_id: Option<ChangeAnnotationIdentifier>,
}

impl TextEdit {
    pub fn replace(range: Range, new_text: impl Into<String>) -> Self {
        Self {
            range,
            new_text: new_text.into(),
            annotation_id: None,
        }
    }

    pub fn insert(pos: Position, new_text: impl Into<String>) -> Self {
        Self::replace(Range::point(pos), new_text)
    }

    pub fn delete(range: Range) -> Self {
        Self::replace(range, String::new())
    }

    pub fn with_annotation(mut self, id: impl Into<ChangeAnnotationIdentifier>) -> Self {
        self.annotation_id = Some(id.into());
        self
    }

    pub fn is_insert(&self) -> bool {
        self.range.start == self.range.end
    }

    pub fn is_delete(&self) -> bool {
        self.new_text.is_empty() && !self.is_insert()
    }
}

/// Extra information about a group of edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeAnnotation {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs_confirmation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Edits against one specific version of a document.
///
/// All edits refer to the same version and must not overlap; the producer is
/// responsible for that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextDocumentEdit {
    pub text_document: OptionalVersionedTextDocumentIdentifier,
    pub edits: Vec<TextEdit>,
}

// ============================================================================
// Resource Operations
// ============================================================================

string_enum! {
    /// Kind of a file lifecycle operation.
    pub struct ResourceOperationKind {
        CREATE = "create",
        RENAME = "rename",
        DELETE = "delete",
    }
}

string_enum! {
    /// How a client handles failures while applying a workspace edit.
    pub struct FailureHandlingKind {
        ABORT = "abort",
        TRANSACTIONAL = "transactional",
        TEXT_ONLY_TRANSACTIONAL = "textOnlyTransactional",
        UNDO = "undo",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFileOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overwrite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_if_exists: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFile {
    pub uri: DocumentUri,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<CreateFileOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation_id: Option<ChangeAnnotationIdentifier>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameFileOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overwrite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_if_exists: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameFile {
    pub old_uri: DocumentUri,
    pub new_uri: DocumentUri,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<RenameFileOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation_id: Option<ChangeAnnotationIdentifier>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFileOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recursive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_if_not_exists: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFile {
    pub uri: DocumentUri,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<DeleteFileOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation_id: Option<ChangeAnnotationIdentifier>,
}

/// File lifecycle operation, discriminated on the wire by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ResourceOp {
    Create(CreateFile),
    Rename(RenameFile),
    Delete(DeleteFile),
}

impl ResourceOp {
    pub fn kind(&self) -> ResourceOperationKind {
        match self {
            Self::Create(_) => ResourceOperationKind::CREATE,
            Self::Rename(_) => ResourceOperationKind::RENAME,
            Self::Delete(_) => ResourceOperationKind::DELETE,
        }
    }

    /// The resource the operation acts on (the source for renames).
    pub fn uri(&self) -> &str {
        match self {
            Self::Create(op) => &op.uri,
            Self::Rename(op) => &op.old_uri,
            Self::Delete(op) => &op.uri,
        }
    }
}

/// One entry of `documentChanges`.
///
/// Entries carrying a `kind` key are resource operations; everything else is
/// a [`TextDocumentEdit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DocumentChange {
    Edit(TextDocumentEdit),
    Operation(ResourceOp),
}

/// Union of the option keys of the three resource operations.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnyFileOptions {
    overwrite: Option<bool>,
    ignore_if_exists: Option<bool>,
    recursive: Option<bool>,
    ignore_if_not_exists: Option<bool>,
}

const RESOURCE_KINDS: &[&str] = &["create", "rename", "delete"];

// Reads the entry in a single pass, so a decode error anywhere inside it
// keeps the position of the offending field.
struct DocumentChangeVisitor;

fn fill<'de, A, T>(slot: &mut Option<T>, map: &mut A, key: &'static str) -> Result<(), A::Error>
where
    A: MapAccess<'de>,
    T: Deserialize<'de>,
{
    if slot.is_some() {
        return Err(de::Error::duplicate_field(key));
    }
    *slot = Some(map.next_value()?);
    Ok(())
}

impl<'de> Visitor<'de> for DocumentChangeVisitor {
    type Value = DocumentChange;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a text document edit or a create/rename/delete file operation")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut kind: Option<String> = None;
        let mut text_document: Option<OptionalVersionedTextDocumentIdentifier> = None;
        let mut edits: Option<Vec<TextEdit>> = None;
        let mut uri: Option<DocumentUri> = None;
        let mut old_uri: Option<DocumentUri> = None;
        let mut new_uri: Option<DocumentUri> = None;
        let mut options: Option<AnyFileOptions> = None;
        let mut annotation_id: Option<ChangeAnnotationIdentifier> = None;

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "kind" => fill(&mut kind, &mut map, "kind")?,
                "textDocument" => fill(&mut text_document, &mut map, "textDocument")?,
                "edits" => fill(&mut edits, &mut map, "edits")?,
                "uri" => fill(&mut uri, &mut map, "uri")?,
                "oldUri" => fill(&mut old_uri, &mut map, "oldUri")?,
                "newUri" => fill(&mut new_uri, &mut map, "newUri")?,
                "options" => fill(&mut options, &mut map, "options")?,
                "annotationId" => fill(&mut annotation_id, &mut map, "annotationId")?,
                _ => {
                    map.next_value::<de::IgnoredAny>()?;
                }
            }
        }

        let Some(kind) = kind else {
            return Ok(DocumentChange::Edit(TextDocumentEdit {
                text_document: text_document
                    .ok_or_else(|| <A::Error as de::Error>::missing_field("textDocument"))?,
                edits: edits.ok_or_else(|| <A::Error as de::Error>::missing_field("edits"))?,
            }));
        };

        let op = match kind.as_str() {
            "create" => ResourceOp::Create(CreateFile {
                uri: uri.ok_or_else(|| <A::Error as de::Error>::missing_field("uri"))?,
                options: options.map(|o| CreateFileOptions {
                    overwrite: o.overwrite,
                    ignore_if_exists: o.ignore_if_exists,
                }),
                annotation_id,
            }),
            "rename" => ResourceOp::Rename(RenameFile {
                old_uri: old_uri.ok_or_else(|| <A::Error as de::Error>::missing_field("oldUri"))?,
                new_uri: new_uri.ok_or_else(|| <A::Error as de::Error>::missing_field("newUri"))?,
                options: options.map(|o| RenameFileOptions {
                    overwrite: o.overwrite,
                    ignore_if_exists: o.ignore_if_exists,
                }),
                annotation_id,
            }),
            "delete" => ResourceOp::Delete(DeleteFile {
                uri: uri.ok_or_else(|| <A::Error as de::Error>::missing_field("uri"))?,
                options: options.map(|o| DeleteFileOptions {
                    recursive: o.recursive,
                    ignore_if_not_exists: o.ignore_if_not_exists,
                }),
                annotation_id,
            }),
            other => return Err(de::Error::unknown_variant(other, RESOURCE_KINDS)),
        };
        Ok(DocumentChange::Operation(op))
    }
}

impl<'de> Deserialize<'de> for DocumentChange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DocumentChangeVisitor)
    }
}

impl From<TextDocumentEdit> for DocumentChange {
    fn from(edit: TextDocumentEdit) -> Self {
        Self::Edit(edit)
    }
}

impl From<ResourceOp> for DocumentChange {
    fn from(op: ResourceOp) -> Self {
        Self::Operation(op)
    }
}

// ============================================================================
// Workspace Edit
// ============================================================================

/// Changes to many resources managed in the workspace.
///
/// Either `changes` or `documentChanges` is expected. When both are present,
/// `documentChanges` is the authoritative one (see [`WorkspaceEdit::plan`]);
/// both are preserved on the wire regardless.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceEdit {
    /// URI to TextEdit[] mapping
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changes: Option<BTreeMap<DocumentUri, Vec<TextEdit>>>,

    /// Ordered text document edits mixed with resource operations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_changes: Option<Vec<DocumentChange>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_annotations: Option<BTreeMap<ChangeAnnotationIdentifier, ChangeAnnotation>>,
}

/// The part of a [`WorkspaceEdit`] an applier should act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPlan<'a> {
    DocumentChanges(&'a [DocumentChange]),
    Changes(&'a BTreeMap<DocumentUri, Vec<TextEdit>>),
    Empty,
}

/// Per-resource change summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChange {
    pub uri: DocumentUri,
    pub edit_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<ResourceOperationKind>,
}

impl WorkspaceEdit {
    pub fn from_changes(changes: BTreeMap<DocumentUri, Vec<TextEdit>>) -> Self {
        Self {
            changes: Some(changes),
            ..Self::default()
        }
    }

    pub fn from_document_changes(document_changes: Vec<DocumentChange>) -> Self {
        Self {
            document_changes: Some(document_changes),
            ..Self::default()
        }
    }

    /// `documentChanges` when present, otherwise `changes`.
    pub fn plan(&self) -> EditPlan<'_> {
        match (&self.document_changes, &self.changes) {
            (Some(doc_changes), _) => EditPlan::DocumentChanges(doc_changes),
            (None, Some(changes)) => EditPlan::Changes(changes),
            (None, None) => EditPlan::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self.plan() {
            EditPlan::DocumentChanges(doc_changes) => doc_changes.is_empty(),
            EditPlan::Changes(changes) => changes.values().all(Vec::is_empty),
            EditPlan::Empty => true,
        }
    }

    /// Summarise the authoritative changes per resource, in wire order.
    pub fn file_changes(&self) -> Vec<FileChange> {
        match self.plan() {
            EditPlan::DocumentChanges(doc_changes) => doc_changes
                .iter()
                .map(|change| match change {
                    DocumentChange::Edit(edit) => FileChange {
                        uri: edit.text_document.uri.clone(),
                        edit_count: edit.edits.len(),
                        operation: None,
                    },
                    DocumentChange::Operation(op) => FileChange {
                        uri: op.uri().to_string(),
                        edit_count: 0,
                        operation: Some(op.kind()),
                    },
                })
                .collect(),
            EditPlan::Changes(changes) => changes
                .iter()
                .map(|(uri, edits)| FileChange {
                    uri: uri.clone(),
                    edit_count: edits.len(),
                    operation: None,
                })
                .collect(),
            EditPlan::Empty => Vec::new(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
