//! Document-tree records: top-level entries and the notes nested in folders.

use chrono::{DateTime, Utc};
use foldernote_types::FileType;
use serde::{Deserialize, Serialize};
use strum::EnumString;

/// Kind of a top-level entry, stored as its snake_case string and parsed back via strum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntryKind {
    Folder,
    StandaloneNote,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Folder => "folder",
            EntryKind::StandaloneNote => "standalone_note",
        }
    }

    /// Human label used in conflict messages
    pub fn label(&self) -> &'static str {
        match self {
            EntryKind::Folder => "Folder",
            EntryKind::StandaloneNote => "Note",
        }
    }
}

/// Kind of item a create call produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Folder,
    StandaloneNote,
    NestedNote,
}

impl From<FileType> for ItemKind {
    fn from(file_type: FileType) -> Self {
        match file_type {
            FileType::Folder => ItemKind::Folder,
            FileType::SingleNote => ItemKind::StandaloneNote,
            FileType::NoteInsideFolder => ItemKind::NestedNote,
        }
    }
}

/// How a point lookup addresses its target.
///
/// The caller states the scheme explicitly; identifiers are never
/// classified by their format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    /// `parent_id` is an entry's system id
    BySystemId,
    /// `parent_id` is a folder's `custom_id`, the target is a note inside it
    ByFolderCustomId,
}

/// A note living inside exactly one folder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedNote {
    pub custom_id: String,
    pub owner_account_id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A top-level folder or standalone note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    pub custom_id: String,
    pub owner_account_id: String,
    pub kind: EntryKind,
    pub title: String,
    /// Standalone notes only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Folders only, in insertion order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<NestedNote>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entry {
    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }
}

/// Either shape returned by create and point lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TreeItem {
    Entry(Entry),
    Nested(NestedNote),
}
