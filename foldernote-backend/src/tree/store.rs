//! DocumentTreeStore — per-account folders and notes over SQLite
//!
//! Top-level entries live in `entries`; notes inside a folder live in
//! `nested_notes`, ordered by insertion. Every mutation is a single
//! statement, so concurrent creates of the same title cannot both succeed.

use chrono::Utc;
use foldernote_types::MutationOutcomeKind;
use std::sync::Arc;
use uuid::Uuid;

use super::errors::{StoreError, StoreResult};
use crate::db::Database;
use crate::models::{AddressKind, Entry, EntryKind, ItemKind, NestedNote, TreeItem};

/// Result of an update or delete.
///
/// `TargetMissing` means nothing was changed because the addressed entry or
/// note does not exist; callers choose whether that is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    TargetMissing,
}

impl MutationOutcome {
    fn from_changed(changed: bool) -> Self {
        if changed {
            MutationOutcome::Applied
        } else {
            MutationOutcome::TargetMissing
        }
    }
}

impl From<MutationOutcome> for MutationOutcomeKind {
    fn from(outcome: MutationOutcome) -> Self {
        match outcome {
            MutationOutcome::Applied => MutationOutcomeKind::Applied,
            MutationOutcome::TargetMissing => MutationOutcomeKind::TargetMissing,
        }
    }
}

fn require_non_empty(field: &str, value: &str) -> StoreResult<()> {
    if value.trim().is_empty() {
        return Err(StoreError::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(())
}

pub struct DocumentTreeStore {
    db: Arc<Database>,
}

impl DocumentTreeStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Create a folder, a standalone note, or a note inside an existing folder.
    ///
    /// Top-level titles are unique per (account, kind), so a folder and a
    /// note may share a title. A nested note needs `parent_folder_custom_id`
    /// naming a folder of the same account, and its title must be unique in
    /// that folder.
    pub fn create(
        &self,
        kind: ItemKind,
        account_id: &str,
        title: &str,
        custom_id: &str,
        content: Option<&str>,
        parent_folder_custom_id: Option<&str>,
    ) -> StoreResult<TreeItem> {
        require_non_empty("accountId", account_id)?;
        require_non_empty("title", title)?;
        require_non_empty("customId", custom_id)?;

        match kind {
            ItemKind::Folder => self
                .create_entry(EntryKind::Folder, account_id, title, custom_id, None)
                .map(TreeItem::Entry),
            ItemKind::StandaloneNote => self
                .create_entry(
                    EntryKind::StandaloneNote,
                    account_id,
                    title,
                    custom_id,
                    Some(content.unwrap_or_default()),
                )
                .map(TreeItem::Entry),
            ItemKind::NestedNote => {
                let folder_custom_id = parent_folder_custom_id
                    .filter(|id| !id.trim().is_empty())
                    .ok_or_else(|| {
                        StoreError::InvalidInput(
                            "belongsToFolderId is required for a note inside a folder".to_string(),
                        )
                    })?;
                self.create_nested(
                    account_id,
                    title,
                    custom_id,
                    content.unwrap_or_default(),
                    folder_custom_id,
                )
                .map(TreeItem::Nested)
            }
        }
    }

    fn create_entry(
        &self,
        kind: EntryKind,
        account_id: &str,
        title: &str,
        custom_id: &str,
        content: Option<&str>,
    ) -> StoreResult<Entry> {
        let now = Utc::now();
        let entry = Entry {
            id: Uuid::new_v4().to_string(),
            custom_id: custom_id.to_string(),
            owner_account_id: account_id.to_string(),
            kind,
            title: title.to_string(),
            content: content.map(str::to_string),
            notes: match kind {
                EntryKind::Folder => Some(Vec::new()),
                EntryKind::StandaloneNote => None,
            },
            created_at: now,
            updated_at: now,
        };

        self.db.insert_entry(&entry).map_err(|e| {
            StoreError::from_db(e, |detail| {
                log::warn!("[TREE] Rejected {} '{}': {}", kind.as_str(), title, detail);
                if detail.contains("custom_id") {
                    format!("{} with this customId already exists", kind.label())
                } else {
                    format!("{} with this name already exists", kind.label())
                }
            })
        })?;

        log::debug!(
            "[TREE] Created {} {} '{}' for account {}",
            kind.as_str(),
            entry.id,
            title,
            account_id
        );
        Ok(entry)
    }

    fn create_nested(
        &self,
        account_id: &str,
        title: &str,
        custom_id: &str,
        content: &str,
        folder_custom_id: &str,
    ) -> StoreResult<NestedNote> {
        let now = Utc::now();
        let note = NestedNote {
            custom_id: custom_id.to_string(),
            owner_account_id: account_id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        };

        let appended = self
            .db
            .append_nested_note(folder_custom_id, &note)
            .map_err(|e| {
                StoreError::from_db(e, |detail| {
                    log::warn!(
                        "[TREE] Rejected note '{}' in folder {}: {}",
                        title,
                        folder_custom_id,
                        detail
                    );
                    if detail.contains("custom_id") {
                        "Note with this customId already exists inside the folder".to_string()
                    } else {
                        "Note with this name already exists inside the folder".to_string()
                    }
                })
            })?;

        if !appended {
            return Err(StoreError::NotFound(format!(
                "Folder not found: {}",
                folder_custom_id
            )));
        }

        log::debug!(
            "[TREE] Appended note {} '{}' to folder {}",
            custom_id,
            title,
            folder_custom_id
        );
        Ok(note)
    }

    /// Every top-level entry owned by `account_id`, folders with their notes
    pub fn list_by_account(&self, account_id: &str) -> StoreResult<Vec<Entry>> {
        Ok(self.db.list_entries_by_owner(account_id)?)
    }

    /// Point lookup.
    ///
    /// With `BySystemId`, `parent_id` is an entry id and `custom_id` is
    /// ignored. With `ByFolderCustomId`, `parent_id` is a folder's custom id
    /// and the target is the note with `custom_id` inside it.
    pub fn get_item(
        &self,
        custom_id: &str,
        parent_id: &str,
        address: AddressKind,
    ) -> StoreResult<TreeItem> {
        match address {
            AddressKind::BySystemId => self
                .db
                .get_entry(parent_id)?
                .map(TreeItem::Entry)
                .ok_or_else(|| StoreError::NotFound(format!("Entry not found: {}", parent_id))),
            AddressKind::ByFolderCustomId => self
                .db
                .get_nested_note(parent_id, custom_id)?
                .map(TreeItem::Nested)
                .ok_or_else(|| {
                    StoreError::NotFound(format!(
                        "Note {} not found in folder {}",
                        custom_id, parent_id
                    ))
                }),
        }
    }

    /// Overwrite content.
    ///
    /// Not nested: `parent_id` is a standalone note's system id. Nested:
    /// `parent_id` is the folder's custom id and `custom_id` picks the note.
    /// Title, ids and sibling notes are never touched.
    pub fn update_content(
        &self,
        parent_id: &str,
        custom_id: &str,
        is_nested: bool,
        new_content: &str,
    ) -> StoreResult<MutationOutcome> {
        let changed = if is_nested {
            self.db
                .update_nested_note_content(parent_id, custom_id, new_content)?
        } else {
            self.db.update_entry_content(parent_id, new_content)?
        };

        let outcome = MutationOutcome::from_changed(changed);
        log::debug!(
            "[TREE] Update content parent={} custom_id={} nested={}: {:?}",
            parent_id,
            custom_id,
            is_nested,
            outcome
        );
        Ok(outcome)
    }

    /// Delete a top-level entry by system id (`is_single_note`), or one note
    /// from the folder whose custom id is `parent_id`.
    ///
    /// Deleting an entry that is a folder takes its notes with it.
    pub fn delete(
        &self,
        parent_id: &str,
        custom_id: &str,
        is_single_note: bool,
    ) -> StoreResult<MutationOutcome> {
        let changed = if is_single_note {
            self.db.delete_entry(parent_id)?
        } else {
            self.db.delete_nested_note(parent_id, custom_id)?
        };

        let outcome = MutationOutcome::from_changed(changed);
        log::debug!(
            "[TREE] Delete parent={} custom_id={} single={}: {:?}",
            parent_id,
            custom_id,
            is_single_note,
            outcome
        );
        Ok(outcome)
    }

    /// Delete a folder, and all of its notes, by the folder's custom id
    pub fn delete_folder(&self, custom_id: &str) -> StoreResult<MutationOutcome> {
        let outcome = MutationOutcome::from_changed(self.db.delete_folder_by_custom_id(custom_id)?);
        log::debug!("[TREE] Delete folder {}: {:?}", custom_id, outcome);
        Ok(outcome)
    }
}
