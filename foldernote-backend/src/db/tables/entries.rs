//! Database operations for the entries table (folders and standalone notes)

use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;

use crate::db::errors::DbResult;
use crate::db::sqlite::{now_rfc3339, parse_timestamp};
use crate::db::Database;
use crate::models::{Entry, EntryKind, NestedNote};

use super::nested_notes::{list_notes_in_folder, note_from_row, NOTE_COLUMNS};

const ENTRY_COLUMNS: &str =
    "id, custom_id, owner_account_id, kind, title, content, created_at, updated_at";

fn entry_from_row(row: &Row) -> rusqlite::Result<Entry> {
    let kind_str: String = row.get(3)?;
    let kind: EntryKind = kind_str.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let created_at_str: String = row.get(6)?;
    let updated_at_str: String = row.get(7)?;

    Ok(Entry {
        id: row.get(0)?,
        custom_id: row.get(1)?,
        owner_account_id: row.get(2)?,
        kind,
        title: row.get(4)?,
        content: row.get(5)?,
        notes: match kind {
            EntryKind::Folder => Some(Vec::new()),
            EntryKind::StandaloneNote => None,
        },
        created_at: parse_timestamp(6, &created_at_str)?,
        updated_at: parse_timestamp(7, &updated_at_str)?,
    })
}

fn fetch_entry(conn: &Connection, id: &str) -> rusqlite::Result<Option<Entry>> {
    let mut entry = conn
        .query_row(
            &format!("SELECT {} FROM entries WHERE id = ?1", ENTRY_COLUMNS),
            params![id],
            entry_from_row,
        )
        .optional()?;

    if let Some(ref mut e) = entry {
        if e.is_folder() {
            e.notes = Some(list_notes_in_folder(conn, &e.id)?);
        }
    }
    Ok(entry)
}

impl Database {
    /// Insert a new top-level entry.
    ///
    /// Title uniqueness per (owner, kind) and folder `custom_id` uniqueness are
    /// enforced by indexes, so a duplicate surfaces as a constraint violation.
    pub fn insert_entry(&self, entry: &Entry) -> DbResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO entries (id, custom_id, owner_account_id, kind, title, content, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                entry.id,
                entry.custom_id,
                entry.owner_account_id,
                entry.kind.as_str(),
                entry.title,
                entry.content,
                entry.created_at.to_rfc3339(),
                entry.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get an entry by system id. Folders come with their notes in order.
    pub fn get_entry(&self, id: &str) -> DbResult<Option<Entry>> {
        let conn = self.conn()?;
        let tx = conn.unchecked_transaction()?;
        let entry = fetch_entry(&tx, id)?;
        tx.commit()?;
        Ok(entry)
    }

    /// List every top-level entry owned by an account, oldest first
    pub fn list_entries_by_owner(&self, owner_account_id: &str) -> DbResult<Vec<Entry>> {
        let conn = self.conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut entries = {
            let mut stmt = tx.prepare(&format!(
                "SELECT {} FROM entries WHERE owner_account_id = ?1 ORDER BY rowid",
                ENTRY_COLUMNS
            ))?;
            stmt.query_map(params![owner_account_id], entry_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?
        };

        let mut notes_by_folder: HashMap<String, Vec<NestedNote>> = HashMap::new();
        {
            let mut stmt = tx.prepare(&format!(
                "SELECT n.folder_id, {}
                 FROM nested_notes n JOIN entries e ON e.id = n.folder_id
                 WHERE e.owner_account_id = ?1
                 ORDER BY n.folder_id, n.position",
                NOTE_COLUMNS
            ))?;
            let rows = stmt.query_map(params![owner_account_id], |row| {
                let folder_id: String = row.get(0)?;
                Ok((folder_id, note_from_row(row, 1)?))
            })?;
            for row in rows {
                let (folder_id, note) = row?;
                notes_by_folder.entry(folder_id).or_default().push(note);
            }
        }
        tx.commit()?;

        for entry in entries.iter_mut().filter(|e| e.is_folder()) {
            entry.notes = Some(notes_by_folder.remove(&entry.id).unwrap_or_default());
        }
        Ok(entries)
    }

    /// Overwrite a standalone note's content. Returns false if no such note exists.
    pub fn update_entry_content(&self, id: &str, content: &str) -> DbResult<bool> {
        let conn = self.conn()?;
        let now = now_rfc3339();
        let rows = conn.execute(
            "UPDATE entries SET content = ?1, updated_at = ?2 WHERE id = ?3 AND kind = ?4",
            params![content, now, id, EntryKind::StandaloneNote.as_str()],
        )?;
        Ok(rows > 0)
    }

    /// Delete an entry by system id; a folder's notes cascade with it
    pub fn delete_entry(&self, id: &str) -> DbResult<bool> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM entries WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    /// Delete a folder by its custom id, regardless of owner
    pub fn delete_folder_by_custom_id(&self, custom_id: &str) -> DbResult<bool> {
        let conn = self.conn()?;
        let rows = conn.execute(
            "DELETE FROM entries WHERE custom_id = ?1 AND kind = ?2",
            params![custom_id, EntryKind::Folder.as_str()],
        )?;
        Ok(rows > 0)
    }

    /// Count entries matching (owner, kind, title)
    #[cfg(test)]
    pub fn count_entries_with_title(
        &self,
        owner_account_id: &str,
        kind: EntryKind,
        title: &str,
    ) -> DbResult<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM entries WHERE owner_account_id = ?1 AND kind = ?2 AND title = ?3",
            params![owner_account_id, kind.as_str(), title],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
