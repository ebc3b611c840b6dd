//! Database operations for notes nested inside folders.
//!
//! Each row belongs to one folder entry and carries a `position` that keeps
//! insertion order. Rows cascade away when their folder is deleted.

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::errors::DbResult;
use crate::db::sqlite::{now_rfc3339, parse_timestamp};
use crate::db::Database;
use crate::models::{EntryKind, NestedNote};

/// Columns read by `note_from_row`, qualified with the `n` alias
pub(super) const NOTE_COLUMNS: &str =
    "n.custom_id, n.owner_account_id, n.title, n.content, n.created_at, n.updated_at";

/// Build a note from `NOTE_COLUMNS` starting at column `offset`
pub(super) fn note_from_row(row: &Row, offset: usize) -> rusqlite::Result<NestedNote> {
    let created_at_str: String = row.get(offset + 4)?;
    let updated_at_str: String = row.get(offset + 5)?;

    Ok(NestedNote {
        custom_id: row.get(offset)?,
        owner_account_id: row.get(offset + 1)?,
        title: row.get(offset + 2)?,
        content: row.get(offset + 3)?,
        created_at: parse_timestamp(offset + 4, &created_at_str)?,
        updated_at: parse_timestamp(offset + 5, &updated_at_str)?,
    })
}

pub(super) fn list_notes_in_folder(
    conn: &Connection,
    folder_id: &str,
) -> rusqlite::Result<Vec<NestedNote>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM nested_notes n WHERE n.folder_id = ?1 ORDER BY n.position",
        NOTE_COLUMNS
    ))?;
    let notes = stmt
        .query_map(params![folder_id], |row| note_from_row(row, 0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(notes)
}

/// Subquery resolving a folder's system id from its custom id (bound as `?N`)
fn folder_id_by_custom_id(param: usize) -> String {
    format!(
        "(SELECT id FROM entries WHERE custom_id = ?{} AND kind = '{}')",
        param,
        EntryKind::Folder.as_str()
    )
}

impl Database {
    /// Append a note to the end of the folder with `folder_custom_id` owned by
    /// the note's owner.
    ///
    /// Folder resolution, position assignment and the insert run as one
    /// statement. Returns false if no such folder exists for that owner; a
    /// duplicate title or custom id inside the folder is a constraint violation.
    pub fn append_nested_note(&self, folder_custom_id: &str, note: &NestedNote) -> DbResult<bool> {
        let conn = self.conn()?;
        let rows = conn.execute(
            "INSERT INTO nested_notes
                (folder_id, custom_id, owner_account_id, title, content, position, created_at, updated_at)
             SELECT e.id, ?1, ?2, ?3, ?4,
                    COALESCE((SELECT MAX(position) FROM nested_notes WHERE folder_id = e.id), -1) + 1,
                    ?5, ?6
             FROM entries e
             WHERE e.custom_id = ?7 AND e.kind = ?8 AND e.owner_account_id = ?2",
            params![
                note.custom_id,
                note.owner_account_id,
                note.title,
                note.content,
                note.created_at.to_rfc3339(),
                note.updated_at.to_rfc3339(),
                folder_custom_id,
                EntryKind::Folder.as_str(),
            ],
        )?;
        Ok(rows > 0)
    }

    /// Get the note with `custom_id` inside the folder with `folder_custom_id`
    pub fn get_nested_note(
        &self,
        folder_custom_id: &str,
        custom_id: &str,
    ) -> DbResult<Option<NestedNote>> {
        let conn = self.conn()?;
        let note = conn
            .query_row(
                &format!(
                    "SELECT {} FROM nested_notes n WHERE n.folder_id = {} AND n.custom_id = ?2",
                    NOTE_COLUMNS,
                    folder_id_by_custom_id(1)
                ),
                params![folder_custom_id, custom_id],
                |row| note_from_row(row, 0),
            )
            .optional()?;
        Ok(note)
    }

    /// Overwrite one nested note's content in place. Returns false if the folder
    /// or the note is missing.
    pub fn update_nested_note_content(
        &self,
        folder_custom_id: &str,
        custom_id: &str,
        content: &str,
    ) -> DbResult<bool> {
        let conn = self.conn()?;
        let now = now_rfc3339();
        let rows = conn.execute(
            &format!(
                "UPDATE nested_notes SET content = ?3, updated_at = ?4
                 WHERE folder_id = {} AND custom_id = ?2",
                folder_id_by_custom_id(1)
            ),
            params![folder_custom_id, custom_id, content, now],
        )?;
        Ok(rows > 0)
    }

    /// Remove exactly one note from a folder. Returns false if nothing matched.
    pub fn delete_nested_note(&self, folder_custom_id: &str, custom_id: &str) -> DbResult<bool> {
        let conn = self.conn()?;
        let rows = conn.execute(
            &format!(
                "DELETE FROM nested_notes WHERE folder_id = {} AND custom_id = ?2",
                folder_id_by_custom_id(1)
            ),
            params![folder_custom_id, custom_id],
        )?;
        Ok(rows > 0)
    }

    /// Number of notes inside the folder with `folder_custom_id`
    #[cfg(test)]
    pub fn count_nested_notes(&self, folder_custom_id: &str) -> DbResult<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM nested_notes WHERE folder_id = {}",
                folder_id_by_custom_id(1)
            ),
            params![folder_custom_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Entry;
    use chrono::Utc;
    use tempfile::tempdir;

    fn open() -> (tempfile::TempDir, Database) {
        let dir = tempdir().unwrap();
        let db = Database::new(dir.path().join("t.db").to_str().unwrap(), 2, 1000).unwrap();
        (dir, db)
    }

    fn insert_folder(db: &Database, id: &str, custom_id: &str, owner: &str) {
        let now = Utc::now();
        db.insert_entry(&Entry {
            id: id.to_string(),
            custom_id: custom_id.to_string(),
            owner_account_id: owner.to_string(),
            kind: EntryKind::Folder,
            title: format!("Folder {}", custom_id),
            content: None,
            notes: Some(vec![]),
            created_at: now,
            updated_at: now,
        })
        .unwrap();
    }

    fn note(custom_id: &str, owner: &str, title: &str) -> NestedNote {
        let now = Utc::now();
        NestedNote {
            custom_id: custom_id.to_string(),
            owner_account_id: owner.to_string(),
            title: title.to_string(),
            content: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_append_keeps_insertion_order() {
        let (_dir, db) = open();
        insert_folder(&db, "id-1", "f-1", "acct");

        for (cid, title) in [("n-3", "c"), ("n-1", "a"), ("n-2", "b")] {
            assert!(db.append_nested_note("f-1", &note(cid, "acct", title)).unwrap());
        }
        db.delete_nested_note("f-1", "n-1").unwrap();
        assert!(db.append_nested_note("f-1", &note("n-4", "acct", "d")).unwrap());

        let folder = db.get_entry("id-1").unwrap().unwrap();
        let order: Vec<_> = folder
            .notes
            .unwrap()
            .into_iter()
            .map(|n| n.custom_id)
            .collect();
        assert_eq!(order, vec!["n-3", "n-2", "n-4"]);
    }

    #[test]
    fn test_append_requires_folder_of_same_owner() {
        let (_dir, db) = open();
        insert_folder(&db, "id-1", "f-1", "acct");

        assert!(!db.append_nested_note("missing", &note("n-1", "acct", "a")).unwrap());
        assert!(!db.append_nested_note("f-1", &note("n-1", "intruder", "a")).unwrap());
        assert_eq!(db.count_nested_notes("f-1").unwrap(), 0);
    }

    #[test]
    fn test_same_custom_id_allowed_in_different_folders() {
        let (_dir, db) = open();
        insert_folder(&db, "id-1", "f-1", "acct");
        insert_folder(&db, "id-2", "f-2", "acct");

        assert!(db.append_nested_note("f-1", &note("n-1", "acct", "a")).unwrap());
        assert!(db.append_nested_note("f-2", &note("n-1", "acct", "a")).unwrap());
        let err = db
            .append_nested_note("f-1", &note("n-1", "acct", "other title"))
            .unwrap_err();
        assert!(err.unique_violation().is_some());
    }
}
