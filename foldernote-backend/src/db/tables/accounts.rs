//! Account database operations

use rusqlite::{params, OptionalExtension};

use crate::db::errors::DbResult;
use crate::db::sqlite::parse_timestamp;
use crate::db::Database;
use crate::models::Account;

impl Database {
    /// Insert a new account. A taken email or account id is a constraint violation.
    pub fn insert_account(&self, account: &Account) -> DbResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO accounts (account_id, name, email, password, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                account.account_id,
                account.name,
                account.email,
                account.password,
                account.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Look up an account by email
    pub fn get_account_by_email(&self, email: &str) -> DbResult<Option<Account>> {
        let conn = self.conn()?;
        let account = conn
            .query_row(
                "SELECT account_id, name, email, password, created_at FROM accounts WHERE email = ?1",
                params![email],
                |row| {
                    let created_at_str: String = row.get(4)?;
                    Ok(Account {
                        account_id: row.get(0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                        password: row.get(3)?,
                        created_at: parse_timestamp(4, &created_at_str)?,
                    })
                },
            )
            .optional()?;
        Ok(account)
    }
}
