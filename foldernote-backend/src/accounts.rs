//! Account signup and signin.
//!
//! Credentials are opaque strings compared for equality; the account id
//! issued here is what the document tree uses as the owner.

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::Database;
use crate::models::Account;
use crate::tree::{StoreError, StoreResult};

pub struct AccountStore {
    db: Arc<Database>,
}

impl AccountStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Register a new account. A taken email is a `Conflict`.
    pub fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        account_id: Option<&str>,
    ) -> StoreResult<Account> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(StoreError::InvalidInput(
                "email and password are required".to_string(),
            ));
        }

        let account = Account {
            account_id: account_id
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: name.trim().to_string(),
            email: email.to_string(),
            password: password.to_string(),
            created_at: Utc::now(),
        };

        self.db.insert_account(&account).map_err(|e| {
            StoreError::from_db(e, |detail| {
                if detail.contains("account_id") {
                    "Account id already exists".to_string()
                } else {
                    "Email already exists".to_string()
                }
            })
        })?;

        log::info!("[ACCOUNTS] Created account {}", account.account_id);
        Ok(account)
    }

    /// Check credentials. Unknown email and wrong password are indistinguishable.
    pub fn signin(&self, email: &str, password: &str) -> StoreResult<Account> {
        match self.db.get_account_by_email(email.trim())? {
            Some(account) if account.password == password => {
                log::debug!("[ACCOUNTS] Signin for {}", account.account_id);
                Ok(account)
            }
            _ => Err(StoreError::InvalidCredentials),
        }
    }
}
