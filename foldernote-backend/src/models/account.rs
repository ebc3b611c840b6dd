use chrono::{DateTime, Utc};
use foldernote_types::AccountInfo;

/// A registered account. `password` is an opaque credential compared for equality.
#[derive(Debug, Clone)]
pub struct Account {
    pub account_id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountInfo {
    fn from(account: Account) -> Self {
        AccountInfo {
            user_id: account.account_id,
            name: account.name,
            email: account.email,
        }
    }
}
