use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::Account;

/// Repository trait for account persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert an account. Emails are unique case-insensitively.
    async fn create(&self, account: Account) -> UserResult<Account>;

    /// Look up an account by email (case-insensitive)
    async fn get_by_email(&self, email: &str) -> UserResult<Option<Account>>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    accounts: Arc<RwLock<HashMap<Uuid, Account>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, account: Account) -> UserResult<Account> {
        let mut accounts = self.accounts.write().await;

        let email_exists = accounts
            .values()
            .any(|a| a.email.eq_ignore_ascii_case(&account.email));
        if email_exists {
            return Err(UserError::DuplicateEmail(account.email));
        }

        accounts.insert(account.id, account.clone());

        tracing::info!(user_id = %account.id, email = %account.email, "Registered account");
        Ok(account)
    }

    async fn get_by_email(&self, email: &str) -> UserResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}
