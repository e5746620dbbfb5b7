use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::Arc;
use tracing::instrument;
use validator::ValidateEmail;

use crate::error::{UserError, UserResult};
use crate::models::{Account, LoginRequest, RegisterRequest, UserResponse};
use crate::repository::UserRepository;

/// Service layer for account registration and login
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Register an account with a hashed password
    #[instrument(skip(self, input))]
    pub async fn register(&self, input: RegisterRequest) -> UserResult<UserResponse> {
        let (Some(name), Some(email), Some(password)) = (
            non_blank(input.name.as_deref()),
            non_blank(input.email.as_deref()),
            input.password.as_deref().filter(|p| !p.is_empty()),
        ) else {
            return Err(UserError::Validation("All fields required".to_string()));
        };

        if !email.validate_email() {
            return Err(UserError::Validation(format!("Invalid email: {}", email)));
        }

        let password_hash = self.hash_password(password)?;
        let account = Account::new(name.to_string(), email.to_string(), password_hash);

        let created = self.repository.create(account).await?;
        Ok(created.into())
    }

    /// Verify credentials. Unknown email and wrong password look the same.
    #[instrument(skip(self, input))]
    pub async fn login(&self, input: LoginRequest) -> UserResult<UserResponse> {
        let (Some(email), Some(password)) =
            (non_blank(input.email.as_deref()), input.password.as_deref())
        else {
            return Err(UserError::InvalidCredentials);
        };

        let account = self
            .repository
            .get_by_email(email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !self.verify_password(password, &account.password_hash)? {
            tracing::info!(user_id = %account.id, "Rejected login");
            return Err(UserError::InvalidCredentials);
        }

        Ok(account.into())
    }

    // Password helpers

    fn hash_password(&self, password: &str) -> UserResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::PasswordHash(e.to_string()))
    }

    fn verify_password(&self, password: &str, hash: &str) -> UserResult<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
