//! Admin authentication service.
//!
//! Email + password login with Argon2id hashes.

mod error;

pub use error::AdminAuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use vacance_core::{AccountStatus, AdminAccountId, Email};

use crate::db::AdminAccountRepository;
use crate::models::admin_account::{AdminAccount, AdminAccountInput, RoleGrant};

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Admin authentication service.
pub struct AdminAuthService<'a> {
    accounts: AdminAccountRepository<'a>,
}

impl<'a> AdminAuthService<'a> {
    /// Create a new admin authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            accounts: AdminAccountRepository::new(pool),
        }
    }

    /// Register a new account. Super admins get the materialized full matrix.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::InvalidEmail` or `WeakPassword` for bad input,
    /// `Permissions` for unregistered menu ids and `AccountExists` on a duplicate email.
    pub async fn register(&self, input: AdminAccountInput) -> Result<AdminAccount, AdminAuthError> {
        let email = Email::parse(&input.email)?;
        validate_password(&input.password)?;
        let grant = RoleGrant::from_submission(input.role, input.permissions)?;
        let hash = hash_password(&input.password)?;

        let account = self
            .accounts
            .create(&email, input.name.trim(), &grant, input.status, &hash)
            .await?;

        tracing::info!(
            admin_id = %account.id,
            role = %account.role,
            "Admin account created"
        );
        Ok(account)
    }

    /// Check an email/password pair.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::InvalidCredentials` if the email is unknown or the
    /// password is wrong, and `AccountInactive` for a disabled account.
    pub async fn login(&self, email: &str, password: &str) -> Result<AdminAccount, AdminAuthError> {
        let email = Email::parse(email).map_err(|_| AdminAuthError::InvalidCredentials)?;
        let account = self
            .accounts
            .get_by_email(&email)
            .await?
            .ok_or(AdminAuthError::InvalidCredentials)?;

        let hash = self
            .accounts
            .get_password_hash(&account.id)
            .await?
            .ok_or(AdminAuthError::InvalidCredentials)?;
        verify_password(password, &hash)?;

        if account.status == AccountStatus::Inactive {
            return Err(AdminAuthError::AccountInactive);
        }

        self.accounts.touch_last_login(&account.id).await?;
        Ok(account)
    }

    /// Replace an account's password.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::WeakPassword` for a short password.
    pub async fn set_password(
        &self,
        id: &AdminAccountId,
        password: &str,
    ) -> Result<(), AdminAuthError> {
        validate_password(password)?;
        let hash = hash_password(password)?;
        self.accounts.set_password_hash(id, &hash).await?;
        Ok(())
    }
}

/// Validate password meets requirements.
///
/// # Errors
///
/// Returns `AdminAuthError::WeakPassword` if the password is too short.
pub fn validate_password(password: &str) -> Result<(), AdminAuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AdminAuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AdminAuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AdminAuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AdminAuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AdminAuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AdminAuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AdminAuthError::InvalidCredentials)
}
