use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sqlx::PgPool;
use thiserror::Error;

use super::user_service::{UserError, UserProfile, UserService};
use crate::auth::Role;
use crate::config;
use crate::database::{DatabaseError, DatabaseManager};

/// One pending email-verification code; at most one per address
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VerificationCode {
    pub email: String,
    pub code: String,
    pub expiration: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("No user with email {0}")]
    UserNotFound(String),

    #[error("This user is already verified")]
    AlreadyVerified,

    #[error("No verification code issued for {0}")]
    CodeNotFound(String),

    #[error("Wrong verification code")]
    WrongCode,

    #[error("Verification code expired")]
    CodeExpired,

    #[error(transparent)]
    User(#[from] UserError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database manager error: {0}")]
    Pool(#[from] DatabaseError),
}

pub struct VerificationCodeService {
    pool: PgPool,
    users: UserService,
}

impl VerificationCodeService {
    pub fn new() -> Result<Self, VerificationError> {
        Ok(Self {
            pool: DatabaseManager::pool()?,
            users: UserService::new()?,
        })
    }

    /// Issue a fresh code for the address, replacing any outstanding one
    pub async fn create_verification_code(
        &self,
        email: &str,
    ) -> Result<VerificationCode, VerificationError> {
        let ttl = config::config().email.verification_code_ttl_minutes;
        let code = generate_code(6);
        let expiration = Utc::now() + Duration::minutes(ttl);

        let record = sqlx::query_as::<_, VerificationCode>(
            "INSERT INTO verification_codes (email, code, expiration) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (email) DO UPDATE SET code = $2, expiration = $3 \
             RETURNING email, code, expiration",
        )
        .bind(email)
        .bind(code)
        .bind(expiration)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn get_verification_code(
        &self,
        email: &str,
    ) -> Result<VerificationCode, VerificationError> {
        sqlx::query_as::<_, VerificationCode>(
            "SELECT email, code, expiration FROM verification_codes WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| VerificationError::CodeNotFound(email.to_string()))
    }

    pub async fn delete_verification_code(&self, email: &str) -> Result<(), VerificationError> {
        sqlx::query("DELETE FROM verification_codes WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Check a submitted code and promote the account from UNVERIFIED to USER
    ///
    /// The spent code is deleted so it cannot be replayed.
    pub async fn verify_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<UserProfile, VerificationError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| VerificationError::UserNotFound(email.to_string()))?;

        if user.role != Role::Unverified.as_str() {
            return Err(VerificationError::AlreadyVerified);
        }

        let existing = self.get_verification_code(email).await?;
        if existing.code != code {
            return Err(VerificationError::WrongCode);
        }
        if existing.expiration < Utc::now() {
            return Err(VerificationError::CodeExpired);
        }

        let verified = self.users.set_role(user.id, Role::User).await?;
        self.delete_verification_code(email).await?;

        Ok(verified)
    }
}

/// Random uppercase code of the given length, as promised by the email copy
pub fn generate_code(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| rng.gen_range(b'A'..=b'Z') as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_six_uppercase_letters() {
        for _ in 0..50 {
            let code = generate_code(6);
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn codes_vary_between_draws() {
        let draws: std::collections::HashSet<String> =
            (0..20).map(|_| generate_code(6)).collect();
        // 26^6 possibilities; twenty draws colliding into one value would
        // mean the generator is broken
        assert!(draws.len() > 1);
    }
}
