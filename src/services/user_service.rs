use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::Role;
use crate::database::{DatabaseError, DatabaseManager};

/// User row as stored; the password hash never leaves this module
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User shape returned to clients: everything but the password hash
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRecord> for UserProfile {
    type Error = UserError;

    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        let role = record
            .role
            .parse::<Role>()
            .map_err(|_| UserError::InvalidRole(record.role.clone()))?;

        Ok(Self {
            id: record.id,
            email: record.email,
            name: record.name,
            role,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

/// Optional filters for user listing
#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<Role>,
}

/// Fields a user may change about themselves
///
/// Role is deliberately absent: accepting it here would let a request body
/// elevate privileges.
#[derive(Debug, Default, Deserialize)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("Email address already associated to a user")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Stored role is not recognized: {0}")]
    InvalidRole(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database manager error: {0}")]
    Pool(#[from] DatabaseError),
}

const USER_COLUMNS: &str = "id, email, password_hash, name, role, created_at, updated_at";

pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new() -> Result<Self, UserError> {
        Ok(Self {
            pool: DatabaseManager::pool()?,
        })
    }

    /// Create an account with the given role; emails are unique
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: Role,
    ) -> Result<UserProfile, UserError> {
        // Unique constraint on email backs this up; checking first gives the
        // client a conflict instead of a bare database error
        if self.find_by_email(email).await?.is_some() {
            return Err(UserError::EmailTaken);
        }

        let password_hash = hash_password(password)?;

        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "INSERT INTO users (id, email, password_hash, name, role, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, now(), now()) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .bind(name)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await?;

        record.try_into()
    }

    /// List users matching the given filters, omitted filters match everything
    pub async fn get_users(&self, query: &UserQuery) -> Result<Vec<UserProfile>, UserError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {USER_COLUMNS} FROM users WHERE true"
        ));

        if let Some(email) = &query.email {
            builder.push(" AND email = ").push_bind(email);
        }
        if let Some(name) = &query.name {
            builder.push(" AND name = ").push_bind(name);
        }
        if let Some(role) = query.role {
            builder.push(" AND role = ").push_bind(role.as_str());
        }
        builder.push(" ORDER BY created_at");

        let records = builder
            .build_query_as::<UserRecord>()
            .fetch_all(&self.pool)
            .await?;

        records.into_iter().map(TryInto::try_into).collect()
    }

    pub async fn get_user(&self, id: Uuid) -> Result<UserProfile, UserError> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(UserError::NotFound(id))?;

        record.try_into()
    }

    /// Update the fields in `update`, leaving the rest untouched
    pub async fn update_user(&self, id: Uuid, update: &UserUpdate) -> Result<UserProfile, UserError> {
        let mut builder =
            QueryBuilder::<Postgres>::new("UPDATE users SET updated_at = now()");

        if let Some(email) = &update.email {
            builder.push(", email = ").push_bind(email);
        }
        if let Some(name) = &update.name {
            builder.push(", name = ").push_bind(name);
        }
        builder.push(" WHERE id = ").push_bind(id);
        builder.push(&format!(" RETURNING {USER_COLUMNS}"));

        let record = builder
            .build_query_as::<UserRecord>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                let unique = e
                    .as_database_error()
                    .map_or(false, |db| db.is_unique_violation());
                if unique {
                    UserError::EmailTaken
                } else {
                    UserError::Database(e)
                }
            })?
            .ok_or(UserError::NotFound(id))?;

        record.try_into()
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<(), UserError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(id));
        }
        Ok(())
    }

    /// Replace a user's role (the verification flow promotes UNVERIFIED to USER)
    pub async fn set_role(&self, id: Uuid, role: Role) -> Result<UserProfile, UserError> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "UPDATE users SET role = $2, updated_at = now() WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(UserError::NotFound(id))?;

        record.try_into()
    }

    /// Check credentials; wrong email and wrong password are indistinguishable
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<UserProfile, UserError> {
        let record = self
            .find_by_email(email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !verify_password(password, &record.password_hash)? {
            return Err(UserError::InvalidCredentials);
        }

        record.try_into()
    }

    pub(crate) async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, UserError> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}

/// Hash a password with Argon2 and a fresh random salt
pub fn hash_password(password: &str) -> Result<String, UserError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| UserError::PasswordHash(e.to_string()))?;

    Ok(password_hash.to_string())
}

/// Verify a password against its stored hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, UserError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(UserError::PasswordHash(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trips_through_its_hash() {
        let hash = hash_password("12345").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("12345", &hash).unwrap());
        assert!(!verify_password("54321", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("same-password").unwrap();
        let second = hash_password("same-password").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn profiles_reject_unrecognized_stored_roles() {
        let record = UserRecord {
            id: Uuid::new_v4(),
            email: "user@example.com".to_string(),
            password_hash: "hash".to_string(),
            name: "User".to_string(),
            role: "SUPERUSER".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(matches!(
            UserProfile::try_from(record),
            Err(UserError::InvalidRole(_))
        ));
    }

    #[test]
    fn profiles_carry_no_password_material() {
        let record = UserRecord {
            id: Uuid::new_v4(),
            email: "user@example.com".to_string(),
            password_hash: "hash".to_string(),
            name: "User".to_string(),
            role: "USER".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let profile = UserProfile::try_from(record).unwrap();
        let value = serde_json::to_value(&profile).unwrap();
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["role"], "USER");
    }
}
