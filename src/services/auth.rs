//! Staff authentication service

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use rand::rngs::OsRng;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        enums::StaffRole,
        staff::{CreateStaff, Staff, StaffClaims},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate staff by login and return a JWT token
    pub async fn authenticate(&self, login: &str, password: &str) -> AppResult<(String, Staff)> {
        let staff = self
            .repository
            .staff
            .get_by_login(login)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid login or password".to_string()))?;

        if !verify_password(&staff.password, password)? {
            tracing::warn!("Failed login attempt for {}", login);
            return Err(AppError::Authentication("Invalid login or password".to_string()));
        }

        let token = self.create_token(&staff)?;
        Ok((token, staff))
    }

    fn create_token(&self, staff: &Staff) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = StaffClaims {
            sub: staff.login.clone(),
            staff_id: staff.id,
            role: staff.role,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Validate a bearer token
    pub fn verify_token(&self, token: &str) -> AppResult<StaffClaims> {
        StaffClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Staff> {
        self.repository.staff.get_by_id(id).await
    }

    /// Create a staff account
    pub async fn create_staff(&self, data: CreateStaff) -> AppResult<Staff> {
        data.validate()?;
        let hash = hash_password(&data.password)?;
        let staff = self
            .repository
            .staff
            .create(
                data.login.trim(),
                &hash,
                data.display_name.as_deref(),
                data.role.unwrap_or(StaffRole::Staff),
            )
            .await?;
        tracing::info!("Created staff account {} ({})", staff.login, staff.role);
        Ok(staff)
    }

    /// Create the configured admin account when no staff exists yet
    pub async fn ensure_bootstrap_admin(&self) -> AppResult<()> {
        let (Some(login), Some(password)) = (
            self.config.bootstrap_login.as_deref(),
            self.config.bootstrap_password.as_deref(),
        ) else {
            return Ok(());
        };

        if self.repository.staff.count().await? > 0 {
            return Ok(());
        }

        let hash = hash_password(password)?;
        self.repository
            .staff
            .create(login, &hash, Some("Administrator"), StaffRole::Admin)
            .await?;
        tracing::warn!("Created bootstrap admin account '{}'; change its password", login);
        Ok(())
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a password against a stored Argon2 hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("kennel-keeper").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, "kennel-keeper").unwrap());
        assert!(!verify_password(&hash, "wrong").unwrap());
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(verify_password("plaintext", "plaintext").is_err());
    }
}
