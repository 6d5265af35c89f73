use sqlx::PgPool;
use uuid::Uuid;

use crate::core::config::AdminSeedConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::password::{hash_password, verify_password};
use crate::features::users::dtos::{
    blank_to_none, ChangePasswordDto, UpdateProfileDto, UserResponseDto,
};
use crate::features::users::models::{NewUser, User, UserRole};

pub(crate) const USER_COLUMNS: &str =
    "id, name, email, password_hash, whatsapp, address, role, created_at, updated_at";

const EMAIL_TAKEN: &str = "The email has already been taken.";

/// Emails are stored trimmed and lowercased so lookups are case-insensitive
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Service for user accounts
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get user by id: {:?}", e);
                AppError::Database(e)
            })
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get user by email: {:?}", e);
            AppError::Database(e)
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<User> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn create(&self, new_user: NewUser) -> Result<User> {
        let email = normalize_email(&new_user.email);

        if self.find_by_email(&email).await?.is_some() {
            return Err(AppError::field("email", EMAIL_TAKEN));
        }

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, name, email, password_hash, whatsapp, address, role)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(Uuid::now_v7())
        .bind(new_user.name.trim())
        .bind(&email)
        .bind(&new_user.password_hash)
        .bind(blank_to_none(new_user.whatsapp))
        .bind(blank_to_none(new_user.address))
        .bind(new_user.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create user: {:?}", e);
            AppError::from_db(e, EMAIL_TAKEN)
        })?;

        tracing::info!("Created user {} with role {:?}", user.id, user.role);
        Ok(user)
    }

    /// Create the bootstrap admin account unless the email is already registered
    pub async fn ensure_admin(&self, seed: &AdminSeedConfig) -> Result<()> {
        if let Some(existing) = self.find_by_email(&seed.email).await? {
            tracing::info!(
                "Admin seed skipped, {} already exists with role {:?}",
                existing.email,
                existing.role
            );
            return Ok(());
        }

        let password_hash = hash_password(seed.password.clone()).await?;
        self.create(NewUser {
            name: seed.name.clone(),
            email: seed.email.clone(),
            password_hash,
            whatsapp: None,
            address: None,
            role: UserRole::Admin,
        })
        .await?;

        Ok(())
    }

    /// Current user's profile
    pub async fn get_profile(&self, user_id: Uuid) -> Result<UserResponseDto> {
        Ok(self.get(user_id).await?.into())
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        dto: UpdateProfileDto,
    ) -> Result<UserResponseDto> {
        let current = self.get(user_id).await?;

        let email = match dto.email {
            Some(ref e) => normalize_email(e),
            None => current.email.clone(),
        };

        if email != current.email {
            let taken = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND id <> $2)",
            )
            .bind(&email)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to check email uniqueness: {:?}", e);
                AppError::Database(e)
            })?;

            if taken {
                return Err(AppError::field("email", EMAIL_TAKEN));
            }
        }

        let name = dto
            .name
            .map(|n| n.trim().to_string())
            .unwrap_or(current.name);
        let whatsapp = match dto.whatsapp {
            Some(w) => blank_to_none(Some(w)),
            None => current.whatsapp,
        };
        let address = match dto.address {
            Some(a) => blank_to_none(Some(a)),
            None => current.address,
        };

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET name = $2, email = $3, whatsapp = $4, address = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(user_id)
        .bind(&name)
        .bind(&email)
        .bind(whatsapp)
        .bind(address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update profile: {:?}", e);
            AppError::from_db(e, EMAIL_TAKEN)
        })?;

        tracing::info!("Updated profile of user {}", user_id);
        Ok(user.into())
    }

    pub async fn change_password(&self, user_id: Uuid, dto: ChangePasswordDto) -> Result<()> {
        let user = self.get(user_id).await?;

        if !verify_password(dto.current_password, user.password_hash).await? {
            return Err(AppError::field(
                "current_password",
                "The current password is incorrect.",
            ));
        }

        let password_hash = hash_password(dto.password).await?;

        sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .bind(&password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update password: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!("Changed password of user {}", user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ayu@Example.COM "), "ayu@example.com");
    }
}
