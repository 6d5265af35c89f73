use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{AuthResponseDto, LoginRequestDto, RegisterRequestDto};
use crate::features::auth::jwt::JwtManager;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::password::{hash_password, verify_password};
use crate::features::users::dtos::UserResponseDto;
use crate::features::users::models::{NewUser, User, UserRole};
use crate::features::users::UserService;

const INVALID_CREDENTIALS: &str = "These credentials do not match our records.";

/// Service for authentication operations (register, login)
pub struct AuthService {
    users: Arc<UserService>,
    jwt: Arc<JwtManager>,
}

impl AuthService {
    pub fn new(users: Arc<UserService>, jwt: Arc<JwtManager>) -> Self {
        Self { users, jwt }
    }

    /// Register a new customer account
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<AuthResponseDto> {
        let password_hash = hash_password(dto.password).await?;

        let user = self
            .users
            .create(NewUser {
                name: dto.name,
                email: dto.email,
                password_hash,
                whatsapp: dto.whatsapp,
                address: dto.address,
                role: UserRole::User,
            })
            .await?;

        tracing::info!("Registered user {}", user.id);
        self.token_response(user)
    }

    /// Login with email and password
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let user = self
            .users
            .find_by_email(&dto.email)
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(dto.password, user.password_hash.clone()).await? {
            tracing::debug!("Failed login for user {}", user.id);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        self.token_response(user)
    }

    /// Get current user info (for /me endpoint)
    pub async fn get_current_user(&self, user: &AuthenticatedUser) -> Result<UserResponseDto> {
        let account = self
            .users
            .find_by_id(user.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))?;
        Ok(account.into())
    }

    fn token_response(&self, user: User) -> Result<AuthResponseDto> {
        let access_token = self.jwt.issue(&user)?;
        Ok(AuthResponseDto {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.ttl_secs(),
            user: user.into(),
        })
    }
}
