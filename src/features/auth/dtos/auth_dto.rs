use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::users::dtos::UserResponseDto;
use crate::shared::validation::{validate_not_blank, WHATSAPP_REGEX};

/// Request DTO for user registration
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[validate(
        custom(function = "validate_not_blank", message = "Name is required."),
        length(max = 255, message = "Name must not exceed 255 characters.")
    )]
    pub name: String,

    #[validate(
        email(message = "Please enter a valid email address."),
        length(max = 255, message = "Email must not exceed 255 characters.")
    )]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters."))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Password confirmation does not match."))]
    pub password_confirmation: String,

    #[validate(regex(path = *WHATSAPP_REGEX, message = "Please enter a valid WhatsApp number."))]
    pub whatsapp: Option<String>,

    #[validate(length(max = 1000, message = "Address must not exceed 1000 characters."))]
    pub address: Option<String>,
}

/// Request DTO for user login
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
}

/// Response DTO for authentication (register/login)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponseDto {
    /// HS256 access token
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token expiry time in seconds
    pub expires_in: i64,
    pub user: UserResponseDto,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::name::en::Name;
    use fake::Fake;

    fn valid_registration() -> RegisterRequestDto {
        RegisterRequestDto {
            name: Name().fake(),
            email: SafeEmail().fake(),
            password: "rahasia123".to_string(),
            password_confirmation: "rahasia123".to_string(),
            whatsapp: Some("+6281234567890".to_string()),
            address: None,
        }
    }

    #[test]
    fn test_valid_registration_passes() {
        assert!(valid_registration().validate().is_ok());
    }

    #[test]
    fn test_password_confirmation_must_match() {
        let dto = RegisterRequestDto {
            password_confirmation: "different1".to_string(),
            ..valid_registration()
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password_confirmation"));
    }

    #[test]
    fn test_registration_rejects_bad_fields() {
        let dto = RegisterRequestDto {
            name: "   ".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            password_confirmation: "short".to_string(),
            whatsapp: Some("call me".to_string()),
            address: None,
        };
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("whatsapp"));
    }
}
