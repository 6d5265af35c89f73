use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::users::models::{User, UserRole};
use crate::shared::validation::{validate_not_blank, WHATSAPP_REGEX};

/// Public view of a user account (never includes the password hash)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponseDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub whatsapp: Option<String>,
    pub address: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponseDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            whatsapp: u.whatsapp,
            address: u.address,
            role: u.role,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Partial profile update. Omitted fields keep their value; an empty
/// `whatsapp` or `address` clears it.
#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[validate(
        custom(function = "validate_not_blank", message = "Name is required."),
        length(max = 255, message = "Name must not exceed 255 characters.")
    )]
    pub name: Option<String>,

    #[validate(
        email(message = "Please enter a valid email address."),
        length(max = 255, message = "Email must not exceed 255 characters.")
    )]
    pub email: Option<String>,

    pub whatsapp: Option<String>,

    #[validate(length(max = 1000, message = "Address must not exceed 1000 characters."))]
    pub address: Option<String>,
}

impl UpdateProfileDto {
    /// `whatsapp` is checked by hand because an empty string means "clear"
    pub fn validate_all(&self) -> Result<(), validator::ValidationErrors> {
        let mut result = self.validate();

        if let Some(number) = self.whatsapp.as_deref().map(str::trim) {
            if !number.is_empty() && !WHATSAPP_REGEX.is_match(number) {
                let mut errors = result.err().unwrap_or_else(validator::ValidationErrors::new);
                let mut err = validator::ValidationError::new("regex");
                err.message = Some("Please enter a valid WhatsApp number.".into());
                errors.add("whatsapp", err);
                result = Err(errors);
            }
        }

        result
    }
}

/// Request DTO for changing the current user's password
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordDto {
    #[validate(length(min = 1, message = "Current password is required."))]
    pub current_password: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters."))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Password confirmation does not match."))]
    pub password_confirmation: String,
}

/// Trim an optional text field, mapping blank input to `None`
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_update_is_valid() {
        assert!(UpdateProfileDto::default().validate_all().is_ok());
    }

    #[test]
    fn test_empty_whatsapp_clears_without_error() {
        let dto = UpdateProfileDto {
            whatsapp: Some(String::new()),
            ..Default::default()
        };
        assert!(dto.validate_all().is_ok());
    }

    #[test]
    fn test_invalid_whatsapp_and_email_are_reported() {
        let dto = UpdateProfileDto {
            email: Some("nope".to_string()),
            whatsapp: Some("abc".to_string()),
            ..Default::default()
        };
        let errors = dto.validate_all().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("whatsapp"));
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let dto = UpdateProfileDto {
            name: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(dto.validate_all().is_err());
    }

    #[test]
    fn test_blank_to_none() {
        assert_eq!(blank_to_none(Some("  ".to_string())), None);
        assert_eq!(
            blank_to_none(Some(" Jl. Sudirman ".to_string())),
            Some("Jl. Sudirman".to_string())
        );
        assert_eq!(blank_to_none(None), None);
    }

    #[test]
    fn test_change_password_requires_matching_confirmation() {
        let dto = ChangePasswordDto {
            current_password: "old-password".to_string(),
            password: "new-password".to_string(),
            password_confirmation: "other-password".to_string(),
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password_confirmation"));
    }
}
