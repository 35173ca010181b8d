use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub const DATE_OF_BIRTH_FORMAT: &str = "%Y-%m-%d";

lazy_static! {
    static ref E164_PHONE: Regex = Regex::new(r"^\+[1-9]\d{1,14}$").unwrap();
}

// =============================================================================
// REGISTER
// =============================================================================

/// Optional profile fields stay `None` unless the client sent them.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterRequest {
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters long"))]
    pub password: String,
    #[validate(length(min = 1, message = "firstName is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "lastName is required"))]
    pub last_name: String,
    pub display_name: Option<String>,
    #[validate(url(message = "avatarUrl must be a valid URL"))]
    pub avatar_url: Option<String>,
    #[validate(length(max = 500, message = "bio must be at most 500 characters long"))]
    pub bio: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(custom(function = "validate_date_of_birth"))]
    pub date_of_birth: Option<String>,
    #[validate(custom(function = "validate_gender"))]
    pub gender: Option<String>,
    #[validate(length(equal = 2, message = "country must be exactly 2 characters long"))]
    pub country: Option<String>,
    #[validate(length(min = 1, message = "timezone must be a valid timezone"))]
    pub timezone: Option<String>,
    #[validate(length(equal = 2, message = "preferredLanguage must be exactly 2 characters long"))]
    pub preferred_language: Option<String>,
}

impl RegisterRequest {
    /// Parsed date of birth. Only meaningful after validation.
    pub fn parsed_date_of_birth(&self) -> Option<NaiveDate> {
        self.date_of_birth
            .as_deref()
            .and_then(|raw| NaiveDate::parse_from_str(raw, DATE_OF_BIRTH_FORMAT).ok())
    }
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if E164_PHONE.is_match(phone) {
        Ok(())
    } else {
        Err(ValidationError::new("e164")
            .with_message("phone must be in E.164 format".into()))
    }
}

fn validate_date_of_birth(raw: &str) -> Result<(), ValidationError> {
    NaiveDate::parse_from_str(raw, DATE_OF_BIRTH_FORMAT)
        .map(|_| ())
        .map_err(|_| {
            ValidationError::new("datetime")
                .with_message("dateOfBirth must be a valid date in format YYYY-MM-DD".into())
        })
}

fn validate_gender(gender: &str) -> Result<(), ValidationError> {
    match gender {
        "male" | "female" | "other" => Ok(()),
        _ => Err(ValidationError::new("oneof")
            .with_message("gender must be one of: male, female, other".into())),
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// =============================================================================
// LOGIN
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

// =============================================================================
// REFRESH TOKEN
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenResponse {
    pub access_token: String,
}
