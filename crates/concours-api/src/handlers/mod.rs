//! Request handlers

pub mod auth;
pub mod classes;
pub mod judging;
pub mod profile;
pub mod settings;
pub mod system;
pub mod users;
pub mod vehicles;
pub mod vendor;
pub mod votes;

use axum::extract::Multipart;
use concours_media::MediaError;

use crate::error::ApiError;

/// Pull the single file field out of a multipart upload
///
/// An absent or empty field is the typed "no file" failure, distinct from a
/// file the pipeline later fails to decode.
pub(crate) async fn read_upload(mut multipart: Multipart) -> Result<(Vec<u8>, String), ApiError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Malformed upload: {}", e)))?
        .ok_or(ApiError::Media(MediaError::MissingFile))?;

    let content_type = field.content_type().unwrap_or("").to_string();
    let data = field
        .bytes()
        .await
        .map_err(|e| ApiError::Validation(format!("Failed to read upload: {}", e)))?;

    if data.is_empty() {
        return Err(ApiError::Media(MediaError::MissingFile));
    }

    Ok((data.to_vec(), content_type))
}

pub(crate) fn validate_username(username: &str) -> Result<(), ApiError> {
    if username.len() < 3 || username.len() > 64 {
        return Err(ApiError::Validation(
            "Username must be between 3 and 64 characters".to_string(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(ApiError::Validation(
            "Username may only contain letters, digits, '-', '_' and '.'".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_email(email: &str) -> Result<(), ApiError> {
    if !email.contains('@') || email.len() > 255 {
        return Err(ApiError::Validation("Invalid email address".to_string()));
    }
    Ok(())
}

pub(crate) fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() < 8 {
        return Err(ApiError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_validation() {
        assert!(validate_username("jdoe").is_ok());
        assert!(validate_username("j.doe-99_x").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username("semi;colon").is_err());
    }

    #[test]
    fn test_email_validation() {
        assert!(validate_email("a@b.example").is_ok());
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn test_password_validation() {
        assert!(validate_password("LongEnough1").is_ok());
        assert!(validate_password("short").is_err());
    }
}
