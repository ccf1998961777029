use super::ApiError;
use crate::models::user::{NewUser, UserChanges};

const USERNAME_MAX: usize = 30;
const PASSWORD_MIN: usize = 5;
const PASSWORD_MAX: usize = 60;
const NAME_MAX: usize = 30;
const EMAIL_MIN: usize = 6;
const EMAIL_MAX: usize = 60;

pub fn validate_username(username: &str) -> Result<(), ApiError> {
    if username.is_empty() {
        return Err(ApiError::validation("username is required"));
    }

    if username.chars().count() > USERNAME_MAX {
        return Err(ApiError::validation(format!(
            "username must be {USERNAME_MAX} characters or less"
        )));
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
    {
        return Err(ApiError::validation(
            "username can only contain letters, numbers, underscores, hyphens, and dots",
        ));
    }

    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ApiError> {
    let len = password.chars().count();
    if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&len) {
        return Err(ApiError::validation(format!(
            "password must be between {PASSWORD_MIN} and {PASSWORD_MAX} characters"
        )));
    }
    Ok(())
}

pub fn validate_name(field: &str, value: &str) -> Result<(), ApiError> {
    let len = value.trim().chars().count();
    if len == 0 || value.chars().count() > NAME_MAX {
        return Err(ApiError::validation(format!(
            "{field} must be between 1 and {NAME_MAX} characters"
        )));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ApiError> {
    let len = email.chars().count();
    if !(EMAIL_MIN..=EMAIL_MAX).contains(&len) {
        return Err(ApiError::validation(format!(
            "email must be between {EMAIL_MIN} and {EMAIL_MAX} characters"
        )));
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && domain.contains('.')
        }
        None => false,
    };

    if !valid {
        return Err(ApiError::validation("email is not a valid address"));
    }

    Ok(())
}

pub fn validate_new_user(user: &NewUser) -> Result<(), ApiError> {
    validate_username(&user.username)?;
    validate_password(&user.password)?;
    validate_name("firstName", &user.first_name)?;
    validate_name("lastName", &user.last_name)?;
    validate_email(&user.email)?;
    Ok(())
}

/// Checks the fields present in a sparse update. An empty update is left for
/// the user service to reject.
pub fn validate_changes(changes: &UserChanges) -> Result<(), ApiError> {
    if let Some(first_name) = &changes.first_name {
        validate_name("firstName", first_name)?;
    }
    if let Some(last_name) = &changes.last_name {
        validate_name("lastName", last_name)?;
    }
    if let Some(password) = &changes.password {
        validate_password(password)?;
    }
    if let Some(email) = &changes.email {
        validate_email(email)?;
    }
    Ok(())
}

pub fn validate_search_query(query: &str) -> Result<&str, ApiError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Search query cannot be empty"));
    }
    Ok(trimmed)
}
