//! Access decisions over already-verified token claims.
//!
//! None of these touch the database.

use thiserror::Error;

use crate::models::user::UserChanges;
use crate::services::tokens::Claims;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Missing, malformed, expired or forged token.
    #[error("Unauthorized")]
    Unauthenticated,

    /// Valid identity without the required privilege.
    #[error("Unauthorized: {0}")]
    Forbidden(String),

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

pub fn require_admin(claims: &Claims) -> Result<(), AuthError> {
    if claims.is_admin {
        Ok(())
    } else {
        Err(AuthError::Forbidden("admin privileges required".to_string()))
    }
}

/// Authorized iff the caller is an admin or is `target_username`.
pub fn require_self_or_admin(claims: &Claims, target_username: &str) -> Result<(), AuthError> {
    if claims.is_admin || claims.username == target_username {
        Ok(())
    } else {
        Err(AuthError::Forbidden(format!(
            "not permitted to access user {target_username}"
        )))
    }
}

/// Field-level gate for profile updates, applied after [`require_self_or_admin`].
///
/// With `restrict_admin_field` set, only admins may change `isAdmin`.
pub fn require_field_access(
    claims: &Claims,
    changes: &UserChanges,
    restrict_admin_field: bool,
) -> Result<(), AuthError> {
    if restrict_admin_field && changes.is_admin.is_some() && !claims.is_admin {
        return Err(AuthError::Forbidden(
            "only admins may change isAdmin".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(username: &str, is_admin: bool) -> Claims {
        Claims {
            username: username.to_string(),
            is_admin,
            iat: 0,
            exp: 0,
        }
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&claims("admin", true)).is_ok());
        assert!(matches!(
            require_admin(&claims("u1", false)),
            Err(AuthError::Forbidden(_))
        ));
    }

    #[test]
    fn test_self_or_admin() {
        assert!(require_self_or_admin(&claims("u1", false), "u1").is_ok());
        assert!(require_self_or_admin(&claims("admin", true), "u1").is_ok());
        assert!(require_self_or_admin(&claims("u2", false), "u1").is_err());
    }

    #[test]
    fn test_self_or_admin_is_case_sensitive() {
        assert!(require_self_or_admin(&claims("U1", false), "u1").is_err());
    }

    #[test]
    fn test_field_access_for_is_admin() {
        let promote = UserChanges {
            is_admin: Some(true),
            ..UserChanges::default()
        };
        let rename = UserChanges {
            first_name: Some("New".to_string()),
            ..UserChanges::default()
        };

        assert!(require_field_access(&claims("u1", false), &promote, true).is_err());
        assert!(require_field_access(&claims("u1", false), &promote, false).is_ok());
        assert!(require_field_access(&claims("admin", true), &promote, true).is_ok());
        assert!(require_field_access(&claims("u1", false), &rename, true).is_ok());
    }
}
