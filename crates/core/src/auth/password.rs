//! Password hashing with Argon2id and account credential rules.

use argon2::{
    Argon2, PasswordHash,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Shortest accepted nickname, in characters.
pub const MIN_NICKNAME_LEN: usize = 2;

/// Shortest accepted password, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Failed to hash password.
    #[error("failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password.
    #[error("failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format.
    #[error("invalid password hash format")]
    InvalidHash,
}

/// Rejected account credentials.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// Nickname is blank.
    #[error("Nickname is required")]
    NicknameRequired,

    /// Nickname is shorter than the minimum.
    #[error("Nickname must be at least {MIN_NICKNAME_LEN} characters")]
    NicknameTooShort,

    /// Password is shorter than the minimum.
    #[error("Password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,
}

/// Checks a nickname for a new account and returns it trimmed.
///
/// # Errors
///
/// Returns `CredentialError` when the nickname is blank or too short.
pub fn validate_nickname(nickname: &str) -> Result<&str, CredentialError> {
    let trimmed = nickname.trim();
    if trimmed.is_empty() {
        return Err(CredentialError::NicknameRequired);
    }
    if trimmed.chars().count() < MIN_NICKNAME_LEN {
        return Err(CredentialError::NicknameTooShort);
    }
    Ok(trimmed)
}

/// Checks a new password against the minimum length.
///
/// # Errors
///
/// Returns `CredentialError::PasswordTooShort` for short passwords.
pub fn validate_password(password: &str) -> Result<(), CredentialError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CredentialError::PasswordTooShort);
    }
    Ok(())
}

/// Hashes a password using Argon2id and returns the PHC string.
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails.
///
/// # Example
///
/// ```
/// use shootlogix_core::auth::hash_password;
///
/// let hash = hash_password("@dm1NKL").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Verifies a password against a stored PHC hash.
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` if the hash format is invalid.
/// Returns `PasswordError::VerifyError` if verification fails unexpectedly.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Tr@nsp0kl").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("Tr@nsp0kl", &hash).unwrap());
        assert!(!verify_password("tr@nsp0kl", &hash).unwrap());
    }

    #[test]
    fn test_salted_hashes_differ() {
        let hash1 = hash_password("Re@derKL1").unwrap();
        let hash2 = hash_password("Re@derKL1").unwrap();
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_invalid_hash_format() {
        let result = verify_password("password", "$2b$12$not-an-argon-hash");
        assert!(matches!(result, Err(PasswordError::InvalidHash)));
    }

    #[rstest]
    #[case("", Err(CredentialError::NicknameRequired))]
    #[case("   ", Err(CredentialError::NicknameRequired))]
    #[case("A", Err(CredentialError::NicknameTooShort))]
    #[case(" AB ", Ok("AB"))]
    #[case("TRANSPORT", Ok("TRANSPORT"))]
    fn test_validate_nickname(
        #[case] input: &str,
        #[case] expected: Result<&str, CredentialError>,
    ) {
        assert_eq!(validate_nickname(input), expected);
    }

    #[rstest]
    #[case("12345", false)]
    #[case("123456", true)]
    #[case("UN1Tkl@", true)]
    fn test_validate_password(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(validate_password(input).is_ok(), ok);
    }
}
