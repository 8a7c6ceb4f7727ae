// storefront/src/services/auth_service.rs

//! Password hashing and credential checks.

use crate::errors::AppError;
use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use tracing::{debug, error, instrument, warn};
use uuid::Uuid;

/// Normalizes and checks sign-up input. Returns the lowercased email.
pub fn validate_credentials(email: &str, password: &str, min_password_len: usize) -> Result<String, AppError> {
  let email = email.trim().to_lowercase();
  if email.is_empty() || !email.contains('@') {
    warn!("Invalid email format provided.");
    return Err(AppError::Validation("Valid email is required.".to_string()));
  }
  if password.chars().count() < min_password_len {
    warn!("Password too short ({} chars).", password.chars().count());
    return Err(AppError::Validation(format!(
      "Password must be at least {} characters long.",
      min_password_len
    )));
  }
  Ok(email)
}

#[instrument(name = "auth_service::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String, AppError> {
  if password.is_empty() {
    return Err(AppError::Validation("Password cannot be empty for hashing.".to_string()));
  }
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|argon_err| {
      error!(error = %argon_err, "Argon2 password hashing failed.");
      AppError::Internal(format!("Password hashing process failed: {}", argon_err))
    })
}

/// `Ok(false)` on a wrong password; errors only for a malformed stored hash.
#[instrument(name = "auth_service::verify_password", skip_all, err(Display), fields(hash_len = stored_hash.len()))]
pub fn verify_password(stored_hash: &str, provided_password: &str) -> Result<bool, AppError> {
  if provided_password.is_empty() {
    return Ok(false);
  }
  let parsed_hash = PasswordHash::new(stored_hash).map_err(|parse_err| {
    error!(error = %parse_err, "Failed to parse stored password hash string.");
    AppError::Internal(format!("Invalid stored password hash format: {}", parse_err))
  })?;

  match Argon2::default().verify_password(provided_password.as_bytes(), &parsed_hash) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => {
      debug!("Password verification failed: Passwords do not match.");
      Ok(false)
    }
    Err(other_argon_err) => {
      error!(error = %other_argon_err, "Argon2 password verification process encountered an error.");
      Err(AppError::Internal(format!(
        "Password verification process failed: {}",
        other_argon_err
      )))
    }
  }
}

/// Opaque bearer token for a new session.
pub fn new_session_token() -> String {
  format!("sf_{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_then_verify() {
    let hash = hash_password("hunter22").unwrap();
    assert!(verify_password(&hash, "hunter22").unwrap());
    assert!(!verify_password(&hash, "hunter23").unwrap());
    assert!(!verify_password(&hash, "").unwrap());
  }

  #[test]
  fn credentials_are_normalized_and_checked() {
    assert_eq!(
      validate_credentials("  Asha@Example.COM ", "secret", 6).unwrap(),
      "asha@example.com"
    );
    assert!(validate_credentials("not-an-email", "secret", 6).is_err());
    assert!(validate_credentials("a@b.c", "short", 6).is_err());
  }

  #[test]
  fn tokens_are_unique() {
    assert_ne!(new_session_token(), new_session_token());
  }
}
