//! Password verification using Argon2id.

use std::borrow::Cow;

use argon2::{Argon2, PasswordVerifier};
use vouch_core::error::VouchError;

/// Prepend the optional server-side pepper to the password bytes.
fn peppered<'a>(password: &'a str, pepper: Option<&str>) -> Cow<'a, [u8]> {
    match pepper {
        Some(p) => Cow::Owned(format!("{p}{password}").into_bytes()),
        None => Cow::Borrowed(password.as_bytes()),
    }
}

/// Verify a plaintext password against an Argon2id PHC-format hash.
///
/// The pepper, if any, must match the one used during hashing. Returns
/// `Ok(true)` on match, `Ok(false)` on mismatch, or an error if the
/// stored hash is malformed.
pub fn verify_password(
    password: &str,
    hash: &str,
    pepper: Option<&str>,
) -> Result<bool, VouchError> {
    let parsed_hash = argon2::PasswordHash::new(hash)
        .map_err(|e| VouchError::Internal(format!("invalid hash format: {e}")))?;

    match Argon2::default().verify_password(&peppered(password, pepper), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(VouchError::Internal(format!("verify error: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::PasswordHasher;
    use argon2::password_hash::SaltString;
    use argon2::password_hash::rand_core::OsRng;

    fn hash(password: &str, pepper: Option<&str>) -> String {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(&peppered(password, pepper), &salt)
            .expect("hashing failed")
            .to_string()
    }

    #[test]
    fn verifies_matching_password() {
        let stored = hash("hunter2", None);
        assert!(verify_password("hunter2", &stored, None).unwrap());
    }

    #[test]
    fn rejects_wrong_password() {
        let stored = hash("hunter2", None);
        assert!(!verify_password("wrong", &stored, None).unwrap());
    }

    #[test]
    fn pepper_changes_the_input() {
        let stored = hash("hunter2", Some("pepper!"));
        assert!(verify_password("hunter2", &stored, Some("pepper!")).unwrap());
        assert!(!verify_password("hunter2", &stored, None).unwrap());
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(verify_password("pw", "not-a-hash", None).is_err());
    }
}
