use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Hash a password with Argon2id and a fresh random salt. The returned PHC
/// string embeds the algorithm, parameters and salt, so verification needs
/// nothing but the stored string.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Check a candidate password against a stored PHC string.
///
/// A hash that cannot be parsed counts as a failed match rather than an
/// error, so a corrupted row behaves like a wrong password instead of
/// leaking a 500.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(parsed) => parsed,
        Err(error) => {
            tracing::warn!(error = %error, "stored password hash failed to parse");
            return false;
        }
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
