use base64::Engine;
use common::{text, User};
use rand::thread_rng;
use rand::RngCore;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum LoginError {
    #[error("User not found")]
    UserNotFound,
    #[error("Invalid password")]
    InvalidPassword,
}

/// Plaintext credential check against the staff collection.
///
/// Both sides are trimmed before comparing. The first user whose username
/// matches decides the outcome. Stored values that are not strings never
/// match.
pub fn authenticate<'a>(
    users: &'a [User],
    username: &str,
    password: &str,
) -> Result<&'a User, LoginError> {
    let username = username.trim();
    let user = users
        .iter()
        .find(|u| text(&u.username).map(str::trim) == Some(username))
        .ok_or(LoginError::UserNotFound)?;

    if text(&user.password).map(str::trim) != Some(password.trim()) {
        return Err(LoginError::InvalidPassword);
    }
    Ok(user)
}

/// Opaque one-off token handed back on login. Nothing stores or checks it.
pub fn new_auth_token() -> String {
    let mut bytes = [0u8; 16];
    thread_rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}
