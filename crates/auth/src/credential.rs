//! Bearer credential extraction from the transport authorization header.

use crate::error::AuthError;

/// Extract the bearer token from an `Authorization` header value.
///
/// Recognizes exactly `Bearer <token>`: case-sensitive scheme keyword, a
/// single space, a non-empty token, and nothing after it. Everything else,
/// including an absent header, is a [`AuthError::MissingCredential`] failure.
/// Pure; no side effects.
pub fn extract_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingCredential("authorization header absent"))?;

    let mut segments = header.split(' ');
    match (segments.next(), segments.next(), segments.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MissingCredential("expected 'Bearer <token>'")),
    }
}
