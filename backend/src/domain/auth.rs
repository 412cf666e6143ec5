//! Authentication primitives such as bearer session tokens.
//!
//! Keep header parsing outside the domain by exposing constructors that
//! validate raw strings before a handler talks to the session verifier port.

use std::fmt;

use zeroize::Zeroizing;

/// Domain error returned when a bearer token is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionTokenValidationError {
    /// Token was missing or blank once trimmed.
    #[error("session token must not be empty")]
    Empty,
    /// Token contained interior whitespace or control characters.
    #[error("session token must not contain whitespace or control characters")]
    InvalidCharacters,
}

/// Opaque bearer token issued by the identity service.
///
/// ## Invariants
/// - Surrounding whitespace is trimmed and the remainder is non-empty.
/// - No interior whitespace or control characters.
///
/// The raw value is zeroed on drop and never printed by `Debug`.
///
/// # Examples
/// ```
/// use pools::domain::SessionToken;
///
/// let token = SessionToken::try_new("  abc123  ").unwrap();
/// assert_eq!(token.expose(), "abc123");
/// assert_eq!(format!("{token:?}"), "SessionToken(<redacted>)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(Zeroizing<String>);

impl SessionToken {
    /// Validate a raw bearer token value.
    pub fn try_new(raw: &str) -> Result<Self, SessionTokenValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SessionTokenValidationError::Empty);
        }
        if trimmed
            .chars()
            .any(|ch| ch.is_whitespace() || ch.is_control())
        {
            return Err(SessionTokenValidationError::InvalidCharacters);
        }
        Ok(Self(Zeroizing::new(trimmed.to_owned())))
    }

    /// Raw token value, for adapters that need to fingerprint it.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}
