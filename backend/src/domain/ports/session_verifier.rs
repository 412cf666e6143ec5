//! Port resolving bearer session tokens to user identities.
//!
//! Sessions are issued elsewhere; this side only checks that a presented
//! token maps to a live session. Unknown and expired tokens are not errors:
//! they resolve to `None` so callers decide whether anonymity is acceptable.

use async_trait::async_trait;

use crate::domain::{Error, SessionToken, UserId};

/// Token accepted by [`FixtureSessionVerifier`].
pub const FIXTURE_SESSION_TOKEN: &str = "fixture-session-token";
/// User returned by [`FixtureSessionVerifier`] for [`FIXTURE_SESSION_TOKEN`].
pub const FIXTURE_SESSION_USER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

/// Domain port for bearer session verification.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    /// Resolve `token` to the user owning a live session.
    ///
    /// Returns `Ok(None)` for unknown or expired tokens and `Err` only when
    /// verification itself could not run.
    async fn verify(&self, token: &SessionToken) -> Result<Option<UserId>, Error>;
}

/// In-memory verifier accepting a single well-known token.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSessionVerifier;

#[async_trait]
impl SessionVerifier for FixtureSessionVerifier {
    async fn verify(&self, token: &SessionToken) -> Result<Option<UserId>, Error> {
        if token.expose() != FIXTURE_SESSION_TOKEN {
            return Ok(None);
        }
        UserId::new(FIXTURE_SESSION_USER_ID)
            .map(Some)
            .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(FIXTURE_SESSION_TOKEN, Some(FIXTURE_SESSION_USER_ID))]
    #[case("someone-else", None)]
    #[tokio::test]
    async fn fixture_verifier_only_knows_its_token(
        #[case] raw: &str,
        #[case] expected: Option<&str>,
    ) {
        let token = SessionToken::try_new(raw).expect("token shape");
        let user = FixtureSessionVerifier
            .verify(&token)
            .await
            .expect("fixture verification runs");
        assert_eq!(user.map(String::from), expected.map(str::to_owned));
    }
}
