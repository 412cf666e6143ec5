//! Driving port for pool mutations.
//!
//! Inbound adapters hand over raw titles and codes; the implementation owns
//! validation so every transport gets the same rules.

use async_trait::async_trait;

use crate::domain::{Error, JoinCode, PoolId, UserId};

/// Request to create a pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePoolRequest {
    /// Title as typed by the caller; trimmed during validation.
    pub title: String,
    /// Verified caller, or `None` for anonymous creation.
    pub owner: Option<UserId>,
}

/// Response for a created pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePoolResponse {
    pub pool_id: PoolId,
    pub code: JoinCode,
}

/// Request to join a pool by its code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinPoolRequest {
    pub code: String,
    pub user_id: UserId,
}

/// Response for a successful join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinPoolResponse {
    pub pool_id: PoolId,
    pub claimed_ownership: bool,
}

/// Driving port for pool mutations.
///
/// # Examples
///
/// ```rust,no_run
/// # async fn example() -> Result<(), pools::domain::Error> {
/// use pools::domain::ports::{CreatePoolRequest, FixturePoolCommand, PoolCommand};
///
/// let response = FixturePoolCommand
///     .create_pool(CreatePoolRequest {
///         title: "World Cup".to_owned(),
///         owner: None,
///     })
///     .await?;
/// assert_eq!(response.code.as_ref().len(), 6);
/// # Ok(())
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PoolCommand: Send + Sync {
    /// Create a pool with a freshly generated join code.
    async fn create_pool(&self, request: CreatePoolRequest) -> Result<CreatePoolResponse, Error>;

    /// Join the pool carrying `request.code`.
    ///
    /// Missing pools and repeated joins fail with `invalid_request` errors
    /// whose details carry `pool_not_found` or `already_joined`.
    async fn join_pool(&self, request: JoinPoolRequest) -> Result<JoinPoolResponse, Error>;
}

/// Fixture command implementation for tests that do not need persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePoolCommand;

#[async_trait]
impl PoolCommand for FixturePoolCommand {
    async fn create_pool(&self, _request: CreatePoolRequest) -> Result<CreatePoolResponse, Error> {
        let code = JoinCode::parse("FIX001")
            .map_err(|err| Error::internal(format!("invalid fixture code: {err}")))?;
        Ok(CreatePoolResponse {
            pool_id: PoolId::random(),
            code,
        })
    }

    async fn join_pool(&self, _request: JoinPoolRequest) -> Result<JoinPoolResponse, Error> {
        Err(Error::invalid_request("Poll not found."))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;

    #[tokio::test]
    async fn fixture_create_returns_a_code() {
        let response = FixturePoolCommand
            .create_pool(CreatePoolRequest {
                title: "Anything".to_owned(),
                owner: None,
            })
            .await
            .expect("fixture create succeeds");
        assert_eq!(response.code.as_ref(), "FIX001");
    }

    #[tokio::test]
    async fn fixture_join_rejects() {
        let error = FixturePoolCommand
            .join_pool(JoinPoolRequest {
                code: "FIX001".to_owned(),
                user_id: UserId::random(),
            })
            .await
            .expect_err("fixture join fails");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }
}
