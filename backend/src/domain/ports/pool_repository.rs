//! Port for pool persistence and membership reads.
//!
//! Adapters own atomicity: `create` writes the pool and the owner's
//! participant row together, and `join` decides its [`JoinOutcome`] inside a
//! single transaction backed by the participant uniqueness constraint.

use async_trait::async_trait;

use crate::domain::{JoinCode, JoinOutcome, NewPool, PoolId, PoolSummary, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by pool repository adapters.
    pub enum PoolRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "pool repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "pool repository query failed: {message}",
        /// Another pool already holds the generated join code.
        DuplicateCode { code: String } =>
            "join code {code} is already in use",
    }
}

/// Port for writing pools and participants and reading pool summaries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PoolRepository: Send + Sync {
    /// Count every stored pool.
    async fn count(&self) -> Result<u64, PoolRepositoryError>;

    /// Persist a new pool, auto-joining its owner when one is present.
    async fn create(&self, pool: &NewPool) -> Result<(), PoolRepositoryError>;

    /// Add `user_id` to the pool identified by `code`, claiming ownership
    /// when the pool has none.
    async fn join(
        &self,
        code: &JoinCode,
        user_id: &UserId,
    ) -> Result<JoinOutcome, PoolRepositoryError>;

    /// List the pools the user participates in, newest first.
    async fn list_for_participant(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PoolSummary>, PoolRepositoryError>;

    /// Load one pool summary by id.
    async fn find_summary(
        &self,
        pool_id: &PoolId,
    ) -> Result<Option<PoolSummary>, PoolRepositoryError>;
}
