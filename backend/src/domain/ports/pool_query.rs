//! Driving port for pool read operations.

use async_trait::async_trait;

use crate::domain::{Error, PoolId, PoolSummary, UserId};

/// Request to list the caller's pools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPoolsRequest {
    pub user_id: UserId,
}

/// Pools the caller participates in, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPoolsResponse {
    pub pools: Vec<PoolSummary>,
}

/// Request to read one pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetPoolRequest {
    pub pool_id: PoolId,
}

/// Single pool lookup. `pool` is `None` when no pool has the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetPoolResponse {
    pub pool: Option<PoolSummary>,
}

/// Driving port for pool reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PoolQuery: Send + Sync {
    /// Total number of pools.
    async fn count_pools(&self) -> Result<u64, Error>;

    /// Pools the user has joined.
    async fn list_pools(&self, request: ListPoolsRequest) -> Result<ListPoolsResponse, Error>;

    /// Summary of one pool, regardless of membership.
    async fn get_pool(&self, request: GetPoolRequest) -> Result<GetPoolResponse, Error>;
}

/// Fixture query implementation returning an empty store.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePoolQuery;

#[async_trait]
impl PoolQuery for FixturePoolQuery {
    async fn count_pools(&self) -> Result<u64, Error> {
        Ok(0)
    }

    async fn list_pools(&self, _request: ListPoolsRequest) -> Result<ListPoolsResponse, Error> {
        Ok(ListPoolsResponse { pools: Vec::new() })
    }

    async fn get_pool(&self, _request: GetPoolRequest) -> Result<GetPoolResponse, Error> {
        Ok(GetPoolResponse { pool: None })
    }
}
