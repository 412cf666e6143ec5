//! Pool domain service.
//!
//! Implements the pool driving ports on top of [`PoolRepository`]. Input
//! validation happens here so every inbound adapter shares it; atomicity of
//! create and join is delegated to the repository.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    CreatePoolRequest, CreatePoolResponse, GetPoolRequest, GetPoolResponse, JoinPoolRequest,
    JoinPoolResponse, ListPoolsRequest, ListPoolsResponse, PoolCommand, PoolQuery,
    PoolRepository, PoolRepositoryError,
};
use crate::domain::{Error, JoinCode, JoinOutcome, NewPool, PoolId, PoolTitle, PoolValidationError};

pub(crate) const POOL_NOT_FOUND_MESSAGE: &str = "Poll not found.";
pub(crate) const ALREADY_JOINED_MESSAGE: &str = "You already joined this poll.";

fn map_repository_error(error: PoolRepositoryError) -> Error {
    match error {
        PoolRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("pool repository unavailable: {message}"))
        }
        PoolRepositoryError::Query { message } => {
            Error::internal(format!("pool repository error: {message}"))
        }
        PoolRepositoryError::DuplicateCode { code } => {
            warn!(%code, "generated join code collided with an existing pool");
            Error::conflict("generated join code is already in use; try again")
                .with_details(json!({ "code": "duplicate_code" }))
        }
    }
}

fn validation_error(field: &str, error: &PoolValidationError) -> Error {
    let code = match error {
        PoolValidationError::InvalidId => "invalid_uuid",
        PoolValidationError::EmptyTitle | PoolValidationError::EmptyCode => "missing_field",
        PoolValidationError::TitleTooLong { .. } => "too_long",
        PoolValidationError::MalformedCode { .. } => "invalid_code",
    };
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": field,
        "code": code,
    }))
}

fn join_rejection(message: &str, code: &str) -> Error {
    Error::invalid_request(message).with_details(json!({ "code": code }))
}

/// Pool service implementing [`PoolCommand`] and [`PoolQuery`].
#[derive(Clone)]
pub struct PoolService<R> {
    pool_repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> PoolService<R> {
    /// Create a new service over the pool repository.
    pub fn new(pool_repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { pool_repo, clock }
    }
}

#[async_trait]
impl<R> PoolCommand for PoolService<R>
where
    R: PoolRepository,
{
    async fn create_pool(&self, request: CreatePoolRequest) -> Result<CreatePoolResponse, Error> {
        let title =
            PoolTitle::new(&request.title).map_err(|err| validation_error("title", &err))?;
        // ThreadRng is not Send; keep it out of the await below.
        let code = JoinCode::generate(&mut rand::thread_rng());
        let pool = NewPool {
            id: PoolId::random(),
            title,
            code,
            owner: request.owner,
            created_at: self.clock.utc(),
        };

        self.pool_repo
            .create(&pool)
            .await
            .map_err(map_repository_error)?;

        Ok(CreatePoolResponse {
            pool_id: pool.id,
            code: pool.code,
        })
    }

    async fn join_pool(&self, request: JoinPoolRequest) -> Result<JoinPoolResponse, Error> {
        let code = JoinCode::parse(&request.code).map_err(|err| validation_error("code", &err))?;

        let outcome = self
            .pool_repo
            .join(&code, &request.user_id)
            .await
            .map_err(map_repository_error)?;

        match outcome {
            JoinOutcome::Joined {
                pool_id,
                claimed_ownership,
            } => {
                if claimed_ownership {
                    info!(%pool_id, user_id = %request.user_id, "ownerless pool claimed on join");
                }
                Ok(JoinPoolResponse {
                    pool_id,
                    claimed_ownership,
                })
            }
            JoinOutcome::AlreadyJoined => {
                Err(join_rejection(ALREADY_JOINED_MESSAGE, "already_joined"))
            }
            JoinOutcome::PoolNotFound => {
                Err(join_rejection(POOL_NOT_FOUND_MESSAGE, "pool_not_found"))
            }
        }
    }
}

#[async_trait]
impl<R> PoolQuery for PoolService<R>
where
    R: PoolRepository,
{
    async fn count_pools(&self) -> Result<u64, Error> {
        self.pool_repo.count().await.map_err(map_repository_error)
    }

    async fn list_pools(&self, request: ListPoolsRequest) -> Result<ListPoolsResponse, Error> {
        let pools = self
            .pool_repo
            .list_for_participant(&request.user_id)
            .await
            .map_err(map_repository_error)?;
        Ok(ListPoolsResponse { pools })
    }

    async fn get_pool(&self, request: GetPoolRequest) -> Result<GetPoolResponse, Error> {
        let pool = self
            .pool_repo
            .find_summary(&request.pool_id)
            .await
            .map_err(map_repository_error)?;
        Ok(GetPoolResponse { pool })
    }
}

#[cfg(test)]
#[path = "pool_service_tests.rs"]
mod tests;
