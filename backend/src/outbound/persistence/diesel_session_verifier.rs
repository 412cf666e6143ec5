//! Diesel-backed `SessionVerifier` reading the `sessions` table.
//!
//! Tokens are never stored or compared in clear text: the adapter looks up
//! the lowercase hex SHA-256 fingerprint of the presented token and accepts
//! the session only while `expires_at` is in the future.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::Clock;
use sha2::{Digest, Sha256};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::SessionVerifier;
use crate::domain::{Error, SessionToken, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::pool::DbPool;
use super::schema::sessions;

/// Hex-encoded SHA-256 of the raw token, as stored in `sessions.token_hash`.
pub(crate) fn token_fingerprint(token: &SessionToken) -> String {
    hex::encode(Sha256::digest(token.expose().as_bytes()))
}

/// Session verifier backed by PostgreSQL.
#[derive(Clone)]
pub struct DieselSessionVerifier {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselSessionVerifier {
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

#[async_trait]
impl SessionVerifier for DieselSessionVerifier {
    async fn verify(&self, token: &SessionToken) -> Result<Option<UserId>, Error> {
        let mut conn = self.pool.get().await.map_err(|err| {
            map_basic_pool_error(err, |message| {
                Error::service_unavailable(format!("session store unavailable: {message}"))
            })
        })?;

        let user_id: Option<Uuid> = sessions::table
            .filter(sessions::token_hash.eq(token_fingerprint(token)))
            .filter(sessions::expires_at.gt(self.clock.utc()))
            .select(sessions::user_id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| {
                map_basic_diesel_error(
                    err,
                    |message| Error::internal(format!("session lookup failed: {message}")),
                    |message| Error::service_unavailable(format!("session store unavailable: {message}")),
                )
            })?;

        if user_id.is_none() {
            debug!("bearer token did not match a live session");
        }
        Ok(user_id.map(UserId::from_uuid))
    }
}
