//! Builders for the HTTP state port bundle.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use pools::domain::PoolService;
use pools::domain::ports::{
    FixturePoolCommand, FixturePoolQuery, FixtureSessionVerifier, PoolCommand, PoolQuery,
    SessionVerifier,
};
use pools::inbound::http::state::HttpState;
use pools::outbound::persistence::{DbPool, DieselPoolRepository, DieselSessionVerifier};

use super::ServerConfig;

type PoolPorts = (Arc<dyn PoolCommand>, Arc<dyn PoolQuery>);

/// Build the command/query pair from one service, or fall back to fixtures
/// when no pool is configured.
fn build_pool_ports<Pool, S>(pool: &Option<Pool>, make_service: impl FnOnce(&Pool) -> S) -> PoolPorts
where
    S: PoolCommand + PoolQuery + 'static,
{
    match pool {
        Some(pool) => {
            let service = Arc::new(make_service(pool));
            (
                service.clone() as Arc<dyn PoolCommand>,
                service as Arc<dyn PoolQuery>,
            )
        }
        None => (Arc::new(FixturePoolCommand), Arc::new(FixturePoolQuery)),
    }
}

fn build_session_verifier(pool: Option<&DbPool>, clock: Arc<dyn Clock>) -> Arc<dyn SessionVerifier> {
    match pool {
        Some(pool) => Arc::new(DieselSessionVerifier::new(pool.clone(), clock)),
        None => Arc::new(FixtureSessionVerifier),
    }
}

/// Build the shared HTTP state from configured ports and fixture fallbacks.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let (pools, pools_query) = build_pool_ports(&config.db_pool, |pool| {
        PoolService::new(
            Arc::new(DieselPoolRepository::new(pool.clone())),
            clock.clone(),
        )
    });
    let sessions = build_session_verifier(config.db_pool.as_ref(), clock);

    web::Data::new(HttpState::new(pools, pools_query, sessions))
}
