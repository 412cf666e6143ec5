//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::{App, web};

use crate::Trace;
use crate::domain::ports::{
    FIXTURE_SESSION_TOKEN, FixtureSessionVerifier, PoolCommand, PoolQuery,
};
use crate::inbound::http::error::{json_error_handler, path_error_handler};
use crate::inbound::http::polls;
use crate::inbound::http::state::HttpState;

/// Build an app serving the pool routes over the given ports.
///
/// Sessions are resolved by [`FixtureSessionVerifier`], so requests
/// authenticate with [`fixture_bearer`].
pub fn test_app(
    pools: Arc<dyn PoolCommand>,
    pools_query: Arc<dyn PoolQuery>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState::new(pools, pools_query, Arc::new(FixtureSessionVerifier));
    App::new()
        .app_data(web::Data::new(state))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .wrap(Trace)
        .configure(polls::configure)
}

/// `Authorization` header carrying the fixture session token.
pub fn fixture_bearer() -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {FIXTURE_SESSION_TOKEN}"))
}
