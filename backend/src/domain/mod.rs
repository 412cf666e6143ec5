//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities used by the HTTP and persistence
//! adapters, and the services implementing the driving ports. Keep types
//! immutable and document invariants in each type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - TraceId: request-scoped correlation id.
//! - UserId / SessionToken: caller identity and the bearer credential.
//! - Pool value types and read models (`PoolId`, `PoolTitle`, `JoinCode`,
//!   `PoolSummary`, `JoinOutcome`).
//! - PoolService: implementation of `PoolCommand` and `PoolQuery`.

pub mod auth;
pub mod error;
pub mod pool;
mod pool_service;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::auth::{SessionToken, SessionTokenValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::pool::{
    JOIN_CODE_LENGTH, JoinCode, JoinOutcome, NewPool, POOL_TITLE_MAX, ParticipantPreview, Pool,
    PoolId, PoolOwner, PoolSummary, PoolTitle, PoolValidationError, SAMPLE_PARTICIPANT_LIMIT,
};
pub use self::pool_service::PoolService;
pub use self::trace_id::TraceId;
pub use self::user::{UserId, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use pools::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
