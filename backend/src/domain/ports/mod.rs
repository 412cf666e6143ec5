//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`PoolCommand`, `PoolQuery`, `SessionVerifier`) are what
//! inbound adapters call. Driven ports (`PoolRepository`) are implemented by
//! outbound adapters and expose typed errors generated by
//! [`define_port_error!`].

mod macros;
pub(crate) use macros::define_port_error;

mod pool_command;
mod pool_query;
mod pool_repository;
mod session_verifier;

#[cfg(test)]
pub use pool_command::MockPoolCommand;
pub use pool_command::{
    CreatePoolRequest, CreatePoolResponse, FixturePoolCommand, JoinPoolRequest, JoinPoolResponse,
    PoolCommand,
};
#[cfg(test)]
pub use pool_query::MockPoolQuery;
pub use pool_query::{
    FixturePoolQuery, GetPoolRequest, GetPoolResponse, ListPoolsRequest, ListPoolsResponse,
    PoolQuery,
};
#[cfg(test)]
pub use pool_repository::MockPoolRepository;
pub use pool_repository::{PoolRepository, PoolRepositoryError};
#[cfg(test)]
pub use session_verifier::MockSessionVerifier;
pub use session_verifier::{
    FIXTURE_SESSION_TOKEN, FIXTURE_SESSION_USER_ID, FixtureSessionVerifier, SessionVerifier,
};
