//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` so they depend only on domain
//! ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{PoolCommand, PoolQuery, SessionVerifier};

/// Dependency bundle for HTTP handlers and extractors.
#[derive(Clone)]
pub struct HttpState {
    pub pools: Arc<dyn PoolCommand>,
    pub pools_query: Arc<dyn PoolQuery>,
    pub sessions: Arc<dyn SessionVerifier>,
}

impl HttpState {
    /// Bundle the port implementations.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use pools::domain::ports::{FixturePoolCommand, FixturePoolQuery, FixtureSessionVerifier};
    /// use pools::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(
    ///     Arc::new(FixturePoolCommand),
    ///     Arc::new(FixturePoolQuery),
    ///     Arc::new(FixtureSessionVerifier),
    /// );
    /// let _ = state.pools.clone();
    /// ```
    pub fn new(
        pools: Arc<dyn PoolCommand>,
        pools_query: Arc<dyn PoolQuery>,
        sessions: Arc<dyn SessionVerifier>,
    ) -> Self {
        Self {
            pools,
            pools_query,
            sessions,
        }
    }
}
