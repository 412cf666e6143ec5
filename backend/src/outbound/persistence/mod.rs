//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the pool repository and session verifier
//! ports, backed by `diesel-async` over a `bb8` connection pool.
//!
//! - Adapters only translate between Diesel rows and domain types.
//! - Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//!   private to this module.
//! - Database and pool failures are mapped to port error variants.
//!
//! # Example
//!
//! ```no_run
//! # async fn example() -> Result<(), pools::outbound::persistence::PoolError> {
//! use pools::outbound::persistence::{DbPool, DieselPoolRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/pools")).await?;
//! let repo = DieselPoolRepository::new(pool);
//! # let _ = repo;
//! # Ok(())
//! # }
//! ```

mod diesel_basic_error_mapping;
mod diesel_pool_repository;
mod diesel_session_verifier;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_pool_repository::DieselPoolRepository;
pub use diesel_session_verifier::DieselSessionVerifier;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DEFAULT_CHECKOUT_TIMEOUT, DEFAULT_MAX_CONNECTIONS, DbPool, PoolConfig, PoolError};
