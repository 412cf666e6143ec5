//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{participants, pools};

/// Row struct for reading from the pools table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pools)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PoolRow {
    pub id: Uuid,
    pub title: String,
    pub code: String,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating pool records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pools)]
pub(crate) struct NewPoolRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub code: &'a str,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating participant records. `created_at` is
/// left to the column default.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = participants)]
pub(crate) struct NewParticipantRow {
    pub id: Uuid,
    pub pool_id: Uuid,
    pub user_id: Uuid,
}

/// Participant sample joined with the participant's avatar.
#[derive(Debug, Clone, PartialEq, Eq, Queryable)]
pub(crate) struct ParticipantSampleRow {
    pub pool_id: Uuid,
    pub participant_id: Uuid,
    pub avatar_url: Option<String>,
}
