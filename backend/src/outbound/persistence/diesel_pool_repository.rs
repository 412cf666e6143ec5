//! PostgreSQL-backed `PoolRepository` implementation using Diesel ORM.
//!
//! Writes run inside transactions. Join relies on the
//! `participants_pool_id_user_id_key` constraint through
//! `ON CONFLICT DO NOTHING` rather than a read-then-insert check, so
//! concurrent joins by the same user cannot both succeed.
//!
//! Summaries are assembled from three queries (pool rows with the owner,
//! participant counts, and ordered participant samples) and stitched together
//! in [`assemble_summaries`].

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{PoolRepository, PoolRepositoryError};
use crate::domain::{
    JoinCode, JoinOutcome, NewPool, ParticipantPreview, Pool, PoolId, PoolOwner, PoolSummary,
    UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewParticipantRow, NewPoolRow, ParticipantSampleRow, PoolRow};
use super::pool::{DbPool, PoolError};
use super::schema::{participants, pools, users};

const POOLS_CODE_CONSTRAINT: &str = "pools_code_key";

type OwnerColumns = Option<(Uuid, String)>;

/// Raw rows loaded for a set of pools before assembly.
struct SummaryRows {
    pools: Vec<(PoolRow, OwnerColumns)>,
    counts: Vec<(Uuid, i64)>,
    samples: Vec<ParticipantSampleRow>,
}

/// Diesel-backed implementation of the pool repository port.
#[derive(Clone)]
pub struct DieselPoolRepository {
    pool: DbPool,
}

impl DieselPoolRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PoolRepositoryError {
    map_basic_pool_error(error, PoolRepositoryError::connection)
}

fn map_diesel_error(error: DieselError) -> PoolRepositoryError {
    map_basic_diesel_error(
        error,
        PoolRepositoryError::query,
        PoolRepositoryError::connection,
    )
}

/// Map create failures, recognising join code collisions by constraint name.
fn map_create_error(error: DieselError, code: &JoinCode) -> PoolRepositoryError {
    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &error
        && info.constraint_name() == Some(POOLS_CODE_CONSTRAINT)
    {
        debug!(%code, "pool insert hit the join code constraint");
        return PoolRepositoryError::duplicate_code(code.as_ref());
    }
    map_diesel_error(error)
}

fn row_to_pool(row: PoolRow) -> Pool {
    Pool {
        id: PoolId::from_uuid(row.id),
        title: row.title,
        code: row.code,
        owner_id: row.owner_id.map(UserId::from_uuid),
        created_at: row.created_at,
    }
}

/// Combine pool rows with their counts and participant samples.
///
/// Pool order is preserved. Samples must arrive ordered by join time within
/// each pool; [`PoolSummary::new`] keeps the first few.
fn assemble_summaries(rows: SummaryRows) -> Result<Vec<PoolSummary>, PoolRepositoryError> {
    let SummaryRows {
        pools,
        counts,
        samples,
    } = rows;

    let counts = counts
        .into_iter()
        .map(|(pool_id, count)| {
            u64::try_from(count)
                .map(|count| (pool_id, count))
                .map_err(|_| {
                    PoolRepositoryError::query(format!(
                        "negative participant count for pool {pool_id}"
                    ))
                })
        })
        .collect::<Result<HashMap<_, _>, _>>()?;

    let mut samples_by_pool: HashMap<Uuid, Vec<ParticipantPreview>> = HashMap::new();
    for sample in samples {
        samples_by_pool
            .entry(sample.pool_id)
            .or_default()
            .push(ParticipantPreview {
                id: sample.participant_id,
                avatar_url: sample.avatar_url,
            });
    }

    Ok(pools
        .into_iter()
        .map(|(row, owner)| {
            let count = counts.get(&row.id).copied().unwrap_or(0);
            let participants = samples_by_pool.remove(&row.id).unwrap_or_default();
            let owner = owner.map(|(id, name)| PoolOwner {
                id: UserId::from_uuid(id),
                name,
            });
            PoolSummary::new(row_to_pool(row), count, participants, owner)
        })
        .collect())
}

/// Load counts and samples for the given pool rows.
async fn load_summary_rows(
    conn: &mut AsyncPgConnection,
    pools: Vec<(PoolRow, OwnerColumns)>,
) -> Result<SummaryRows, DieselError> {
    let pool_ids: Vec<Uuid> = pools.iter().map(|(row, _)| row.id).collect();
    if pool_ids.is_empty() {
        return Ok(SummaryRows {
            pools,
            counts: Vec::new(),
            samples: Vec::new(),
        });
    }

    let counts: Vec<(Uuid, i64)> = participants::table
        .filter(participants::pool_id.eq_any(&pool_ids))
        .group_by(participants::pool_id)
        .select((participants::pool_id, count_star()))
        .load(conn)
        .await?;

    // TODO: cap samples per pool in SQL with a LATERAL join once list sizes
    // make loading every participant row noticeable.
    let samples: Vec<ParticipantSampleRow> = participants::table
        .inner_join(users::table)
        .filter(participants::pool_id.eq_any(&pool_ids))
        .order((
            participants::pool_id.asc(),
            participants::created_at.asc(),
            participants::id.asc(),
        ))
        .select((participants::pool_id, participants::id, users::avatar_url))
        .load(conn)
        .await?;

    Ok(SummaryRows {
        pools,
        counts,
        samples,
    })
}

#[async_trait]
impl PoolRepository for DieselPoolRepository {
    async fn count(&self) -> Result<u64, PoolRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = pools::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        u64::try_from(total)
            .map_err(|_| PoolRepositoryError::query(format!("negative pool count {total}")))
    }

    async fn create(&self, pool: &NewPool) -> Result<(), PoolRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let owner_id = pool.owner.as_ref().map(|owner| *owner.as_uuid());
        let new_pool = NewPoolRow {
            id: *pool.id.as_uuid(),
            title: pool.title.as_ref(),
            code: pool.code.as_ref(),
            owner_id,
            created_at: pool.created_at,
        };
        let owner_participant = owner_id.map(|user_id| NewParticipantRow {
            id: Uuid::new_v4(),
            pool_id: new_pool.id,
            user_id,
        });

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(pools::table)
                    .values(&new_pool)
                    .execute(conn)
                    .await?;

                if let Some(participant) = owner_participant {
                    diesel::insert_into(participants::table)
                        .values(&participant)
                        .execute(conn)
                        .await?;
                }

                Ok::<_, DieselError>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_create_error(err, &pool.code))
    }

    async fn join(
        &self,
        code: &JoinCode,
        user_id: &UserId,
    ) -> Result<JoinOutcome, PoolRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_uuid = *user_id.as_uuid();

        conn.transaction(|conn| {
            async move {
                let pool_id: Option<Uuid> = pools::table
                    .filter(pools::code.eq(code.as_ref()))
                    .select(pools::id)
                    .first(conn)
                    .await
                    .optional()?;

                let Some(pool_id) = pool_id else {
                    return Ok(JoinOutcome::PoolNotFound);
                };

                let inserted = diesel::insert_into(participants::table)
                    .values(&NewParticipantRow {
                        id: Uuid::new_v4(),
                        pool_id,
                        user_id: user_uuid,
                    })
                    .on_conflict((participants::pool_id, participants::user_id))
                    .do_nothing()
                    .execute(conn)
                    .await?;

                if inserted == 0 {
                    return Ok(JoinOutcome::AlreadyJoined);
                }

                let claimed = diesel::update(
                    pools::table
                        .filter(pools::id.eq(pool_id))
                        .filter(pools::owner_id.is_null()),
                )
                .set(pools::owner_id.eq(user_uuid))
                .execute(conn)
                .await?;

                Ok::<_, DieselError>(JoinOutcome::Joined {
                    pool_id: PoolId::from_uuid(pool_id),
                    claimed_ownership: claimed == 1,
                })
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn list_for_participant(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PoolSummary>, PoolRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_uuid = *user_id.as_uuid();

        let rows = conn
            .transaction(|conn| {
                async move {
                    let member_of = participants::table
                        .filter(participants::user_id.eq(user_uuid))
                        .select(participants::pool_id);

                    let pools: Vec<(PoolRow, OwnerColumns)> = pools::table
                        .left_join(users::table)
                        .filter(pools::id.eq_any(member_of))
                        .order((pools::created_at.desc(), pools::id.desc()))
                        .select((PoolRow::as_select(), (users::id, users::name).nullable()))
                        .load(conn)
                        .await?;

                    load_summary_rows(conn, pools).await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        assemble_summaries(rows)
    }

    async fn find_summary(
        &self,
        pool_id: &PoolId,
    ) -> Result<Option<PoolSummary>, PoolRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let pool_uuid = *pool_id.as_uuid();

        let rows = conn
            .transaction(|conn| {
                async move {
                    let pools: Vec<(PoolRow, OwnerColumns)> = pools::table
                        .left_join(users::table)
                        .filter(pools::id.eq(pool_uuid))
                        .select((PoolRow::as_select(), (users::id, users::name).nullable()))
                        .limit(1)
                        .load(conn)
                        .await?;

                    load_summary_rows(conn, pools).await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(assemble_summaries(rows)?.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping and summary assembly.
    use chrono::Utc;
    use rstest::rstest;

    use super::*;

    fn pool_row(owner_id: Option<Uuid>) -> PoolRow {
        PoolRow {
            id: Uuid::new_v4(),
            title: "Office pool".to_owned(),
            code: "AB12CD".to_owned(),
            owner_id,
            created_at: Utc::now(),
        }
    }

    fn sample(pool_id: Uuid) -> ParticipantSampleRow {
        ParticipantSampleRow {
            pool_id,
            participant_id: Uuid::new_v4(),
            avatar_url: None,
        }
    }

    /// Database error detail carrying an optional constraint name.
    struct ConstraintInfo(Option<&'static str>);

    impl diesel::result::DatabaseErrorInformation for ConstraintInfo {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn details(&self) -> Option<&str> {
            None
        }

        fn hint(&self) -> Option<&str> {
            None
        }

        fn table_name(&self) -> Option<&str> {
            None
        }

        fn column_name(&self) -> Option<&str> {
            None
        }

        fn constraint_name(&self) -> Option<&str> {
            self.0
        }

        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn unique_violation(constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new(ConstraintInfo(constraint)),
        )
    }

    #[rstest]
    fn code_constraint_violation_maps_to_duplicate_code() {
        let code = JoinCode::parse("AB12CD").expect("valid code");

        let repo_err = map_create_error(unique_violation(Some(POOLS_CODE_CONSTRAINT)), &code);

        assert_eq!(repo_err, PoolRepositoryError::duplicate_code("AB12CD"));
    }

    #[rstest]
    #[case(None)]
    #[case(Some("pools_pkey"))]
    fn other_unique_violations_map_to_query_errors(#[case] constraint: Option<&'static str>) {
        let code = JoinCode::parse("AB12CD").expect("valid code");

        let repo_err = map_create_error(unique_violation(constraint), &code);

        assert!(matches!(repo_err, PoolRepositoryError::Query { .. }));
    }

    #[rstest]
    fn other_create_failures_map_to_query_errors() {
        let code = JoinCode::parse("AB12CD").expect("valid code");
        let diesel_err = DieselError::DatabaseError(
            DatabaseErrorKind::ForeignKeyViolation,
            Box::new("owner missing".to_owned()),
        );

        let repo_err = map_create_error(diesel_err, &code);

        assert!(matches!(repo_err, PoolRepositoryError::Query { .. }));
    }

    #[rstest]
    fn closed_connection_maps_to_connection_error() {
        let diesel_err = DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("server closed the connection".to_owned()),
        );

        let repo_err = map_diesel_error(diesel_err);

        assert!(matches!(repo_err, PoolRepositoryError::Connection { .. }));
    }

    #[rstest]
    fn pool_checkout_failure_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(repo_err, PoolRepositoryError::connection("timed out"));
    }

    #[rstest]
    fn assembly_keeps_pool_order_counts_and_four_samples() {
        let owner = Uuid::new_v4();
        let first = pool_row(Some(owner));
        let second = pool_row(None);
        let first_id = first.id;
        let second_id = second.id;
        let first_samples: Vec<_> = (0..6).map(|_| sample(first_id)).collect();
        let expected_sample_ids: Vec<_> = first_samples
            .iter()
            .take(4)
            .map(|row| row.participant_id)
            .collect();

        let summaries = assemble_summaries(SummaryRows {
            pools: vec![(first, Some((owner, "Ada".to_owned()))), (second, None)],
            counts: vec![(first_id, 6), (second_id, 1)],
            samples: first_samples
                .into_iter()
                .chain(std::iter::once(sample(second_id)))
                .collect(),
        })
        .expect("assembly succeeds");

        let [head, tail] = summaries.as_slice() else {
            panic!("expected two summaries, got {}", summaries.len());
        };
        assert_eq!(head.pool().id, PoolId::from_uuid(first_id));
        assert_eq!(head.participant_count(), 6);
        assert_eq!(
            head.participants()
                .iter()
                .map(|p| p.id)
                .collect::<Vec<_>>(),
            expected_sample_ids
        );
        assert_eq!(
            head.owner().map(|o| o.name.as_str()),
            Some("Ada")
        );
        assert_eq!(tail.pool().id, PoolId::from_uuid(second_id));
        assert_eq!(tail.participant_count(), 1);
        assert!(tail.owner().is_none());
    }

    #[rstest]
    fn assembly_defaults_missing_counts_to_zero() {
        let row = pool_row(None);
        let summaries = assemble_summaries(SummaryRows {
            pools: vec![(row, None)],
            counts: Vec::new(),
            samples: Vec::new(),
        })
        .expect("assembly succeeds");

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].participant_count(), 0);
        assert!(summaries[0].participants().is_empty());
    }

    #[rstest]
    fn assembly_rejects_negative_counts() {
        let row = pool_row(None);
        let id = row.id;
        let result = assemble_summaries(SummaryRows {
            pools: vec![(row, None)],
            counts: vec![(id, -1)],
            samples: Vec::new(),
        });

        assert!(matches!(result, Err(PoolRepositoryError::Query { .. })));
    }
}
