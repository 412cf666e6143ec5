//! Pool aggregate: group prediction contests that users join by code.
//!
//! Value types validate their inputs once so services and adapters can pass
//! them around without re-checking. Read models ([`PoolSummary`]) carry the
//! participant count, a small sample of participants for display, and the
//! owner identity.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Number of characters in a join code.
pub const JOIN_CODE_LENGTH: usize = 6;
/// Longest accepted pool title, in characters.
pub const POOL_TITLE_MAX: usize = 120;
/// Maximum number of sample participants carried by a [`PoolSummary`].
pub const SAMPLE_PARTICIPANT_LIMIT: usize = 4;

const JOIN_CODE_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Validation errors for pool value types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolValidationError {
    /// Pool identifier was not a UUID.
    #[error("pool id must be a valid UUID")]
    InvalidId,
    /// Title was blank once trimmed.
    #[error("title must not be empty")]
    EmptyTitle,
    /// Title exceeded [`POOL_TITLE_MAX`] characters.
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
    /// Join code was blank once trimmed.
    #[error("code must not be empty")]
    EmptyCode,
    /// Join code had the wrong length or alphabet.
    #[error("code must be {length} letters or digits")]
    MalformedCode { length: usize },
}

/// Stable pool identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoolId(Uuid);

impl PoolId {
    /// Parse a pool identifier from its string form.
    pub fn parse(raw: &str) -> Result<Self, PoolValidationError> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| PoolValidationError::InvalidId)
    }

    /// Wrap a UUID read from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a fresh identifier for a new pool.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human readable pool title.
///
/// ## Invariants
/// - Trimmed, non-empty, at most [`POOL_TITLE_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PoolTitle(String);

impl PoolTitle {
    /// Validate and construct a title.
    ///
    /// # Examples
    /// ```
    /// use pools::domain::PoolTitle;
    ///
    /// let title = PoolTitle::new("  World Cup 2022 ").unwrap();
    /// assert_eq!(title.as_ref(), "World Cup 2022");
    /// assert!(PoolTitle::new("   ").is_err());
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, PoolValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(PoolValidationError::EmptyTitle);
        }
        if trimmed.chars().count() > POOL_TITLE_MAX {
            return Err(PoolValidationError::TitleTooLong {
                max: POOL_TITLE_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PoolTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<PoolTitle> for String {
    fn from(value: PoolTitle) -> Self {
        value.0
    }
}

impl TryFrom<String> for PoolTitle {
    type Error = PoolValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Short code participants use to join a pool.
///
/// ## Invariants
/// - Exactly [`JOIN_CODE_LENGTH`] characters from `A-Z0-9`.
/// - Uniqueness is not guaranteed by construction; storage enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JoinCode(String);

impl JoinCode {
    /// Draw a random code from the join code alphabet.
    ///
    /// # Examples
    /// ```
    /// use pools::domain::JoinCode;
    ///
    /// let code = JoinCode::generate(&mut rand::thread_rng());
    /// assert_eq!(code.as_ref().len(), 6);
    /// assert!(code.as_ref().chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    /// ```
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code = (0..JOIN_CODE_LENGTH)
            .map(|_| char::from(JOIN_CODE_ALPHABET[rng.gen_range(0..JOIN_CODE_ALPHABET.len())]))
            .collect();
        Self(code)
    }

    /// Parse a code typed by a user. Input is trimmed and upper-cased.
    pub fn parse(raw: &str) -> Result<Self, PoolValidationError> {
        let normalised = raw.trim().to_ascii_uppercase();
        if normalised.is_empty() {
            return Err(PoolValidationError::EmptyCode);
        }
        let well_formed = normalised.chars().count() == JOIN_CODE_LENGTH
            && normalised
                .chars()
                .all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit());
        if !well_formed {
            return Err(PoolValidationError::MalformedCode {
                length: JOIN_CODE_LENGTH,
            });
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for JoinCode {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for JoinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<JoinCode> for String {
    fn from(value: JoinCode) -> Self {
        value.0
    }
}

impl TryFrom<String> for JoinCode {
    type Error = PoolValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// A pool about to be persisted.
///
/// When `owner` is set, storage must create the owner's participant row in
/// the same transaction as the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPool {
    pub id: PoolId,
    pub title: PoolTitle,
    pub code: JoinCode,
    pub owner: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

/// Stored pool record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    pub id: PoolId,
    pub title: String,
    pub code: String,
    pub owner_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

/// Owner identity shown on pool summaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolOwner {
    pub id: UserId,
    pub name: String,
}

/// Participant sample shown on pool summaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantPreview {
    pub id: Uuid,
    pub avatar_url: Option<String>,
}

/// Pool read model returned by list and detail queries.
///
/// ## Invariants
/// - `participants` holds at most [`SAMPLE_PARTICIPANT_LIMIT`] entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSummary {
    pool: Pool,
    participant_count: u64,
    participants: Vec<ParticipantPreview>,
    owner: Option<PoolOwner>,
}

impl PoolSummary {
    /// Assemble a summary, keeping only the first
    /// [`SAMPLE_PARTICIPANT_LIMIT`] participants.
    pub fn new(
        pool: Pool,
        participant_count: u64,
        mut participants: Vec<ParticipantPreview>,
        owner: Option<PoolOwner>,
    ) -> Self {
        participants.truncate(SAMPLE_PARTICIPANT_LIMIT);
        Self {
            pool,
            participant_count,
            participants,
            owner,
        }
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn participant_count(&self) -> u64 {
        self.participant_count
    }

    pub fn participants(&self) -> &[ParticipantPreview] {
        &self.participants
    }

    pub fn owner(&self) -> Option<&PoolOwner> {
        self.owner.as_ref()
    }
}

/// Result of a join attempt, decided atomically by storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// A participant row was created.
    Joined {
        pool_id: PoolId,
        /// The caller became owner of a previously ownerless pool.
        claimed_ownership: bool,
    },
    /// The caller already had a participant row on this pool.
    AlreadyJoined,
    /// No pool carries the requested code.
    PoolNotFound,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rstest::rstest;

    fn pool() -> Pool {
        Pool {
            id: PoolId::random(),
            title: "World Cup 2022".to_owned(),
            code: "AB12CD".to_owned(),
            owner_id: None,
            created_at: Utc::now(),
        }
    }

    fn preview() -> ParticipantPreview {
        ParticipantPreview {
            id: Uuid::new_v4(),
            avatar_url: Some("https://example.test/a.png".to_owned()),
        }
    }

    #[rstest]
    fn generated_codes_use_the_join_alphabet() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..256 {
            let code = JoinCode::generate(&mut rng);
            assert_eq!(code.as_ref().len(), JOIN_CODE_LENGTH);
            assert!(
                code.as_ref()
                    .bytes()
                    .all(|b| JOIN_CODE_ALPHABET.contains(&b)),
                "unexpected character in {code}"
            );
            assert_eq!(JoinCode::parse(code.as_ref()), Ok(code));
        }
    }

    #[rstest]
    #[case(" ab12cd ", "AB12CD")]
    #[case("ZZ9900", "ZZ9900")]
    fn parse_normalises_input(#[case] raw: &str, #[case] expected: &str) {
        let code = JoinCode::parse(raw).expect("valid code");
        assert_eq!(code.as_ref(), expected);
    }

    #[rstest]
    #[case("", PoolValidationError::EmptyCode)]
    #[case("ABC12", PoolValidationError::MalformedCode { length: JOIN_CODE_LENGTH })]
    #[case("ABC1234", PoolValidationError::MalformedCode { length: JOIN_CODE_LENGTH })]
    #[case("AB-12C", PoolValidationError::MalformedCode { length: JOIN_CODE_LENGTH })]
    #[case("ÄB12CD", PoolValidationError::MalformedCode { length: JOIN_CODE_LENGTH })]
    fn parse_rejects_malformed_codes(#[case] raw: &str, #[case] expected: PoolValidationError) {
        assert_eq!(JoinCode::parse(raw), Err(expected));
    }

    #[rstest]
    #[case("", PoolValidationError::EmptyTitle)]
    #[case(" \t ", PoolValidationError::EmptyTitle)]
    fn title_rejects_blank_input(#[case] raw: &str, #[case] expected: PoolValidationError) {
        assert_eq!(PoolTitle::new(raw), Err(expected));
    }

    #[rstest]
    fn title_enforces_maximum_length() {
        let at_limit = "x".repeat(POOL_TITLE_MAX);
        assert!(PoolTitle::new(&at_limit).is_ok());
        let over = "x".repeat(POOL_TITLE_MAX + 1);
        assert_eq!(
            PoolTitle::new(over),
            Err(PoolValidationError::TitleTooLong {
                max: POOL_TITLE_MAX
            })
        );
    }

    #[rstest]
    fn pool_id_parse_rejects_garbage() {
        assert_eq!(PoolId::parse("nope"), Err(PoolValidationError::InvalidId));
    }

    #[rstest]
    fn summary_keeps_at_most_four_participants() {
        let participants = (0..7).map(|_| preview()).collect::<Vec<_>>();
        let expected = participants[..SAMPLE_PARTICIPANT_LIMIT].to_vec();

        let summary = PoolSummary::new(pool(), 7, participants, None);

        assert_eq!(summary.participant_count(), 7);
        assert_eq!(summary.participants(), expected.as_slice());
    }
}
