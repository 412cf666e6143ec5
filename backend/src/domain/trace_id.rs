//! Request correlation identifier.
//!
//! One [`TraceId`] is in scope per request. Errors built while it is in scope
//! copy it into their payload, and the trace middleware echoes it back in the
//! `trace-id` response header. Callers that already carry an identifier (a
//! gateway, a retrying client) can send it in the same header and it is
//! reused.
//!
//! Tokio task-locals do not follow `tokio::spawn` or `spawn_blocking`; wrap
//! such work in [`TraceId::scope`] to keep correlation.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    pub(crate) static TRACE_ID: TraceId;
}

/// Correlation identifier for one request.
///
/// # Examples
/// ```
/// use pools::TraceId;
///
/// async fn handler() -> Option<String> {
///     TraceId::current().map(|id| id.to_string())
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    #[must_use]
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Reuse a caller-supplied identifier when it is a non-nil UUID,
    /// otherwise mint a fresh one.
    ///
    /// # Examples
    /// ```
    /// use pools::TraceId;
    ///
    /// let supplied = "6f1c1d3e-5b8a-4f3e-9d0a-2b7c4e8f1a90";
    /// assert_eq!(TraceId::adopt_or_generate(Some(supplied)).to_string(), supplied);
    /// assert_ne!(TraceId::adopt_or_generate(Some("junk")).to_string(), "junk");
    /// ```
    #[must_use]
    pub fn adopt_or_generate(supplied: Option<&str>) -> Self {
        supplied
            .and_then(|raw| raw.trim().parse::<Self>().ok())
            .filter(|id| !id.0.is_nil())
            .unwrap_or_else(Self::generate)
    }

    /// The identifier in scope, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        TRACE_ID.try_with(|id| *id).ok()
    }

    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Run `fut` with `trace_id` in scope.
    ///
    /// # Examples
    /// ```
    /// use pools::TraceId;
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let trace_id: TraceId = "00000000-0000-0000-0000-000000000001"
    ///     .parse()
    ///     .expect("valid UUID");
    /// let observed = TraceId::scope(trace_id, async move { TraceId::current() }).await;
    /// assert_eq!(observed, Some(trace_id));
    /// # });
    /// ```
    pub async fn scope<Fut>(trace_id: TraceId, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        TRACE_ID.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
