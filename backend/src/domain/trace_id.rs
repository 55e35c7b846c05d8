//! Correlation identifier for one inbound request.
//!
//! The trace middleware installs a [`TraceId`] in task-local storage before a
//! handler runs; domain errors and log lines read it back with
//! [`TraceId::current`]. Spawned tasks start with an empty slot, so wrap their
//! futures in [`TraceId::scope`] to carry the identifier across.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use uuid::Uuid;

/// Header echoed on every response and accepted on requests.
pub const TRACE_ID_HEADER: &str = "trace-id";

tokio::task_local! {
    static ACTIVE: TraceId;
}

/// UUID naming a single request as it crosses the service.
///
/// ```
/// use client_card::TraceId;
///
/// let id: TraceId = "9b2f4c1e-0d3a-4c55-8f7e-2a6b1d9e0c44".parse().expect("uuid");
/// assert_eq!(id.to_string(), "9b2f4c1e-0d3a-4c55-8f7e-2a6b1d9e0c44");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Identifier of the request currently being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        ACTIVE.try_with(|id| *id).ok()
    }

    /// Run `work` with `id` visible through [`TraceId::current`].
    pub async fn scope<Fut: Future>(id: Self, work: Fut) -> Fut::Output {
        ACTIVE.scope(id, work).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(raw.trim()).map(Self)
    }
}
