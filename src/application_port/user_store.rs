use crate::domain_model::{RowCountConvention, UpsertOutcome};
use crate::domain_port::UserRecord;

/// Failures surfaced by [`UserStore`]. None of them are retried internally:
/// replaying an increment after a lost acknowledgement would double-count.
#[derive(Debug, thiserror::Error)]
pub enum UserStoreError {
    #[error("merge write failed for username {username:?}: {source}")]
    WriteFailed {
        username: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to retrieve rows affected for upsert of username {username:?}: {source}")]
    CountUnavailable {
        username: String,
        #[source]
        source: anyhow::Error,
    },
    #[error(
        "unexpected rows affected {rows_affected} for upsert of username {username:?}, expected {convention}"
    )]
    InconsistentOutcome {
        username: String,
        rows_affected: u64,
        convention: RowCountConvention,
    },
    #[error("lookup failed for username {username:?}: {source}")]
    ReadFailed {
        username: String,
        #[source]
        source: anyhow::Error,
    },
}

#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Records one login for `username`.
    async fn upsert(&self, username: &str) -> Result<UpsertOutcome, UserStoreError>;

    async fn get(&self, username: &str) -> Result<Option<UserRecord>, UserStoreError>;
}
