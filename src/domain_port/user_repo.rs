use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecord {
    pub username: String,
    pub login_count: u64,
    pub last_login_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[async_trait::async_trait]
pub trait UserRepo: Send + Sync {
    /// Creates `username` with a login count of 1, or bumps the count of the
    /// existing row, in one atomic statement. Returns the rows-affected value
    /// reported by the engine.
    async fn merge_login(
        &self,
        username: &str,
        login_at: DateTime<Utc>,
    ) -> Result<u64, UserRepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, UserRepoError>;
}

#[derive(Debug, thiserror::Error)]
pub enum UserRepoError {
    #[error("write error: {0}")]
    Write(#[source] anyhow::Error),
    #[error("row count unavailable: {0}")]
    RowCount(#[source] anyhow::Error),
    #[error("read error: {0}")]
    Read(#[source] anyhow::Error),
}
