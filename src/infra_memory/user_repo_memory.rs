use crate::domain_model::RowCountConvention;
use crate::domain_port::*;
use anyhow::anyhow;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicBool, Ordering};

/// Process-local stand-in for the `users` table.
///
/// The merge runs under the shard lock of the username's entry, so two
/// concurrent first logins for the same name resolve to one insert and one
/// update, like the unique key does in MySQL. Reported row counts are
/// configurable so callers can mimic any engine.
pub struct InMemoryUserRepo {
    users: DashMap<String, UserRecord>,
    insert_rows: u64,
    update_rows: u64,
    closed: AtomicBool,
    row_count_available: AtomicBool,
}

impl InMemoryUserRepo {
    pub fn new(convention: RowCountConvention) -> Self {
        Self::reporting(convention.insert_rows(), convention.update_rows())
    }

    /// Reports `insert_rows` and `update_rows` verbatim, including values no
    /// real convention would accept.
    pub fn reporting(insert_rows: u64, update_rows: u64) -> Self {
        InMemoryUserRepo {
            users: DashMap::new(),
            insert_rows,
            update_rows,
            closed: AtomicBool::new(false),
            row_count_available: AtomicBool::new(true),
        }
    }

    /// Every later call fails as if the connection had gone away.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    /// When unset, writes still apply but their row count is reported missing.
    pub fn set_row_count_available(&self, available: bool) {
        self.row_count_available.store(available, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait::async_trait]
impl UserRepo for InMemoryUserRepo {
    async fn merge_login(
        &self,
        username: &str,
        login_at: DateTime<Utc>,
    ) -> Result<u64, UserRepoError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(UserRepoError::Write(anyhow!("connection is closed")));
        }
        if username.is_empty() {
            return Err(UserRepoError::Write(anyhow!(
                "check constraint 'users_username_not_empty' is violated"
            )));
        }

        let rows_affected = match self.users.entry(username.to_string()) {
            Entry::Occupied(mut entry) => {
                let user = entry.get_mut();
                user.login_count += 1;
                user.last_login_at = login_at;
                self.update_rows
            }
            Entry::Vacant(entry) => {
                entry.insert(UserRecord {
                    username: username.to_string(),
                    login_count: 1,
                    last_login_at: login_at,
                    created_at: login_at,
                });
                self.insert_rows
            }
        };

        if !self.row_count_available.load(Ordering::SeqCst) {
            return Err(UserRepoError::RowCount(anyhow!(
                "driver did not report rows affected"
            )));
        }

        Ok(rows_affected)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, UserRepoError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(UserRepoError::Read(anyhow!("connection is closed")));
        }

        Ok(self.users.get(username).map(|user| user.value().clone()))
    }
}
