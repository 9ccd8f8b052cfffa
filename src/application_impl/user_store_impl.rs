use crate::application_port::{UserStore, UserStoreError};
use crate::domain_model::{RowCountConvention, UpsertOutcome};
use crate::domain_port::{UserRecord, UserRepo, UserRepoError};
use crate::logger::*;
use chrono::Utc;
use std::sync::Arc;

pub struct RealUserStore {
    user_repo: Arc<dyn UserRepo>,
    convention: RowCountConvention,
}

impl RealUserStore {
    pub fn new(user_repo: Arc<dyn UserRepo>, convention: RowCountConvention) -> RealUserStore {
        RealUserStore {
            user_repo,
            convention,
        }
    }

    pub fn convention(&self) -> RowCountConvention {
        self.convention
    }
}

#[async_trait::async_trait]
impl UserStore for RealUserStore {
    async fn upsert(&self, username: &str) -> Result<UpsertOutcome, UserStoreError> {
        let rows_affected = self
            .user_repo
            .merge_login(username, Utc::now())
            .await
            .map_err(|e| match e {
                UserRepoError::RowCount(source) => UserStoreError::CountUnavailable {
                    username: username.to_string(),
                    source,
                },
                UserRepoError::Write(source) | UserRepoError::Read(source) => {
                    UserStoreError::WriteFailed {
                        username: username.to_string(),
                        source,
                    }
                }
            })?;

        match self.convention.classify(rows_affected) {
            Some(outcome) => {
                debug!(username, rows_affected, %outcome, "login recorded");
                Ok(outcome)
            }
            None => {
                warn!(
                    username,
                    rows_affected,
                    convention = %self.convention,
                    "rows affected matches neither insert nor update"
                );
                Err(UserStoreError::InconsistentOutcome {
                    username: username.to_string(),
                    rows_affected,
                    convention: self.convention,
                })
            }
        }
    }

    async fn get(&self, username: &str) -> Result<Option<UserRecord>, UserStoreError> {
        self.user_repo
            .find_by_username(username)
            .await
            .map_err(|e| UserStoreError::ReadFailed {
                username: username.to_string(),
                source: e.into(),
            })
    }
}
