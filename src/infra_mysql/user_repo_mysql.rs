use crate::domain_port::*;
use anyhow::anyhow;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};

pub struct MySqlUserRepo {
    pool: MySqlPool,
}

impl MySqlUserRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlUserRepo { pool }
    }
}

#[async_trait::async_trait]
impl UserRepo for MySqlUserRepo {
    async fn merge_login(
        &self,
        username: &str,
        login_at: DateTime<Utc>,
    ) -> Result<u64, UserRepoError> {
        // MySQL reports 1 affected row for the insert branch and 2 for an
        // update that changed the row. login_count always changes, so the
        // CLIENT_FOUND_ROWS flag set by sqlx makes no difference here.
        let result = sqlx::query(
            r#"
INSERT INTO users (username, last_login_at)
VALUES (?, ?)
ON DUPLICATE KEY UPDATE
  login_count = login_count + 1,
  last_login_at = ?
"#,
        )
        .bind(username)
        .bind(login_at)
        .bind(login_at)
        .execute(&self.pool)
        .await
        .map_err(|e| UserRepoError::Write(anyhow!(e)))?;

        Ok(result.rows_affected())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, UserRepoError> {
        let Some(row) = sqlx::query(
            r#"
SELECT username, login_count, last_login_at, created_at
FROM users
WHERE username = ?
"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserRepoError::Read(anyhow!(e)))?
        else {
            return Ok(None);
        };

        let decode = |e: sqlx::Error| UserRepoError::Read(anyhow!("decode user row: {e}"));
        Ok(Some(UserRecord {
            username: row.try_get("username").map_err(decode)?,
            login_count: row.try_get("login_count").map_err(decode)?,
            last_login_at: row.try_get("last_login_at").map_err(decode)?,
            created_at: row.try_get("created_at").map_err(decode)?,
        }))
    }
}
