use crate::logger::*;
use anyhow::{Context, Result};
use nanoid::nanoid;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{Executor, MySqlPool};
use std::str::FromStr;

/// MySQL caps identifiers at 64 characters.
const MAX_DATABASE_NAME_LEN: usize = 64;

/// Applies the embedded migrations in `./migrations` to `pool`.
pub async fn run_migrations(pool: &MySqlPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("failed to apply migrations")?;
    Ok(())
}

/// Creates throwaway databases on a MySQL server and migrates them.
pub struct MySqlSchemaProvisioner {
    server: MySqlConnectOptions,
    prefix: String,
}

impl MySqlSchemaProvisioner {
    /// `server_url` must not name a database, e.g. `mysql://root:pw@localhost:3306`.
    pub fn new(server_url: &str, prefix: &str) -> Result<Self> {
        let server = MySqlConnectOptions::from_str(server_url)
            .context("failed to parse mysql server url")?;
        Ok(MySqlSchemaProvisioner {
            server,
            prefix: prefix.to_string(),
        })
    }

    pub async fn provision(&self, label: &str) -> Result<ProvisionedSchema> {
        let alphabet: [char; 16] = [
            '1', '2', '3', '4', '5', '6', '7', '8', '9', '0', 'a', 'b', 'c', 'd', 'e', 'f',
        ];
        let run_id = nanoid!(10, &alphabet);
        let database = database_name(&self.prefix, &run_id, label);

        let admin = MySqlPoolOptions::new()
            .max_connections(1)
            .connect_with(self.server.clone())
            .await
            .context("failed to connect to mysql server")?;

        admin
            .execute(format!("CREATE DATABASE `{database}`").as_str())
            .await
            .with_context(|| format!("failed to create database {database:?}"))?;

        let pool = MySqlPoolOptions::new()
            .connect_with(self.server.clone().database(&database))
            .await
            .with_context(|| format!("failed to open database {database:?}"))?;

        if let Err(e) = run_migrations(&pool).await {
            pool.close().await;
            let _ = admin
                .execute(format!("DROP DATABASE `{database}`").as_str())
                .await;
            admin.close().await;
            return Err(e.context(format!("database {database:?}")));
        }

        debug!(database = %database, "schema provisioned");

        Ok(ProvisionedSchema {
            database,
            pool,
            admin,
        })
    }
}

/// A migrated database that lives until [`ProvisionedSchema::teardown`].
pub struct ProvisionedSchema {
    database: String,
    pool: MySqlPool,
    admin: MySqlPool,
}

impl ProvisionedSchema {
    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    pub async fn teardown(self) -> Result<()> {
        self.pool.close().await;
        self.admin
            .execute(format!("DROP DATABASE `{}`", self.database).as_str())
            .await
            .with_context(|| format!("failed to drop database {:?}", self.database))?;
        self.admin.close().await;
        debug!(database = %self.database, "schema dropped");
        Ok(())
    }
}

/// Builds `<prefix>_<run_id>_<label>`, keeping only `[A-Za-z0-9_]` so the name
/// can be spliced into DDL between backticks.
fn database_name(prefix: &str, run_id: &str, label: &str) -> String {
    format!("{prefix}_{run_id}_{label}")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .take(MAX_DATABASE_NAME_LEN)
        .collect()
}
