use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_model::RowCountConvention;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_mysql::*;
use crate::logger::*;
use crate::settings::Settings;
use anyhow::anyhow;
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use std::time::Duration;

/// Wires the configured backend into a [`UserStore`] and owns the pool, if any.
pub struct App {
    pub user_store: Arc<dyn UserStore>,
    pool: Option<MySqlPool>,
}

impl App {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let convention =
            RowCountConvention::try_new(settings.store.insert_rows, settings.store.update_rows)?;

        let (user_repo, pool): (Arc<dyn UserRepo>, Option<MySqlPool>) =
            match settings.store.backend.as_str() {
                "memory" => (Arc::new(InMemoryUserRepo::new(convention)), None),
                "mysql" => {
                    let mysql = settings
                        .mysql
                        .as_ref()
                        .ok_or_else(|| anyhow!("store backend is mysql but [mysql] is missing"))?;
                    let pool = MySqlPoolOptions::new()
                        .max_connections(mysql.max_connections)
                        .acquire_timeout(Duration::from_millis(mysql.acquire_timeout_ms))
                        .connect(&mysql.url)
                        .await?;
                    (Arc::new(MySqlUserRepo::new(pool.clone())), Some(pool))
                }
                other => return Err(anyhow!("Unknown store backend: {}", other)),
            };

        let user_store: Arc<dyn UserStore> = Arc::new(RealUserStore::new(user_repo, convention));

        info!(backend = %settings.store.backend, %convention, "app started");

        Ok(Self { user_store, pool })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        let pool = self
            .pool
            .as_ref()
            .ok_or_else(|| anyhow!("migrations need the mysql backend"))?;
        run_migrations(pool).await?;
        info!("migrations applied");
        Ok(())
    }

    pub async fn shutdown(&self) {
        info!("app shutting down...");
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
