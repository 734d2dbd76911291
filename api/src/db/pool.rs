// Connection pool for the profile and support log tables

use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::config::ApiConfig;
use crate::db::error::DbError;
use crate::db::repositories::Repositories;

pub struct DbPool {
    pool: DatabaseConnection,
}

impl DbPool {
    pub async fn new(config: &ApiConfig) -> Result<Self, DbError> {
        Database::connect(connect_options(config))
            .await
            .map(|pool| DbPool { pool })
            .map_err(|e| DbError::ConnectionError(e.to_string()))
    }

    /// Creates repository instances sharing this pool
    pub fn repositories(&self) -> Repositories {
        Repositories::new(self.pool.clone())
    }
}

/// Pool sizing and timeouts taken from `DB_*` settings
fn connect_options(config: &ApiConfig) -> ConnectOptions {
    ConnectOptions::new(config.database_url.clone())
        .max_connections(config.db_pool_max)
        .min_connections(config.db_pool_min.min(config.db_pool_max))
        .connect_timeout(config.db_connect_timeout)
        .acquire_timeout(config.db_acquire_timeout)
        .idle_timeout(config.db_idle_timeout)
        .max_lifetime(config.db_max_lifetime)
        .sqlx_logging(false)
        .to_owned()
}
