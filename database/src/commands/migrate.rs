use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::prelude::*;
use std::error::Error;
use tracing::{error, info};

use crate::config::DatabaseConfig;
use crate::migration::Migrator;

async fn connect() -> Result<DatabaseConnection, Box<dyn Error>> {
    let config = DatabaseConfig::from_env()?;
    info!("Connecting to database {} on {}", config.name, config.host);

    Database::connect(&config.url).await.map_err(|e| {
        error!("Failed to connect to database: {}", e);
        e.into()
    })
}

/// Apply pending migrations, all of them unless `steps` is given
pub async fn execute(steps: Option<u32>) -> Result<(), Box<dyn Error>> {
    let connection = connect().await?;

    let pending = Migrator::get_pending_migrations(&connection).await?;
    info!("{} pending migrations", pending.len());
    for m in &pending {
        info!("Pending: {}", m.name());
    }

    match steps {
        Some(n) => info!("Running {} migrations", n),
        None => info!("Running all pending migrations"),
    }
    Migrator::up(&connection, steps).await.map_err(|e| {
        error!("Failed to run migrations: {:?}", e);
        e
    })?;

    info!("Migrations applied");
    Ok(())
}

/// Roll back every migration and apply them again
pub async fn reset() -> Result<(), Box<dyn Error>> {
    let connection = connect().await?;

    info!("Rolling back all migrations");
    Migrator::reset(&connection).await?;

    info!("Re-applying migrations");
    Migrator::up(&connection, None).await?;

    info!("Database reset complete");
    Ok(())
}

/// Log applied and pending migrations
pub async fn status() -> Result<(), Box<dyn Error>> {
    let connection = connect().await?;

    let applied = Migrator::get_applied_migrations(&connection).await?;
    let pending = Migrator::get_pending_migrations(&connection).await?;

    info!(
        "{} applied, {} pending",
        applied.len(),
        pending.len()
    );
    for m in &applied {
        info!("Applied: {}", m.name());
    }
    for m in &pending {
        info!("Pending: {}", m.name());
    }
    Ok(())
}
