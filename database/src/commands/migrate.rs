use sea_orm::Database;
use sea_orm_migration::prelude::*;
use std::error::Error;
use tracing::{error, info};

use crate::config::DatabaseConfig;
use crate::migration;

/// Execute the migrate command
pub async fn execute(steps: Option<u32>) -> Result<(), Box<dyn Error>> {
    // Load configuration
    let config = DatabaseConfig::from_env()?;

    info!("Connecting to database: {}", config.url);

    // Connect to the database
    let connection = match Database::connect(&config.url).await {
        Ok(conn) => conn,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(Box::new(e));
        }
    };

    info!("Running migrations...");

    // Run migrations
    match steps {
        Some(n) => {
            info!("Running {} migrations", n);
            match migration::Migrator::up(&connection, Some(n)).await {
                Ok(_) => {
                    info!("Successfully ran {} migrations", n);
                    Ok(())
                }
                Err(e) => {
                    error!("Failed to run migrations: {}", e);
                    Err(Box::new(e))
                }
            }
        }
        None => {
            info!("Running all pending migrations");
            match migration::Migrator::up(&connection, None).await {
                Ok(_) => {
                    info!("Successfully ran all migrations");
                    Ok(())
                }
                Err(e) => {
                    error!("Failed to run migrations: {}", e);
                    Err(Box::new(e))
                }
            }
        }
    }
}

/// Execute the reset command: drop everything and reapply all migrations
pub async fn reset() -> Result<(), Box<dyn Error>> {
    let config = DatabaseConfig::from_env()?;

    info!("Connecting to database: {}", config.url);
    let connection = Database::connect(&config.url).await?;

    info!("Resetting database (drop all tables, re-run migrations)...");
    match migration::Migrator::fresh(&connection).await {
        Ok(_) => {
            info!("Database reset complete");
            Ok(())
        }
        Err(e) => {
            error!("Failed to reset database: {}", e);
            Err(Box::new(e))
        }
    }
}

/// Execute the status command: log applied and pending migrations
pub async fn status() -> Result<(), Box<dyn Error>> {
    let config = DatabaseConfig::from_env()?;

    info!("Connecting to database: {}", config.url);
    let connection = Database::connect(&config.url).await?;

    match migration::Migrator::status(&connection).await {
        Ok(_) => Ok(()),
        Err(e) => {
            error!("Failed to query migration status: {}", e);
            Err(Box::new(e))
        }
    }
}
