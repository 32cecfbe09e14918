//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{StatusRepository, WorkflowRepository};

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use trellis_shared::config::DatabaseConfig;

/// Establishes a connection pool to the database.
///
/// Connection acquisition and server-side statements are bounded by the
/// configured timeouts so no store call can block a request indefinitely.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut url = config.url.clone();
    if config.statement_timeout_secs > 0 && !url.contains("statement_timeout") {
        let sep = if url.contains('?') { '&' } else { '?' };
        url.push_str(&format!(
            "{sep}options=-c%20statement_timeout%3D{}s",
            config.statement_timeout_secs
        ));
    }

    let mut options = ConnectOptions::new(url);
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs));

    Database::connect(options).await
}
