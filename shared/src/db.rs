//! Database connection management.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::{Config, Error, Result};

/// Create a database connection pool.
///
/// The password is resolved separately (it may come from Secrets Manager)
/// and passed in, so this never touches the environment.
pub async fn create_pool(config: &Config, password: &str) -> Result<PgPool> {
    let database_url = format!(
        "postgres://{}:{}@{}:{}/{}",
        config.db_username, password, config.db_host, config.db_port, config.db_name
    );

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&database_url)
        .await
        .map_err(Error::Database)?;

    Ok(pool)
}
