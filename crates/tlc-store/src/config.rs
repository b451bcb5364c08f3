//! Environment-driven store configuration.
//!
//! Connection settings come from the conventional `PG*` variables plus
//! `TLC_DB_NAME` for the warehouse database, all with local-development
//! defaults. Loading a `.env` file is the caller's concern; this module only
//! reads the process environment.

use std::env;

use sqlx::postgres::PgConnectOptions;

use crate::error::{Result, StoreError};

/// Database the bootstrap connection uses to create the warehouse database.
pub const ADMIN_DATABASE: &str = "postgres";

const DEFAULT_DATABASE: &str = "nyc_taxi";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
}

impl StoreConfig {
    /// Build a configuration from the process environment.
    ///
    /// # Errors
    /// Fails only on values that are present but unusable (`PGPORT` that is
    /// not a port number); absent variables fall back to defaults.
    pub fn from_env() -> Result<Self> {
        let port = match env::var("PGPORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| StoreError::Config(format!("PGPORT is not a port number: {raw}")))?,
            Err(_) => 5432,
        };
        Ok(Self {
            host: env::var("PGHOST").unwrap_or_else(|_| "localhost".to_string()),
            port,
            user: env::var("PGUSER").unwrap_or_else(|_| "postgres".to_string()),
            password: env::var("PGPASSWORD").unwrap_or_default(),
            database: env::var("TLC_DB_NAME").unwrap_or_else(|_| DEFAULT_DATABASE.to_string()),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        })
    }

    /// Connection options for the warehouse database.
    pub fn connect_options(&self) -> PgConnectOptions {
        self.connect_options_for(&self.database)
    }

    /// Connection options for the bootstrap/admin database.
    pub fn admin_connect_options(&self) -> PgConnectOptions {
        self.connect_options_for(ADMIN_DATABASE)
    }

    fn connect_options_for(&self, database: &str) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(database)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> StoreConfig {
        StoreConfig {
            host: "db.internal".to_string(),
            port: 5433,
            user: "loader".to_string(),
            password: "s3cret with spaces".to_string(),
            database: "trips_test".to_string(),
            max_connections: 2,
        }
    }

    #[test]
    fn options_carry_the_configured_database() {
        let options = test_config().connect_options();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 5433);
        assert_eq!(options.get_username(), "loader");
        assert_eq!(options.get_database(), Some("trips_test"));
    }

    #[test]
    fn admin_options_target_the_admin_database() {
        let options = test_config().admin_connect_options();
        assert_eq!(options.get_database(), Some(ADMIN_DATABASE));
        assert_eq!(options.get_port(), 5433);
    }
}
