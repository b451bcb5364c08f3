//! The warehouse store handle.
//!
//! One [`Store`] owns one connection pool, scoped to a run and passed down
//! explicitly; nothing here is process-global. Database bootstrap goes
//! through a short-lived admin connection instead.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::error::Result;
use crate::schema::{
    CREATE_REFERENCE_TABLES, CREATE_TRIPS_TABLE, DROP_TRIPS_TABLE, TRIPS_INDEXES,
    VACUUM_ANALYZE_TRIPS,
};

/// Create the warehouse database when it does not exist yet. Returns `true`
/// when this call created it.
///
/// # Errors
/// Fails when the admin database is unreachable or `CREATE DATABASE` is
/// rejected.
pub async fn ensure_database(config: &StoreConfig) -> Result<bool> {
    let admin = PgPoolOptions::new()
        .max_connections(1)
        .connect_with(config.admin_connect_options())
        .await?;
    let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM pg_database WHERE datname = $1")
        .bind(&config.database)
        .fetch_optional(&admin)
        .await?;
    let created = if exists.is_some() {
        debug!(database = %config.database, "database already exists");
        false
    } else {
        // CREATE DATABASE cannot run inside a transaction; issue it over the
        // simple protocol on the admin connection.
        let stmt = format!(
            "CREATE DATABASE \"{}\"",
            config.database.replace('"', "\"\"")
        );
        sqlx::raw_sql(&stmt).execute(&admin).await?;
        info!(database = %config.database, "created database");
        true
    };
    admin.close().await;
    Ok(created)
}

/// Handle on the warehouse database. Constructed once per run and injected
/// into seeding, loading and aggregate refresh.
#[derive(Debug, Clone)]
pub struct Store {
    pool: PgPool,
}

impl Store {
    /// Connect a pool against the configured warehouse database.
    ///
    /// # Errors
    /// Fails when the database is unreachable or authentication is rejected.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(config.connect_options())
            .await?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Whether a relation exists in the current schema search path.
    pub async fn table_exists(&self, qualified_name: &str) -> Result<bool> {
        let found: Option<String> = sqlx::query_scalar("SELECT to_regclass($1)::text")
            .bind(qualified_name)
            .fetch_one(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    /// Create the reference tables (vendors, payments, zones) when absent.
    pub async fn ensure_reference_tables(&self) -> Result<()> {
        for (name, sql) in CREATE_REFERENCE_TABLES {
            sqlx::raw_sql(sql).execute(&self.pool).await?;
            debug!(table = name, "ensured reference table");
        }
        Ok(())
    }

    /// Create the `trips` table, optionally dropping any existing table
    /// first (full-reload semantics). Indexes are a separate step.
    ///
    /// # Errors
    /// Any DDL failure aborts; each statement is issued on its own so the
    /// error points at the failing step.
    pub async fn ensure_trips_table(&self, drop_existing: bool) -> Result<()> {
        if drop_existing && self.table_exists("public.trips").await? {
            sqlx::raw_sql(DROP_TRIPS_TABLE).execute(&self.pool).await?;
            info!("dropped existing trips table");
        }
        sqlx::raw_sql(CREATE_TRIPS_TABLE).execute(&self.pool).await?;
        info!("ensured trips table");
        Ok(())
    }

    /// Create the base-table indexes when absent.
    pub async fn ensure_trips_indexes(&self) -> Result<()> {
        for (name, sql) in TRIPS_INDEXES {
            sqlx::raw_sql(sql).execute(&self.pool).await?;
            debug!(index = name, "ensured index");
        }
        Ok(())
    }

    /// Refresh planner statistics after bulk loading. Runs outside any
    /// transaction; VACUUM refuses to start inside one.
    pub async fn vacuum_analyze_trips(&self) -> Result<()> {
        sqlx::raw_sql(VACUUM_ANALYZE_TRIPS)
            .execute(&self.pool)
            .await?;
        info!("vacuum analyze complete");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
