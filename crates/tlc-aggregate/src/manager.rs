//! Full drop-and-rebuild of the aggregate catalog.
//!
//! Each aggregate rebuilds inside one transaction: drop, create, then its
//! indexes, every statement issued individually so a failure names the exact
//! step. Readers see the old view or the fully rebuilt one, never a partial
//! state. A failure stops the catalog walk; aggregates already rebuilt stay
//! valid.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use sqlx::{Postgres, Transaction};
use tracing::{debug, info};

use tlc_store::Store;

use crate::catalog::{AGGREGATES, AggregateDef};
use crate::error::{RefreshError, RefreshStep, Result};

/// What rebuilding one aggregate did, for the run report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateRebuild {
    pub name: String,
    pub indexes: usize,
    pub elapsed_ms: u64,
}

pub struct MaterializedAggregateManager<'a> {
    store: &'a Store,
}

impl<'a> MaterializedAggregateManager<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Rebuild every aggregate in catalog order.
    ///
    /// # Errors
    /// Stops at the first failing aggregate; earlier rebuilds stay committed.
    pub async fn rebuild_all(&self) -> Result<Vec<AggregateRebuild>> {
        let mut rebuilt = Vec::with_capacity(AGGREGATES.len());
        for def in AGGREGATES {
            rebuilt.push(self.rebuild(def).await?);
        }
        info!(aggregates = rebuilt.len(), "aggregate catalog rebuilt");
        Ok(rebuilt)
    }

    /// Drop and rebuild one aggregate, indexes included, in one transaction.
    pub async fn rebuild(&self, def: &AggregateDef) -> Result<AggregateRebuild> {
        let started = Instant::now();
        let mut tx = self.store.pool().begin().await?;

        let drop_stmt = format!("DROP MATERIALIZED VIEW IF EXISTS {} CASCADE", def.name);
        step(&mut tx, &drop_stmt, def.name, RefreshStep::Drop).await?;

        let create_stmt = format!(
            "CREATE MATERIALIZED VIEW {} AS {}",
            def.name, def.defining_query
        );
        step(&mut tx, &create_stmt, def.name, RefreshStep::Create).await?;

        for index in def.indexes {
            step(&mut tx, index, def.name, RefreshStep::Index).await?;
        }

        tx.commit().await?;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        debug!(aggregate = def.name, indexes = def.indexes.len(), elapsed_ms, "rebuilt aggregate");
        Ok(AggregateRebuild {
            name: def.name.to_string(),
            indexes: def.indexes.len(),
            elapsed_ms,
        })
    }
}

async fn step(
    tx: &mut Transaction<'_, Postgres>,
    sql: &str,
    aggregate: &'static str,
    step: RefreshStep,
) -> Result<()> {
    sqlx::raw_sql(sql)
        .execute(&mut **tx)
        .await
        .map_err(|source| RefreshError::Step { aggregate, step, source })?;
    Ok(())
}
