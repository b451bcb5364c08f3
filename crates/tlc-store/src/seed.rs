//! Reference-data seeding.
//!
//! Vendors and payment methods are fixed catalogs inserted idempotently
//! (`ON CONFLICT DO NOTHING`), so re-running a load never duplicates or
//! rewrites them. Zones come from the TLC lookup file and are fully replaced
//! on every seed.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use tlc_model::reference::{PAYMENT_METHODS, VendorCode, Zone};

use crate::error::Result;
use crate::store::Store;

/// Seed the two-vendor catalog. Returns how many rows were newly inserted.
pub async fn seed_vendors(store: &Store) -> Result<u64> {
    let mut inserted = 0;
    for vendor in VendorCode::all() {
        let result = sqlx::query(
            "INSERT INTO vendors (vendor_id, vendor_name) VALUES ($1, $2)
             ON CONFLICT (vendor_id) DO NOTHING",
        )
        .bind(vendor.as_str())
        .bind(vendor.vendor_name())
        .execute(store.pool())
        .await?;
        inserted += result.rows_affected();
    }
    info!(inserted, "seeded vendors");
    Ok(inserted)
}

/// Seed the six-method payment catalog. Returns how many rows were newly
/// inserted.
pub async fn seed_payments(store: &Store) -> Result<u64> {
    let mut inserted = 0;
    for method in PAYMENT_METHODS {
        let result = sqlx::query(
            "INSERT INTO payments (payment_id, payment_type, description) VALUES ($1, $2, $3)
             ON CONFLICT (payment_id) DO NOTHING",
        )
        .bind(method.id)
        .bind(method.code)
        .bind(method.description)
        .execute(store.pool())
        .await?;
        inserted += result.rows_affected();
    }
    info!(inserted, "seeded payment methods");
    Ok(inserted)
}

/// One row of the TLC zone lookup file
/// (`LocationID,Borough,Zone,service_zone`).
#[derive(Debug, Deserialize)]
struct ZoneLookupRow {
    #[serde(rename = "LocationID")]
    location_id: i32,
    #[serde(rename = "Borough")]
    borough: Option<String>,
    #[serde(rename = "Zone")]
    zone: Option<String>,
    #[serde(rename = "service_zone")]
    service_zone: Option<String>,
}

impl From<ZoneLookupRow> for Zone {
    fn from(row: ZoneLookupRow) -> Self {
        Zone {
            zone_id: row.location_id,
            borough: row.borough,
            zone_name: row.zone,
            service_zone: row.service_zone,
        }
    }
}

/// Read the zone lookup file.
///
/// # Errors
/// Fails on a missing or malformed file; callers decide whether an absent
/// lookup skips the stage.
pub fn read_zone_lookup(path: &Path) -> Result<Vec<Zone>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut zones = Vec::new();
    for row in reader.deserialize::<ZoneLookupRow>() {
        zones.push(Zone::from(row?));
    }
    Ok(zones)
}

/// Replace the zones table with the given rows, atomically.
///
/// Truncation cascades to referencing rows, so zone reloads belong before
/// trip loading on a fresh base table.
pub async fn replace_zones(store: &Store, zones: &[Zone]) -> Result<usize> {
    let mut tx = store.pool().begin().await?;
    sqlx::raw_sql("TRUNCATE TABLE zones CASCADE")
        .execute(&mut *tx)
        .await?;
    for zone in zones {
        sqlx::query(
            "INSERT INTO zones (zone_id, borough, zone_name, service_zone)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(zone.zone_id)
        .bind(zone.borough.as_deref())
        .bind(zone.zone_name.as_deref())
        .bind(zone.service_zone.as_deref())
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    info!(zones = zones.len(), "replaced zone lookup");
    Ok(zones.len())
}

/// Read and load the zone lookup in one step.
pub async fn load_zones(store: &Store, path: &Path) -> Result<usize> {
    let zones = read_zone_lookup(path)?;
    replace_zones(store, &zones).await
}
