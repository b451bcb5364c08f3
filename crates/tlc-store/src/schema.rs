//! Warehouse DDL: reference tables, the `trips` base table, and its indexes.
//!
//! Every statement is issued individually so a failure names the exact step.
//! Creation is idempotent throughout (`IF NOT EXISTS`); dropping the base
//! table is a separate, explicit operation.

/// Reference tables, in dependency order (trips references all three).
pub const CREATE_REFERENCE_TABLES: &[(&str, &str)] = &[
    (
        "vendors",
        "CREATE TABLE IF NOT EXISTS vendors (
            vendor_id VARCHAR(10) PRIMARY KEY,
            vendor_name VARCHAR(100)
        )",
    ),
    (
        "payments",
        "CREATE TABLE IF NOT EXISTS payments (
            payment_id INT PRIMARY KEY,
            payment_type VARCHAR(20) UNIQUE,
            description VARCHAR(100)
        )",
    ),
    (
        "zones",
        "CREATE TABLE IF NOT EXISTS zones (
            zone_id INT PRIMARY KEY,
            borough VARCHAR(50),
            zone_name VARCHAR(100),
            service_zone VARCHAR(50)
        )",
    ),
];

/// The base table. The three required columns are NOT NULL; everything the
/// extracts may omit is nullable. `pickup_weekday`, `pickup_hour` and
/// `trip_duration_min` are generated from the stored times, so the loader can
/// never write a value that disagrees with them.
pub const CREATE_TRIPS_TABLE: &str = "CREATE TABLE IF NOT EXISTS trips (
    trip_id SERIAL PRIMARY KEY,
    pickup_time TIMESTAMP NOT NULL,
    dropoff_time TIMESTAMP NOT NULL,
    distance FLOAT,
    fare FLOAT NOT NULL,
    tip_amount FLOAT,
    total_amount FLOAT,
    passenger_count INT,
    pickup_zone_id INT REFERENCES zones(zone_id),
    dropoff_zone_id INT REFERENCES zones(zone_id),
    vendor_id VARCHAR(10) REFERENCES vendors(vendor_id),
    payment_id INT REFERENCES payments(payment_id),
    pickup_long FLOAT,
    pickup_lat FLOAT,
    dropoff_long FLOAT,
    dropoff_lat FLOAT,
    ratecodeid INT,
    store_and_fwd_flag VARCHAR(5),
    extra FLOAT,
    mta_tax FLOAT,
    tolls_amount FLOAT,
    improvement_surcharge FLOAT,
    congestion_surcharge FLOAT,
    airport_fee FLOAT,
    cbd_congestion_fee FLOAT,
    pickup_weekday INT GENERATED ALWAYS AS (EXTRACT(DOW FROM pickup_time)) STORED,
    pickup_hour INT GENERATED ALWAYS AS (EXTRACT(HOUR FROM pickup_time)) STORED,
    trip_duration_min FLOAT GENERATED ALWAYS AS (
        EXTRACT(EPOCH FROM (dropoff_time - pickup_time)) / 60
    ) STORED
)";

pub const DROP_TRIPS_TABLE: &str = "DROP TABLE IF EXISTS trips CASCADE";

/// Base-table indexes for the downstream read patterns
/// (weekday/hour buckets, time ranges, zone/payment/vendor filters).
pub const TRIPS_INDEXES: &[(&str, &str)] = &[
    (
        "idx_trips_weekday_hour",
        "CREATE INDEX IF NOT EXISTS idx_trips_weekday_hour ON trips (pickup_weekday, pickup_hour)",
    ),
    (
        "idx_trips_pickup_time",
        "CREATE INDEX IF NOT EXISTS idx_trips_pickup_time ON trips (pickup_time)",
    ),
    (
        "idx_trips_pickup_zone",
        "CREATE INDEX IF NOT EXISTS idx_trips_pickup_zone ON trips (pickup_zone_id)",
    ),
    (
        "idx_trips_dropoff_zone",
        "CREATE INDEX IF NOT EXISTS idx_trips_dropoff_zone ON trips (dropoff_zone_id)",
    ),
    (
        "idx_trips_payment",
        "CREATE INDEX IF NOT EXISTS idx_trips_payment ON trips (payment_id)",
    ),
    (
        "idx_trips_vendor",
        "CREATE INDEX IF NOT EXISTS idx_trips_vendor ON trips (vendor_id)",
    ),
    (
        "idx_trips_zone_pair",
        "CREATE INDEX IF NOT EXISTS idx_trips_zone_pair ON trips (pickup_zone_id, dropoff_zone_id)",
    ),
];

pub const VACUUM_ANALYZE_TRIPS: &str = "VACUUM ANALYZE trips";

#[cfg(test)]
mod tests {
    use super::*;
    use tlc_model::schema::COLUMN_TABLE;

    #[test]
    fn required_columns_are_not_null() {
        assert!(CREATE_TRIPS_TABLE.contains("pickup_time TIMESTAMP NOT NULL"));
        assert!(CREATE_TRIPS_TABLE.contains("dropoff_time TIMESTAMP NOT NULL"));
        assert!(CREATE_TRIPS_TABLE.contains("fare FLOAT NOT NULL"));
    }

    #[test]
    fn derived_columns_are_generated_from_stored_times() {
        assert!(CREATE_TRIPS_TABLE.contains(
            "pickup_weekday INT GENERATED ALWAYS AS (EXTRACT(DOW FROM pickup_time)) STORED"
        ));
        assert!(
            CREATE_TRIPS_TABLE
                .contains("pickup_hour INT GENERATED ALWAYS AS (EXTRACT(HOUR FROM pickup_time))")
        );
        assert!(CREATE_TRIPS_TABLE.contains("EXTRACT(EPOCH FROM (dropoff_time - pickup_time)) / 60"));
    }

    #[test]
    fn every_canonical_column_has_a_ddl_column() {
        for col in COLUMN_TABLE {
            assert!(
                CREATE_TRIPS_TABLE.contains(col.name),
                "trips DDL lacks column {}",
                col.name
            );
        }
    }

    #[test]
    fn creation_is_idempotent() {
        assert!(CREATE_TRIPS_TABLE.starts_with("CREATE TABLE IF NOT EXISTS"));
        for (_, sql) in CREATE_REFERENCE_TABLES {
            assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS"));
        }
        for (name, sql) in TRIPS_INDEXES {
            assert!(sql.starts_with("CREATE INDEX IF NOT EXISTS"), "{name}");
            assert!(sql.contains(name));
        }
    }

    #[test]
    fn seven_base_indexes() {
        assert_eq!(TRIPS_INDEXES.len(), 7);
    }
}
