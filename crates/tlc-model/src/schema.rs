//! Canonical trip-record schema: the fixed, versioned table that maps raw
//! extract headers onto warehouse column names.
//!
//! TLC publishes yellow-cab extracts in several vintages: modern files carry
//! `PULocationID`/`DOLocationID` zone references while pre-2016-07 files carry
//! raw pickup/dropoff coordinates, and the trailing surcharge columns
//! (`congestion_surcharge`, `airport_fee`, `cbd_congestion_fee`) appear only
//! from the vintage that introduced each fee. The warehouse accepts any such
//! subset: headers are normalized, renamed through this table, unknown columns
//! are dropped, and absent canonical columns load as NULL.

/// Bumped whenever a rename pair or column class changes.
pub const SCHEMA_VERSION: u32 = 1;

/// How raw values in a column are coerced into storable values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnClass {
    /// Trip timestamps; strings are parsed against the known format list.
    Timestamp,
    /// Fares, distances and surcharges; widened to `f64`.
    Float,
    /// Zone ids, passenger counts, rate codes; null-preserving integers.
    Int,
    /// Raw vendor number, mapped onto the two-code vendor set.
    Vendor,
    /// Raw payment number, normalized into the fixed payment catalog.
    Payment,
    /// Free-text flags stored as-is (`store_and_fwd_flag`).
    Text,
}

/// One canonical warehouse column and the raw headers that feed it.
#[derive(Debug, Clone, Copy)]
pub struct CanonicalColumn {
    /// Column name in the `trips` table (and in [`crate::trip::CoercedTrip`]).
    pub name: &'static str,
    /// Raw-extract aliases, in normalized form (lowercase, underscores).
    /// The canonical name itself always matches and is not repeated here.
    pub aliases: &'static [&'static str],
    pub class: ColumnClass,
    /// Required columns must survive coercion for a row to be stored.
    pub required: bool,
}

/// The full canonical column set, in warehouse column order.
pub const COLUMN_TABLE: &[CanonicalColumn] = &[
    CanonicalColumn {
        name: "pickup_time",
        aliases: &["tpep_pickup_datetime"],
        class: ColumnClass::Timestamp,
        required: true,
    },
    CanonicalColumn {
        name: "dropoff_time",
        aliases: &["tpep_dropoff_datetime"],
        class: ColumnClass::Timestamp,
        required: true,
    },
    CanonicalColumn {
        name: "distance",
        aliases: &["trip_distance"],
        class: ColumnClass::Float,
        required: false,
    },
    CanonicalColumn {
        name: "fare",
        aliases: &["fare_amount"],
        class: ColumnClass::Float,
        required: true,
    },
    CanonicalColumn {
        name: "tip_amount",
        aliases: &[],
        class: ColumnClass::Float,
        required: false,
    },
    CanonicalColumn {
        name: "total_amount",
        aliases: &[],
        class: ColumnClass::Float,
        required: false,
    },
    CanonicalColumn {
        name: "passenger_count",
        aliases: &[],
        class: ColumnClass::Int,
        required: false,
    },
    CanonicalColumn {
        name: "pickup_zone_id",
        aliases: &["pulocationid"],
        class: ColumnClass::Int,
        required: false,
    },
    CanonicalColumn {
        name: "dropoff_zone_id",
        aliases: &["dolocationid"],
        class: ColumnClass::Int,
        required: false,
    },
    CanonicalColumn {
        name: "vendor_id",
        aliases: &["vendorid"],
        class: ColumnClass::Vendor,
        required: false,
    },
    CanonicalColumn {
        name: "payment_id",
        aliases: &["payment_type"],
        class: ColumnClass::Payment,
        required: false,
    },
    CanonicalColumn {
        name: "pickup_long",
        aliases: &["pickup_longitude"],
        class: ColumnClass::Float,
        required: false,
    },
    CanonicalColumn {
        name: "pickup_lat",
        aliases: &["pickup_latitude"],
        class: ColumnClass::Float,
        required: false,
    },
    CanonicalColumn {
        name: "dropoff_long",
        aliases: &["dropoff_longitude"],
        class: ColumnClass::Float,
        required: false,
    },
    CanonicalColumn {
        name: "dropoff_lat",
        aliases: &["dropoff_latitude"],
        class: ColumnClass::Float,
        required: false,
    },
    CanonicalColumn {
        name: "ratecodeid",
        aliases: &["rate_code_id"],
        class: ColumnClass::Int,
        required: false,
    },
    CanonicalColumn {
        name: "store_and_fwd_flag",
        aliases: &[],
        class: ColumnClass::Text,
        required: false,
    },
    CanonicalColumn {
        name: "extra",
        aliases: &[],
        class: ColumnClass::Float,
        required: false,
    },
    CanonicalColumn {
        name: "mta_tax",
        aliases: &[],
        class: ColumnClass::Float,
        required: false,
    },
    CanonicalColumn {
        name: "tolls_amount",
        aliases: &[],
        class: ColumnClass::Float,
        required: false,
    },
    CanonicalColumn {
        name: "improvement_surcharge",
        aliases: &[],
        class: ColumnClass::Float,
        required: false,
    },
    CanonicalColumn {
        name: "congestion_surcharge",
        aliases: &[],
        class: ColumnClass::Float,
        required: false,
    },
    CanonicalColumn {
        name: "airport_fee",
        aliases: &["airport_fee_amount"],
        class: ColumnClass::Float,
        required: false,
    },
    CanonicalColumn {
        name: "cbd_congestion_fee",
        aliases: &[],
        class: ColumnClass::Float,
        required: false,
    },
];

/// Normalize a raw extract header for table lookup: trim, lowercase, and
/// replace inner whitespace with underscores.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .to_ascii_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Resolve a normalized header to its canonical column, if the table knows it.
pub fn resolve_column(normalized: &str) -> Option<&'static CanonicalColumn> {
    COLUMN_TABLE
        .iter()
        .find(|col| col.name == normalized || col.aliases.contains(&normalized))
}

/// Canonical names of the columns a storable row must carry.
pub fn required_columns() -> impl Iterator<Item = &'static str> {
    COLUMN_TABLE
        .iter()
        .filter(|col| col.required)
        .map(|col| col.name)
}
