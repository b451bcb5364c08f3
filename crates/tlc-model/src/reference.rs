//! Reference data seeded into the warehouse: vendors, payment methods and
//! taxi zones.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Technology vendor that recorded the trip. TLC extracts carry the raw
/// numeric code (1 or 2); anything else is treated as unknown and stored NULL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VendorCode {
    /// Creative Mobile Technologies, LLC (raw code 1).
    Cmt,
    /// VeriFone Transportation Systems (raw code 2).
    Vts,
}

impl VendorCode {
    /// Map a raw extract vendor number onto a code. Unmapped numbers yield
    /// `None`, never an error.
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            1 => Some(VendorCode::Cmt),
            2 => Some(VendorCode::Vts),
            _ => None,
        }
    }

    /// The code stored in the `vendors` table and referenced by trips.
    pub fn as_str(&self) -> &'static str {
        match self {
            VendorCode::Cmt => "CMT",
            VendorCode::Vts => "VTS",
        }
    }

    /// Human-readable vendor name, as seeded into the `vendors` table.
    pub fn vendor_name(&self) -> &'static str {
        match self {
            VendorCode::Cmt => "Creative Mobile Technologies",
            VendorCode::Vts => "VeriFone Transportation Systems",
        }
    }

    /// Every vendor the warehouse seeds.
    pub fn all() -> [VendorCode; 2] {
        [VendorCode::Cmt, VendorCode::Vts]
    }
}

impl fmt::Display for VendorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VendorCode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CMT" => Ok(VendorCode::Cmt),
            "VTS" => Ok(VendorCode::Vts),
            other => Err(ModelError::UnknownVendor(other.to_string())),
        }
    }
}

/// One row of the fixed payment-method catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaymentMethod {
    pub id: i32,
    pub code: &'static str,
    pub description: &'static str,
}

/// The six payment methods the warehouse knows, seeded idempotently.
pub const PAYMENT_METHODS: [PaymentMethod; 6] = [
    PaymentMethod { id: 1, code: "CRD", description: "Credit Card" },
    PaymentMethod { id: 2, code: "CSH", description: "Cash" },
    PaymentMethod { id: 3, code: "NOC", description: "No Charge" },
    PaymentMethod { id: 4, code: "DIS", description: "Dispute" },
    PaymentMethod { id: 5, code: "UNK", description: "Unknown" },
    PaymentMethod { id: 6, code: "VOD", description: "Voided Trip" },
];

/// Catalog id recorded when a present payment value is unparseable or outside
/// the catalog.
pub const UNKNOWN_PAYMENT_ID: i32 = 5;

/// Normalize a parsed raw payment value into a catalog id.
///
/// A present-but-unparseable value arrives here as `None` and falls back to
/// [`UNKNOWN_PAYMENT_ID`], as does any number outside the catalog. An extract
/// with no payment column at all never reaches this function; those rows store
/// NULL instead.
pub fn normalize_payment_id(parsed: Option<i64>) -> i32 {
    match parsed {
        Some(id) if PAYMENT_METHODS.iter().any(|method| i64::from(method.id) == id) => id as i32,
        _ => UNKNOWN_PAYMENT_ID,
    }
}

/// One taxi zone from the TLC zone lookup file. The zones table is fully
/// replaced on every seed, never patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub zone_id: i32,
    pub borough: Option<String>,
    pub zone_name: Option<String>,
    pub service_zone: Option<String>,
}
