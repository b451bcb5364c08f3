pub mod error;
pub mod reference;
pub mod schema;
pub mod trip;

pub use error::ModelError;
pub use reference::{
    PAYMENT_METHODS, PaymentMethod, UNKNOWN_PAYMENT_ID, VendorCode, Zone, normalize_payment_id,
};
pub use schema::{
    COLUMN_TABLE, CanonicalColumn, ColumnClass, SCHEMA_VERSION, normalize_header, required_columns,
    resolve_column,
};
pub use trip::{CoercedTrip, TripRecord};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_serializes() {
        let zone = Zone {
            zone_id: 132,
            borough: Some("Queens".to_string()),
            zone_name: Some("JFK Airport".to_string()),
            service_zone: Some("Airports".to_string()),
        };
        let json = serde_json::to_string(&zone).expect("serialize zone");
        let round: Zone = serde_json::from_str(&json).expect("deserialize zone");
        assert_eq!(round, zone);
    }

    #[test]
    fn column_table_covers_every_trip_field() {
        // CoercedTrip mirrors the canonical table field-for-field; a new
        // column must land in both places.
        let trip = CoercedTrip::default();
        let json = serde_json::to_value(&trip).expect("serialize trip");
        let fields = json.as_object().expect("object");
        assert_eq!(fields.len(), COLUMN_TABLE.len());
        for col in COLUMN_TABLE {
            assert!(fields.contains_key(col.name), "missing field {}", col.name);
        }
    }
}
