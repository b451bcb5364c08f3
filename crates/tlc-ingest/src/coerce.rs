//! Table-driven type coercion from a canonical frame into typed trip rows.
//!
//! Coercion never rejects a row: unparseable values become `None` in the
//! [`CoercedTrip`], and the loader's required-field check is the single place
//! rows drop out. Vendor and payment columns apply their documented
//! fallbacks here (unmapped vendor -> NULL, out-of-catalog payment -> id 5).

use polars::prelude::{AnyValue, DataFrame};

use tlc_model::reference::{VendorCode, normalize_payment_id};
use tlc_model::schema::COLUMN_TABLE;
use tlc_model::trip::CoercedTrip;

use crate::error::Result;
use crate::value::{any_to_datetime, any_to_f64, any_to_i64, any_to_text};

type FieldSetter = fn(&mut CoercedTrip, AnyValue<'_>);

fn any_to_i32(value: AnyValue<'_>) -> Option<i32> {
    any_to_i64(value).and_then(|v| i32::try_from(v).ok())
}

/// The assignment function for one canonical column, or `None` for a name the
/// trip row has no field for (guarded by a test against the column table).
fn field_setter(name: &str) -> Option<FieldSetter> {
    let setter: FieldSetter = match name {
        "pickup_time" => |trip, v| trip.pickup_time = any_to_datetime(v),
        "dropoff_time" => |trip, v| trip.dropoff_time = any_to_datetime(v),
        "distance" => |trip, v| trip.distance = any_to_f64(v),
        "fare" => |trip, v| trip.fare = any_to_f64(v),
        "tip_amount" => |trip, v| trip.tip_amount = any_to_f64(v),
        "total_amount" => |trip, v| trip.total_amount = any_to_f64(v),
        "passenger_count" => |trip, v| trip.passenger_count = any_to_i32(v),
        "pickup_zone_id" => |trip, v| trip.pickup_zone_id = any_to_i32(v),
        "dropoff_zone_id" => |trip, v| trip.dropoff_zone_id = any_to_i32(v),
        "vendor_id" => |trip, v| trip.vendor_id = any_to_i64(v).and_then(VendorCode::from_raw),
        "payment_id" => |trip, v| trip.payment_id = Some(normalize_payment_id(any_to_i64(v))),
        "pickup_long" => |trip, v| trip.pickup_long = any_to_f64(v),
        "pickup_lat" => |trip, v| trip.pickup_lat = any_to_f64(v),
        "dropoff_long" => |trip, v| trip.dropoff_long = any_to_f64(v),
        "dropoff_lat" => |trip, v| trip.dropoff_lat = any_to_f64(v),
        "ratecodeid" => |trip, v| trip.ratecodeid = any_to_i32(v),
        "store_and_fwd_flag" => |trip, v| trip.store_and_fwd_flag = any_to_text(v),
        "extra" => |trip, v| trip.extra = any_to_f64(v),
        "mta_tax" => |trip, v| trip.mta_tax = any_to_f64(v),
        "tolls_amount" => |trip, v| trip.tolls_amount = any_to_f64(v),
        "improvement_surcharge" => |trip, v| trip.improvement_surcharge = any_to_f64(v),
        "congestion_surcharge" => |trip, v| trip.congestion_surcharge = any_to_f64(v),
        "airport_fee" => |trip, v| trip.airport_fee = any_to_f64(v),
        "cbd_congestion_fee" => |trip, v| trip.cbd_congestion_fee = any_to_f64(v),
        _ => return None,
    };
    Some(setter)
}

/// Coerce every row of a canonical-named frame into a [`CoercedTrip`].
///
/// Canonical columns absent from the frame leave their fields `None` for all
/// rows; a payment column that is absent therefore stores NULL while a
/// present-but-null payment value falls back to the unknown id.
///
/// # Errors
/// Only frame access errors propagate; value-level problems become `None`s.
pub fn coerce_trips(frame: &DataFrame) -> Result<Vec<CoercedTrip>> {
    let mut trips = vec![CoercedTrip::default(); frame.height()];
    for canonical in COLUMN_TABLE {
        let Ok(column) = frame.column(canonical.name) else {
            continue;
        };
        let Some(assign) = field_setter(canonical.name) else {
            continue;
        };
        for (idx, trip) in trips.iter_mut().enumerate() {
            assign(trip, column.get(idx)?);
        }
    }
    Ok(trips)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{Column, IntoColumn, NamedFrom, Series};

    #[test]
    fn every_canonical_column_has_a_setter() {
        for col in COLUMN_TABLE {
            assert!(field_setter(col.name).is_some(), "no setter for {}", col.name);
        }
        assert!(field_setter("not_a_column").is_none());
    }

    fn canonical_frame() -> DataFrame {
        let cols: Vec<Column> = vec![
            Series::new(
                "pickup_time".into(),
                vec![
                    Some("2024-03-01 08:30:00"),
                    Some("2024-03-01 09:00:00"),
                    Some("not a time"),
                ],
            )
            .into_column(),
            Series::new(
                "dropoff_time".into(),
                vec![
                    Some("2024-03-01 08:45:00"),
                    Some("2024-03-01 09:20:00"),
                    Some("2024-03-01 10:00:00"),
                ],
            )
            .into_column(),
            Series::new("fare".into(), vec![Some(14.5), None, Some(9.0)]).into_column(),
            Series::new("vendor_id".into(), vec![Some(1i64), Some(7), None]).into_column(),
            Series::new("payment_id".into(), vec![Some(2i64), Some(9), None]).into_column(),
            Series::new("passenger_count".into(), vec![Some(1.0f64), Some(2.0), None])
                .into_column(),
        ];
        DataFrame::new(cols).expect("test frame")
    }

    #[test]
    fn values_coerce_and_nulls_survive() {
        let trips = coerce_trips(&canonical_frame()).unwrap();
        assert_eq!(trips.len(), 3);

        assert!(trips[0].pickup_time.is_some());
        assert_eq!(trips[0].fare, Some(14.5));
        assert_eq!(trips[0].passenger_count, Some(1));

        // Row 1: missing fare stays None; row 2: unparseable pickup stays None.
        assert_eq!(trips[1].fare, None);
        assert!(trips[2].pickup_time.is_none());
        assert!(trips[2].dropoff_time.is_some());
    }

    #[test]
    fn vendor_maps_known_codes_and_nulls_the_rest() {
        let trips = coerce_trips(&canonical_frame()).unwrap();
        assert_eq!(trips[0].vendor_id, Some(VendorCode::Cmt));
        assert_eq!(trips[1].vendor_id, None);
        assert_eq!(trips[2].vendor_id, None);
    }

    #[test]
    fn present_payment_column_always_yields_an_id() {
        let trips = coerce_trips(&canonical_frame()).unwrap();
        assert_eq!(trips[0].payment_id, Some(2));
        assert_eq!(trips[1].payment_id, Some(5));
        assert_eq!(trips[2].payment_id, Some(5));
    }

    #[test]
    fn absent_payment_column_stores_null() {
        let cols: Vec<Column> =
            vec![Series::new("fare".into(), vec![Some(10.0)]).into_column()];
        let frame = DataFrame::new(cols).unwrap();
        let trips = coerce_trips(&frame).unwrap();
        assert_eq!(trips[0].payment_id, None);
    }
}
