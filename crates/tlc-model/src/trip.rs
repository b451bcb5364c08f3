//! Typed trip rows: the coerced form produced by ingestion and the storable
//! form accepted by the bulk loader.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::reference::VendorCode;

/// A trip after type coercion, before required-field validation. Every field
/// is optional; unparseable or absent values arrive as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoercedTrip {
    pub pickup_time: Option<NaiveDateTime>,
    pub dropoff_time: Option<NaiveDateTime>,
    pub distance: Option<f64>,
    pub fare: Option<f64>,
    pub tip_amount: Option<f64>,
    pub total_amount: Option<f64>,
    pub passenger_count: Option<i32>,
    pub pickup_zone_id: Option<i32>,
    pub dropoff_zone_id: Option<i32>,
    pub vendor_id: Option<VendorCode>,
    pub payment_id: Option<i32>,
    pub pickup_long: Option<f64>,
    pub pickup_lat: Option<f64>,
    pub dropoff_long: Option<f64>,
    pub dropoff_lat: Option<f64>,
    pub ratecodeid: Option<i32>,
    pub store_and_fwd_flag: Option<String>,
    pub extra: Option<f64>,
    pub mta_tax: Option<f64>,
    pub tolls_amount: Option<f64>,
    pub improvement_surcharge: Option<f64>,
    pub congestion_surcharge: Option<f64>,
    pub airport_fee: Option<f64>,
    pub cbd_congestion_fee: Option<f64>,
}

impl CoercedTrip {
    /// Promote the row to a storable [`TripRecord`], or `None` when any
    /// required field failed coercion. This is the single place a row can be
    /// dropped; callers count the `None`s.
    pub fn into_record(self) -> Option<TripRecord> {
        let pickup_time = self.pickup_time?;
        let dropoff_time = self.dropoff_time?;
        let fare = self.fare?;
        Some(TripRecord {
            pickup_time,
            dropoff_time,
            fare,
            distance: self.distance,
            tip_amount: self.tip_amount,
            total_amount: self.total_amount,
            passenger_count: self.passenger_count,
            pickup_zone_id: self.pickup_zone_id,
            dropoff_zone_id: self.dropoff_zone_id,
            vendor_id: self.vendor_id,
            payment_id: self.payment_id,
            pickup_long: self.pickup_long,
            pickup_lat: self.pickup_lat,
            dropoff_long: self.dropoff_long,
            dropoff_lat: self.dropoff_lat,
            ratecodeid: self.ratecodeid,
            store_and_fwd_flag: self.store_and_fwd_flag,
            extra: self.extra,
            mta_tax: self.mta_tax,
            tolls_amount: self.tolls_amount,
            improvement_surcharge: self.improvement_surcharge,
            congestion_surcharge: self.congestion_surcharge,
            airport_fee: self.airport_fee,
            cbd_congestion_fee: self.cbd_congestion_fee,
        })
    }
}

/// A storable trip. The three required fields are plain values here; rows
/// missing any of them never become a `TripRecord`.
///
/// The warehouse derives `pickup_weekday`, `pickup_hour` and
/// `trip_duration_min` from the stored times via generated columns, so they
/// are deliberately absent from this struct: the loader cannot write them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub pickup_time: NaiveDateTime,
    pub dropoff_time: NaiveDateTime,
    pub fare: f64,
    pub distance: Option<f64>,
    pub tip_amount: Option<f64>,
    pub total_amount: Option<f64>,
    pub passenger_count: Option<i32>,
    pub pickup_zone_id: Option<i32>,
    pub dropoff_zone_id: Option<i32>,
    pub vendor_id: Option<VendorCode>,
    pub payment_id: Option<i32>,
    pub pickup_long: Option<f64>,
    pub pickup_lat: Option<f64>,
    pub dropoff_long: Option<f64>,
    pub dropoff_lat: Option<f64>,
    pub ratecodeid: Option<i32>,
    pub store_and_fwd_flag: Option<String>,
    pub extra: Option<f64>,
    pub mta_tax: Option<f64>,
    pub tolls_amount: Option<f64>,
    pub improvement_surcharge: Option<f64>,
    pub congestion_surcharge: Option<f64>,
    pub airport_fee: Option<f64>,
    pub cbd_congestion_fee: Option<f64>,
}
