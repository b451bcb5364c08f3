use std::fs::File;

use polars::prelude::{
    Column, DataFrame, DataType, IntoColumn, NamedFrom, ParquetWriter, Series, TimeUnit,
};

use tlc_ingest::{IngestError, ingest_trip_file};
use tlc_model::VendorCode;

const MODERN_CSV: &str = "\
VendorID,tpep_pickup_datetime,tpep_dropoff_datetime,passenger_count,trip_distance,RatecodeID,store_and_fwd_flag,PULocationID,DOLocationID,payment_type,fare_amount,extra,mta_tax,tip_amount,tolls_amount,improvement_surcharge,total_amount,congestion_surcharge,Airport_fee
2,2024-03-01 08:30:00,2024-03-01 08:45:00,1,2.5,1,N,132,236,1,14.5,0.5,0.5,3.0,0.0,1.0,19.5,2.5,0.0
1,2024-03-01 09:00:00,2024-03-01 09:20:00,2,4.1,1,N,138,161,2,21.0,0.5,0.5,0.0,6.55,1.0,29.55,2.5,1.75
";

const LEGACY_CSV: &str = "\
vendorid,tpep_pickup_datetime,tpep_dropoff_datetime,passenger_count,trip_distance,pickup_longitude,pickup_latitude,dropoff_longitude,dropoff_latitude,payment_type,fare_amount,total_amount
1,2015-06-01 07:00:00,2015-06-01 07:25:00,1,5.2,-73.9857,40.7484,-73.7781,40.6413,2,24.0,27.8
";

#[test]
fn modern_csv_ingests_with_zone_ids() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("yellow_2024-03.csv");
    std::fs::write(&path, MODERN_CSV).expect("write csv");

    let ingested = ingest_trip_file(&path).expect("ingest");
    assert_eq!(ingested.rows_read, 2);
    assert_eq!(ingested.trips.len(), 2);
    assert!(ingested.dropped_columns.is_empty());

    let first = &ingested.trips[0];
    assert_eq!(first.vendor_id, Some(VendorCode::Vts));
    assert_eq!(first.pickup_zone_id, Some(132));
    assert_eq!(first.dropoff_zone_id, Some(236));
    assert_eq!(first.payment_id, Some(1));
    assert_eq!(first.fare, Some(14.5));
    assert_eq!(first.airport_fee, Some(0.0));
    assert!(first.pickup_long.is_none());

    // Zone-id vintages are missing exactly the coordinate and CBD-fee columns.
    assert_eq!(
        ingested.missing_columns,
        vec![
            "pickup_long",
            "pickup_lat",
            "dropoff_long",
            "dropoff_lat",
            "cbd_congestion_fee",
        ]
    );
}

#[test]
fn legacy_csv_ingests_with_coordinates() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("yellow_2015-06.csv");
    std::fs::write(&path, LEGACY_CSV).expect("write csv");

    let ingested = ingest_trip_file(&path).expect("ingest");
    let trip = &ingested.trips[0];
    assert_eq!(trip.vendor_id, Some(VendorCode::Cmt));
    assert_eq!(trip.pickup_long, Some(-73.9857));
    assert_eq!(trip.pickup_lat, Some(40.7484));
    assert!(trip.pickup_zone_id.is_none());
    assert!(ingested.missing_columns.contains(&"pickup_zone_id"));
    assert!(ingested.missing_columns.contains(&"airport_fee"));
}

#[test]
fn unknown_columns_drop_and_rows_survive() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("extra_cols.csv");
    std::fs::write(
        &path,
        "tpep_pickup_datetime,tpep_dropoff_datetime,fare_amount,mystery_col\n\
         2024-03-01 08:30:00,2024-03-01 08:45:00,14.5,hello\n",
    )
    .expect("write csv");

    let ingested = ingest_trip_file(&path).expect("ingest");
    assert_eq!(ingested.trips.len(), 1);
    assert_eq!(ingested.dropped_columns, vec!["mystery_col"]);
    assert_eq!(ingested.trips[0].fare, Some(14.5));
}

#[test]
fn parquet_ingests_native_datetimes() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("yellow_2024-03.parquet");

    // 2024-03-01 08:30:00 / 08:45:00 UTC in epoch microseconds.
    let pickup = Series::new("tpep_pickup_datetime".into(), vec![1_709_281_800_000_000i64])
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))
        .expect("cast pickup");
    let dropoff = Series::new("tpep_dropoff_datetime".into(), vec![1_709_282_700_000_000i64])
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))
        .expect("cast dropoff");
    let cols: Vec<Column> = vec![
        pickup.into_column(),
        dropoff.into_column(),
        Series::new("fare_amount".into(), vec![Some(14.5f64)]).into_column(),
        Series::new("VendorID".into(), vec![Some(2i64)]).into_column(),
    ];
    let mut frame = DataFrame::new(cols).expect("frame");
    let file = File::create(&path).expect("create parquet");
    ParquetWriter::new(file).finish(&mut frame).expect("write parquet");

    let ingested = ingest_trip_file(&path).expect("ingest");
    let trip = &ingested.trips[0];
    let pickup = trip.pickup_time.expect("pickup time");
    assert_eq!(pickup.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-03-01 08:30:00");
    let minutes = (trip.dropoff_time.unwrap() - pickup).num_minutes();
    assert_eq!(minutes, 15);
    assert_eq!(trip.vendor_id, Some(VendorCode::Vts));
}

#[test]
fn unsupported_extension_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("trips.xlsx");
    std::fs::write(&path, "not a trip file").expect("write file");

    let err = ingest_trip_file(&path).expect_err("must fail");
    assert!(matches!(err, IngestError::UnsupportedFormat(_)));
}
