//! The fixed catalog of materialized aggregates.
//!
//! Readers never compute these on the fly; every view is dropped and rebuilt
//! from its defining query on refresh, so each definition here is the single
//! source of truth for its contents. Averages are stored at full precision;
//! rounding is a read-side presentation concern.

/// Bumped whenever a defining query or index changes.
pub const CATALOG_VERSION: u32 = 1;

/// One materialized aggregate: its name, defining query, and the indexes
/// built right after it inside the same transaction.
#[derive(Debug, Clone, Copy)]
pub struct AggregateDef {
    pub name: &'static str,
    pub defining_query: &'static str,
    pub indexes: &'static [&'static str],
}

/// All aggregates, in rebuild order. Later entries may assume earlier ones
/// exist, but none of the defining queries reads another view; every one
/// derives from the base tables alone.
pub const AGGREGATES: &[AggregateDef] = &[
    AggregateDef {
        name: "analytics_kpis",
        defining_query: "SELECT
            COUNT(*) AS total_trips,
            SUM(total_amount) AS total_revenue,
            AVG(fare) AS avg_fare,
            AVG(distance) AS avg_distance,
            AVG(trip_duration_min) AS avg_duration_min,
            MIN(pickup_time) AS min_pickup_time,
            MAX(pickup_time) AS max_pickup_time,
            COUNT(DISTINCT pickup_zone_id) AS active_pickup_zones,
            COUNT(DISTINCT dropoff_zone_id) AS active_dropoff_zones
        FROM trips",
        indexes: &[],
    },
    AggregateDef {
        name: "analytics_payment_mix",
        defining_query: "SELECT
            p.payment_type,
            COUNT(*) AS trip_count,
            AVG(t.fare) AS avg_fare,
            SUM(t.total_amount) AS total_revenue
        FROM trips t
        LEFT JOIN payments p ON t.payment_id = p.payment_id
        GROUP BY p.payment_type",
        indexes: &[
            "CREATE INDEX IF NOT EXISTS idx_analytics_payment_mix_payment_type
             ON analytics_payment_mix (payment_type)",
        ],
    },
    AggregateDef {
        name: "analytics_trips_by_borough",
        defining_query: "SELECT
            z.borough,
            COUNT(*) AS trip_count,
            AVG(t.fare) AS avg_fare,
            AVG(t.distance) AS avg_distance
        FROM trips t
        LEFT JOIN zones z ON t.pickup_zone_id = z.zone_id
        GROUP BY z.borough",
        indexes: &[
            "CREATE INDEX IF NOT EXISTS idx_analytics_trips_by_borough_borough
             ON analytics_trips_by_borough (borough)",
        ],
    },
    AggregateDef {
        name: "analytics_trips_by_weekday",
        defining_query: "SELECT
            pickup_weekday AS weekday,
            COUNT(*) AS trip_count,
            AVG(fare) AS avg_fare
        FROM trips
        GROUP BY pickup_weekday",
        indexes: &[
            "CREATE INDEX IF NOT EXISTS idx_analytics_trips_by_weekday_weekday
             ON analytics_trips_by_weekday (weekday)",
        ],
    },
    AggregateDef {
        name: "analytics_trips_by_hour",
        defining_query: "SELECT
            pickup_hour AS hour,
            COUNT(*) AS trip_count,
            AVG(fare) AS avg_fare
        FROM trips
        GROUP BY pickup_hour",
        indexes: &[
            "CREATE INDEX IF NOT EXISTS idx_analytics_trips_by_hour_hour
             ON analytics_trips_by_hour (hour)",
        ],
    },
    AggregateDef {
        name: "trip_analytics_summary",
        defining_query: "SELECT
            z.borough,
            t.pickup_weekday AS weekday,
            t.pickup_hour AS hour,
            COUNT(*) AS total_trips,
            AVG(t.fare) AS avg_fare,
            AVG(t.distance) AS avg_distance,
            AVG(t.trip_duration_min) AS avg_duration_min
        FROM trips t
        LEFT JOIN zones z ON t.pickup_zone_id = z.zone_id
        GROUP BY z.borough, t.pickup_weekday, t.pickup_hour",
        indexes: &[
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_trip_analytics_summary
             ON trip_analytics_summary (borough, weekday, hour)",
        ],
    },
    AggregateDef {
        name: "trip_zone_density",
        defining_query: "SELECT
            pickup_zone_id,
            COUNT(*) AS pickup_count,
            dropoff_zone_id,
            COUNT(*) FILTER (WHERE dropoff_zone_id IS NOT NULL) AS dropoff_count
        FROM trips
        GROUP BY pickup_zone_id, dropoff_zone_id",
        indexes: &[
            "CREATE INDEX IF NOT EXISTS idx_trip_zone_density_pickup
             ON trip_zone_density (pickup_zone_id)",
            "CREATE INDEX IF NOT EXISTS idx_trip_zone_density_pair
             ON trip_zone_density (pickup_zone_id, dropoff_zone_id)",
        ],
    },
    AggregateDef {
        name: "peak_hours",
        // Standard competition ranking: tied buckets share a rank and the
        // following rank skips.
        defining_query: "SELECT
            pickup_weekday AS weekday,
            pickup_hour AS hour,
            COUNT(*) AS trip_count,
            RANK() OVER (ORDER BY COUNT(*) DESC) AS rank
        FROM trips
        GROUP BY pickup_weekday, pickup_hour",
        indexes: &[
            "CREATE INDEX IF NOT EXISTS idx_peak_hours_rank
             ON peak_hours (rank, weekday, hour)",
            "CREATE INDEX IF NOT EXISTS idx_peak_hours_wh
             ON peak_hours (weekday, hour)",
        ],
    },
    AggregateDef {
        name: "vendor_performance",
        defining_query: "SELECT
            v.vendor_name AS vendor,
            COUNT(*) AS total_trips,
            AVG(t.fare) AS avg_fare,
            AVG(t.total_amount) AS avg_earning
        FROM trips t
        JOIN vendors v ON t.vendor_id = v.vendor_id
        GROUP BY v.vendor_name",
        indexes: &[
            "CREATE INDEX IF NOT EXISTS idx_vendor_performance
             ON vendor_performance (vendor, total_trips)",
        ],
    },
];

/// Look an aggregate up by name.
pub fn aggregate(name: &str) -> Option<&'static AggregateDef> {
    AGGREGATES.iter().find(|def| def.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_stable() {
        let names: Vec<&str> = AGGREGATES.iter().map(|def| def.name).collect();
        insta::assert_debug_snapshot!(names, @r#"
        [
            "analytics_kpis",
            "analytics_payment_mix",
            "analytics_trips_by_borough",
            "analytics_trips_by_weekday",
            "analytics_trips_by_hour",
            "trip_analytics_summary",
            "trip_zone_density",
            "peak_hours",
            "vendor_performance",
        ]
        "#);
    }

    #[test]
    fn names_are_unique_and_lookup_works() {
        let mut names: Vec<&str> = AGGREGATES.iter().map(|def| def.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), AGGREGATES.len());
        assert!(aggregate("peak_hours").is_some());
        assert!(aggregate("no_such_view").is_none());
    }

    #[test]
    fn averages_are_stored_unrounded() {
        for def in AGGREGATES {
            assert!(
                !def.defining_query.to_uppercase().contains("ROUND"),
                "{} rounds at write time",
                def.name
            );
        }
    }

    #[test]
    fn peak_hours_uses_gapped_rank() {
        let def = aggregate("peak_hours").unwrap();
        assert!(def.defining_query.contains("RANK() OVER (ORDER BY COUNT(*) DESC)"));
        assert!(!def.defining_query.contains("DENSE_RANK"));
    }

    #[test]
    fn defining_queries_read_base_tables_only() {
        for def in AGGREGATES {
            let query = def.defining_query.to_lowercase();
            for other in AGGREGATES {
                assert!(
                    !query.contains(other.name),
                    "{} reads from aggregate {}",
                    def.name,
                    other.name
                );
            }
        }
    }

    #[test]
    fn indexes_target_their_own_view() {
        for def in AGGREGATES {
            for index in def.indexes {
                assert!(
                    index.trim_start().starts_with("CREATE INDEX IF NOT EXISTS")
                        || index.trim_start().starts_with("CREATE UNIQUE INDEX IF NOT EXISTS"),
                    "{}",
                    def.name
                );
                assert!(
                    index.contains(&format!("ON {} ", def.name)),
                    "index for {} targets another relation",
                    def.name
                );
            }
        }
    }

    #[test]
    fn view_columns_follow_the_read_contract() {
        let kpis = aggregate("analytics_kpis").unwrap().defining_query;
        assert!(kpis.contains("AS min_pickup_time"));
        assert!(kpis.contains("AS max_pickup_time"));
        assert!(kpis.contains("AS active_pickup_zones"));
        assert!(kpis.contains("AS active_dropoff_zones"));

        for name in [
            "analytics_payment_mix",
            "analytics_trips_by_borough",
            "analytics_trips_by_weekday",
            "analytics_trips_by_hour",
            "peak_hours",
        ] {
            assert!(
                aggregate(name).unwrap().defining_query.contains("COUNT(*) AS trip_count"),
                "{name} lost its trip_count column"
            );
        }

        let vendor = aggregate("vendor_performance").unwrap().defining_query;
        assert!(vendor.contains("v.vendor_name AS vendor"));
        assert!(vendor.contains("AS avg_earning"));
    }

    #[test]
    fn zone_density_counts_pickups_and_non_null_dropoffs() {
        let def = aggregate("trip_zone_density").unwrap();
        assert!(def.defining_query.contains("COUNT(*) AS pickup_count"));
        assert!(
            def.defining_query
                .contains("COUNT(*) FILTER (WHERE dropoff_zone_id IS NOT NULL) AS dropoff_count")
        );
        assert!(def.defining_query.contains("GROUP BY pickup_zone_id, dropoff_zone_id"));
    }

    #[test]
    fn summary_grain_is_unique() {
        let def = aggregate("trip_analytics_summary").unwrap();
        assert!(def.indexes[0].contains("CREATE UNIQUE INDEX"));
        assert!(def.indexes[0].contains("(borough, weekday, hour)"));
    }
}
