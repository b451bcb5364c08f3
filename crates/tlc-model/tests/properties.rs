//! Property tests for the lookup normalization rules.

use proptest::prelude::*;

use tlc_model::{VendorCode, normalize_header, normalize_payment_id, resolve_column};

proptest! {
    // Whatever the extract carries, the stored payment id is in the catalog.
    #[test]
    fn payment_normalization_stays_in_catalog(raw in proptest::option::of(any::<i64>())) {
        let id = normalize_payment_id(raw);
        prop_assert!((1..=6).contains(&id));
    }

    #[test]
    fn catalog_payment_ids_pass_through(raw in 1i64..=6) {
        prop_assert_eq!(normalize_payment_id(Some(raw)), raw as i32);
    }

    #[test]
    fn vendor_codes_accept_only_known_ids(raw in any::<i64>()) {
        let parsed = VendorCode::from_raw(raw);
        prop_assert_eq!(parsed.is_some(), raw == 1 || raw == 2);
    }

    #[test]
    fn header_normalization_is_idempotent(raw in "[ A-Za-z0-9_/()-]{0,40}") {
        let once = normalize_header(&raw);
        let twice = normalize_header(&once);
        prop_assert_eq!(once, twice);
    }

    // Longer than any canonical name or alias without underscores, so these
    // can never resolve.
    #[test]
    fn random_headers_do_not_resolve(raw in "[a-z]{13,24}") {
        prop_assert!(resolve_column(&raw).is_none());
    }
}
