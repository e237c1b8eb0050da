use super::*;
use proptest::prelude::*;

#[test]
fn encode_strips_trailing_zeros_and_point() {
    assert_eq!(encode_percent_key(50.0), "50");
    assert_eq!(encode_percent_key(12.5), "12.5");
    assert_eq!(encode_percent_key(0.0), "0");
    assert_eq!(encode_percent_key(100.0), "100");
    assert_eq!(encode_percent_key(33.333_333), "33.333");
}

#[test]
fn encode_absorbs_float_noise() {
    assert_eq!(
        encode_percent_key(33.333_33),
        encode_percent_key(33.333_331)
    );
    assert_eq!(encode_percent_key(0.1 + 0.2), "0.3");
}

#[test]
fn encode_handles_negative_zero_and_non_finite() {
    assert_eq!(encode_percent_key(-0.0), "0");
    assert_eq!(encode_percent_key(-0.0001), "0");
    assert_eq!(encode_percent_key(f64::NAN), "0");
    assert_eq!(encode_percent_key(f64::INFINITY), "0");
}

#[test]
fn resolve_prefers_canonical_key() {
    let mut map = BTreeMap::new();
    map.insert("25".to_string(), SceneSnapshot::default());
    let (key, _) = resolve_snapshot(25.000_000_1, &map).unwrap();
    assert_eq!(key, "25");
}

#[test]
fn resolve_falls_back_to_legacy_raw_key() {
    let mut map = BTreeMap::new();
    map.insert("33.33333333".to_string(), SceneSnapshot::default());
    let (key, _) = resolve_snapshot(33.333_333_33, &map).unwrap();
    assert_eq!(key, "33.33333333");
}

#[test]
fn resolve_scans_numerically_as_last_resort() {
    let mut map = BTreeMap::new();
    map.insert("40.0000".to_string(), SceneSnapshot::default());
    let (key, _) = resolve_snapshot(40.0, &map).unwrap();
    assert_eq!(key, "40.0000");
}

#[test]
fn resolve_misses_return_none() {
    let mut map = BTreeMap::new();
    map.insert("10".to_string(), SceneSnapshot::default());
    map.insert("not-a-number".to_string(), SceneSnapshot::default());
    assert!(resolve_snapshot(10.5, &map).is_none());
}

#[test]
fn non_finite_values_never_resolve() {
    let mut map = BTreeMap::new();
    map.insert("0".to_string(), SceneSnapshot::default());
    assert!(resolve_snapshot(f64::NAN, &map).is_none());
    assert!(resolve_snapshot(f64::INFINITY, &map).is_none());
    assert!(resolve_snapshot(f64::NEG_INFINITY, &map).is_none());
}

proptest! {
    #[test]
    fn encode_is_idempotent_under_rounding(x in -1.0e6f64..1.0e6f64) {
        let rounded = (x * 1000.0).round() / 1000.0;
        prop_assert_eq!(encode_percent_key(x), encode_percent_key(rounded));
    }

    #[test]
    fn resolve_after_write_succeeds(x in 0.0f64..100.0f64) {
        let mut map = BTreeMap::new();
        map.insert(encode_percent_key(x), SceneSnapshot::default());
        prop_assert!(resolve_snapshot(x, &map).is_some());
    }
}
