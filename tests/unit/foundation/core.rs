use super::*;

#[test]
fn lerp_f64_hits_endpoints_and_midpoint() {
    assert_eq!(<f64 as Lerp>::lerp(&2.0, &6.0, 0.0), 2.0);
    assert_eq!(<f64 as Lerp>::lerp(&2.0, &6.0, 1.0), 6.0);
    assert_eq!(<f64 as Lerp>::lerp(&2.0, &6.0, 0.5), 4.0);
}

#[test]
fn lerp_point_is_componentwise() {
    let p = <Point as Lerp>::lerp(&Point::new(0.0, 10.0), &Point::new(10.0, 20.0), 0.25);
    assert_eq!(p, Point::new(2.5, 12.5));
}

#[test]
fn clamp_percent_bounds() {
    assert_eq!(clamp_percent(-3.0), 0.0);
    assert_eq!(clamp_percent(140.0), 100.0);
    assert_eq!(clamp_percent(42.5), 42.5);
}

#[test]
fn same_time_absorbs_noise_only() {
    assert!(same_time(33.3, 33.3 + 1e-12));
    assert!(!same_time(33.3, 33.3001));
}
