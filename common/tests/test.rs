use common::shapes::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn test_new_and_getters() {
    let bb = BoundingBox::new(Point::new(0.0, 0.0), Point::new(4.0, 6.0));
    assert_eq!(bb.width(), 4.0);
    assert_eq!(bb.height(), 6.0);
    assert_eq!(bb.min(), Point::new(0.0, 0.0));
    assert_eq!(bb.max(), Point::new(4.0, 6.0));
    assert_eq!(bb.center(), Point::new(2.0, 3.0));
}

#[test]
fn test_corners_are_normalized() {
    let bb = BoundingBox::new(Point::new(4.0, 0.0), Point::new(0.0, 6.0));
    assert_eq!(bb.min(), Point::new(0.0, 0.0));
    assert_eq!(bb.max(), Point::new(4.0, 6.0));
}

#[test]
fn test_distance_sq() {
    let a = Point::new(1.0, 1.0);
    let b = Point::new(4.0, 5.0);
    assert_eq!(a.distance_sq(&b), 25.0);
    assert_eq!(b.distance_sq(&a), 25.0);
    assert_eq!(a.distance_sq(&a), 0.0);
}

#[test]
fn test_contains_point_edges() {
    let bb = BoundingBox::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
    assert!(bb.contains_point(&Point::new(0.0, 0.0)));
    assert!(bb.contains_point(&Point::new(1.0, 1.0)));
    assert!(bb.contains_point(&Point::new(0.5, 0.5)));
    assert!(!bb.contains_point(&Point::new(1.0001, 0.5)));
    assert!(!bb.contains_point(&Point::new(0.5, -0.0001)));
}

#[test]
fn test_quadrant_ties_go_low() {
    let bb = BoundingBox::new(Point::new(0.0, 0.0), Point::new(2.0, 2.0));
    assert_eq!(bb.quadrant_of(&Point::new(1.0, 1.0)), 0);
    assert_eq!(bb.quadrant_of(&Point::new(1.0, 1.5)), 1);
    assert_eq!(bb.quadrant_of(&Point::new(1.5, 1.0)), 2);
    assert_eq!(bb.quadrant_of(&Point::new(1.5, 1.5)), 3);
}

#[test]
fn test_quadrants_tile_parent() {
    let bb = BoundingBox::new(Point::new(-2.0, 4.0), Point::new(6.0, 8.0));
    let q: Vec<_> = (0..4).map(|i| bb.quadrant(i)).collect();
    assert_eq!(q[0].min(), Point::new(-2.0, 4.0));
    assert_eq!(q[0].max(), Point::new(2.0, 6.0));
    assert_eq!(q[1].min(), Point::new(-2.0, 6.0));
    assert_eq!(q[1].max(), Point::new(2.0, 8.0));
    assert_eq!(q[2].min(), Point::new(2.0, 4.0));
    assert_eq!(q[2].max(), Point::new(6.0, 6.0));
    assert_eq!(q[3].min(), Point::new(2.0, 6.0));
    assert_eq!(q[3].max(), Point::new(6.0, 8.0));
    let area: f64 = q.iter().map(|b| b.width() * b.height()).sum();
    assert_eq!(area, bb.width() * bb.height());
}

#[test]
fn test_routed_point_lies_in_its_quadrant() {
    let bb = BoundingBox::new(Point::new(-10.0, -10.0), Point::new(10.0, 10.0));

    // Use a fixed seed for reproducibility.
    let mut rng: StdRng = SeedableRng::seed_from_u64(123);

    for _ in 0..1000 {
        let p = Point::new(rng.gen_range(-10.0..=10.0), rng.gen_range(-10.0..=10.0));
        let q = bb.quadrant(bb.quadrant_of(&p));
        assert!(q.contains_point(&p), "{:?} not in {:?}", p, q);
    }
}

#[test]
fn test_expand_inside_is_noop() {
    let bb = BoundingBox::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
    assert!(bb.expanded_to_include(&Point::new(0.5, 1.0), 1.3).is_none());
}

#[test]
fn test_expand_overshoots_point() {
    let bb = BoundingBox::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
    let grown = bb.expanded_to_include(&Point::new(2.0, 0.5), 1.5).unwrap();
    assert_eq!(grown.min(), Point::new(0.0, 0.0));
    assert_eq!(grown.max(), Point::new(3.0, 1.0));

    let grown = bb.expanded_to_include(&Point::new(-1.0, -3.0), 2.0).unwrap();
    assert_eq!(grown.min(), Point::new(-3.0, -7.0));
    assert_eq!(grown.max(), Point::new(1.0, 1.0));
    assert!(grown.contains_point(&Point::new(-1.0, -3.0)));
}

#[test]
fn test_expand_degenerate_box() {
    let bb = BoundingBox::new(Point::new(1.0, 1.0), Point::new(1.0, 1.0));
    let grown = bb.expanded_to_include(&Point::new(3.0, 1.0), 1.3).unwrap();
    assert!(grown.contains_point(&Point::new(3.0, 1.0)));
    assert!(grown.max().x > 3.0);
}

#[test]
fn test_point_conversions() {
    assert_eq!(Point::from((1.0, 2.0)), Point::new(1.0, 2.0));
    assert_eq!(Point::from([3.0, 4.0]), Point::new(3.0, 4.0));
    assert_eq!(Point::new(3.0, 4.0).axis(1), 4.0);
    assert!(!Point::new(f64::NAN, 0.0).is_finite());
}
