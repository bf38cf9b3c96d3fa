//! Axis-aligned geometry shared by every collision test in the simulation.
//!
//! Rectangles are stored as a min corner plus extent (`x`, `y`, `w`, `h`).
//! Overlap is half-open: rectangles that only share an edge do not overlap.

use bevy::prelude::*;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of `size` centred on `center`. Entity hitboxes are built this way.
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            x: center.x - size.x * 0.5,
            y: center.y - size.y * 0.5,
            w: size.x,
            h: size.y,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.w, self.y + self.h)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    /// Smallest rectangle containing both.
    pub fn union(self, other: Self) -> Self {
        let min = self.min().min(other.min());
        let max = self.max().max(other.max());
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    /// Point of the rectangle nearest to `p` (`p` itself when inside).
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min(), self.max())
    }

    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        rect_overlap(self, other)
    }

    #[inline]
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        rect_overlaps_circle(self, center, radius)
    }
}

/// Half-open rectangle overlap. Symmetric in its arguments.
#[inline]
pub fn rect_overlap(a: &Aabb, b: &Aabb) -> bool {
    a.x + a.w > b.x && a.x < b.x + b.w && a.y + a.h > b.y && a.y < b.y + b.h
}

/// True when the circle touches or enters the rectangle.
///
/// Clamps the centre into the rectangle and compares squared distances, so the
/// result is monotone in `radius`.
#[inline]
pub fn rect_overlaps_circle(rect: &Aabb, center: Vec2, radius: f32) -> bool {
    let closest = rect.closest_point(center);
    center.distance_squared(closest) <= radius * radius
}

/// Segment/rectangle intersection (slab test). Used for line-of-sight checks.
pub fn segment_hits_rect(from: Vec2, to: Vec2, rect: &Aabb) -> bool {
    let d = to - from;
    let mut t_min = 0.0_f32;
    let mut t_max = 1.0_f32;

    for (origin, delta, lo, hi) in [
        (from.x, d.x, rect.x, rect.x + rect.w),
        (from.y, d.y, rect.y, rect.y + rect.h),
    ] {
        if delta.abs() <= f32::EPSILON {
            if origin < lo || origin > hi {
                return false;
            }
            continue;
        }
        let inv = 1.0 / delta;
        let (t0, t1) = {
            let a = (lo - origin) * inv;
            let b = (hi - origin) * inv;
            if a < b { (a, b) } else { (b, a) }
        };
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_min > t_max {
            return false;
        }
    }
    true
}

/// True when no rectangle in `blockers` crosses the segment.
pub fn line_of_sight(from: Vec2, to: Vec2, blockers: &[Aabb]) -> bool {
    !blockers.iter().any(|r| segment_hits_rect(from, to, r))
}

/// Rotate a direction by `degrees` (counter-clockwise).
#[inline]
pub fn rotate_degrees(v: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// xorshift64* for deterministic property checks.
    struct TestRng(u64);

    impl TestRng {
        fn next_f32(&mut self) -> f32 {
            let mut x = self.0;
            x ^= x >> 12;
            x ^= x << 25;
            x ^= x >> 27;
            self.0 = x;
            let v = (x.wrapping_mul(0x2545F4914F6CDD1D) >> 40) as u32;
            (v as f32) / ((1u32 << 24) as f32)
        }

        fn range(&mut self, lo: f32, hi: f32) -> f32 {
            lo + (hi - lo) * self.next_f32()
        }

        fn rect(&mut self) -> Aabb {
            Aabb::new(
                self.range(-200.0, 200.0),
                self.range(-200.0, 200.0),
                self.range(1.0, 120.0),
                self.range(1.0, 120.0),
            )
        }
    }

    #[test]
    fn rect_overlap_is_symmetric() {
        let mut rng = TestRng(0x9E37_79B9_7F4A_7C15);
        for _ in 0..2_000 {
            let a = rng.rect();
            let b = rng.rect();
            assert_eq!(rect_overlap(&a, &b), rect_overlap(&b, &a), "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn rect_overlaps_itself() {
        let a = Aabb::new(3.0, -7.0, 10.0, 4.0);
        assert!(rect_overlap(&a, &a));
    }

    #[test]
    fn shared_edges_do_not_overlap() {
        let a = Aabb::new(10.0, 20.0, 30.0, 40.0);
        let right = Aabb { x: a.x + a.w, ..a };
        let below = Aabb { y: a.y + a.h, ..a };
        let left = Aabb { x: a.x - a.w, ..a };
        assert!(!rect_overlap(&a, &right));
        assert!(!rect_overlap(&a, &below));
        assert!(!rect_overlap(&a, &left));

        let nudged = Aabb { x: a.x + a.w - 0.01, ..a };
        assert!(rect_overlap(&a, &nudged));
    }

    #[test]
    fn circle_overlap_is_monotone_in_radius() {
        let mut rng = TestRng(0xD1B5_4A32_D192_ED03);
        for _ in 0..500 {
            let rect = rng.rect();
            let center = Vec2::new(rng.range(-400.0, 400.0), rng.range(-400.0, 400.0));
            let r1 = rng.range(0.0, 150.0);
            let r2 = r1 + rng.range(0.0, 150.0);
            if rect_overlaps_circle(&rect, center, r1) {
                assert!(rect_overlaps_circle(&rect, center, r2));
            }
        }
    }

    #[test]
    fn circle_touching_edge_counts() {
        let rect = Aabb::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect_overlaps_circle(&rect, Vec2::new(15.0, 5.0), 5.0));
        assert!(!rect_overlaps_circle(&rect, Vec2::new(15.1, 5.0), 5.0));
        assert!(rect_overlaps_circle(&rect, Vec2::new(5.0, 5.0), 0.0));
    }

    #[test]
    fn centered_round_trips_center() {
        let r = Aabb::centered(Vec2::new(4.0, -2.0), Vec2::new(20.0, 10.0));
        assert_eq!(r.center(), Vec2::new(4.0, -2.0));
        assert_eq!(r.min(), Vec2::new(-6.0, -7.0));
    }

    #[test]
    fn segment_blocked_by_wall_between() {
        let wall = Aabb::new(-5.0, -50.0, 10.0, 100.0);
        assert!(segment_hits_rect(Vec2::new(-40.0, 0.0), Vec2::new(40.0, 0.0), &wall));
        assert!(!segment_hits_rect(Vec2::new(-40.0, 80.0), Vec2::new(40.0, 80.0), &wall));
        assert!(!segment_hits_rect(Vec2::new(-40.0, 0.0), Vec2::new(-20.0, 0.0), &wall));
        assert!(!line_of_sight(Vec2::new(-40.0, 0.0), Vec2::new(40.0, 0.0), &[wall]));
    }

    #[test]
    fn union_covers_both() {
        let a = Aabb::new(0.0, 0.0, 2.0, 2.0);
        let b = Aabb::new(5.0, -3.0, 1.0, 1.0);
        let u = a.union(b);
        assert_eq!(u, Aabb::new(0.0, -3.0, 6.0, 5.0));
    }
}
