use std::f64::consts::TAU;

use crate::geometry::primitives::Point;

/// Smallest ring spacing used by the free-spot search, in mm
pub const MIN_RING_STEP: f64 = 2.0;
/// Ring spacing as a fraction of the radius of the object being placed
pub const RING_STEP_FRACTION: f64 = 0.25;

/// Iterator over candidate positions around an origin: first the origin itself,
/// then concentric rings of growing radius, each sampled at roughly `step` mm along its circumference.
/// Stops once the ring radius exceeds `max_radius`.
#[derive(Clone, Debug)]
pub struct RingSampler {
    origin: Point,
    step: f64,
    max_radius: f64,
    ring_radius: f64,
    n_samples: usize,
    sample: usize,
    origin_done: bool,
}

impl RingSampler {
    pub fn new(origin: Point, step: f64, max_radius: f64) -> Self {
        debug_assert!(step > 0.0);
        RingSampler {
            origin,
            step,
            max_radius,
            ring_radius: 0.0,
            n_samples: 0,
            sample: 0,
            origin_done: false,
        }
    }

    /// Sampler with the ring spacing derived from the radius of the object being placed
    pub fn for_radius(origin: Point, object_radius: f64, max_radius: f64) -> Self {
        let step = f64::max(MIN_RING_STEP, object_radius * RING_STEP_FRACTION);
        Self::new(origin, step, max_radius)
    }

    fn next_ring(&mut self) -> bool {
        self.ring_radius += self.step;
        if self.ring_radius > self.max_radius {
            return false;
        }
        self.n_samples = usize::max(1, (TAU * self.ring_radius / self.step).ceil() as usize);
        self.sample = 0;
        true
    }
}

impl Iterator for RingSampler {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if !self.origin_done {
            self.origin_done = true;
            return Some(self.origin);
        }
        if self.sample >= self.n_samples && !self.next_ring() {
            return None;
        }
        let angle = TAU * self.sample as f64 / self.n_samples as f64;
        self.sample += 1;
        Some(Point(
            self.origin.0 + self.ring_radius * angle.cos(),
            self.origin.1 + self.ring_radius * angle.sin(),
        ))
    }
}
