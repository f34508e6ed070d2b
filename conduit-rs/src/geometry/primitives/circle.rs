use std::f64::consts::PI;

use crate::geometry::geo_traits::{CollidesWith, Shape};
use crate::geometry::primitives::{Point, Rect};

/// Geometric primitive representing a circle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        debug_assert!(
            radius.is_finite() && radius >= 0.0,
            "invalid circle radius: {radius}"
        );
        debug_assert!(center.is_finite(), "invalid circle center: {center:?}");

        Self { center, radius }
    }

    /// True if the interiors of both circles intersect. Touching circles do not overlap.
    pub fn overlaps(&self, other: &Circle) -> bool {
        let min_dist = self.radius + other.radius;
        self.center.sq_distance(&other.center) < min_dist * min_dist
    }

    /// True if `other` lies entirely inside `self`, allowing `tolerance` of protrusion
    pub fn encloses(&self, other: &Circle, tolerance: f64) -> bool {
        self.center.distance(&other.center) + other.radius <= self.radius + tolerance
    }
}

impl CollidesWith<Point> for Circle {
    fn collides_with(&self, point: &Point) -> bool {
        point.sq_distance(&self.center) <= self.radius.powi(2)
    }
}

impl Shape for Circle {
    fn area(&self) -> f64 {
        PI * self.radius.powi(2)
    }

    fn bbox(&self) -> Rect {
        let (r, x, y) = (self.radius, self.center.0, self.center.1);
        Rect {
            x_min: x - r,
            y_min: y - r,
            x_max: x + r,
            y_max: y + r,
        }
    }
}
