use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

use crate::geometry::geo_traits::Shape;
use crate::geometry::primitives::{Circle, Point, Rect};

/// Protrusion (in mm) tolerated by [`Container::contains`] to absorb floating point noise
pub const CONTAINMENT_TOLERANCE: f64 = 1e-6;

/// The bounded area in which bodies are laid out.
/// Every variant occupies `[0, width] x [0, height]`, with the floor at `y = 0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum Container {
    Rectangle { width: f64, height: f64 },
    /// Disk of the given diameter, centred at `(d/2, d/2)`
    Circle { diameter: f64 },
    /// Cable tray: floor and two side walls, no ceiling
    OpenTrough { width: f64, height: f64 },
}

impl Container {
    pub fn rectangle(width: f64, height: f64) -> Result<Self> {
        ensure_dimension("width", width)?;
        ensure_dimension("height", height)?;
        Ok(Container::Rectangle { width, height })
    }

    pub fn circle(diameter: f64) -> Result<Self> {
        ensure_dimension("diameter", diameter)?;
        Ok(Container::Circle { diameter })
    }

    pub fn open_trough(width: f64, height: f64) -> Result<Self> {
        ensure_dimension("width", width)?;
        ensure_dimension("height", height)?;
        Ok(Container::OpenTrough { width, height })
    }

    pub fn width(&self) -> f64 {
        match self {
            Container::Rectangle { width, .. } | Container::OpenTrough { width, .. } => *width,
            Container::Circle { diameter } => *diameter,
        }
    }

    pub fn height(&self) -> f64 {
        match self {
            Container::Rectangle { height, .. } | Container::OpenTrough { height, .. } => *height,
            Container::Circle { diameter } => *diameter,
        }
    }

    pub fn center(&self) -> Point {
        Point(self.width() / 2.0, self.height() / 2.0)
    }

    /// Checks whether `circle` lies entirely within the container
    pub fn contains(&self, circle: &Circle) -> bool {
        let (Point(x, y), r, tol) = (circle.center, circle.radius, CONTAINMENT_TOLERANCE);
        match self {
            Container::Rectangle { width, height } => {
                x - r >= -tol && x + r <= width + tol && y - r >= -tol && y + r <= height + tol
            }
            Container::OpenTrough { width, .. } => {
                x - r >= -tol && x + r <= width + tol && y - r >= -tol
            }
            Container::Circle { diameter } => {
                let outer = Circle::new(self.center(), diameter / 2.0);
                outer.encloses(circle, tol)
            }
        }
    }

    /// Returns a container of the same kind, sized so a `width` x `height` box fits inside it.
    /// A circle receives the diagonal of the box as its diameter.
    pub fn enclosing(&self, width: f64, height: f64) -> Result<Self> {
        match self {
            Container::Rectangle { .. } => Container::rectangle(width, height),
            Container::OpenTrough { .. } => Container::open_trough(width, height),
            Container::Circle { .. } => Container::circle(width.hypot(height)),
        }
    }
}

impl Shape for Container {
    fn area(&self) -> f64 {
        match self {
            Container::Circle { diameter } => Circle::new(self.center(), diameter / 2.0).area(),
            _ => self.bbox().area(),
        }
    }

    fn bbox(&self) -> Rect {
        Rect {
            x_min: 0.0,
            y_min: 0.0,
            x_max: self.width(),
            y_max: self.height(),
        }
    }
}

fn ensure_dimension(name: &str, value: f64) -> Result<()> {
    ensure!(
        value.is_finite() && value > 0.0,
        "container {name} must be positive and finite, got {value}"
    );
    Ok(())
}
