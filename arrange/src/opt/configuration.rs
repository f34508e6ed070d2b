use anyhow::{Result, bail};
use conduit_rs::geometry::primitives::{Point, Rect};
use conduit_rs::util::FPA;
use serde::{Deserialize, Serialize};

use crate::opt::scorer::ScoreBreakdown;
use crate::opt::strategies::Strategy;

/// Slack (mm) allowed on containment and overlap checks between cells
pub const CELL_EPSILON: f64 = 1e-6;

/// Axis of the container held fixed during an arrangement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Width,
    Height,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisLock {
    pub axis: Axis,
    pub value: f64,
}

impl AxisLock {
    pub fn width(value: f64) -> Self {
        AxisLock {
            axis: Axis::Width,
            value,
        }
    }

    pub fn height(value: f64) -> Self {
        AxisLock {
            axis: Axis::Height,
            value,
        }
    }

    /// Whether a configuration of the given extent respects the lock
    pub fn admits(&self, width: f64, height: f64) -> bool {
        let extent = match self.axis {
            Axis::Width => width,
            Axis::Height => height,
        };
        FPA(extent) <= FPA(self.value)
    }
}

/// A square cell reserved for a single object, `(x, y)` being its bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedCell {
    pub id: usize,
    pub diameter: f64,
    pub size: f64,
    pub x: f64,
    pub y: f64,
}

impl PlacedCell {
    pub fn center(&self) -> Point {
        Point(self.x + self.size / 2.0, self.y + self.size / 2.0)
    }

    pub fn x_max(&self) -> f64 {
        self.x + self.size
    }

    pub fn y_max(&self) -> f64 {
        self.y + self.size
    }

    /// Overlap of the open interiors, touching cells do not overlap
    pub fn overlaps(&self, other: &PlacedCell) -> bool {
        self.x < other.x_max() - CELL_EPSILON
            && other.x < self.x_max() - CELL_EPSILON
            && self.y < other.y_max() - CELL_EPSILON
            && other.y < self.y_max() - CELL_EPSILON
    }

    /// Length of the horizontal projection shared with `other`
    pub fn horizontal_overlap(&self, other: &PlacedCell) -> f64 {
        f64::max(0.0, f64::min(self.x_max(), other.x_max()) - f64::max(self.x, other.x))
    }
}

/// A candidate arrangement: a container extent and one cell per object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementConfiguration {
    pub strategy: Strategy,
    pub width: f64,
    pub height: f64,
    pub lock: Option<AxisLock>,
    pub entraxe: f64,
    pub placed: Vec<PlacedCell>,
    pub score: Option<ScoreBreakdown>,
}

impl PlacementConfiguration {
    pub fn new(strategy: Strategy, width: f64, height: f64, lock: Option<AxisLock>, entraxe: f64) -> Self {
        PlacementConfiguration {
            strategy,
            width,
            height,
            lock,
            entraxe,
            placed: vec![],
            score: None,
        }
    }

    pub fn cell_size(&self, diameter: f64) -> f64 {
        diameter + self.entraxe
    }

    /// Whether the cell of an object with `diameter` fits at `(x, y)` without overlapping any placed cell
    pub fn can_place(&self, x: f64, y: f64, diameter: f64) -> bool {
        let size = self.cell_size(diameter);
        let candidate = PlacedCell {
            id: usize::MAX,
            diameter,
            size,
            x,
            y,
        };
        x >= -CELL_EPSILON
            && y >= -CELL_EPSILON
            && x + size <= self.width + CELL_EPSILON
            && y + size <= self.height + CELL_EPSILON
            && !self.placed.iter().any(|c| c.overlaps(&candidate))
    }

    pub fn place(&mut self, id: usize, x: f64, y: f64, diameter: f64) -> Result<()> {
        if !self.can_place(x, y, diameter) {
            bail!(
                "cannot place object {id} (d={diameter}) at ({x:.1}, {y:.1}) in {:.1}x{:.1}",
                self.width,
                self.height
            );
        }
        self.placed.push(PlacedCell {
            id,
            diameter,
            size: self.cell_size(diameter),
            x,
            y,
        });
        Ok(())
    }

    /// Bounding box of all placed cells, `None` when nothing is placed
    pub fn tight_bounds(&self) -> Option<Rect> {
        self.placed
            .iter()
            .map(|c| Rect {
                x_min: c.x,
                y_min: c.y,
                x_max: c.x_max(),
                y_max: c.y_max(),
            })
            .reduce(|a, b| a.union(&b))
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        for cell in self.placed.iter_mut() {
            cell.x += dx;
            cell.y += dy;
        }
    }

    pub fn centers(&self) -> impl Iterator<Item = (usize, Point)> + '_ {
        self.placed.iter().map(|c| (c.id, c.center()))
    }

    pub fn composite_score(&self) -> f64 {
        self.score.map_or(0.0, |s| s.composite)
    }
}
