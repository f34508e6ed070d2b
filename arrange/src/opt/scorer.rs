use serde::{Deserialize, Serialize};

use crate::config::{ArrangeConfig, ScoreWeights};
use crate::opt::configuration::PlacementConfiguration;

/// Composite score of a configuration along with the four axes it is made of, all in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub composite: f64,
    pub surface: f64,
    pub symmetry: f64,
    pub stability: f64,
    pub squareness: f64,
}

/// Scores [`PlacementConfiguration`]s. Pure: the same configuration always receives the same score.
///
/// Stability only inspects the cells directly below an object,
/// so it is meaningful for generated grid layouts, not for arbitrary scenes.
#[derive(Debug, Clone, Copy)]
pub struct MultiObjectiveScorer {
    pub weights: ScoreWeights,
    pub symmetry_tolerance: f64,
    pub support_tolerance: f64,
    pub min_support_fraction: f64,
}

impl MultiObjectiveScorer {
    pub fn new(config: &ArrangeConfig) -> Self {
        MultiObjectiveScorer {
            weights: config.weights,
            symmetry_tolerance: config.symmetry_tolerance,
            support_tolerance: config.support_tolerance,
            min_support_fraction: config.min_support_fraction,
        }
    }

    pub fn evaluate(&self, config: &PlacementConfiguration) -> ScoreBreakdown {
        let surface = self.surface(config);
        let symmetry = self.symmetry(config);
        let stability = self.stability(config);
        let squareness = squareness(config.width, config.height);

        let w = &self.weights;
        let composite = (w.surface * surface
            + w.symmetry * symmetry
            + w.stability * stability
            + w.squareness * squareness)
            / w.sum();

        ScoreBreakdown {
            composite: composite.clamp(0.0, 1.0),
            surface,
            symmetry,
            stability,
            squareness,
        }
    }

    /// Area of all cells over the area of the configuration
    pub fn surface(&self, config: &PlacementConfiguration) -> f64 {
        if config.placed.is_empty() {
            return 1.0;
        }
        let area = config.width * config.height;
        if area <= 0.0 {
            return 0.0;
        }
        let used: f64 = config.placed.iter().map(|c| c.size * c.size).sum();
        (used / area).clamp(0.0, 1.0)
    }

    /// Fraction of cells mirrored by an equal-diameter partner about the vertical centre line, or centred on it
    pub fn symmetry(&self, config: &PlacementConfiguration) -> f64 {
        let cells = &config.placed;
        if cells.is_empty() {
            return 1.0;
        }
        let tol = self.symmetry_tolerance;
        let mut checked = vec![false; cells.len()];
        let mut symmetric = 0;

        for (i, cell) in cells.iter().enumerate() {
            if checked[i] {
                continue;
            }
            let mirror_x = config.width - cell.x - cell.size;
            let partner = (0..cells.len()).find(|&j| {
                let other = &cells[j];
                j != i
                    && !checked[j]
                    && other.diameter == cell.diameter
                    && (other.x - mirror_x).abs() < tol
                    && (other.y - cell.y).abs() < tol
            });
            match partner {
                Some(j) => {
                    checked[i] = true;
                    checked[j] = true;
                    symmetric += 2;
                }
                None if (cell.x + cell.size / 2.0 - config.width / 2.0).abs() < tol => {
                    checked[i] = true;
                    symmetric += 1;
                }
                None => {}
            }
        }
        symmetric as f64 / cells.len() as f64
    }

    /// Fraction of cells on the floor, or resting on the cells right below them for a large enough share of their width
    pub fn stability(&self, config: &PlacementConfiguration) -> f64 {
        let cells = &config.placed;
        if cells.is_empty() {
            return 1.0;
        }
        let tol = self.support_tolerance;
        let stable = cells
            .iter()
            .filter(|cell| {
                if cell.y <= tol {
                    return true;
                }
                let supported: f64 = cells
                    .iter()
                    .filter(|below| (below.y_max() - cell.y).abs() <= tol)
                    .map(|below| cell.horizontal_overlap(below))
                    .sum();
                supported >= self.min_support_fraction * cell.size
            })
            .count();
        stable as f64 / cells.len() as f64
    }
}

/// `min(w, h) / max(w, h)`, 0 for a degenerate box
pub fn squareness(width: f64, height: f64) -> f64 {
    if width <= 0.0 || height <= 0.0 {
        return 0.0;
    }
    f64::min(width, height) / f64::max(width, height)
}
