use anyhow::{Result, ensure};
use conduit_rs::io::dxf::DxfDrawOptions;
use conduit_rs::io::svg::SvgDrawOptions;
use conduit_rs::util::PhysicsConfig;
use serde::{Deserialize, Serialize};

/// Configuration of the automatic arrangement
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct ArrangeConfig {
    /// Clearance (mm) reserved around every object: each object occupies a square cell of `diameter + entraxe`
    pub entraxe: f64,
    /// Clearance (mm) added once around a tightened configuration
    pub outer_margin: f64,
    /// Width/height ratio the bottom-left strategy aims for
    pub target_aspect: f64,
    /// Weights of the four scoring axes
    pub weights: ScoreWeights,
    /// Max deviation (mm) for two objects to count as mirrored, or for one to count as centred
    pub symmetry_tolerance: f64,
    /// Max gap (mm) between an object and the top of the cells supporting it
    pub support_tolerance: f64,
    /// Fraction of a cell's width that must rest on supporting cells
    pub min_support_fraction: f64,
    /// Shrink unlocked axes to the occupied extent plus `outer_margin`
    pub auto_tighten: bool,
    /// Object count above which the arrangement is expected to be slow or crowded, only logged
    pub max_objects: usize,
    /// Physics constants used when settling the scene after an arrangement
    #[serde(default)]
    pub physics: PhysicsConfig,
    /// Optional SVG drawing options
    #[serde(default)]
    pub svg_draw_options: SvgDrawOptions,
    /// DXF version and inventory of the exported drawing
    #[serde(default)]
    pub dxf_draw_options: DxfDrawOptions,
}

impl Default for ArrangeConfig {
    fn default() -> Self {
        Self {
            entraxe: 30.0,
            outer_margin: 40.0,
            target_aspect: 1.5,
            weights: ScoreWeights::default(),
            symmetry_tolerance: 20.0,
            support_tolerance: 5.0,
            min_support_fraction: 0.5,
            auto_tighten: true,
            max_objects: 50,
            physics: PhysicsConfig::default(),
            svg_draw_options: SvgDrawOptions::default(),
            dxf_draw_options: DxfDrawOptions::default(),
        }
    }
}

impl ArrangeConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.entraxe >= 0.0, "entraxe must be non-negative");
        ensure!(self.outer_margin >= 0.0, "outer margin must be non-negative");
        ensure!(
            self.target_aspect.is_finite() && self.target_aspect > 0.0,
            "target aspect must be positive"
        );
        ensure!(
            self.symmetry_tolerance >= 0.0 && self.support_tolerance >= 0.0,
            "tolerances must be non-negative"
        );
        ensure!(
            (0.0..=1.0).contains(&self.min_support_fraction),
            "min support fraction must lie in [0, 1]"
        );
        self.weights.validate()
    }
}

/// Relative importance of every scoring axis. Weights are normalised before use.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub surface: f64,
    pub symmetry: f64,
    pub stability: f64,
    pub squareness: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            surface: 0.40,
            symmetry: 0.25,
            stability: 0.20,
            squareness: 0.15,
        }
    }
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.surface + self.symmetry + self.stability + self.squareness
    }

    pub fn validate(&self) -> Result<()> {
        let all = [self.surface, self.symmetry, self.stability, self.squareness];
        ensure!(
            all.iter().all(|w| w.is_finite() && *w >= 0.0),
            "score weights must be non-negative: {self:?}"
        );
        ensure!(self.sum() > 0.0, "at least one score weight must be positive");
        Ok(())
    }
}
