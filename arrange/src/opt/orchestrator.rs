use std::time::Instant;

use anyhow::{Context, Result, bail, ensure};
use log::{debug, info, warn};
use ordered_float::OrderedFloat;

use crate::config::ArrangeConfig;
use crate::opt::configuration::{Axis, AxisLock, PlacementConfiguration};
use crate::opt::generator::{ConfigurationGenerator, ObjectGroup};
use crate::opt::scorer::MultiObjectiveScorer;
use crate::util::assertions;

/// Entry point of the automatic arrangement: generates candidates, scores them and keeps the best one.
///
/// Nothing outside the returned configuration is touched, see [`crate::opt::apply`] to transfer it onto a scene.
#[derive(Debug, Clone, Copy)]
pub struct PlacementOrchestrator {
    pub config: ArrangeConfig,
    pub generator: ConfigurationGenerator,
    pub scorer: MultiObjectiveScorer,
}

impl PlacementOrchestrator {
    pub fn new(config: ArrangeConfig) -> Self {
        Self {
            config,
            generator: ConfigurationGenerator::new(config),
            scorer: MultiObjectiveScorer::new(&config),
        }
    }

    pub fn compute_best_placement(
        &self,
        groups: &[ObjectGroup],
        lock: Option<AxisLock>,
    ) -> Result<PlacementConfiguration> {
        let start = Instant::now();
        let ranked = self.rank(groups, lock)?;
        let n_candidates = ranked.len();

        //ranking is stable, so among equal scores the earliest strategy comes first
        let mut best = ranked.into_iter().next().context("no candidate to select")?;

        if self.config.auto_tighten {
            self.tighten(&mut best);
        }

        debug_assert!(assertions::cells_do_not_overlap(&best));
        debug_assert!(assertions::cells_within_bounds(&best));

        info!(
            "[ORCH] {:?} won among {} candidates (score: {:.3}), {:.1}x{:.1} in {:.3}ms",
            best.strategy,
            n_candidates,
            best.composite_score(),
            best.width,
            best.height,
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(best)
    }

    /// All feasible candidates, scored and sorted from best to worst. Candidates with equal scores keep the generation order.
    pub fn rank(&self, groups: &[ObjectGroup], lock: Option<AxisLock>) -> Result<Vec<PlacementConfiguration>> {
        self.config.validate().context("invalid arrangement config")?;
        self.validate_input(groups, lock)?;

        let mut candidates = self.generator.generate(groups, lock);
        if candidates.is_empty() {
            match lock {
                Some(l) => bail!(
                    "no feasible configuration: locked {} of {:.1} mm is too small",
                    axis_name(l.axis),
                    l.value
                ),
                None => bail!("no feasible configuration for {} objects", total_quantity(groups)),
            }
        }

        for candidate in candidates.iter_mut() {
            let score = self.scorer.evaluate(candidate);
            debug!(
                "[SCORE] {:?}: {:.3} (surface: {:.3}, symmetry: {:.3}, stability: {:.3}, squareness: {:.3})",
                candidate.strategy,
                score.composite,
                score.surface,
                score.symmetry,
                score.stability,
                score.squareness
            );
            candidate.score = Some(score);
        }
        candidates.sort_by_key(|c| std::cmp::Reverse(OrderedFloat(c.composite_score())));
        Ok(candidates)
    }

    /// Shrinks every unlocked axis to the occupied extent plus the outer margin.
    /// Along those axes the cells are moved back to the origin, a locked axis keeps its layout.
    fn tighten(&self, config: &mut PlacementConfiguration) {
        let Some(bounds) = config.tight_bounds() else {
            return;
        };
        let margin = self.config.outer_margin;
        match config.lock.map(|l| l.axis) {
            Some(Axis::Width) => {
                config.translate(0.0, -bounds.y_min);
                config.height = bounds.height() + margin;
            }
            Some(Axis::Height) => {
                config.translate(-bounds.x_min, 0.0);
                config.width = bounds.width() + margin;
            }
            None => {
                config.translate(-bounds.x_min, -bounds.y_min);
                config.width = bounds.width() + margin;
                config.height = bounds.height() + margin;
            }
        }
    }

    fn validate_input(&self, groups: &[ObjectGroup], lock: Option<AxisLock>) -> Result<()> {
        ensure!(!groups.is_empty(), "no objects to arrange");
        ensure!(total_quantity(groups) > 0, "no objects to arrange: every group is empty");
        for group in groups {
            ensure!(
                group.diameter.is_finite() && group.diameter > 0.0,
                "invalid object diameter: {}",
                group.diameter
            );
        }
        if let Some(l) = lock {
            ensure!(
                l.value.is_finite() && l.value > 0.0,
                "invalid locked {}: {}",
                axis_name(l.axis),
                l.value
            );
        }
        let n = total_quantity(groups);
        if n > self.config.max_objects {
            warn!(
                "[ORCH] arranging {n} objects, more than the advised maximum of {}",
                self.config.max_objects
            );
        }
        Ok(())
    }
}

fn total_quantity(groups: &[ObjectGroup]) -> usize {
    groups.iter().map(|g| g.quantity).sum()
}

fn axis_name(axis: Axis) -> &'static str {
    match axis {
        Axis::Width => "width",
        Axis::Height => "height",
    }
}
