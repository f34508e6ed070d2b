use itertools::Itertools;
use log::debug;

use crate::entities::{BodyKey, Scene};
use crate::physics::constraints::{self, Particle};
use crate::util::PhysicsConfig;

/// Tick-driven solver keeping the bodies of a [`Scene`] inside their bounds and apart from each other.
/// The caller owns the cadence: every call to [`PhysicsEngine::step`] advances the scene by one tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct PhysicsEngine {
    pub config: PhysicsConfig,
}

impl PhysicsEngine {
    pub fn new(config: PhysicsConfig) -> Self {
        Self { config }
    }

    /// Advances the scene by one tick: integration followed by `iterations` relaxation passes.
    pub fn step(&self, scene: &mut Scene) {
        self.integrate(scene);

        let free = scene.free_bodies().map(|(k, _)| k).collect_vec();
        let families = scene
            .conduits()
            .map(|(k, c)| (k, c.children().to_vec()))
            .filter(|(_, children)| !children.is_empty())
            .collect_vec();

        for _ in 0..self.config.iterations {
            self.confine_free(scene, &free);
            for (conduit, children) in &families {
                self.confine_children(scene, *conduit, children);
            }
            self.separate_all(scene, &free);
            for (_, children) in &families {
                self.separate_all(scene, children);
            }
        }
    }

    /// Runs ticks until no body moves more than `tolerance` mm during a tick, or `max_ticks` is reached.
    /// Returns the number of ticks performed.
    pub fn settle(&self, scene: &mut Scene, max_ticks: usize, tolerance: f64) -> usize {
        for tick in 1..=max_ticks {
            let before = scene.bodies().map(|(k, b)| (k, b.position)).collect_vec();
            self.step(scene);
            let max_displacement = before
                .iter()
                .filter_map(|(k, p)| scene.body(*k).map(|b| b.position.distance(p)))
                .fold(0.0, f64::max);
            if max_displacement < tolerance {
                debug!("[PHYS] settled after {tick} ticks");
                return tick;
            }
        }
        debug!("[PHYS] not settled after {max_ticks} ticks");
        max_ticks
    }

    fn integrate(&self, scene: &mut Scene) {
        let PhysicsConfig {
            gravity, air_drag, ..
        } = self.config;
        let keys = scene.bodies().map(|(k, _)| k).collect_vec();
        for key in keys {
            if let Some(body) = scene.body_mut(key) {
                if body.is_anchored() {
                    continue;
                }
                body.velocity.1 -= gravity;
                body.velocity = body.velocity * air_drag;
                body.position = body.position.translate(body.velocity);
            }
        }
    }

    fn confine_free(&self, scene: &mut Scene, free: &[BodyKey]) {
        let container = *scene.container();
        for key in free {
            if let Some(body) = scene.body_mut(*key).filter(|b| !b.is_anchored()) {
                let mut p = Particle::of(body);
                constraints::confine_to_container(&mut p, &container, &self.config);
                p.write_to(body);
            }
        }
    }

    fn confine_children(&self, scene: &mut Scene, conduit: BodyKey, children: &[BodyKey]) {
        let Some(bore) = scene.body(conduit).and_then(|c| c.bore()) else {
            return;
        };
        for key in children {
            if let Some(cable) = scene.body_mut(*key).filter(|c| !c.is_anchored()) {
                let mut p = Particle::of(cable);
                let limit = f64::max(bore.radius - p.radius, 0.0);
                constraints::confine_to_disk(&mut p, bore.center, limit, &self.config);
                p.write_to(cable);
            }
        }
    }

    fn separate_all(&self, scene: &mut Scene, keys: &[BodyKey]) {
        for (ka, kb) in keys.iter().tuple_combinations() {
            let (Some(a), Some(b)) = (scene.body(*ka), scene.body(*kb)) else {
                continue;
            };
            let (mut pa, mut pb) = (Particle::of(a), Particle::of(b));
            constraints::separate(&mut pa, &mut pb, &self.config);
            if let Some(a) = scene.body_mut(*ka) {
                pa.write_to(a);
            }
            if let Some(b) = scene.body_mut(*kb) {
                pb.write_to(b);
            }
        }
    }
}
