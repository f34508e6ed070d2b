use serde::{Deserialize, Serialize};

/// Constants of the physics engine. Distances are in mm, velocities in mm per tick.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct PhysicsConfig {
    /// Velocity added towards the floor every tick
    pub gravity: f64,
    /// Velocity multiplier applied every tick
    pub air_drag: f64,
    /// Fraction of the normal velocity kept after bouncing off a wall or another body
    pub restitution: f64,
    /// Tangential velocity multiplier applied on wall contact
    pub friction: f64,
    /// Mass of a body is `max(1, r² * mass_k)`
    pub mass_k: f64,
    /// Scales the impulse exchanged between colliding bodies
    pub collision_damping: f64,
    /// Number of relaxation passes per tick
    pub iterations: usize,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.25,
            air_drag: 0.995,
            restitution: 0.25,
            friction: 0.98,
            mass_k: 0.02,
            collision_damping: 0.9,
            iterations: 8,
        }
    }
}

impl PhysicsConfig {
    pub fn mass(&self, radius: f64) -> f64 {
        f64::max(1.0, radius * radius * self.mass_k)
    }
}
