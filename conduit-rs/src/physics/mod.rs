mod constraints;
mod engine;

#[doc(inline)]
pub use engine::PhysicsEngine;
