pub mod assertions;
mod config;
mod fpa;

#[doc(inline)]
pub use config::PhysicsConfig;
#[doc(inline)]
pub use fpa::FPA;
