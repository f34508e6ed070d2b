pub mod apply;
pub mod configuration;
pub mod generator;
pub mod orchestrator;
pub mod scorer;
pub mod strategies;

#[doc(inline)]
pub use configuration::{Axis, AxisLock, PlacedCell, PlacementConfiguration};
#[doc(inline)]
pub use generator::ObjectGroup;
#[doc(inline)]
pub use orchestrator::PlacementOrchestrator;
#[doc(inline)]
pub use scorer::{MultiObjectiveScorer, ScoreBreakdown};
#[doc(inline)]
pub use strategies::Strategy;
