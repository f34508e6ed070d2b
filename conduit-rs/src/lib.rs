//! Placement engine for circular objects (protective conduits and the cables routed through them)
//! inside a bounded container.
//!
//! The crate keeps a live [`entities::Scene`] of bodies, offers containment and free-spot queries in
//! [`collision_detection`], resolves overlaps with a tick-driven solver in [`physics`] and converts
//! scenes from and to external representations in [`io`].

/// Containment tests, free-spot search and hit-testing
pub mod collision_detection;

/// Bodies, containers and the scene arena
pub mod entities;

/// Geometric primitives and traits
pub mod geometry;

/// Project documents, catalog tables and SVG export
pub mod io;

/// Tick-driven overlap resolution
pub mod physics;

/// Configuration, float helpers and debug assertions
pub mod util;
