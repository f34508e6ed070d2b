mod body;
mod container;
mod scene;

#[doc(inline)]
pub use body::{Body, BodyKey, BodyKind, CatalogRef};
#[doc(inline)]
pub use container::{CONTAINMENT_TOLERANCE, Container};
#[doc(inline)]
pub use scene::Scene;
