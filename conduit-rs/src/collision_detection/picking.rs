use crate::entities::{BodyKey, Scene};
use crate::geometry::geo_traits::CollidesWith;
use crate::geometry::primitives::Point;

/// Hit-test at `point`: cables take precedence over conduits, later arena slots first.
/// A conduit is only hit on its ring, between the bore and the outer wall.
pub fn pick_at(scene: &Scene, point: Point) -> Option<BodyKey> {
    let cables = scene.cables().collect::<Vec<_>>();
    let cable_hit = cables
        .iter()
        .rev()
        .find(|(_, c)| c.circle().collides_with(&point))
        .map(|(k, _)| *k);

    cable_hit.or_else(|| {
        let conduits = scene.conduits().collect::<Vec<_>>();
        conduits
            .iter()
            .rev()
            .find(|(_, c)| {
                let d = c.position.distance(&point);
                let inner = c.inner_diameter().unwrap_or(0.0) / 2.0;
                d <= c.radius() && d >= inner
            })
            .map(|(k, _)| *k)
    })
}
