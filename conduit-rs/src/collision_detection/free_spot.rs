use crate::entities::{BodyKey, Scene};
use crate::geometry::primitives::{Circle, Point};
use crate::collision_detection::RingSampler;

/// Reach multiplier of a forced search inside a conduit, relative to its bore radius
const FORCED_REACH: f64 = 3.0;

/// Searches the position closest to `preferred` where a free body of `radius` lies inside the container
/// without overlapping any conduit or free cable (except `ignore`).
/// Rings are walked outward until they exceed the container's largest extent.
pub fn find_free_spot(
    scene: &Scene,
    preferred: Point,
    radius: f64,
    ignore: Option<BodyKey>,
) -> Option<Point> {
    let container = scene.container();
    let max_radius = f64::max(container.width(), container.height());

    RingSampler::for_radius(preferred, radius, max_radius).find(|p| {
        let candidate = Circle::new(*p, radius);
        container.contains(&candidate)
            && scene
                .free_bodies()
                .filter(|(k, _)| Some(*k) != ignore)
                .all(|(_, b)| !b.circle().overlaps(&candidate))
    })
}

/// Searches a position for a cable of `radius` inside the bore of `conduit`, clear of that conduit's cables.
/// With `force`, the search reaches three times further and falls back to the bore's centre.
/// Returns `None` if `conduit` is not a conduit or the cable cannot fit.
pub fn find_free_spot_in_conduit(
    scene: &Scene,
    conduit: BodyKey,
    preferred: Point,
    radius: f64,
    ignore: Option<BodyKey>,
    force: bool,
) -> Option<Point> {
    let host = scene.body(conduit)?;
    let bore = host.bore()?;
    let limit = bore.radius - radius;
    if limit < 0.0 {
        return None;
    }
    let reach = match force {
        true => bore.radius * FORCED_REACH,
        false => bore.radius,
    };

    let siblings = host
        .children()
        .iter()
        .filter(|c| Some(**c) != ignore)
        .filter_map(|c| scene.body(*c))
        .map(|c| c.circle())
        .collect::<Vec<_>>();

    let found = RingSampler::for_radius(preferred, radius, reach).find(|p| {
        let candidate = Circle::new(*p, radius);
        bore.encloses(&candidate, 0.0) && siblings.iter().all(|s| !s.overlaps(&candidate))
    });

    match (found, force) {
        (Some(p), _) => Some(p),
        (None, true) => Some(bore.center),
        (None, false) => None,
    }
}

/// True if a cable of `cable_diameter` fits the bore of `conduit`
pub fn fits_in_conduit(scene: &Scene, conduit: BodyKey, cable_diameter: f64) -> bool {
    scene
        .body(conduit)
        .and_then(|c| c.inner_diameter())
        .is_some_and(|id| id >= cable_diameter)
}

/// The conduit with the smallest bore that contains `point` and can hold a cable of `cable_diameter`
pub fn find_conduit_under(scene: &Scene, point: Point, cable_diameter: f64) -> Option<BodyKey> {
    scene
        .conduits()
        .filter(|(k, _)| fits_in_conduit(scene, *k, cable_diameter))
        .filter_map(|(k, c)| c.bore().map(|bore| (k, bore)))
        .filter(|(_, bore)| bore.center.sq_distance(&point) <= bore.radius.powi(2))
        .min_by(|(_, a), (_, b)| a.radius.total_cmp(&b.radius))
        .map(|(k, _)| k)
}
