use log::error;

use crate::entities::Scene;

//Various checks to verify correctness of the state of the scene
//Used in debug_assert!() blocks

/// Every parented cable is listed exactly once by its parent, and every listed child names that parent.
pub fn scene_links_are_consistent(scene: &Scene) -> bool {
    for (key, body) in scene.bodies() {
        if let Some(pk) = body.parent() {
            let listed = scene
                .body(pk)
                .map(|p| p.children().iter().filter(|c| **c == key).count());
            if listed != Some(1) {
                error!("cable {key:?} is listed {listed:?} times by its parent {pk:?}");
                return false;
            }
        }
        for child in body.children() {
            if scene.body(*child).and_then(|c| c.parent()) != Some(key) {
                error!("conduit {key:?} lists {child:?}, which does not name it as parent");
                return false;
            }
        }
    }
    true
}

/// No two free bodies overlap by more than `tolerance` mm, unless both are frozen
pub fn free_bodies_are_separated(scene: &Scene, tolerance: f64) -> bool {
    let free = scene.free_bodies().collect::<Vec<_>>();
    for (i, (ka, a)) in free.iter().enumerate() {
        for (kb, b) in free.iter().skip(i + 1) {
            if a.frozen && b.frozen {
                continue;
            }
            let overlap = a.radius() + b.radius() - a.position.distance(&b.position);
            if overlap > tolerance {
                error!("bodies {ka:?} and {kb:?} overlap by {overlap:.3} mm");
                return false;
            }
        }
    }
    true
}
