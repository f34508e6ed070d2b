use anyhow::{Result, ensure};
use conduit_rs::entities::{BodyKey, Scene};
use conduit_rs::geometry::primitives::Point;
use itertools::Itertools;
use log::{info, warn};

use crate::opt::configuration::PlacementConfiguration;
use crate::opt::generator::ObjectGroup;

/// Groups the conduits of a scene by outer diameter, in order of first appearance.
/// The returned keys follow the ids [`crate::opt::generator::expand_groups`] assigns.
pub fn groups_from_scene(scene: &Scene) -> (Vec<ObjectGroup>, Vec<BodyKey>) {
    let mut groups: Vec<(f64, Vec<BodyKey>)> = vec![];
    for (key, conduit) in scene.conduits() {
        match groups.iter_mut().find(|(d, _)| *d == conduit.diameter) {
            Some((_, keys)) => keys.push(key),
            None => groups.push((conduit.diameter, vec![key])),
        }
    }
    let object_groups = groups
        .iter()
        .map(|(diameter, keys)| ObjectGroup {
            diameter: *diameter,
            quantity: keys.len(),
        })
        .collect_vec();
    let keys = groups.into_iter().flat_map(|(_, keys)| keys).collect_vec();
    (object_groups, keys)
}

/// Transfers a configuration onto a scene: `targets[id]` is the body placed in the cell with that id.
///
/// The container is resized to the configuration's extent (a circle receives the diagonal as diameter),
/// the cells are centred in it and every target is moved to its cell centre and frozen.
/// All targets are validated before the scene is touched.
pub fn apply_configuration(
    scene: &mut Scene,
    targets: &[BodyKey],
    config: &PlacementConfiguration,
) -> Result<()> {
    ensure!(
        config.placed.len() == targets.len(),
        "configuration has {} cells for {} bodies",
        config.placed.len(),
        targets.len()
    );
    ensure!(
        config.placed.iter().map(|c| c.id).all_unique(),
        "configuration places an object twice"
    );
    for cell in &config.placed {
        let key = targets.get(cell.id).copied();
        ensure!(
            key.is_some_and(|k| scene.contains_key(k)),
            "cell {} does not refer to a body of the scene",
            cell.id
        );
    }
    let container = scene.container().enclosing(config.width, config.height)?;

    //centre the occupied box in the new container
    let offset = match config.tight_bounds() {
        Some(bounds) => {
            let center = container.center();
            Point(
                center.0 - (bounds.x_min + bounds.x_max) / 2.0,
                center.1 - (bounds.y_min + bounds.y_max) / 2.0,
            )
        }
        None => Point(0.0, 0.0),
    };

    for cell in &config.placed {
        let key = targets[cell.id];
        let c = cell.center();
        scene.move_to(key, Point(c.0 + offset.0, c.1 + offset.1));
        scene.set_frozen(key, true);
    }

    let pruned = scene.set_container(container);
    if !pruned.is_empty() {
        warn!("[APPLY] {} bodies no longer fit and were removed", pruned.len());
    }
    info!(
        "[APPLY] moved {} bodies, container is now {:.1}x{:.1}",
        targets.len(),
        container.width(),
        container.height()
    );
    Ok(())
}
