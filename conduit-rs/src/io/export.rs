use std::collections::HashMap;

use crate::entities::{Body, BodyKey, Container, Scene};
use crate::io::ext_repr::{ExtCable, ExtConduit, ExtContainer, ExtProject};

/// Exports a scene to its external representation.
/// Bodies receive sequential ids starting at 1, conduits first, in arena order.
pub fn export_project(scene: &Scene) -> ExtProject {
    let ids: HashMap<BodyKey, u64> = scene
        .conduits()
        .chain(scene.cables())
        .enumerate()
        .map(|(i, (k, _))| (k, i as u64 + 1))
        .collect();

    let conduits = scene
        .conduits()
        .map(|(k, c)| {
            let (family, code) = reference_of(c);
            ExtConduit {
                id: ids[&k],
                family,
                code,
                outer_diameter: Some(c.diameter),
                inner_diameter: c.inner_diameter(),
                position: Some((c.position.0, c.position.1)),
                frozen: c.frozen,
            }
        })
        .collect();

    let cables = scene
        .cables()
        .map(|(k, c)| {
            let (family, code) = reference_of(c);
            ExtCable {
                id: ids[&k],
                family,
                code,
                outer_diameter: Some(c.diameter),
                parent: c.parent().and_then(|p| ids.get(&p).copied()),
                position: Some((c.position.0, c.position.1)),
                frozen: c.frozen,
            }
        })
        .collect();

    ExtProject {
        container: match scene.tray_name() {
            Some(name) => ExtContainer::CableTray {
                name: name.to_string(),
            },
            None => export_container(scene.container()),
        },
        conduits,
        cables,
    }
}

/// Dimensional form of a container. A cable tray comes out as its open trough, see [`Scene::tray_name`].
pub fn export_container(container: &Container) -> ExtContainer {
    match *container {
        Container::Rectangle { width, height } => ExtContainer::Rectangle { width, height },
        Container::Circle { diameter } => ExtContainer::Circle { diameter },
        Container::OpenTrough { width, height } => ExtContainer::OpenTrough { width, height },
    }
}

fn reference_of(body: &Body) -> (Option<String>, Option<String>) {
    match &body.reference {
        Some(r) => (Some(r.family.clone()), Some(r.code.clone())),
        None => (None, None),
    }
}
