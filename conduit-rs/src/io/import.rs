use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result, bail, ensure};
use itertools::Itertools;
use log::{info, warn};

use crate::collision_detection;
use crate::entities::{BodyKey, CatalogRef, Container, Scene};
use crate::geometry::primitives::Point;
use crate::io::catalog::Catalog;
use crate::io::ext_repr::{ExtCable, ExtConduit, ExtContainer, ExtProject};

/// Converts external representations into a [`Scene`], resolving catalog references on the way.
#[derive(Clone, Debug, Default)]
pub struct Importer {
    pub catalog: Catalog,
}

impl Importer {
    pub fn new(catalog: Catalog) -> Importer {
        Importer { catalog }
    }

    pub fn import_container(&self, ext_container: &ExtContainer) -> Result<Container> {
        match ext_container {
            ExtContainer::Rectangle { width, height } => Container::rectangle(*width, *height),
            ExtContainer::Circle { diameter } => Container::circle(*diameter),
            ExtContainer::OpenTrough { width, height } => Container::open_trough(*width, *height),
            ExtContainer::CableTray { name } => {
                let tray = self
                    .catalog
                    .tray(name)
                    .with_context(|| format!("unknown cable tray: {name}"))?;
                Container::open_trough(tray.width, tray.height)
            }
        }
    }

    /// Builds a scene from a project.
    ///
    /// Bodies with a position are inserted as-is, the others are placed with a free-spot search.
    /// A body for which no spot can be found is skipped with a warning, as are the cables routed through it.
    /// Cables without a parent stay free. Positioned bodies that break containment are pruned at the end.
    pub fn import_project(&self, ext_project: &ExtProject) -> Result<Scene> {
        let container = self.import_container(&ext_project.container)?;
        let mut scene = Scene::new(container);
        if let ExtContainer::CableTray { name } = &ext_project.container {
            scene.set_tray_name(Some(name.clone()))?;
        }

        let all_ids = ext_project
            .conduits
            .iter()
            .map(|c| c.id)
            .chain(ext_project.cables.iter().map(|c| c.id))
            .collect_vec();
        ensure!(
            all_ids.iter().all_unique(),
            "duplicate ids in project: {:?}",
            all_ids.iter().duplicates().collect_vec()
        );

        let mut conduit_keys: HashMap<u64, BodyKey> = HashMap::new();
        let mut skipped: HashSet<u64> = HashSet::new();

        // positioned conduits first, so the free-spot search sees them
        let (positioned, floating): (Vec<&ExtConduit>, Vec<&ExtConduit>) = ext_project
            .conduits
            .iter()
            .partition(|c| c.position.is_some());

        for ext_conduit in positioned.into_iter().chain(floating) {
            let (od, id) = self.resolve_conduit(ext_conduit)?;
            let reference = catalog_ref(&ext_conduit.family, &ext_conduit.code);
            let key = match ext_conduit.position {
                Some((x, y)) => Some(
                    scene
                        .insert_conduit(od, id, Point(x, y), reference)
                        .with_context(|| format!("invalid conduit {}", ext_conduit.id))?,
                ),
                None => scene.add_conduit(od, id, container.center(), reference)?,
            };
            match key {
                Some(key) => {
                    scene.set_frozen(key, ext_conduit.frozen);
                    conduit_keys.insert(ext_conduit.id, key);
                }
                None => {
                    warn!("[IO] no room for conduit {}, skipped", ext_conduit.id);
                    skipped.insert(ext_conduit.id);
                }
            }
        }

        let mut n_cables = 0;
        for ext_cable in &ext_project.cables {
            let diameter = self.resolve_cable(ext_cable)?;
            let parent = match ext_cable.parent {
                None => None,
                Some(pid) if skipped.contains(&pid) => {
                    warn!("[IO] cable {} skipped along with its conduit {pid}", ext_cable.id);
                    continue;
                }
                Some(pid) => match conduit_keys.get(&pid) {
                    Some(key) => Some(*key),
                    None => bail!("cable {} refers to unknown conduit {pid}", ext_cable.id),
                },
            };
            let reference = catalog_ref(&ext_cable.family, &ext_cable.code);
            let key = match ext_cable.position {
                Some((x, y)) => Some(
                    scene
                        .insert_cable(diameter, Point(x, y), parent, reference)
                        .with_context(|| format!("invalid cable {}", ext_cable.id))?,
                ),
                None => match parent {
                    Some(pk) => {
                        let preferred = scene.body(pk).map_or(container.center(), |p| p.position);
                        scene.add_cable(diameter, preferred, Some(pk), reference)?
                    }
                    None => collision_detection::find_free_spot(
                        &scene,
                        container.center(),
                        diameter / 2.0,
                        None,
                    )
                    .map(|p| scene.insert_cable(diameter, p, None, reference))
                    .transpose()?,
                },
            };
            match key {
                Some(key) => {
                    scene.set_frozen(key, ext_cable.frozen);
                    n_cables += 1;
                }
                None => warn!("[IO] no room for cable {}, skipped", ext_cable.id),
            }
        }

        let pruned = scene.prune_outside();
        if !pruned.is_empty() {
            warn!(
                "[IO] removed {} positioned bodies breaking containment: {pruned:?}",
                pruned.len()
            );
        }

        info!(
            "[IO] imported {} bodies ({} skipped, {} pruned)",
            scene.len(),
            ext_project.conduits.len() + ext_project.cables.len() - conduit_keys.len() - n_cables,
            pruned.len()
        );

        Ok(scene)
    }

    /// Outer and inner diameter of a conduit, explicit values taking precedence over the catalog
    fn resolve_conduit(&self, ext_conduit: &ExtConduit) -> Result<(f64, f64)> {
        let spec = match (&ext_conduit.family, &ext_conduit.code) {
            (Some(family), Some(code)) => self.catalog.conduit(family, code),
            _ => None,
        };
        let od = ext_conduit
            .outer_diameter
            .or(spec.map(|s| s.outer_diameter));
        let id = ext_conduit
            .inner_diameter
            .or(spec.map(|s| s.inner_diameter));
        match (od, id) {
            (Some(od), Some(id)) => Ok((od, id)),
            _ => bail!(
                "conduit {}: diameters missing and no catalog entry for {:?} {:?}",
                ext_conduit.id,
                ext_conduit.family,
                ext_conduit.code
            ),
        }
    }

    fn resolve_cable(&self, ext_cable: &ExtCable) -> Result<f64> {
        let spec = match (&ext_cable.family, &ext_cable.code) {
            (Some(family), Some(code)) => self.catalog.cable(family, code),
            _ => None,
        };
        match ext_cable.outer_diameter.or(spec.map(|s| s.outer_diameter)) {
            Some(od) => Ok(od),
            None => bail!(
                "cable {}: diameter missing and no catalog entry for {:?} {:?}",
                ext_cable.id,
                ext_cable.family,
                ext_cable.code
            ),
        }
    }
}

fn catalog_ref(family: &Option<String>, code: &Option<String>) -> Option<CatalogRef> {
    match (family, code) {
        (Some(family), Some(code)) => Some(CatalogRef {
            family: family.clone(),
            code: code.clone(),
        }),
        _ => None,
    }
}
