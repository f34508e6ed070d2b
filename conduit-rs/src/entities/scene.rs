use anyhow::{Result, bail, ensure};
use itertools::Itertools;
use log::{debug, info};
use slotmap::SlotMap;

use crate::collision_detection;
use crate::entities::{Body, BodyKey, BodyKind, CatalogRef, Container};
use crate::geometry::geo_traits::Shape;
use crate::geometry::primitives::{Point, Vector};
use crate::util::assertions;

/// Slack (in mm) allowed for a cable protruding from its conduit's bore before pruning removes it.
/// The physics engine only keeps cables approximately inside their bore.
pub const PRUNE_BORE_TOLERANCE: f64 = 0.5;

/// A [`Scene`] is the live set of bodies laid out in a container.
/// Bodies are stored in an arena and addressed by their [`BodyKey`].
/// The scene maintains the parent/children links between cables and conduits.
#[derive(Clone, Debug)]
pub struct Scene {
    container: Container,
    /// Catalog name of the cable tray the container was taken from, if any
    tray_name: Option<String>,
    bodies: SlotMap<BodyKey, Body>,
}

impl Scene {
    pub fn new(container: Container) -> Self {
        Scene {
            container,
            tray_name: None,
            bodies: SlotMap::with_key(),
        }
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Swaps the container and prunes every body that no longer fits.
    /// A different container drops the tray name. Returns the keys of the removed bodies.
    pub fn set_container(&mut self, container: Container) -> Vec<BodyKey> {
        debug!("[SCENE] container changed to {container:?}");
        if container != self.container {
            self.tray_name = None;
        }
        self.container = container;
        self.prune_outside()
    }

    pub fn tray_name(&self) -> Option<&str> {
        self.tray_name.as_deref()
    }

    /// Labels the container as a catalog cable tray. Only open troughs can carry a tray name.
    pub fn set_tray_name(&mut self, name: Option<String>) -> Result<()> {
        ensure!(
            name.is_none() || matches!(self.container, Container::OpenTrough { .. }),
            "only an open trough can be a cable tray, container is {:?}",
            self.container
        );
        self.tray_name = name;
        Ok(())
    }

    pub fn body(&self, key: BodyKey) -> Option<&Body> {
        self.bodies.get(key)
    }

    /// Mutable access for the solver. Links between bodies must not be edited through it.
    pub(crate) fn body_mut(&mut self, key: BodyKey) -> Option<&mut Body> {
        self.bodies.get_mut(key)
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyKey, &Body)> {
        self.bodies.iter()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn contains_key(&self, key: BodyKey) -> bool {
        self.bodies.contains_key(key)
    }

    /// Conduits and unparented cables
    pub fn free_bodies(&self) -> impl Iterator<Item = (BodyKey, &Body)> {
        self.bodies.iter().filter(|(_, b)| b.is_free())
    }

    pub fn conduits(&self) -> impl Iterator<Item = (BodyKey, &Body)> {
        self.bodies.iter().filter(|(_, b)| b.is_conduit())
    }

    pub fn cables(&self) -> impl Iterator<Item = (BodyKey, &Body)> {
        self.bodies.iter().filter(|(_, b)| b.is_cable())
    }

    /// Inserts a conduit at `position` without any overlap check.
    pub fn insert_conduit(
        &mut self,
        diameter: f64,
        inner_diameter: f64,
        position: Point,
        reference: Option<CatalogRef>,
    ) -> Result<BodyKey> {
        ensure_conduit_diameters(diameter, inner_diameter)?;
        ensure!(position.is_finite(), "invalid position: {position:?}");
        let body = Body::conduit(diameter, inner_diameter, position).with_reference(reference);
        Ok(self.bodies.insert(body))
    }

    /// Inserts a cable at `position` without any overlap check, linking it to `parent` if given.
    pub fn insert_cable(
        &mut self,
        diameter: f64,
        position: Point,
        parent: Option<BodyKey>,
        reference: Option<CatalogRef>,
    ) -> Result<BodyKey> {
        ensure_diameter("cable", diameter)?;
        ensure!(position.is_finite(), "invalid position: {position:?}");
        if let Some(pk) = parent {
            match self.bodies.get(pk) {
                Some(p) if p.is_conduit() => {}
                Some(_) => bail!("parent of a cable must be a conduit"),
                None => bail!("parent conduit does not exist"),
            }
        }
        let key = self
            .bodies
            .insert(Body::cable(diameter, position, parent).with_reference(reference));
        if let Some(pk) = parent {
            if let BodyKind::Conduit { children, .. } = &mut self.bodies[pk].kind {
                children.push(key);
            }
        }
        debug_assert!(assertions::scene_links_are_consistent(self));
        Ok(key)
    }

    /// Places a new conduit at the free spot closest to `preferred`.
    /// Returns `Ok(None)` if no free spot exists.
    pub fn add_conduit(
        &mut self,
        diameter: f64,
        inner_diameter: f64,
        preferred: Point,
        reference: Option<CatalogRef>,
    ) -> Result<Option<BodyKey>> {
        ensure_conduit_diameters(diameter, inner_diameter)?;
        let spot = collision_detection::find_free_spot(self, preferred, diameter / 2.0, None);
        match spot {
            Some(position) => {
                let key = self.insert_conduit(diameter, inner_diameter, position, reference)?;
                debug!("[SCENE] conduit {key:?} (d: {diameter}) placed at {position:?}");
                Ok(Some(key))
            }
            None => {
                debug!("[SCENE] no free spot for a conduit of {diameter} mm");
                Ok(None)
            }
        }
    }

    /// Places a new cable near `preferred`.
    /// If `target` is given, the cable is routed through that conduit.
    /// Otherwise, the cable enters the tightest conduit under `preferred` able to hold it, or floats freely.
    /// Returns `Ok(None)` if no position could be found.
    pub fn add_cable(
        &mut self,
        diameter: f64,
        preferred: Point,
        target: Option<BodyKey>,
        reference: Option<CatalogRef>,
    ) -> Result<Option<BodyKey>> {
        ensure_diameter("cable", diameter)?;
        let radius = diameter / 2.0;

        let host = match target {
            Some(ck) => {
                let Some(conduit) = self.bodies.get(ck) else {
                    bail!("target conduit does not exist");
                };
                match conduit.inner_diameter() {
                    Some(id) if id >= diameter => Some(ck),
                    Some(id) => bail!("cable of {diameter} mm does not fit a bore of {id} mm"),
                    None => bail!("target of a cable must be a conduit"),
                }
            }
            None => collision_detection::find_conduit_under(self, preferred, diameter),
        };

        let spot = match host {
            Some(ck) => collision_detection::find_free_spot_in_conduit(
                self, ck, preferred, radius, None, false,
            )
            .or_else(|| {
                collision_detection::find_free_spot_in_conduit(self, ck, preferred, radius, None, true)
            }),
            None => collision_detection::find_free_spot(self, preferred, radius, None),
        };

        match spot {
            Some(position) => {
                let key = self.insert_cable(diameter, position, host, reference)?;
                debug!("[SCENE] cable {key:?} (d: {diameter}, parent: {host:?}) placed at {position:?}");
                Ok(Some(key))
            }
            None => {
                debug!("[SCENE] no free spot for a cable of {diameter} mm");
                Ok(None)
            }
        }
    }

    /// Removes a body. Removing a conduit also removes every cable routed through it;
    /// removing a cable detaches it from its parent. Returns the keys of all removed bodies.
    pub fn remove(&mut self, key: BodyKey) -> Vec<BodyKey> {
        let Some(body) = self.bodies.remove(key) else {
            return vec![];
        };
        let mut removed = vec![key];
        match body.kind {
            BodyKind::Conduit { children, .. } => {
                for child in children {
                    if self.bodies.remove(child).is_some() {
                        removed.push(child);
                    }
                }
            }
            BodyKind::Cable { parent: Some(pk) } => {
                if let Some(BodyKind::Conduit { children, .. }) =
                    self.bodies.get_mut(pk).map(|p| &mut p.kind)
                {
                    children.retain(|c| *c != key);
                }
            }
            BodyKind::Cable { parent: None } => {}
        }
        debug_assert!(assertions::scene_links_are_consistent(self));
        removed
    }

    /// Removes every body violating the containment rules and repairs stale links:
    /// - conduits outside the container, together with their cables
    /// - cables whose parent is missing, or that escaped their conduit's bore
    /// - free cables outside the container
    ///
    /// Running it twice in a row removes nothing the second time.
    pub fn prune_outside(&mut self) -> Vec<BodyKey> {
        let mut removed = vec![];

        let outside_conduits = self
            .conduits()
            .filter(|(_, c)| !self.container.contains(&c.circle()))
            .map(|(k, _)| k)
            .collect_vec();
        for ck in outside_conduits {
            removed.extend(self.remove(ck));
        }

        // drop child entries pointing to missing bodies or to cables claiming another parent
        let bodies = &self.bodies;
        let stale_links = bodies
            .iter()
            .flat_map(|(ck, c)| c.children().iter().map(move |&child| (ck, child)))
            .filter(|&(ck, child)| bodies.get(child).and_then(|b| b.parent()) != Some(ck))
            .collect_vec();
        for (ck, child) in stale_links {
            if let BodyKind::Conduit { children, .. } = &mut self.bodies[ck].kind {
                children.retain(|c| *c != child);
            }
        }

        let offending_cables = self
            .cables()
            .filter(|(key, cable)| match cable.parent() {
                Some(pk) => match self.bodies.get(pk).and_then(|p| p.bore()) {
                    Some(bore) => {
                        !bore.encloses(&cable.circle(), PRUNE_BORE_TOLERANCE)
                            || !self.bodies[pk].children().contains(key)
                    }
                    None => true,
                },
                None => !self.container.contains(&cable.circle()),
            })
            .map(|(k, _)| k)
            .collect_vec();
        for key in offending_cables {
            removed.extend(self.remove(key));
        }

        if !removed.is_empty() {
            info!("[SCENE] pruned {} bodies outside their bounds", removed.len());
        }
        debug_assert!(assertions::scene_links_are_consistent(self));
        removed
    }

    /// Sets the frozen flag of a body, zeroing its velocity when freezing.
    /// Returns false if the body does not exist.
    pub fn set_frozen(&mut self, key: BodyKey, frozen: bool) -> bool {
        match self.bodies.get_mut(key) {
            Some(body) => {
                body.frozen = frozen;
                if frozen {
                    body.velocity = Vector::ZERO;
                }
                true
            }
            None => false,
        }
    }

    pub fn toggle_frozen(&mut self, key: BodyKey) -> bool {
        match self.bodies.get(key).map(|b| b.frozen) {
            Some(frozen) => self.set_frozen(key, !frozen),
            None => false,
        }
    }

    /// Freezes every body if at least half of them are unfrozen, otherwise unfreezes every body.
    /// Returns the new state.
    pub fn toggle_freeze_all(&mut self) -> bool {
        let n_frozen = self.bodies.values().filter(|b| b.frozen).count();
        let freeze = self.bodies.len() - n_frozen >= n_frozen;
        for body in self.bodies.values_mut() {
            body.frozen = freeze;
            body.velocity = Vector::ZERO;
        }
        info!(
            "[SCENE] {} {} bodies",
            if freeze { "froze" } else { "unfroze" },
            self.bodies.len()
        );
        freeze
    }

    /// Marks a body as held by a drag. Dragged bodies are not integrated by the physics engine.
    pub fn start_drag(&mut self, key: BodyKey) -> bool {
        match self.bodies.get_mut(key) {
            Some(body) => {
                body.dragging = true;
                body.velocity = Vector::ZERO;
                true
            }
            None => false,
        }
    }

    /// Moves a held body to `target`, see [`Scene::move_to`]
    pub fn drag_to(&mut self, key: BodyKey, target: Point) -> bool {
        self.move_to(key, target)
    }

    /// Moves a body to `target` and zeroes its velocity.
    /// A conduit carries its unfrozen cables along by the same displacement.
    pub fn move_to(&mut self, key: BodyKey, target: Point) -> bool {
        let Some(body) = self.bodies.get_mut(key) else {
            return false;
        };
        let delta = target - body.position;
        body.position = target;
        body.velocity = Vector::ZERO;
        let children = body.children().to_vec();
        for child in children {
            if let Some(cable) = self.bodies.get_mut(child) {
                if !cable.frozen {
                    cable.position = cable.position.translate(delta);
                }
            }
        }
        true
    }

    pub fn end_drag(&mut self, key: BodyKey) -> bool {
        match self.bodies.get_mut(key) {
            Some(body) => {
                body.dragging = false;
                true
            }
            None => false,
        }
    }

    /// Body under `point`, see [`collision_detection::pick_at`]
    pub fn pick_at(&self, point: Point) -> Option<BodyKey> {
        collision_detection::pick_at(self, point)
    }

    /// Fraction of the container covered by conduits and free cables
    pub fn occupancy(&self) -> f64 {
        let covered: f64 = self.free_bodies().map(|(_, b)| b.area()).sum();
        covered / self.container.area()
    }

    /// Fraction of a conduit's bore covered by its cables.
    /// Returns `None` if `key` does not refer to a conduit.
    pub fn conduit_fill(&self, key: BodyKey) -> Option<f64> {
        let conduit = self.bodies.get(key)?;
        let bore = conduit.bore()?;
        let filled: f64 = conduit
            .children()
            .iter()
            .filter_map(|c| self.bodies.get(*c))
            .map(|c| c.area())
            .sum();
        Some(filled / bore.area())
    }
}

fn ensure_diameter(what: &str, diameter: f64) -> Result<()> {
    ensure!(
        diameter.is_finite() && diameter > 0.0,
        "{what} diameter must be positive and finite, got {diameter}"
    );
    Ok(())
}

fn ensure_conduit_diameters(diameter: f64, inner_diameter: f64) -> Result<()> {
    ensure_diameter("conduit", diameter)?;
    ensure!(
        inner_diameter.is_finite() && inner_diameter > 0.0 && inner_diameter <= diameter,
        "conduit inner diameter must lie in (0, {diameter}], got {inner_diameter}"
    );
    Ok(())
}
