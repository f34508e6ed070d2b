use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::geometry::geo_traits::Shape;
use crate::geometry::primitives::{Circle, Point, Vector};

new_key_type! {
    /// Stable identity of a [`Body`] within a [`Scene`](crate::entities::Scene)
    pub struct BodyKey;
}

/// Reference to the catalog entry a body was created from
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRef {
    pub family: String,
    pub code: String,
}

/// A circular object living in a scene: either a conduit or a cable.
#[derive(Clone, Debug)]
pub struct Body {
    /// Outer diameter in mm
    pub diameter: f64,
    pub position: Point,
    /// Velocity in mm per tick
    pub velocity: Vector,
    /// Frozen bodies are never moved by the physics engine
    pub frozen: bool,
    /// Set while the body is held by a pointer drag
    pub dragging: bool,
    pub kind: BodyKind,
    pub reference: Option<CatalogRef>,
}

#[derive(Clone, Debug)]
pub enum BodyKind {
    /// Protective tube: a ring that may hold cables inside its bore
    Conduit {
        inner_diameter: f64,
        children: Vec<BodyKey>,
    },
    /// Solid disk, either free-floating or routed through a conduit
    Cable { parent: Option<BodyKey> },
}

impl Body {
    pub fn conduit(diameter: f64, inner_diameter: f64, position: Point) -> Self {
        debug_assert!(inner_diameter <= diameter);
        Body {
            diameter,
            position,
            velocity: Vector::ZERO,
            frozen: false,
            dragging: false,
            kind: BodyKind::Conduit {
                inner_diameter,
                children: vec![],
            },
            reference: None,
        }
    }

    pub fn cable(diameter: f64, position: Point, parent: Option<BodyKey>) -> Self {
        Body {
            diameter,
            position,
            velocity: Vector::ZERO,
            frozen: false,
            dragging: false,
            kind: BodyKind::Cable { parent },
            reference: None,
        }
    }

    pub fn with_reference(mut self, reference: Option<CatalogRef>) -> Self {
        self.reference = reference;
        self
    }

    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.position, self.radius())
    }

    pub fn area(&self) -> f64 {
        self.circle().area()
    }

    pub fn is_conduit(&self) -> bool {
        matches!(self.kind, BodyKind::Conduit { .. })
    }

    pub fn is_cable(&self) -> bool {
        matches!(self.kind, BodyKind::Cable { .. })
    }

    /// Conduits and cables without a parent take part in container confinement and mutual separation
    pub fn is_free(&self) -> bool {
        !matches!(self.kind, BodyKind::Cable { parent: Some(_) })
    }

    pub fn parent(&self) -> Option<BodyKey> {
        match self.kind {
            BodyKind::Cable { parent } => parent,
            BodyKind::Conduit { .. } => None,
        }
    }

    pub fn children(&self) -> &[BodyKey] {
        match &self.kind {
            BodyKind::Conduit { children, .. } => children,
            BodyKind::Cable { .. } => &[],
        }
    }

    pub fn inner_diameter(&self) -> Option<f64> {
        match self.kind {
            BodyKind::Conduit { inner_diameter, .. } => Some(inner_diameter),
            BodyKind::Cable { .. } => None,
        }
    }

    /// Bore of a conduit as a circle
    pub fn bore(&self) -> Option<Circle> {
        self.inner_diameter()
            .map(|id| Circle::new(self.position, id / 2.0))
    }

    /// Frozen or dragged bodies have an externally authoritative position
    pub fn is_anchored(&self) -> bool {
        self.frozen || self.dragging
    }
}
