use std::collections::BTreeMap;

use dxf::entities::{Circle, Entity, EntityType, Line, Text};
use dxf::enums::{AcadVersion, Units};
use dxf::tables::Layer;
use dxf::{Color, Drawing, Point};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::entities::{Body, Container, Scene};

/// Scene lengths are in mm, drawings are in metres
const MM_PER_UNIT: f64 = 1000.0;

/// Longest layer name accepted by R12 readers
pub const MAX_LAYER_NAME_LEN: usize = 31;

pub const CONTAINER_LAYER: &str = "CONTAINER";
pub const INVENTORY_LAYER: &str = "INVENTORY";

const INVENTORY_TEXT_HEIGHT: f64 = 0.012;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DxfVersion {
    /// AutoCAD R12 (AC1009), readable by nearly every CAD package
    #[default]
    R12,
    /// AutoCAD 2000 (AC1015)
    R2000,
}

impl From<DxfVersion> for AcadVersion {
    fn from(version: DxfVersion) -> Self {
        match version {
            DxfVersion::R12 => AcadVersion::R12,
            DxfVersion::R2000 => AcadVersion::R2000,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct DxfDrawOptions {
    #[serde(default)]
    pub version: DxfVersion,
    /// List the count of every conduit and cable type next to the container
    #[serde(default)]
    pub inventory: bool,
}

/// Draws a scene as a DXF drawing, in metres with the y axis pointing up.
///
/// The container outline goes on [`CONTAINER_LAYER`]. Every conduit type gets its own layer holding
/// the outer and bore circles, every cable type a layer holding the cable circles.
pub fn scene_to_dxf(scene: &Scene, options: DxfDrawOptions) -> Drawing {
    let mut drawing = Drawing::new();
    drawing.header.version = options.version.into();
    drawing.header.default_drawing_units = Units::Meters;

    add_layer(&mut drawing, CONTAINER_LAYER, 1);

    let conduit_layers = scene
        .conduits()
        .map(|(_, c)| layer_name("CONDUIT", c))
        .unique()
        .collect_vec();
    for (i, name) in conduit_layers.iter().enumerate() {
        add_layer(&mut drawing, name, (i % 7) as u8 + 2);
    }
    let cable_layers = scene
        .cables()
        .map(|(_, c)| layer_name("CABLE", c))
        .unique()
        .collect_vec();
    for (i, name) in cable_layers.iter().enumerate() {
        add_layer(&mut drawing, name, (i % 6) as u8 + 10);
    }

    draw_container(&mut drawing, scene.container());

    for (_, conduit) in scene.conduits() {
        let layer = layer_name("CONDUIT", conduit);
        add_circle(&mut drawing, &layer, conduit, conduit.radius());
        if let Some(id) = conduit.inner_diameter().filter(|id| *id > 0.0) {
            add_circle(&mut drawing, &layer, conduit, id / 2.0);
        }
    }
    for (_, cable) in scene.cables() {
        add_circle(&mut drawing, &layer_name("CABLE", cable), cable, cable.radius());
    }

    if options.inventory {
        draw_inventory(&mut drawing, scene);
    }

    drawing
}

/// Layer of a body: its kind followed by its catalog reference, or by its diameter when it has none.
/// Characters DXF forbids in names are replaced and the result is cut to [`MAX_LAYER_NAME_LEN`].
pub fn layer_name(prefix: &str, body: &Body) -> String {
    let raw = match &body.reference {
        Some(r) => format!("{prefix}_{}_{}", r.family, r.code),
        None => format!("{prefix}_D{}", body.diameter),
    };
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .take(MAX_LAYER_NAME_LEN)
        .collect()
}

fn add_layer(drawing: &mut Drawing, name: &str, color: u8) {
    let mut layer = Layer::default();
    layer.name = name.to_string();
    layer.color = Color::from_index(color);
    drawing.add_layer(layer);
}

fn add_entity(drawing: &mut Drawing, layer: &str, specific: EntityType) {
    let mut entity = Entity::new(specific);
    entity.common.layer = layer.to_string();
    drawing.add_entity(entity);
}

fn add_circle(drawing: &mut Drawing, layer: &str, body: &Body, radius: f64) {
    let circle = Circle::new(point(body.position.0, body.position.1), radius / MM_PER_UNIT);
    add_entity(drawing, layer, EntityType::Circle(circle));
}

fn draw_container(drawing: &mut Drawing, container: &Container) {
    let (w, h) = (container.width(), container.height());
    let corners = [(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)];
    let edges = match container {
        Container::Rectangle { .. } => vec![(0, 1), (1, 2), (2, 3), (3, 0)],
        // no ceiling
        Container::OpenTrough { .. } => vec![(3, 0), (0, 1), (1, 2)],
        Container::Circle { diameter } => {
            let center = container.center();
            let circle = Circle::new(point(center.0, center.1), diameter / 2.0 / MM_PER_UNIT);
            add_entity(drawing, CONTAINER_LAYER, EntityType::Circle(circle));
            vec![]
        }
    };
    for (a, b) in edges {
        let (p1, p2) = (corners[a], corners[b]);
        let line = Line::new(point(p1.0, p1.1), point(p2.0, p2.1));
        add_entity(drawing, CONTAINER_LAYER, EntityType::Line(line));
    }
}

/// One text line per conduit and cable type with its count, stacked right of the container
fn draw_inventory(drawing: &mut Drawing, scene: &Scene) {
    add_layer(drawing, INVENTORY_LAYER, 7);

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for (_, body) in scene.conduits().chain(scene.cables()) {
        let prefix = if body.is_conduit() { "CONDUIT" } else { "CABLE" };
        *counts.entry(layer_name(prefix, body)).or_default() += 1;
    }

    let x = scene.container().width() + 100.0;
    let mut y = scene.container().height();
    for (name, count) in counts {
        let mut text = Text::default();
        text.location = point(x, y);
        text.text_height = INVENTORY_TEXT_HEIGHT;
        text.value = format!("{name} x{count}");
        add_entity(drawing, INVENTORY_LAYER, EntityType::Text(text));
        y -= 1.5 * INVENTORY_TEXT_HEIGHT * MM_PER_UNIT;
    }
}

fn point(x_mm: f64, y_mm: f64) -> Point {
    Point::new(x_mm / MM_PER_UNIT, y_mm / MM_PER_UNIT, 0.0)
}
