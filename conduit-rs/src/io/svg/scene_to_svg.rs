use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Group, Text, Title};

use crate::entities::{Container, Scene};
use crate::geometry::geo_traits::Shape;
use crate::geometry::primitives::{Circle, Point};
use crate::io::svg::svg_util;
use crate::io::svg::svg_util::SvgDrawOptions;

/// Renders a scene as an SVG document. Scene coordinates have the y axis pointing up,
/// so every point is mirrored around the container's horizontal midline.
pub fn scene_to_svg(scene: &Scene, options: SvgDrawOptions, title: &str) -> Document {
    let container = scene.container();
    let bbox = container.bbox();
    let vbox = bbox.scale(1.10);
    let theme = &options.theme;
    let height = container.height();
    let flip = |p: Point| Point(p.0, height - p.1);

    let stroke_width = f64::min(vbox.width(), vbox.height()) * 0.001 * theme.stroke_width_multiplier;
    let font_size = f64::min(bbox.width(), bbox.height()) * 0.025;

    let container_group = {
        let (fill, sw) = (
            format!("{}", theme.container_fill),
            format!("{}", 2.0 * stroke_width),
        );
        let outline_style = [
            ("fill", fill.as_str()),
            ("fill-opacity", "0.35"),
            ("stroke", "black"),
            ("stroke-width", sw.as_str()),
        ];
        let group = Group::new().set("id", "container").add(Title::new(format!(
            "container, width: {:.1}, height: {:.1}",
            bbox.width(),
            bbox.height()
        )));
        match *container {
            Container::Rectangle { width, height } => {
                let data = Data::new()
                    .move_to((0.0, 0.0))
                    .line_to((width, 0.0))
                    .line_to((width, height))
                    .line_to((0.0, height))
                    .close();
                group.add(svg_util::data_to_path(data, &outline_style))
            }
            Container::OpenTrough { width, height } => {
                // floor and side walls, no ceiling
                let data = Data::new()
                    .move_to((0.0, 0.0))
                    .line_to((0.0, height))
                    .line_to((width, height))
                    .line_to((width, 0.0));
                group.add(svg_util::data_to_path(data, &outline_style))
            }
            Container::Circle { diameter } => group.add(svg_util::circle(
                Circle::new(flip(container.center()), diameter / 2.0),
                &outline_style,
            )),
        }
    };

    let frozen_stroke = format!("{}", theme.frozen_stroke);
    let body_stroke = |frozen: bool| -> (String, String) {
        match frozen && options.highlight_frozen {
            true => (frozen_stroke.clone(), format!("{}", 2.0 * stroke_width)),
            false => ("black".to_string(), format!("{stroke_width}")),
        }
    };

    let conduits_group = scene
        .conduits()
        .fold(Group::new().set("id", "conduits"), |group, (key, conduit)| {
            let (stroke, sw) = body_stroke(conduit.frozen);
            let outer = Circle::new(flip(conduit.position), conduit.radius());
            let mut g = Group::new()
                .add(svg_util::circle(
                    outer,
                    &[
                        ("fill", &*format!("{}", theme.conduit_fill)),
                        ("stroke", stroke.as_str()),
                        ("stroke-width", sw.as_str()),
                    ],
                ))
                .add(Title::new(format!(
                    "conduit {key:?}, od: {:.1}, id: {:.1}, fill: {:.1}%",
                    conduit.diameter,
                    conduit.inner_diameter().unwrap_or(0.0),
                    scene.conduit_fill(key).unwrap_or(0.0) * 100.0
                )));
            if options.bores {
                if let Some(id) = conduit.inner_diameter() {
                    g = g.add(svg_util::circle(
                        Circle::new(outer.center, id / 2.0),
                        &[
                            ("fill", &*format!("{}", theme.bore_fill)),
                            ("stroke", "black"),
                            ("stroke-width", &*format!("{}", 0.5 * stroke_width)),
                        ],
                    ));
                }
            }
            group.add(g)
        });

    let cable_stroke = svg_util::change_brightness(theme.cable_fill, 0.5);
    let cables_group = scene
        .cables()
        .fold(Group::new().set("id", "cables"), |group, (key, cable)| {
            let (stroke, sw) = match cable.frozen && options.highlight_frozen {
                true => body_stroke(true),
                false => (format!("{cable_stroke}"), format!("{}", 0.5 * stroke_width)),
            };
            group.add(
                svg_util::circle(
                    Circle::new(flip(cable.position), cable.radius()),
                    &[
                        ("fill", &*format!("{}", theme.cable_fill)),
                        ("stroke", stroke.as_str()),
                        ("stroke-width", sw.as_str()),
                    ],
                )
                .add(Title::new(format!("cable {key:?}, od: {:.1}", cable.diameter))),
            )
        });

    let vbox_svg = (vbox.x_min, vbox.y_min, vbox.width(), vbox.height());

    let mut document = Document::new()
        .set("viewBox", vbox_svg)
        .add(container_group)
        .add(conduits_group)
        .add(cables_group);

    if options.label {
        let label_content = format!(
            "width: {:.1} | height: {:.1} | occupancy: {:.1}% | {}",
            bbox.width(),
            bbox.height(),
            scene.occupancy() * 100.0,
            title,
        );
        document = document.add(
            Text::new(label_content)
                .set("x", bbox.x_min)
                .set("y", bbox.y_min - 0.5 * font_size)
                .set("font-size", font_size)
                .set("font-family", "monospace")
                .set("font-weight", "500"),
        );
    }

    document
}
