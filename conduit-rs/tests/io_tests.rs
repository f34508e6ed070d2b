#[cfg(test)]
mod tests {
    use std::path::Path;

    use anyhow::Result;
    use conduit_rs::entities::Container;
    use conduit_rs::geometry::primitives::Point;
    use conduit_rs::io::catalog::{Catalog, section_from_code};
    use conduit_rs::io::dxf::{CONTAINER_LAYER, DxfDrawOptions, DxfVersion, scene_to_dxf};
    use conduit_rs::io::export::export_project;
    use conduit_rs::io::ext_repr::{ExtContainer, ExtProject};
    use conduit_rs::io::import::Importer;
    use conduit_rs::io::svg::{SvgDrawOptions, scene_to_svg};
    use conduit_rs::util::assertions;
    use float_cmp::approx_eq;
    use dxf::entities::EntityType;
    use test_case::test_case;

    const PROJECT: &str = r#"{
        "container": { "type": "rectangle", "data": { "width": 1000.0, "height": 600.0 } },
        "conduits": [
            { "id": 1, "family": "TPC", "code": "110", "position": [200.0, 100.0] },
            { "id": 2, "outer_diameter": 90.0, "inner_diameter": 67.0, "frozen": true }
        ],
        "cables": [
            { "id": 10, "family": "U1000 R2V", "code": "3x2,5", "parent": 1 },
            { "id": 11, "outer_diameter": 20.0, "position": [800.0, 300.0] }
        ]
    }"#;

    fn init_logger() {
        let _ = env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .try_init();
    }

    #[test_case("3x2,5", 7.5; "single_term")]
    #[test_case("3x2,5+1x1,5", 9.0; "two_terms")]
    #[test_case("1x25", 25.0; "single_conductor")]
    #[test_case("2x1.5", 3.0; "decimal_point")]
    #[test_case("5G1.5", 7.5; "grounded")]
    #[test_case("16", 16.0; "bare_number")]
    #[test_case("abc", 0.0; "unparsable")]
    fn cable_section_from_code(code: &str, expected: f64) {
        assert!(approx_eq!(f64, section_from_code(code), expected, epsilon = 1e-9));
    }

    #[test]
    fn catalog_tables_accept_decimal_commas() -> Result<()> {
        let conduits = "type;code;od;id\nTPC;40;40;30\nIRL;20;20;16,9\nTPC;bad;;30\n";
        let cables = "fam;code;od\r\nU1000 R2V;1x1,5;6,4\r\n";
        let trays = "nom,largeur,hauteur\nPetit,100,50\n";
        let catalog = Catalog::from_csv(conduits, cables, trays)?;

        assert_eq!(catalog.conduits.len(), 2);
        let irl = catalog.conduit("IRL", "20").expect("IRL 20 present");
        assert!(approx_eq!(f64, irl.inner_diameter, 16.9));
        let cable = catalog.cable("U1000 R2V", "1x1,5").expect("cable present");
        assert!(approx_eq!(f64, cable.outer_diameter, 6.4));
        assert!(approx_eq!(f64, cable.section(), 1.5));
        assert_eq!(catalog.tray("Petit").map(|t| (t.width, t.height)), Some((100.0, 50.0)));
        Ok(())
    }

    #[test]
    fn catalog_header_must_have_required_columns() {
        let res = Catalog::from_csv("type;code;od\nTPC;40;40\n", "fam;code;od\n", "nom,largeur,hauteur\n");
        assert!(res.is_err());
    }

    #[test]
    fn missing_catalog_directory_falls_back_to_builtin() {
        init_logger();
        let catalog = Catalog::load_dir(Path::new("/nonexistent/catalog/dir"));
        assert_eq!(catalog, Catalog::builtin());

        let tpc = catalog.conduit("TPC", "200").expect("builtin TPC 200");
        assert_eq!((tpc.outer_diameter, tpc.inner_diameter), (200.0, 150.0));
        assert!(catalog.tray("Moyen 200x75").is_some());
    }

    #[test]
    fn import_resolves_catalog_and_places_bodies() -> Result<()> {
        init_logger();
        let ext_project: ExtProject = serde_json::from_str(PROJECT)?;
        let scene = Importer::new(Catalog::builtin()).import_project(&ext_project)?;

        assert_eq!(scene.conduits().count(), 2);
        assert_eq!(scene.cables().count(), 2);
        assert!(assertions::scene_links_are_consistent(&scene));

        let (tpc_key, tpc) = scene
            .conduits()
            .find(|(_, c)| c.diameter == 110.0)
            .expect("TPC 110 imported");
        assert_eq!(tpc.inner_diameter(), Some(82.0));
        assert_eq!(tpc.position, Point(200.0, 100.0));

        // the unpositioned conduit lands at the centre of the container
        let (_, free_conduit) = scene
            .conduits()
            .find(|(_, c)| c.diameter == 90.0)
            .expect("explicit conduit imported");
        assert_eq!(free_conduit.position, Point(500.0, 300.0));
        assert!(free_conduit.frozen);

        let routed = scene
            .cables()
            .find(|(_, c)| c.parent().is_some())
            .map(|(_, c)| c)
            .expect("routed cable");
        assert_eq!(routed.parent(), Some(tpc_key));
        assert_eq!(routed.diameter, 12.5);
        assert!(tpc.bore().unwrap().encloses(&routed.circle(), 1e-9));
        Ok(())
    }

    #[test]
    fn export_preserves_parent_links() -> Result<()> {
        let ext_project: ExtProject = serde_json::from_str(PROJECT)?;
        let importer = Importer::new(Catalog::builtin());
        let scene = importer.import_project(&ext_project)?;

        let exported = export_project(&scene);
        assert_eq!(exported.container, ExtContainer::Rectangle { width: 1000.0, height: 600.0 });
        let tpc = exported
            .conduits
            .iter()
            .find(|c| c.code.as_deref() == Some("110"))
            .expect("exported TPC");
        let routed = exported
            .cables
            .iter()
            .find(|c| c.parent.is_some())
            .expect("exported routed cable");
        assert_eq!(routed.parent, Some(tpc.id));
        assert_eq!(routed.family.as_deref(), Some("U1000 R2V"));

        let reimported = importer.import_project(&exported)?;
        assert_eq!(reimported.len(), scene.len());
        Ok(())
    }

    #[test]
    fn cable_tray_container_comes_from_catalog() -> Result<()> {
        let importer = Importer::new(Catalog::builtin());
        let container = importer.import_container(&ExtContainer::CableTray {
            name: "Moyen 200x75".to_string(),
        })?;
        assert_eq!(container, Container::OpenTrough { width: 200.0, height: 75.0 });
        assert!(
            importer
                .import_container(&ExtContainer::CableTray { name: "unknown".to_string() })
                .is_err()
        );
        Ok(())
    }

    #[test_case(r#"{"container": {"type": "circle", "data": {"diameter": 500}}, "cables": [{"id": 1, "outer_diameter": 10, "parent": 7}]}"#; "unknown_parent")]
    #[test_case(r#"{"container": {"type": "circle", "data": {"diameter": 500}}, "conduits": [{"id": 1, "outer_diameter": 40, "inner_diameter": 30}, {"id": 1, "outer_diameter": 40, "inner_diameter": 30}]}"#; "duplicate_ids")]
    #[test_case(r#"{"container": {"type": "circle", "data": {"diameter": 500}}, "conduits": [{"id": 1, "family": "TPC", "code": "999"}]}"#; "unknown_catalog_entry")]
    #[test_case(r#"{"container": {"type": "rectangle", "data": {"width": -1, "height": 10}}}"#; "invalid_container")]
    fn invalid_projects_are_rejected(json: &str) {
        let ext_project: ExtProject = serde_json::from_str(json).expect("well-formed json");
        assert!(Importer::new(Catalog::builtin()).import_project(&ext_project).is_err());
    }

    #[test]
    fn bodies_without_room_are_skipped() -> Result<()> {
        let json = r#"{
            "container": { "type": "rectangle", "data": { "width": 100.0, "height": 100.0 } },
            "conduits": [
                { "id": 1, "outer_diameter": 100.0, "inner_diameter": 80.0 },
                { "id": 2, "outer_diameter": 100.0, "inner_diameter": 80.0 }
            ],
            "cables": [ { "id": 3, "outer_diameter": 10.0, "parent": 2 } ]
        }"#;
        let ext_project: ExtProject = serde_json::from_str(json)?;
        let scene = Importer::new(Catalog::builtin()).import_project(&ext_project)?;
        assert_eq!(scene.len(), 1);
        Ok(())
    }

    #[test]
    fn svg_contains_every_body() -> Result<()> {
        let ext_project: ExtProject = serde_json::from_str(PROJECT)?;
        let scene = Importer::new(Catalog::builtin()).import_project(&ext_project)?;
        let document = scene_to_svg(&scene, SvgDrawOptions::default(), "test");
        let rendered = document.to_string();

        // outer + bore per conduit, one per cable
        assert_eq!(rendered.matches("<circle").count(), 2 * 2 + 2);
        assert!(rendered.contains("occupancy"));
        Ok(())
    }

    #[test]
    fn unpositioned_free_cable_stays_free() -> Result<()> {
        init_logger();
        let json = r#"{
            "container": { "type": "rectangle", "data": { "width": 1000.0, "height": 1000.0 } },
            "conduits": [ { "id": 1, "outer_diameter": 200.0, "inner_diameter": 150.0, "position": [500.0, 500.0] } ],
            "cables": [ { "id": 2, "outer_diameter": 20.0 } ]
        }"#;
        let ext_project: ExtProject = serde_json::from_str(json)?;
        let scene = Importer::new(Catalog::builtin()).import_project(&ext_project)?;

        let (conduit_key, conduit) = scene.conduits().next().expect("conduit imported");
        let (_, cable) = scene.cables().next().expect("cable imported");
        assert_eq!(cable.parent(), None);
        assert!(conduit.children().is_empty());
        assert!(!cable.circle().overlaps(&conduit.circle()));
        assert!(scene.container().contains(&cable.circle()));
        assert_eq!(scene.body(conduit_key).map(|c| c.position), Some(Point(500.0, 500.0)));

        let exported = export_project(&scene);
        assert_eq!(exported.cables[0].parent, None);
        Ok(())
    }

    #[test]
    fn positioned_bodies_breaking_containment_are_pruned() -> Result<()> {
        init_logger();
        let json = r#"{
            "container": { "type": "rectangle", "data": { "width": 500.0, "height": 500.0 } },
            "conduits": [
                { "id": 1, "outer_diameter": 100.0, "inner_diameter": 80.0, "position": [2000.0, 2000.0] },
                { "id": 2, "outer_diameter": 100.0, "inner_diameter": 80.0, "position": [200.0, 200.0] }
            ],
            "cables": [ { "id": 3, "outer_diameter": 10.0, "parent": 2, "position": [400.0, 400.0] } ]
        }"#;
        let ext_project: ExtProject = serde_json::from_str(json)?;
        let scene = Importer::new(Catalog::builtin()).import_project(&ext_project)?;

        assert_eq!(scene.len(), 1);
        let (_, conduit) = scene.conduits().next().expect("inner conduit kept");
        assert_eq!(conduit.position, Point(200.0, 200.0));
        assert!(conduit.children().is_empty());
        assert!(assertions::scene_links_are_consistent(&scene));
        Ok(())
    }

    #[test]
    fn cable_tray_name_survives_a_round_trip() -> Result<()> {
        let json = r#"{
            "container": { "type": "cable_tray", "data": { "name": "Moyen 200x75" } },
            "cables": [ { "id": 1, "outer_diameter": 20.0 } ]
        }"#;
        let ext_project: ExtProject = serde_json::from_str(json)?;
        let importer = Importer::new(Catalog::builtin());
        let mut scene = importer.import_project(&ext_project)?;
        assert_eq!(scene.tray_name(), Some("Moyen 200x75"));

        let exported = export_project(&scene);
        assert_eq!(exported.container, ext_project.container);
        assert_eq!(importer.import_project(&exported)?.tray_name(), Some("Moyen 200x75"));

        // resizing the trough means it no longer matches the catalog tray
        scene.set_container(Container::open_trough(300.0, 75.0)?);
        assert_eq!(scene.tray_name(), None);
        assert_eq!(
            export_project(&scene).container,
            ExtContainer::OpenTrough { width: 300.0, height: 75.0 }
        );
        Ok(())
    }

    #[test]
    fn dxf_puts_every_body_on_its_layer() -> Result<()> {
        let ext_project: ExtProject = serde_json::from_str(PROJECT)?;
        let scene = Importer::new(Catalog::builtin()).import_project(&ext_project)?;
        let drawing = scene_to_dxf(&scene, DxfDrawOptions::default());

        let circles_on = |layer: &str| {
            drawing
                .entities()
                .filter(|e| e.common.layer == layer)
                .filter(|e| matches!(e.specific, EntityType::Circle(_)))
                .count()
        };
        let lines_on = |layer: &str| {
            drawing
                .entities()
                .filter(|e| e.common.layer == layer)
                .filter(|e| matches!(e.specific, EntityType::Line(_)))
                .count()
        };

        // outer + bore per conduit, one per cable
        assert_eq!(circles_on("CONDUIT_TPC_110"), 2);
        assert_eq!(circles_on("CONDUIT_D90"), 2);
        assert_eq!(circles_on("CABLE_U1000_R2V_3X2_5"), 1);
        assert_eq!(circles_on("CABLE_D20"), 1);
        assert_eq!(lines_on(CONTAINER_LAYER), 4);

        let layers = drawing.layers().map(|l| l.name.clone()).collect::<Vec<_>>();
        for name in [CONTAINER_LAYER, "CONDUIT_TPC_110", "CONDUIT_D90", "CABLE_U1000_R2V_3X2_5", "CABLE_D20"] {
            assert!(layers.iter().any(|l| l == name), "missing layer {name}");
        }

        // drawing units are metres
        let tpc = drawing
            .entities()
            .filter(|e| e.common.layer == "CONDUIT_TPC_110")
            .find_map(|e| match &e.specific {
                EntityType::Circle(c) if approx_eq!(f64, c.radius, 0.055, epsilon = 1e-9) => Some(c.clone()),
                _ => None,
            })
            .expect("outer circle of the TPC 110");
        assert!(approx_eq!(f64, tpc.center.x, 0.2, epsilon = 1e-9));
        assert!(approx_eq!(f64, tpc.center.y, 0.1, epsilon = 1e-9));
        Ok(())
    }

    #[test_case(r#"{ "type": "rectangle", "data": { "width": 400.0, "height": 200.0 } }"#, 4, 0; "rectangle")]
    #[test_case(r#"{ "type": "open_trough", "data": { "width": 400.0, "height": 200.0 } }"#, 3, 0; "open_trough")]
    #[test_case(r#"{ "type": "circle", "data": { "diameter": 400.0 } }"#, 0, 1; "circle")]
    fn dxf_container_outline(container: &str, n_lines: usize, n_circles: usize) -> Result<()> {
        let json = format!(r#"{{ "container": {container} }}"#);
        let ext_project: ExtProject = serde_json::from_str(&json)?;
        let scene = Importer::new(Catalog::builtin()).import_project(&ext_project)?;
        let options = DxfDrawOptions {
            version: DxfVersion::R2000,
            inventory: false,
        };
        let drawing = scene_to_dxf(&scene, options);

        let outline = drawing.entities().filter(|e| e.common.layer == CONTAINER_LAYER).collect::<Vec<_>>();
        assert_eq!(outline.iter().filter(|e| matches!(e.specific, EntityType::Line(_))).count(), n_lines);
        assert_eq!(outline.iter().filter(|e| matches!(e.specific, EntityType::Circle(_))).count(), n_circles);
        assert_eq!(outline.len(), n_lines + n_circles);
        Ok(())
    }

    #[test]
    fn dxf_inventory_counts_each_type() -> Result<()> {
        let ext_project: ExtProject = serde_json::from_str(PROJECT)?;
        let scene = Importer::new(Catalog::builtin()).import_project(&ext_project)?;
        let options = DxfDrawOptions {
            inventory: true,
            ..DxfDrawOptions::default()
        };
        let drawing = scene_to_dxf(&scene, options);

        let lines = drawing
            .entities()
            .filter_map(|e| match &e.specific {
                EntityType::Text(t) => Some(t.value.clone()),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(lines.len(), 4);
        assert!(lines.contains(&"CONDUIT_TPC_110 x1".to_string()));
        assert!(lines.contains(&"CABLE_D20 x1".to_string()));
        Ok(())
    }
}
