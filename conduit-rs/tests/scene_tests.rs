#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use conduit_rs::collision_detection::{find_free_spot_in_conduit, fits_in_conduit};
    use conduit_rs::entities::{Container, Scene};
    use conduit_rs::geometry::geo_traits::Shape;
    use conduit_rs::geometry::primitives::{Point, Rect};
    use conduit_rs::util::assertions;
    use float_cmp::approx_eq;
    use test_case::test_case;

    fn square(side: f64) -> Scene {
        Scene::new(Container::rectangle(side, side).unwrap())
    }

    #[test]
    fn add_conduit_finds_free_spot() {
        let mut scene = square(1000.0);
        let first = scene
            .add_conduit(200.0, 150.0, Point(500.0, 500.0), None)
            .unwrap()
            .unwrap();
        assert_eq!(scene.body(first).unwrap().position, Point(500.0, 500.0));

        let second = scene
            .add_conduit(200.0, 150.0, Point(500.0, 500.0), None)
            .unwrap()
            .unwrap();
        let (a, b) = (scene.body(first).unwrap(), scene.body(second).unwrap());
        assert!(!a.circle().overlaps(&b.circle()));
        assert!(scene.container().contains(&b.circle()));
    }

    #[test]
    fn add_conduit_without_room_returns_none() {
        let mut scene = square(100.0);
        assert!(
            scene
                .add_conduit(100.0, 80.0, Point(50.0, 50.0), None)
                .unwrap()
                .is_some()
        );
        assert!(
            scene
                .add_conduit(100.0, 80.0, Point(50.0, 50.0), None)
                .unwrap()
                .is_none()
        );
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn invalid_dimensions_are_rejected() {
        let mut scene = square(1000.0);
        assert!(scene.add_conduit(-5.0, 3.0, Point(500.0, 500.0), None).is_err());
        assert!(scene.add_conduit(50.0, 60.0, Point(500.0, 500.0), None).is_err());
        assert!(scene.add_cable(f64::NAN, Point(500.0, 500.0), None, None).is_err());
        assert!(Container::rectangle(0.0, 10.0).is_err());
        assert!(Container::circle(-1.0).is_err());
    }

    #[test]
    fn cable_enters_conduit_under_point() {
        let mut scene = square(1000.0);
        let conduit = scene
            .insert_conduit(200.0, 150.0, Point(500.0, 500.0), None)
            .unwrap();

        let small = scene
            .add_cable(20.0, Point(500.0, 500.0), None, None)
            .unwrap()
            .unwrap();
        let small = scene.body(small).unwrap();
        assert_eq!(small.parent(), Some(conduit));
        let bore = scene.body(conduit).unwrap().bore().unwrap();
        assert!(bore.encloses(&small.circle(), 1e-9));

        // too large for the bore: lands outside the conduit instead
        let large = scene
            .add_cable(160.0, Point(500.0, 500.0), None, None)
            .unwrap()
            .unwrap();
        let large = scene.body(large).unwrap();
        assert_eq!(large.parent(), None);
        assert!(!large.circle().overlaps(&scene.body(conduit).unwrap().circle()));
        assert!(assertions::scene_links_are_consistent(&scene));
    }

    #[test]
    fn cable_into_too_narrow_conduit_is_an_error() {
        let mut scene = square(1000.0);
        let conduit = scene
            .insert_conduit(50.0, 37.0, Point(500.0, 500.0), None)
            .unwrap();
        assert!(!fits_in_conduit(&scene, conduit, 40.0));
        assert!(
            scene
                .add_cable(40.0, Point(500.0, 500.0), Some(conduit), None)
                .is_err()
        );
    }

    #[test]
    fn forced_search_falls_back_to_bore_centre() {
        let mut scene = square(1000.0);
        let conduit = scene
            .insert_conduit(200.0, 150.0, Point(500.0, 500.0), None)
            .unwrap();
        scene
            .insert_cable(150.0, Point(500.0, 500.0), Some(conduit), None)
            .unwrap();

        let p = Point(500.0, 500.0);
        assert_eq!(find_free_spot_in_conduit(&scene, conduit, p, 10.0, None, false), None);
        assert_eq!(
            find_free_spot_in_conduit(&scene, conduit, p, 10.0, None, true),
            Some(Point(500.0, 500.0))
        );
        assert_eq!(find_free_spot_in_conduit(&scene, conduit, p, 80.0, None, true), None);
    }

    #[test]
    fn removing_a_conduit_cascades() {
        let mut scene = square(1000.0);
        let conduit = scene
            .insert_conduit(200.0, 150.0, Point(500.0, 500.0), None)
            .unwrap();
        let c1 = scene
            .insert_cable(20.0, Point(480.0, 500.0), Some(conduit), None)
            .unwrap();
        let c2 = scene
            .insert_cable(20.0, Point(520.0, 500.0), Some(conduit), None)
            .unwrap();

        let removed = scene.remove(conduit);
        assert_eq!(removed.len(), 3);
        assert!(removed.contains(&c1) && removed.contains(&c2));
        assert!(scene.is_empty());
        assert!(scene.remove(conduit).is_empty());
    }

    #[test]
    fn removing_a_cable_detaches_it() {
        let mut scene = square(1000.0);
        let conduit = scene
            .insert_conduit(200.0, 150.0, Point(500.0, 500.0), None)
            .unwrap();
        let c1 = scene
            .insert_cable(20.0, Point(480.0, 500.0), Some(conduit), None)
            .unwrap();
        let c2 = scene
            .insert_cable(20.0, Point(520.0, 500.0), Some(conduit), None)
            .unwrap();

        assert_eq!(scene.remove(c1), vec![c1]);
        assert_eq!(scene.body(conduit).unwrap().children(), &[c2]);
        assert!(assertions::scene_links_are_consistent(&scene));
    }

    #[test]
    fn shrinking_the_container_prunes_outside_bodies() {
        let mut scene = square(1000.0);
        let inside = scene
            .insert_conduit(100.0, 80.0, Point(100.0, 100.0), None)
            .unwrap();
        let outside = scene
            .insert_conduit(100.0, 80.0, Point(900.0, 900.0), None)
            .unwrap();
        let child = scene
            .insert_cable(20.0, Point(900.0, 900.0), Some(outside), None)
            .unwrap();
        let stray = scene
            .insert_cable(20.0, Point(700.0, 100.0), None, None)
            .unwrap();

        let removed = scene.set_container(Container::rectangle(500.0, 500.0).unwrap());
        assert_eq!(removed.len(), 3);
        assert!(removed.contains(&outside) && removed.contains(&child) && removed.contains(&stray));
        assert!(scene.contains_key(inside));

        // idempotent
        assert!(scene.prune_outside().is_empty());
    }

    #[test]
    fn escaped_cable_is_pruned() {
        let mut scene = square(1000.0);
        let conduit = scene
            .insert_conduit(200.0, 150.0, Point(500.0, 500.0), None)
            .unwrap();
        let escaped = scene
            .insert_cable(20.0, Point(580.0, 500.0), Some(conduit), None)
            .unwrap();
        let fine = scene
            .insert_cable(20.0, Point(500.0, 500.0), Some(conduit), None)
            .unwrap();

        assert_eq!(scene.prune_outside(), vec![escaped]);
        assert_eq!(scene.body(conduit).unwrap().children(), &[fine]);
    }

    #[test]
    fn dragging_a_conduit_carries_unfrozen_cables() {
        let mut scene = square(1000.0);
        let conduit = scene
            .insert_conduit(200.0, 150.0, Point(500.0, 500.0), None)
            .unwrap();
        let loose = scene
            .insert_cable(20.0, Point(500.0, 500.0), Some(conduit), None)
            .unwrap();
        let pinned = scene
            .insert_cable(20.0, Point(530.0, 500.0), Some(conduit), None)
            .unwrap();
        scene.set_frozen(pinned, true);

        assert!(scene.start_drag(conduit));
        assert!(scene.drag_to(conduit, Point(600.0, 450.0)));
        assert!(scene.end_drag(conduit));

        assert_eq!(scene.body(conduit).unwrap().position, Point(600.0, 450.0));
        assert_eq!(scene.body(loose).unwrap().position, Point(600.0, 450.0));
        assert_eq!(scene.body(pinned).unwrap().position, Point(530.0, 500.0));
        assert!(!scene.body(conduit).unwrap().dragging);
    }

    #[test]
    fn toggle_freeze_all_follows_majority() {
        let mut scene = square(1000.0);
        let a = scene
            .insert_conduit(100.0, 80.0, Point(100.0, 100.0), None)
            .unwrap();
        scene
            .insert_conduit(100.0, 80.0, Point(300.0, 100.0), None)
            .unwrap();
        scene
            .insert_cable(20.0, Point(600.0, 100.0), None, None)
            .unwrap();
        scene.set_frozen(a, true);

        assert!(scene.toggle_freeze_all());
        assert!(scene.bodies().all(|(_, b)| b.frozen));
        assert!(!scene.toggle_freeze_all());
        assert!(scene.bodies().all(|(_, b)| !b.frozen));
    }

    #[test]
    fn pick_prefers_cables_then_conduit_rings() {
        let mut scene = square(1000.0);
        let conduit = scene
            .insert_conduit(200.0, 150.0, Point(500.0, 500.0), None)
            .unwrap();
        let cable = scene
            .insert_cable(20.0, Point(500.0, 500.0), Some(conduit), None)
            .unwrap();

        assert_eq!(scene.pick_at(Point(500.0, 500.0)), Some(cable));
        assert_eq!(scene.pick_at(Point(580.0, 500.0)), Some(conduit));
        assert_eq!(scene.pick_at(Point(550.0, 500.0)), None);
        assert_eq!(scene.pick_at(Point(700.0, 700.0)), None);
    }

    #[test]
    fn occupancy_and_fill_ratios() {
        let mut scene = square(1000.0);
        let conduit = scene
            .insert_conduit(200.0, 150.0, Point(500.0, 500.0), None)
            .unwrap();
        scene
            .insert_cable(75.0, Point(500.0, 500.0), Some(conduit), None)
            .unwrap();

        assert!(approx_eq!(f64, scene.occupancy(), PI * 100.0 * 100.0 / 1e6, epsilon = 1e-12));
        assert!(approx_eq!(f64, scene.conduit_fill(conduit).unwrap(), 0.25, epsilon = 1e-12));

        scene
            .insert_cable(100.0, Point(100.0, 100.0), None, None)
            .unwrap();
        let expected = PI * (100.0 * 100.0 + 50.0 * 50.0) / 1e6;
        assert!(approx_eq!(f64, scene.occupancy(), expected, epsilon = 1e-12));
    }

    #[test]
    fn circular_container_containment() {
        let container = Container::circle(1000.0).unwrap();
        let scene = Scene::new(container);
        assert_eq!(scene.container().center(), Point(500.0, 500.0));

        let inside = conduit_rs::geometry::primitives::Circle::new(Point(500.0, 100.0), 100.0);
        let corner = conduit_rs::geometry::primitives::Circle::new(Point(60.0, 60.0), 50.0);
        assert!(container.contains(&inside));
        assert!(!container.contains(&corner));
    }

    #[test_case(Container::Rectangle { width: 400.0, height: 200.0 }, 80_000.0; "rectangle")]
    #[test_case(Container::OpenTrough { width: 400.0, height: 200.0 }, 80_000.0; "open_trough")]
    #[test_case(Container::Circle { diameter: 400.0 }, PI * 200.0 * 200.0; "circle")]
    fn container_area_and_bounds(container: Container, area: f64) {
        assert!(approx_eq!(f64, container.area(), area, epsilon = 1e-9));
        let bbox = container.bbox();
        assert_eq!(bbox.x_min, 0.0);
        assert_eq!(bbox.y_min, 0.0);
        assert_eq!((bbox.width(), bbox.height()), (container.width(), container.height()));
        assert!(approx_eq!(f64, bbox.area(), container.width() * container.height()));
    }

    #[test]
    fn circle_bbox_is_centred_on_the_circle() {
        let circle = conduit_rs::geometry::primitives::Circle::new(Point(100.0, 50.0), 25.0);
        let expected = Rect {
            x_min: 75.0,
            y_min: 25.0,
            x_max: 125.0,
            y_max: 75.0,
        };
        assert_eq!(circle.bbox(), expected);
        assert!(approx_eq!(f64, circle.area(), PI * 625.0));
    }

    #[test]
    fn only_an_open_trough_carries_a_tray_name() {
        let mut scene = square(500.0);
        assert!(scene.set_tray_name(Some("Petit".to_string())).is_err());
        assert_eq!(scene.tray_name(), None);

        let mut tray = Scene::new(Container::open_trough(100.0, 50.0).unwrap());
        tray.set_tray_name(Some("Petit".to_string())).unwrap();
        // same dimensions, still the catalog tray
        tray.set_container(Container::open_trough(100.0, 50.0).unwrap());
        assert_eq!(tray.tray_name(), Some("Petit"));
    }
}
