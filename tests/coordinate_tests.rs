use canvasview::coords::create_geo_mapping;
use canvasview::prelude::*;
use std::f64::consts::FRAC_PI_2;

/// Screen, world and geographic conversions
#[cfg(test)]
mod coordinate_tests {
    use super::*;

    fn bay_area() -> GeoBounds {
        GeoBounds::new(38.0, 37.0, -122.0, -123.0)
    }

    #[test]
    fn test_geo_corners_land_on_canvas_corners() {
        let bounds = bay_area();
        let north_west = geo_to_canvas(&LatLng::new(38.0, -123.0), &bounds, 400.0, 400.0).unwrap();
        let south_east = geo_to_canvas(&LatLng::new(37.0, -122.0), &bounds, 400.0, 400.0).unwrap();

        assert!(north_west.approx_eq(&Point::new(0.0, 0.0), 1e-6));
        assert!(south_east.approx_eq(&Point::new(400.0, 400.0), 1e-6));
    }

    #[test]
    fn test_geo_round_trip() {
        let bounds = bay_area();
        let coord = LatLng::new(37.7749, -122.4194);
        let pixel = geo_to_canvas(&coord, &bounds, 1024.0, 768.0).unwrap();
        let back = canvas_to_geo(pixel, &bounds, 1024.0, 768.0).unwrap();

        assert!((back.lat - coord.lat).abs() < 1e-9);
        assert!((back.lng - coord.lng).abs() < 1e-9);
    }

    #[test]
    fn test_web_mercator_round_trip() {
        for lat in [-84.9, -45.0, 0.0, 12.3456, 60.0, 84.9] {
            for lng in [-179.0, -73.98, 0.0, 139.69] {
                let projected = lat_lng_to_web_mercator(lat, lng);
                let back = web_mercator_to_lat_lng(projected.x, projected.y);
                assert!((back.lat - lat).abs() < 1e-6, "lat {} came back as {}", lat, back.lat);
                assert!((back.lng - lng).abs() < 1e-6, "lng {} came back as {}", lng, back.lng);
            }
        }
    }

    #[test]
    fn test_degenerate_geo_bounds_are_singular() {
        let flat = GeoBounds::new(37.0, 37.0, -122.0, -123.0);
        let result = canvas_to_geo(Point::new(10.0, 10.0), &flat, 100.0, 100.0);
        assert!(matches!(result, Err(ViewError::SingularMatrix { .. })));
    }

    #[test]
    fn test_mapping_follows_panned_viewport() {
        let mut mapping = create_geo_mapping(&bay_area(), 400.0, 400.0);
        let before = mapping.screen_to_world(Point::new(200.0, 200.0)).unwrap();

        let viewport = Viewport {
            x: 100.0,
            ..*mapping.viewport()
        };
        mapping.set_viewport(viewport);
        assert!(!mapping.is_computed());

        let after = mapping.screen_to_world(Point::new(300.0, 200.0)).unwrap();
        assert!(after.approx_eq(&before, 1e-9));
        assert!(mapping.is_computed());
    }

    #[test]
    fn test_cartesian_canvas_mapping() {
        let mut mapping = create_canvas_coordinate_mapping(800.0, 600.0, true);
        assert_eq!(mapping.screen_to_world(Point::new(400.0, 300.0)).unwrap(), Point::ZERO);

        let up = mapping.world_to_screen(Point::new(0.0, 100.0)).unwrap();
        assert!(up.approx_eq(&Point::new(400.0, 200.0), 1e-9));
    }

    #[test]
    fn test_rotated_system_round_trip() {
        let system = CoordinateSystem {
            origin: Point::new(50.0, 50.0),
            scale_x: 0.5,
            scale_y: 2.0,
            rotation: FRAC_PI_2 / 3.0,
            flip_x: true,
            flip_y: false,
        };
        let viewport = Viewport {
            x: -30.0,
            y: 12.0,
            scale: 1.5,
            rotation: 0.4,
            ..Viewport::new(640.0, 480.0)
        };
        let mut mapping = create_coordinate_mapping(viewport, system);

        let screen_points = vec![Point::new(0.0, 0.0), Point::new(320.0, 240.0), Point::new(-17.0, 999.0)];
        let world = mapping.screen_to_world_points(&screen_points).unwrap();
        let back = mapping.world_to_screen_points(&world).unwrap();
        for (expected, actual) in screen_points.iter().zip(back.iter()) {
            assert!(actual.approx_eq(expected, 1e-6));
        }
    }

    #[test]
    fn test_convert_between_mappings() {
        let mut screen_space = create_canvas_coordinate_mapping(800.0, 600.0, false);
        let mut cartesian = create_canvas_coordinate_mapping(800.0, 600.0, true);

        let converted = convert_coordinates(Point::new(10.0, 20.0), &mut screen_space, &mut cartesian).unwrap();
        assert!(converted.approx_eq(&Point::new(10.0, -20.0), 1e-9));
    }

    #[test]
    fn test_grid_helpers() {
        assert_eq!(snap_to_grid(Point::new(26.0, -14.0), 10.0), Point::new(30.0, -10.0));
        assert_eq!(snap_to_grid(Point::new(26.0, -14.0), 0.0), Point::new(26.0, -14.0));

        let points = get_grid_points(&BoundingBox::new(0.0, 0.0, 20.0, 10.0), 10.0);
        assert_eq!(points.len(), 6);
        assert_eq!(points.first(), Some(&Point::new(0.0, 0.0)));
        assert_eq!(points.last(), Some(&Point::new(20.0, 10.0)));
    }

    #[test]
    fn test_event_points_are_surface_local() {
        let surface = StaticSurface::at(10.0, 20.0, 300.0, 200.0);
        let pointer = InputEvent::Pointer(PointerEvent::new(110.0, 70.0));
        assert_eq!(get_event_point(&pointer, &surface).unwrap(), Point::new(100.0, 50.0));

        let empty = InputEvent::Touch(TouchEvent::default());
        assert!(matches!(
            get_event_point(&empty, &surface),
            Err(ViewError::MissingTouchPoint)
        ));
    }
}
