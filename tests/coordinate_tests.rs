use simplemaps::{Coordinate, CoordinateSystem, MapError, Wgs84Coordinate};

/// Conversion, distance and destination properties over sampled coordinates
#[cfg(test)]
mod coordinate_tests {
    use super::*;

    fn grid(lat_step: f64, lon_step: f64, lat_max: f64) -> Vec<Wgs84Coordinate> {
        let mut coordinates = Vec::new();
        let mut lat = -lat_max;
        while lat <= lat_max {
            let mut lon = -180.0;
            while lon <= 180.0 {
                coordinates.push(Wgs84Coordinate::new(lat, lon).unwrap());
                lon += lon_step;
            }
            lat += lat_step;
        }
        coordinates
    }

    /// WGS84 -> Web Mercator -> WGS84 reproduces the input
    #[test]
    fn test_web_mercator_round_trip() {
        for original in grid(5.0, 15.0, 85.0) {
            let back = original.to_web_mercator().to_wgs84().unwrap();
            assert!(
                (back.latitude() - original.latitude()).abs() < 1e-6,
                "latitude drifted for {original}"
            );
            assert!(
                (back.longitude() - original.longitude()).abs() < 1e-6,
                "longitude drifted for {original}"
            );
        }
    }

    /// WGS84 -> RT90 -> WGS84 -> RT90 stays within a centimeter
    #[test]
    fn test_regional_grid_round_trip() {
        let mut lat = 55.0;
        while lat <= 69.0 {
            let mut lon = 11.0;
            while lon <= 24.0 {
                let wgs = Wgs84Coordinate::new(lat, lon).unwrap();
                let rt90 = wgs.to_regional_grid();
                let again = rt90.to_wgs84().unwrap().to_regional_grid();

                assert!((rt90.northing - again.northing).abs() < 0.01);
                assert!((rt90.easting - again.easting).abs() < 0.01);
                lon += 1.5;
            }
            lat += 1.0;
        }
    }

    /// Known RT90 position of central Stockholm
    #[test]
    fn test_regional_grid_known_point() {
        let stockholm = Wgs84Coordinate::new(59.3293, 18.0686).unwrap().to_regional_grid();
        assert!((stockholm.northing - 6_580_800.0).abs() < 1_000.0);
        assert!((stockholm.easting - 1_628_300.0).abs() < 1_000.0);
    }

    #[test]
    fn test_distance_symmetry() {
        let samples = grid(30.0, 60.0, 60.0);
        for a in &samples {
            assert_eq!(a.distance_to(a), 0.0);
            for b in &samples {
                let ab = a.distance_to(b);
                let ba = b.distance_to(a);
                assert!((ab - ba).abs() < 1e-6, "{a} <-> {b}: {ab} vs {ba}");
            }
        }
    }

    #[test]
    fn test_distance_across_systems() {
        let stockholm = Coordinate::wgs84(59.3293, 18.0686).unwrap();
        let uppsala = Coordinate::wgs84(59.8586, 17.6389).unwrap();
        let projected = uppsala.convert_to(CoordinateSystem::WebMercator).unwrap();
        let regional = uppsala.convert_to(CoordinateSystem::RegionalGrid).unwrap();

        let direct = stockholm.distance_to(&uppsala).unwrap();
        assert!((direct - 64_000.0).abs() < 2_000.0);
        assert!((stockholm.distance_to(&projected).unwrap() - direct).abs() < 0.01);
        assert!((stockholm.distance_to(&regional).unwrap() - direct).abs() < 0.05);
    }

    /// Walking `d` meters along any heading lands `d` meters away
    #[test]
    fn test_destination_point_closure() {
        let origins = [
            Wgs84Coordinate::new(59.33, 18.06).unwrap(),
            Wgs84Coordinate::new(0.0, 0.0).unwrap(),
            Wgs84Coordinate::new(-33.87, 151.21).unwrap(),
            Wgs84Coordinate::new(10.0, 179.5).unwrap(),
        ];

        for origin in origins {
            for distance in [10.0, 1_000.0, 250_000.0, 3_000_000.0] {
                let mut heading = 0.0;
                while heading < 360.0 {
                    let destination = origin.destination_point(distance, heading).unwrap();
                    let travelled = destination.distance_to(&origin);
                    assert!(
                        (travelled - distance).abs() <= distance * 0.005,
                        "{origin} heading {heading}: {travelled} for {distance}"
                    );
                    heading += 22.5;
                }
            }
        }
    }

    #[test]
    fn test_destination_from_every_system_is_wgs84() {
        let origin = Coordinate::wgs84(59.33, 18.06).unwrap();
        for system in [
            CoordinateSystem::Wgs84,
            CoordinateSystem::WebMercator,
            CoordinateSystem::RegionalGrid,
        ] {
            let converted = origin.convert_to(system).unwrap();
            let destination = converted.destination_point(1_000.0, 90.0).unwrap();
            assert!((destination.distance_to(&origin.to_wgs84().unwrap()) - 1_000.0).abs() < 5.0);
        }
    }

    #[test]
    fn test_convert_to_named() {
        let origin = Coordinate::wgs84(59.33, 18.06).unwrap();
        assert_eq!(
            origin.convert_to_named("RT90").unwrap().system(),
            CoordinateSystem::RegionalGrid
        );
        assert!(matches!(
            origin.convert_to_named("UTM33"),
            Err(MapError::UnsupportedCoordinateSystem(_))
        ));
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(matches!(
            Coordinate::wgs84(91.0, 0.0),
            Err(MapError::InvalidCoordinates(_))
        ));
        assert!(matches!(
            Coordinate::wgs84(0.0, -180.5),
            Err(MapError::InvalidCoordinates(_))
        ));
    }
}
