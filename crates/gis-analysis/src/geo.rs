//! Great-circle distance and a local planar projection for centroid math.

use std::f64::consts::PI;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometres per degree of latitude (mean).
const KM_PER_DEG_LAT: f64 = 110.574;

/// Kilometres per degree of longitude at the equator.
const KM_PER_DEG_LNG_EQUATOR: f64 = 111.320;

/// Haversine distance between two lat/lng points in kilometres.
#[must_use]
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let to_rad = |deg: f64| deg * PI / 180.0;

    let dlat = to_rad(lat2 - lat1);
    let dlng = to_rad(lng2 - lng1);

    let a = (dlat / 2.0).sin().powi(2)
        + to_rad(lat1).cos() * to_rad(lat2).cos() * (dlng / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().min(1.0).asin();
    EARTH_RADIUS_KM * c
}

/// Equirectangular projection to kilometres around a reference latitude.
///
/// Accurate to well under a percent at city scale, which is all the centroid
/// based metrics need.
#[must_use]
pub fn project_km(lat: f64, lng: f64, reference_lat: f64) -> (f64, f64) {
    let x = lng * KM_PER_DEG_LNG_EQUATOR * reference_lat.to_radians().cos();
    let y = lat * KM_PER_DEG_LAT;
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance() {
        assert!(haversine_km(7.4478, 125.8078, 7.4478, 125.8078).abs() < 1e-9);
    }

    #[test]
    fn one_degree_of_latitude() {
        let d = haversine_km(7.0, 125.0, 8.0, 125.0);
        assert!((d - 111.19).abs() < 0.1, "expected ~111.19 km, got {d}");
    }

    #[test]
    fn tagum_to_davao() {
        // Tagum City centre to Davao City centre, roughly 48 km.
        let d = haversine_km(7.4478, 125.8078, 7.0707, 125.6087);
        assert!(d > 40.0 && d < 55.0, "expected ~47 km, got {d}");
    }

    #[test]
    fn projection_agrees_with_haversine_at_city_scale() {
        let (x1, y1) = project_km(7.44, 125.80, 7.44);
        let (x2, y2) = project_km(7.47, 125.83, 7.44);
        let planar = (x2 - x1).hypot(y2 - y1);
        let sphere = haversine_km(7.44, 125.80, 7.47, 125.83);
        assert!((planar - sphere).abs() / sphere < 0.01);
    }
}
