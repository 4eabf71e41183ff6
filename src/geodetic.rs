//! WGS84 geodetic coordinates
use nalgebra::Vector3;

use crate::constants::{EARTH_FLATTENING_WGS84, EARTH_SEMI_MAJOR_AXIS_WGS84};

/// Below this |cos(lat)|, the altitude is obtained from the polar axis.
const POLAR_COS_LAT: f64 = 1.0E-10;

/// Semi-minor axis (m)
fn semi_minor_axis() -> f64 {
    EARTH_SEMI_MAJOR_AXIS_WGS84 * (1.0 - EARTH_FLATTENING_WGS84)
}

/// First eccentricity squared
fn e2() -> f64 {
    EARTH_FLATTENING_WGS84 * (2.0 - EARTH_FLATTENING_WGS84)
}

/// Prime vertical radius of curvature (m)
fn prime_vertical_radius(sin_lat: f64) -> f64 {
    EARTH_SEMI_MAJOR_AXIS_WGS84 / (1.0 - e2() * sin_lat.powi(2)).sqrt()
}

/// Converts ECEF coordinates (m) to (latitude (°), longitude (°), altitude (m))
/// above the WGS84 ellipsoid, using Bowring's closed form.
///
/// The Earth center has no geodetic solution and maps to
/// (0°, 0°, -semi major axis).
pub fn ecef_to_geodetic(ecef_m: &Vector3<f64>) -> (f64, f64, f64) {
    let (x, y, z) = (ecef_m[0], ecef_m[1], ecef_m[2]);
    let p = (x.powi(2) + y.powi(2)).sqrt();

    if p == 0.0 && z == 0.0 {
        return (0.0, 0.0, -EARTH_SEMI_MAJOR_AXIS_WGS84);
    }

    let a = EARTH_SEMI_MAJOR_AXIS_WGS84;
    let b = semi_minor_axis();
    let e2 = e2();
    let ep2 = e2 / (1.0 - e2);

    let lon = y.atan2(x);

    let theta = (z * a).atan2(p * b);
    let (sin_theta, cos_theta) = theta.sin_cos();

    let lat = (z + ep2 * b * sin_theta.powi(3)).atan2(p - e2 * a * cos_theta.powi(3));
    let (sin_lat, cos_lat) = lat.sin_cos();

    let n = prime_vertical_radius(sin_lat);

    let alt_m = if cos_lat.abs() > POLAR_COS_LAT {
        p / cos_lat - n
    } else {
        z / sin_lat - n * (1.0 - e2)
    };

    (lat.to_degrees(), lon.to_degrees(), alt_m)
}

/// Converts (latitude (°), longitude (°), altitude (m)) above
/// the WGS84 ellipsoid to ECEF coordinates (m).
pub fn geodetic_to_ecef(lat_deg: f64, lon_deg: f64, alt_m: f64) -> Vector3<f64> {
    let (sin_lat, cos_lat) = lat_deg.to_radians().sin_cos();
    let (sin_lon, cos_lon) = lon_deg.to_radians().sin_cos();

    let n = prime_vertical_radius(sin_lat);

    Vector3::new(
        (n + alt_m) * cos_lat * cos_lon,
        (n + alt_m) * cos_lat * sin_lon,
        (n * (1.0 - e2()) + alt_m) * sin_lat,
    )
}
