use anise::constants::SPEED_OF_LIGHT_KM_S;

/// Earth mass (kg)
pub const EARTH_MASS_KG: f64 = 5.9722E24;

/// Newtonian gravitational constant (m^3 kg-1 s-2)
pub const GRAVITATIONAL_CONSTANT: f64 = 6.67430E-11;

/// Earth standard gravitational parameter (m^3 s-2)
pub const EARTH_GRAVITATION_MU_M3_S2: f64 = EARTH_MASS_KG * GRAVITATIONAL_CONSTANT;

/// Earth angular velocity, in WGS84 frame rad/s
pub const EARTH_ANGULAR_VEL_RAD: f64 = 7.2921151467E-5;

/// Length of one mean solar day (s)
pub const SOLAR_DAY_S: f64 = 86400.0;

/// WGS84 Earth Frame Ellipsoid semi-major axis (m)
pub const EARTH_SEMI_MAJOR_AXIS_WGS84: f64 = 6378137.0_f64;

/// WGS84 Earth Frame Ellipsoid flattening
pub const EARTH_FLATTENING_WGS84: f64 = 1.0 / 298.257223563;

/// Speed of light in m.s⁻¹
pub const SPEED_OF_LIGHT_M_S: f64 = SPEED_OF_LIGHT_KM_S * 1000.0;

/// Highest GPS PRN we can store.
pub const MAX_SATELLITES: usize = 32;

/// Maximal number of distinct epochs processed per run,
/// and maximal history depth of one satellite.
pub const MAX_EPOCHS: usize = 100_000;

/// Minimal number of satellites to resolve position + clock bias.
pub const MIN_SV: usize = 4;

/// Maximal number of samples in one orbit track.
pub const MAX_TRACK_SAMPLES: usize = 100_000;
