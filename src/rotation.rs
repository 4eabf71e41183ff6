//! Earth rotation: ECI to ECEF transform
use std::f64::consts::TAU;

use log::trace;
use nalgebra::{Rotation3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::{EARTH_ANGULAR_VEL_RAD, SOLAR_DAY_S},
    prelude::Epoch,
    time::gpst_seconds,
};

/// Earth rotation angle model.
///
/// Whatever the model, the transform is
/// `ECEF = Rz(θ)ᵗ · ECI` (column vectors): the Earth fixed frame
/// lags behind the inertial frame by θ.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EarthRotation {
    /// θ = frac(t / 86400) · 2π, t in absolute GPST seconds.
    #[default]
    SolarDayFraction,
    /// θ = ωE · t mod 2π, ωE being the WGS84 Earth angular velocity.
    SiderealRate,
}

impl std::fmt::Display for EarthRotation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::SolarDayFraction => write!(f, "solar-day"),
            Self::SiderealRate => write!(f, "sidereal-rate"),
        }
    }
}

impl EarthRotation {
    /// Rotation angle θ (rad) at this [Epoch], within [0, 2π).
    pub fn angle_rad(&self, t: Epoch) -> f64 {
        let t_s = gpst_seconds(t);
        match self {
            Self::SolarDayFraction => (t_s / SOLAR_DAY_S).rem_euclid(1.0) * TAU,
            Self::SiderealRate => (EARTH_ANGULAR_VEL_RAD * t_s).rem_euclid(TAU),
        }
    }

    /// Rz(θ)ᵗ at this [Epoch]
    fn rotation(&self, t: Epoch) -> Rotation3<f64> {
        Rotation3::from_axis_angle(&Vector3::z_axis(), self.angle_rad(t)).inverse()
    }

    /// Rotates inertial coordinates into the Earth fixed frame.
    /// The vector norm is preserved.
    pub fn eci_to_ecef(&self, eci: &Vector3<f64>, t: Epoch) -> Vector3<f64> {
        let ecef = self.rotation(t) * eci;
        trace!("{} - {} θ={:.9}rad eci={:?} ecef={:?}", t, self, self.angle_rad(t), eci, ecef);
        ecef
    }

    /// Rotates Earth fixed coordinates back into the inertial frame.
    pub fn ecef_to_eci(&self, ecef: &Vector3<f64>, t: Epoch) -> Vector3<f64> {
        self.rotation(t).inverse() * ecef
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::time::gpst_epoch_from_seconds;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn solar_day_fraction_angle() {
        let model = EarthRotation::SolarDayFraction;
        assert_eq!(model.angle_rad(gpst_epoch_from_seconds(0.0)), 0.0);
        assert!((model.angle_rad(gpst_epoch_from_seconds(21600.0)) - FRAC_PI_2).abs() < 1.0E-12);
        assert!(model.angle_rad(gpst_epoch_from_seconds(86400.0)).abs() < 1.0E-12);
        assert!(
            (model.angle_rad(gpst_epoch_from_seconds(86400.0 * 3.0 + 43200.0)) - TAU / 2.0).abs()
                < 1.0E-12
        );
    }

    #[test]
    fn sidereal_rate_angle() {
        let model = EarthRotation::SiderealRate;
        let t_s = 1000.0;
        let theta = model.angle_rad(gpst_epoch_from_seconds(t_s));
        assert!((theta - EARTH_ANGULAR_VEL_RAD * t_s).abs() < 1.0E-12);

        // one sidereal day brings us back
        let sidereal_day = TAU / EARTH_ANGULAR_VEL_RAD;
        let theta = model.angle_rad(gpst_epoch_from_seconds(sidereal_day.round()));
        assert!(theta < 1.0E-4 || (TAU - theta) < 1.0E-4);
    }

    #[test]
    fn rotation_convention() {
        // quarter of a day: the fixed frame has rotated +90° about z,
        // an inertial +x vector now sits on the fixed -y axis
        let model = EarthRotation::SolarDayFraction;
        let t = gpst_epoch_from_seconds(21600.0);
        let ecef = model.eci_to_ecef(&Vector3::new(1.0, 0.0, 0.0), t);
        assert!(ecef[0].abs() < 1.0E-12);
        assert!((ecef[1] + 1.0).abs() < 1.0E-12);
        assert_eq!(ecef[2], 0.0);

        let ecef = model.eci_to_ecef(&Vector3::new(0.0, 1.0, 0.0), t);
        assert!((ecef[0] - 1.0).abs() < 1.0E-12);
        assert!(ecef[1].abs() < 1.0E-12);

        // z axis is invariant
        let ecef = model.eci_to_ecef(&Vector3::new(0.0, 0.0, 7.0), t);
        assert_eq!(ecef, Vector3::new(0.0, 0.0, 7.0));
    }

    #[test]
    fn round_trip_and_norm() {
        let eci = Vector3::new(15_600_000.0, -7_540_000.0, 20_140_000.0);
        for model in [EarthRotation::SolarDayFraction, EarthRotation::SiderealRate] {
            for t_s in [0.0, 1.0, 100_010.0, 43_200.0, 604_799.0] {
                let t = gpst_epoch_from_seconds(t_s);
                let ecef = model.eci_to_ecef(&eci, t);
                assert!((ecef.norm() - eci.norm()).abs() < 1.0E-6);
                let back = model.ecef_to_eci(&ecef, t);
                assert!((back - eci).norm() < 1.0E-6, "{} round trip failed @{}", model, t_s);
            }
        }
    }
}
