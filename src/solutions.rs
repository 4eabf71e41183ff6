//! Receiver estimates
use anise::{constants::frames::IAU_EARTH_FRAME, prelude::Orbit};
use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::SPEED_OF_LIGHT_M_S,
    navigation::DilutionOfPrecision,
    prelude::{Epoch, SV},
};

/// Receiver position and clock bias, resolved at one [Epoch].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReceiverEstimate {
    /// Sampling [Epoch]
    pub epoch: Epoch,
    /// ECEF position (m)
    pub position_ecef_m: Vector3<f64>,
    /// Receiver clock bias, range equivalent (m)
    pub clock_bias_m: f64,
    /// Latitude (°), longitude (°) and altitude above the WGS84 ellipsoid (m)
    pub lat_long_alt_deg_deg_m: (f64, f64, f64),
    /// Completed solver iterations
    pub iterations: usize,
    /// Post-fit pseudo range residual RMS (m)
    pub residual_rms_m: f64,
    /// [DilutionOfPrecision]
    pub dop: DilutionOfPrecision,
    /// Contributing satellites, in PRN order
    pub sv: Vec<SV>,
    /// Satellites whose line of sight degenerated during the iteration
    pub degenerate: Vec<SV>,
}

impl ReceiverEstimate {
    /// Receiver clock bias (s)
    pub fn clock_bias_s(&self) -> f64 {
        self.clock_bias_m / SPEED_OF_LIGHT_M_S
    }

    /// Converts this estimate to an [Orbit] labelled [IAU_EARTH_FRAME].
    /// The label is nominal, see [SatelliteState::ecef_orbit](crate::prelude::SatelliteState::ecef_orbit).
    pub fn to_orbit(&self) -> Orbit {
        let pos_km = self.position_ecef_m / 1.0E3;
        Orbit::from_position(pos_km[0], pos_km[1], pos_km[2], self.epoch, IAU_EARTH_FRAME)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::time::gpst_epoch_from_seconds;

    #[test]
    fn estimate_conversions() {
        let estimate = ReceiverEstimate {
            epoch: gpst_epoch_from_seconds(100_010.0),
            position_ecef_m: Vector3::new(3582105.291, 532589.7313, 5232754.8054),
            clock_bias_m: SPEED_OF_LIGHT_M_S * 1.0E-6,
            lat_long_alt_deg_deg_m: (0.0, 0.0, 0.0),
            iterations: 10,
            residual_rms_m: 0.0,
            dop: Default::default(),
            sv: Vec::new(),
            degenerate: Vec::new(),
        };

        assert!((estimate.clock_bias_s() - 1.0E-6).abs() < 1.0E-15);

        let orbit = estimate.to_orbit();
        assert_eq!(orbit.epoch, estimate.epoch);
        assert_eq!(orbit.frame, IAU_EARTH_FRAME);
        assert!((orbit.radius_km[0] - 3582.105291).abs() < 1.0E-9);
        assert!((orbit.radius_km[2] - 5232.7548054).abs() < 1.0E-9);
    }
}
