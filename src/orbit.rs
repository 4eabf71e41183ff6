use std::collections::BTreeMap;

use anise::{
    constants::frames::{EARTH_J2000, IAU_EARTH_FRAME},
    prelude::Orbit,
};

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    cfg::Config,
    error::Error,
    prelude::{Ephemeris, Epoch, SV},
};

/// Satellite kinematic state, resolved at one observation [Epoch].
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SatelliteState {
    /// [SV]
    pub sv: SV,
    /// [Epoch] of the observation this state was resolved for
    pub epoch: Epoch,
    /// ECI position (in meters)
    pub position_eci_m: Vector3<f64>,
    /// ECEF position (in meters)
    pub position_ecef_m: Vector3<f64>,
}

impl SatelliteState {
    /// Propagates this [Ephemeris] to `epoch` and rotates the
    /// result into the Earth fixed frame.
    pub fn resolve(cfg: &Config, sv: SV, ephemeris: &Ephemeris, epoch: Epoch) -> Result<Self, Error> {
        let kepler = ephemeris.resolve_eci(sv, epoch, &cfg.kepler)?;
        let position_ecef_m = cfg
            .earth_rotation
            .eci_to_ecef(&kepler.position_eci_m, epoch);

        Ok(Self {
            sv,
            epoch,
            position_eci_m: kepler.position_eci_m,
            position_ecef_m,
        })
    }

    /// Converts the inertial position to an [Orbit] expressed in [EARTH_J2000].
    pub fn eci_orbit(&self) -> Orbit {
        let pos_km = self.position_eci_m / 1.0E3;
        Orbit::from_position(pos_km[0], pos_km[1], pos_km[2], self.epoch, EARTH_J2000)
    }

    /// Converts the Earth fixed position to an [Orbit] labelled [IAU_EARTH_FRAME].
    /// The label is nominal: coordinates come from the configured
    /// [EarthRotation](crate::prelude::EarthRotation) model, not from the IAU
    /// rotation model, and are copied as is.
    pub fn ecef_orbit(&self) -> Orbit {
        let pos_km = self.position_ecef_m / 1.0E3;
        Orbit::from_position(pos_km[0], pos_km[1], pos_km[2], self.epoch, IAU_EARTH_FRAME)
    }
}

/// Resolved [SatelliteState]s of every [SV], sorted by [Epoch].
#[derive(Debug, Clone, Default)]
pub struct SatelliteTracks {
    tracks: BTreeMap<SV, Vec<SatelliteState>>,
}

impl SatelliteTracks {
    /// Inserts a new [SatelliteState], replacing any state
    /// previously resolved for the same [SV] at the same [Epoch].
    pub fn insert(&mut self, state: SatelliteState) {
        let track = self.tracks.entry(state.sv).or_default();
        match track.binary_search_by(|s| s.epoch.cmp(&state.epoch)) {
            Ok(index) => track[index] = state,
            Err(index) => track.insert(index, state),
        }
    }

    /// [SatelliteState] resolved for this [SV] at this exact [Epoch].
    pub fn state(&self, sv: SV, t: Epoch) -> Option<&SatelliteState> {
        let track = self.tracks.get(&sv)?;
        let index = track.binary_search_by(|s| s.epoch.cmp(&t)).ok()?;
        Some(&track[index])
    }

    /// Resolved states for this [SV], sorted by [Epoch].
    pub fn track(&self, sv: SV) -> &[SatelliteState] {
        self.tracks.get(&sv).map(|t| t.as_slice()).unwrap_or(&[])
    }

    /// Iterates over each [SV] track, in PRN order.
    pub fn iter(&self) -> impl Iterator<Item = (SV, &[SatelliteState])> + '_ {
        self.tracks.iter().map(|(sv, track)| (*sv, track.as_slice()))
    }

    /// Total number of resolved states.
    pub fn len(&self) -> usize {
        self.tracks.values().map(|t| t.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
