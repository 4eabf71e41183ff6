#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

extern crate gnss_rs as gnss;

// private modules
mod candidate;
mod cfg;
mod ephemeris;
mod epochs;
mod error;
mod navigation;
mod observation;
mod orbit;
mod rotation;
mod solutions;
mod solver;
mod sv;

// public modules
pub mod constants;
pub mod geodetic;
pub mod time;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::candidate::Candidate;
    pub use crate::cfg::{Config, KeplerOpts, SolverOpts};
    pub use crate::ephemeris::{Ephemeris, EphemerisStore, KeplerSolution};
    pub use crate::epochs::{align, Alignment, EpochSet};
    pub use crate::error::Error;
    pub use crate::geodetic::{ecef_to_geodetic, geodetic_to_ecef};
    pub use crate::navigation::DilutionOfPrecision;
    pub use crate::observation::{Observation, ObservationStore};
    pub use crate::orbit::{SatelliteState, SatelliteTracks};
    pub use crate::rotation::EarthRotation;
    pub use crate::solutions::ReceiverEstimate;
    pub use crate::solver::{Report, Solver};
    pub use crate::sv::gps_sv;
    pub use crate::time::{gpst_epoch, gpst_epoch_from_seconds, gpst_seconds};
    // re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch, TimeScale};
    pub use nalgebra::Vector3;
}

// pub export
pub use error::Error;
