#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::{MAX_EPOCHS, MAX_SATELLITES, MIN_SV},
    error::Error,
    rotation::EarthRotation,
};

mod solver;
pub use solver::SolverOpts;

const fn default_kepler_iterations() -> usize {
    10
}

const fn default_kepler_tolerance() -> f64 {
    1.0E-12
}

const fn default_max_epochs() -> usize {
    MAX_EPOCHS
}

const fn default_max_sv_per_epoch() -> usize {
    MAX_SATELLITES
}

const fn default_min_sv() -> usize {
    MIN_SV
}

/// Kepler equation solver settings.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeplerOpts {
    /// Newton iteration cap.
    #[cfg_attr(feature = "serde", serde(default = "default_kepler_iterations"))]
    pub max_iterations: usize,
    /// Iteration stops once |ΔE| falls below this value (rad).
    #[cfg_attr(feature = "serde", serde(default = "default_kepler_tolerance"))]
    pub tolerance_rad: f64,
}

impl Default for KeplerOpts {
    fn default() -> Self {
        Self {
            max_iterations: default_kepler_iterations(),
            tolerance_rad: default_kepler_tolerance(),
        }
    }
}

/// [Solver](crate::prelude::Solver) configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Kepler solver settings
    #[cfg_attr(feature = "serde", serde(default))]
    pub kepler: KeplerOpts,
    /// Model used to rotate inertial states into the Earth fixed frame
    #[cfg_attr(feature = "serde", serde(default))]
    pub earth_rotation: EarthRotation,
    /// Navigation solver settings
    #[cfg_attr(feature = "serde", serde(default))]
    pub solver: SolverOpts,
    /// Distinct epochs processed per run, the following epochs are dropped.
    #[cfg_attr(feature = "serde", serde(default = "default_max_epochs"))]
    pub max_epochs: usize,
    /// Satellites gathered per epoch, in PRN order.
    #[cfg_attr(feature = "serde", serde(default = "default_max_sv_per_epoch"))]
    pub max_sv_per_epoch: usize,
    /// Minimal number of satellites to attempt a solution.
    #[cfg_attr(feature = "serde", serde(default = "default_min_sv"))]
    pub min_sv: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kepler: KeplerOpts::default(),
            earth_rotation: EarthRotation::default(),
            solver: SolverOpts::default(),
            max_epochs: default_max_epochs(),
            max_sv_per_epoch: default_max_sv_per_epoch(),
            min_sv: default_min_sv(),
        }
    }
}

impl Config {
    /// Returns a copy of this [Config] using given [EarthRotation] model.
    pub fn with_earth_rotation(&self, rotation: EarthRotation) -> Self {
        let mut s = self.clone();
        s.earth_rotation = rotation;
        s
    }

    /// Returns a copy of this [Config] using given [SolverOpts].
    pub fn with_solver_opts(&self, opts: SolverOpts) -> Self {
        let mut s = self.clone();
        s.solver = opts;
        s
    }

    /// Returns a copy of this [Config] using given [KeplerOpts].
    pub fn with_kepler_opts(&self, opts: KeplerOpts) -> Self {
        let mut s = self.clone();
        s.kepler = opts;
        s
    }

    /// Returns a copy of this [Config] with new capacity caps.
    pub fn with_capacity(&self, max_epochs: usize, max_sv_per_epoch: usize) -> Self {
        let mut s = self.clone();
        s.max_epochs = max_epochs;
        s.max_sv_per_epoch = max_sv_per_epoch;
        s
    }

    /// Verifies this setup can be deployed.
    pub fn validate(&self) -> Result<(), Error> {
        if self.kepler.max_iterations == 0 {
            return Err(Error::InvalidConfig("null kepler iteration budget"));
        }
        if !(self.kepler.tolerance_rad > 0.0) {
            return Err(Error::InvalidConfig("kepler tolerance must be positive"));
        }
        if self.solver.max_iterations == 0 {
            return Err(Error::InvalidConfig("null solver iteration budget"));
        }
        if !(self.solver.singular_pivot >= 0.0) {
            return Err(Error::InvalidConfig("negative singular pivot threshold"));
        }
        if let Some(convergence_m) = self.solver.convergence_m {
            if !(convergence_m > 0.0) {
                return Err(Error::InvalidConfig("convergence criteria must be positive"));
            }
        }
        if let Some(max_gdop) = self.solver.max_gdop {
            if !(max_gdop > 0.0) {
                return Err(Error::InvalidConfig("GDOP limit must be positive"));
            }
        }
        if self.max_epochs == 0 {
            return Err(Error::InvalidConfig("null epoch capacity"));
        }
        if self.min_sv < MIN_SV {
            return Err(Error::InvalidConfig("at least 4 satellites are required"));
        }
        if self.max_sv_per_epoch < self.min_sv {
            return Err(Error::InvalidConfig(
                "satellite capacity lower than minimal satellite count",
            ));
        }
        Ok(())
    }
}
