use nalgebra::Vector3;

use crate::prelude::{Epoch, SV};

/// Satellite contributing to one navigation epoch:
/// its Earth fixed position and the pseudo range measured at that instant.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Candidate {
    /// [SV]
    pub sv: SV,
    /// Sampling [Epoch]
    pub t: Epoch,
    /// ECEF position (in meters)
    pub position_ecef_m: Vector3<f64>,
    /// Pseudo range (in meters)
    pub pseudo_range_m: f64,
}

impl Candidate {
    pub fn new(sv: SV, t: Epoch, position_ecef_m: Vector3<f64>, pseudo_range_m: f64) -> Self {
        Self {
            sv,
            t,
            position_ecef_m,
            pseudo_range_m,
        }
    }
}
