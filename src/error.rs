use thiserror::Error;

use crate::prelude::{Epoch, SV};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Only GPS PRN 1..=32 may be stored.
    #[error("satellite identifier {0} out of range (1..=32)")]
    SatelliteOutOfRange(u8),

    /// Orbital elements that cannot describe a closed orbit
    /// (a <= 0, e outside [0, 1), non finite angles).
    #[error("{0}: non physical orbital elements")]
    InvalidElements(SV),

    /// Kepler solver converged to a non positive or non finite radius.
    #[error("{0}({1}) - degenerate orbital radius")]
    DegenerateRadius(Epoch, SV),

    /// Newton iteration did not reach the configured tolerance
    /// within its iteration budget.
    #[error("{0}({1}) - kepler solver did not converge")]
    KeplerNonConvergence(Epoch, SV),

    /// No ephemeris was issued at or before the requested instant.
    #[error("{0}({1}) - no ephemeris prior to this epoch")]
    MissingEphemeris(Epoch, SV),

    /// Not enough candidates were proposed to resolve position and clock bias.
    #[error("not enough candidates: {0}")]
    NotEnoughCandidates(usize),

    /// Satellite geometry leads to a singular normal matrix.
    #[error("failed to invert matrix (singular geometry)")]
    MatrixInversion,

    /// Solution rejected by the GDOP criteria.
    #[error("rejected solution: GDOP limit exceeded ({0:.3})")]
    MaxGdopExceeded(f64),

    /// Iterated state is not finite anymore.
    #[error("converged to physically invalid state")]
    StateUpdate,

    /// Orbit track step is not positive, or too small to be sampled.
    #[error("invalid orbit track step: {0} rad")]
    InvalidTrackStep(f64),

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
