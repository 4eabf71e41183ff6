//! Navigation solver configuration preset

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const fn default_max_iterations() -> usize {
    10
}

const fn default_singular_pivot() -> f64 {
    1.0E-18
}

const fn default_convergence_m() -> Option<f64> {
    None
}

const fn default_max_gdop() -> Option<f64> {
    None
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolverOpts {
    /// Gauss-Newton iteration budget. The solver always runs the
    /// complete budget unless [Self::convergence_m] is set.
    #[cfg_attr(feature = "serde", serde(default = "default_max_iterations"))]
    pub max_iterations: usize,
    /// Pivots smaller than this (absolute value) make the
    /// normal matrix singular.
    #[cfg_attr(feature = "serde", serde(default = "default_singular_pivot"))]
    pub singular_pivot: f64,
    /// Optional early exit: stop iterating once the position
    /// correction norm falls below this value (in meters).
    #[cfg_attr(feature = "serde", serde(default = "default_convergence_m"))]
    pub convergence_m: Option<f64>,
    /// Optional GDOP threshold, solutions above are rejected.
    #[cfg_attr(feature = "serde", serde(default = "default_max_gdop"))]
    pub max_gdop: Option<f64>,
}

impl Default for SolverOpts {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            singular_pivot: default_singular_pivot(),
            convergence_m: default_convergence_m(),
            max_gdop: default_max_gdop(),
        }
    }
}

impl SolverOpts {
    /// Stops iterating as soon as the correction is below 1 mm.
    pub fn with_early_exit(&self) -> Self {
        let mut s = self.clone();
        s.convergence_m = Some(1.0E-3);
        s
    }

    /// Rejects solutions whose GDOP exceeds `max_gdop`.
    pub fn with_max_gdop(&self, max_gdop: f64) -> Self {
        let mut s = self.clone();
        s.max_gdop = Some(max_gdop);
        s
    }
}
