use log::{debug, trace};
use nalgebra::{DVector, Matrix4, MatrixXx4, Vector3, Vector4};

pub mod dop;
pub(crate) mod matrix;

pub use dop::DilutionOfPrecision;

use matrix::NormalEquations;

use crate::{
    candidate::Candidate,
    cfg::SolverOpts,
    error::Error,
    prelude::{Epoch, SV},
};

/// Outcome of one [Navigation] run.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NavigationSolution {
    /// Receiver ECEF position (m)
    pub position_m: Vector3<f64>,
    /// Receiver clock bias (range equivalent, m)
    pub clock_bias_m: f64,
    /// Number of completed iterations
    pub iterations: usize,
    /// Post-fit residual RMS (m)
    pub residual_rms_m: f64,
    /// (GᵗG)⁻¹ of the last iteration
    pub q: Matrix4<f64>,
    /// Satellites whose line of sight degenerated at least once
    pub degenerate: Vec<SV>,
}

/// Iterative Gauss-Newton least squares, resolving receiver
/// position and clock bias from one epoch of pseudo ranges.
/// The iteration starts from the Earth center with a null clock bias.
#[derive(Debug, Clone)]
pub(crate) struct Navigation<'a> {
    t: Epoch,
    opts: &'a SolverOpts,
    candidates: &'a [Candidate],
    g: MatrixXx4<f64>,
    b: DVector<f64>,
    position_m: Vector3<f64>,
    clock_bias_m: f64,
    iter: usize,
    q: Matrix4<f64>,
    degenerate: Vec<SV>,
}

impl<'a> Navigation<'a> {
    /// Create new [Navigation] solver
    /// ## Input
    /// - opts: [SolverOpts] preset
    /// - min_sv: minimal number of [Candidate]s
    /// - candidates: [Candidate]s sampled at the same [Epoch]
    /// ## Returns
    /// - [Navigation], [Error]
    pub fn new(opts: &'a SolverOpts, min_sv: usize, candidates: &'a [Candidate]) -> Result<Self, Error> {
        let size = candidates.len();
        if size < min_sv.max(4) {
            return Err(Error::NotEnoughCandidates(size));
        }

        Ok(Self {
            t: candidates[0].t,
            opts,
            candidates,
            g: MatrixXx4::<f64>::zeros(size),
            b: DVector::<f64>::zeros(size),
            position_m: Vector3::zeros(),
            clock_bias_m: 0.0,
            iter: 0,
            q: Matrix4::zeros(),
            degenerate: Vec::new(),
        })
    }

    /// Linearizes around the current state: fills the geometry
    /// matrix and the residual vector, returns the residual RMS.
    fn linearize(&mut self) -> f64 {
        for (i, cd) in self.candidates.iter().enumerate() {
            let los = cd.position_ecef_m - self.position_m;
            let mut range_m = los.norm();

            let unit = if range_m > 0.0 && range_m.is_finite() {
                los / range_m
            } else {
                debug!("{}({}) - degenerate line of sight", self.t, cd.sv);
                if !self.degenerate.contains(&cd.sv) {
                    self.degenerate.push(cd.sv);
                }
                range_m = 1.0;
                Vector3::zeros()
            };

            self.g[(i, 0)] = -unit[0];
            self.g[(i, 1)] = -unit[1];
            self.g[(i, 2)] = -unit[2];
            self.g[(i, 3)] = 1.0;
            self.b[i] = cd.pseudo_range_m - range_m - self.clock_bias_m;
        }

        (self.b.norm_squared() / self.b.len() as f64).sqrt()
    }

    /// Iterates once, updating the current state.
    /// Returns the norm of the position correction.
    fn iter(&mut self) -> Result<f64, Error> {
        let rms = self.linearize();

        let normal = NormalEquations::solve(&self.g, &self.b, self.opts.singular_pivot)?;
        let dx: Vector4<f64> = normal.dx;

        self.position_m += dx.xyz();
        self.clock_bias_m += dx[3];
        self.q = normal.q;
        self.iter += 1;

        if !self.position_m.iter().all(|x| x.is_finite()) || !self.clock_bias_m.is_finite() {
            return Err(Error::StateUpdate);
        }

        let correction_m = dx.xyz().norm();

        trace!(
            "{} - iter={} rms={:.3}m |dx|={:.3E}m",
            self.t,
            self.iter,
            rms,
            correction_m
        );

        Ok(correction_m)
    }

    /// Runs the iteration budget, or stops early when
    /// [SolverOpts::convergence_m] is reached.
    pub fn resolve(mut self) -> Result<NavigationSolution, Error> {
        for _ in 0..self.opts.max_iterations {
            let correction_m = self.iter()?;
            if let Some(convergence_m) = self.opts.convergence_m {
                if correction_m < convergence_m {
                    debug!("{} - converged after {} iterations", self.t, self.iter);
                    break;
                }
            }
        }

        let residual_rms_m = self.linearize();

        Ok(NavigationSolution {
            position_m: self.position_m,
            clock_bias_m: self.clock_bias_m,
            iterations: self.iter,
            residual_rms_m,
            q: self.q,
            degenerate: self.degenerate,
        })
    }
}
