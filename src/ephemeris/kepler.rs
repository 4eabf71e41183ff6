use std::f64::consts::{PI, TAU};

use log::debug;
use nalgebra::{Rotation3, Vector3};

use crate::{
    cfg::KeplerOpts,
    constants::{EARTH_GRAVITATION_MU_M3_S2, MAX_TRACK_SAMPLES},
    error::Error,
    prelude::{Ephemeris, Epoch, SV},
};

/// Kepler solver output, in the inertial frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct KeplerSolution {
    /// Mean anomaly, within (-π, π]
    pub mean_anomaly_rad: f64,
    /// Eccentric anomaly
    pub eccentric_anomaly_rad: f64,
    /// True anomaly
    pub true_anomaly_rad: f64,
    /// Orbital radius r = a(1 - e cos E), in meters
    pub radius_m: f64,
    /// Newton iterations spent
    pub iterations: usize,
    /// ECI position (in meters)
    pub position_eci_m: Vector3<f64>,
}

/// Wraps an angle into (-π, π].
pub(crate) fn wrap_pi(angle_rad: f64) -> f64 {
    let wrapped = (angle_rad + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Solves E - e sin(E) = M by Newton iteration from E0 = M.
/// Returns (E, iterations), or None when |ΔE| did not fall below
/// the tolerance within the iteration budget.
pub(crate) fn solve_kepler(m: f64, e: f64, opts: &KeplerOpts) -> Option<(f64, usize)> {
    let mut e_k = m;
    for iter in 1..=opts.max_iterations {
        let f = e_k - e * e_k.sin() - m;
        let f_prime = 1.0 - e * e_k.cos();
        let de = -f / f_prime;
        e_k += de;
        if de.abs() < opts.tolerance_rad {
            return Some((e_k, iter));
        }
    }
    None
}

impl Ephemeris {
    /// Verifies these elements describe a closed orbit.
    pub fn validate(&self, sv: SV) -> Result<(), Error> {
        let a = self.semi_major_axis_m;
        let e = self.eccentricity;
        let physical = a > 0.0
            && a.is_finite()
            && (0.0..1.0).contains(&e)
            && self.i0_rad.is_finite()
            && self.m0_rad.is_finite()
            && self.omega0_rad.is_finite()
            && self.omega_rad.is_finite();

        if physical {
            Ok(())
        } else {
            Err(Error::InvalidElements(sv))
        }
    }

    /// Mean motion n = sqrt(μ/a³), in rad/s
    pub fn mean_motion_rad_s(&self) -> f64 {
        (EARTH_GRAVITATION_MU_M3_S2 / self.semi_major_axis_m.powi(3)).sqrt()
    }

    /// Perifocal to inertial rotation: Rz(Ω)·Rx(i)·Rz(ω)
    pub fn perifocal_to_eci(&self) -> Rotation3<f64> {
        let rot_z_omega0 = Rotation3::from_axis_angle(&Vector3::z_axis(), self.omega0_rad);
        let rot_x_i = Rotation3::from_axis_angle(&Vector3::x_axis(), self.i0_rad);
        let rot_z_omega = Rotation3::from_axis_angle(&Vector3::z_axis(), self.omega_rad);
        rot_z_omega0 * rot_x_i * rot_z_omega
    }

    /// Resolves Kepler equations at t
    pub fn resolve_eci(&self, sv: SV, t: Epoch, opts: &KeplerOpts) -> Result<KeplerSolution, Error> {
        self.validate(sv)?;

        let e = self.eccentricity;
        let a = self.semi_major_axis_m;

        let dt = (t - self.toe).to_seconds();
        let m = wrap_pi(self.m0_rad + self.mean_motion_rad_s() * dt);

        let (e_k, iterations) = solve_kepler(m, e, opts).ok_or_else(|| {
            debug!("{}({}) - kepler solver in failure", t, sv);
            Error::KeplerNonConvergence(t, sv)
        })?;

        let (sin_e_k, cos_e_k) = e_k.sin_cos();
        let v_k = ((1.0 - e.powi(2)).sqrt() * sin_e_k).atan2(cos_e_k - e);

        let r_k = a * (1.0 - e * cos_e_k);
        if !(r_k > 0.0) || !r_k.is_finite() {
            debug!("{}({}) - degenerate radius r={}", t, sv, r_k);
            return Err(Error::DegenerateRadius(t, sv));
        }

        let (sin_v_k, cos_v_k) = v_k.sin_cos();
        let pqw = Vector3::new(r_k * cos_v_k, r_k * sin_v_k, 0.0);
        let position_eci_m = self.perifocal_to_eci() * pqw;

        debug!(
            "{}({}) - kepler solving dt={}s E={:.12} iter={} eci={:?}",
            t, sv, dt, e_k, iterations, position_eci_m
        );

        Ok(KeplerSolution {
            mean_anomaly_rad: m,
            eccentric_anomaly_rad: e_k,
            true_anomaly_rad: v_k,
            radius_m: r_k,
            iterations,
            position_eci_m,
        })
    }

    /// Samples the complete orbital ellipse by sweeping the true anomaly
    /// from 0 to 2π (both included) with given step.
    /// Returns ECI positions in meters.
    /// The step must be positive and sweep 2π in fewer than [MAX_TRACK_SAMPLES] steps.
    pub fn orbit_track(&self, sv: SV, step_rad: f64) -> Result<Vec<Vector3<f64>>, Error> {
        self.validate(sv)?;

        let samples = TAU / step_rad;
        if !(step_rad > 0.0) || !(samples < MAX_TRACK_SAMPLES as f64) {
            return Err(Error::InvalidTrackStep(step_rad));
        }

        let e = self.eccentricity;
        let p = self.semi_major_axis_m * (1.0 - e.powi(2));
        let rot = self.perifocal_to_eci();

        let mut track = Vec::with_capacity(samples as usize + 2);
        let mut k = 0;

        loop {
            let v = (k as f64 * step_rad).min(TAU);
            let r = p / (1.0 + e * v.cos());
            let (sin_v, cos_v) = v.sin_cos();
            track.push(rot * Vector3::new(r * cos_v, r * sin_v, 0.0));
            if v >= TAU {
                break;
            }
            k += 1;
        }

        Ok(track)
    }
}
