//! Batch positioning pipeline
use itertools::{Itertools, MinMaxResult};
use log::{debug, error, info, warn};

use crate::{
    cfg::Config,
    ephemeris::{Ephemeris, EphemerisStore},
    epochs::{align, EpochSet},
    error::Error,
    geodetic::ecef_to_geodetic,
    navigation::{DilutionOfPrecision, Navigation},
    observation::ObservationStore,
    orbit::{SatelliteState, SatelliteTracks},
    prelude::{Epoch, SV},
    solutions::ReceiverEstimate,
};

/// Outcome of one [Solver] run.
#[derive(Debug, Clone, Default)]
pub struct Report {
    estimates: Vec<ReceiverEstimate>,
    tracks: SatelliteTracks,
    failures: Vec<(Epoch, Error)>,
    /// Number of distinct epochs
    pub epochs: usize,
    /// Distinct epochs dropped past [Config::max_epochs]
    pub truncated_epochs: usize,
    /// Contributing satellites dropped past [Config::max_sv_per_epoch],
    /// accumulated over all epochs
    pub truncated_sv: usize,
    /// Satellite states that could not be resolved
    pub excluded_states: usize,
}

impl Report {
    /// [ReceiverEstimate]s in chronological order.
    pub fn estimates(&self) -> impl Iterator<Item = &ReceiverEstimate> + '_ {
        self.estimates.iter()
    }

    /// Resolved [SatelliteState]s of each [SV], in PRN order.
    pub fn sv_tracks(&self) -> impl Iterator<Item = (SV, &[SatelliteState])> + '_ {
        self.tracks.iter()
    }

    /// Unresolved epochs and their cause, in chronological order.
    pub fn failures(&self) -> &[(Epoch, Error)] {
        &self.failures
    }
}

/// Rejects GDOP above the limit, or not a number.
fn check_gdop(gdop: f64, max_gdop: Option<f64>) -> Result<(), Error> {
    match max_gdop {
        Some(max_gdop) if !(gdop <= max_gdop) => Err(Error::MaxGdopExceeded(gdop)),
        _ => Ok(()),
    }
}

/// [Solver] resolves one [ReceiverEstimate] per observed [Epoch],
/// from the orbital elements and pseudo ranges stored so far.
#[derive(Debug, Clone)]
pub struct Solver {
    /// Solver parametrization
    pub cfg: Config,
    ephemerides: EphemerisStore,
    observations: ObservationStore,
}

impl Solver {
    /// Creates a new [Solver], ready to accept data.
    /// Fails on invalid [Config].
    pub fn new(cfg: Config) -> Result<Self, Error> {
        cfg.validate()?;
        Ok(Self {
            ephemerides: EphemerisStore::with_capacity(cfg.max_epochs),
            observations: ObservationStore::with_capacity(cfg.max_epochs),
            cfg,
        })
    }

    /// Stores a new set of orbital elements for this GPS PRN.
    pub fn store_ephemeris(&mut self, prn: u8, ephemeris: Ephemeris) -> Result<(), Error> {
        self.ephemerides.store(prn, ephemeris)
    }

    /// Stores a new pseudo range observation for this GPS PRN.
    pub fn store_observation(&mut self, prn: u8, epoch: Epoch, pseudo_range_m: f64) -> Result<(), Error> {
        self.observations.store(prn, epoch, pseudo_range_m)
    }

    /// Stored [EphemerisStore]
    pub fn ephemerides(&self) -> &EphemerisStore {
        &self.ephemerides
    }

    /// Stored [ObservationStore]
    pub fn observations(&self) -> &ObservationStore {
        &self.observations
    }

    /// Resolves the state of each satellite at each
    /// of its usable observation epochs.
    fn resolve_states(&self, report: &mut Report) {
        for sv in self.observations.satellites() {
            let epochs = self
                .observations
                .history(sv)
                .iter()
                .filter(|obs| obs.is_usable())
                .map(|obs| obs.epoch)
                .sorted()
                .dedup();

            for t in epochs {
                let state = self
                    .ephemerides
                    .select(sv, t)
                    .and_then(|eph| SatelliteState::resolve(&self.cfg, sv, eph, t));

                match state {
                    Ok(state) => report.tracks.insert(state),
                    Err(e) => {
                        warn!("{}({}) - excluded: {}", t, sv, e);
                        report.excluded_states += 1;
                    },
                }
            }
        }
    }

    fn sv_summary(&self, report: &Report) {
        for sv in self.observations.satellites() {
            let history = self.observations.history(sv);
            let resolved = report.tracks.track(sv).len();
            match history.iter().map(|obs| obs.epoch).minmax() {
                MinMaxResult::MinMax(first, last) => debug!(
                    "{} - {} observations from {} to {}, {} resolved states",
                    sv,
                    history.len(),
                    first,
                    last,
                    resolved
                ),
                MinMaxResult::OneElement(t) => debug!(
                    "{} - single observation at {}, {} resolved states",
                    sv, t, resolved
                ),
                MinMaxResult::NoElements => {},
            }
        }
    }

    /// Resolves the [ReceiverEstimate] at this [Epoch].
    fn resolve(&self, t: Epoch, report: &mut Report) -> Result<ReceiverEstimate, Error> {
        let alignment = align(
            t,
            &self.observations,
            &report.tracks,
            self.cfg.max_sv_per_epoch,
        );

        report.truncated_sv += alignment.truncated;

        let candidates = alignment.candidates;
        let solution = Navigation::new(&self.cfg.solver, self.cfg.min_sv, &candidates)?.resolve()?;

        let (lat_deg, long_deg, alt_m) = ecef_to_geodetic(&solution.position_m);
        let dop = DilutionOfPrecision::new(&solution.q, lat_deg.to_radians(), long_deg.to_radians());
        check_gdop(dop.gdop, self.cfg.solver.max_gdop)?;

        for sv in solution.degenerate.iter() {
            warn!("{}({}) - degenerate line of sight", t, sv);
        }

        Ok(ReceiverEstimate {
            epoch: t,
            position_ecef_m: solution.position_m,
            clock_bias_m: solution.clock_bias_m,
            lat_long_alt_deg_deg_m: (lat_deg, long_deg, alt_m),
            iterations: solution.iterations,
            residual_rms_m: solution.residual_rms_m,
            dop,
            sv: candidates.iter().map(|cd| cd.sv).collect(),
            degenerate: solution.degenerate,
        })
    }

    /// Runs the complete pipeline over the stored data.
    /// Satellite and epoch failures never abort the run:
    /// they are accounted for in the returned [Report].
    pub fn run(&self) -> Report {
        let mut report = Report::default();

        self.resolve_states(&mut report);
        self.sv_summary(&report);

        let epochs = EpochSet::new(&self.observations, self.cfg.max_epochs);
        report.epochs = epochs.len();
        report.truncated_epochs = epochs.truncated();

        info!(
            "{} epochs to process ({} satellites)",
            epochs.len(),
            self.observations.satellites().count()
        );

        for t in epochs.iter() {
            match self.resolve(t, &mut report) {
                Ok(estimate) => {
                    let (lat, long, alt) = estimate.lat_long_alt_deg_deg_m;
                    debug!(
                        "{} - lat={:.6}° long={:.6}° alt={:.3}m dt={:.3}m gdop={:.2}",
                        t, lat, long, alt, estimate.clock_bias_m, estimate.dop.gdop
                    );
                    report.estimates.push(estimate);
                },
                Err(e) => {
                    error!("{} - unresolved epoch: {}", t, e);
                    report.failures.push((t, e));
                },
            }
        }

        report
    }
}
