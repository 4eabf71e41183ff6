//! Epoch alignment across satellites
use itertools::Itertools;
use log::{debug, warn};

use crate::{
    candidate::Candidate,
    observation::ObservationStore,
    orbit::SatelliteTracks,
    prelude::Epoch,
};

/// Sorted and deduplicated set of every observation [Epoch].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpochSet {
    epochs: Vec<Epoch>,
    truncated: usize,
}

impl EpochSet {
    /// Collects every observation [Epoch] of every satellite.
    /// Only the first `max_epochs` distinct epochs are kept.
    pub fn new(observations: &ObservationStore, max_epochs: usize) -> Self {
        let mut epochs = observations
            .iter()
            .map(|obs| obs.epoch)
            .sorted()
            .dedup()
            .collect::<Vec<_>>();

        let truncated = epochs.len().saturating_sub(max_epochs);
        if truncated > 0 {
            warn!("epoch capacity exceeded: dropped {} epochs", truncated);
            epochs.truncate(max_epochs);
        }

        Self { epochs, truncated }
    }

    /// Number of distinct epochs that were dropped past the capacity.
    pub fn truncated(&self) -> usize {
        self.truncated
    }

    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    /// Iterates in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = Epoch> + '_ {
        self.epochs.iter().copied()
    }

    pub fn as_slice(&self) -> &[Epoch] {
        &self.epochs
    }
}

/// Satellites gathered at one [Epoch].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alignment {
    /// [Candidate]s in PRN order
    pub candidates: Vec<Candidate>,
    /// Contributing satellites left out past the capacity
    pub truncated: usize,
}

/// Gathers, for each satellite, the first observation sampled at `t`.
/// A satellite contributes when that observation is usable and its state
/// was resolved for that exact [Epoch]. Up to `max_sv` satellites are gathered.
pub fn align(
    t: Epoch,
    observations: &ObservationStore,
    tracks: &SatelliteTracks,
    max_sv: usize,
) -> Alignment {
    let mut alignment = Alignment::default();

    for sv in observations.satellites() {
        let obs = match observations.history(sv).iter().find(|obs| obs.epoch == t) {
            Some(obs) => obs,
            None => continue,
        };

        if !obs.is_usable() {
            debug!("{}({}) - unusable pseudo range {}", t, sv, obs.pseudo_range_m);
            continue;
        }

        let state = match tracks.state(sv, t) {
            Some(state) => state,
            None => {
                debug!("{}({}) - unresolved state", t, sv);
                continue;
            },
        };

        if alignment.candidates.len() < max_sv {
            alignment.candidates.push(Candidate::new(
                sv,
                t,
                state.position_ecef_m,
                obs.pseudo_range_m,
            ));
        } else {
            alignment.truncated += 1;
        }
    }

    if alignment.truncated > 0 {
        warn!("{} - satellite capacity exceeded: dropped {}", t, alignment.truncated);
    }

    alignment
}
