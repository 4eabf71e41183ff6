use std::collections::BTreeMap;

use log::warn;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::MAX_EPOCHS,
    error::Error,
    prelude::{Epoch, SV},
    sv::gps_sv,
};

/// Pseudo range measurement
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Observation {
    /// [SV] that was tracked
    pub sv: SV,
    /// Measurement [Epoch], expressed in GPST
    pub epoch: Epoch,
    /// Pseudo range (in meters)
    pub pseudo_range_m: f64,
}

impl Observation {
    /// Only strictly positive and finite ranges contribute to a solution.
    pub fn is_usable(&self) -> bool {
        self.pseudo_range_m.is_finite() && self.pseudo_range_m > 0.0
    }
}

/// Per satellite [Observation] history, in order of arrival.
#[derive(Debug, Clone)]
pub struct ObservationStore {
    capacity: usize,
    dropped: usize,
    history: BTreeMap<SV, Vec<Observation>>,
}

impl Default for ObservationStore {
    fn default() -> Self {
        Self::with_capacity(MAX_EPOCHS)
    }
}

impl ObservationStore {
    /// Creates a new store holding up to `capacity` observations per satellite.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            dropped: 0,
            history: Default::default(),
        }
    }

    /// Appends a new pseudo range for GPS satellite `prn`.
    pub fn store(&mut self, prn: u8, epoch: Epoch, pseudo_range_m: f64) -> Result<(), Error> {
        let sv = gps_sv(prn)?;
        let history = self.history.entry(sv).or_default();

        if history.len() >= self.capacity {
            warn!("{}({}) - observation history is full: dropped", epoch, sv);
            self.dropped += 1;
            return Ok(());
        }

        history.push(Observation {
            sv,
            epoch,
            pseudo_range_m,
        });
        Ok(())
    }

    /// Complete history for this [SV], in order of arrival.
    pub fn history(&self, sv: SV) -> &[Observation] {
        self.history.get(&sv).map(|h| h.as_slice()).unwrap_or(&[])
    }

    /// Iterates over all observations, in PRN order then in order of arrival.
    pub fn iter(&self) -> impl Iterator<Item = &Observation> + '_ {
        self.history.values().flat_map(|h| h.iter())
    }

    /// Iterates over observed [SV]s, in PRN order.
    pub fn satellites(&self) -> impl Iterator<Item = SV> + '_ {
        self.history.keys().copied()
    }

    /// Number of observations that were dropped because a history was full.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Total number of stored observations.
    pub fn len(&self) -> usize {
        self.history.values().map(|h| h.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::time::gpst_epoch_from_seconds;

    #[test]
    fn store_and_iterate() {
        let mut store = ObservationStore::default();
        let t0 = gpst_epoch_from_seconds(100_010.0);
        let t1 = gpst_epoch_from_seconds(100_020.0);

        assert_eq!(store.store(0, t0, 2.0E7), Err(Error::SatelliteOutOfRange(0)));
        assert_eq!(store.store(33, t0, 2.0E7), Err(Error::SatelliteOutOfRange(33)));

        store.store(12, t1, 2.1E7).unwrap();
        store.store(3, t0, 2.0E7).unwrap();
        store.store(12, t0, 2.2E7).unwrap();
        assert_eq!(store.len(), 3);

        let order = store
            .iter()
            .map(|obs| (obs.sv.prn, obs.epoch))
            .collect::<Vec<_>>();
        assert_eq!(order, vec![(3, t0), (12, t1), (12, t0)]);

        let prns = store.satellites().map(|sv| sv.prn).collect::<Vec<_>>();
        assert_eq!(prns, vec![3, 12]);
    }

    #[test]
    fn usable_pseudo_range() {
        let mut store = ObservationStore::default();
        let t = gpst_epoch_from_seconds(1.0);
        store.store(1, t, 2.0E7).unwrap();
        store.store(2, t, 0.0).unwrap();
        store.store(3, t, f64::NAN).unwrap();
        store.store(4, t, -5.0).unwrap();

        let usable = store.iter().filter(|obs| obs.is_usable()).count();
        assert_eq!(usable, 1);
    }

    #[test]
    fn capacity() {
        let mut store = ObservationStore::with_capacity(3);
        for i in 0..10 {
            store
                .store(9, gpst_epoch_from_seconds(i as f64), 2.0E7)
                .unwrap();
        }
        assert_eq!(store.len(), 3);
        assert_eq!(store.dropped(), 7);
    }
}
