use std::collections::BTreeMap;

use log::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::MAX_EPOCHS,
    error::Error,
    prelude::{Epoch, SV},
    sv::gps_sv,
};

pub(crate) mod kepler;

pub use kepler::KeplerSolution;

/// Broadcast orbital element set
#[derive(Debug, Copy, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ephemeris {
    /// Time of Ephemeris, expressed in GPST
    pub toe: Epoch,

    /// Semi-major axis (in meters)
    pub semi_major_axis_m: f64,

    /// Eccentricity
    pub eccentricity: f64,

    /// Inclination (in radians)
    pub i0_rad: f64,

    /// Mean anomaly at ToE (in radians)
    pub m0_rad: f64,

    /// Right ascension of the ascending node (in radians)
    pub omega0_rad: f64,

    /// Argument of periapsis (in radians)
    pub omega_rad: f64,
}

/// Per satellite [Ephemeris] history, sorted by ToE.
#[derive(Debug, Clone)]
pub struct EphemerisStore {
    capacity: usize,
    dropped: usize,
    history: BTreeMap<SV, Vec<Ephemeris>>,
}

impl Default for EphemerisStore {
    fn default() -> Self {
        Self::with_capacity(MAX_EPOCHS)
    }
}

impl EphemerisStore {
    /// Creates a new store holding up to `capacity` sets per satellite.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            dropped: 0,
            history: Default::default(),
        }
    }

    /// Stores a new [Ephemeris] for GPS satellite `prn`.
    /// Sets are kept sorted by ToE; a set sharing the ToE of a
    /// previous set is stored after it.
    pub fn store(&mut self, prn: u8, ephemeris: Ephemeris) -> Result<(), Error> {
        let sv = gps_sv(prn)?;
        let history = self.history.entry(sv).or_default();

        if history.len() >= self.capacity {
            warn!("{}({}) - ephemeris history is full: dropped", ephemeris.toe, sv);
            self.dropped += 1;
            return Ok(());
        }

        let index = history.partition_point(|eph| eph.toe <= ephemeris.toe);
        history.insert(index, ephemeris);
        debug!("{}({}) - new ephemeris", ephemeris.toe, sv);
        Ok(())
    }

    /// Selects the [Ephemeris] with greatest ToE <= t.
    /// Among sets sharing that ToE, the latest stored wins.
    pub fn select(&self, sv: SV, t: Epoch) -> Result<&Ephemeris, Error> {
        let history = self
            .history
            .get(&sv)
            .ok_or(Error::MissingEphemeris(t, sv))?;

        let index = history.partition_point(|eph| eph.toe <= t);
        if index == 0 {
            return Err(Error::MissingEphemeris(t, sv));
        }
        Ok(&history[index - 1])
    }

    /// Complete history for this [SV], sorted by ToE.
    pub fn history(&self, sv: SV) -> &[Ephemeris] {
        self.history.get(&sv).map(|h| h.as_slice()).unwrap_or(&[])
    }

    /// Iterates over [SV]s for which we have at least one [Ephemeris].
    pub fn satellites(&self) -> impl Iterator<Item = SV> + '_ {
        self.history.keys().copied()
    }

    /// Number of sets that were dropped because a history was full.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Total number of stored sets.
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

    fn eph(toe_s: f64, m0_rad: f64) -> Ephemeris {
        Ephemeris {
            toe: gpst_epoch_from_seconds(toe_s),
            semi_major_axis_m: 26_560_000.0,
            eccentricity: 0.01,
            i0_rad: 0.95,
            m0_rad,
            omega0_rad: 1.0,
            omega_rad: 0.5,
        }
    }

    #[test]
    fn out_of_range_prn() {
        let mut store = EphemerisStore::default();
        assert_eq!(store.store(0, eph(0.0, 0.0)), Err(Error::SatelliteOutOfRange(0)));
        assert_eq!(store.store(33, eph(0.0, 0.0)), Err(Error::SatelliteOutOfRange(33)));
        assert!(store.store(1, eph(0.0, 0.0)).is_ok());
        assert!(store.store(32, eph(0.0, 0.0)).is_ok());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn closest_prior_selection() {
        let mut store = EphemerisStore::default();
        let g01 = gps_sv(1).unwrap();

        // stored out of order
        store.store(1, eph(7200.0, 0.2)).unwrap();
        store.store(1, eph(0.0, 0.1)).unwrap();
        store.store(1, eph(14400.0, 0.3)).unwrap();

        let toes = store
            .history(g01)
            .iter()
            .map(|eph| eph.toe)
            .collect::<Vec<_>>();
        assert_eq!(
            toes,
            vec![
                gpst_epoch_from_seconds(0.0),
                gpst_epoch_from_seconds(7200.0),
                gpst_epoch_from_seconds(14400.0),
            ]
        );

        for (t_s, m0) in [(0.0, 0.1), (7199.0, 0.1), (7200.0, 0.2), (10000.0, 0.2), (1.0E6, 0.3)] {
            let selected = store.select(g01, gpst_epoch_from_seconds(t_s)).unwrap();
            assert_eq!(selected.m0_rad, m0, "wrong selection @{}", t_s);
        }
    }

    #[test]
    fn missing_ephemeris() {
        let mut store = EphemerisStore::default();
        let g01 = gps_sv(1).unwrap();
        let g02 = gps_sv(2).unwrap();
        store.store(1, eph(7200.0, 0.2)).unwrap();

        let t = gpst_epoch_from_seconds(100.0);
        assert_eq!(store.select(g01, t), Err(Error::MissingEphemeris(t, g01)));
        assert_eq!(store.select(g02, t), Err(Error::MissingEphemeris(t, g02)));
    }

    #[test]
    fn latest_rebroadcast_wins() {
        let mut store = EphemerisStore::default();
        let g05 = gps_sv(5).unwrap();
        store.store(5, eph(0.0, 0.1)).unwrap();
        store.store(5, eph(0.0, 0.4)).unwrap();
        let selected = store.select(g05, gpst_epoch_from_seconds(10.0)).unwrap();
        assert_eq!(selected.m0_rad, 0.4);
    }

    #[test]
    fn capacity() {
        let mut store = EphemerisStore::with_capacity(2);
        for i in 0..5 {
            store.store(3, eph(i as f64 * 7200.0, 0.0)).unwrap();
        }
        assert_eq!(store.len(), 2);
        assert_eq!(store.dropped(), 3);
    }
}
