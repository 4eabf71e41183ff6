//! GPST helpers for the ingestion boundary.
//!
//! Every instant handled by this crate is an [Epoch] expressed in [TimeScale::GPST].
//! Observation messages usually carry a millisecond time of week: convert them
//! here, once, so the numeric kernels never see mixed units.
use crate::prelude::{Epoch, TimeScale};

/// Builds a GPST [Epoch] from a GPS week counter and a time of week in milliseconds.
pub fn gpst_epoch(week: u32, tow_ms: u32) -> Epoch {
    Epoch::from_time_of_week(week, tow_ms as u64 * 1_000_000, TimeScale::GPST)
}

/// Builds a GPST [Epoch] from absolute GPST seconds.
pub fn gpst_epoch_from_seconds(seconds: f64) -> Epoch {
    Epoch::from_gpst_seconds(seconds)
}

/// Returns the absolute GPST seconds of this [Epoch].
pub fn gpst_seconds(t: Epoch) -> f64 {
    t.to_gpst_seconds()
}
