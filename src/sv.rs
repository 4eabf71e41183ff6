use crate::{
    constants::MAX_SATELLITES,
    error::Error,
    prelude::{Constellation, SV},
};

/// Builds the GPS [SV] for this PRN, which must lie within 1..=32.
pub fn gps_sv(prn: u8) -> Result<SV, Error> {
    if prn == 0 || prn as usize > MAX_SATELLITES {
        return Err(Error::SatelliteOutOfRange(prn));
    }
    Ok(SV::new(Constellation::GPS, prn))
}
