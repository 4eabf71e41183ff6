use nalgebra::{Matrix3, Matrix4};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Dilution of precision, from the (GᵗG)⁻¹ matrix
/// of the last solver iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DilutionOfPrecision {
    /// Geometric DOP
    pub gdop: f64,
    /// Position DOP
    pub pdop: f64,
    /// Horizontal DOP
    pub hdop: f64,
    /// Vertical DOP
    pub vdop: f64,
    /// Temporal DOP
    pub tdop: f64,
}

impl DilutionOfPrecision {
    /// Projects the position block of `q` onto the local (East, North, Up) frame.
    pub(crate) fn q_enu(q: &Matrix4<f64>, lat_rad: f64, lon_rad: f64) -> Matrix3<f64> {
        let (sin_lat, cos_lat) = lat_rad.sin_cos();
        let (sin_lon, cos_lon) = lon_rad.sin_cos();

        // rows: east, north, up unit vectors in ECEF
        let r = Matrix3::<f64>::new(
            -sin_lon,
            cos_lon,
            0.0_f64,
            -sin_lat * cos_lon,
            -sin_lat * sin_lon,
            cos_lat,
            cos_lat * cos_lon,
            cos_lat * sin_lon,
            sin_lat,
        );

        let q_3: Matrix3<f64> = q.fixed_view::<3, 3>(0, 0).into_owned();

        r * q_3 * r.transpose()
    }

    /// Creates new [DilutionOfPrecision].
    ///
    /// ## Input
    /// - q: (GᵗG)⁻¹ matrix
    /// - lat_rad, lon_rad: geodetic coordinates of the receiver
    pub fn new(q: &Matrix4<f64>, lat_rad: f64, lon_rad: f64) -> Self {
        let q_enu = Self::q_enu(q, lat_rad, lon_rad);
        Self {
            gdop: q.trace().sqrt(),
            pdop: (q[(0, 0)] + q[(1, 1)] + q[(2, 2)]).sqrt(),
            tdop: q[(3, 3)].sqrt(),
            vdop: q_enu[(2, 2)].sqrt(),
            hdop: (q_enu[(0, 0)] + q_enu[(1, 1)]).sqrt(),
        }
    }
}
