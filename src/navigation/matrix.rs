//! Normal equations and 4x4 Gauss-Jordan inversion
use nalgebra::{DVector, Matrix4, MatrixXx4, SMatrix, Vector4};

use crate::error::Error;

/// Inverts a 4x4 matrix by Gauss-Jordan elimination with partial pivoting.
/// Returns None when the largest pivot candidate of a column is not
/// strictly greater than `min_pivot` (in absolute value).
pub(crate) fn gauss_jordan_inverse(mat: &Matrix4<f64>, min_pivot: f64) -> Option<Matrix4<f64>> {
    let mut aug = SMatrix::<f64, 4, 8>::zeros();
    aug.fixed_view_mut::<4, 4>(0, 0).copy_from(mat);
    aug.fixed_view_mut::<4, 4>(0, 4).fill_with_identity();

    for col in 0..4 {
        let (mut pivot, mut max_abs) = (col, aug[(col, col)].abs());
        for row in col + 1..4 {
            let value = aug[(row, col)].abs();
            if value > max_abs {
                max_abs = value;
                pivot = row;
            }
        }

        if !(max_abs > min_pivot) {
            return None;
        }

        if pivot != col {
            aug.swap_rows(pivot, col);
        }

        let inv_pivot = 1.0 / aug[(col, col)];
        for c in 0..8 {
            aug[(col, c)] *= inv_pivot;
        }

        for row in 0..4 {
            if row == col {
                continue;
            }
            let factor = aug[(row, col)];
            if factor != 0.0 {
                for c in 0..8 {
                    aug[(row, c)] -= factor * aug[(col, c)];
                }
            }
        }
    }

    Some(aug.fixed_view::<4, 4>(0, 4).into_owned())
}

/// Least squares correction from the normal equations
/// (GᵗG)·Δx = Gᵗ·b
pub(crate) struct NormalEquations {
    /// Correction vector
    pub dx: Vector4<f64>,
    /// (GᵗG)⁻¹
    pub q: Matrix4<f64>,
}

impl NormalEquations {
    pub fn solve(g: &MatrixXx4<f64>, b: &DVector<f64>, min_pivot: f64) -> Result<Self, Error> {
        let g_t = g.transpose();
        let g_t_g: Matrix4<f64> = &g_t * g;
        let g_t_b: Vector4<f64> = &g_t * b;

        let q = gauss_jordan_inverse(&g_t_g, min_pivot).ok_or(Error::MatrixInversion)?;

        Ok(Self { dx: q * g_t_b, q })
    }
}
