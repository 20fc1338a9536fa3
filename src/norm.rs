//! Frobenius norm over matrices and views.
//!
//! Both [`Matrix`] and [`MatrixView`] cache their sum of squares; the
//! [`FrobeniusNorm`] trait lets callers take either one.

use crate::matrix::Matrix;
use crate::view::MatrixView;

/// Types with a (cached) sum of squares over their elements.
pub trait FrobeniusNorm {
    /// Sum of the squares of all elements.
    fn sum_of_squares(&self) -> f64;

    /// `sqrt(sum_of_squares())`.
    fn frobenius_norm(&self) -> f64 {
        sqrt_clamped(self.sum_of_squares())
    }
}

impl FrobeniusNorm for Matrix {
    fn sum_of_squares(&self) -> f64 {
        Matrix::sum_of_squares(self)
    }
}

impl FrobeniusNorm for MatrixView<'_> {
    fn sum_of_squares(&self) -> f64 {
        MatrixView::sum_of_squares(self)
    }
}

impl<N: FrobeniusNorm + ?Sized> FrobeniusNorm for &N {
    fn sum_of_squares(&self) -> f64 {
        (**self).sum_of_squares()
    }
}

/// Frobenius norm of a matrix or a view.
///
/// # Example
///
/// ```rust
/// use matview::{frobenius_norm, Matrix};
///
/// let m = Matrix::filled(2, 2, 3.0);
/// let v = m.view(0, 0, 1, 2).unwrap();
/// assert_eq!(frobenius_norm(&m), 6.0);
/// assert_eq!(frobenius_norm(&v), 18.0f64.sqrt());
/// ```
pub fn frobenius_norm<N: FrobeniusNorm + ?Sized>(value: &N) -> f64 {
    value.frobenius_norm()
}

/// Full scan: sum of `x * x` over `values`.
pub(crate) fn sum_of_squares(values: impl Iterator<Item = f64>) -> f64 {
    values.map(|x| x * x).sum()
}

/// Incremental delta updates can leave a tiny negative residue where the true
/// sum is zero. NaN passes through unchanged.
#[inline]
pub(crate) fn sqrt_clamped(sum: f64) -> f64 {
    if sum < 0.0 {
        0.0
    } else {
        sum.sqrt()
    }
}
