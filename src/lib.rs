//! Dense `f64` matrices with aliasing windowed views and cached Frobenius norms.
//!
//! # Core Types
//!
//! - [`Matrix`]: Owned row-major matrix with a cached sum of squares
//! - [`MatrixView`]: Non-owning rectangular window into a [`Matrix`]; views may
//!   alias and overlap each other
//! - [`ElementMut`]: Accessor returned by [`MatrixView::element_mut`] whose
//!   writes update every affected cache in one step
//! - [`FrobeniusNorm`] / [`frobenius_norm`]: Norm queries over matrices and views
//!
//! # Cache Coherence
//!
//! The matrix and each view keep their own sum of squares. After the first scan,
//! a norm query is O(1) until something invalidates it:
//!
//! - A write through a view adjusts that view's cache and the matrix's cache by
//!   `new² - old²`.
//! - [`Matrix::set`] adjusts the matrix cache the same way.
//! - Every element write advances the matrix's generation. A view whose cache was
//!   computed at an older generation rescans its window on the next query, so a
//!   write through one view never leaves another view's norm stale.
//! - Bulk mutation ([`Matrix::map_inplace`]) requires `&mut Matrix`, so no view
//!   can be alive; it invalidates the matrix cache.
//!
//! # Example
//!
//! ```rust
//! use matview::{Matrix, MatrixView};
//!
//! let m = Matrix::filled(4, 5, 1.0);
//! let mut a = MatrixView::new(&m, 0, 0, 2, 2).unwrap();
//! let b = MatrixView::new(&m, 1, 1, 2, 2).unwrap();
//!
//! // Overlapping views observe each other's writes.
//! a.set(1, 1, 3.0).unwrap();
//! assert_eq!(b.get(0, 0).unwrap(), 3.0);
//!
//! assert_eq!(a.sum_of_squares(), 3.0 + 9.0);
//! assert_eq!(b.sum_of_squares(), 3.0 + 9.0);
//! assert_eq!(m.sum_of_squares(), 19.0 + 9.0);
//!
//! // Explicit conversions.
//! let owned: Matrix = b.to_matrix();
//! assert_eq!(owned.dims(), (2, 2));
//! assert_eq!(m.element(1, 1).unwrap().as_scalar().unwrap(), 3.0);
//! ```
//!
//! # Threading
//!
//! Storage and caches live in [`std::cell::Cell`]s, so neither type is `Sync`.
//! Sharing a matrix across threads is rejected at compile time.

mod cache;
mod element;
mod matrix;
mod norm;
mod view;

// ============================================================================
// Public types
// ============================================================================
pub use element::ElementMut;
pub use matrix::Matrix;
pub use norm::{frobenius_norm, FrobeniusNorm};
pub use view::MatrixView;

// ============================================================================
// Error types
// ============================================================================

/// Errors that can occur during matrix and view operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum MatrixError {
    /// Element index outside the matrix or view extent.
    #[error("index ({row}, {col}) out of bounds for {rows}x{cols}")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// View window does not fit in its parent matrix or view.
    #[error(
        "window {rows}x{cols} at ({start_row}, {start_col}) exceeds {parent_rows}x{parent_cols}"
    )]
    WindowOutOfBounds {
        start_row: usize,
        start_col: usize,
        rows: usize,
        cols: usize,
        parent_rows: usize,
        parent_cols: usize,
    },

    /// Scalar conversion of a view that is not 1x1.
    #[error("view is {rows}x{cols}, expected 1x1")]
    NotScalar { rows: usize, cols: usize },

    /// Element count does not match the requested dimensions.
    #[error("shape mismatch: expected {expected} elements, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
}

/// Result type for matrix and view operations.
pub type Result<T> = std::result::Result<T, MatrixError>;
