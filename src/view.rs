//! Windowed views over a [`Matrix`].
//!
//! A [`MatrixView`] describes a rectangular window (origin + extent) into a
//! borrowed matrix. Views never own or copy data: any number of them may alias
//! the same matrix and overlap, and writes through one are visible through all.
//!
//! Each view keeps its own sum-of-squares cache for its window. A write made
//! through the view adjusts both the view's cache and the matrix's cache by the
//! same delta. Writes made through any other path advance the matrix
//! generation, and a view whose cache was stamped with an older generation
//! rescans its window on the next norm query.

use std::cell::Cell;
use std::fmt;

use crate::cache::SumOfSquares;
use crate::element::ElementMut;
use crate::matrix::{write_grid, Matrix};
use crate::{MatrixError, Result};

// ============================================================================
// Validation helpers
// ============================================================================

/// Check that a `rows x cols` window at `(start_row, start_col)` fits in a
/// `parent_rows x parent_cols` extent.
fn validate_window(
    start_row: usize,
    start_col: usize,
    rows: usize,
    cols: usize,
    parent_rows: usize,
    parent_cols: usize,
) -> Result<()> {
    let fits = |start: usize, len: usize, parent: usize| {
        start.checked_add(len).is_some_and(|end| end <= parent)
    };
    if !fits(start_row, rows, parent_rows) || !fits(start_col, cols, parent_cols) {
        return Err(MatrixError::WindowOutOfBounds {
            start_row,
            start_col,
            rows,
            cols,
            parent_rows,
            parent_cols,
        });
    }
    Ok(())
}

// ============================================================================
// MatrixView
// ============================================================================

/// A non-owning rectangular window into a [`Matrix`].
///
/// Cloning a view aliases the same matrix: the clone is a second window over
/// the same data, not a copy of it.
///
/// # Example
///
/// ```rust
/// use matview::{Matrix, MatrixView};
///
/// let m = Matrix::filled(4, 5, 1.0);
/// let mut v = MatrixView::new(&m, 1, 1, 2, 3).unwrap();
/// v.element_mut(0, 1).unwrap().set(100.0);
///
/// assert_eq!(m.get(1, 2).unwrap(), 100.0);
/// assert_eq!(v.frobenius_norm(), (5.0 + 100.0 * 100.0f64).sqrt());
/// ```
///
/// The borrow ties every view to its matrix, so a view cannot outlive it:
///
/// ```compile_fail
/// use matview::{Matrix, MatrixView};
///
/// let view;
/// {
///     let m = Matrix::zeros(2, 2);
///     view = MatrixView::new(&m, 0, 0, 1, 1).unwrap();
/// }
/// let _ = view.get(0, 0);
/// ```
#[derive(Clone)]
pub struct MatrixView<'a> {
    matrix: &'a Matrix,
    start_row: usize,
    start_col: usize,
    rows: usize,
    cols: usize,
    sum_sq: SumOfSquares,
    /// Matrix generation at which `sum_sq` was last known to be correct.
    synced_at: Cell<u64>,
}

impl fmt::Debug for MatrixView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatrixView")
            .field("start", &(self.start_row, self.start_col))
            .field("dims", &(self.rows, self.cols))
            .field("parent_dims", &self.matrix.dims())
            .field("sum_sq", &self.sum_sq.get())
            .field("synced_at", &self.synced_at.get())
            .finish()
    }
}

impl<'a> MatrixView<'a> {
    /// Create a `rows x cols` window starting at `(start_row, start_col)`.
    ///
    /// The view's cache starts invalid; the first norm query scans the window.
    ///
    /// # Errors
    /// Returns [`MatrixError::WindowOutOfBounds`] if
    /// `start_row + rows > matrix.rows()` or `start_col + cols > matrix.cols()`.
    pub fn new(
        matrix: &'a Matrix,
        start_row: usize,
        start_col: usize,
        rows: usize,
        cols: usize,
    ) -> Result<Self> {
        validate_window(
            start_row,
            start_col,
            rows,
            cols,
            matrix.rows(),
            matrix.cols(),
        )?;
        Ok(Self::new_unchecked(matrix, start_row, start_col, rows, cols))
    }

    /// Create a 1x1 window over the element at `(row, col)`.
    pub fn single(matrix: &'a Matrix, row: usize, col: usize) -> Result<Self> {
        Self::new(matrix, row, col, 1, 1)
    }

    /// Window covering the whole matrix.
    pub(crate) fn whole(matrix: &'a Matrix) -> Self {
        Self::new_unchecked(matrix, 0, 0, matrix.rows(), matrix.cols())
    }

    fn new_unchecked(
        matrix: &'a Matrix,
        start_row: usize,
        start_col: usize,
        rows: usize,
        cols: usize,
    ) -> Self {
        Self {
            matrix,
            start_row,
            start_col,
            rows,
            cols,
            sum_sq: SumOfSquares::invalid(),
            synced_at: Cell::new(matrix.generation()),
        }
    }

    /// Move the window out, leaving `self` as a zero-extent view at the origin.
    ///
    /// Any later element access on `self` reports [`MatrixError::IndexOutOfBounds`].
    pub fn take(&mut self) -> MatrixView<'a> {
        let empty = Self {
            matrix: self.matrix,
            start_row: 0,
            start_col: 0,
            rows: 0,
            cols: 0,
            sum_sq: SumOfSquares::known(0.0),
            synced_at: Cell::new(self.matrix.generation()),
        };
        std::mem::replace(self, empty)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns `(rows, cols)` of the window.
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn start_row(&self) -> usize {
        self.start_row
    }

    #[inline]
    pub fn start_col(&self) -> usize {
        self.start_col
    }

    /// Returns the number of elements in the window.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Returns the backing matrix.
    #[inline]
    pub fn matrix(&self) -> &'a Matrix {
        self.matrix
    }

    #[inline]
    fn check_index(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.rows || col >= self.cols {
            return Err(MatrixError::IndexOutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn value_at(&self, row: usize, col: usize) -> f64 {
        self.matrix
            .value_at(self.start_row + row, self.start_col + col)
    }
}

// ============================================================================
// Element access
// ============================================================================

impl<'a> MatrixView<'a> {
    /// Read the element at `(row, col)` in view coordinates.
    ///
    /// # Errors
    /// Returns [`MatrixError::IndexOutOfBounds`] if the coordinate is outside the window.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        self.check_index(row, col)?;
        Ok(self.value_at(row, col))
    }

    /// Mutable accessor for the element at `(row, col)` in view coordinates.
    ///
    /// # Errors
    /// Returns [`MatrixError::IndexOutOfBounds`] if the coordinate is outside the window.
    pub fn element_mut(&mut self, row: usize, col: usize) -> Result<ElementMut<'_, 'a>> {
        self.check_index(row, col)?;
        Ok(ElementMut::new(self, row, col))
    }

    /// Write `value` at `(row, col)`, updating the view and matrix caches.
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        self.check_index(row, col)?;
        self.write(row, col, value);
        Ok(())
    }

    /// Write `value` into every element of the window.
    pub fn fill(&mut self, value: f64) {
        for i in 0..self.rows {
            for j in 0..self.cols {
                self.write(i, j, value);
            }
        }
    }

    /// Tracked write at an already-validated view coordinate.
    ///
    /// The matrix cache always absorbs the delta. The view cache absorbs it only
    /// if it was in sync with the matrix before this write; otherwise it is left
    /// invalid for the next norm query to rebuild.
    pub(crate) fn write(&self, row: usize, col: usize, value: f64) {
        let in_sync = self.is_synced();
        let old = self
            .matrix
            .replace_tracked(self.start_row + row, self.start_col + col, value);
        if in_sync {
            self.sum_sq.apply_delta(old, value);
            self.synced_at.set(self.matrix.generation());
        } else {
            self.sum_sq.invalidate();
        }
    }

    /// Iterate over the window in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = f64> + 'a {
        let matrix = self.matrix;
        let (start_row, start_col, cols) = (self.start_row, self.start_col, self.cols);
        (0..self.rows).flat_map(move |i| {
            (0..cols).map(move |j| matrix.value_at(start_row + i, start_col + j))
        })
    }
}

// ============================================================================
// Norms
// ============================================================================

impl<'a> MatrixView<'a> {
    #[inline]
    fn is_synced(&self) -> bool {
        self.synced_at.get() == self.matrix.generation()
    }

    /// Sum of the squares of the elements in the window.
    ///
    /// O(1) if the cache is valid and no write bypassed this view since it was
    /// last refreshed; otherwise a scan of the window.
    pub fn sum_of_squares(&self) -> f64 {
        if !self.is_synced() {
            if self.sum_sq.is_valid() {
                tracing::trace!(
                    synced_at = self.synced_at.get(),
                    generation = self.matrix.generation(),
                    "backing matrix written elsewhere, dropping view cache"
                );
            }
            self.sum_sq.invalidate();
        }
        let value = self.sum_sq.get_or_compute(|| {
            tracing::trace!(
                rows = self.rows,
                cols = self.cols,
                "rescanning view sum of squares"
            );
            crate::norm::sum_of_squares(self.iter())
        });
        self.synced_at.set(self.matrix.generation());
        value
    }

    /// Frobenius norm of the window.
    pub fn frobenius_norm(&self) -> f64 {
        crate::norm::sqrt_clamped(self.sum_of_squares())
    }
}

// ============================================================================
// Conversions and sub-windows
// ============================================================================

impl<'a> MatrixView<'a> {
    /// Copy the window into a new owning [`Matrix`].
    ///
    /// If the view's cache is current, the new matrix inherits it and its first
    /// norm query is O(1).
    pub fn to_matrix(&self) -> Matrix {
        let m = Matrix::from_fn(self.rows, self.cols, |i, j| self.value_at(i, j));
        if self.is_synced() {
            if let Some(value) = self.sum_sq.get() {
                m.seed_sum_of_squares(value);
            }
        }
        m
    }

    /// The single element of a 1x1 view.
    ///
    /// # Errors
    /// Returns [`MatrixError::NotScalar`] unless the view is exactly 1x1.
    pub fn as_scalar(&self) -> Result<f64> {
        if self.rows != 1 || self.cols != 1 {
            return Err(MatrixError::NotScalar {
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(self.value_at(0, 0))
    }

    /// Narrow this view to a `rows x cols` window at `(start_row, start_col)`
    /// in this view's coordinates.
    ///
    /// The result borrows the same backing matrix, not this view.
    ///
    /// # Errors
    /// Returns [`MatrixError::WindowOutOfBounds`] if the window does not fit in this view.
    pub fn subview(
        &self,
        start_row: usize,
        start_col: usize,
        rows: usize,
        cols: usize,
    ) -> Result<MatrixView<'a>> {
        validate_window(start_row, start_col, rows, cols, self.rows, self.cols)?;
        Ok(Self::new_unchecked(
            self.matrix,
            self.start_row + start_row,
            self.start_col + start_col,
            rows,
            cols,
        ))
    }
}

/// Same text layout as [`Matrix`]'s `Display`, restricted to the window.
impl fmt::Display for MatrixView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_grid(f, self.rows, self.cols, |i, j| self.value_at(i, j))
    }
}

// ============================================================================
// Tests
// ============================================================================
