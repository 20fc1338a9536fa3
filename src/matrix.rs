//! Owned dense `f64` matrix with a cached sum of squares.
//!
//! [`Matrix`] stores its elements row-major in [`Cell`]s. This lets any number of
//! [`MatrixView`]s borrow the matrix immutably and still write through it, while
//! the borrow checker guarantees that the matrix outlives every view.
//!
//! Every element write goes through one tracked path, which keeps the
//! matrix's sum of squares current by delta and bumps a generation counter that
//! views use to detect writes they did not make themselves.

use std::cell::Cell;
use std::fmt;

use crate::cache::SumOfSquares;
use crate::view::MatrixView;
use crate::{MatrixError, Result};

/// Dense row-major matrix of `f64`.
///
/// Cloning performs a deep copy of the storage. The clone carries over the
/// source's cached sum of squares (valid or not) and starts with no views.
///
/// # Example
///
/// ```rust
/// use matview::Matrix;
///
/// let m = Matrix::filled(2, 3, 2.0);
/// assert_eq!(m.dims(), (2, 3));
/// m.set(1, 2, 5.0).unwrap();
/// assert_eq!(m.get(1, 2).unwrap(), 5.0);
/// assert_eq!(m.sum_of_squares(), 5.0 * 4.0 + 25.0);
/// ```
#[derive(Default)]
pub struct Matrix {
    data: Vec<Cell<f64>>,
    rows: usize,
    cols: usize,
    sum_sq: SumOfSquares,
    generation: Cell<u64>,
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("sum_sq", &self.sum_sq.get())
            .field("generation", &self.generation.get())
            .finish()
    }
}

impl Clone for Matrix {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            rows: self.rows,
            cols: self.cols,
            sum_sq: self.sum_sq.clone(),
            generation: Cell::new(0),
        }
    }
}

// ============================================================================
// Construction
// ============================================================================

impl Matrix {
    /// Create a `rows x cols` matrix of zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 0.0)
    }

    /// Create a `rows x cols` matrix with every element set to `value`.
    ///
    /// The sum of squares is known in closed form, so the first norm query is O(1).
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        let len = rows * cols;
        Self {
            data: vec![Cell::new(value); len],
            rows,
            cols,
            sum_sq: SumOfSquares::known(closed_form_sum(value, len)),
            generation: Cell::new(0),
        }
    }

    /// Create a matrix with values produced by `f(row, col)`, called in row-major order.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(Cell::new(f(i, j)));
            }
        }
        Self {
            data,
            rows,
            cols,
            sum_sq: SumOfSquares::invalid(),
            generation: Cell::new(0),
        }
    }

    /// Create a matrix from row-major data.
    ///
    /// # Errors
    /// Returns [`MatrixError::ShapeMismatch`] if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        let expected = rows * cols;
        if data.len() != expected {
            return Err(MatrixError::ShapeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data: data.into_iter().map(Cell::new).collect(),
            rows,
            cols,
            sum_sq: SumOfSquares::invalid(),
            generation: Cell::new(0),
        })
    }

    /// Move the contents out, leaving `self` as an empty 0x0 matrix.
    ///
    /// Any later access on `self` reports [`MatrixError::IndexOutOfBounds`].
    pub fn take(&mut self) -> Matrix {
        std::mem::take(self)
    }
}

// ============================================================================
// Element access
// ============================================================================

impl Matrix {
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns `(rows, cols)`.
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns the total number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    fn check_index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(MatrixError::IndexOutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }

    /// Read the element at `(row, col)`.
    ///
    /// # Errors
    /// Returns [`MatrixError::IndexOutOfBounds`] if `row >= rows` or `col >= cols`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        let idx = self.check_index(row, col)?;
        Ok(self.data[idx].get())
    }

    /// Overwrite the element at `(row, col)`.
    ///
    /// Takes `&self`: views borrowing this matrix stay usable. The cached sum of
    /// squares is updated in place; views covering the element will rescan on
    /// their next norm query.
    ///
    /// # Errors
    /// Returns [`MatrixError::IndexOutOfBounds`] if `row >= rows` or `col >= cols`.
    pub fn set(&self, row: usize, col: usize, value: f64) -> Result<()> {
        self.check_index(row, col)?;
        self.replace_tracked(row, col, value);
        Ok(())
    }

    /// Write `value` at an already-validated coordinate and return the old value.
    ///
    /// This is the single element-write path: it adjusts the sum of squares by
    /// `value² - old²` and advances the generation.
    pub(crate) fn replace_tracked(&self, row: usize, col: usize, value: f64) -> f64 {
        debug_assert!(row < self.rows && col < self.cols);
        let old = self.data[row * self.cols + col].replace(value);
        self.sum_sq.apply_delta(old, value);
        self.bump_generation();
        old
    }

    /// Unchecked read for callers that already validated the coordinate.
    #[inline]
    pub(crate) fn value_at(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col].get()
    }

    /// Seed the cache with a sum already known to be correct for this storage.
    pub(crate) fn seed_sum_of_squares(&self, value: f64) {
        self.sum_sq.store(value);
    }

    #[inline]
    pub(crate) fn generation(&self) -> u64 {
        self.generation.get()
    }

    #[inline]
    fn bump_generation(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
    }

    /// Iterate over all elements in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().map(Cell::get)
    }

    /// Returns a row-major copy of the elements.
    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().collect()
    }
}

// ============================================================================
// Bulk mutation
// ============================================================================

impl Matrix {
    /// Apply `f` to every element in place.
    ///
    /// Requires exclusive access, so no view can be alive. The per-element deltas
    /// are not tracked: the sum of squares is invalidated and recomputed on the
    /// next norm query.
    pub fn map_inplace(&mut self, mut f: impl FnMut(f64) -> f64) {
        for cell in self.data.iter_mut() {
            let value = cell.get_mut();
            *value = f(*value);
        }
        tracing::debug!(
            rows = self.rows,
            cols = self.cols,
            "bulk mutation invalidated matrix sum of squares"
        );
        self.sum_sq.invalidate();
        self.bump_generation();
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: f64) {
        for cell in self.data.iter_mut() {
            *cell.get_mut() = value;
        }
        self.sum_sq.store(closed_form_sum(value, self.data.len()));
        self.bump_generation();
    }
}

// ============================================================================
// Norms and views
// ============================================================================

impl Matrix {
    /// Sum of the squares of all elements.
    ///
    /// O(1) while the cache is valid; otherwise a full scan that revalidates it.
    pub fn sum_of_squares(&self) -> f64 {
        self.sum_sq.get_or_compute(|| {
            tracing::trace!(
                rows = self.rows,
                cols = self.cols,
                "rescanning matrix sum of squares"
            );
            crate::norm::sum_of_squares(self.iter())
        })
    }

    /// Frobenius norm: `sqrt` of [`sum_of_squares`](Self::sum_of_squares).
    pub fn frobenius_norm(&self) -> f64 {
        crate::norm::sqrt_clamped(self.sum_of_squares())
    }

    /// Borrow a window of `rows x cols` elements starting at `(start_row, start_col)`.
    ///
    /// # Errors
    /// Returns [`MatrixError::WindowOutOfBounds`] if the window does not fit.
    pub fn view(
        &self,
        start_row: usize,
        start_col: usize,
        rows: usize,
        cols: usize,
    ) -> Result<MatrixView<'_>> {
        MatrixView::new(self, start_row, start_col, rows, cols)
    }

    /// Borrow the single element at `(row, col)` as a 1x1 view.
    pub fn element(&self, row: usize, col: usize) -> Result<MatrixView<'_>> {
        MatrixView::single(self, row, col)
    }

    /// Borrow the whole matrix as a view.
    pub fn full_view(&self) -> MatrixView<'_> {
        MatrixView::whole(self)
    }
}

/// Writes each row as space-terminated values followed by a newline.
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_grid(f, self.rows, self.cols, |i, j| self.value_at(i, j))
    }
}

/// Shared text dump for matrices and views.
/// Sum of squares of `len` copies of `value`. An empty extent sums to zero even
/// for a non-finite `value`.
fn closed_form_sum(value: f64, len: usize) -> f64 {
    if len == 0 {
        0.0
    } else {
        value * value * len as f64
    }
}

pub(crate) fn write_grid(
    f: &mut fmt::Formatter<'_>,
    rows: usize,
    cols: usize,
    value: impl Fn(usize, usize) -> f64,
) -> fmt::Result {
    for i in 0..rows {
        for j in 0..cols {
            write!(f, "{} ", value(i, j))?;
        }
        writeln!(f)?;
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
