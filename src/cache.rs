//! Lazily-computed sum-of-squares cache shared by [`Matrix`](crate::Matrix)
//! and [`MatrixView`](crate::MatrixView).
//!
//! The cache is a value plus a validity flag held in [`Cell`]s so that it can be
//! refreshed through a shared reference. A valid cache can be kept current by
//! applying per-element deltas (`new² - old²`) instead of rescanning.

use std::cell::Cell;

#[derive(Debug, Clone, Default)]
pub(crate) struct SumOfSquares {
    value: Cell<f64>,
    valid: Cell<bool>,
}

impl SumOfSquares {
    /// A cache that already holds the correct sum.
    pub(crate) fn known(value: f64) -> Self {
        Self {
            value: Cell::new(value),
            valid: Cell::new(true),
        }
    }

    /// A cache that must be computed before first use.
    pub(crate) fn invalid() -> Self {
        Self {
            value: Cell::new(0.0),
            valid: Cell::new(false),
        }
    }

    #[inline]
    pub(crate) fn get(&self) -> Option<f64> {
        if self.valid.get() {
            Some(self.value.get())
        } else {
            None
        }
    }

    #[inline]
    pub(crate) fn is_valid(&self) -> bool {
        self.valid.get()
    }

    #[inline]
    pub(crate) fn store(&self, value: f64) {
        self.value.set(value);
        self.valid.set(true);
    }

    #[inline]
    pub(crate) fn invalidate(&self) {
        self.valid.set(false);
    }

    /// Account for one element changing from `old` to `new`.
    ///
    /// An invalid cache stays invalid; there is nothing to adjust. If either
    /// square or the adjusted sum is not finite, the cache is invalidated
    /// instead, since `inf - inf` cannot be undone by a later delta. The next
    /// query then rescans.
    ///
    /// Finite updates are not checked for cancellation: after a large value is
    /// overwritten by a small one, the contributions of small elements may be
    /// lost to rounding until something else forces a rescan.
    #[inline]
    pub(crate) fn apply_delta(&self, old: f64, new: f64) {
        if !self.valid.get() {
            return;
        }
        let (old_sq, new_sq) = (old * old, new * new);
        let updated = self.value.get() + (new_sq - old_sq);
        if old_sq.is_finite() && new_sq.is_finite() && updated.is_finite() {
            self.value.set(updated);
        } else {
            self.invalidate();
        }
    }

    /// Return the cached sum, computing and storing it with `scan` if needed.
    pub(crate) fn get_or_compute(&self, scan: impl FnOnce() -> f64) -> f64 {
        match self.get() {
            Some(value) => value,
            None => {
                let value = scan();
                self.store(value);
                value
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
