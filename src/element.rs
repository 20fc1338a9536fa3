//! Mutable element accessor for [`MatrixView`].

use crate::view::MatrixView;

/// A handle to one element of a view, returned by [`MatrixView::element_mut`].
///
/// Reading through the handle has no side effects. Writing through it is the
/// tracked write path: the old value is read, the new value stored, and the
/// difference of squares applied to both the view's and the backing matrix's
/// caches in the same step.
///
/// The handle borrows the view mutably, so the view cannot be used through any
/// other path while the handle exists.
#[derive(Debug)]
pub struct ElementMut<'v, 'a> {
    view: &'v mut MatrixView<'a>,
    row: usize,
    col: usize,
}

impl<'v, 'a> ElementMut<'v, 'a> {
    /// The coordinate must already be validated against the view extent.
    pub(crate) fn new(view: &'v mut MatrixView<'a>, row: usize, col: usize) -> Self {
        Self { view, row, col }
    }

    /// Row in view coordinates.
    #[inline]
    pub fn row(&self) -> usize {
        self.row
    }

    /// Column in view coordinates.
    #[inline]
    pub fn col(&self) -> usize {
        self.col
    }

    /// Current value of the element.
    #[inline]
    pub fn get(&self) -> f64 {
        self.view.value_at(self.row, self.col)
    }

    /// Store `value`, updating the view and matrix sums of squares.
    pub fn set(&mut self, value: f64) {
        self.view.write(self.row, self.col, value);
    }
}
