//! Bounded collection of tax rows.
//!
//! The collection always holds at least one row (index 1) and never more
//! than the configured maximum. Indices are stable: removing a row does not
//! renumber the rows after it, and new rows are allocated one past the
//! highest index in use.

use thiserror::Error;
use tracing::{debug, warn};

use crate::{RowIndex, TaxRow};

/// Errors returned by [`RowCollection`] mutations.
///
/// Both variants are recoverable and leave the collection unchanged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowCollectionError {
    /// The collection already holds the maximum number of rows.
    #[error("maximum of {0} tax rows reached")]
    MaxRowsExceeded(usize),

    /// No row exists with the given index.
    #[error("tax row {0} not found")]
    RowNotFound(RowIndex),
}

/// Ordered, bounded set of [`TaxRow`]s.
///
/// # Example
///
/// ```
/// use fare_core::{RowCollection, RowCollectionError, RowIndex};
///
/// let mut rows = RowCollection::new(2);
/// assert_eq!(rows.len(), 1);
///
/// let second = rows.add_row().unwrap();
/// assert_eq!(second.get(), 2);
/// assert_eq!(rows.add_row(), Err(RowCollectionError::MaxRowsExceeded(2)));
///
/// rows.reset();
/// assert_eq!(rows.len(), 1);
/// assert!(rows.get(RowIndex::FIRST).is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCollection {
    rows: Vec<TaxRow>,
    max_rows: usize,
}

impl RowCollection {
    /// Creates a collection holding a single empty row.
    ///
    /// A `max_rows` of zero is treated as one, since the first row always
    /// exists.
    pub fn new(max_rows: usize) -> Self {
        Self {
            rows: vec![TaxRow::new(RowIndex::FIRST)],
            max_rows: max_rows.max(1),
        }
    }

    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Never true; the first row always exists.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.rows.len() >= self.max_rows
    }

    /// Rows in ascending index order.
    pub fn rows(&self) -> &[TaxRow] {
        &self.rows
    }

    pub fn get(
        &self,
        index: RowIndex,
    ) -> Option<&TaxRow> {
        self.position(index).map(|pos| &self.rows[pos])
    }

    pub fn get_mut(
        &mut self,
        index: RowIndex,
    ) -> Option<&mut TaxRow> {
        let pos = self.position(index)?;
        Some(&mut self.rows[pos])
    }

    /// Appends an empty row and returns its index.
    ///
    /// # Errors
    ///
    /// Returns [`RowCollectionError::MaxRowsExceeded`] when the collection
    /// is full. Nothing is changed in that case.
    pub fn add_row(&mut self) -> Result<RowIndex, RowCollectionError> {
        if self.is_full() {
            warn!(max_rows = self.max_rows, "tax row limit reached; row not added");
            return Err(RowCollectionError::MaxRowsExceeded(self.max_rows));
        }

        let index = self
            .rows
            .last()
            .map(|row| row.index.next())
            .unwrap_or(RowIndex::FIRST);
        self.rows.push(TaxRow::new(index));
        debug!(%index, rows = self.rows.len(), "tax row added");

        Ok(index)
    }

    /// Removes the row with the given index.
    ///
    /// The first row is never deleted; removing it resets its values
    /// instead. Remaining rows keep their indices.
    ///
    /// # Errors
    ///
    /// Returns [`RowCollectionError::RowNotFound`] if no such row exists.
    pub fn remove_row(
        &mut self,
        index: RowIndex,
    ) -> Result<(), RowCollectionError> {
        let pos = self
            .position(index)
            .ok_or(RowCollectionError::RowNotFound(index))?;

        if index == RowIndex::FIRST {
            self.rows[pos].reset();
            debug!("first tax row reset instead of removed");
        } else {
            self.rows.remove(pos);
            debug!(%index, rows = self.rows.len(), "tax row removed");
        }

        Ok(())
    }

    /// Shrinks back to a single empty row with index 1.
    pub fn reset(&mut self) {
        self.rows.clear();
        self.rows.push(TaxRow::new(RowIndex::FIRST));
    }

    fn position(
        &self,
        index: RowIndex,
    ) -> Option<usize> {
        self.rows.binary_search_by_key(&index, |row| row.index).ok()
    }
}

impl Default for RowCollection {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_TAX_ROWS)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::FareSide;

    fn index(value: u32) -> RowIndex {
        RowIndex::new(value).unwrap()
    }

    fn indices(rows: &RowCollection) -> Vec<u32> {
        rows.rows().iter().map(|row| row.index.get()).collect()
    }

    // =========================================================================
    // add_row tests
    // =========================================================================

    #[test]
    fn new_collection_holds_one_default_row() {
        let rows = RowCollection::new(20);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows.rows(), &[TaxRow::new(RowIndex::FIRST)]);
    }

    #[test]
    fn add_row_allocates_sequential_indices() {
        let mut rows = RowCollection::new(20);

        assert_eq!(rows.add_row(), Ok(index(2)));
        assert_eq!(rows.add_row(), Ok(index(3)));
        assert_eq!(indices(&rows), vec![1, 2, 3]);
    }

    #[test]
    fn add_row_fills_to_max_then_fails_without_change() {
        let mut rows = RowCollection::new(20);

        for _ in 1..20 {
            rows.add_row().unwrap();
        }
        assert_eq!(rows.len(), 20);

        let before = rows.clone();
        let result = rows.add_row();

        assert_eq!(result, Err(RowCollectionError::MaxRowsExceeded(20)));
        assert_eq!(rows, before);
    }

    #[test]
    fn add_row_new_rows_start_at_zero() {
        let mut rows = RowCollection::new(5);

        let added = rows.add_row().unwrap();
        let row = rows.get(added).unwrap();

        assert_eq!(row.old_fare, dec!(0));
        assert_eq!(row.new_fare, dec!(0));
        assert!(row.tax_code.is_empty());
    }

    #[test]
    fn zero_max_rows_is_treated_as_one() {
        let mut rows = RowCollection::new(0);

        assert_eq!(rows.max_rows(), 1);
        assert_eq!(rows.add_row(), Err(RowCollectionError::MaxRowsExceeded(1)));
    }

    // =========================================================================
    // remove_row tests
    // =========================================================================

    #[test]
    fn remove_row_does_not_renumber() {
        let mut rows = RowCollection::new(5);
        rows.add_row().unwrap();
        rows.add_row().unwrap();

        rows.remove_row(index(2)).unwrap();

        assert_eq!(indices(&rows), vec![1, 3]);
    }

    #[test]
    fn remove_row_then_add_uses_next_after_highest() {
        let mut rows = RowCollection::new(5);
        rows.add_row().unwrap();
        rows.add_row().unwrap();
        rows.remove_row(index(2)).unwrap();

        assert_eq!(rows.add_row(), Ok(index(4)));
    }

    #[test]
    fn remove_trailing_row_frees_its_index() {
        let mut rows = RowCollection::new(5);
        rows.add_row().unwrap();
        rows.remove_row(index(2)).unwrap();

        assert_eq!(rows.add_row(), Ok(index(2)));
    }

    #[test]
    fn remove_missing_row_is_an_error_without_change() {
        let mut rows = RowCollection::new(5);
        let before = rows.clone();

        let result = rows.remove_row(index(7));

        assert_eq!(result, Err(RowCollectionError::RowNotFound(index(7))));
        assert_eq!(rows, before);
    }

    #[test]
    fn remove_first_row_resets_it() {
        let mut rows = RowCollection::new(5);
        rows.get_mut(RowIndex::FIRST)
            .unwrap()
            .set_fare(FareSide::New, dec!(12.00));

        rows.remove_row(RowIndex::FIRST).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows.rows(), &[TaxRow::new(RowIndex::FIRST)]);
    }

    // =========================================================================
    // reset tests
    // =========================================================================

    #[test]
    fn reset_returns_to_single_default_row() {
        let mut rows = RowCollection::new(5);
        rows.add_row().unwrap();
        rows.add_row().unwrap();
        rows.get_mut(RowIndex::FIRST).unwrap().set_tax_code("YQ");

        rows.reset();

        assert_eq!(rows.rows(), &[TaxRow::new(RowIndex::FIRST)]);
    }

    #[test]
    fn reset_allows_adding_again_after_full() {
        let mut rows = RowCollection::new(2);
        rows.add_row().unwrap();
        assert!(rows.is_full());

        rows.reset();

        assert_eq!(rows.add_row(), Ok(index(2)));
    }
}
