//! Caller-owned form state.
//!
//! [`FareForm`] holds everything the fare change form shows: base fares,
//! surcharge fields, the flexibility selection, the tax rows and the most
//! recent calculation. Inbound values arrive as raw field text and are
//! coerced to amounts as they are stored.

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::calculations::common::coerce_amount;
use crate::calculations::{CalculationInputs, FareCalculator};
use crate::{
    CalculationResult, FareConfig, FareSide, Flexibility, RowCollection, RowCollectionError,
    RowIndex,
};

/// Single-value fields on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FareField {
    BaseOldFare,
    BaseNewFare,
    AirlinePenalty,
    ServiceFee,
}

/// State of one fare change form.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use fare_core::{FareConfig, FareField, FareForm, FareSide, Flexibility, RowIndex};
///
/// let mut form = FareForm::new(&FareConfig::default());
/// form.set_field(FareField::BaseOldFare, "100");
/// form.set_field(FareField::BaseNewFare, "80");
/// form.set_tax_fare(RowIndex::FIRST, FareSide::Old, "10").unwrap();
/// form.set_tax_fare(RowIndex::FIRST, FareSide::New, "15").unwrap();
/// form.set_flexibility(Flexibility::NotFlexible);
/// form.set_field(FareField::AirlinePenalty, "5");
/// form.set_field(FareField::ServiceFee, "2");
///
/// let result = form.recompute();
/// assert_eq!(result.total_fare_diff, dec!(-8));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FareForm {
    base_old_fare: Decimal,
    base_new_fare: Decimal,
    airline_penalty: Decimal,
    service_fee: Decimal,
    flexibility: Flexibility,
    rows: RowCollection,
    max_rows_warning: bool,
    result: CalculationResult,
}

impl FareForm {
    /// Creates an empty form with a single tax row.
    pub fn new(config: &FareConfig) -> Self {
        let rows = RowCollection::new(config.max_tax_rows);
        let result = Self::zero_result(&rows);
        Self {
            base_old_fare: Decimal::ZERO,
            base_new_fare: Decimal::ZERO,
            airline_penalty: Decimal::ZERO,
            service_fee: Decimal::ZERO,
            flexibility: Flexibility::Unset,
            rows,
            max_rows_warning: false,
            result,
        }
    }

    pub fn field(
        &self,
        field: FareField,
    ) -> Decimal {
        match field {
            FareField::BaseOldFare => self.base_old_fare,
            FareField::BaseNewFare => self.base_new_fare,
            FareField::AirlinePenalty => self.airline_penalty,
            FareField::ServiceFee => self.service_fee,
        }
    }

    /// Stores raw field text, coercing it to an amount.
    pub fn set_field(
        &mut self,
        field: FareField,
        raw: &str,
    ) {
        let value = coerce_amount(raw);
        match field {
            FareField::BaseOldFare => self.base_old_fare = value,
            FareField::BaseNewFare => self.base_new_fare = value,
            FareField::AirlinePenalty => self.airline_penalty = value,
            FareField::ServiceFee => self.service_fee = value,
        }
    }

    pub fn flexibility(&self) -> Flexibility {
        self.flexibility
    }

    pub fn set_flexibility(
        &mut self,
        flexibility: Flexibility,
    ) {
        debug!(flexibility = flexibility.as_str(), "flexibility changed");
        self.flexibility = flexibility;
    }

    /// Whether the penalty and service fee fields should be shown.
    pub fn surcharge_fields_active(&self) -> bool {
        self.flexibility.surcharge_active()
    }

    pub fn rows(&self) -> &RowCollection {
        &self.rows
    }

    /// Stores raw text for one fare of a tax row.
    ///
    /// # Errors
    ///
    /// Returns [`RowCollectionError::RowNotFound`] if the row does not exist.
    pub fn set_tax_fare(
        &mut self,
        index: RowIndex,
        side: FareSide,
        raw: &str,
    ) -> Result<(), RowCollectionError> {
        let row = self
            .rows
            .get_mut(index)
            .ok_or(RowCollectionError::RowNotFound(index))?;
        row.set_fare(side, coerce_amount(raw));
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`RowCollectionError::RowNotFound`] if the row does not exist.
    pub fn set_tax_code(
        &mut self,
        index: RowIndex,
        raw: &str,
    ) -> Result<(), RowCollectionError> {
        let row = self
            .rows
            .get_mut(index)
            .ok_or(RowCollectionError::RowNotFound(index))?;
        row.set_tax_code(raw);
        Ok(())
    }

    /// Adds a tax row. When the limit is reached the max rows warning is
    /// raised and the error returned.
    ///
    /// # Errors
    ///
    /// Returns [`RowCollectionError::MaxRowsExceeded`] when the form is full.
    pub fn add_tax_row(&mut self) -> Result<RowIndex, RowCollectionError> {
        self.rows.add_row().inspect_err(|_| {
            self.max_rows_warning = true;
        })
    }

    /// Removes a tax row. A successful removal also dismisses the max rows
    /// warning once there is room again, so the alert is not hidden only
    /// by [`FareForm::clear`].
    ///
    /// # Errors
    ///
    /// Returns [`RowCollectionError::RowNotFound`] if the row does not exist.
    pub fn remove_tax_row(
        &mut self,
        index: RowIndex,
    ) -> Result<(), RowCollectionError> {
        self.rows.remove_row(index)?;
        if !self.rows.is_full() {
            self.max_rows_warning = false;
        }
        Ok(())
    }

    /// Whether the "maximum tax rows" alert should be visible.
    pub fn max_rows_warning(&self) -> bool {
        self.max_rows_warning
    }

    /// Resets every field, the flexibility selection and the tax rows, and
    /// zeroes the summary.
    pub fn clear(&mut self) {
        self.base_old_fare = Decimal::ZERO;
        self.base_new_fare = Decimal::ZERO;
        self.airline_penalty = Decimal::ZERO;
        self.service_fee = Decimal::ZERO;
        self.flexibility = Flexibility::Unset;
        self.rows.reset();
        self.max_rows_warning = false;
        self.result = Self::zero_result(&self.rows);
        info!("fare form cleared");
    }

    /// Snapshot of the values the calculator reads.
    pub fn inputs(&self) -> CalculationInputs<'_> {
        CalculationInputs {
            base_old_fare: self.base_old_fare,
            base_new_fare: self.base_new_fare,
            rows: self.rows.rows(),
            flexibility: self.flexibility,
            airline_penalty: self.airline_penalty,
            service_fee: self.service_fee,
        }
    }

    /// Recomputes the summary, replacing the previous result.
    pub fn recompute(&mut self) -> &CalculationResult {
        self.result = FareCalculator::recompute(&self.inputs());
        &self.result
    }

    /// Result of the last [`FareForm::recompute`] or [`FareForm::clear`].
    pub fn result(&self) -> &CalculationResult {
        &self.result
    }

    fn zero_result(rows: &RowCollection) -> CalculationResult {
        CalculationResult {
            per_row_diff: rows
                .rows()
                .iter()
                .map(|row| (row.index, Decimal::ZERO))
                .collect(),
            ..CalculationResult::default()
        }
    }
}

impl Default for FareForm {
    fn default() -> Self {
        Self::new(&FareConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn index(value: u32) -> RowIndex {
        RowIndex::new(value).unwrap()
    }

    fn small_form() -> FareForm {
        FareForm::new(&FareConfig {
            max_tax_rows: 3,
            ..FareConfig::default()
        })
    }

    #[test]
    fn set_field_coerces_garbage_to_zero() {
        let mut form = FareForm::default();

        form.set_field(FareField::BaseNewFare, "n/a");

        assert_eq!(form.field(FareField::BaseNewFare), dec!(0));
    }

    #[test]
    fn set_tax_fare_on_missing_row_fails() {
        let mut form = FareForm::default();

        let result = form.set_tax_fare(index(4), FareSide::Old, "1");

        assert_eq!(result, Err(RowCollectionError::RowNotFound(index(4))));
    }

    #[test]
    fn recompute_two_rows_example() {
        let mut form = FareForm::default();
        form.set_tax_fare(index(1), FareSide::Old, "2").unwrap();
        form.set_tax_fare(index(1), FareSide::New, "10").unwrap();
        let second = form.add_tax_row().unwrap();
        form.set_tax_fare(second, FareSide::Old, "5").unwrap();
        form.set_tax_fare(second, FareSide::New, "2").unwrap();

        let result = form.recompute().clone();

        assert_eq!(result.overall_tax_diff, dec!(8));
        assert_eq!(result.per_row_diff[&index(1)], dec!(8));
        assert_eq!(result.per_row_diff[&index(2)], dec!(-3));
    }

    #[test]
    fn recompute_after_row_removal_sees_removed_row_gone() {
        let mut form = FareForm::default();
        let second = form.add_tax_row().unwrap();
        form.set_tax_fare(second, FareSide::New, "9").unwrap();
        assert_eq!(form.recompute().overall_tax_diff, dec!(9));

        form.remove_tax_row(second).unwrap();

        assert_eq!(form.recompute().overall_tax_diff, dec!(0));
        assert!(!form.result().per_row_diff.contains_key(&second));
    }

    #[test]
    fn surcharge_fields_follow_flexibility() {
        let mut form = FareForm::default();
        assert!(!form.surcharge_fields_active());

        form.set_flexibility(Flexibility::NotFlexible);
        assert!(form.surcharge_fields_active());

        form.set_flexibility(Flexibility::Flexible);
        assert!(!form.surcharge_fields_active());
    }

    #[test]
    fn surcharge_values_are_kept_but_ignored_while_flexible() {
        let mut form = FareForm::default();
        form.set_field(FareField::AirlinePenalty, "50");
        form.set_flexibility(Flexibility::Flexible);

        assert_eq!(form.recompute().total_fare_diff, dec!(0));

        form.set_flexibility(Flexibility::NotFlexible);
        assert_eq!(form.recompute().total_fare_diff, dec!(50));
    }

    #[test]
    fn add_tax_row_past_limit_raises_warning() {
        let mut form = small_form();
        form.add_tax_row().unwrap();
        form.add_tax_row().unwrap();
        assert!(!form.max_rows_warning());

        let result = form.add_tax_row();

        assert_eq!(result, Err(RowCollectionError::MaxRowsExceeded(3)));
        assert!(form.max_rows_warning());
        assert_eq!(form.rows().len(), 3);
    }

    #[test]
    fn remove_tax_row_dismisses_warning() {
        let mut form = small_form();
        form.add_tax_row().unwrap();
        let third = form.add_tax_row().unwrap();
        let _ = form.add_tax_row();

        form.remove_tax_row(third).unwrap();

        assert!(!form.max_rows_warning());
    }

    #[test]
    fn clear_resets_everything() {
        let mut form = small_form();
        form.set_field(FareField::BaseOldFare, "100");
        form.set_field(FareField::ServiceFee, "15");
        form.set_flexibility(Flexibility::NotFlexible);
        form.set_tax_code(index(1), "YQ").unwrap();
        form.add_tax_row().unwrap();
        form.add_tax_row().unwrap();
        let _ = form.add_tax_row();
        form.recompute();

        form.clear();

        assert_eq!(form, small_form());
        assert_eq!(form.result().per_row_diff.len(), 1);
    }
}
