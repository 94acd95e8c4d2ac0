//! Fare difference calculations for a ticket change.
//!
//! # Figures
//!
//! | Figure | Rule |
//! |--------|------|
//! | Base fare difference | new base fare − old base fare |
//! | Row tax difference | new tax − old tax, reported for every row |
//! | Overall tax difference | sum of row differences that are ≥ 0 |
//! | Total fare difference | base + overall tax (+ penalty + service fee when not flexible) |
//!
//! Tax decreases on individual lines are shown per row but never reduce the
//! overall tax difference.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fare_core::{Flexibility, RowCollection, RowIndex, FareSide};
//! use fare_core::calculations::{CalculationInputs, FareCalculator};
//!
//! let mut rows = RowCollection::new(20);
//! let row = rows.get_mut(RowIndex::FIRST).unwrap();
//! row.set_fare(FareSide::Old, dec!(10));
//! row.set_fare(FareSide::New, dec!(15));
//!
//! let inputs = CalculationInputs {
//!     base_old_fare: dec!(100),
//!     base_new_fare: dec!(80),
//!     rows: rows.rows(),
//!     flexibility: Flexibility::NotFlexible,
//!     airline_penalty: dec!(5),
//!     service_fee: dec!(2),
//! };
//!
//! let result = FareCalculator::recompute(&inputs);
//!
//! assert_eq!(result.base_fare_diff, dec!(-20));
//! assert_eq!(result.overall_tax_diff, dec!(5));
//! assert_eq!(result.total_fare_diff, dec!(-8));
//! ```

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, error};

use crate::calculations::common::zero_on_failure;
use crate::{CalculationResult, Flexibility, RowIndex, TaxRow};

/// Errors that can occur while deriving a single figure.
///
/// These never reach callers of [`FareCalculator::recompute`]; the affected
/// figure is logged and replaced with zero.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculationError {
    /// An intermediate value left the representable decimal range.
    #[error("arithmetic overflow computing {0}")]
    Overflow(&'static str),
}

/// Snapshot of everything the calculation reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculationInputs<'a> {
    pub base_old_fare: Decimal,
    pub base_new_fare: Decimal,

    /// Tax rows in ascending index order.
    pub rows: &'a [TaxRow],

    pub flexibility: Flexibility,

    /// Airline change penalty. Ignored unless the fare is not flexible.
    pub airline_penalty: Decimal,

    /// Agency service fee. Ignored unless the fare is not flexible.
    pub service_fee: Decimal,
}

/// Per-row and aggregate tax differences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxDifferences {
    pub overall: Decimal,
    pub per_row: BTreeMap<RowIndex, Decimal>,
}

/// Stateless fare difference calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct FareCalculator;

impl FareCalculator {
    /// Computes every figure from `inputs`.
    ///
    /// The base and tax differences are computed first, then the total from
    /// them. A figure that cannot be computed is logged and reported as zero;
    /// the remaining figures are still computed.
    pub fn recompute(inputs: &CalculationInputs<'_>) -> CalculationResult {
        let base_fare_diff = zero_on_failure(
            "base fare difference",
            Self::base_fare_difference(inputs.base_old_fare, inputs.base_new_fare),
        );

        let taxes = Self::tax_differences(inputs.rows).unwrap_or_else(|e| {
            error!(step = "tax differences", "calculation error: {}", e);
            TaxDifferences {
                overall: Decimal::ZERO,
                per_row: inputs
                    .rows
                    .iter()
                    .map(|row| (row.index, Decimal::ZERO))
                    .collect(),
            }
        });

        let total_fare_diff = zero_on_failure(
            "total fare difference",
            Self::total_fare_difference(
                base_fare_diff,
                taxes.overall,
                inputs.flexibility,
                inputs.airline_penalty,
                inputs.service_fee,
            ),
        );

        debug!(
            base_fare_diff = %base_fare_diff,
            overall_tax_diff = %taxes.overall,
            total_fare_diff = %total_fare_diff,
            rows = inputs.rows.len(),
            "fare difference recomputed"
        );

        CalculationResult {
            base_fare_diff,
            overall_tax_diff: taxes.overall,
            total_fare_diff,
            per_row_diff: taxes.per_row,
        }
    }

    /// Returns `new_fare - old_fare`.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::Overflow`] if the difference is not
    /// representable.
    pub fn base_fare_difference(
        old_fare: Decimal,
        new_fare: Decimal,
    ) -> Result<Decimal, CalculationError> {
        new_fare
            .checked_sub(old_fare)
            .ok_or(CalculationError::Overflow("base fare difference"))
    }

    /// Returns every row's difference and the sum of the non-negative ones.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::Overflow`] if any row difference or the
    /// running sum is not representable.
    pub fn tax_differences(rows: &[TaxRow]) -> Result<TaxDifferences, CalculationError> {
        let mut taxes = TaxDifferences::default();

        for row in rows {
            let difference = row
                .new_fare
                .checked_sub(row.old_fare)
                .ok_or(CalculationError::Overflow("tax row difference"))?;

            taxes.per_row.insert(row.index, difference);

            if difference >= Decimal::ZERO {
                taxes.overall = taxes
                    .overall
                    .checked_add(difference)
                    .ok_or(CalculationError::Overflow("overall tax difference"))?;
            }
        }

        Ok(taxes)
    }

    /// Adds the base and tax differences, plus the penalty and service fee
    /// when the fare is not flexible.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::Overflow`] if the sum is not representable.
    pub fn total_fare_difference(
        base_fare_diff: Decimal,
        overall_tax_diff: Decimal,
        flexibility: Flexibility,
        airline_penalty: Decimal,
        service_fee: Decimal,
    ) -> Result<Decimal, CalculationError> {
        let overflow = || CalculationError::Overflow("total fare difference");

        let total = base_fare_diff
            .checked_add(overall_tax_diff)
            .ok_or_else(overflow)?;

        if !flexibility.surcharge_active() {
            return Ok(total);
        }

        total
            .checked_add(airline_penalty)
            .and_then(|t| t.checked_add(service_fee))
            .ok_or_else(overflow)
    }
}
