use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::RowIndex;

/// Derived summary figures for the current form contents.
///
/// Values are exact; rounding for display happens in the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// New base fare minus old base fare.
    pub base_fare_diff: Decimal,

    /// Sum of the non-negative per-row tax differences.
    pub overall_tax_diff: Decimal,

    /// Base and tax differences, plus penalty and service fee when the
    /// fare is not flexible.
    pub total_fare_diff: Decimal,

    /// Difference of every tax row, including negative ones.
    pub per_row_diff: BTreeMap<RowIndex, Decimal>,
}
