use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Stable 1-based key of a tax row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RowIndex(u32);

impl RowIndex {
    /// The first row, which always exists.
    pub const FIRST: RowIndex = RowIndex(1);

    /// Returns `None` for zero.
    pub fn new(value: u32) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    pub(crate) fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RowIndex {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Which of the two fares on a row is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FareSide {
    Old,
    New,
}

/// A single tax or fee line with its value on the old and new ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRow {
    pub index: RowIndex,

    /// Two-character tax designator (e.g. "YQ"). Display only.
    pub tax_code: String,

    pub old_fare: Decimal,
    pub new_fare: Decimal,
}

impl TaxRow {
    /// Maximum length of [`TaxRow::tax_code`].
    pub const TAX_CODE_LEN: usize = 2;

    /// Creates an empty row with both fares at zero.
    pub fn new(index: RowIndex) -> Self {
        Self {
            index,
            tax_code: String::new(),
            old_fare: Decimal::ZERO,
            new_fare: Decimal::ZERO,
        }
    }

    pub fn fare(
        &self,
        side: FareSide,
    ) -> Decimal {
        match side {
            FareSide::Old => self.old_fare,
            FareSide::New => self.new_fare,
        }
    }

    pub fn set_fare(
        &mut self,
        side: FareSide,
        value: Decimal,
    ) {
        match side {
            FareSide::Old => self.old_fare = value,
            FareSide::New => self.new_fare = value,
        }
    }

    /// Stores the tax code, keeping at most the first two characters.
    pub fn set_tax_code(
        &mut self,
        code: &str,
    ) {
        self.tax_code = code.trim().chars().take(Self::TAX_CODE_LEN).collect();
    }

    /// Clears the code and zeroes both fares.
    pub fn reset(&mut self) {
        self.tax_code.clear();
        self.old_fare = Decimal::ZERO;
        self.new_fare = Decimal::ZERO;
    }
}
