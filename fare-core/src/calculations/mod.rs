//! Fare difference calculations.
//!
//! This module turns the form's numeric inputs into the summary figures
//! shown to the agent: base fare difference, aggregate tax difference and
//! total amount to collect.

pub mod common;
pub mod fare_difference;

pub use fare_difference::{
    CalculationError, CalculationInputs, FareCalculator, TaxDifferences,
};
