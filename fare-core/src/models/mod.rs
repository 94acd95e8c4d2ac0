mod calculation_result;
mod flexibility;
mod tax_row;

pub use calculation_result::CalculationResult;
pub use flexibility::Flexibility;
pub use tax_row::{FareSide, RowIndex, TaxRow};
