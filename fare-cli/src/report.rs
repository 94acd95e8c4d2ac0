//! Text rendering of the form summary.

use std::fmt::Write;

use fare_core::calculations::common::round_half_up;
use fare_core::FareForm;
use rust_decimal::Decimal;

/// Formats an amount with exactly two fraction digits.
///
/// ```
/// use rust_decimal_macros::dec;
/// use fare_cli::report::format_currency;
///
/// assert_eq!(format_currency(dec!(-20)), "-20.00");
/// assert_eq!(format_currency(dec!(4.005)), "4.01");
/// ```
pub fn format_currency(value: Decimal) -> String {
    let mut rounded = round_half_up(value);
    rounded.rescale(2);
    rounded.to_string()
}

/// Renders the tax table and summary for the form's last result.
pub fn render(form: &FareForm) -> String {
    let result = form.result();
    let mut out = String::new();

    let _ = writeln!(out, "{:>3}  {:<4} {:>12} {:>12} {:>12}", "#", "Tax", "Old", "New", "Diff");
    for row in form.rows().rows() {
        let diff = result
            .per_row_diff
            .get(&row.index)
            .copied()
            .unwrap_or(Decimal::ZERO);
        let _ = writeln!(
            out,
            "{:>3}  {:<4} {:>12} {:>12} {:>12}",
            row.index,
            row.tax_code,
            format_currency(row.old_fare),
            format_currency(row.new_fare),
            format_currency(diff),
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Flexible:              {}", form.flexibility().as_str());
    if form.surcharge_fields_active() {
        let _ = writeln!(
            out,
            "Airline penalty:       {:>12}",
            format_currency(form.field(fare_core::FareField::AirlinePenalty))
        );
        let _ = writeln!(
            out,
            "Service fee:           {:>12}",
            format_currency(form.field(fare_core::FareField::ServiceFee))
        );
    }
    let _ = writeln!(out, "Base fare difference:  {:>12}", format_currency(result.base_fare_diff));
    let _ = writeln!(out, "Tax difference:        {:>12}", format_currency(result.overall_tax_diff));
    let _ = writeln!(out, "Total fare difference: {:>12}", format_currency(result.total_fare_diff));

    if form.max_rows_warning() {
        let _ = writeln!(out, "{}", max_rows_alert(form.rows().max_rows()));
    }

    out
}

/// Message shown when a tax row cannot be added.
pub fn max_rows_alert(max_rows: usize) -> String {
    format!("Maximum of {max_rows} tax rows reached.")
}
