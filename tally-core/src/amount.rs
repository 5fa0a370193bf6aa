//! Amount parsing for user-typed numbers.

/// Parse a user-typed amount.
///
/// `,` is accepted as the decimal separator. Surrounding whitespace is
/// ignored. Returns `None` for anything that is not a finite number.
pub fn parse_amount(input: &str) -> Option<f64> {
    let normalized = input.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}
