/// Round to `decimals` places, ties to even.
///
/// Rounding works on the exact binary value of `value`, so `10.05` (stored as
/// `10.0500000000000007...`) rounds up to `10.1` while an exact tie such as
/// `0.25` goes to the even neighbour `0.2`.
///
/// # Examples
/// ```
/// use amedas_processor::utils::round_half_even;
///
/// assert_eq!(round_half_even(0.25, 1), 0.2);
/// assert_eq!(round_half_even(10.15, 1), 10.2);
/// ```
pub fn round_half_even(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }

    // std float formatting is exact and breaks ties to even
    format!("{:.*}", decimals, value)
        .parse::<f64>()
        .unwrap_or(value)
}
