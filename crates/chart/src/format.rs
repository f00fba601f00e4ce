//! Number formatting for chart values and report lines.

/// Formats an integer with `,` as the thousands separator.
///
/// ```rust
/// use pypi_chart::thousands;
/// assert_eq!(thousands(0), "0");
/// assert_eq!(thousands(1234567), "1,234,567");
/// ```
pub fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "0")]
    #[case(7, "7")]
    #[case(999, "999")]
    #[case(1000, "1,000")]
    #[case(12345, "12,345")]
    #[case(100000, "100,000")]
    #[case(1234567, "1,234,567")]
    #[case(u64::MAX, "18,446,744,073,709,551,615")]
    fn test_thousands(#[case] value: u64, #[case] expected: &str) {
        assert_eq!(thousands(value), expected);
    }
}
