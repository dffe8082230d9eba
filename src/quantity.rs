//! Quantity formatting for ingredient annotations.
//!
//! Quantities are rounded to two decimals. The three common kitchen fractions
//! are rendered with their Unicode vulgar fraction glyphs, everything else as a
//! plain decimal without trailing zeros.

/// Fraction glyphs, keyed by the rounded value in hundredths
const FRACTION_GLYPHS: [(i128, &str); 3] = [(50, "½"), (25, "¼"), (75, "¾")];

/// Past this many fraction bits `|value| * 100 < 0.007`, which always rounds to 0
const MAX_EXACT_FRACTION_BITS: u32 = 66;

/// Format an ingredient quantity for display inside a step annotation.
///
/// A missing quantity yields an empty string. Non-finite values are treated
/// the same way so that bad data never leaks `NaN` into a rendered page.
///
/// # Examples
///
/// ```rust
/// use ingredient_highlighter::quantity::format_quantity;
///
/// assert_eq!(format_quantity(Some(0.5)), "½");
/// assert_eq!(format_quantity(Some(1.5)), "1.5");
/// assert_eq!(format_quantity(Some(2.0)), "2");
/// assert_eq!(format_quantity(Some(2.005)), "2");
/// assert_eq!(format_quantity(None), "");
/// ```
pub fn format_quantity(quantity: Option<f64>) -> String {
    let Some(qty) = quantity else {
        return String::new();
    };
    if !qty.is_finite() {
        return String::new();
    }

    let Some(hundredths) = round_to_hundredths(qty) else {
        // Integral already, nothing to round
        return qty.to_string();
    };

    if let Some((_, glyph)) = FRACTION_GLYPHS.iter().find(|(value, _)| *value == hundredths) {
        return (*glyph).to_string();
    }

    // + 0.0 normalizes -0.0 so it prints as "0"
    (hundredths as f64 / 100.0 + 0.0).to_string()
}

/// Round half up to a whole number of hundredths, on the exact binary value.
///
/// `value * 100.0` would round first: `2.005` is stored just below the
/// midpoint but its product is exactly `200.5`. Working on the mantissa keeps
/// `2.005` at 200 and the true tie `0.125` at 13.
///
/// Returns `None` for values with no fractional bits (`|value| >= 2^52`).
fn round_to_hundredths(value: f64) -> Option<i128> {
    let bits = value.to_bits();
    let negative = bits >> 63 == 1;
    let biased_exponent = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);

    // value = ±mantissa * 2^exponent
    let (mantissa, exponent) = if biased_exponent == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased_exponent - 1075)
    };
    if exponent >= 0 {
        return None;
    }

    let fraction_bits = exponent.unsigned_abs();
    if fraction_bits > MAX_EXACT_FRACTION_BITS {
        return Some(0);
    }

    let signed = if negative {
        -i128::from(mantissa)
    } else {
        i128::from(mantissa)
    };
    // floor(m / 2^k * 100 + 1/2) == floor((200 m + 2^k) / 2^(k+1))
    let numerator = 200 * signed + (1i128 << fraction_bits);
    Some(numerator.div_euclid(1i128 << (fraction_bits + 1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_glyphs() {
        assert_eq!(format_quantity(Some(0.5)), "½");
        assert_eq!(format_quantity(Some(0.25)), "¼");
        assert_eq!(format_quantity(Some(0.75)), "¾");
    }

    #[test]
    fn test_values_rounding_onto_a_fraction() {
        assert_eq!(format_quantity(Some(0.499)), "½");
        assert_eq!(format_quantity(Some(0.2501)), "¼");
        assert_eq!(format_quantity(Some(0.754)), "¾");
    }

    #[test]
    fn test_plain_decimals() {
        assert_eq!(format_quantity(Some(2.0)), "2");
        assert_eq!(format_quantity(Some(2.005)), "2");
        assert_eq!(format_quantity(Some(1.5)), "1.5");
        assert_eq!(format_quantity(Some(1.25)), "1.25");
        assert_eq!(format_quantity(Some(0.333)), "0.33");
        assert_eq!(format_quantity(Some(0.125)), "0.13");
        assert_eq!(format_quantity(Some(250.0)), "250");
    }

    #[test]
    fn test_rounding_uses_the_exact_binary_value() {
        // Stored just below the midpoint
        assert_eq!(format_quantity(Some(2.005)), "2");
        assert_eq!(format_quantity(Some(1.005)), "1");
        assert_eq!(format_quantity(Some(2.675)), "2.67");
        // Exact ties round up
        assert_eq!(format_quantity(Some(0.125)), "0.13");
        assert_eq!(format_quantity(Some(0.375)), "0.38");
        assert_eq!(format_quantity(Some(0.005)), "0.01");
        assert_eq!(round_to_hundredths(2.005), Some(200));
        assert_eq!(round_to_hundredths(0.125), Some(13));
        assert_eq!(round_to_hundredths(-0.125), Some(-12));
        assert_eq!(round_to_hundredths(1e-30), Some(0));
        assert_eq!(round_to_hundredths(2f64.powi(60)), None);
    }

    #[test]
    fn test_missing_and_edge_values() {
        assert_eq!(format_quantity(None), "");
        assert_eq!(format_quantity(Some(f64::NAN)), "");
        assert_eq!(format_quantity(Some(f64::INFINITY)), "");
        assert_eq!(format_quantity(Some(0.0)), "0");
        assert_eq!(format_quantity(Some(-0.0)), "0");
        assert_eq!(format_quantity(Some(-0.001)), "0");
        assert!(!format_quantity(Some(f64::MAX)).is_empty());
    }
}
