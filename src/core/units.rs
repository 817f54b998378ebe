//! Area unit conversion and number formatting
//!
//! The store keeps every area and price-per-area value in square meters.
//! Square feet only exist at the boundary: derived for display, and
//! converted back when a caller supplies a feet-based threshold.

/// Square feet per square meter
pub const SQM_TO_SQFT: f64 = 10.764;

/// Convert an area in square meters to square feet
pub fn sqm_to_sqft(sqm: f64) -> f64 {
    sqm * SQM_TO_SQFT
}

/// Convert an area in square feet to square meters
pub fn sqft_to_sqm(sqft: f64) -> f64 {
    sqft / SQM_TO_SQFT
}

/// Convert a price per square meter to a price per square foot
pub fn price_per_sqm_to_sqft(price: f64) -> f64 {
    price / SQM_TO_SQFT
}

/// Convert a price per square foot to a price per square meter
pub fn price_per_sqft_to_sqm(price: f64) -> f64 {
    price * SQM_TO_SQFT
}

/// Round to a fixed number of decimal places (half away from zero)
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Group an integer with thousands separators: `1234567` -> `"1,234,567"`
pub fn format_number(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Compact price display in dirhams
///
/// Millions keep two decimals, thousands are rounded to a whole `K`,
/// anything smaller is printed in full.
pub fn format_price(price: f64) -> String {
    if price >= 1_000_000.0 {
        format!("AED {:.2}M", price / 1_000_000.0)
    } else if price >= 1_000.0 {
        format!("AED {}K", (price / 1_000.0).round() as i64)
    } else {
        format!("AED {}", format_number(price.round() as i64))
    }
}

/// Rounded, grouped square feet: `1076.4` -> `"1,076 sqft"`
pub fn format_sqft(sqft: f64) -> String {
    format!("{} sqft", format_number(sqft.round() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqm_to_sqft() {
        assert_eq!(round_to(sqm_to_sqft(100.0), 2), 1076.4);
        assert_eq!(round_to(sqm_to_sqft(92.90), 2), 999.98);
    }

    #[test]
    fn test_feet_round_trip() {
        for sqft in [1.0, 450.0, 999.99, 1000.0, 2_345.67, 25_000.0] {
            let back = sqm_to_sqft(sqft_to_sqm(sqft));
            assert_eq!(round_to(back, 2), round_to(sqft, 2), "round trip for {sqft}");
        }
    }

    #[test]
    fn test_price_per_area() {
        assert_eq!(round_to(price_per_sqm_to_sqft(10_764.0), 2), 1000.0);
        assert_eq!(round_to(price_per_sqft_to_sqm(1000.0), 2), 10_764.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(-8.333_333, 1), -8.3);
        assert_eq!(round_to(20.0, 1), 20.0);
        assert_eq!(round_to(1.005_1, 2), 1.01);
        assert_eq!(round_to(2.5, 0), 3.0);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1_234_567), "1,234,567");
        assert_eq!(format_number(-100_000), "-100,000");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(1_250_000.0), "AED 1.25M");
        assert_eq!(format_price(950_400.0), "AED 950K");
        assert_eq!(format_price(750.0), "AED 750");
    }

    #[test]
    fn test_format_sqft() {
        assert_eq!(format_sqft(1076.4), "1,076 sqft");
    }
}
