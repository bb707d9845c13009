//! Unit conversion and currency formatting
//!
//! The dataset prices per quintal; answers quote per kg (or whatever unit
//! the user asked in). Conversion is a pure linear scale over the fixed
//! ratios in `krishi_agent_core::units`.

use krishi_agent_core::MassUnit;

/// Convert a per-quintal price to a per-`unit` price
pub fn per_unit(price_per_quintal: f64, unit: MassUnit) -> f64 {
    price_per_quintal * unit.in_quintals()
}

/// Same, but propagating an absent price
pub fn per_unit_opt(price_per_quintal: Option<f64>, unit: MassUnit) -> Option<f64> {
    price_per_quintal.map(|p| per_unit(p, unit))
}

/// Render a rupee amount for answers: integer-rounded with the currency
/// prefix, or the explicit "unavailable" sentinel - never a panic or an
/// empty string.
pub fn format_inr(amount: Option<f64>) -> String {
    match amount {
        Some(v) if v.is_finite() => format!("₹{}", v.round() as i64),
        _ => "unavailable".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_unit_scales() {
        assert_eq!(per_unit(2500.0, MassUnit::Quintal), 2500.0);
        assert_eq!(per_unit(2500.0, MassUnit::Kilogram), 25.0);
        assert_eq!(per_unit(2500.0, MassUnit::Gram), 0.025);
        assert_eq!(per_unit(2500.0, MassUnit::Tonne), 25000.0);
    }

    #[test]
    fn test_kg_quintal_round_trip() {
        let p = 1234.56;
        let per_kg = per_unit(p, MassUnit::Kilogram);
        let back = per_unit(per_kg * 100.0, MassUnit::Quintal);
        assert!((back - p).abs() < 1e-9);
    }

    #[test]
    fn test_format_inr() {
        assert_eq!(format_inr(Some(2450.4)), "₹2450");
        assert_eq!(format_inr(Some(2450.5)), "₹2451");
        assert_eq!(format_inr(None), "unavailable");
        assert_eq!(format_inr(Some(f64::NAN)), "unavailable");
    }
}
