//! Quantity units for market prices
//!
//! The upstream mandi dataset prices everything per quintal; users ask in
//! kg, grams, quintals or tonnes. Conversions are fixed ratios, not floats
//! picked per call site: 1 quintal = 100 kg = 100,000 g, 1 tonne = 10 quintal.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Canonical mass units for quantity parsing and per-unit pricing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MassUnit {
    Kilogram,
    Gram,
    Quintal,
    Tonne,
}

impl MassUnit {
    /// Size of this unit expressed in quintals
    pub fn in_quintals(&self) -> f64 {
        match self {
            Self::Kilogram => 0.01,
            Self::Gram => 0.000_01,
            Self::Quintal => 1.0,
            Self::Tonne => 10.0,
        }
    }

    /// Size of this unit expressed in kilograms
    pub fn in_kilograms(&self) -> f64 {
        self.in_quintals() * 100.0
    }

    /// Short label used in answers ("kg", "g", "quintal", "tonne")
    pub fn label(&self) -> &'static str {
        match self {
            Self::Kilogram => "kg",
            Self::Gram => "g",
            Self::Quintal => "quintal",
            Self::Tonne => "tonne",
        }
    }

    /// Normalize a unit word from user text to a canonical unit
    pub fn from_word(word: &str) -> Option<Self> {
        match word.trim().to_lowercase().as_str() {
            "kg" | "kgs" | "kilogram" | "kilograms" | "kilo" | "kilos" => Some(Self::Kilogram),
            "g" | "gm" | "gms" | "gram" | "grams" => Some(Self::Gram),
            "quintal" | "quintals" | "qtl" | "q" => Some(Self::Quintal),
            "ton" | "tons" | "tonne" | "tonnes" => Some(Self::Tonne),
            _ => None,
        }
    }
}

impl std::fmt::Display for MassUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A quantity mentioned in a query ("200 kg", "2 quintal", "1.5 tonnes")
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantitySpec {
    pub amount: f64,
    pub unit: MassUnit,
}

static QUANTITY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(\d+(?:\.\d+)?)\s*(kilograms?|kilos?|kgs?|grams?|gms?|g|qtl|quintals?|q|tonnes?|tons?)\b",
    )
    .unwrap()
});

impl QuantitySpec {
    pub fn new(amount: f64, unit: MassUnit) -> Self {
        Self { amount, unit }
    }

    /// Parse the first quantity mention out of free text.
    ///
    /// The numeric amount is preserved exactly as written; only the unit word
    /// is normalized. Returns `None` when no "<number> <unit>" pair appears.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = QUANTITY_PATTERN.captures(text)?;
        let amount: f64 = caps.get(1)?.as_str().parse().ok()?;
        let unit = MassUnit::from_word(caps.get(2)?.as_str())?;
        Some(Self { amount, unit })
    }

    /// Total mass in kilograms
    pub fn in_kilograms(&self) -> f64 {
        self.amount * self.unit.in_kilograms()
    }

    /// Total mass in quintals
    pub fn in_quintals(&self) -> f64 {
        self.amount * self.unit.in_quintals()
    }
}

impl std::fmt::Display for QuantitySpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_and_without_space() {
        let q = QuantitySpec::parse("sell 200kg of wheat").unwrap();
        assert_eq!(q.amount, 200.0);
        assert_eq!(q.unit, MassUnit::Kilogram);

        let q = QuantitySpec::parse("I have 2 quintal onion").unwrap();
        assert_eq!(q.amount, 2.0);
        assert_eq!(q.unit, MassUnit::Quintal);
    }

    #[test]
    fn test_unit_synonyms_normalize() {
        for (word, unit) in [
            ("kg", MassUnit::Kilogram),
            ("kilograms", MassUnit::Kilogram),
            ("g", MassUnit::Gram),
            ("grams", MassUnit::Gram),
            ("quintals", MassUnit::Quintal),
            ("qtl", MassUnit::Quintal),
            ("q", MassUnit::Quintal),
            ("ton", MassUnit::Tonne),
            ("tonnes", MassUnit::Tonne),
        ] {
            let q = QuantitySpec::parse(&format!("3 {word}")).unwrap();
            assert_eq!(q.unit, unit, "unit word {word}");
            assert_eq!(q.amount, 3.0);
        }
    }

    #[test]
    fn test_amount_preserved_exactly() {
        let q = QuantitySpec::parse("1.5 tonnes of paddy").unwrap();
        assert_eq!(q.amount, 1.5);
        assert_eq!(q.unit, MassUnit::Tonne);
    }

    #[test]
    fn test_fixed_ratios() {
        assert_eq!(MassUnit::Quintal.in_kilograms(), 100.0);
        assert_eq!(MassUnit::Tonne.in_quintals(), 10.0);
        assert!((MassUnit::Gram.in_quintals() - 1e-5).abs() < 1e-12);

        let q = QuantitySpec::new(2.0, MassUnit::Tonne);
        assert_eq!(q.in_kilograms(), 2000.0);
        assert_eq!(q.in_quintals(), 20.0);
    }

    #[test]
    fn test_no_quantity() {
        assert!(QuantitySpec::parse("price of wheat in punjab").is_none());
    }
}
