//! Numbers with compound units, per spec §3/§4.7.
//!
//! Units are tracked as two multisets of unit names (numerator and
//! denominator) rather than a single fixed unit, so that `1px * 1px`
//! produces `1px*px` and `10px / 2s` produces `5px/s`, matching the
//! original implementation's number model.

/// A conversion-compatible family of units (length, angle, time,
/// frequency, resolution). Units outside these families are treated as
/// opaque and only compare equal to themselves.
fn unit_family(unit: &str) -> Option<(&'static str, f64)> {
    // Returns the family tag and the factor to convert `unit` into the
    // family's canonical unit (px, deg, s, Hz, dpi respectively).
    Some(match unit {
        "px" => ("length", 1.0),
        "cm" => ("length", 96.0 / 2.54),
        "mm" => ("length", 96.0 / 25.4),
        "q" => ("length", 96.0 / 101.6),
        "in" => ("length", 96.0),
        "pt" => ("length", 96.0 / 72.0),
        "pc" => ("length", 16.0),
        "deg" => ("angle", 1.0),
        "grad" => ("angle", 0.9),
        "rad" => ("angle", 180.0 / std::f64::consts::PI),
        "turn" => ("angle", 360.0),
        "s" => ("time", 1.0),
        "ms" => ("time", 0.001),
        "hz" => ("frequency", 1.0),
        "khz" => ("frequency", 1000.0),
        "dpi" => ("resolution", 1.0),
        "dpcm" => ("resolution", 2.54),
        "dppx" | "x" => ("resolution", 96.0),
        _ => return None,
    })
}

fn canonical_factor(unit: &str) -> f64 {
    unit_family(unit).map_or(1.0, |(_, factor)| factor)
}

fn families_match(a: &str, b: &str) -> bool {
    match (unit_family(a), unit_family(b)) {
        (Some((fa, _)), Some((fb, _))) => fa == fb,
        _ => a.eq_ignore_ascii_case(b),
    }
}

/// A Sass number: a 64-bit float plus numerator/denominator unit lists.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SassNumber {
    /// The numeric value, already converted into whatever units this
    /// number currently carries (no implicit normalization to SI).
    pub value: f64,
    /// Units multiplied in, e.g. `["px"]`, or `["px", "px"]` after squaring.
    pub numer_units: Vec<String>,
    /// Units divided by, e.g. `["s"]` for a `px/s` velocity.
    pub denom_units: Vec<String>,
}

impl SassNumber {
    /// A plain unitless number.
    #[must_use]
    pub fn unitless(value: f64) -> Self {
        Self {
            value,
            numer_units: Vec::new(),
            denom_units: Vec::new(),
        }
    }

    /// A number with exactly one numerator unit, e.g. `16px`.
    #[must_use]
    pub fn with_unit(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            numer_units: vec![unit.into()],
            denom_units: Vec::new(),
        }
    }

    /// `true` if this number carries no units at all.
    #[must_use]
    pub fn is_unitless(&self) -> bool {
        self.numer_units.is_empty() && self.denom_units.is_empty()
    }

    /// The single numerator unit, if this number has exactly one
    /// numerator and no denominator units (the common case checked by
    /// `unit()`/most arithmetic).
    #[must_use]
    pub fn single_unit(&self) -> Option<&str> {
        if self.numer_units.len() == 1 && self.denom_units.is_empty() {
            Some(&self.numer_units[0])
        } else {
            None
        }
    }

    /// Render the unit portion as Sass would for `unit($n)`, e.g. `"px"`,
    /// `"px*px"`, `"px/s"`.
    #[must_use]
    pub fn unit_string(&self) -> String {
        let numer = self.numer_units.join("*");
        if self.denom_units.is_empty() {
            numer
        } else {
            format!("{numer}/{}", self.denom_units.join("*"))
        }
    }

    /// `true` if `other` could be converted to this number's units
    /// (same unit multisets up to compatible-family members).
    #[must_use]
    pub fn is_comparable_to(&self, other: &Self) -> bool {
        if self.numer_units.is_empty() && self.denom_units.is_empty() {
            return true;
        }
        if other.numer_units.is_empty() && other.denom_units.is_empty() {
            return true;
        }
        same_unit_multiset(&self.numer_units, &other.numer_units)
            && same_unit_multiset(&self.denom_units, &other.denom_units)
    }

    /// Value converted into `self`'s units, assuming `other` is
    /// comparable (caller checks with [`SassNumber::is_comparable_to`]).
    #[must_use]
    pub fn value_in_units_of(&self, other: &Self) -> f64 {
        if other.numer_units.is_empty() && other.denom_units.is_empty() {
            return other.value;
        }
        let numer_factor = conversion_factor(&other.numer_units, &self.numer_units);
        let denom_factor = conversion_factor(&other.denom_units, &self.denom_units);
        other.value * numer_factor / denom_factor
    }
}

fn same_unit_multiset(a: &[String], b: &[String]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut remaining: Vec<&String> = b.iter().collect();
    for unit in a {
        let Some(pos) = remaining.iter().position(|u| families_match(u, unit)) else {
            return false;
        };
        let _ = remaining.remove(pos);
    }
    true
}

fn conversion_factor(from: &[String], to: &[String]) -> f64 {
    if from.is_empty() || to.is_empty() {
        return 1.0;
    }
    let mut factor = 1.0;
    for (f, t) in from.iter().zip(to.iter()) {
        factor *= canonical_factor(f) / canonical_factor(t);
    }
    factor
}

#[cfg(test)]
mod tests {
    use super::SassNumber;

    #[test]
    fn test_unit_string_simple() {
        let n = SassNumber::with_unit(16.0, "px");
        assert_eq!(n.unit_string(), "px");
    }

    #[test]
    fn test_unitless_is_comparable_to_anything() {
        let a = SassNumber::unitless(1.0);
        let b = SassNumber::with_unit(1.0, "px");
        assert!(a.is_comparable_to(&b));
        assert!(b.is_comparable_to(&a));
    }

    #[test]
    fn test_cm_comparable_to_in() {
        let a = SassNumber::with_unit(1.0, "in");
        let b = SassNumber::with_unit(2.54, "cm");
        assert!(a.is_comparable_to(&b));
    }

    #[test]
    fn test_px_not_comparable_to_s() {
        let a = SassNumber::with_unit(1.0, "px");
        let b = SassNumber::with_unit(1.0, "s");
        assert!(!a.is_comparable_to(&b));
    }

    #[test]
    fn test_value_in_units_of_converts_in_to_cm() {
        let cm = SassNumber::with_unit(0.0, "cm");
        let one_in = SassNumber::with_unit(1.0, "in");
        let converted = cm.value_in_units_of(&one_in);
        assert!((converted - 2.54).abs() < 1e-9);
    }
}
