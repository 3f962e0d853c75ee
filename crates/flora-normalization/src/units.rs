use flora_terms::TermRegistry;

use crate::numeric::round3;

/// Converts a value in `units` to millimeters. Unknown units yield `None`.
pub fn to_millimeters(value: f64, units: &str, terms: &TermRegistry) -> Option<f64> {
    terms.mm_factor(units).map(|factor| round3(value * factor))
}
