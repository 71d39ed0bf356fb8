use std::f64::consts::{E, PI};

/// The golden ratio.
pub const PHI: f64 = 1.618_033_988_749_894_848_204_586_834_365_638_f64;

/// Named constants usable as leaves, matched exactly and case-sensitively.
pub const CONSTANTS: &[(&str, f64)] = &[("e", E), ("pi", PI), ("phi", PHI)];

pub fn lookup(name: &str) -> Option<f64> {
    CONSTANTS
        .iter()
        .find(|(constant, _)| *constant == name)
        .map(|(_, value)| *value)
}
