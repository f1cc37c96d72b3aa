//! Chain-selector lookup.
//!
//! CCIP identifies chains by a stable 64-bit selector, distinct from the
//! chain's native integer chain-id. This module is a small lookup table for
//! the selectors of well-known mainnets, mirroring the `ChainId` newtype
//! idiom used for the bridge's 4-byte chain ids, but over `u64`.

use std::fmt;

/// A CCIP chain selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChainSelector(pub u64);

impl ChainSelector {
    pub fn from_u64(selector: u64) -> Self {
        ChainSelector(selector)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }

    /// Look up the well-known mainnet this selector belongs to, if any.
    pub fn known_name(&self) -> Option<&'static str> {
        lookup_name(self.0)
    }
}

impl fmt::Display for ChainSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ChainSelector {
    fn from(selector: u64) -> Self {
        ChainSelector(selector)
    }
}

/// Well-known CCIP chain selectors, keyed by their published value.
const KNOWN_SELECTORS: &[(u64, &str)] = &[
    (5_009_297_550_715_157_269, "ethereum-mainnet"),
    (4_949_039_107_694_359_620, "arbitrum-mainnet"),
    (3_734_403_246_176_062_136, "optimism-mainnet"),
    (4_051_577_828_743_386_545, "polygon-mainnet"),
    (6_433_500_567_565_415_381, "avalanche-mainnet"),
    (11_344_663_589_394_136_015, "bsc-mainnet"),
    (15_971_525_489_660_198_786, "base-mainnet"),
];

/// Resolve a selector to the name of the well-known chain it identifies, if
/// this selector is one the crate recognises.
pub fn lookup_name(selector: u64) -> Option<&'static str> {
    KNOWN_SELECTORS
        .iter()
        .find(|(sel, _)| *sel == selector)
        .map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_selector_resolves_by_name() {
        let sel = ChainSelector::from_u64(5_009_297_550_715_157_269);
        assert_eq!(sel.known_name(), Some("ethereum-mainnet"));
    }

    #[test]
    fn unknown_selector_resolves_to_none() {
        let sel = ChainSelector::from_u64(1);
        assert_eq!(sel.known_name(), None);
    }

    #[test]
    fn display_shows_raw_value() {
        let sel = ChainSelector::from_u64(42);
        assert_eq!(format!("{}", sel), "42");
    }
}
