//! Polymorphic cross-chain address canonicalisation.
//!
//! CCIP addresses are 20 bytes (EVM), 32 bytes (Solana, Aptos, Sui), or up to
//! a small bound for long-address families (e.g. 36 bytes for TON). Every
//! family collapses to the same canonical encoding rule: left-padded 32
//! bytes when the raw address is 32 bytes or shorter, otherwise the raw
//! bytes unchanged.

use crate::error::CcipCoreError;
use crate::primitives::pad_left_32;
use serde::{Deserialize, Serialize};

/// Upper bound on raw address length across all known destination families.
pub const MAX_ADDRESS_LEN: usize = 36;

/// The chain family an [`Address`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressFamily {
    Evm,
    Svm,
    Aptos,
    Sui,
    Ton,
}

impl AddressFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressFamily::Evm => "evm",
            AddressFamily::Svm => "svm",
            AddressFamily::Aptos => "aptos",
            AddressFamily::Sui => "sui",
            AddressFamily::Ton => "ton",
        }
    }
}

/// A family-tagged address, stored in its native byte width.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    family: AddressFamily,
    raw: Vec<u8>,
}

impl Address {
    /// Build an address, enforcing the family's length bound.
    pub fn new(family: AddressFamily, raw: Vec<u8>) -> Result<Self, CcipCoreError> {
        if raw.is_empty() || raw.len() > MAX_ADDRESS_LEN {
            return Err(CcipCoreError::AddressInvalid { raw_len: raw.len() });
        }
        Ok(Self { family, raw })
    }

    pub fn evm(bytes: [u8; 20]) -> Self {
        Self {
            family: AddressFamily::Evm,
            raw: bytes.to_vec(),
        }
    }

    pub fn svm(bytes: [u8; 32]) -> Self {
        Self {
            family: AddressFamily::Svm,
            raw: bytes.to_vec(),
        }
    }

    pub fn aptos(bytes: [u8; 32]) -> Self {
        Self {
            family: AddressFamily::Aptos,
            raw: bytes.to_vec(),
        }
    }

    pub fn sui(bytes: [u8; 32]) -> Self {
        Self {
            family: AddressFamily::Sui,
            raw: bytes.to_vec(),
        }
    }

    /// Parse a 0x-prefixed EVM address hex string into an [`Address`].
    pub fn parse_evm(addr: &str) -> Result<Self, CcipCoreError> {
        let hex_str = addr.strip_prefix("0x").unwrap_or(addr);
        let bytes = hex::decode(hex_str).map_err(|_| CcipCoreError::AddressInvalid {
            raw_len: hex_str.len() / 2,
        })?;
        if bytes.len() != 20 {
            return Err(CcipCoreError::AddressInvalid {
                raw_len: bytes.len(),
            });
        }
        let mut out = [0u8; 20];
        out.copy_from_slice(&bytes);
        Ok(Self::evm(out))
    }

    /// Encode a 20-byte EVM address as a `0x`-prefixed hex string.
    pub fn to_evm_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.raw))
    }

    pub fn family(&self) -> AddressFamily {
        self.family
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Canonical bytes used inside a leaf hash: left-padded to 32 bytes when
    /// `len() <= 32`, else the raw bytes unchanged.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, CcipCoreError> {
        if self.raw.len() <= 32 {
            Ok(pad_left_32(&self.raw)?.to_vec())
        } else {
            Ok(self.raw.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evm_address_parses_20_bytes() {
        let good = Address::parse_evm("0xfd04bd4cf2e51ed6c57183768d270539127b9143").unwrap();
        assert_eq!(good.len(), 20);
        assert_eq!(good.family(), AddressFamily::Evm);
        assert_eq!(good.to_evm_hex(), "0xfd04bd4cf2e51ed6c57183768d270539127b9143");
    }

    #[test]
    fn evm_address_rejects_wrong_length() {
        // 32-byte padded address: 64 hex chars, not a valid 20-byte EVM address.
        let err = Address::parse_evm(
            "0x000000000000000000000000f39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
        );
        assert!(err.is_err());
    }

    #[test]
    fn canonical_bytes_pads_short_addresses() {
        let addr = Address::evm([0x11; 20]);
        let canonical = addr.canonical_bytes().unwrap();
        assert_eq!(canonical.len(), 32);
        assert!(canonical[..12].iter().all(|&b| b == 0));
        assert_eq!(&canonical[12..], &[0x11; 20]);
    }

    #[test]
    fn canonical_bytes_leaves_long_addresses_raw() {
        let long = Address::new(AddressFamily::Ton, vec![0x42; 36]).unwrap();
        let canonical = long.canonical_bytes().unwrap();
        assert_eq!(canonical, vec![0x42; 36]);
    }

    #[test]
    fn new_rejects_oversized_addresses() {
        let err = Address::new(AddressFamily::Ton, vec![0u8; MAX_ADDRESS_LEN + 1]);
        assert!(err.is_err());
    }

    #[test]
    fn thirty_two_byte_families_pad_to_themselves() {
        let svm = Address::svm([0x77; 32]);
        let canonical = svm.canonical_bytes().unwrap();
        assert_eq!(canonical, vec![0x77; 32]);
    }
}
