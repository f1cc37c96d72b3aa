//! Lane descriptor: the directed source -> destination channel a batch of
//! messages travels over.

use crate::address::{Address, AddressFamily};
use serde::{Deserialize, Serialize};

/// CCIP protocol version a lane speaks. V1_2 and V1_5 are a deprecated
/// superset kept for read-only hashing compatibility; V1_6 is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Version {
    V1_2,
    V1_5,
    V1_6,
}

impl Version {
    pub fn as_str(&self) -> &'static str {
        match self {
            Version::V1_2 => "v1_2",
            Version::V1_5 => "v1_5",
            Version::V1_6 => "v1_6",
        }
    }
}

/// Identifies a source -> destination directed channel. Immutable value type.
///
/// `destination_family` selects which leaf-hashing scheme applies alongside
/// `version`; the distilled spec this crate implements does not specify a
/// selector-to-family mapping, so the lane carries the family explicitly
/// rather than have the hasher guess it from `dest_chain_selector` (see
/// DESIGN.md).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lane {
    pub source_chain_selector: u64,
    pub dest_chain_selector: u64,
    pub on_ramp: Address,
    pub version: Version,
    pub destination_family: AddressFamily,
}

impl Lane {
    pub fn new(
        source_chain_selector: u64,
        dest_chain_selector: u64,
        on_ramp: Address,
        version: Version,
        destination_family: AddressFamily,
    ) -> Self {
        Self {
            source_chain_selector,
            dest_chain_selector,
            on_ramp,
            version,
            destination_family,
        }
    }
}
