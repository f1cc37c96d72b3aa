//! Fixed-width integer and variable-bytes encoders, keccak-256, and ABI-style
//! tuple encoding shared by the leaf hashers and the ExtraArgs codec.

use crate::error::CcipCoreError;
use alloy::dyn_abi::DynSolValue;
use alloy::primitives::U256;
use tiny_keccak::{Hasher, Keccak};

/// Ethereum's keccak-256 (NOT SHA3-256).
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Big-endian 256-bit unsigned encoding of `n`.
pub fn encode_u256_be(n: U256) -> [u8; 32] {
    n.to_be_bytes::<32>()
}

/// Big-endian 256-bit unsigned encoding of a `u64`, zero-extended.
pub fn encode_u64_as_u256_be(n: u64) -> [u8; 32] {
    encode_u256_be(U256::from(n))
}

/// Left-pad `bytes` with zeros to 32 bytes. Fails if `bytes` is longer than 32.
pub fn pad_left_32(bytes: &[u8]) -> Result<[u8; 32], CcipCoreError> {
    if bytes.len() > 32 {
        return Err(CcipCoreError::AddressInvalid {
            raw_len: bytes.len(),
        });
    }
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(bytes);
    Ok(out)
}

/// Length-prefixed, right-zero-padded encoding of `b`:
/// `u256_be(b.len()) || b || zeros_to_32_boundary(b.len())`.
///
/// This is the ABI "tail" without the head offset — NOT the ABI
/// offset-based dynamic-bytes encoding.
pub fn encode_raw_bytes(b: &[u8]) -> Vec<u8> {
    let padded_len = b.len().div_ceil(32) * 32;
    let mut out = Vec::with_capacity(32 + padded_len);
    out.extend_from_slice(&encode_u256_be(U256::from(b.len())));
    out.extend_from_slice(b);
    out.resize(32 + padded_len, 0);
    out
}

/// Standard Ethereum ABI encoding of a tuple of dynamically-typed values.
///
/// Used only by the V1_2/V1_5 leaf hashers and the EVM ExtraArgs codec,
/// which need the full head/tail ABI layout (offsets for dynamic members).
pub fn abi_encode_tuple(values: Vec<DynSolValue>) -> Vec<u8> {
    DynSolValue::Tuple(values).abi_encode()
}
