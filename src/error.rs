//! Error types for the CCIP message hashing and merkle-proof core

use thiserror::Error;

/// Errors produced by the core. Every failure mode is a typed variant —
/// callers match on these rather than parsing strings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CcipCoreError {
    #[error("extra args invalid for family {family}: {raw_len} raw bytes")]
    ExtraArgsInvalid { family: String, raw_len: usize },

    #[error("address invalid: {raw_len} bytes exceeds family bound")]
    AddressInvalid { raw_len: usize },

    #[error("no leaf hasher for destination family {family:?}, version {version:?}")]
    HasherVersionUnsupported { family: String, version: String },

    #[error("message {target} not found in batch (sequence window [{min_seq}, {max_seq}])")]
    MessageNotInBatch {
        target: String,
        min_seq: u64,
        max_seq: u64,
    },

    #[error("merkle root mismatch: expected {expected}, computed {computed}")]
    MerkleRootMismatch { expected: String, computed: String },

    #[error("proof malformed: {reason}")]
    ProofMalformed { reason: String },

    #[error("empty tree: zero leaves presented")]
    EmptyTree,

    #[error("too many leaves: {count} exceeds maximum of {max}")]
    TooManyLeaves { count: usize, max: usize },
}
