//! ccip-core: pure, synchronous CCIP message canonicalisation and proof core.
//!
//! This crate canonicalises CCIP messages into bit-exact leaf hashes,
//! assembles those leaves into a sparse multi-proof binary merkle tree, and
//! produces the manual-execution-report payload an offRamp's
//! `manuallyExecute` entrypoint consumes.
//!
//! - **Address** - polymorphic cross-chain address canonicalisation
//! - **ExtraArgs** - versioned, tag-prefixed `extraArgs` codec
//! - **Leaf hashing** - per-(destination family, protocol version) leaf hashers
//! - **Merkle** - sparse multi-proof binary merkle tree
//! - **Assembler** - manual execution report assembly
//!
//! Deliberately out of scope: RPC/chain adapters, wallet signing, fee
//! quoting, gas estimation, token-registry discovery, attestation fetching,
//! and transaction submission. This crate only canonicalises and proves.

pub mod address;
pub mod assembler;
pub mod error;
pub mod extra_args;
pub mod lane;
pub mod leaf_hasher;
pub mod merkle;
pub mod message;
pub mod primitives;
pub mod selector;

pub use address::{Address, AddressFamily, MAX_ADDRESS_LEN};
pub use assembler::{calculate_manual_exec_proof, hash_leaves, ManualExecProof};
pub use error::CcipCoreError;
pub use extra_args::{decode as decode_extra_args, encode as encode_extra_args, ExtraArgs, ExtraArgsFamily};
pub use lane::{Lane, Version};
pub use leaf_hasher::{leaf_hasher, LeafHasherFn};
pub use merkle::{hash_internal, proof_flags_to_bits, verify_compute_root, MerkleTree, Proof, MAX_NUMBER_TREE_LEAVES, ZERO_HASH};
pub use message::{
    CommitReport, ExecutionReport, LegacyTokenAmount, Message, MessageHeader, MessageV1Legacy,
    MessageV1_6, TokenAmount,
};
pub use primitives::keccak256;
pub use selector::{lookup_name, ChainSelector};
