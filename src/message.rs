//! Message, token-amount, commit-report and execution-report data model.
//!
//! `Message` is modelled as a sum type keyed on `(family, version)` per the
//! "Duck-typed Message variants" design note: V1_2/V1_5 messages are EVM-only
//! and keep their original fixed/tokens/source-token-data shape; V1_6
//! messages carry a family-polymorphic sender/receiver and the fields some
//! sources pre-decode from `extraArgs` (`gas_limit`, `token_receiver`) so the
//! leaf hasher stays a total function.

use crate::address::Address;
use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

/// Fields common to every CCIP message, independent of protocol version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHeader {
    pub message_id: [u8; 32],
    pub source_chain_selector: u64,
    pub dest_chain_selector: u64,
    pub sequence_number: u64,
    pub nonce: u64,
}

/// A single token transfer leg of a V1_6 message.
///
/// `source_pool_address` is always padded to 32 bytes in the leaf regardless
/// of source family (see §4.3.2).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAmount {
    pub source_pool_address: Address,
    pub dest_token_address: Address,
    pub dest_gas_amount: u32,
    pub extra_data: Vec<u8>,
    pub amount: U256,
}

/// Legacy `(address, uint256)` token transfer leg used by V1_2/V1_5 messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyTokenAmount {
    pub token: Address,
    pub amount: U256,
}

/// A V1_2/V1_5 EVM-to-EVM message (deprecated superset, read-only hashing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageV1Legacy {
    pub header: MessageHeader,
    pub sender: Address,
    pub receiver: Address,
    pub data: Vec<u8>,
    pub token_amounts: Vec<LegacyTokenAmount>,
    /// Opaque per-token source data; semantics for post-V1_6 migration
    /// traffic are ambiguous upstream (see DESIGN.md) — passed through as-is.
    pub source_token_data: Vec<Vec<u8>>,
    pub gas_limit: U256,
    pub strict: bool,
    pub fee_token: Address,
    pub fee_token_amount: U256,
}

/// A V1_6 message, family-polymorphic on sender/receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageV1_6 {
    pub header: MessageHeader,
    pub sender: Address,
    pub receiver: Address,
    pub data: Vec<u8>,
    pub token_amounts: Vec<TokenAmount>,
    /// Raw tagged `extraArgs` bytes, as observed on the source chain.
    pub extra_args: Vec<u8>,
    /// Pre-decoded gas limit for sources that decode `extraArgs` off-message
    /// (non-EVM sources). `None` means the hasher must decode it from
    /// `extra_args` itself (EVM sources).
    pub gas_limit: Option<U256>,
    /// Pre-decoded Sui token receiver, present only when destination is Sui.
    pub token_receiver: Option<[u8; 32]>,
}

/// A decoded CCIP message, keyed by `(family, version)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    Legacy(MessageV1Legacy),
    V1_6(MessageV1_6),
}

impl Message {
    pub fn header(&self) -> &MessageHeader {
        match self {
            Message::Legacy(m) => &m.header,
            Message::V1_6(m) => &m.header,
        }
    }

    pub fn message_id(&self) -> [u8; 32] {
        self.header().message_id
    }

    pub fn sequence_number(&self) -> u64 {
        self.header().sequence_number
    }
}

/// Commit report observed on the destination chain: the merkle root
/// attesting to a batch of messages in a sequence-number window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReport {
    pub source_chain_selector: u64,
    pub on_ramp_address: Address,
    pub min_seq_nr: u64,
    pub max_seq_nr: u64,
    pub merkle_root: [u8; 32],
}

/// Manual execution payload: a message plus the multi-proof authenticating
/// it against `merkle_root`, bundled with opaque offchain token data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub message: Message,
    pub proofs: Vec<[u8; 32]>,
    pub proof_flag_bits: U256,
    pub merkle_root: [u8; 32],
    pub offchain_token_data: Vec<Vec<u8>>,
}
