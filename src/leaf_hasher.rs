//! Per-(destination-family x version) pure leaf hashing.
//!
//! [`leaf_hasher`] binds a lane's pre-computed `metadataHash` once and
//! returns a closure that turns a decoded [`Message`] into its 32-byte leaf
//! hash — the bit-exact value on-chain verifier contracts expect. Equal
//! messages under equal lanes always produce equal leaves.

use crate::address::{Address, AddressFamily};
use crate::error::CcipCoreError;
use crate::extra_args::{self, ExtraArgs, ExtraArgsFamily};
use crate::lane::{Lane, Version};
use crate::message::{Message, MessageV1_6, TokenAmount};
use crate::primitives::{
    encode_raw_bytes, encode_u256_be, encode_u64_as_u256_be, keccak256, pad_left_32,
};
use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address as AlloyAddress, U256};

/// A leaf-hashing function bound to a single lane's pre-computed metadata.
pub type LeafHasherFn = Box<dyn Fn(&Message) -> Result<[u8; 32], CcipCoreError> + Send + Sync>;

/// Select and build the leaf hasher for `lane`. The returned closure
/// precomputes nothing further per call beyond what's already captured —
/// hashing a message is `O(|message|)`.
pub fn leaf_hasher(lane: &Lane) -> Result<LeafHasherFn, CcipCoreError> {
    match (lane.version, lane.destination_family) {
        (Version::V1_2, AddressFamily::Evm) | (Version::V1_5, AddressFamily::Evm) => {
            let metadata_hash = legacy_metadata_hash(lane, b"EVM2EVMMessageHashV2")?;
            Ok(Box::new(move |message| hash_leaf_legacy(message, metadata_hash)))
        }
        (Version::V1_6, AddressFamily::Evm) => {
            let metadata_hash = v1_6_evm_metadata_hash(lane)?;
            Ok(Box::new(move |message| hash_leaf_v1_6_evm(message, metadata_hash)))
        }
        (Version::V1_6, AddressFamily::Aptos) => {
            let metadata_hash = v1_6_non_evm_metadata_hash(lane, b"Any2AptosMessageHashV1")?;
            Ok(Box::new(move |message| hash_leaf_v1_6_aptos(message, metadata_hash)))
        }
        (Version::V1_6, AddressFamily::Sui) => {
            let metadata_hash = v1_6_non_evm_metadata_hash(lane, b"Any2SuiMessageHashV1")?;
            Ok(Box::new(move |message| hash_leaf_v1_6_sui(message, metadata_hash)))
        }
        (version, family) => Err(CcipCoreError::HasherVersionUnsupported {
            family: family.as_str().to_string(),
            version: version.as_str().to_string(),
        }),
    }
}

fn legacy_metadata_hash(lane: &Lane, tag_literal: &[u8]) -> Result<[u8; 32], CcipCoreError> {
    let mut buf = Vec::with_capacity(128);
    buf.extend_from_slice(&keccak256(tag_literal));
    buf.extend_from_slice(&encode_u64_as_u256_be(lane.source_chain_selector));
    buf.extend_from_slice(&encode_u64_as_u256_be(lane.dest_chain_selector));
    buf.extend_from_slice(&pad_left_32(lane.on_ramp.raw())?);
    Ok(keccak256(&buf))
}

fn v1_6_evm_metadata_hash(lane: &Lane) -> Result<[u8; 32], CcipCoreError> {
    let on_ramp_for_hash = lane.on_ramp.canonical_bytes()?;
    let mut buf = Vec::with_capacity(128);
    buf.extend_from_slice(&keccak256(b"Any2EVMMessageHashV1"));
    buf.extend_from_slice(&encode_u64_as_u256_be(lane.source_chain_selector));
    buf.extend_from_slice(&encode_u64_as_u256_be(lane.dest_chain_selector));
    buf.extend_from_slice(&keccak256(&on_ramp_for_hash));
    Ok(keccak256(&buf))
}

fn v1_6_non_evm_metadata_hash(lane: &Lane, tag_literal: &[u8]) -> Result<[u8; 32], CcipCoreError> {
    let mut buf = Vec::with_capacity(128);
    buf.extend_from_slice(&keccak256(tag_literal));
    buf.extend_from_slice(&encode_u64_as_u256_be(lane.source_chain_selector));
    buf.extend_from_slice(&encode_u64_as_u256_be(lane.dest_chain_selector));
    buf.extend_from_slice(&keccak256(lane.on_ramp.raw()));
    Ok(keccak256(&buf))
}

fn evm_address(addr: &Address) -> Result<AlloyAddress, CcipCoreError> {
    let raw = addr.raw();
    if raw.len() != 20 {
        return Err(CcipCoreError::AddressInvalid { raw_len: raw.len() });
    }
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(raw);
    Ok(AlloyAddress::from(bytes))
}

fn wrong_variant(family: &str, version: &str) -> CcipCoreError {
    CcipCoreError::HasherVersionUnsupported {
        family: family.to_string(),
        version: version.to_string(),
    }
}

// ---------------------------------------------------------------------
// V1_2 / V1_5 (EVM destination)
// ---------------------------------------------------------------------

fn hash_leaf_legacy(message: &Message, metadata_hash: [u8; 32]) -> Result<[u8; 32], CcipCoreError> {
    let m = match message {
        Message::Legacy(m) => m,
        Message::V1_6(_) => return Err(wrong_variant("evm", "v1_2_or_v1_5")),
    };

    let fixed_tuple = DynSolValue::Tuple(vec![
        DynSolValue::Address(evm_address(&m.sender)?),
        DynSolValue::Address(evm_address(&m.receiver)?),
        DynSolValue::Uint(U256::from(m.header.sequence_number), 64),
        DynSolValue::Uint(m.gas_limit, 256),
        DynSolValue::Bool(m.strict),
        DynSolValue::Uint(U256::from(m.header.nonce), 64),
        DynSolValue::Address(evm_address(&m.fee_token)?),
        DynSolValue::Uint(m.fee_token_amount, 256),
    ]);
    let fixed_hash = keccak256(&fixed_tuple.abi_encode());

    let data_hash = keccak256(&m.data);

    let token_tuples = m
        .token_amounts
        .iter()
        .map(|t| {
            Ok(DynSolValue::Tuple(vec![
                DynSolValue::Address(evm_address(&t.token)?),
                DynSolValue::Uint(t.amount, 256),
            ]))
        })
        .collect::<Result<Vec<_>, CcipCoreError>>()?;
    let tokens_hash = keccak256(&DynSolValue::Array(token_tuples).abi_encode());

    let source_token_data_array = DynSolValue::Array(
        m.source_token_data
            .iter()
            .map(|b| DynSolValue::Bytes(b.clone()))
            .collect(),
    );
    let source_token_data_hash = keccak256(&source_token_data_array.abi_encode());

    let mut buf = Vec::with_capacity(32 * 6);
    buf.extend_from_slice(&[0u8; 32]); // bytes1 LEAF_DOMAIN_SEPARATOR (0x00), word-padded
    buf.extend_from_slice(&metadata_hash);
    buf.extend_from_slice(&fixed_hash);
    buf.extend_from_slice(&data_hash);
    buf.extend_from_slice(&tokens_hash);
    buf.extend_from_slice(&source_token_data_hash);

    Ok(keccak256(&buf))
}

// ---------------------------------------------------------------------
// V1_6, EVM destination
// ---------------------------------------------------------------------

fn resolve_gas_limit(m: &MessageV1_6, family: ExtraArgsFamily) -> Result<U256, CcipCoreError> {
    if let Some(gas_limit) = m.gas_limit {
        return Ok(gas_limit);
    }
    match extra_args::decode(&m.extra_args, family)? {
        ExtraArgs::EvmV1 { gas_limit } => Ok(gas_limit),
        ExtraArgs::EvmV2 { gas_limit, .. } => Ok(gas_limit),
        ExtraArgs::SuiV1 { gas_limit, .. } => Ok(gas_limit),
        _ => Err(CcipCoreError::ExtraArgsInvalid {
            family: family.as_str().to_string(),
            raw_len: m.extra_args.len(),
        }),
    }
}

fn hash_leaf_v1_6_evm(message: &Message, metadata_hash: [u8; 32]) -> Result<[u8; 32], CcipCoreError> {
    let m = match message {
        Message::V1_6(m) => m,
        Message::Legacy(_) => return Err(wrong_variant("evm", "v1_6")),
    };

    let gas_limit = resolve_gas_limit(m, ExtraArgsFamily::Evm)?;

    // The messageId slot is hashed as all-zero, not `m.header.message_id`: the
    // leaf IS the messageId (see `Message`'s invariants), so a message's own
    // id can't be one of its leaf's inputs without making every id a
    // self-referential preimage search. The source chain assigns
    // `header.message_id` by hashing the message with this slot zeroed and
    // writing the result back; verifying a decoded message reproduces that
    // same computation regardless of whatever the field already holds.
    let mut fixed_buf = Vec::with_capacity(32 * 5);
    fixed_buf.extend_from_slice(&[0u8; 32]);
    fixed_buf.extend_from_slice(&pad_left_32(m.receiver.raw())?);
    fixed_buf.extend_from_slice(&encode_u64_as_u256_be(m.header.sequence_number));
    fixed_buf.extend_from_slice(&encode_u256_be(gas_limit));
    fixed_buf.extend_from_slice(&encode_u64_as_u256_be(m.header.nonce));
    let fixed_hash = keccak256(&fixed_buf);

    let sender_hash = keccak256(&m.sender.canonical_bytes()?);
    let data_hash = keccak256(&m.data);
    let tokens_hash = keccak256(&abi_encode_v1_6_token_amounts(&m.token_amounts)?);

    let mut leaf_buf = Vec::with_capacity(32 * 6);
    leaf_buf.extend_from_slice(&[0u8; 32]); // bytes32 LEAF_DOMAIN_SEPARATOR_32
    leaf_buf.extend_from_slice(&metadata_hash);
    leaf_buf.extend_from_slice(&fixed_hash);
    leaf_buf.extend_from_slice(&sender_hash);
    leaf_buf.extend_from_slice(&data_hash);
    leaf_buf.extend_from_slice(&tokens_hash);

    Ok(keccak256(&leaf_buf))
}

fn abi_encode_v1_6_token_amounts(token_amounts: &[TokenAmount]) -> Result<Vec<u8>, CcipCoreError> {
    let tuples = token_amounts
        .iter()
        .map(|t| {
            Ok(DynSolValue::Tuple(vec![
                DynSolValue::Bytes(t.source_pool_address.canonical_bytes()?),
                DynSolValue::Address(evm_address(&t.dest_token_address)?),
                DynSolValue::Uint(U256::from(t.dest_gas_amount), 32),
                DynSolValue::Bytes(t.extra_data.clone()),
                DynSolValue::Uint(t.amount, 256),
            ]))
        })
        .collect::<Result<Vec<_>, CcipCoreError>>()?;
    Ok(DynSolValue::Array(tuples).abi_encode())
}

// ---------------------------------------------------------------------
// V1_6, Aptos / Sui destinations
// ---------------------------------------------------------------------

fn raw_token_hash(token_amounts: &[TokenAmount]) -> Result<[u8; 32], CcipCoreError> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&encode_u256_be(U256::from(token_amounts.len())));
    for t in token_amounts {
        buf.extend_from_slice(&encode_raw_bytes(t.source_pool_address.raw()));
        buf.extend_from_slice(&t.dest_token_address.canonical_bytes()?);
        buf.extend_from_slice(&encode_u256_be(U256::from(t.dest_gas_amount)));
        buf.extend_from_slice(&encode_raw_bytes(&t.extra_data));
        buf.extend_from_slice(&encode_u256_be(t.amount));
    }
    Ok(keccak256(&buf))
}

fn hash_leaf_v1_6_aptos(message: &Message, metadata_hash: [u8; 32]) -> Result<[u8; 32], CcipCoreError> {
    let m = match message {
        Message::V1_6(m) => m,
        Message::Legacy(_) => return Err(wrong_variant("aptos", "v1_6")),
    };

    let gas_limit = resolve_gas_limit(m, ExtraArgsFamily::Aptos)?;

    // See hash_leaf_v1_6_evm: the messageId slot is zeroed, not taken from
    // `m.header.message_id`.
    let mut inner_buf = Vec::with_capacity(32 * 5);
    inner_buf.extend_from_slice(&[0u8; 32]);
    inner_buf.extend_from_slice(&m.receiver.canonical_bytes()?);
    inner_buf.extend_from_slice(&encode_u256_be(U256::from(m.header.sequence_number)));
    inner_buf.extend_from_slice(&encode_u256_be(gas_limit));
    inner_buf.extend_from_slice(&encode_u256_be(U256::from(m.header.nonce)));
    let inner_hash = keccak256(&inner_buf);

    let token_hash = raw_token_hash(&m.token_amounts)?;

    let mut leaf_buf = Vec::with_capacity(32 * 6);
    leaf_buf.extend_from_slice(&[0u8; 32]); // pad32(LEAF_DOMAIN_SEPARATOR)
    leaf_buf.extend_from_slice(&metadata_hash);
    leaf_buf.extend_from_slice(&inner_hash);
    leaf_buf.extend_from_slice(&keccak256(m.sender.raw()));
    leaf_buf.extend_from_slice(&keccak256(&m.data));
    leaf_buf.extend_from_slice(&token_hash);

    Ok(keccak256(&leaf_buf))
}

fn resolve_sui_fields(m: &MessageV1_6) -> Result<(U256, [u8; 32]), CcipCoreError> {
    if let (Some(gas_limit), Some(token_receiver)) = (m.gas_limit, m.token_receiver) {
        return Ok((gas_limit, token_receiver));
    }
    match extra_args::decode(&m.extra_args, ExtraArgsFamily::Sui)? {
        ExtraArgs::SuiV1 {
            gas_limit,
            token_receiver,
            ..
        } => Ok((
            m.gas_limit.unwrap_or(gas_limit),
            m.token_receiver.unwrap_or(token_receiver),
        )),
        _ => Err(CcipCoreError::ExtraArgsInvalid {
            family: ExtraArgsFamily::Sui.as_str().to_string(),
            raw_len: m.extra_args.len(),
        }),
    }
}

fn hash_leaf_v1_6_sui(message: &Message, metadata_hash: [u8; 32]) -> Result<[u8; 32], CcipCoreError> {
    let m = match message {
        Message::V1_6(m) => m,
        Message::Legacy(_) => return Err(wrong_variant("sui", "v1_6")),
    };

    let (gas_limit, token_receiver) = resolve_sui_fields(m)?;

    // See hash_leaf_v1_6_evm: the messageId slot is zeroed, not taken from
    // `m.header.message_id`.
    let mut inner_buf = Vec::with_capacity(32 * 6);
    inner_buf.extend_from_slice(&[0u8; 32]);
    inner_buf.extend_from_slice(&m.receiver.canonical_bytes()?);
    inner_buf.extend_from_slice(&encode_u256_be(U256::from(m.header.sequence_number)));
    inner_buf.extend_from_slice(&encode_u256_be(gas_limit));
    inner_buf.extend_from_slice(&pad_left_32(&token_receiver)?);
    inner_buf.extend_from_slice(&encode_u256_be(U256::from(m.header.nonce)));
    let inner_hash = keccak256(&inner_buf);

    let token_hash = raw_token_hash(&m.token_amounts)?;

    let mut leaf_buf = Vec::with_capacity(32 * 6);
    leaf_buf.extend_from_slice(&[0u8; 32]);
    leaf_buf.extend_from_slice(&metadata_hash);
    leaf_buf.extend_from_slice(&inner_hash);
    leaf_buf.extend_from_slice(&keccak256(m.sender.raw()));
    leaf_buf.extend_from_slice(&keccak256(&m.data));
    leaf_buf.extend_from_slice(&token_hash);

    Ok(keccak256(&leaf_buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;
    use crate::message::{MessageHeader, MessageV1_6};

    fn lane_v1_6_evm() -> Lane {
        Lane::new(
            3_478_487_238_524_512_106,
            16_281_711_391_670_634_445,
            Address::parse_evm("0xfd04bd4cf2e51ed6c57183768d270539127b9143").unwrap(),
            Version::V1_6,
            AddressFamily::Evm,
        )
    }

    fn base_message(message_id: [u8; 32], sender_len: usize) -> MessageV1_6 {
        MessageV1_6 {
            header: MessageHeader {
                message_id,
                source_chain_selector: 3_478_487_238_524_512_106,
                dest_chain_selector: 16_281_711_391_670_634_445,
                sequence_number: 1,
                nonce: 1,
            },
            sender: Address::new(AddressFamily::Evm, vec![0x11; sender_len]).unwrap(),
            receiver: Address::evm([0x22; 20]),
            data: vec![0xde, 0xad],
            token_amounts: vec![],
            extra_args: Vec::new(),
            gas_limit: Some(U256::from(200_000u64)),
            token_receiver: None,
        }
    }

    #[test]
    fn leaf_hash_is_total_and_32_bytes() {
        let lane = lane_v1_6_evm();
        let hasher = leaf_hasher(&lane).unwrap();
        let message = Message::V1_6(base_message([0x01; 32], 20));
        let leaf = hasher(&message).unwrap();
        assert_eq!(leaf.len(), 32);
    }

    #[test]
    fn leaf_hash_is_deterministic() {
        let lane = lane_v1_6_evm();
        let hasher = leaf_hasher(&lane).unwrap();
        let message = Message::V1_6(base_message([0x02; 32], 20));
        let a = hasher(&message).unwrap();
        let b = hasher(&message).unwrap();
        assert_eq!(a, b);
    }

    /// S2 — a V1_6 EVM message whose `messageId` was assigned, per §3's
    /// convention, as its own leaf hash re-derives that same id: the
    /// messageId slot inside the hash is always zeroed (see
    /// `hash_leaf_v1_6_evm`), so computing the leaf once yields the value the
    /// source chain would have written back as `header.message_id`, and
    /// hashing the now-fully-populated message reproduces it exactly.
    #[test]
    fn v1_6_evm_leaf_equals_its_own_assigned_message_id() {
        let lane = lane_v1_6_evm();
        let hasher = leaf_hasher(&lane).unwrap();

        let mut message = base_message([0u8; 32], 20);
        let assigned_id = hasher(&Message::V1_6(message.clone())).unwrap();
        message.header.message_id = assigned_id;

        let leaf = hasher(&Message::V1_6(message.clone())).unwrap();
        assert_eq!(leaf, message.header.message_id);
    }

    #[test]
    fn sender_length_changes_the_leaf() {
        let lane = lane_v1_6_evm();
        let hasher = leaf_hasher(&lane).unwrap();

        let short_sender = Message::V1_6(base_message([0x03; 32], 20));
        let long_sender = Message::V1_6(base_message([0x03; 32], 36));

        let leaf_short = hasher(&short_sender).unwrap();
        let leaf_long = hasher(&long_sender).unwrap();
        assert_ne!(leaf_short, leaf_long);
    }

    #[test]
    fn unsupported_destination_family_errors() {
        let lane = Lane::new(
            1,
            2,
            Address::evm([0x01; 20]),
            Version::V1_2,
            AddressFamily::Svm,
        );
        assert!(leaf_hasher(&lane).is_err());
    }

    #[test]
    fn legacy_hasher_rejects_v1_6_message() {
        let lane = Lane::new(
            1,
            2,
            Address::evm([0x01; 20]),
            Version::V1_2,
            AddressFamily::Evm,
        );
        let hasher = leaf_hasher(&lane).unwrap();
        let message = Message::V1_6(base_message([0x04; 32], 20));
        assert!(hasher(&message).is_err());
    }

    #[test]
    fn evm_destination_requires_extra_args_when_gas_limit_absent() {
        let lane = lane_v1_6_evm();
        let hasher = leaf_hasher(&lane).unwrap();
        let mut message = base_message([0x05; 32], 20);
        message.gas_limit = None;
        message.extra_args = Vec::new();
        let result = hasher(&Message::V1_6(message));
        assert!(result.is_err());
    }
}
