//! Versioned, tag-prefixed `extraArgs` codec.
//!
//! Every variant is prefixed by a 4-byte tag: the first 4 bytes of
//! `keccak256` of a literal ASCII string. The payload encoding then depends
//! on which family is doing the decoding — EVM decodes/encodes the
//! Solidity ABI layout, while Aptos/Sui/Solana destinations carry a fixed
//! little-endian binary layout instead.

use crate::error::CcipCoreError;
use crate::primitives::{abi_encode_tuple, keccak256};
use alloy::dyn_abi::DynSolValue;
use alloy::primitives::U256;
use std::sync::LazyLock;

/// Family whose encoding flavour applies to an ExtraArgs payload (ABI for
/// EVM, little-endian fixed binary otherwise).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtraArgsFamily {
    Evm,
    Svm,
    Aptos,
    Sui,
}

impl ExtraArgsFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtraArgsFamily::Evm => "evm",
            ExtraArgsFamily::Svm => "svm",
            ExtraArgsFamily::Aptos => "aptos",
            ExtraArgsFamily::Sui => "sui",
        }
    }
}

/// Decoded ExtraArgs payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtraArgs {
    EvmV1 {
        gas_limit: U256,
    },
    EvmV2 {
        gas_limit: U256,
        allow_out_of_order_execution: bool,
    },
    SvmV1 {
        compute_units: u32,
        account_is_writable_bitmap: u64,
        allow_out_of_order_execution: bool,
        token_receiver: [u8; 32],
        accounts: Vec<[u8; 32]>,
    },
    SuiV1 {
        gas_limit: U256,
        allow_out_of_order_execution: bool,
        token_receiver: [u8; 32],
    },
}

fn tag_of(literal: &str) -> [u8; 4] {
    let digest = keccak256(literal.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

static TAG_EVM_V1: LazyLock<[u8; 4]> = LazyLock::new(|| tag_of("CCIP EVMExtraArgsV1"));
static TAG_EVM_V2: LazyLock<[u8; 4]> = LazyLock::new(|| tag_of("CCIP EVMExtraArgsV2"));
static TAG_SVM_V1: LazyLock<[u8; 4]> = LazyLock::new(|| tag_of("CCIP SVMExtraArgsV1"));
static TAG_SUI_V1: LazyLock<[u8; 4]> = LazyLock::new(|| tag_of("CCIP SuiExtraArgsV1"));

/// Tag bytes for each known ExtraArgs variant.
pub fn evm_v1_tag() -> [u8; 4] {
    *TAG_EVM_V1
}
pub fn evm_v2_tag() -> [u8; 4] {
    *TAG_EVM_V2
}
pub fn svm_v1_tag() -> [u8; 4] {
    *TAG_SVM_V1
}
pub fn sui_v1_tag() -> [u8; 4] {
    *TAG_SUI_V1
}

fn invalid(family: ExtraArgsFamily, raw: &[u8]) -> CcipCoreError {
    CcipCoreError::ExtraArgsInvalid {
        family: family.as_str().to_string(),
        raw_len: raw.len(),
    }
}

/// Decode a tagged `extraArgs` payload. `family` selects the encoding
/// flavour used to interpret the bytes following the 4-byte tag.
pub fn decode(raw: &[u8], family: ExtraArgsFamily) -> Result<ExtraArgs, CcipCoreError> {
    if raw.len() < 4 {
        return Err(invalid(family, raw));
    }
    let tag: [u8; 4] = raw[0..4].try_into().unwrap();
    let payload = &raw[4..];

    match (tag, family) {
        (t, ExtraArgsFamily::Evm) if t == evm_v1_tag() => decode_evm_v1_abi(payload, family),
        (t, ExtraArgsFamily::Evm) if t == evm_v2_tag() => decode_evm_v2_abi(payload, family),
        // Aptos observes a fixed-width EVMExtraArgsV2 variant: 32-byte LE
        // gasLimit followed by a 1-byte allowOutOfOrderExecution flag.
        (t, ExtraArgsFamily::Aptos) if t == evm_v2_tag() => {
            if payload.len() != 33 {
                return Err(invalid(family, raw));
            }
            let mut gas_limit_le = [0u8; 32];
            gas_limit_le.copy_from_slice(&payload[0..32]);
            Ok(ExtraArgs::EvmV2 {
                gas_limit: U256::from_le_bytes(gas_limit_le),
                allow_out_of_order_execution: payload[32] != 0,
            })
        }
        (t, ExtraArgsFamily::Svm) if t == svm_v1_tag() => decode_svm_v1_full(payload, family),
        // Aptos observes a truncated SVMExtraArgsV1 variant: 8-byte LE
        // computeUnits followed by a 1-byte allowOutOfOrderExecution flag;
        // the remaining fields are not carried in this variant.
        (t, ExtraArgsFamily::Aptos) if t == svm_v1_tag() => {
            if payload.len() != 9 {
                return Err(invalid(family, raw));
            }
            let mut compute_units_le = [0u8; 8];
            compute_units_le.copy_from_slice(&payload[0..8]);
            let compute_units_u64 = u64::from_le_bytes(compute_units_le);
            let compute_units = u32::try_from(compute_units_u64)
                .map_err(|_| invalid(family, raw))?;
            Ok(ExtraArgs::SvmV1 {
                compute_units,
                account_is_writable_bitmap: 0,
                allow_out_of_order_execution: payload[8] != 0,
                token_receiver: [0u8; 32],
                accounts: Vec::new(),
            })
        }
        (t, ExtraArgsFamily::Sui) if t == sui_v1_tag() => decode_sui_v1(payload, family),
        _ => Err(invalid(family, raw)),
    }
}

fn decode_evm_v1_abi(payload: &[u8], family: ExtraArgsFamily) -> Result<ExtraArgs, CcipCoreError> {
    if payload.len() != 32 {
        return Err(invalid(family, payload));
    }
    let mut be = [0u8; 32];
    be.copy_from_slice(payload);
    Ok(ExtraArgs::EvmV1 {
        gas_limit: U256::from_be_bytes(be),
    })
}

fn decode_evm_v2_abi(payload: &[u8], family: ExtraArgsFamily) -> Result<ExtraArgs, CcipCoreError> {
    if payload.len() != 64 {
        return Err(invalid(family, payload));
    }
    let mut gas_be = [0u8; 32];
    gas_be.copy_from_slice(&payload[0..32]);
    let bool_word = &payload[32..64];
    if bool_word[..31].iter().any(|&b| b != 0) || (bool_word[31] != 0 && bool_word[31] != 1) {
        return Err(invalid(family, payload));
    }
    Ok(ExtraArgs::EvmV2 {
        gas_limit: U256::from_be_bytes(gas_be),
        allow_out_of_order_execution: bool_word[31] == 1,
    })
}

fn decode_svm_v1_full(payload: &[u8], family: ExtraArgsFamily) -> Result<ExtraArgs, CcipCoreError> {
    // compute_units(u32 LE) || bitmap(u64 LE) || allow_ooo(1) || token_receiver(32)
    // || account_count(u32 LE) || accounts(32 * count)
    const HEADER_LEN: usize = 4 + 8 + 1 + 32 + 4;
    if payload.len() < HEADER_LEN {
        return Err(invalid(family, payload));
    }
    let compute_units = u32::from_le_bytes(payload[0..4].try_into().unwrap());
    let account_is_writable_bitmap = u64::from_le_bytes(payload[4..12].try_into().unwrap());
    let allow_out_of_order_execution = payload[12] != 0;
    let mut token_receiver = [0u8; 32];
    token_receiver.copy_from_slice(&payload[13..45]);
    let account_count = u32::from_le_bytes(payload[45..49].try_into().unwrap()) as usize;

    let expected_len = HEADER_LEN + account_count * 32;
    if payload.len() != expected_len {
        return Err(invalid(family, payload));
    }
    let mut accounts = Vec::with_capacity(account_count);
    for i in 0..account_count {
        let start = HEADER_LEN + i * 32;
        let mut account = [0u8; 32];
        account.copy_from_slice(&payload[start..start + 32]);
        accounts.push(account);
    }

    Ok(ExtraArgs::SvmV1 {
        compute_units,
        account_is_writable_bitmap,
        allow_out_of_order_execution,
        token_receiver,
        accounts,
    })
}

fn decode_sui_v1(payload: &[u8], family: ExtraArgsFamily) -> Result<ExtraArgs, CcipCoreError> {
    if payload.len() != 65 {
        return Err(invalid(family, payload));
    }
    let mut gas_le = [0u8; 32];
    gas_le.copy_from_slice(&payload[0..32]);
    let allow_out_of_order_execution = payload[32] != 0;
    let mut token_receiver = [0u8; 32];
    token_receiver.copy_from_slice(&payload[33..65]);
    Ok(ExtraArgs::SuiV1 {
        gas_limit: U256::from_le_bytes(gas_le),
        allow_out_of_order_execution,
        token_receiver,
    })
}

/// Encode an ExtraArgs value for the given family. Only the combinations the
/// upstream SDK actually exercises are supported — encoding an `SvmV1`
/// payload for `Aptos`, for instance, has no defined wire format and fails.
pub fn encode(args: &ExtraArgs, family: ExtraArgsFamily) -> Result<Vec<u8>, CcipCoreError> {
    match (args, family) {
        (ExtraArgs::EvmV1 { gas_limit }, ExtraArgsFamily::Evm) => {
            let mut out = evm_v1_tag().to_vec();
            out.extend_from_slice(&abi_encode_tuple(vec![DynSolValue::Uint(*gas_limit, 256)]));
            Ok(out)
        }
        (
            ExtraArgs::EvmV2 {
                gas_limit,
                allow_out_of_order_execution,
            },
            ExtraArgsFamily::Evm,
        ) => {
            let mut out = evm_v2_tag().to_vec();
            out.extend_from_slice(&abi_encode_tuple(vec![
                DynSolValue::Uint(*gas_limit, 256),
                DynSolValue::Bool(*allow_out_of_order_execution),
            ]));
            Ok(out)
        }
        (
            ExtraArgs::SvmV1 {
                compute_units,
                account_is_writable_bitmap,
                allow_out_of_order_execution,
                token_receiver,
                accounts,
            },
            ExtraArgsFamily::Svm,
        ) => {
            let mut out = svm_v1_tag().to_vec();
            out.extend_from_slice(&compute_units.to_le_bytes());
            out.extend_from_slice(&account_is_writable_bitmap.to_le_bytes());
            out.push(u8::from(*allow_out_of_order_execution));
            out.extend_from_slice(token_receiver);
            out.extend_from_slice(&(accounts.len() as u32).to_le_bytes());
            for account in accounts {
                out.extend_from_slice(account);
            }
            Ok(out)
        }
        (
            ExtraArgs::SuiV1 {
                gas_limit,
                allow_out_of_order_execution,
                token_receiver,
            },
            ExtraArgsFamily::Sui,
        ) => {
            let mut out = sui_v1_tag().to_vec();
            out.extend_from_slice(&gas_limit.to_le_bytes::<32>());
            out.push(u8::from(*allow_out_of_order_execution));
            out.extend_from_slice(token_receiver);
            Ok(out)
        }
        _ => Err(CcipCoreError::ExtraArgsInvalid {
            family: family.as_str().to_string(),
            raw_len: 0,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evm_v1_roundtrips() {
        let args = ExtraArgs::EvmV1 {
            gas_limit: U256::from(200_000u64),
        };
        let encoded = encode(&args, ExtraArgsFamily::Evm).unwrap();
        assert_eq!(&encoded[0..4], &evm_v1_tag());
        let decoded = decode(&encoded, ExtraArgsFamily::Evm).unwrap();
        assert_eq!(decoded, args);
    }

    #[test]
    fn evm_v2_roundtrips() {
        let args = ExtraArgs::EvmV2 {
            gas_limit: U256::from(500_000u64),
            allow_out_of_order_execution: true,
        };
        let encoded = encode(&args, ExtraArgsFamily::Evm).unwrap();
        let decoded = decode(&encoded, ExtraArgsFamily::Evm).unwrap();
        assert_eq!(decoded, args);
    }

    #[test]
    fn svm_v1_roundtrips_with_accounts() {
        let args = ExtraArgs::SvmV1 {
            compute_units: 1_400_000,
            account_is_writable_bitmap: 0b101,
            allow_out_of_order_execution: false,
            token_receiver: [0x11; 32],
            accounts: vec![[0x22; 32], [0x33; 32]],
        };
        let encoded = encode(&args, ExtraArgsFamily::Svm).unwrap();
        let decoded = decode(&encoded, ExtraArgsFamily::Svm).unwrap();
        assert_eq!(decoded, args);
    }

    #[test]
    fn sui_v1_roundtrips() {
        let args = ExtraArgs::SuiV1 {
            gas_limit: U256::from(1_000_000u64),
            allow_out_of_order_execution: true,
            token_receiver: [0xaa; 32],
        };
        let encoded = encode(&args, ExtraArgsFamily::Sui).unwrap();
        let decoded = decode(&encoded, ExtraArgsFamily::Sui).unwrap();
        assert_eq!(decoded, args);
    }

    #[test]
    fn aptos_evm_v2_variant_decodes_37_bytes() {
        let mut raw = evm_v2_tag().to_vec();
        raw.extend_from_slice(&U256::from(42u64).to_le_bytes::<32>());
        raw.push(1);
        assert_eq!(raw.len(), 37);
        let decoded = decode(&raw, ExtraArgsFamily::Aptos).unwrap();
        assert_eq!(
            decoded,
            ExtraArgs::EvmV2 {
                gas_limit: U256::from(42u64),
                allow_out_of_order_execution: true,
            }
        );
    }

    #[test]
    fn aptos_svm_v1_variant_decodes_13_bytes() {
        let mut raw = svm_v1_tag().to_vec();
        raw.extend_from_slice(&7_000u64.to_le_bytes());
        raw.push(0);
        assert_eq!(raw.len(), 13);
        let decoded = decode(&raw, ExtraArgsFamily::Aptos).unwrap();
        assert_eq!(
            decoded,
            ExtraArgs::SvmV1 {
                compute_units: 7_000,
                account_is_writable_bitmap: 0,
                allow_out_of_order_execution: false,
                token_receiver: [0u8; 32],
                accounts: Vec::new(),
            }
        );
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let raw = vec![0xde, 0xad, 0xbe, 0xef, 0, 0];
        assert!(decode(&raw, ExtraArgsFamily::Evm).is_err());
    }

    #[test]
    fn truncated_payload_is_rejected() {
        let mut raw = evm_v1_tag().to_vec();
        raw.extend_from_slice(&[0u8; 10]);
        assert!(decode(&raw, ExtraArgsFamily::Evm).is_err());
    }

    #[test]
    fn asymmetric_encode_combination_is_rejected() {
        let args = ExtraArgs::SvmV1 {
            compute_units: 1,
            account_is_writable_bitmap: 0,
            allow_out_of_order_execution: false,
            token_receiver: [0u8; 32],
            accounts: Vec::new(),
        };
        assert!(encode(&args, ExtraArgsFamily::Aptos).is_err());
    }
}
