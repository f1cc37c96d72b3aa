//! Manual-execution-report assembly: locate a message in its batch, build
//! the batch's merkle tree, and produce the proof bundle an offRamp's
//! `manuallyExecute` entrypoint expects.

use crate::error::CcipCoreError;
use crate::lane::Lane;
use crate::leaf_hasher::leaf_hasher;
use crate::merkle::{proof_flags_to_bits, MerkleTree};
use crate::message::Message;
use alloy::primitives::U256;
use tracing::debug;

/// Everything needed to reconstruct the merkle root a target message's
/// inclusion is proven against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualExecProof {
    pub proofs: Vec<[u8; 32]>,
    pub proof_flag_bits: U256,
    pub merkle_root: [u8; 32],
}

/// Hash every message in `messages` under `lane`'s leaf-hashing scheme, in
/// order. The hasher closure is `Send + Sync`, so a caller free to
/// parallelise per-message hashing (e.g. with a thread pool) may do so as
/// long as results are reassembled in the original order — this sequential
/// implementation is the byte-for-byte reference those results must match.
pub fn hash_leaves(messages: &[Message], lane: &Lane) -> Result<Vec<[u8; 32]>, CcipCoreError> {
    let hasher = leaf_hasher(lane)?;
    messages.iter().map(|m| hasher(m)).collect()
}

/// Hash every message in `messages_in_batch` under `lane`'s leaf-hashing
/// scheme, build the batch's merkle tree, and return the multi-proof for
/// `target_message_id`.
///
/// `messages_in_batch` must be in strict on-ramp sequence-number order — the
/// same order the tree was originally built in on the source chain.
///
/// If `expected_root` is given, the computed root is compared against it and
/// a mismatch is reported before the proof is returned.
pub fn calculate_manual_exec_proof(
    messages_in_batch: &[Message],
    lane: &Lane,
    target_message_id: [u8; 32],
    expected_root: Option<[u8; 32]>,
) -> Result<ManualExecProof, CcipCoreError> {
    let target_index = messages_in_batch
        .iter()
        .position(|m| m.message_id() == target_message_id);

    let target_index = match target_index {
        Some(index) => index,
        None => {
            let min_seq = messages_in_batch
                .iter()
                .map(Message::sequence_number)
                .min()
                .unwrap_or(0);
            let max_seq = messages_in_batch
                .iter()
                .map(Message::sequence_number)
                .max()
                .unwrap_or(0);
            return Err(CcipCoreError::MessageNotInBatch {
                target: hex::encode(target_message_id),
                min_seq,
                max_seq,
            });
        }
    };

    let leaves = hash_leaves(messages_in_batch, lane)?;

    let tree = MerkleTree::build(leaves)?;
    let merkle_root = tree.root();

    if let Some(expected) = expected_root {
        if expected != merkle_root {
            return Err(CcipCoreError::MerkleRootMismatch {
                expected: hex::encode(expected),
                computed: hex::encode(merkle_root),
            });
        }
    }

    let proof = tree.prove(&[target_index])?;
    let proof_flag_bits = proof_flags_to_bits(&proof.source_flags)?;

    debug!(
        target_index,
        batch_len = messages_in_batch.len(),
        proof_len = proof.hashes.len(),
        "assembled manual execution proof"
    );

    Ok(ManualExecProof {
        proofs: proof.hashes,
        proof_flag_bits,
        merkle_root,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{Address, AddressFamily};
    use crate::lane::Version;
    use crate::message::{MessageHeader, MessageV1_6};

    fn lane() -> Lane {
        Lane::new(
            3_478_487_238_524_512_106,
            16_281_711_391_670_634_445,
            Address::parse_evm("0xfd04bd4cf2e51ed6c57183768d270539127b9143").unwrap(),
            Version::V1_6,
            AddressFamily::Evm,
        )
    }

    fn message(message_id: [u8; 32], sequence_number: u64) -> Message {
        Message::V1_6(MessageV1_6 {
            header: MessageHeader {
                message_id,
                source_chain_selector: 3_478_487_238_524_512_106,
                dest_chain_selector: 16_281_711_391_670_634_445,
                sequence_number,
                nonce: sequence_number,
            },
            sender: Address::evm([0x11; 20]),
            receiver: Address::evm([0x22; 20]),
            data: vec![],
            token_amounts: vec![],
            extra_args: vec![],
            gas_limit: Some(U256::from(200_000u64)),
            token_receiver: None,
        })
    }

    #[test]
    fn finds_and_proves_a_message_in_the_middle_of_a_batch() {
        let batch = vec![
            message([0x01; 32], 1),
            message([0x02; 32], 2),
            message([0x03; 32], 3),
            message([0x04; 32], 4),
            message([0x05; 32], 5),
        ];

        let result = calculate_manual_exec_proof(&batch, &lane(), [0x03; 32], None).unwrap();
        assert!(!result.proofs.is_empty());
        assert_ne!(result.merkle_root, [0u8; 32]);
    }

    #[test]
    fn missing_message_reports_the_sequence_window() {
        let batch = vec![message([0x01; 32], 10), message([0x02; 32], 11)];

        let err = calculate_manual_exec_proof(&batch, &lane(), [0xff; 32], None).unwrap_err();
        match err {
            CcipCoreError::MessageNotInBatch { min_seq, max_seq, .. } => {
                assert_eq!(min_seq, 10);
                assert_eq!(max_seq, 11);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn expected_root_mismatch_is_reported() {
        let batch = vec![message([0x01; 32], 1)];
        let err =
            calculate_manual_exec_proof(&batch, &lane(), [0x01; 32], Some([0xaa; 32])).unwrap_err();
        assert!(matches!(err, CcipCoreError::MerkleRootMismatch { .. }));
    }

    #[test]
    fn hash_leaves_preserves_input_order() {
        let batch = vec![message([0x01; 32], 1), message([0x02; 32], 2), message([0x03; 32], 3)];
        let hasher = leaf_hasher(&lane()).unwrap();
        let expected: Vec<[u8; 32]> = batch.iter().map(|m| hasher(m).unwrap()).collect();

        let leaves = hash_leaves(&batch, &lane()).unwrap();
        assert_eq!(leaves, expected);
    }

    #[test]
    fn expected_root_match_succeeds() {
        let batch = vec![message([0x01; 32], 1), message([0x02; 32], 2)];
        let hasher = leaf_hasher(&lane()).unwrap();
        let leaves = batch.iter().map(|m| hasher(m).unwrap()).collect::<Vec<_>>();
        let root = MerkleTree::build(leaves).unwrap().root();

        let result =
            calculate_manual_exec_proof(&batch, &lane(), [0x02; 32], Some(root)).unwrap();
        assert_eq!(result.merkle_root, root);
    }
}
