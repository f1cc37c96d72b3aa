//! Sparse multi-proof binary merkle tree over a batch of leaf hashes.
//!
//! Construction pads the leaf layer to a power of two with [`ZERO_HASH`],
//! pairs are combined with a commutative, domain-separated hash so sibling
//! order never leaks to callers, and `prove`/`verify_compute_root` implement
//! the sorted "pair or single" multi-proof scheme: for each sibling pair at
//! a level, both-known contributes nothing, exactly-one-known appends the
//! unknown sibling to the proof, and neither-known is skipped.

use crate::error::CcipCoreError;
use crate::primitives::keccak256;
use alloy::primitives::U256;
use std::collections::HashSet;

/// Padding value for unfilled leaf slots.
pub const ZERO_HASH: [u8; 32] = [0xFF; 32];

/// Hard upper bound on the number of leaves a tree may be built from.
pub const MAX_NUMBER_TREE_LEAVES: usize = 1 << 20;

const INTERNAL_DOMAIN_SEPARATOR: [u8; 32] = {
    let mut bytes = [0u8; 32];
    bytes[31] = 1;
    bytes
};

/// Commutative, domain-separated pair hash: `keccak256(sep || min(a,b) || max(a,b))`.
pub fn hash_internal(a: [u8; 32], b: [u8; 32]) -> [u8; 32] {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut buf = [0u8; 96];
    buf[0..32].copy_from_slice(&INTERNAL_DOMAIN_SEPARATOR);
    buf[32..64].copy_from_slice(&lo);
    buf[64..96].copy_from_slice(&hi);
    keccak256(&buf)
}

/// A multi-proof: the sibling hashes a verifier needs, plus the sequence of
/// pair/single flags directing how to consume them alongside the leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proof {
    pub hashes: Vec<[u8; 32]>,
    pub source_flags: Vec<bool>,
}

/// Layered binary merkle tree built from an ordered batch of leaf hashes.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    layers: Vec<Vec<[u8; 32]>>,
}

impl MerkleTree {
    /// Build a tree over `leaves`, left intact in order; pads to the next
    /// power of two with [`ZERO_HASH`]. Fails on an empty input or more
    /// leaves than [`MAX_NUMBER_TREE_LEAVES`].
    pub fn build(leaves: Vec<[u8; 32]>) -> Result<Self, CcipCoreError> {
        let count = leaves.len();
        if count == 0 {
            return Err(CcipCoreError::EmptyTree);
        }
        if count > MAX_NUMBER_TREE_LEAVES {
            return Err(CcipCoreError::TooManyLeaves {
                count,
                max: MAX_NUMBER_TREE_LEAVES,
            });
        }

        let padded_count = count.next_power_of_two();
        let mut layer0 = leaves;
        layer0.resize(padded_count, ZERO_HASH);

        let mut layers = vec![layer0];
        while layers.last().expect("at least one layer").len() > 1 {
            let prev = layers.last().expect("at least one layer");
            let next = prev
                .chunks_exact(2)
                .map(|pair| hash_internal(pair[0], pair[1]))
                .collect();
            layers.push(next);
        }

        Ok(Self { layers })
    }

    /// The tree's root hash.
    pub fn root(&self) -> [u8; 32] {
        self.layers.last().expect("at least one layer")[0]
    }

    /// Number of leaf slots after padding to the next power of two.
    pub fn padded_leaf_count(&self) -> usize {
        self.layers[0].len()
    }

    /// Generate a multi-proof for `indices`, a sorted set of distinct leaf
    /// indices in `[0, padded_leaf_count())`.
    pub fn prove(&self, indices: &[usize]) -> Result<Proof, CcipCoreError> {
        if indices.is_empty() {
            return Err(CcipCoreError::ProofMalformed {
                reason: "empty index set".to_string(),
            });
        }
        if indices.windows(2).any(|w| w[0] >= w[1]) {
            return Err(CcipCoreError::ProofMalformed {
                reason: "indices must be sorted and distinct".to_string(),
            });
        }
        let padded = self.padded_leaf_count();
        if indices.iter().any(|&i| i >= padded) {
            return Err(CcipCoreError::ProofMalformed {
                reason: "index out of range".to_string(),
            });
        }

        let mut known: HashSet<usize> = indices.iter().copied().collect();
        let mut hashes = Vec::new();
        let mut source_flags = Vec::new();

        for layer in &self.layers[..self.layers.len() - 1] {
            let mut next_known = HashSet::new();
            for i in 0..layer.len() / 2 {
                let (left, right) = (2 * i, 2 * i + 1);
                match (known.contains(&left), known.contains(&right)) {
                    (true, true) => {
                        next_known.insert(i);
                        source_flags.push(true);
                    }
                    (true, false) => {
                        hashes.push(layer[right]);
                        next_known.insert(i);
                        source_flags.push(false);
                    }
                    (false, true) => {
                        hashes.push(layer[left]);
                        next_known.insert(i);
                        source_flags.push(false);
                    }
                    (false, false) => {}
                }
            }
            known = next_known;
        }

        Ok(Proof {
            hashes,
            source_flags,
        })
    }
}

/// Verify a multi-proof against the given leaves, returning the computed
/// root. Consumes `leaves` and `proof.hashes` as two queues directed by
/// `proof.source_flags`.
pub fn verify_compute_root(leaves: &[[u8; 32]], proof: &Proof) -> Result<[u8; 32], CcipCoreError> {
    if leaves.is_empty() {
        return Err(CcipCoreError::ProofMalformed {
            reason: "no leaves given".to_string(),
        });
    }
    if proof.source_flags.is_empty() {
        return if leaves.len() == 1 {
            Ok(leaves[0])
        } else {
            Err(CcipCoreError::ProofMalformed {
                reason: "flags empty but multiple leaves given".to_string(),
            })
        };
    }

    let expected_hash_count = proof.source_flags.iter().filter(|&&flag| !flag).count();
    if expected_hash_count != proof.hashes.len() {
        return Err(CcipCoreError::ProofMalformed {
            reason: "flag count does not match supplied hash count".to_string(),
        });
    }

    let mut buf: Vec<[u8; 32]> = leaves.to_vec();
    let mut leaf_cursor = 0usize;
    let mut proof_cursor = 0usize;

    for &flag in &proof.source_flags {
        let a = *buf.get(leaf_cursor).ok_or_else(|| CcipCoreError::ProofMalformed {
            reason: "leaf queue underflow".to_string(),
        })?;
        leaf_cursor += 1;

        let b = if flag {
            let b = *buf.get(leaf_cursor).ok_or_else(|| CcipCoreError::ProofMalformed {
                reason: "leaf queue underflow".to_string(),
            })?;
            leaf_cursor += 1;
            b
        } else {
            let b = *proof
                .hashes
                .get(proof_cursor)
                .ok_or_else(|| CcipCoreError::ProofMalformed {
                    reason: "proof queue underflow".to_string(),
                })?;
            proof_cursor += 1;
            b
        };

        buf.push(hash_internal(a, b));
    }

    if proof_cursor != proof.hashes.len() || buf.len() - leaf_cursor != 1 {
        return Err(CcipCoreError::ProofMalformed {
            reason: "verification did not reduce to a single root".to_string(),
        });
    }

    Ok(*buf.last().expect("non-empty buffer"))
}

/// Pack a flag sequence into a little-endian bitmap: `bit i = flags[i]`.
/// `flags.len()` must not exceed 256.
pub fn proof_flags_to_bits(flags: &[bool]) -> Result<U256, CcipCoreError> {
    if flags.len() > 256 {
        return Err(CcipCoreError::ProofMalformed {
            reason: format!("{} flags exceeds the 256-bit limit", flags.len()),
        });
    }
    let mut bits = U256::ZERO;
    for (i, &flag) in flags.iter().enumerate() {
        if flag {
            bits |= U256::from(1u8) << i;
        }
    }
    Ok(bits)
}
