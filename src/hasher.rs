use sha2::{Digest, Sha256};

use crate::maybestd::{fmt::Debug, hash::Hash};

/// The length of a digest in bytes
pub const HASH_LEN: usize = 32;

/// A trait for hashing data into a merkle tree
pub trait MerkleHash {
    /// The output of this hasher.
    #[cfg(all(not(feature = "serde"), not(feature = "borsh")))]
    type Output: Debug + PartialEq + Eq + Clone + Hash;

    /// The output of this hasher.
    #[cfg(all(feature = "serde", not(feature = "borsh")))]
    type Output: Debug
        + PartialEq
        + Eq
        + Clone
        + Hash
        + serde::Serialize
        + serde::de::DeserializeOwned;

    /// The output of this hasher.
    #[cfg(all(feature = "borsh", not(feature = "serde")))]
    type Output: Debug
        + PartialEq
        + Eq
        + Clone
        + Hash
        + borsh::BorshSerialize
        + borsh::BorshDeserialize;

    /// The output of this hasher.
    #[cfg(all(feature = "borsh", feature = "serde"))]
    type Output: Debug
        + PartialEq
        + Eq
        + Clone
        + Hash
        + borsh::BorshSerialize
        + borsh::BorshDeserialize
        + serde::Serialize
        + serde::de::DeserializeOwned;

    /// Hashes the canonical byte encoding of a single item into a leaf digest.
    fn hash_leaf(&self, data: &[u8]) -> Self::Output;
    /// Hashes two child digests into the digest of their parent.
    fn hash_nodes(&self, l: &Self::Output, r: &Self::Output) -> Self::Output;
}

/// A plain sha256 hasher. Leaves are hashed once over their serialized
/// bytes, and a parent digest is the hash of the concatenation of its two
/// children's digests. No domain separation is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
pub struct Sha2Hasher;

impl Sha2Hasher {
    /// Create a new instance of the hasher
    pub fn new() -> Self {
        Sha2Hasher
    }
}

impl MerkleHash for Sha2Hasher {
    type Output = [u8; HASH_LEN];

    fn hash_leaf(&self, data: &[u8]) -> Self::Output {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hasher.finalize().into()
    }

    fn hash_nodes(&self, left: &Self::Output, right: &Self::Output) -> Self::Output {
        let mut hasher = Sha256::new();
        hasher.update(left);
        hasher.update(right);
        hasher.finalize().into()
    }
}
