use bytes::Bytes;

use crate::error::InvalidRootBytes;
use crate::hasher::{HASH_LEN, MerkleHash};

/// The content commitment of a merkle tree: either the digest at the top of
/// the tree, or a sentinel marking the commitment of the empty tree.
///
/// The sentinel is the *absence* of a digest, so it can never collide with
/// the commitment of a non-empty tree. Equality is byte-exact.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
pub struct Root<M: MerkleHash> {
    inner: Option<M::Output>,
}

// Hand-written equality/hashing impls: deriving them would bind the phantom
// hasher parameter `M: PartialEq/Eq/Hash`, but equality is over the digest,
// whose `M::Output` already carries these bounds via `MerkleHash`.
impl<M: MerkleHash> PartialEq for Root<M> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<M: MerkleHash> Eq for Root<M> {}

impl<M: MerkleHash> core::hash::Hash for Root<M> {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl<M: MerkleHash> Root<M> {
    /// Wraps a digest as a root commitment. The digest is taken at face
    /// value: a caller intending to compare the result against tree-derived
    /// roots must ensure it actually originates from a tree computation.
    pub fn from_hash(hash: M::Output) -> Self {
        Self { inner: Some(hash) }
    }

    /// The commitment of the empty tree.
    pub fn empty() -> Self {
        Self { inner: None }
    }

    /// Returns the digest, or `None` for the empty-tree sentinel.
    pub fn to_hash(&self) -> Option<M::Output> {
        self.inner.clone()
    }

    /// Check whether this root is the empty-tree sentinel.
    pub fn is_empty(&self) -> bool {
        self.inner.is_none()
    }
}

impl<M: MerkleHash> Default for Root<M> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<M: MerkleHash<Output = [u8; HASH_LEN]>> Root<M> {
    /// Returns the digest bytes, or the empty byte string for the sentinel.
    pub fn as_bytes(&self) -> &[u8] {
        match &self.inner {
            Some(hash) => hash.as_ref(),
            None => &[],
        }
    }

    /// Serializes the root for transport: the raw digest bytes, or the
    /// zero-length byte string for the sentinel.
    pub fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(self.as_bytes())
    }

    /// Deserializes a root produced by [`Root::to_bytes`].
    pub fn from_bytes(value: &[u8]) -> Result<Self, InvalidRootBytes> {
        Self::try_from(value)
    }
}

impl<M: MerkleHash<Output = [u8; HASH_LEN]>> TryFrom<&[u8]> for Root<M> {
    type Error = InvalidRootBytes;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Ok(Self::empty());
        }
        let hash = value.try_into().map_err(|_| InvalidRootBytes)?;
        Ok(Self::from_hash(hash))
    }
}

#[cfg(test)]
mod tests {
    use super::Root;
    use crate::hasher::{MerkleHash, Sha2Hasher};

    #[test]
    fn test_root_byte_round_trip() {
        let hasher = Sha2Hasher::new();
        let root = Root::<Sha2Hasher>::from_hash(hasher.hash_leaf(b"dog"));
        let bytes = root.to_bytes();
        assert_eq!(bytes.len(), 32);
        assert_eq!(Root::from_bytes(&bytes), Ok(root));
    }

    #[test]
    fn test_empty_root_round_trip() {
        let root = Root::<Sha2Hasher>::empty();
        assert!(root.is_empty());
        assert_eq!(root.to_hash(), None);
        assert_eq!(root.to_bytes().len(), 0);
        assert_eq!(Root::from_bytes(&[]), Ok(root));
    }

    #[test]
    fn test_root_rejects_wrong_length() {
        assert!(Root::<Sha2Hasher>::from_bytes(&[0u8; 31]).is_err());
        assert!(Root::<Sha2Hasher>::from_bytes(&[0u8; 33]).is_err());
    }

    #[test]
    fn test_sentinel_differs_from_any_digest() {
        let hasher = Sha2Hasher::new();
        // The hash of the empty string is still a real digest, not the sentinel.
        let root = Root::<Sha2Hasher>::from_hash(hasher.hash_leaf(b""));
        assert_ne!(root, Root::empty());
        assert!(!root.is_empty());
    }
}
