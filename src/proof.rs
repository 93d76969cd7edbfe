use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::ProofDecodeError;
use crate::hasher::{HASH_LEN, MerkleHash};
use crate::maybestd::vec::Vec;
use crate::root::Root;

/// Wire-encoding tag marking a left sibling.
const LEFT_TAG: u8 = 0;
/// Wire-encoding tag marking a right sibling.
const RIGHT_TAG: u8 = 1;

/// A sibling digest on the path from a leaf to the root, tagged with the
/// side of its parent it occupies.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sibling<M: MerkleHash> {
    /// The sibling is the left child of its parent; the running digest is
    /// combined as the right child.
    Left(M::Output),
    /// The sibling is the right child of its parent; the running digest is
    /// combined as the left child.
    Right(M::Output),
}

impl<M: MerkleHash> Sibling<M> {
    /// Returns the sibling digest, regardless of direction.
    pub fn hash(&self) -> &M::Output {
        match self {
            Sibling::Left(hash) | Sibling::Right(hash) => hash,
        }
    }
}

/// A proof that a leaf with some digest occurs in the tree committed to by
/// a given root.
///
/// Siblings are ordered bottom-up: the first entry is the sibling adjacent
/// to the target leaf, the last is the sibling adjacent to the root. A
/// proof for the only leaf of a single-leaf tree is empty. A proof is only
/// meaningful against the root of the exact tree it was derived from.
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshSerialize, borsh::BorshDeserialize)
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Proof<M: MerkleHash> {
    siblings: Vec<Sibling<M>>,
}

impl<M: MerkleHash> Default for Proof<M> {
    fn default() -> Self {
        Self {
            siblings: Default::default(),
        }
    }
}

impl<M> Proof<M>
where
    M: MerkleHash + Default,
{
    /// Verify that a leaf with the given digest occurs in the tree
    /// committed to by `root`.
    pub fn verify_hash(&self, root: &Root<M>, leaf_hash: M::Output) -> bool {
        self.verify_hash_with_hasher(root, leaf_hash, &M::default())
    }

    /// Verify that `item` is a member of the tree committed to by `root`.
    ///
    /// `serialize` must be the same function the tree was built with. This
    /// is the entrypoint intended for trust-boundary use: only the root,
    /// the claimed item, and this proof flow in, never the tree itself.
    pub fn verify_membership<T, F>(&self, root: &Root<M>, item: &T, serialize: F) -> bool
    where
        F: Fn(&T) -> Vec<u8>,
    {
        self.verify_membership_with_hasher(root, item, serialize, &M::default())
    }
}

impl<M> Proof<M>
where
    M: MerkleHash,
{
    /// Assembles a proof from a bottom-up ordered sequence of siblings.
    pub fn from_siblings(siblings: Vec<Sibling<M>>) -> Self {
        Self { siblings }
    }

    /// Verify a leaf digest against a root, with the given hasher.
    ///
    /// Replays the proof head to tail, folding each sibling into a running
    /// digest on its tagged side, and compares the result against `root`.
    /// A mismatch is the expected rejection outcome, not an error.
    pub fn verify_hash_with_hasher(&self, root: &Root<M>, leaf_hash: M::Output, hasher: &M) -> bool {
        let mut running = leaf_hash;
        for sibling in &self.siblings {
            running = match sibling {
                Sibling::Left(sib) => hasher.hash_nodes(sib, &running),
                Sibling::Right(sib) => hasher.hash_nodes(&running, sib),
            };
        }
        &Root::from_hash(running) == root
    }

    /// Verify that `item` is a member of the tree committed to by `root`,
    /// with the given hasher.
    pub fn verify_membership_with_hasher<T, F>(
        &self,
        root: &Root<M>,
        item: &T,
        serialize: F,
        hasher: &M,
    ) -> bool
    where
        F: Fn(&T) -> Vec<u8>,
    {
        self.verify_hash_with_hasher(root, hasher.hash_leaf(&serialize(item)), hasher)
    }

    /// Returns the siblings of the proof, ordered bottom-up.
    pub fn siblings(&self) -> &[Sibling<M>] {
        &self.siblings
    }

    /// Returns the number of siblings in the proof.
    pub fn len(&self) -> usize {
        self.siblings.len()
    }

    /// Returns `true` if the proof has no siblings, as for a single-leaf tree.
    pub fn is_empty(&self) -> bool {
        self.siblings.is_empty()
    }
}

impl<M: MerkleHash<Output = [u8; HASH_LEN]>> Proof<M> {
    /// Serializes the proof for transport: one direction byte per sibling
    /// followed by its digest, bottom-up order preserved.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.siblings.len() * (1 + HASH_LEN));
        for sibling in &self.siblings {
            match sibling {
                Sibling::Left(hash) => {
                    buf.put_u8(LEFT_TAG);
                    buf.put_slice(hash);
                }
                Sibling::Right(hash) => {
                    buf.put_u8(RIGHT_TAG);
                    buf.put_slice(hash);
                }
            }
        }
        buf.freeze()
    }

    /// Deserializes a proof produced by [`Proof::to_bytes`]. The decoder is
    /// strict: truncated elements and unknown direction tags are rejected.
    pub fn from_bytes(mut buf: &[u8]) -> Result<Self, ProofDecodeError> {
        let mut siblings = Vec::with_capacity(buf.len() / (1 + HASH_LEN));
        while buf.has_remaining() {
            let tag = buf.get_u8();
            if buf.remaining() < HASH_LEN {
                return Err(ProofDecodeError::UnexpectedEnd);
            }
            let mut hash = [0u8; HASH_LEN];
            buf.copy_to_slice(&mut hash);
            match tag {
                LEFT_TAG => siblings.push(Sibling::Left(hash)),
                RIGHT_TAG => siblings.push(Sibling::Right(hash)),
                other => return Err(ProofDecodeError::InvalidDirectionTag(other)),
            }
        }
        Ok(Self { siblings })
    }
}

#[cfg(test)]
mod tests {
    use super::{Proof, Sibling};
    use crate::error::ProofDecodeError;
    use crate::hasher::{MerkleHash, Sha2Hasher};
    use crate::root::Root;
    use crate::tree::MerkleTree;

    fn serialize(item: &&str) -> Vec<u8> {
        item.as_bytes().to_vec()
    }

    fn tree_of(items: &[&'static str]) -> MerkleTree<&'static str> {
        MerkleTree::from_list(items.to_vec(), serialize)
    }

    /// Builds a tree over the first n of twenty distinct words, then proves
    /// and verifies membership of every leaf.
    #[test]
    fn test_every_leaf_is_provable() {
        let words: Vec<String> = (0..20).map(|i| format!("word-{i}")).collect();
        let ser = |item: &String| item.as_bytes().to_vec();
        for n in 1..=words.len() {
            let tree: MerkleTree<String> = MerkleTree::from_list(words[..n].to_vec(), ser);
            let root = tree.root();
            for word in &words[..n] {
                let proof = tree.build_proof(word, ser).expect("leaf must be present");
                assert!(proof.verify_membership(&root, word, ser));
            }
        }
    }

    #[test]
    fn test_absent_item_yields_no_proof() {
        let tree = tree_of(&["dog", "cat", "mouse"]);
        assert_eq!(tree.build_proof(&"bird", serialize), None);
    }

    #[test]
    fn test_empty_tree_yields_no_proof() {
        let tree = tree_of(&[]);
        assert_eq!(tree.build_proof(&"dog", serialize), None);
    }

    #[test]
    fn test_single_leaf_proof_is_empty() {
        let tree = tree_of(&["dog"]);
        let proof = tree.build_proof(&"dog", serialize).unwrap();
        assert!(proof.is_empty());
        assert!(proof.verify_membership(&tree.root(), &"dog", serialize));
    }

    #[test]
    fn test_proof_rejects_different_item() {
        let tree = tree_of(&["dog", "cat", "mouse"]);
        let root = tree.root();
        let dog_proof = tree.build_proof(&"dog", serialize).unwrap();
        assert!(dog_proof.verify_membership(&root, &"dog", serialize));
        assert!(!dog_proof.verify_membership(&root, &"cat", serialize));
        assert!(!dog_proof.verify_membership(&root, &"bird", serialize));
    }

    #[test]
    fn test_proof_rejects_wrong_root() {
        let tree = tree_of(&["dog", "cat", "mouse"]);
        let other = tree_of(&["dog", "cat"]);
        let proof = tree.build_proof(&"dog", serialize).unwrap();
        assert!(!proof.verify_membership(&other.root(), &"dog", serialize));
        assert!(!proof.verify_membership(&Root::empty(), &"dog", serialize));
    }

    #[test]
    fn test_nine_leaf_proof_path() {
        // Nine items split 4 | 5, the right half splits 2 | 3, and the
        // trailing three split 1 | 2, putting "ironhide" at depth four with
        // the siblings below on its path.
        let items = [
            "bumblebee",
            "bear",
            "dog",
            "cat",
            "mouse",
            "prime",
            "jazz",
            "ironhide",
            "ratchet",
        ];
        let tree = tree_of(&items);
        let hasher = Sha2Hasher::new();
        let leaf = |s: &str| hasher.hash_leaf(s.as_bytes());

        let left_four = hasher.hash_nodes(
            &hasher.hash_nodes(&leaf("bumblebee"), &leaf("bear")),
            &hasher.hash_nodes(&leaf("dog"), &leaf("cat")),
        );
        let expected = Proof::from_siblings(vec![
            Sibling::Right(leaf("ratchet")),
            Sibling::Left(leaf("jazz")),
            Sibling::Left(hasher.hash_nodes(&leaf("mouse"), &leaf("prime"))),
            Sibling::Left(left_four),
        ]);

        let proof = tree.build_proof(&"ironhide", serialize).unwrap();
        assert_eq!(proof, expected);
        assert!(proof.verify_membership(&tree.root(), &"ironhide", serialize));
    }

    #[test]
    fn test_verify_hash_entrypoint() {
        let tree = tree_of(&["dog", "cat", "mouse", "bird"]);
        let root = tree.root();
        let hasher = Sha2Hasher::new();
        let proof = tree.build_proof(&"mouse", serialize).unwrap();
        assert!(proof.verify_hash(&root, hasher.hash_leaf(b"mouse")));
        assert!(!proof.verify_hash(&root, hasher.hash_leaf(b"moose")));
    }

    #[test]
    fn test_byte_round_trip() {
        let tree = tree_of(&["dog", "cat", "mouse", "bird", "fox"]);
        let proof = tree.build_proof(&"fox", serialize).unwrap();
        let bytes = proof.to_bytes();
        assert_eq!(bytes.len(), proof.len() * 33);
        let decoded = Proof::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, proof);
        assert!(decoded.verify_membership(&tree.root(), &"fox", serialize));
    }

    #[test]
    fn test_empty_proof_round_trip() {
        let proof = Proof::<Sha2Hasher>::default();
        assert_eq!(proof.to_bytes().len(), 0);
        assert_eq!(Proof::from_bytes(&[]).unwrap(), proof);
    }

    #[test]
    fn test_decode_rejects_truncated_element() {
        let tree = tree_of(&["dog", "cat"]);
        let proof = tree.build_proof(&"dog", serialize).unwrap();
        let bytes = proof.to_bytes();
        assert_eq!(
            Proof::<Sha2Hasher>::from_bytes(&bytes[..bytes.len() - 1]),
            Err(ProofDecodeError::UnexpectedEnd)
        );
    }

    #[test]
    fn test_decode_rejects_unknown_tag() {
        let mut bytes = vec![2u8];
        bytes.extend_from_slice(&[0u8; 32]);
        assert_eq!(
            Proof::<Sha2Hasher>::from_bytes(&bytes),
            Err(ProofDecodeError::InvalidDirectionTag(2))
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_proof_serde_json() {
        let tree = tree_of(&["dog", "cat", "mouse"]);
        let proof = tree.build_proof(&"cat", serialize).unwrap();

        let serialized = serde_json::to_vec(&proof).expect("Serialization to vec must succeed");
        let got: Proof<Sha2Hasher> =
            serde_json::from_slice(&serialized[..]).expect("serialized proof is correct");

        assert_eq!(got, proof);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_proof_serde_postcard() {
        let tree = tree_of(&["dog", "cat", "mouse"]);
        let proof = tree.build_proof(&"mouse", serialize).unwrap();

        let serialized: Vec<u8> =
            postcard::to_allocvec(&proof).expect("Serialization to vec must succeed");
        let got: Proof<Sha2Hasher> =
            postcard::from_bytes(&serialized[..]).expect("serialized proof is correct");

        assert_eq!(got, proof);
    }

    #[cfg(feature = "borsh")]
    #[test]
    fn test_proof_borsh() {
        let tree = tree_of(&["dog", "cat", "mouse"]);
        let proof = tree.build_proof(&"dog", serialize).unwrap();

        let serialized = borsh::to_vec(&proof).expect("Serialization to vec must succeed");
        let got: Proof<Sha2Hasher> =
            borsh::from_slice(&serialized[..]).expect("serialized proof is correct");

        assert_eq!(got, proof);
    }
}
