use crate::hasher::{MerkleHash, Sha2Hasher};
use crate::maybestd::{boxed::Box, vec::Vec};
use crate::proof::{Proof, Sibling};
use crate::root::Root;

/// An immutable binary merkle tree over an ordered collection of items.
///
/// The shape of the tree is fully determined by the number of leaves: a
/// sequence of two or more items is split at `floor(n / 2)`, and the two
/// halves are built recursively, giving a positionally balanced tree of
/// logarithmic depth. Leaf order is the input order; no reordering or
/// rebalancing by content ever happens. Construction is the only mutation
/// the structure sees - the root commitment and membership proofs are
/// derived values.
#[derive(Debug)]
pub struct MerkleTree<T, M: MerkleHash = Sha2Hasher> {
    hasher: M,
    inner: Option<Node<T, M>>,
}

/// A non-empty subtree. The empty tree is represented by the absence of a
/// node altogether, so every node carries a digest.
#[derive(Debug)]
enum Node<T, M: MerkleHash> {
    Leaf {
        hash: M::Output,
        value: T,
    },
    Inner {
        root: M::Output,
        left: Box<Node<T, M>>,
        right: Box<Node<T, M>>,
    },
}

impl<T, M> MerkleTree<T, M>
where
    M: MerkleHash + Default,
{
    /// Builds a tree from the given items with a default hasher.
    ///
    /// `serialize` must be a pure function producing a canonical byte
    /// encoding of an item, injective over the items actually used; two
    /// items with the same encoding are indistinguishable duplicate leaves.
    /// The same function must be supplied when generating or verifying
    /// proofs against this tree.
    pub fn from_list<F>(items: Vec<T>, serialize: F) -> Self
    where
        F: Fn(&T) -> Vec<u8>,
    {
        Self::from_list_with_hasher(items, serialize, Default::default())
    }
}

impl<T, M> MerkleTree<T, M>
where
    M: MerkleHash,
{
    /// Builds a tree from the given items with the given hasher.
    pub fn from_list_with_hasher<F>(items: Vec<T>, serialize: F, hasher: M) -> Self
    where
        F: Fn(&T) -> Vec<u8>,
    {
        let inner = Node::build(items, &serialize, &hasher);
        Self { hasher, inner }
    }

    /// Returns the content commitment of the tree. The digest is cached at
    /// construction time, so this is cheap to call repeatedly.
    pub fn root(&self) -> Root<M> {
        match &self.inner {
            Some(node) => Root::from_hash(node.hash().clone()),
            None => Root::empty(),
        }
    }

    /// Returns the number of leaves in the tree.
    pub fn len(&self) -> usize {
        self.inner.as_ref().map_or(0, Node::len)
    }

    /// Returns `true` if the tree holds no items.
    pub fn is_empty(&self) -> bool {
        self.inner.is_none()
    }

    /// Returns the items of the tree, left to right. Given the same
    /// serialization function, `from_list` inverts this exactly.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut out = Vec::with_capacity(self.len());
        if let Some(node) = &self.inner {
            node.collect_into(&mut out);
        }
        out
    }

    /// Builds a membership proof for the leaf whose digest matches the
    /// digest of `item`, or returns `None` when no leaf matches. A
    /// single-leaf tree yields an empty proof.
    ///
    /// Matching is by content, not identity: `item` only has to serialize
    /// to the same bytes as the leaf it targets. Should two distinct leaves
    /// ever share a digest, the leftmost match wins.
    pub fn build_proof<F>(&self, item: &T, serialize: F) -> Option<Proof<M>>
    where
        F: Fn(&T) -> Vec<u8>,
    {
        let target = self.hasher.hash_leaf(&serialize(item));
        let node = self.inner.as_ref()?;
        let mut siblings = Vec::new();
        if node.search(&target, &mut siblings) {
            Some(Proof::from_siblings(siblings))
        } else {
            None
        }
    }
}

/// Trees compare equal iff their roots do. Two trees with the same
/// commitment are interchangeable for every purpose this crate serves, and
/// comparing roots costs O(1) against O(n) for structural comparison.
impl<T, M: MerkleHash> PartialEq for MerkleTree<T, M> {
    fn eq(&self, other: &Self) -> bool {
        self.root() == other.root()
    }
}

impl<T, M: MerkleHash> Eq for MerkleTree<T, M> {}

impl<T, M> Node<T, M>
where
    M: MerkleHash,
{
    fn build<F>(mut items: Vec<T>, serialize: &F, hasher: &M) -> Option<Self>
    where
        F: Fn(&T) -> Vec<u8>,
    {
        match items.len() {
            0 => None,
            1 => {
                let value = items.pop()?;
                let hash = hasher.hash_leaf(&serialize(&value));
                Some(Node::Leaf { hash, value })
            }
            n => {
                let right_items = items.split_off(n / 2);
                // Both halves are non-empty whenever n >= 2, so the
                // recursive calls cannot return None.
                let left = Self::build(items, serialize, hasher)?;
                let right = Self::build(right_items, serialize, hasher)?;
                let root = hasher.hash_nodes(left.hash(), right.hash());
                Some(Node::Inner {
                    root,
                    left: Box::new(left),
                    right: Box::new(right),
                })
            }
        }
    }

    fn hash(&self) -> &M::Output {
        match self {
            Node::Leaf { hash, .. } => hash,
            Node::Inner { root, .. } => root,
        }
    }

    fn len(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Inner { left, right, .. } => left.len() + right.len(),
        }
    }

    fn collect_into(&self, out: &mut Vec<T>)
    where
        T: Clone,
    {
        match self {
            Node::Leaf { value, .. } => out.push(value.clone()),
            Node::Inner { left, right, .. } => {
                left.collect_into(out);
                right.collect_into(out);
            }
        }
    }

    /// Searches for a leaf with the target digest, recording the sibling of
    /// every node on the path while unwinding, so the accumulated proof is
    /// ordered bottom-up. The left subtree is searched first and a match
    /// there short-circuits the right subtree entirely.
    fn search(&self, target: &M::Output, siblings: &mut Vec<Sibling<M>>) -> bool {
        match self {
            Node::Leaf { hash, .. } => hash == target,
            Node::Inner { left, right, .. } => {
                if left.search(target, siblings) {
                    siblings.push(Sibling::Right(right.hash().clone()));
                    return true;
                }
                if right.search(target, siblings) {
                    siblings.push(Sibling::Left(left.hash().clone()));
                    return true;
                }
                false
            }
        }
    }
}
