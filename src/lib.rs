//! An immutable, content-addressed binary merkle tree.
//!
//! A tree is built once, off the critical path, from an ordered collection
//! of opaque items and a caller-supplied serialization function. Its root
//! is a commitment to the full contents, and membership of any single item
//! can be proven to a verifier holding only the root with a
//! logarithmic-size [`Proof`]. Proof replay costs one hash per tree level,
//! which is the figure that matters when verification runs in a metered
//! execution environment; the verification half of the crate works without
//! `std` for exactly that setting.
//!
//! Trees are never mutated in place: a changed item collection means a
//! full reconstruction.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

/// Re-exports from `std` or `core`/`alloc`, depending on the `std` feature.
pub mod maybestd {
    #[cfg(not(feature = "std"))]
    pub use alloc::{boxed, vec};
    #[cfg(not(feature = "std"))]
    pub use core::{fmt, hash};
    #[cfg(feature = "std")]
    pub use std::{boxed, fmt, hash, vec};
}

/// Defines errors that might arise when decoding proofs and roots.
pub mod error;
/// Defines the hashing seam and the default sha256 hasher.
pub mod hasher;
/// Defines membership proofs and their verification.
pub mod proof;
/// Defines the root commitment of a tree.
pub mod root;
/// Defines the merkle tree itself.
pub mod tree;

pub use error::{InvalidRootBytes, ProofDecodeError};
pub use hasher::{HASH_LEN, MerkleHash, Sha2Hasher};
pub use proof::{Proof, Sibling};
pub use root::Root;
pub use tree::MerkleTree;
