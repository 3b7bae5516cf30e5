//! Compressed-account record and inclusion-proof types.
//!
//! Owned by the storage layer; the veil core only reads them. A record is
//! superseded — never mutated — on every state update, producing a fresh
//! `(content_hash, leaf_index)` pair.

use serde::{Deserialize, Serialize};

use veil_core::{ContentHash, LogicalAddress, QueueId, TreeId};

/// Location of a compressed account within the storage layer's trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeInfo {
    /// The state tree holding the account's leaf.
    pub tree: TreeId,
    /// The output queue new state is appended to.
    pub queue: QueueId,
}

/// A compressed account as reported by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressedAccountRecord {
    /// The account's logical address.
    pub address: LogicalAddress,
    /// Hash of the current account content. Stale after any update.
    pub content_hash: ContentHash,
    /// Leaf position in the state tree.
    pub leaf_index: u64,
    /// Tree and queue identities.
    pub tree_info: TreeInfo,
    /// The opaque account payload. For a pool account this contains the
    /// ciphertext reserve slots; the core never parses it.
    pub data: Vec<u8>,
}

/// A Merkle inclusion proof bound to one [`ContentHash`].
///
/// Valid only against the tree root active at `root_index`; the proof
/// goes stale as soon as the tree advances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InclusionProof {
    /// Index of the tree root this proof verifies against.
    pub root_index: u64,
    /// Sibling hashes from the leaf to the root.
    pub siblings: Vec<ContentHash>,
}
