//! Buddy-tree nodes.
//!
//! The tree is an arena: a fixed array of [`Node`] records indexed in
//! heap order by [`NodeId`] (root at 0, children of `i` at `2i + 1` and
//! `2i + 2`). Structural attributes like level, covered size, page
//! offset, and buddy are pure functions of the id and are computed, not
//! stored; a record holds only the state tag and the free-list links.

use crate::layout::{DEPTH, NODES};

/// Allocation state of one tree node.
///
/// Exactly one state holds per node. A `Free` node is linked into the
/// free list of its level; `Nonexistent` means the node's parent is
/// currently `Used` or `Free`, so this subdivision is not in play.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum NodeState {
    Nonexistent,
    Used,
    Internal,
    Free,
}

/// Heap-order index of a node in the buddy tree.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct NodeId(u32);

impl NodeId {
    pub(crate) const ROOT: Self = Self(0);

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }

    /// Distance from the root; the root has depth 0.
    #[inline]
    const fn depth(self) -> u32 {
        (self.0 + 1).ilog2()
    }

    /// Height above the leaves; leaves are level 0, the root is
    /// `DEPTH - 1`.
    #[inline]
    pub(crate) const fn level(self) -> usize {
        DEPTH - 1 - self.depth() as usize
    }

    /// Number of pages this node covers.
    #[inline]
    pub(crate) const fn size_pages(self) -> usize {
        1 << self.level()
    }

    /// Offset of the node's first covered page within the region.
    #[inline]
    pub(crate) const fn page_offset(self) -> usize {
        let row_start = (1 << self.depth()) - 1;
        (self.index() - row_start) << self.level()
    }

    #[inline]
    pub(crate) const fn is_leaf(self) -> bool {
        self.level() == 0
    }

    #[inline]
    pub(crate) const fn left(self) -> Self {
        debug_assert!(!self.is_leaf());
        Self(2 * self.0 + 1)
    }

    #[inline]
    pub(crate) const fn right(self) -> Self {
        debug_assert!(!self.is_leaf());
        Self(2 * self.0 + 2)
    }

    /// The parent node; the root has none.
    #[inline]
    pub(crate) const fn parent(self) -> Option<Self> {
        match self.0 {
            0 => None,
            n => Some(Self((n - 1) / 2)),
        }
    }

    /// The other child of this node's parent; the root has none.
    #[inline]
    pub(crate) const fn buddy(self) -> Option<Self> {
        if self.0 == 0 {
            None
        } else if self.0 % 2 == 1 {
            Some(Self(self.0 + 1))
        } else {
            Some(Self(self.0 - 1))
        }
    }
}

/// One arena record: the state tag plus the intrusive free-list links.
///
/// The links are meaningful only while `state == Free`.
#[derive(Copy, Clone)]
pub(crate) struct Node {
    pub(crate) state: NodeState,
    pub(crate) prev: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
}

impl Node {
    pub(crate) const EMPTY: Self = Self {
        state: NodeState::Nonexistent,
        prev: None,
        next: None,
    };
}

// Node records for the whole tree live in one static; keep them small.
const _: () = assert!(size_of::<Node>() <= 24);
const _: () = assert!(NODES == 32_767);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::PAGES;

    #[test]
    fn root_covers_the_whole_region() {
        assert_eq!(NodeId::ROOT.level(), DEPTH - 1);
        assert_eq!(NodeId::ROOT.size_pages(), PAGES);
        assert_eq!(NodeId::ROOT.page_offset(), 0);
        assert_eq!(NodeId::ROOT.parent(), None);
        assert_eq!(NodeId::ROOT.buddy(), None);
    }

    #[test]
    fn children_halve_the_parent() {
        let left = NodeId::ROOT.left();
        let right = NodeId::ROOT.right();
        assert_eq!(left.size_pages(), PAGES / 2);
        assert_eq!(right.size_pages(), PAGES / 2);
        assert_eq!(left.page_offset(), 0);
        assert_eq!(right.page_offset(), PAGES / 2);
        assert_eq!(left.buddy(), Some(right));
        assert_eq!(right.buddy(), Some(left));
    }

    #[test]
    fn parent_child_roundtrip_over_the_whole_tree() {
        for raw in 0..NODES / 2 {
            let id = NodeId(raw as u32);
            assert_eq!(id.left().parent(), Some(id));
            assert_eq!(id.right().parent(), Some(id));
            assert_eq!(id.left().buddy(), Some(id.right()));
        }
    }

    #[test]
    fn child_offsets_follow_the_address_order() {
        // Left child starts where the parent starts; the right child
        // starts one child-size further.
        for raw in 0..NODES / 2 {
            let id = NodeId(raw as u32);
            assert_eq!(id.left().page_offset(), id.page_offset());
            assert_eq!(
                id.right().page_offset(),
                id.page_offset() + id.right().size_pages()
            );
        }
    }

    #[test]
    fn leaf_row_is_single_pages() {
        let first_leaf = NodeId((NODES / 2) as u32);
        let last_leaf = NodeId((NODES - 1) as u32);
        assert!(first_leaf.is_leaf());
        assert!(last_leaf.is_leaf());
        assert_eq!(first_leaf.size_pages(), 1);
        assert_eq!(first_leaf.page_offset(), 0);
        assert_eq!(last_leaf.page_offset(), PAGES - 1);
    }
}
