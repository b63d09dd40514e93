//! # Buddy Frame Allocator
//!
//! Power-of-two page-frame allocation over one contiguous physical
//! region, organized as a fully materialized binary tree with one free
//! list per level.
//!
//! [`allocate`](BuddyFrameAlloc::allocate) takes the head of the
//! smallest non-empty free list at or above the requested level and
//! splits leftward down to the exact level, so the returned run is the
//! lowest address available in the chosen block and every split frees a
//! right-hand buddy. [`free`](BuddyFrameAlloc::free) walks the unique
//! address-ordered path from the root to the allocation and coalesces
//! buddies upward as far as they are free.
//!
//! The type is a plain value with no interior locking; the kernel-facing
//! singleton in [`global`](crate::global) serializes access with one
//! spin lock. Both operations are bounded by the tree depth once the
//! lock is held.

use kernel_addresses::PhysicalAddress;

use crate::layout::{DEPTH, NODES, PAGE_SIZE, PAGES, REGION_BYTES};
use crate::node::{Node, NodeId, NodeState};
use crate::stats::{FrameUsage, FreeRanges};

/// Why an allocation request produced no frames.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocError {
    /// The page count was zero, above [`PAGES`], or not a power of two.
    /// A caller error; reported only through this value, never logged.
    #[error("invalid page count {0}")]
    InvalidPageCount(usize),
    /// No free run of the requested level or above exists right now.
    #[error("no free run of {0} or more pages")]
    OutOfMemory(usize),
}

/// Buddy allocator for page frames in a fixed 64 MiB region.
///
/// All state is inline: the node arena, the per-level free-list heads
/// and counts, and the region base. `new` produces an empty allocator
/// in which nothing can be allocated; [`init`](Self::init) seeds the
/// root as the single free block.
///
/// The struct is large (one record per tree node) and is meant to live
/// in a static, not on a kernel stack.
pub struct BuddyFrameAlloc {
    /// Node records in heap order.
    nodes: [Node; NODES],
    /// Head of the doubly-linked free list per level.
    free_heads: [Option<NodeId>; DEPTH],
    /// Length of each free list.
    free_counts: [usize; DEPTH],
    /// First byte of the managed region.
    region: PhysicalAddress,
    /// Set by [`init`](Self::init).
    initialized: bool,
}

impl Default for BuddyFrameAlloc {
    fn default() -> Self {
        Self::new()
    }
}

impl BuddyFrameAlloc {
    /// An empty allocator; every free list is empty until [`init`](Self::init).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: [Node::EMPTY; NODES],
            free_heads: [None; DEPTH],
            free_counts: [0; DEPTH],
            region: PhysicalAddress::zero(),
            initialized: false,
        }
    }

    /// Whether [`init`](Self::init) has run.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// First byte of the managed region.
    #[must_use]
    pub const fn region_start(&self) -> PhysicalAddress {
        self.region
    }

    /// First byte past the managed region.
    #[must_use]
    pub const fn region_end(&self) -> PhysicalAddress {
        PhysicalAddress::new(self.region.as_u64() + REGION_BYTES)
    }

    /// Seeds the allocator to manage [`REGION_BYTES`] starting at
    /// `region_start`: the root becomes the single free block and every
    /// other node is taken out of play. A repeated call rebuilds from
    /// scratch, forgetting all allocations.
    ///
    /// # Panics
    /// Panics if `region_start` is not page-aligned.
    pub fn init(&mut self, region_start: PhysicalAddress) {
        assert!(
            region_start.is_aligned_to(PAGE_SIZE),
            "region base {region_start} is not page-aligned"
        );

        // Reset in place; the node table is far too large to round-trip
        // through the stack.
        for node in &mut self.nodes {
            *node = Node::EMPTY;
        }
        self.free_heads = [None; DEPTH];
        self.free_counts = [0; DEPTH];
        self.region = region_start;

        self.nodes[NodeId::ROOT.index()].state = NodeState::Free;
        self.link_head(NodeId::ROOT);
        self.initialized = true;
    }

    /// Allocates a naturally aligned run of `pages` contiguous frames.
    ///
    /// `pages` must be a power of two in `1..=`[`PAGES`]. The run is
    /// not zeroed. On exhaustion one warning line is logged and the
    /// allocator state is left untouched.
    ///
    /// # Errors
    /// [`AllocError::InvalidPageCount`] for a malformed count,
    /// [`AllocError::OutOfMemory`] when no free run at or above the
    /// requested level exists.
    pub fn allocate(&mut self, pages: usize) -> Result<PhysicalAddress, AllocError> {
        if pages == 0 || pages > PAGES || !pages.is_power_of_two() {
            return Err(AllocError::InvalidPageCount(pages));
        }
        let target = pages.trailing_zeros() as usize;

        // Best fit by level: the first non-empty list at or above the
        // target holds the smallest usable block.
        for level in target..DEPTH {
            if let Some(block) = self.pop_head(level) {
                return Ok(self.split_to(block, target));
            }
        }

        log::warn!("frame allocation of {pages} pages failed: region exhausted");
        Err(AllocError::OutOfMemory(pages))
    }

    /// Returns the run based at `pa` to the allocator and coalesces it
    /// with free buddies as far up the tree as possible.
    ///
    /// # Panics
    /// Panics if `pa` is null, not page-aligned, outside the managed
    /// region, or not the base of a live allocation (double free,
    /// mid-block free). These are kernel bugs; continuing would corrupt
    /// unrelated allocations.
    pub fn free(&mut self, pa: PhysicalAddress) {
        assert!(!pa.is_null(), "free of the null frame");
        assert!(pa.is_aligned_to(PAGE_SIZE), "free of unaligned address {pa}");
        assert!(
            self.region <= pa && pa < self.region_end(),
            "free of address {pa} outside the managed region"
        );

        // Left children cover the lower half of their parent's run, so
        // the address pins a unique path from the root.
        let mut node = NodeId::ROOT;
        while self.nodes[node.index()].state == NodeState::Internal {
            let right = node.right();
            node = if pa < self.base_of(right) {
                node.left()
            } else {
                right
            };
        }

        assert!(
            self.nodes[node.index()].state == NodeState::Used && self.base_of(node) == pa,
            "free of address {pa} that is not the base of a live allocation"
        );

        // Merge with the buddy while it is wholly free, then publish
        // the final run. An internal node never ends up with two
        // nonexistent children: the merged parent immediately becomes
        // the candidate block.
        while let (Some(parent), Some(buddy)) = (node.parent(), node.buddy()) {
            if self.nodes[buddy.index()].state != NodeState::Free {
                break;
            }
            self.unlink(buddy);
            self.nodes[node.index()].state = NodeState::Nonexistent;
            self.nodes[buddy.index()].state = NodeState::Nonexistent;
            node = parent;
        }

        self.nodes[node.index()].state = NodeState::Free;
        self.link_head(node);
    }

    /// Used/free totals and the per-level free counts.
    #[must_use]
    pub fn usage(&self) -> FrameUsage {
        let mut free_pages = 0;
        for (level, &count) in self.free_counts.iter().enumerate() {
            free_pages += count << level;
        }
        FrameUsage {
            used_pages: PAGES - free_pages,
            free_pages,
            free_per_level: self.free_counts,
        }
    }

    /// Iterates over every free block, smallest level first.
    pub fn free_ranges(&self) -> FreeRanges<'_> {
        FreeRanges::new(self)
    }

    /// Splits `block` leftward until it sits at `target` level, freeing
    /// the right half at each step, and marks the result used.
    fn split_to(&mut self, mut block: NodeId, target: usize) -> PhysicalAddress {
        while block.level() > target {
            self.nodes[block.index()].state = NodeState::Internal;
            let right = block.right();
            self.nodes[right.index()].state = NodeState::Free;
            self.link_head(right);
            block = block.left();
        }
        self.nodes[block.index()].state = NodeState::Used;
        self.base_of(block)
    }

    /// Links `id` at the head of its level's free list.
    ///
    /// The node must not currently be linked anywhere.
    fn link_head(&mut self, id: NodeId) {
        let level = id.level();
        let old_head = self.free_heads[level].replace(id);
        self.nodes[id.index()].prev = None;
        self.nodes[id.index()].next = old_head;
        if let Some(old) = old_head {
            self.nodes[old.index()].prev = Some(id);
        }
        self.free_counts[level] += 1;
    }

    /// Unlinks `id` from its level's free list and clears its links.
    fn unlink(&mut self, id: NodeId) {
        let level = id.level();
        let Node { prev, next, .. } = self.nodes[id.index()];
        match prev {
            Some(p) => self.nodes[p.index()].next = next,
            None => self.free_heads[level] = next,
        }
        if let Some(n) = next {
            self.nodes[n.index()].prev = prev;
        }
        self.free_counts[level] -= 1;
        self.nodes[id.index()].prev = None;
        self.nodes[id.index()].next = None;
    }

    /// Takes the head of the free list at `level`, if any.
    fn pop_head(&mut self, level: usize) -> Option<NodeId> {
        let head = self.free_heads[level]?;
        self.unlink(head);
        Some(head)
    }

    /// Base address of the run covered by `id`.
    pub(crate) fn base_of(&self, id: NodeId) -> PhysicalAddress {
        self.region + id.page_offset() as u64 * PAGE_SIZE
    }

    pub(crate) fn free_head(&self, level: usize) -> Option<NodeId> {
        self.free_heads[level]
    }

    pub(crate) fn next_free(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].next
    }
}
