//! Usage reporting and free-block enumeration.

use core::fmt;

use kernel_addresses::PhysicalAddress;

use crate::frame_alloc::BuddyFrameAlloc;
use crate::layout::DEPTH;
use crate::node::NodeId;

/// Point-in-time usage snapshot.
///
/// `Eq` on the whole snapshot makes round-trip tests cheap: two
/// allocator states with the same free-count vector report equal.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FrameUsage {
    /// Pages currently handed out.
    pub used_pages: usize,
    /// Pages currently available, summed over every free block.
    pub free_pages: usize,
    /// Free block count per level; index `l` holds runs of `2^l` pages.
    pub free_per_level: [usize; DEPTH],
}

impl fmt::Display for FrameUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "used = {}, free = {}, free blocks per level = {:?}",
            self.used_pages, self.free_pages, self.free_per_level
        )
    }
}

/// A contiguous run of free pages.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FreeRange {
    /// First byte of the run.
    pub base: PhysicalAddress,
    /// Length in pages; always a power of two.
    pub pages: usize,
}

/// Iterator over every free block, smallest level first.
///
/// Within a level, blocks appear in free-list order (most recently
/// freed first). Produced by
/// [`BuddyFrameAlloc::free_ranges`](crate::BuddyFrameAlloc::free_ranges).
pub struct FreeRanges<'a> {
    alloc: &'a BuddyFrameAlloc,
    level: usize,
    cursor: Option<NodeId>,
}

impl<'a> FreeRanges<'a> {
    pub(crate) fn new(alloc: &'a BuddyFrameAlloc) -> Self {
        Self {
            alloc,
            level: 0,
            cursor: alloc.free_head(0),
        }
    }
}

impl Iterator for FreeRanges<'_> {
    type Item = FreeRange;

    fn next(&mut self) -> Option<FreeRange> {
        loop {
            if let Some(id) = self.cursor {
                self.cursor = self.alloc.next_free(id);
                return Some(FreeRange {
                    base: self.alloc.base_of(id),
                    pages: id.size_pages(),
                });
            }
            if self.level + 1 == DEPTH {
                return None;
            }
            self.level += 1;
            self.cursor = self.alloc.free_head(self.level);
        }
    }
}
