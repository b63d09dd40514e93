//! # Managed Region Layout
//!
//! Compile-time geometry of the physical region handed to the buddy
//! allocator. The region base itself is a runtime input (the first
//! page-aligned byte past the kernel image); everything else is fixed.

/// Size of one page frame in bytes.
pub const PAGE_SIZE: u64 = 4096;

/// Number of page frames in the managed region (64 MiB).
pub const PAGES: usize = 16_384;

/// Depth of the buddy tree: the root covers all of [`PAGES`], each level
/// below halves the run, leaves cover a single page.
pub const DEPTH: usize = 15;

/// Total node count of the fully materialized tree.
pub const NODES: usize = 2 * PAGES - 1;

/// Byte size of the managed region.
pub const REGION_BYTES: u64 = PAGES as u64 * PAGE_SIZE;

const _: () = {
    assert!(PAGE_SIZE.is_power_of_two());
    assert!(PAGES == 1 << (DEPTH - 1));
    assert!(NODES == (1 << DEPTH) - 1);
};
