//! # Buddy Allocator for Physical Page Frames
//!
//! This crate hands out contiguous, power-of-two-sized runs of 4 KiB
//! page frames from one fixed 64 MiB region and reclaims them on
//! release, coalescing free buddies back into larger blocks. Every page
//! allocation in the kernel goes through it.
//!
//! ## Structure
//!
//! ```text
//! level 14            [ root: 16384 pages ]
//! level 13       [ 8192 ]              [ 8192 ]
//!   ...             ...                   ...
//! level 0    [1] [1] [1] ...                   ... [1] [1]
//! ```
//!
//! The region is a perfect binary tree of depth 15: the root covers the
//! whole region, each node covers twice its children, leaves cover one
//! page. The tree is fully materialized as an arena of `2·16384 − 1`
//! small records; per-level doubly-linked free lists plus
//! counts make "smallest free block at or above level L" an O(depth)
//! scan and splicing O(1).
//!
//! Allocation finds that smallest block, splits it leftward down to the
//! exact level (each split frees the right half), and returns the base
//! address. Freeing descends by address from the root, then merges the
//! run with its buddy as long as the buddy is wholly free. Both paths
//! are bounded by the tree depth.
//!
//! ## Components
//!
//! | Module | Contents |
//! |---|---|
//! | [`layout`] | Region geometry constants ([`PAGE_SIZE`], [`PAGES`], [`DEPTH`], …) |
//! | `node` (private) | Heap-order node ids and arena records |
//! | [`frame_alloc`] | [`BuddyFrameAlloc`]: the allocator as a plain value |
//! | [`stats`] | [`FrameUsage`] snapshots and the [`FreeRanges`] dump |
//! | [`global`] | The kernel-wide instance behind a named spin lock |
//!
//! ## Concurrency
//!
//! [`BuddyFrameAlloc`] itself is single-threaded; the singleton in
//! [`global`] serializes all CPUs through one spin lock, acquired with
//! interrupts disabled. Operations are linearizable at the point their
//! critical section ends and never suspend while holding the lock.
//!
//! ## Failure model
//!
//! Malformed allocation requests and exhaustion are recoverable and
//! reported as values ([`AllocError`], flattened to `None` at the
//! kernel-facing surface). A bad `free` (unaligned, out of range, or
//! not the base of a live allocation) panics: by that point the caller
//! has already violated memory safety somewhere, and continuing would
//! let the corruption spread.
//!
//! ## Example
//!
//! ```rust
//! use kernel_addresses::PhysicalAddress;
//! use kernel_buddy::{BuddyFrameAlloc, PAGE_SIZE};
//!
//! let mut alloc = Box::new(BuddyFrameAlloc::new());
//! alloc.init(PhysicalAddress::new(0x0010_0000));
//!
//! let run = alloc.allocate(8).unwrap();
//! assert!(run.is_aligned_to(8 * PAGE_SIZE));
//! alloc.free(run);
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]

pub mod frame_alloc;
pub mod global;
pub mod layout;
mod node;
pub mod stats;

pub use frame_alloc::{AllocError, BuddyFrameAlloc};
pub use global::{alloc_pages, free_pages, init, log_usage, usage};
pub use layout::{DEPTH, NODES, PAGE_SIZE, PAGES, REGION_BYTES};
pub use stats::{FrameUsage, FreeRange, FreeRanges};

pub use kernel_addresses::PhysicalAddress;
