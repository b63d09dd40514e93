//! Kernel-wide allocator instance.
//!
//! One [`BuddyFrameAlloc`] behind one named spin lock. Every entry
//! point acquires the lock with interrupts disabled
//! ([`lock_irq`](kernel_sync::Mutex::lock_irq)): interrupt handlers
//! allocate too, and taking an interrupt while holding the lock on the
//! same CPU would deadlock. Neither operation suspends; both run to
//! completion under the lock, bounded by the tree depth.

use kernel_addresses::PhysicalAddress;
use kernel_sync::SpinMutex;

use crate::frame_alloc::BuddyFrameAlloc;
use crate::layout::{PAGE_SIZE, PAGES};
use crate::stats::FrameUsage;

static FRAME_ALLOCATOR: SpinMutex<BuddyFrameAlloc> =
    SpinMutex::named("buddy_frames", BuddyFrameAlloc::new());

/// Seeds the kernel allocator with its managed region.
///
/// Call once during early boot, before the first allocation. The caller
/// supplies the first page-aligned byte past the kernel image.
///
/// # Panics
/// Panics on a second call or an unaligned `region_start`.
pub fn init(region_start: PhysicalAddress) {
    let mut alloc = FRAME_ALLOCATOR.lock_irq();
    assert!(
        !alloc.is_initialized(),
        "frame allocator already initialized"
    );
    alloc.init(region_start);
    log::info!("frame allocator: {PAGES} pages of {PAGE_SIZE} bytes at {region_start}");
}

/// Allocates a naturally aligned run of `pages` contiguous frames.
///
/// Returns `None` for malformed counts (zero, above [`PAGES`], not a
/// power of two) and on exhaustion; the latter logs one warning line.
/// The run is not zeroed and is owned by the caller until passed back
/// to [`free_pages`].
#[must_use]
pub fn alloc_pages(pages: usize) -> Option<PhysicalAddress> {
    FRAME_ALLOCATOR.lock_irq().allocate(pages).ok()
}

/// Returns a run previously obtained from [`alloc_pages`].
///
/// # Panics
/// Panics if `pa` is not the base of a live allocation; see
/// [`BuddyFrameAlloc::free`].
pub fn free_pages(pa: PhysicalAddress) {
    FRAME_ALLOCATOR.lock_irq().free(pa);
}

/// Usage snapshot of the kernel allocator.
#[must_use]
pub fn usage() -> FrameUsage {
    FRAME_ALLOCATOR.lock_irq().usage()
}

/// Logs the usage snapshot at info level.
pub fn log_usage() {
    log::info!("{}", usage());
}
