use crate::{RawLock, RawUnlock};
use core::hint::spin_loop;
use core::sync::atomic::{AtomicBool, Ordering};

/// A test-and-test-and-set spinlock flag.
///
/// The raw primitive behind [`SpinMutex`](crate::SpinMutex). It
/// busy-waits until the lock becomes available; it never sleeps or
/// yields. It is unfair and not reentrant, and is intended for very
/// short critical sections where spinning is cheaper than any form of
/// blocking.
///
/// `RawSpin` is deliberately inert on its own: acquisition and release
/// happen only through the [`RawLock`]/[`RawUnlock`] impls, which is to
/// say through [`Mutex`](crate::Mutex) guards. Nothing in the kernel
/// takes this lock by hand.
pub struct RawSpin {
    /// Lock state (`false` = unlocked, `true` = held).
    held: AtomicBool,
}

impl Default for RawSpin {
    fn default() -> Self {
        Self::new()
    }
}

impl RawSpin {
    /// Creates a new, unlocked flag.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            held: AtomicBool::new(false),
        }
    }
}

impl RawLock for RawSpin {
    /// Acquires the lock, spinning until it becomes available.
    ///
    /// The inner read-only loop keeps the cache line shared while the
    /// lock is held elsewhere; only the outer `swap` writes.
    #[inline]
    fn raw_lock(&self) {
        while self.held.swap(true, Ordering::Acquire) {
            while self.held.load(Ordering::Relaxed) {
                spin_loop();
            }
        }
    }

    /// Attempts to acquire the lock without spinning.
    ///
    /// Probes with a plain load first so a failed attempt does not
    /// dirty the line under the current holder.
    #[inline]
    fn raw_try_lock(&self) -> bool {
        !self.held.load(Ordering::Relaxed) && !self.held.swap(true, Ordering::Acquire)
    }
}

impl RawUnlock for RawSpin {
    #[inline]
    unsafe fn raw_unlock(&self) {
        self.held.store(false, Ordering::Release);
    }
}
