//! # Kernel synchronization primitives
//!
//! Spin-based locking for short kernel critical sections.
//!
//! The crate splits locking into a raw primitive ([`RawSpin`]) and a
//! generic RAII wrapper ([`Mutex`]) so the guard machinery is written
//! once. [`SpinMutex`] is the concrete pairing used throughout the
//! kernel.
//!
//! Locks carry a static name for diagnostics; subsystems register their
//! lock once with [`SpinMutex::named`] and the name shows up in debug
//! output when contention is investigated.
//!
//! Interrupt-context callers must use [`Mutex::lock_irq`], which keeps
//! local interrupts disabled for the lifetime of the guard. See [`irq`].

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

pub mod irq;
mod mutex;
mod raw_spin;

pub use irq::{IrqGuard, IrqMutex};
pub use mutex::{Mutex, MutexGuard};
pub use raw_spin::RawSpin;

pub type SpinMutex<T> = Mutex<T, RawSpin>;

impl<T> SpinMutex<T> {
    pub const fn new(value: T) -> Self {
        Self::from_raw(RawSpin::new(), value)
    }

    /// A spin mutex with a diagnostic name, e.g. `"buddy_frames"`.
    pub const fn named(name: &'static str, value: T) -> Self {
        Self::from_raw_named(RawSpin::new(), name, value)
    }
}

/// Acquire side of a raw lock primitive.
pub trait RawLock {
    fn raw_lock(&self);
    fn raw_try_lock(&self) -> bool;
}

/// Release side of a raw lock primitive.
pub trait RawUnlock {
    /// # Safety
    /// The caller must currently hold the lock.
    unsafe fn raw_unlock(&self);
}
