//! Interrupt-safe lock acquisition.
//!
//! A lock shared with interrupt context must be taken with interrupts
//! disabled: an interrupt arriving while the lock is held on the same
//! CPU would spin on it forever. [`Mutex::lock_irq`] packages the
//! discipline (save the interrupt flag, disable, acquire) and undoes
//! it in reverse order when the guard drops.
//!
//! The flag manipulation is only meaningful on a bare-metal x86-64
//! target. Hosted builds (the test suites) compile no-op stubs: there is
//! no interrupt flag to manage in a user process, and the lock itself
//! still provides mutual exclusion.

use crate::{Mutex, MutexGuard, RawLock, RawUnlock};
use core::ops::{Deref, DerefMut};

#[cfg(all(target_arch = "x86_64", target_os = "none"))]
mod arch {
    /// Returns the current `RFLAGS` value (via `pushfq/pop`).
    #[inline]
    pub fn rflags() -> u64 {
        let r: u64;
        unsafe { core::arch::asm!("pushfq; pop {}", out(reg) r, options(nostack, preserves_flags)) }
        r
    }

    /// Disables hardware interrupts (`cli`).
    #[inline]
    pub fn disable_interrupts() {
        unsafe { core::arch::asm!("cli", options(nomem, nostack, preserves_flags)) }
    }

    /// Enables hardware interrupts (`sti`).
    #[inline]
    pub fn enable_interrupts() {
        unsafe { core::arch::asm!("sti", options(nomem, nostack, preserves_flags)) }
    }
}

#[cfg(not(all(target_arch = "x86_64", target_os = "none")))]
mod arch {
    /// Hosted stand-in: reads as "interrupts disabled".
    #[inline]
    pub fn rflags() -> u64 {
        0
    }

    #[inline]
    pub fn disable_interrupts() {}

    #[inline]
    pub fn enable_interrupts() {}
}

/// `RFLAGS` bit 9: the interrupt-enable flag.
const IF_BIT: u64 = 1 << 9;

/// RAII guard that disables interrupts on creation and restores them on
/// drop.
///
/// The guard snapshots the `IF` bit; `sti` is executed on drop **only**
/// if interrupts were enabled beforehand, so nesting preserves the
/// outermost state.
pub struct IrqGuard {
    /// Whether interrupts were enabled when the guard was created.
    were_enabled: bool,
}

impl Default for IrqGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl IrqGuard {
    /// Disables interrupts if currently enabled and remembers the state.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        let enabled = (arch::rflags() & IF_BIT) != 0;
        if enabled {
            arch::disable_interrupts();
        }
        Self {
            were_enabled: enabled,
        }
    }
}

impl Drop for IrqGuard {
    fn drop(&mut self) {
        if self.were_enabled {
            arch::enable_interrupts();
        }
    }
}

/// A mutex guard that also keeps interrupts disabled while held.
///
/// Created by [`Mutex::lock_irq`]. Field order matters: the inner mutex
/// guard drops (releasing the lock) before the interrupt state is
/// restored.
pub struct IrqMutex<'a, T, R: RawLock + RawUnlock> {
    guard: MutexGuard<'a, T, R>,
    _irq: IrqGuard,
}

impl<T, R: RawLock + RawUnlock> Deref for IrqMutex<'_, T, R> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.guard
    }
}

impl<T, R: RawLock + RawUnlock> DerefMut for IrqMutex<'_, T, R> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.guard
    }
}

impl<T, R: RawLock + RawUnlock> Mutex<T, R> {
    /// Acquires the mutex with interrupts disabled for the guard's
    /// lifetime.
    ///
    /// Interrupts are disabled **before** the acquire, so an interrupt
    /// cannot arrive between taking the flag snapshot and holding the
    /// lock; both are released in reverse order on drop.
    ///
    /// ```
    /// use kernel_sync::SpinMutex;
    ///
    /// static M: SpinMutex<u64> = SpinMutex::named("irq_demo", 0);
    ///
    /// {
    ///     let mut g = M.lock_irq();
    ///     *g += 1;
    /// } // lock released, then interrupt state restored
    /// assert_eq!(*M.lock(), 1);
    /// ```
    #[inline]
    pub fn lock_irq(&self) -> IrqMutex<'_, T, R> {
        let irq = IrqGuard::new();
        let guard = self.lock();
        IrqMutex { guard, _irq: irq }
    }
}
