use crate::{RawLock, RawUnlock};
use core::cell::UnsafeCell;
use core::marker::PhantomData;
use core::ops::{Deref, DerefMut};

/// A generic mutex that delegates locking to a raw lock implementation.
///
/// `Mutex<T, R>` protects a value of type `T` using a raw primitive `R`
/// implementing [`RawLock`] and [`RawUnlock`]. The mutex does not track
/// poisoning or ownership; it acquires and releases the raw lock and
/// hands out access to `T` through a guard that unlocks on drop.
///
/// Every mutex carries a static diagnostic name, assigned at
/// construction. Subsystem locks should use a descriptive one (see
/// [`SpinMutex::named`](crate::SpinMutex::named)); the name is never
/// interpreted, only reported.
///
/// # Examples
///
/// ```
/// use kernel_sync::SpinMutex;
///
/// static COUNTER: SpinMutex<u64> = SpinMutex::named("example_counter", 0);
///
/// {
///     let mut g = COUNTER.lock();
///     *g += 1;
/// } // guard drops, unlocking
///
/// assert_eq!(*COUNTER.lock(), 1);
/// assert_eq!(COUNTER.name(), "example_counter");
/// ```
///
/// # Concurrency & Safety
///
/// The type is `!Send`/`!Sync` by default (via a `PhantomData` marker)
/// and re-gains both under the usual bounds: `Sync` when `T: Send` and
/// `R: Sync`, `Send` when `T: Send` and `R: Send`. Cross-thread
/// correctness relies on `R` providing mutual exclusion and
/// acquire/release ordering.
pub struct Mutex<T, R> {
    /// The underlying raw lock primitive.
    raw: R,
    /// Diagnostic name; `"<unnamed>"` unless given at construction.
    name: &'static str,
    /// The protected value.
    cell: UnsafeCell<T>,
    /// Prevent default auto-`Send`/`Sync`; re-added with bounds below.
    _no_send_sync: PhantomData<*mut ()>,
}

// Safety: mutual exclusion is delegated to `R`; data may only cross threads if `T: Send`.
unsafe impl<T: Send, R: Sync> Sync for Mutex<T, R> {}
unsafe impl<T: Send, R: Send> Send for Mutex<T, R> {}

impl<T, R> Mutex<T, R> {
    /// Constructs a `Mutex` from a raw lock and an initial value.
    pub const fn from_raw(raw: R, value: T) -> Self {
        Self::from_raw_named(raw, "<unnamed>", value)
    }

    /// Constructs a named `Mutex` from a raw lock and an initial value.
    pub const fn from_raw_named(raw: R, name: &'static str, value: T) -> Self {
        Self {
            raw,
            name,
            cell: UnsafeCell::new(value),
            _no_send_sync: PhantomData,
        }
    }

    /// The diagnostic name given at construction.
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns a mutable reference to the inner value.
    ///
    /// Because you hold `&mut self`, no other references can exist, so
    /// locking is unnecessary.
    #[inline]
    pub const fn get_mut(&mut self) -> &mut T {
        self.cell.get_mut()
    }
}

impl<T, R> Mutex<T, R>
where
    R: RawLock + RawUnlock,
{
    /// Acquires the lock and returns a guard that unlocks on drop.
    ///
    /// The blocking behavior depends on the raw primitive; with
    /// [`RawSpin`](crate::RawSpin) this spins.
    #[inline]
    pub fn lock(&self) -> MutexGuard<'_, T, R> {
        self.raw.raw_lock();
        MutexGuard { m: self }
    }

    /// Attempts to acquire the lock without blocking.
    ///
    /// Returns `Some(guard)` on success, or `None` if the lock is
    /// currently held.
    #[inline]
    pub fn try_lock(&self) -> Option<MutexGuard<'_, T, R>> {
        if self.raw.raw_try_lock() {
            Some(MutexGuard { m: self })
        } else {
            None
        }
    }
}

/// A guard that releases a [`Mutex`] when dropped.
///
/// Created by [`Mutex::lock`] and [`Mutex::try_lock`]. Implements
/// [`Deref`] and [`DerefMut`] to access the protected value.
pub struct MutexGuard<'a, T, R>
where
    R: RawUnlock,
{
    m: &'a Mutex<T, R>,
}

impl<T, R> Deref for MutexGuard<'_, T, R>
where
    R: RawUnlock,
{
    type Target = T;

    fn deref(&self) -> &T {
        // Safety: the guard holds the lock exclusively.
        unsafe { &*self.m.cell.get() }
    }
}

impl<T, R> DerefMut for MutexGuard<'_, T, R>
where
    R: RawUnlock,
{
    fn deref_mut(&mut self) -> &mut T {
        // Safety: the guard holds the lock exclusively.
        unsafe { &mut *self.m.cell.get() }
    }
}

impl<T, R> Drop for MutexGuard<'_, T, R>
where
    R: RawUnlock,
{
    fn drop(&mut self) {
        // Unlock on scope exit.
        unsafe { self.m.raw.raw_unlock() }
    }
}
