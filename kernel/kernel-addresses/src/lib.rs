//! # Physical Memory Address Type
//!
//! A strongly typed wrapper for raw physical addresses used by the
//! physical-memory management code.
//!
//! The single exported type, [`PhysicalAddress`], is a zero-cost
//! `#[repr(transparent)]` wrapper around `u64`. It exists to carry intent:
//! frame-allocator interfaces that traffic in plain integers invite
//! accidental mix-ups between byte counts, page counts, and addresses.
//!
//! All arithmetic and alignment helpers are `const fn`, so region layouts
//! can be computed at compile time.
//!
//! ```rust
//! # use kernel_addresses::PhysicalAddress;
//! // Round the end-of-kernel address up to the next page boundary.
//! let end_of_kernel = PhysicalAddress::new(0x0010_2345);
//! let region = end_of_kernel.align_up(4096);
//! assert_eq!(region.as_u64(), 0x0010_3000);
//! assert!(region.is_aligned_to(4096));
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]

mod physical_address;

pub use physical_address::PhysicalAddress;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_up_and_down() {
        let a = PhysicalAddress::new(0x12345);
        assert_eq!(a.align_down(4096).as_u64(), 0x12000);
        assert_eq!(a.align_up(4096).as_u64(), 0x13000);

        // Aligned addresses are fixed points of both roundings.
        let b = PhysicalAddress::new(0x13000);
        assert_eq!(b.align_up(4096), b);
        assert_eq!(b.align_down(4096), b);
    }

    #[test]
    fn alignment_predicate() {
        assert!(PhysicalAddress::new(0x8000).is_aligned_to(4096));
        assert!(!PhysicalAddress::new(0x8010).is_aligned_to(4096));
        assert!(PhysicalAddress::zero().is_aligned_to(4096));
    }

    #[test]
    fn offsets_within_a_region() {
        let base = PhysicalAddress::new(0x10_0000);
        let inside = base + 3 * 4096;
        assert_eq!(inside.checked_offset_from(base), Some(3 * 4096));
        assert_eq!(base.checked_offset_from(inside), None);
    }

    #[test]
    fn null_check() {
        assert!(PhysicalAddress::zero().is_null());
        assert!(!PhysicalAddress::new(1).is_null());
    }

    #[test]
    fn formatting() {
        let a = PhysicalAddress::new(0x10_0000);
        assert_eq!(format!("{a}"), "0x0000000000100000");
        assert_eq!(format!("{a:?}"), "PA(0x0000000000100000)");
    }
}
