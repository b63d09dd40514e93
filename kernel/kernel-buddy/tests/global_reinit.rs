//! Double initialization of the kernel-wide allocator must panic.
//!
//! Lives in its own test binary: integration test binaries are separate
//! processes, so this is guaranteed to be the first and only caller to
//! touch the singleton.

use kernel_buddy::{PhysicalAddress, init};

#[test]
#[should_panic(expected = "already initialized")]
fn second_init_panics() {
    init(PhysicalAddress::new(0x0010_0000));
    init(PhysicalAddress::new(0x0010_0000));
}
