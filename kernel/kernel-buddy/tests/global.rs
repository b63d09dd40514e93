//! The singleton is process-global, so everything runs in one test.

use kernel_buddy::{PAGE_SIZE, PAGES, PhysicalAddress, alloc_pages, free_pages, init, log_usage, usage};

#[test]
fn kernel_singleton_end_to_end() {
    init(PhysicalAddress::new(0x0010_0000));

    let p = alloc_pages(4).expect("4-page allocation");
    assert!(p.is_aligned_to(4 * PAGE_SIZE));
    assert_eq!(usage().used_pages, 4);

    // malformed counts surface as None, silently
    assert_eq!(alloc_pages(3), None);
    assert_eq!(alloc_pages(0), None);

    free_pages(p);
    let u = usage();
    assert_eq!(u.used_pages, 0);
    assert_eq!(u.free_pages, PAGES);

    // exhaustion also surfaces as None
    let whole = alloc_pages(PAGES).expect("whole region");
    assert_eq!(whole, PhysicalAddress::new(0x0010_0000));
    assert_eq!(alloc_pages(1), None);
    free_pages(whole);

    // report path (no logger installed; must simply not disturb state)
    log_usage();
    assert_eq!(usage().free_pages, PAGES);
}
