use kernel_sync::SpinMutex;

#[test]
fn basic_lock_and_raii() {
    let l = SpinMutex::new(0_u32);

    // take the lock, mutate, and drop
    {
        let mut g = l.lock();
        *g = 41;
    }

    // lock again; previous drop must have unlocked
    {
        let mut g = l.lock();
        *g += 1;
        assert_eq!(*g, 42);
    }
}

#[test]
fn try_lock_semantics() {
    let l = SpinMutex::new(1u8);

    // first try_lock should succeed
    let g1 = l.try_lock();
    assert!(g1.is_some());
    assert_eq!(**g1.as_ref().unwrap(), 1);

    // while held, try_lock must fail
    let g2 = l.try_lock();
    assert!(g2.is_none());

    // dropping the guard allows another try_lock
    drop(g1);
    let g3 = l.try_lock();
    assert!(g3.is_some());
}

#[test]
fn named_lock_reports_its_name() {
    let named = SpinMutex::named("buddy_frames", ());
    assert_eq!(named.name(), "buddy_frames");

    let anonymous = SpinMutex::new(());
    assert_eq!(anonymous.name(), "<unnamed>");
}

#[test]
fn get_mut_allows_direct_mutation() {
    let mut l = SpinMutex::new(vec![1, 2, 3]);
    // &mut self guarantees no contention; we get a plain &mut T
    l.get_mut().push(4);
    assert_eq!(l.lock().as_slice(), &[1, 2, 3, 4]);
}

#[test]
fn lock_irq_is_a_plain_lock_on_hosted_targets() {
    let l = SpinMutex::named("irq_path", 7u32);

    {
        let mut g = l.lock_irq();
        *g += 1;
        // the lock is genuinely held while the irq guard is alive
        assert!(l.try_lock().is_none());
    }

    assert_eq!(*l.lock(), 8);
}

#[test]
fn contended_increments_are_exact_and_exclusive() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;

    let threads = 8; // keep small for determinism
    let iters = 5_000; // likewise

    let lock = Arc::new(SpinMutex::new(0usize));
    let in_cs = Arc::new(AtomicUsize::new(0));
    let start = Arc::new(Barrier::new(threads));

    let mut handles = Vec::with_capacity(threads);
    for _ in 0..threads {
        let lock = Arc::clone(&lock);
        let in_cs = Arc::clone(&in_cs);
        let start = Arc::clone(&start);
        handles.push(thread::spawn(move || {
            start.wait();
            for _ in 0..iters {
                {
                    let mut v = lock.lock();
                    let prev = in_cs.fetch_add(1, Ordering::SeqCst);
                    assert_eq!(prev, 0, "mutual exclusion violated");
                    *v += 1;
                    in_cs.fetch_sub(1, Ordering::SeqCst);
                }

                // yield only AFTER releasing the lock to reduce convoy effects
                thread::yield_now();
            }
        }));
    }

    for h in handles {
        h.join().unwrap();
    }

    let total = *lock.lock();
    assert_eq!(total, threads * iters);
    assert_eq!(in_cs.load(Ordering::SeqCst), 0);
}

#[test]
fn lock_is_released_on_panic() {
    use std::panic;

    let l = SpinMutex::new(0u32);

    let res = panic::catch_unwind(panic::AssertUnwindSafe(|| {
        let mut g = l.lock();
        *g = 123;
        panic!("boom");
    }));
    assert!(res.is_err(), "expected panic");

    // the guard unwound, so we can lock again right away
    let val = *l.lock();
    assert_eq!(val, 123);
}

/// Spot-check a concrete instantiation compiles as Sync.
#[test]
fn spin_mutex_is_sync_for_send_t() {
    fn takes_sync<S: Sync>(_s: &S) {}
    let l = SpinMutex::new(0u8);
    takes_sync(&l);
}
