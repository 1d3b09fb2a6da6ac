use segfit::{Allocator, ArenaProvider};

#[test]
fn is_usable_in_const_contexts() {
    const _ALLOCATOR1: Allocator<ArenaProvider<{ 4096 * 8 }>> = Allocator::new(ArenaProvider::new());
    static _ALLOCATOR2: Allocator<ArenaProvider<{ 4096 * 8 }>> = Allocator::new(ArenaProvider::new());
}

#[test]
#[should_panic(expected = "MAX_BYTES must be a multiple of PAGE_SIZE")]
fn arena_capacity_must_be_a_multiple_of_page_size() {
    let _provider = ArenaProvider::<100>::new(); // panic here
}

#[test]
fn allocate_returns_non_null_and_free_accepts_it() {
    let allocator: Allocator<ArenaProvider<{ 4096 * 4 }>> = Allocator::new(ArenaProvider::new());
    let p = allocator.allocate(64);
    assert!(!p.is_null());
    allocator.free(p);
}

#[test]
fn reallocate_preserves_contents_across_a_growth() {
    let allocator: Allocator<ArenaProvider<{ 4096 * 4 }>> = Allocator::new(ArenaProvider::new());
    let p = allocator.allocate(8);
    // SAFETY: `p` is valid for at least 8 bytes just allocated above.
    unsafe { p.cast::<u64>().write(0x00FF_00FF_00FF_00FF) };

    let q = allocator.reallocate(p, 200);
    assert!(!q.is_null());
    // SAFETY: `q` is valid for at least 200 bytes, and the first 8 were
    // copied from `p` by `reallocate`.
    let preserved = unsafe { q.cast::<u64>().read() };
    assert_eq!(preserved, 0x00FF_00FF_00FF_00FF);

    allocator.free(q);
}

#[test]
fn fragmentation_and_utilization_are_observable_through_the_facade() {
    let allocator: Allocator<ArenaProvider<{ 4096 * 4 }>> = Allocator::new(ArenaProvider::new());
    assert_eq!(allocator.fragmentation(), 0.0);
    assert_eq!(allocator.utilization(), 0.0);

    let p = allocator.allocate(100);
    assert!(allocator.fragmentation() > 0.0);
    assert!(allocator.utilization() > 0.0);

    allocator.free(p);
}

#[test]
fn exhausting_the_arena_reports_out_of_memory() {
    let allocator: Allocator<ArenaProvider<{ 4096 }>> = Allocator::new(ArenaProvider::new());
    let p = allocator.allocate(1_000_000);
    assert!(p.is_null());
    assert_eq!(segfit::last_error(), segfit::ErrorCode::OutOfMemory);
}
