//! A segregated-free-list allocator for user-space heaps.
//!
//! This crate provides [`Heap`], a growable heap over a pluggable
//! [`PageProvider`], and [`Allocator`], a thin `spin::Mutex`-guarded facade
//! over a `Heap` suitable for use from a `static`. Unlike a `GlobalAlloc`
//! implementation, the public surface here takes plain byte counts rather
//! than [`core::alloc::Layout`]; it is meant to be called directly, not
//! plugged in as `#[global_allocator]`.
//!
//! # Usage
//! ```no_run
//! use segfit::{Allocator, ArenaProvider};
//!
//! static HEAP: Allocator<ArenaProvider<{ 1024 * 1024 }>> =
//!     Allocator::new(ArenaProvider::new());
//!
//! let p = HEAP.allocate(64);
//! assert!(!p.is_null());
//! HEAP.free(p);
//! ```
//!
//! # Implementation
//! The heap is a single contiguous span, grown one page at a time from a
//! [`PageProvider`]. Free space is tracked two ways: a fixed array of
//! segregated, size-class-indexed free lists (first-fit, LIFO insertion),
//! and a fixed array of per-exact-size quick lists — bounded stacks of
//! recently-freed small blocks kept marked allocated, so that a matching
//! re-allocation skips both the coalescing and the first-fit search.
//!
//! Every block carries an 8-byte header and (except the heap's epilogue
//! sentinel) an 8-byte footer, each XOR-obfuscated against a fixed constant.
//! A reserved bit surfacing on decode, or a header disagreeing with its
//! footer, means a wild write has landed on the heap; `free` treats that as
//! fatal and aborts the process rather than continuing on corrupted
//! bookkeeping.
//!
//! See the individual modules for the algorithms: [`block`] for the
//! header/footer encoding, [`layout`] for the heap's shape, [`free_list`]
//! and [`quick_list`] for the two block-tracking structures, [`splice`] for
//! the split/coalesce algebra, and [`heap`] for how they compose into
//! `allocate`/`free`/`reallocate`/`fragmentation`/`utilization`.

mod block;
mod error;
mod free_list;
mod heap;
mod layout;
mod page_provider;
mod quick_list;
mod splice;

pub use error::{clear_last_error, last_error, ErrorCode};
pub use heap::Heap;
pub use page_provider::{ArenaProvider, PageProvider};

/// A [`Heap`] wrapped in a `spin::Mutex`, safe to reach from a shared
/// reference (e.g. a `static`).
///
/// The lock is purely a Rust aliasing guard, not a concurrency design: the
/// allocator's bookkeeping assumes one logical caller completes each
/// operation before the next begins. Calling `allocate`/`free`/`reallocate`
/// concurrently from multiple threads is memory-safe but gives no
/// correctness guarantee about the allocator's internal accounting across
/// the interleaving.
pub struct Allocator<P: PageProvider>(spin::Mutex<Heap<P>>);

impl<P: PageProvider> Allocator<P> {
    /// Wrap `provider` in a heap and a lock. No memory is requested from
    /// `provider` until the first `allocate` call.
    pub const fn new(provider: P) -> Self {
        Self(spin::Mutex::new(Heap::new(provider)))
    }

    /// See [`Heap::allocate`].
    pub fn allocate(&self, size: usize) -> *mut u8 {
        self.0.lock().allocate(size)
    }

    /// See [`Heap::free`].
    pub fn free(&self, ptr: *mut u8) {
        self.0.lock().free(ptr)
    }

    /// See [`Heap::reallocate`].
    pub fn reallocate(&self, ptr: *mut u8, new_size: usize) -> *mut u8 {
        self.0.lock().reallocate(ptr, new_size)
    }

    /// See [`Heap::fragmentation`].
    pub fn fragmentation(&self) -> f64 {
        self.0.lock().fragmentation()
    }

    /// See [`Heap::utilization`].
    pub fn utilization(&self) -> f64 {
        self.0.lock().utilization()
    }
}
