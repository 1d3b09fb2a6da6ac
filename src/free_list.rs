//! The segregated free lists.
//!
//! `N_FREE` doubly-linked chains, indexed by size class. Class 0 holds
//! exactly-32-byte blocks; class `i > 0` holds `(32*2^(i-1), 32*2^i]`; the
//! last class holds everything larger. Insertion is always at the head
//! (LIFO), and `first_fit` scans forward from the smallest adequate class.
//!
//! Rather than the classic self-referential sentinel node per list (which
//! needs a fixed, never-moved address), each list is a plain nullable head
//! plus `prev`/`next` pointers stored inside the free block's own payload
//! region (bytes `[8, 24)` of the block). This is explicitly permitted by the
//! allocator's design notes: any representation preserving LIFO order and
//! O(1) removal by node identity is equivalent.

use crate::block::{self, Flags};

/// Number of segregated size classes.
pub(crate) const N_FREE: usize = 10;

/// `index_for_size(s)`: 0 if `s <= 32`, else the smallest `i` with
/// `32 * 2^i >= s`, clamped to `N_FREE - 1`.
pub(crate) fn index_for_size(size: usize) -> usize {
    if size <= 32 {
        return 0;
    }
    for i in 1..N_FREE {
        if size <= 32usize << i {
            return i;
        }
    }
    N_FREE - 1
}

/// Offset of the `prev` link within a free block.
const PREV_OFFSET: usize = block::HEADER_SIZE;
/// Offset of the `next` link within a free block.
const NEXT_OFFSET: usize = block::HEADER_SIZE + 8;

/// # Safety
/// `block` must point at a free block at least `MIN_BLOCK` bytes long.
unsafe fn set_prev(block: *mut u8, prev: *mut u8) {
    // SAFETY: caller contract; `MIN_BLOCK >= PREV_OFFSET + 8`.
    unsafe { block.add(PREV_OFFSET).cast::<*mut u8>().write(prev) };
}

/// # Safety
/// `block` must point at a free block at least `MIN_BLOCK` bytes long.
unsafe fn set_next(block: *mut u8, next: *mut u8) {
    // SAFETY: caller contract; `MIN_BLOCK >= NEXT_OFFSET + 8`.
    unsafe { block.add(NEXT_OFFSET).cast::<*mut u8>().write(next) };
}

/// # Safety
/// `block` must point at a free block at least `MIN_BLOCK` bytes long.
unsafe fn get_prev(block: *mut u8) -> *mut u8 {
    // SAFETY: caller contract.
    unsafe { block.add(PREV_OFFSET).cast::<*mut u8>().read() }
}

/// # Safety
/// `block` must point at a free block at least `MIN_BLOCK` bytes long.
unsafe fn get_next(block: *mut u8) -> *mut u8 {
    // SAFETY: caller contract.
    unsafe { block.add(NEXT_OFFSET).cast::<*mut u8>().read() }
}

/// The segregated free lists: one nullable head pointer per size class.
pub(crate) struct FreeLists {
    heads: [*mut u8; N_FREE],
}

impl FreeLists {
    pub(crate) const fn new() -> Self {
        Self {
            heads: [core::ptr::null_mut(); N_FREE],
        }
    }

    /// Write `block`'s header/footer as a free block of `size` bytes and
    /// splice it onto the head of its size class's list.
    ///
    /// # Safety
    /// `block` must be valid for `size` bytes, `size >= MIN_BLOCK`, 16-byte
    /// aligned, and not currently a member of any list.
    pub(crate) unsafe fn insert(&mut self, block: *mut u8, size: usize) {
        // SAFETY: caller contract.
        unsafe { block::write_tagged(block, 0, size, Flags::empty()) };
        let idx = index_for_size(size);
        let old_head = self.heads[idx];
        // SAFETY: caller contract (`size >= MIN_BLOCK`).
        unsafe {
            set_prev(block, core::ptr::null_mut());
            set_next(block, old_head);
            if !old_head.is_null() {
                set_prev(old_head, block);
            }
        }
        self.heads[idx] = block;
    }

    /// Detach `block` (of `size` bytes) from whichever list it is currently
    /// spliced into.
    ///
    /// # Safety
    /// `block` must currently be a member of the free list for `size`.
    pub(crate) unsafe fn remove(&mut self, block: *mut u8, size: usize) {
        let idx = index_for_size(size);
        // SAFETY: caller contract.
        let (prev, next) = unsafe { (get_prev(block), get_next(block)) };
        if prev.is_null() {
            self.heads[idx] = next;
        } else {
            // SAFETY: `prev` is a live list member (caller contract).
            unsafe { set_next(prev, next) };
        }
        if !next.is_null() {
            // SAFETY: `next` is a live list member (caller contract).
            unsafe { set_prev(next, prev) };
        }
    }

    /// First-fit search: starting at `index_for_size(need)`, scan each list
    /// in turn and return the first block whose decoded size is `>= need`,
    /// along with that decoded size. `None` if every list is exhausted.
    pub(crate) fn first_fit(&self, need: usize) -> Option<(*mut u8, usize)> {
        for idx in index_for_size(need)..N_FREE {
            let mut node = self.heads[idx];
            while !node.is_null() {
                // SAFETY: every list member is a live free block.
                let decoded = unsafe { block::read_header(node) };
                let size = decoded.block_size as usize;
                if size >= need {
                    return Some((node, size));
                }
                // SAFETY: `node` is a live list member.
                node = unsafe { get_next(node) };
            }
        }
        None
    }

    #[cfg(test)]
    pub(crate) fn iter_class(&self, idx: usize) -> impl Iterator<Item = *mut u8> + '_ {
        let mut node = self.heads[idx];
        core::iter::from_fn(move || {
            if node.is_null() {
                return None;
            }
            let current = node;
            // SAFETY: test-only walk of a live list.
            node = unsafe { get_next(current) };
            Some(current)
        })
    }
}
