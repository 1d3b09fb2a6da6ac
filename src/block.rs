//! Block header/footer encoding.
//!
//! Every block in the heap — allocated, free, or quick-listed — begins with an
//! 8-byte header word and (for everything except the epilogue) ends with an
//! 8-byte footer word that mirrors it. Both words are obfuscated by XOR-ing
//! with [`MAGIC`] before they ever touch memory; decoding is the same XOR
//! followed by bit-splitting. This is the allocator's only defense against a
//! stale or wild pointer: a write through one will almost certainly decode to
//! an absurd size or a reserved flag bit, rather than quietly pass validation.

use bitflags::bitflags;

/// XORed into every header/footer word before it is stored, and again when it
/// is loaded. Stable for the lifetime of the process.
pub(crate) const MAGIC: u64 = 0x5A17_C0DE_F00D_B17E;

/// Size of the header word, in bytes.
pub(crate) const HEADER_SIZE: usize = 8;
/// Size of the footer word, in bytes.
pub(crate) const FOOTER_SIZE: usize = 8;
/// Smallest legal block, header and footer included.
pub(crate) const MIN_BLOCK: usize = 32;
/// All sizes and addresses dealt with here are multiples of this.
pub(crate) const ALIGN: usize = 16;

bitflags! {
    /// The low-nibble flag bits packed alongside `block_size`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) struct Flags: u32 {
        /// Block is not a free-list member (it is in use, or on a quick list).
        const ALLOCATED = 0b0001;
        /// Block is on a quick list. Implies `ALLOCATED`.
        const IN_QUICK_LIST = 0b0100;
    }
}

/// The decoded contents of a header or footer word.
///
/// `flags` is `None` if the low nibble has a reserved bit set, which can only
/// happen by reading garbage (an un-obfuscated write, a wild pointer, or a
/// decayed/reused region) — callers treat that the same as any other
/// structurally-impossible block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Decoded {
    pub(crate) payload: u32,
    pub(crate) block_size: u32,
    pub(crate) flags: Option<Flags>,
}

/// Pack a header/footer word.
///
/// # Panics
/// Panics (debug builds only) if `block_size` has any of its low 4 bits set —
/// callers must only ever pass 16-byte-aligned sizes here.
pub(crate) fn encode(payload: u32, block_size: u32, flags: Flags) -> u64 {
    debug_assert_eq!(block_size & 0b1111, 0, "block_size must be 16-byte aligned");
    let low = block_size | flags.bits();
    let word = ((payload as u64) << 32) | low as u64;
    word ^ MAGIC
}

/// Unpack a header/footer word.
pub(crate) fn decode(word: u64) -> Decoded {
    let word = word ^ MAGIC;
    let payload = (word >> 32) as u32;
    let low = word as u32;
    let block_size = low & !0b1111;
    let flags = Flags::from_bits(low & 0b1111);
    Decoded {
        payload,
        block_size,
        flags,
    }
}

/// Read the raw 64-bit word at `addr`.
///
/// # Safety
/// `addr` must be valid for an 8-byte read and 8-byte aligned.
pub(crate) unsafe fn read_word(addr: *const u8) -> u64 {
    // SAFETY: caller guarantees validity and alignment.
    unsafe { addr.cast::<u64>().read() }
}

/// Write the raw 64-bit word `word` at `addr`.
///
/// # Safety
/// `addr` must be valid for an 8-byte write and 8-byte aligned.
pub(crate) unsafe fn write_word(addr: *mut u8, word: u64) {
    // SAFETY: caller guarantees validity and alignment.
    unsafe { addr.cast::<u64>().write(word) }
}

/// Decode the header word at `block`.
///
/// # Safety
/// `block` must point at a live header word (8 aligned readable bytes).
pub(crate) unsafe fn read_header(block: *const u8) -> Decoded {
    // SAFETY: forwarded to `read_word`'s contract.
    decode(unsafe { read_word(block) })
}

/// Write `block`'s header *and* footer (at `block + block_size - FOOTER_SIZE`)
/// to the same encoded word. Used for every block kind except the epilogue,
/// which has no footer.
///
/// # Safety
/// `block` must be valid for `block_size` bytes, `block_size >= MIN_BLOCK` and
/// 16-byte aligned.
pub(crate) unsafe fn write_tagged(block: *mut u8, payload: u32, block_size: usize, flags: Flags) {
    debug_assert!(block_size >= MIN_BLOCK);
    let word = encode(payload, block_size as u32, flags);
    // SAFETY: `block` valid for `block_size` bytes (caller contract); the
    // header is the first 8 bytes and the footer the last 8, both within that
    // range since `block_size >= MIN_BLOCK >= FOOTER_SIZE`.
    unsafe {
        write_word(block, word);
        write_word(block.add(block_size - FOOTER_SIZE), word);
    }
}

/// Write the epilogue sentinel: an 8-byte, always-`ALLOCATED` header with no
/// footer, at `heap_end - FOOTER_SIZE`.
///
/// # Safety
/// `heap_end - FOOTER_SIZE` must be valid for an 8-byte write.
pub(crate) unsafe fn write_epilogue(heap_end: usize) {
    let word = encode(0, 0, Flags::ALLOCATED);
    // SAFETY: caller contract.
    unsafe { write_word((heap_end - FOOTER_SIZE) as *mut u8, word) };
}

/// Peek the footer word immediately to the left of `block` (i.e. at
/// `block - FOOTER_SIZE`), without knowing whether it belongs to a real
/// neighbor or the prologue.
///
/// # Safety
/// `block - FOOTER_SIZE` must be valid for an 8-byte read; guaranteed for any
/// block at or after `prologue_end`, since the prologue always has a footer.
pub(crate) unsafe fn peek_left(block: *mut u8) -> Decoded {
    // SAFETY: caller contract.
    unsafe { read_header(block.sub(FOOTER_SIZE)) }
}

/// Peek the header word immediately to the right of a block of `size` bytes
/// starting at `block` (i.e. at `block + size`), without knowing whether it
/// belongs to a real neighbor or the epilogue.
///
/// # Safety
/// `block + size` must be valid for an 8-byte read; guaranteed for any block
/// ending at or before `epilogue_start`, since the epilogue always has a
/// header.
pub(crate) unsafe fn peek_right(block: *mut u8, size: usize) -> Decoded {
    // SAFETY: caller contract.
    unsafe { read_header(block.add(size)) }
}

/// `align_request(payload) = max(MIN_BLOCK, round_up_16(payload + 16))`.
///
/// Returns `None` on overflow, which callers treat as an allocation failure.
pub(crate) fn align_request(payload: usize) -> Option<usize> {
    let with_overhead = payload.checked_add(HEADER_SIZE + FOOTER_SIZE)?;
    let aligned = with_overhead.checked_add(ALIGN - 1)? & !(ALIGN - 1);
    Some(aligned.max(MIN_BLOCK))
}
