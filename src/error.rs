//! The error sink: an errno-style, thread-local record of the outcome of the
//! most recent fallible operation.
//!
//! Every public entry point that can fail writes one of these codes before
//! returning; callers that care about *why* an operation failed read it back
//! with [`last_error`]. This mirrors the C convention the allocator's design
//! is drawn from rather than threading a `Result` through every call, since
//! several of those entry points (`free`, `realloc`) report failure only via
//! a null/no-op return for API-compatibility reasons and still need a way to
//! say why.

use core::cell::Cell;

/// Outcome of the most recent fallible operation on the current thread.
///
/// Numbered after the POSIX errno values they echo, so a caller that wants a
/// plain integer can cast with `as i32`. Fatal corruption has no code here —
/// it aborts the process rather than reporting through the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCode {
    /// No error has occurred, or the last operation succeeded.
    Success = 0,
    /// An allocation request could not be satisfied even after growing the
    /// heap to its provider-imposed limit.
    OutOfMemory = 12, // ENOMEM
    /// A caller-supplied pointer or size failed validation (not a block this
    /// allocator produced, wrong alignment, zero size where one is required).
    InvalidArgument = 22, // EINVAL
}

std::thread_local! {
    static LAST_ERROR: Cell<ErrorCode> = const { Cell::new(ErrorCode::Success) };
}

/// Record `code` as the outcome of the operation the caller is about to
/// return from.
pub(crate) fn set_last_error(code: ErrorCode) {
    LAST_ERROR.with(|cell| cell.set(code));
}

/// The outcome of the most recently completed fallible operation on the
/// calling thread. `ErrorCode::Success` before any fallible operation has run.
pub fn last_error() -> ErrorCode {
    LAST_ERROR.with(|cell| cell.get())
}

/// Reset the sink to `ErrorCode::Success`, e.g. before a retry loop that
/// wants to distinguish "this attempt failed" from a code left over from an
/// earlier one.
pub fn clear_last_error() {
    LAST_ERROR.with(|cell| cell.set(ErrorCode::Success));
}
