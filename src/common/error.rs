//! Error taxonomy for the trace code generator.
//!
//! Most "failures" a caller can hit while building a trace are expected
//! control flow (an unsupported opcode, a PC revisit) and are represented
//! as a
//! [`crate::jit::driver::TraceOutcome`], not a [`JitError`]. `JitError` is
//! reserved for the two cases that are genuinely exceptional: a malformed
//! guest register index (a decoder bug, not a runtime condition) and an
//! encoding failure relayed from the external [`crate::jit::emitter::Emitter`].

use thiserror::Error;

/// Errors that can occur while lowering a trace.
///
/// These are distinct from the normal "trace complete" outcomes
/// (unsupported opcode, PC revisit) produced by
/// [`crate::jit::driver::TraceDriver::emit`], which are not errors.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum JitError {
    /// A guest register index fell outside `[0, 31]`.
    ///
    /// Treated as a programmer error rather than a runtime condition:
    /// decoded instruction records are assumed to come from a conforming
    /// decoder. Still surfaced as a typed error instead of a panic, so a
    /// caller embedding this crate can decide how to fail.
    #[error("guest register index {0} out of range [0, 31]")]
    InvalidGuestRegister(u8),

    /// The emitter's error-reporting hook was invoked during code
    /// generation. The trace being built is invalid and must be discarded;
    /// this crate does not attempt recovery.
    #[error("instruction encoding failed: {0}")]
    EncodingFailed(String),
}
