//! Tracing JIT code generator for RV64IM.
//!
//! This crate implements the code-generation stage of a tracing JIT: given
//! a linear stream of already-decoded RISC-V instructions (plus the
//! synthesized fusion ops `li`, `la`, and `call` a recognizer upstream may
//! hand it), it lowers each one into x86-64 machine code through a small
//! host-assembler abstraction.
//!
//! It does not decode RISC-V, does not recognize trace regions, does not
//! manage a code cache, and does not execute anything — those are external
//! collaborators. The crate's entry point is [`jit::driver::TraceDriver`]:
//! a caller emits a prologue once, feeds it decoded instructions one at a
//! time until it reports the trace complete, then emits the epilogue.
//!
//! # Layout
//!
//! - [`common`] — the guest register identifier and the error taxonomy.
//! - [`isa`] — the opcode set and decoded instruction record this crate
//!   consumes (not a decoder).
//! - [`jit`] — the code generator itself: register binding, label table,
//!   frame, per-opcode lowering, and the driver that sequences them.

/// Common types shared across the code generator.
pub mod common;
/// The instruction set surface this crate consumes.
pub mod isa;
/// The trace code generator.
pub mod jit;

pub use common::error::JitError;
pub use common::reg::GuestReg;
pub use isa::instruction::DecodedInst;
pub use isa::opcodes::Op;
pub use jit::{CompleteReason, JitConfig, ProcLayout, RegMap, TraceDriver, TraceOutcome};
