//! The trace code generator itself: register binding, the label table,
//! the prologue/epilogue frame, per-opcode lowering, and the driver that
//! sequences them into one native trace.

/// Compile-time branch direction hint — a pure optimization knob, never
/// load-bearing for correctness.
pub mod branch_hint;
/// Generator configuration.
pub mod config;
/// Sequences decoded instructions into one native trace.
pub mod driver;
/// The host assembler abstraction this crate targets.
pub mod emitter;
/// Trace prologue/epilogue: the native calling-convention boundary.
pub mod frame;
/// Guest-PC → emitter-label bookkeeping.
pub mod labels;
/// Per-opcode lowering functions.
pub mod lowering;
/// The static guest→host register binding.
pub mod regmap;


pub use branch_hint::BranchHint;
pub use config::JitConfig;
pub use driver::{CompleteReason, TraceDriver, TraceOutcome};
pub use emitter::{AluOp, Cond, Emitter, HostReg, Label, Operand, ShiftOp, Width};
pub use frame::FrameIo;
pub use labels::LabelTable;
pub use regmap::{ProcLayout, RegMap};
