//! Instruction set surface consumed by the trace code generator.
//!
//! This module does not decode RISC-V instructions — that is an external
//! collaborator. It only defines the shape of what the decoder hands
//! over: an opcode tag and a decoded instruction record.

/// The decoded instruction record.
pub mod instruction;
/// Supported guest opcode tags, including synthesized fusion ops.
pub mod opcodes;
