//! The decoded instruction record consumed by the trace code generator.
//!
//! Decoding itself is out of scope: this struct is the input contract
//! the surrounding trace recorder hands to
//! [`crate::jit::driver::TraceDriver::emit`], one instruction at a time.

use crate::common::reg::GuestReg;
use crate::isa::opcodes::Op;

/// A single decoded guest instruction, pre-decoded by an external collaborator.
///
/// Register fields are already-validated [`GuestReg`]s; `rd`/`rs1`/`rs2` are
/// `None` for instruction formats that don't use that field (e.g. `lui` has
/// no `rs1`/`rs2`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedInst {
    /// The opcode tag, already resolved by the decoder/fusion recognizer.
    pub op: Op,
    /// The guest program counter of this instruction.
    pub pc: u64,
    /// Destination register, if this opcode writes one.
    pub rd: Option<GuestReg>,
    /// First source register, if this opcode reads one.
    pub rs1: Option<GuestReg>,
    /// Second source register, if this opcode reads one.
    pub rs2: Option<GuestReg>,
    /// The decoded (already sign-extended where applicable) immediate.
    ///
    /// For `auipc`/`lui`/fusion `la`, this is the already-shifted upper
    /// immediate; for `jal`/branches/fusion `call`, this is the
    /// PC-relative offset to the control-transfer target. Fusion `call`
    /// additionally writes the return address (`pc + inst_len`) into
    /// `rd`, the same way `jal` does, without needing a field for it.
    pub imm: i64,
    /// Raw instruction bits, kept opaque — the generator never
    /// re-decodes this itself, it exists for logging/disassembly only.
    pub inst_bits: u32,
    /// Length of this instruction in bytes (2 for compressed, 4 otherwise).
    ///
    /// Supplied directly by the decoder rather than re-derived from
    /// `inst_bits`, since decoding is out of scope here.
    pub inst_len: u8,
}

impl DecodedInst {
    /// The guest PC immediately following this instruction.
    #[must_use]
    pub fn next_pc(&self) -> u64 {
        self.pc.wrapping_add(u64::from(self.inst_len))
    }
}
