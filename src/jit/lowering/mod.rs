//! Per-opcode lowering: the bulk of the code generator.
//!
//! Each submodule covers one opcode family. All of
//! them share [`LowerCtx`], the per-instruction working set (register
//! binding, label table, emitter, and the shared `term`/`term_pc` state),
//! and the mem-mem staging helper in this module.

use crate::common::reg::GuestReg;
use crate::jit::branch_hint::BranchHint;
use crate::jit::emitter::{Emitter, HostReg, Label, Operand, Width};
use crate::jit::labels::LabelTable;
use crate::jit::regmap::RegMap;

pub mod alu;
pub mod branch;
pub mod cmp;
pub mod memop;
pub mod pcrel;
pub mod shift;

/// The per-instruction working set every lowering function operates on.
pub struct LowerCtx<'a> {
    /// The static guest→host binding.
    pub regs: RegMap,
    /// Guest-PC → label bookkeeping, shared across the whole trace.
    pub labels: &'a mut LabelTable,
    /// The host assembler.
    pub emitter: &'a mut dyn Emitter,
    /// The shared exit label every terminator eventually jumps to.
    pub term: Label,
    /// The fallthrough guest PC the epilogue will write if still nonzero
    /// when the trace ends. Every non-branch lowering
    /// updates this to `pc + inst_len`; branch lowerings zero it after
    /// writing `pc` themselves.
    pub term_pc: &'a mut u64,
    /// Compile-time branch direction guess.
    /// Only consulted by [`branch`] lowerings.
    pub hint: BranchHint,
}

impl LowerCtx<'_> {
    /// Resolves `reg` to a readable operand: its bound host register, or
    /// its spill slot.
    fn read(&self, reg: GuestReg) -> Operand {
        self.regs.read_operand(reg)
    }

    /// `true` if `reg` is bound to a host register (not spilled).
    fn is_bound(&self, reg: GuestReg) -> bool {
        self.regs.host_of(reg).is_some()
    }
}

/// Emits `dst <- src`, staging through [`HostReg::SCRATCH`] when both
/// operands would otherwise be memory — x86 has no mem-mem move/ALU form.
///
/// When only one side is memory, or neither is, this is a direct `mov`.
pub(crate) fn staged_move(emitter: &mut dyn Emitter, dst: Operand, src: Operand) {
    if dst.is_memory() && src.is_memory() {
        emitter.mov(Operand::Reg(HostReg::SCRATCH), src);
        emitter.mov(dst, Operand::Reg(HostReg::SCRATCH));
    } else {
        emitter.mov(dst, src);
    }
}

/// Materializes `imm` as an operand usable directly by an ALU mnemonic,
/// loading it into [`HostReg::SCRATCH`] first when it doesn't fit the
/// 32-bit sign-extended immediate encoding x86 ALU ops accept.
pub(crate) fn materialize_imm(emitter: &mut dyn Emitter, imm: i64) -> Operand {
    if i32::try_from(imm).is_ok() {
        Operand::Imm(imm)
    } else {
        emitter.mov(Operand::Reg(HostReg::SCRATCH), Operand::Imm(imm));
        Operand::Reg(HostReg::SCRATCH)
    }
}

/// Sign-extends the low 32 bits of `dst` into its full 64 bits:
/// `movsxd` in place for a host register, or through
/// [`HostReg::SCRATCH_SHIFT`] and a store-back when `dst` is a spill slot.
pub(crate) fn sign_extend_low32(emitter: &mut dyn Emitter, dst: Operand) {
    match dst {
        Operand::Reg(h) => emitter.movsx(Operand::Reg(h), Operand::Reg(h)),
        Operand::Mem { base, disp, .. } => {
            let dword = Operand::Mem {
                base,
                disp,
                width: Width::Dword,
            };
            emitter.movsx(Operand::Reg(HostReg::SCRATCH_SHIFT), dword);
            emitter.mov(dst, Operand::Reg(HostReg::SCRATCH_SHIFT));
        }
        Operand::Imm(_) => unreachable!("a lowering destination is never an immediate"),
    }
}
