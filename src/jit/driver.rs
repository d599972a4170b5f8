//! Per-instruction trace driver: dedup by PC, bind label, dispatch to
//! `OpLowering`, stop condition.
//!
//! [`TraceDriver`] is the outer trace builder: a
//! caller calls [`TraceDriver::emit_prolog`] once, then
//! [`TraceDriver::emit`] for each decoded instruction until it reports
//! [`TraceOutcome::Complete`], then [`TraceDriver::emit_epilog`] exactly
//! once, then finalizes the code buffer itself (outside this crate).

use crate::isa::instruction::DecodedInst;
use crate::isa::opcodes::Op;
use crate::jit::branch_hint::BranchHint;
use crate::jit::config::JitConfig;
use crate::jit::emitter::{AluOp, Cond, Emitter, HostReg, Label, ShiftOp, Width};
use crate::jit::frame::FrameIo;
use crate::jit::labels::LabelTable;
use crate::jit::lowering::{alu, branch, cmp, memop, pcrel, shift, LowerCtx};
use crate::jit::regmap::RegMap;

/// Why [`TraceDriver::emit`] stopped emitting code for an instruction.
/// Neither case is an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompleteReason {
    /// This guest PC was already emitted earlier in the trace — a loop
    /// back-edge.
    PcRevisit,
    /// The decoded opcode isn't one this generator lowers. With this
    /// crate's closed [`Op`] enum every
    /// variant is in fact lowered, so this variant exists for the
    /// contract's sake (a decoder/fusion-recognizer upstream is free to
    /// widen `Op` in the future without an API break here) rather than
    /// being reachable today.
    UnsupportedOpcode,
}

/// The outcome of attempting to emit one decoded instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceOutcome {
    /// The instruction was lowered; feed the next one.
    Continue,
    /// The trace is complete; this instruction was not emitted.
    Complete(CompleteReason),
}

/// Drives construction of a single trace: prologue, one instruction at a
/// time, epilogue.
#[derive(Debug)]
pub struct TraceDriver {
    regs: RegMap,
    frame: FrameIo,
    labels: LabelTable,
    term: Option<Label>,
    term_pc: u64,
    hint: BranchHint,
    config: JitConfig,
}

impl TraceDriver {
    /// Creates a driver that binds/spills guest registers per `regs`.
    #[must_use]
    pub fn new(regs: RegMap, config: JitConfig) -> Self {
        Self {
            regs,
            frame: FrameIo::new(regs),
            labels: LabelTable::new(),
            term: None,
            term_pc: 0,
            hint: BranchHint::Unknown,
            config,
        }
    }

    /// Overrides the compile-time branch direction guess consulted by
    /// subsequent `emit` calls. Never affects correctness — see
    /// [`BranchHint`].
    pub fn set_branch_hint(&mut self, hint: BranchHint) {
        self.hint = hint;
    }

    /// The fallthrough guest PC the epilogue will write if still nonzero
    /// when the trace ends.
    #[must_use]
    pub fn term_pc(&self) -> u64 {
        self.term_pc
    }

    /// Emits the trace's entry prologue. Must be called
    /// exactly once, before any [`TraceDriver::emit`] call.
    pub fn emit_prolog(&mut self, emitter: &mut dyn Emitter, arg_reg: HostReg) {
        let term = self.frame.prologue(emitter, arg_reg);
        self.term = Some(term);
    }

    /// Emits one decoded instruction.
    ///
    /// # Panics
    ///
    /// Panics if called before [`TraceDriver::emit_prolog`] — this is a
    /// caller protocol violation, not a runtime condition.
    pub fn emit(&mut self, dec: &DecodedInst, emitter: &mut dyn Emitter) -> TraceOutcome {
        let term = self
            .term
            .expect("emit_prolog must be called before emit");

        if self.labels.is_bound(dec.pc) {
            return TraceOutcome::Complete(CompleteReason::PcRevisit);
        }
        let _ = self.labels.bind_new(dec.pc, emitter);

        if self.config.trace_log {
            tracing::trace!(pc = %format_args!("{:#x}", dec.pc), op = ?dec.op, "lowering trace instruction");
        }

        let mut ctx = LowerCtx {
            regs: self.regs,
            labels: &mut self.labels,
            emitter,
            term,
            term_pc: &mut self.term_pc,
            hint: self.hint,
        };

        let lowered = dispatch(&mut ctx, dec);

        if lowered {
            TraceOutcome::Continue
        } else {
            TraceOutcome::Complete(CompleteReason::UnsupportedOpcode)
        }
    }

    /// Emits the shared exit epilogue. Must be called exactly
    /// once, after the last successful [`TraceDriver::emit`] call.
    ///
    /// # Panics
    ///
    /// Panics if called before [`TraceDriver::emit_prolog`].
    pub fn emit_epilog(&self, emitter: &mut dyn Emitter) {
        let term = self
            .term
            .expect("emit_prolog must be called before emit_epilog");
        self.frame
            .epilogue(emitter, term, self.term_pc, self.regs.layout().pc_offset);
    }
}

/// Dispatches to the per-opcode lowering. One arm per
/// supported [`Op`] variant; the match is exhaustive over this crate's
/// closed opcode enum, so every case is a genuine lowering call, not a
/// fallback (see [`CompleteReason::UnsupportedOpcode`]).
fn dispatch(ctx: &mut LowerCtx<'_>, dec: &DecodedInst) -> bool {
    let width32 = dec.op.is_width32();
    match dec.op {
        Op::Add | Op::Addw => alu::lower_alu_rr(ctx, dec, AluOp::Add, width32),
        Op::Sub | Op::Subw => alu::lower_alu_rr(ctx, dec, AluOp::Sub, width32),
        Op::And => alu::lower_alu_rr(ctx, dec, AluOp::And, false),
        Op::Or => alu::lower_alu_rr(ctx, dec, AluOp::Or, false),
        Op::Xor => alu::lower_alu_rr(ctx, dec, AluOp::Xor, false),

        Op::Addi | Op::Addiw => alu::lower_alu_imm(ctx, dec, AluOp::Add, width32),
        Op::Andi => alu::lower_alu_imm(ctx, dec, AluOp::And, false),
        Op::Ori => alu::lower_alu_imm(ctx, dec, AluOp::Or, false),
        Op::Xori => alu::lower_alu_imm(ctx, dec, AluOp::Xor, false),

        Op::Sll | Op::Sllw => shift::lower_shift_reg(ctx, dec, ShiftOp::Shl, width32),
        Op::Srl | Op::Srlw => shift::lower_shift_reg(ctx, dec, ShiftOp::Shr, width32),
        Op::Sra | Op::Sraw => shift::lower_shift_reg(ctx, dec, ShiftOp::Sar, width32),

        Op::Slli | Op::Slliw => shift::lower_shift_imm(ctx, dec, ShiftOp::Shl, width32),
        Op::Srli | Op::Srliw => shift::lower_shift_imm(ctx, dec, ShiftOp::Shr, width32),
        Op::Srai | Op::Sraiw => shift::lower_shift_imm(ctx, dec, ShiftOp::Sar, width32),

        Op::Slt => cmp::lower_slt(ctx, dec, true),
        Op::Sltu => cmp::lower_slt(ctx, dec, false),
        Op::Slti => cmp::lower_slti(ctx, dec, true),
        Op::Sltiu => cmp::lower_slti(ctx, dec, false),

        Op::Ld => memop::lower_load(ctx, dec, Width::Qword, true),
        Op::Lw => memop::lower_load(ctx, dec, Width::Dword, true),
        Op::Lwu => memop::lower_load(ctx, dec, Width::Dword, false),
        Op::Lh => memop::lower_load(ctx, dec, Width::Word, true),
        Op::Lhu => memop::lower_load(ctx, dec, Width::Word, false),
        Op::Lb => memop::lower_load(ctx, dec, Width::Byte, true),
        Op::Lbu => memop::lower_load(ctx, dec, Width::Byte, false),

        Op::Sd => memop::lower_store(ctx, dec, Width::Qword),
        Op::Sw => memop::lower_store(ctx, dec, Width::Dword),
        Op::Sh => memop::lower_store(ctx, dec, Width::Word),
        Op::Sb => memop::lower_store(ctx, dec, Width::Byte),

        Op::Auipc => pcrel::lower_auipc(ctx, dec),
        Op::Lui => pcrel::lower_lui(ctx, dec),
        Op::Jal => pcrel::lower_jal(ctx, dec),
        Op::Li => pcrel::lower_li(ctx, dec),
        Op::La => pcrel::lower_la(ctx, dec),
        Op::Call => pcrel::lower_call(ctx, dec),

        Op::Beq => branch::lower_branch(ctx, dec, Cond::Eq),
        Op::Bne => branch::lower_branch(ctx, dec, Cond::Ne),
        Op::Blt => branch::lower_branch(ctx, dec, Cond::Lt),
        Op::Bge => branch::lower_branch(ctx, dec, Cond::Ge),
        Op::Bltu => branch::lower_branch(ctx, dec, Cond::Ltu),
        Op::Bgeu => branch::lower_branch(ctx, dec, Cond::Geu),
    }
}
