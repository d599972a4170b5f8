//! Conditional branch lowerings — the only trace terminators.
//!
//! Every shape either stitches directly to an already-bound
//! [`crate::jit::labels::LabelTable`] entry (a backward loop edge, the
//! common case for a recognized loop) or writes the guest `pc` explicitly
//! into the processor struct and jumps to the shared `term` exit, which
//! returns control to whatever interpreter or dispatch loop called the
//! trace. Correctness never depends on [`BranchHint`]; it only decides, in
//! the "neither side labelled" case, which side is emitted as the
//! straight-line path.

use crate::isa::instruction::DecodedInst;
use crate::jit::branch_hint::BranchHint;
use crate::jit::emitter::{mov_imm, Cond};
use crate::jit::lowering::cmp::emit_cmp;
use crate::jit::lowering::LowerCtx;

/// `beq, bne, blt, bge, bltu, bgeu`.
pub fn lower_branch(ctx: &mut LowerCtx<'_>, dec: &DecodedInst, cond: Cond) -> bool {
    debug_assert!(dec.op.is_branch(), "lower_branch called on a non-branch opcode");

    // Branches write `pc` explicitly on every exit path; the epilogue must
    // not also write a stale fallthrough.
    *ctx.term_pc = 0;

    let rs1 = dec.rs1.expect("branch always has rs1");
    let rs2 = dec.rs2.expect("branch always has rs2");
    let rhs = ctx.read(rs2);
    emit_cmp(ctx, rs1, rhs);

    let branch_pc = dec.pc.wrapping_add(dec.imm as u64);
    let cont_pc = dec.next_pc();
    let pc_slot = ctx.regs.pc_slot();

    // `get` only returns a label for a PC this generator has already
    // emitted an instruction at; a target it hasn't reached yet (or never
    // will) falls through to the unbound-exit shape below.
    let branch_label = ctx.labels.get(branch_pc);
    let cont_label = ctx.labels.get(cont_pc);

    match (branch_label, cont_label) {
        (Some(bl), Some(cl)) => {
            ctx.emitter.jcc(cond, bl);
            ctx.emitter.jmp(cl);
        }
        (Some(bl), None) => {
            ctx.emitter.jcc(cond, bl);
            mov_imm(ctx.emitter, pc_slot, cont_pc as i64);
            ctx.emitter.jmp(ctx.term);
        }
        (None, Some(cl)) => {
            ctx.emitter.jcc(cond.invert(), cl);
            mov_imm(ctx.emitter, pc_slot, branch_pc as i64);
            ctx.emitter.jmp(ctx.term);
        }
        (None, None) => emit_unbound_exit(ctx, cond, pc_slot, branch_pc, cont_pc),
    }

    true
}

/// The "neither target labelled" shape: a local label splits
/// the two exit paths, both of which write `pc` and jump to `term`.
/// [`BranchHint`] only picks which side is the straight-line path.
fn emit_unbound_exit(
    ctx: &mut LowerCtx<'_>,
    cond: Cond,
    pc_slot: crate::jit::emitter::Operand,
    branch_pc: u64,
    cont_pc: u64,
) {
    let local = ctx.emitter.new_label();
    let (straight_cond, straight_pc, jumped_pc) = match ctx.hint {
        BranchHint::Taken => (cond.invert(), branch_pc, cont_pc),
        BranchHint::NotTaken | BranchHint::Unknown => (cond, cont_pc, branch_pc),
    };

    ctx.emitter.jcc(straight_cond, local);
    mov_imm(ctx.emitter, pc_slot, straight_pc as i64);
    ctx.emitter.jmp(ctx.term);
    ctx.emitter.bind_label(local);
    mov_imm(ctx.emitter, pc_slot, jumped_pc as i64);
    ctx.emitter.jmp(ctx.term);
}
