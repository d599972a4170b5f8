//! Shift opcode lowerings.
//!
//! Unlike the rest of the ALU family, a shift's result depends on whether
//! the count is masked to 5 bits (32-bit operand) or 6 bits (64-bit
//! operand), so width-32 shifts must be encoded at `Dword` width directly
//! rather than computed at 64-bit width and truncated afterward.

use crate::isa::instruction::DecodedInst;
use crate::jit::emitter::{HostReg, Operand, ShiftOp, Width};
use crate::jit::lowering::{sign_extend_low32, staged_move, LowerCtx};

/// `sll, srl, sra` (variable count), and `sllw`/`srlw`/`sraw` when
/// `width32` is set.
pub fn lower_shift_reg(ctx: &mut LowerCtx<'_>, dec: &DecodedInst, op: ShiftOp, width32: bool) -> bool {
    *ctx.term_pc = dec.next_pc();
    let rd = dec.rd.expect("shift op always has rd");
    if rd.is_zero() {
        return true;
    }
    let rs1 = dec.rs1.expect("shift op always has rs1");
    let rs2 = dec.rs2.expect("shift op always has rs2");
    let dst = ctx.read(rd);
    let width = if width32 { Width::Dword } else { Width::Qword };

    if rs1.is_zero() {
        // 0 shifted by anything is 0, regardless of width.
        ctx.emitter.zero(dst);
        return true;
    }

    if rs2.is_zero() {
        // Shift by a compile-time-zero count is an identity (still
        // re-sign-extended below when width32, since `rs1` may not already
        // be a valid sign-extended 32-bit value in its upper bits).
        let src = ctx.read(rs1);
        staged_move(ctx.emitter, dst, src);
    } else {
        let count = ctx.read(rs2);
        ctx.emitter.mov(Operand::Reg(HostReg::SCRATCH_SHIFT), count);
        if rd != rs1 {
            let src = ctx.read(rs1);
            staged_move(ctx.emitter, dst, src);
        }
        ctx.emitter
            .shift(op, width, dst, Operand::Reg(HostReg::SCRATCH_SHIFT));
    }

    if width32 {
        sign_extend_low32(ctx.emitter, dst);
    }
    true
}

/// `slli, srli, srai`, and `slliw`/`srliw`/`sraiw` when `width32` is set.
/// The shift amount is a compile-time immediate, so no `cl` staging is
/// needed.
pub fn lower_shift_imm(ctx: &mut LowerCtx<'_>, dec: &DecodedInst, op: ShiftOp, width32: bool) -> bool {
    *ctx.term_pc = dec.next_pc();
    let rd = dec.rd.expect("shift-immediate op always has rd");
    if rd.is_zero() {
        return true;
    }
    let rs1 = dec.rs1.expect("shift-immediate op always has rs1");
    let dst = ctx.read(rd);
    let width = if width32 { Width::Dword } else { Width::Qword };

    if rs1.is_zero() {
        ctx.emitter.zero(dst);
        return true;
    }

    if dec.imm == 0 {
        let src = ctx.read(rs1);
        staged_move(ctx.emitter, dst, src);
    } else {
        let src = ctx.read(rs1);
        staged_move(ctx.emitter, dst, src);
        ctx.emitter.shift(op, width, dst, Operand::Imm(dec.imm));
    }

    if width32 {
        sign_extend_low32(ctx.emitter, dst);
    }
    true
}
