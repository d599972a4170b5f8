//! Comparison-producing opcode lowerings and the shared compare primitive.

use crate::common::reg::GuestReg;
use crate::isa::instruction::DecodedInst;
use crate::jit::emitter::{Cond, HostReg, Operand};
use crate::jit::lowering::LowerCtx;

/// The shared compare primitive used by `slt*` and all branches.
///
/// `rhs` is whatever the caller already resolved the right-hand side to: a
/// register/spill read for `slt`/`sltu`/branches, or a raw immediate for
/// `slti`/`sltiu`. x86 `cmp` permits memory on either side as long as the
/// other side is a register or immediate, so the only case needing staging
/// through [`HostReg::SCRATCH`] is both sides being memory at once.
pub(crate) fn emit_cmp(ctx: &mut LowerCtx<'_>, rs1: GuestReg, rhs: Operand) {
    if rs1.is_zero() {
        let scratch = Operand::Reg(HostReg::SCRATCH);
        ctx.emitter.zero(scratch);
        ctx.emitter.cmp(scratch, rhs);
        return;
    }

    let lhs = ctx.read(rs1);
    if lhs.is_memory() && rhs.is_memory() {
        let scratch = Operand::Reg(HostReg::SCRATCH);
        ctx.emitter.mov(scratch, lhs);
        ctx.emitter.cmp(scratch, rhs);
    } else {
        ctx.emitter.cmp(lhs, rhs);
    }
}

/// `setcc` into [`HostReg::SCRATCH`]'s low byte, zero-extended to 64 bits,
/// then stored to `rd`. `rd` is never bound to a scratch
/// register, so this is always a genuine store, never a self-move.
fn store_setcc(ctx: &mut LowerCtx<'_>, rd: GuestReg, cond: Cond) {
    let scratch = Operand::Reg(HostReg::SCRATCH);
    ctx.emitter.setcc(cond, scratch);
    ctx.emitter.movzx(scratch, scratch);
    ctx.emitter.mov(ctx.read(rd), scratch);
}

/// `slt, sltu` (register-register).
pub fn lower_slt(ctx: &mut LowerCtx<'_>, dec: &DecodedInst, signed: bool) -> bool {
    *ctx.term_pc = dec.next_pc();
    let rd = dec.rd.expect("slt/sltu always has rd");
    if rd.is_zero() {
        return true;
    }
    let rs1 = dec.rs1.expect("slt/sltu always has rs1");
    let rs2 = dec.rs2.expect("slt/sltu always has rs2");

    let rhs = ctx.read(rs2);
    emit_cmp(ctx, rs1, rhs);
    store_setcc(ctx, rd, if signed { Cond::Lt } else { Cond::Ltu });
    true
}

/// `slti, sltiu` (register-immediate).
pub fn lower_slti(ctx: &mut LowerCtx<'_>, dec: &DecodedInst, signed: bool) -> bool {
    *ctx.term_pc = dec.next_pc();
    let rd = dec.rd.expect("slti/sltiu always has rd");
    if rd.is_zero() {
        return true;
    }
    let rs1 = dec.rs1.expect("slti/sltiu always has rs1");

    if rs1.is_zero() {
        // `0 <s imm` / `0 <u imm` is decidable at compile time.
        let truth = if signed {
            0i64 < dec.imm
        } else {
            0u64 < (dec.imm as u64)
        };
        ctx.emitter.mov(ctx.read(rd), Operand::Imm(i64::from(truth)));
        return true;
    }

    emit_cmp(ctx, rs1, Operand::Imm(dec.imm));
    store_setcc(ctx, rd, if signed { Cond::Lt } else { Cond::Ltu });
    true
}
