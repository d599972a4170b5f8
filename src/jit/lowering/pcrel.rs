//! PC-relative and synthesized fusion-op lowerings.
//!
//! `jal` and fusion `call` are trace terminators: the lowering writes the
//! return address (when `rd` is bound) and hands the control-transfer
//! target to [`LowerCtx::term_pc`], exactly like a branch's unbound exit
//! path, but unconditionally. Neither emits its own jump — the trace ends
//! immediately after, so execution falls straight through into the
//! epilogue that [`crate::jit::driver::TraceDriver`] is about to bind at
//! `term`.

use crate::isa::instruction::DecodedInst;
use crate::jit::emitter::mov_imm;
use crate::jit::lowering::LowerCtx;

/// `auipc rd, imm`: `rd = pc + imm`.
pub fn lower_auipc(ctx: &mut LowerCtx<'_>, dec: &DecodedInst) -> bool {
    *ctx.term_pc = dec.next_pc();
    let Some(rd) = dec.rd else { return true };
    if rd.is_zero() {
        return true;
    }
    let target = dec.pc.wrapping_add(dec.imm as u64) as i64;
    mov_imm(ctx.emitter, ctx.read(rd), target);
    true
}

/// `lui rd, imm`: `rd = imm` (already shifted by the decoder).
pub fn lower_lui(ctx: &mut LowerCtx<'_>, dec: &DecodedInst) -> bool {
    *ctx.term_pc = dec.next_pc();
    let Some(rd) = dec.rd else { return true };
    if rd.is_zero() {
        return true;
    }
    mov_imm(ctx.emitter, ctx.read(rd), dec.imm);
    true
}

/// `jal rd, imm`: writes the return address to `rd`, then ends the trace
/// with `term_pc` set to the jump target.
pub fn lower_jal(ctx: &mut LowerCtx<'_>, dec: &DecodedInst) -> bool {
    if let Some(rd) = dec.rd {
        if !rd.is_zero() {
            mov_imm(ctx.emitter, ctx.read(rd), dec.next_pc() as i64);
        }
    }
    *ctx.term_pc = dec.pc.wrapping_add(dec.imm as u64);
    true
}

/// Fusion `li rd, imm`: `rd = imm`, using the full 64-bit immediate form
/// when the constant exceeds signed-32.
pub fn lower_li(ctx: &mut LowerCtx<'_>, dec: &DecodedInst) -> bool {
    *ctx.term_pc = dec.next_pc();
    let Some(rd) = dec.rd else { return true };
    if rd.is_zero() {
        return true;
    }
    mov_imm(ctx.emitter, ctx.read(rd), dec.imm);
    true
}

/// Fusion `la rd, imm`: `rd = pc + imm`.
pub fn lower_la(ctx: &mut LowerCtx<'_>, dec: &DecodedInst) -> bool {
    *ctx.term_pc = dec.next_pc();
    let Some(rd) = dec.rd else { return true };
    if rd.is_zero() {
        return true;
    }
    let target = dec.pc.wrapping_add(dec.imm as u64) as i64;
    mov_imm(ctx.emitter, ctx.read(rd), target);
    true
}

/// Fusion `call rd, imm`: same write as `li rd, (pc + inst_len)` (the
/// return address), then ends the trace like `jal` with `term_pc` set to
/// the call target.
pub fn lower_call(ctx: &mut LowerCtx<'_>, dec: &DecodedInst) -> bool {
    if let Some(rd) = dec.rd {
        if !rd.is_zero() {
            mov_imm(ctx.emitter, ctx.read(rd), dec.next_pc() as i64);
        }
    }
    *ctx.term_pc = dec.pc.wrapping_add(dec.imm as u64);
    true
}
