//! Load/store opcode lowerings.

use crate::common::reg::GuestReg;
use crate::isa::instruction::DecodedInst;
use crate::jit::emitter::{Emitter, HostReg, Operand, Width};
use crate::jit::lowering::LowerCtx;

/// Resolves `rs1` to the host register to use as a memory operand's base:
/// its own binding, or [`HostReg::SCRATCH`] loaded from its spill slot.
/// `x0`'s spill slot is never written and so always reads as zero, giving
/// the correct absolute-addressing behavior for `rs1 == x0` without a
/// dedicated case.
fn resolve_base(ctx: &mut LowerCtx<'_>, rs1: GuestReg) -> HostReg {
    match ctx.regs.host_of(rs1) {
        Some(h) => h,
        None => {
            let spill = ctx.regs.spill_addr(rs1, Width::Qword);
            ctx.emitter.mov(Operand::Reg(HostReg::SCRATCH), spill);
            HostReg::SCRATCH
        }
    }
}

fn load_into(emitter: &mut dyn Emitter, width: Width, signed: bool, dst: Operand, src: Operand) {
    match (width, signed) {
        (Width::Qword, _) => emitter.mov(dst, src),
        (_, true) => emitter.movsx(dst, src),
        (_, false) => emitter.movzx(dst, src),
    }
}

/// `ld, lw, lwu, lh, lhu, lb, lbu`. `width` is the memory
/// access width; `signed` selects `movsx` vs `movzx` (irrelevant for `ld`,
/// which is always a plain 8-byte `mov`).
pub fn lower_load(ctx: &mut LowerCtx<'_>, dec: &DecodedInst, width: Width, signed: bool) -> bool {
    *ctx.term_pc = dec.next_pc();
    let rd = dec.rd.expect("load always has rd");
    let rs1 = dec.rs1.expect("load always has rs1");
    if rd.is_zero() {
        return true;
    }

    let base = resolve_base(ctx, rs1);
    let src = Operand::Mem {
        base,
        disp: dec.imm as i32,
        width,
    };
    let dst = ctx.read(rd);

    if dst.is_memory() {
        // Destination is spilled: land in `rax`, then store.
        let scratch = Operand::Reg(HostReg::SCRATCH);
        load_into(ctx.emitter, width, signed, scratch, src);
        ctx.emitter.mov(dst, scratch);
    } else {
        load_into(ctx.emitter, width, signed, dst, src);
    }
    true
}

/// `sd, sw, sh, sb`.
pub fn lower_store(ctx: &mut LowerCtx<'_>, dec: &DecodedInst, width: Width) -> bool {
    *ctx.term_pc = dec.next_pc();
    let rs1 = dec.rs1.expect("store always has rs1");
    let rs2 = dec.rs2.expect("store always has rs2");

    let base = resolve_base(ctx, rs1);
    let dst = Operand::Mem {
        base,
        disp: dec.imm as i32,
        width,
    };

    if rs2.is_zero() {
        ctx.emitter.zero(dst);
        return true;
    }

    let src = ctx.read(rs2);
    if src.is_memory() {
        // Stage through `rcx`, not `rax`: `resolve_base` may already have
        // loaded the address into `rax` above.
        let scratch = Operand::Reg(HostReg::SCRATCH_SHIFT);
        ctx.emitter.mov(scratch, src);
        ctx.emitter.mov(dst, scratch);
    } else {
        ctx.emitter.mov(dst, src);
    }
    true
}
