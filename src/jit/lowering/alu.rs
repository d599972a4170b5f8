//! Arithmetic/logical opcode lowerings.
//!
//! `*w` width-32 variants reuse the exact same case analysis as their
//! 64-bit counterparts: `add`/`sub`/`and`/`or`/`xor` all commute with
//! truncation to 32 bits, so performing the op at full 64-bit width and
//! sign-extending the low 32 bits of the result afterward ([`sign_extend_low32`])
//! is bit-for-bit identical to doing the op on genuine 32-bit operands.
//! Shifts do not have this property (the mask width itself differs) and
//! are handled separately in [`crate::jit::lowering::shift`].

use crate::isa::instruction::DecodedInst;
use crate::jit::emitter::{AluOp, HostReg, Operand};
use crate::jit::lowering::{materialize_imm, sign_extend_low32, staged_move, LowerCtx};

/// `add, sub, and, or, xor` (register-register), and `addw`/`subw` when
/// `width32` is set.
pub fn lower_alu_rr(ctx: &mut LowerCtx<'_>, dec: &DecodedInst, op: AluOp, width32: bool) -> bool {
    *ctx.term_pc = dec.next_pc();

    let rd = dec.rd.expect("register-register ALU op always has rd");
    if rd.is_zero() {
        return true;
    }
    let rs1 = dec.rs1.expect("register-register ALU op always has rs1");
    let rs2 = dec.rs2.expect("register-register ALU op always has rs2");
    let dst = ctx.read(rd);

    if rs1.is_zero() && rs2.is_zero() {
        ctx.emitter.zero(dst);
    } else if rs1.is_zero() {
        let src = ctx.read(rs2);
        match op {
            AluOp::And => ctx.emitter.zero(dst),
            AluOp::Sub => {
                staged_move(ctx.emitter, dst, src);
                ctx.emitter.neg(dst);
            }
            AluOp::Add | AluOp::Or | AluOp::Xor => staged_move(ctx.emitter, dst, src),
        }
    } else if rs2.is_zero() {
        let src = ctx.read(rs1);
        match op {
            AluOp::And => ctx.emitter.zero(dst),
            AluOp::Add | AluOp::Sub | AluOp::Or | AluOp::Xor => staged_move(ctx.emitter, dst, src),
        }
    } else if rd == rs1 {
        let src = ctx.read(rs2);
        ctx.emitter.alu(op, dst, src);
    } else if rd == rs2 {
        let src = ctx.read(rs1);
        if op == AluOp::Sub {
            ctx.emitter.alu(AluOp::Sub, dst, src);
            ctx.emitter.neg(dst);
        } else {
            // Commutative: `OP rd, rs1` with operands swapped is equivalent.
            ctx.emitter.alu(op, dst, src);
        }
    } else if dst.is_memory() {
        let rs1_op = ctx.read(rs1);
        let rs2_op = ctx.read(rs2);
        let scratch = Operand::Reg(HostReg::SCRATCH);
        ctx.emitter.mov(scratch, rs1_op);
        ctx.emitter.alu(op, scratch, rs2_op);
        ctx.emitter.mov(dst, scratch);
    } else {
        let rs1_op = ctx.read(rs1);
        let rs2_op = ctx.read(rs2);
        ctx.emitter.mov(dst, rs1_op);
        ctx.emitter.alu(op, dst, rs2_op);
    }

    if width32 {
        sign_extend_low32(ctx.emitter, dst);
    }
    true
}

/// `addi, andi, ori, xori` (register-immediate), and `addiw` when
/// `width32` is set.
pub fn lower_alu_imm(ctx: &mut LowerCtx<'_>, dec: &DecodedInst, op: AluOp, width32: bool) -> bool {
    *ctx.term_pc = dec.next_pc();

    let rd = dec.rd.expect("immediate ALU op always has rd");
    if rd.is_zero() {
        return true;
    }
    let rs1 = dec.rs1.expect("immediate ALU op always has rs1");
    let dst = ctx.read(rd);

    if rs1.is_zero() {
        // 0 OP imm is a compile-time constant.
        match op {
            AluOp::And => ctx.emitter.zero(dst),
            AluOp::Add | AluOp::Or | AluOp::Xor => {
                ctx.emitter.mov(dst, Operand::Imm(dec.imm));
            }
            AluOp::Sub => unreachable!("there is no `subi`"),
        }
    } else if dec.imm == 0 {
        // `rs1 OP 0` is an identity move (`andi rd, rs1, 0` zeroes instead).
        match op {
            AluOp::And => ctx.emitter.zero(dst),
            AluOp::Add | AluOp::Or | AluOp::Xor => {
                let src = ctx.read(rs1);
                staged_move(ctx.emitter, dst, src);
            }
            AluOp::Sub => unreachable!("there is no `subi`"),
        }
    } else if rd == rs1 {
        let imm_op = materialize_imm(ctx.emitter, dec.imm);
        ctx.emitter.alu(op, dst, imm_op);
    } else {
        let src = ctx.read(rs1);
        staged_move(ctx.emitter, dst, src);
        let imm_op = materialize_imm(ctx.emitter, dec.imm);
        ctx.emitter.alu(op, dst, imm_op);
    }

    if width32 {
        sign_extend_low32(ctx.emitter, dst);
    }
    true
}
