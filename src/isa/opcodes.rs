//! Guest opcode tags supported by the trace code generator.
//!
//! This is deliberately a narrower set than the full RV64 ISA: RV64M
//! (multiply/divide), RV64A (atomics), RV64F/D (floating point), Zicsr, and
//! privileged opcodes are out of scope and are simply absent from this
//! enum. A [`crate::jit::driver::TraceDriver`] that sees any opcode not
//! covered here treats it as unsupported and ends the trace.
//!
//! Three additional tags (`Li`, `La`, `Call`) are *fusion ops*: pseudo-
//! opcodes synthesized upstream, outside this crate, from multi-instruction
//! sequences.

/// One decoded guest opcode, including the three synthesized fusion ops.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs, clippy::enum_variant_names)]
pub enum Op {
    // RV64I register-register arithmetic/logical (64-bit).
    Add,
    Sub,
    And,
    Or,
    Xor,
    Sll,
    Srl,
    Sra,
    Slt,
    Sltu,

    // RV64I register-immediate arithmetic/logical.
    Addi,
    Andi,
    Ori,
    Xori,
    Slli,
    Srli,
    Srai,
    Slti,
    Sltiu,

    // RV64I 32-bit-width ("*w") register-register variants.
    Addw,
    Subw,
    Sllw,
    Srlw,
    Sraw,

    // RV64I 32-bit-width register-immediate variants.
    Addiw,
    Slliw,
    Srliw,
    Sraiw,

    // Loads.
    Ld,
    Lw,
    Lwu,
    Lh,
    Lhu,
    Lb,
    Lbu,

    // Stores.
    Sd,
    Sw,
    Sh,
    Sb,

    // PC-relative / control transfer.
    Auipc,
    Lui,
    Jal,
    Beq,
    Bne,
    Blt,
    Bge,
    Bltu,
    Bgeu,

    // Synthesized fusion ops.
    Li,
    La,
    Call,
}

impl Op {
    /// Returns `true` for the six conditional branch opcodes.
    ///
    /// Branches are the only terminator-producing non-`jal` opcodes; they
    /// drive the target-labelling case analysis in
    /// [`crate::jit::lowering::branch`].
    #[must_use]
    pub fn is_branch(self) -> bool {
        matches!(
            self,
            Op::Beq | Op::Bne | Op::Blt | Op::Bge | Op::Bltu | Op::Bgeu
        )
    }

    /// Returns `true` for opcodes whose destination width is 32 bits
    /// (results are sign-extended to 64 bits).
    #[must_use]
    pub fn is_width32(self) -> bool {
        matches!(
            self,
            Op::Addw
                | Op::Subw
                | Op::Sllw
                | Op::Srlw
                | Op::Sraw
                | Op::Addiw
                | Op::Slliw
                | Op::Srliw
                | Op::Sraiw
        )
    }
}
