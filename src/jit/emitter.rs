//! The opaque host-assembler interface.
//!
//! The concrete x86-64 encoder is an external collaborator: this crate
//! only depends on the [`Emitter`] trait, which captures the primitive
//! operations a host assembler needs to expose (new label; bind label at
//! current position; emit a typed mnemonic taking operand variants
//! covering registers, memory `[base+disp]` at byte/word/dword/qword
//! widths, and immediates; an error-reporting hook). A production build
//! wires this trait to a real two-pass asmjit-style assembler; this crate
//! ships no such backend.

/// Width of a memory operand or a register sub-view, in bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Width {
    /// 1 byte (`al`/`bl`/... or a byte-sized memory access).
    Byte,
    /// 2 bytes.
    Word,
    /// 4 bytes.
    Dword,
    /// 8 bytes.
    Qword,
}

impl Width {
    /// Number of bytes this width occupies.
    #[must_use]
    pub fn bytes(self) -> u32 {
        match self {
            Width::Byte => 1,
            Width::Word => 2,
            Width::Dword => 4,
            Width::Qword => 8,
        }
    }
}

/// An x86-64 general-purpose register, numbered per the standard x86-64
/// register encoding (`rax = 0` .. `r15 = 15`).
///
/// This is the same numbering the static binding table in
/// [`crate::jit::regmap`] uses: `ra -> 2 (rdx)`, `sp -> 3 (rbx)`,
/// `t0 -> 6 (rsi)`, `t1 -> 7 (rdi)`, `a0..a7 -> 8..15 (r8..r15)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum HostReg {
    Rax = 0,
    Rcx = 1,
    Rdx = 2,
    Rbx = 3,
    Rsp = 4,
    Rbp = 5,
    Rsi = 6,
    Rdi = 7,
    R8 = 8,
    R9 = 9,
    R10 = 10,
    R11 = 11,
    R12 = 12,
    R13 = 13,
    R14 = 14,
    R15 = 15,
}

impl HostReg {
    /// The scratch register used to stage mem-mem operations and as the
    /// `rax` half of 32→64 sign-extension through memory. Never a binding
    /// target.
    pub const SCRATCH: HostReg = HostReg::Rax;

    /// The scratch register used for variable shift counts (which the x86
    /// encoding requires to live in `cl`) and as a second mem-mem staging
    /// register for stores. Never a binding target. Its use never crosses
    /// an opcode boundary.
    pub const SCRATCH_SHIFT: HostReg = HostReg::Rcx;

    /// Registers callee-saved under the host C calling convention that the
    /// generated trace clobbers and must save/restore: the
    /// processor-struct base pointer plus every statically bound host
    /// register that isn't already caller-saved by convention.
    pub const CALLEE_SAVED: [HostReg; 6] = [
        HostReg::Rbp,
        HostReg::Rbx,
        HostReg::R12,
        HostReg::R13,
        HostReg::R14,
        HostReg::R15,
    ];

    /// The host register holding the pointer to the processor struct for
    /// the trace's lifetime.
    pub const PROC_BASE: HostReg = HostReg::Rbp;
}

/// An operand role in an x86 instruction: a register, a displaced memory
/// location, or an immediate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operand {
    /// A bare host register.
    Reg(HostReg),
    /// `[base + disp]`, accessed at the given width.
    Mem {
        /// Base register holding the address.
        base: HostReg,
        /// Signed byte displacement.
        disp: i32,
        /// Access width.
        width: Width,
    },
    /// A sign-extended immediate.
    Imm(i64),
}

impl Operand {
    /// `true` if this operand addresses memory (used to detect and avoid
    /// the illegal mem-mem combinations x86 forbids).
    #[must_use]
    pub fn is_memory(self) -> bool {
        matches!(self, Operand::Mem { .. })
    }
}

/// The two-operand integer ALU mnemonics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum AluOp {
    Add,
    Sub,
    And,
    Or,
    Xor,
}

/// The shift mnemonics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum ShiftOp {
    /// Logical shift left.
    Shl,
    /// Logical shift right.
    Shr,
    /// Arithmetic shift right.
    Sar,
}

/// Branch condition codes, named after the guest comparison they test:
/// `Lt`/`Ltu` are signed/unsigned "less than", `Ge`/`Geu` their complements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Cond {
    Eq,
    Ne,
    Lt,
    Ge,
    Ltu,
    Geu,
}

impl Cond {
    /// The logical negation of this condition, used by the
    /// predicted-not-taken branch shape to flip which side
    /// of the branch exits early.
    #[must_use]
    pub fn invert(self) -> Cond {
        match self {
            Cond::Eq => Cond::Ne,
            Cond::Ne => Cond::Eq,
            Cond::Lt => Cond::Ge,
            Cond::Ge => Cond::Lt,
            Cond::Ltu => Cond::Geu,
            Cond::Geu => Cond::Ltu,
        }
    }
}

/// An opaque forward-reference-capable label.
///
/// Labels may be referenced by a jump before they are bound; the assembler
/// implementing [`Emitter`] is required to support two-pass resolution,
/// the same way a typical JIT assembler's `Label` type does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Label(pub u32);

/// The primitive operations `OpLowering` needs from a host assembler.
///
/// Every method corresponds to one x86-64 mnemonic family, parameterized
/// over [`Operand`] so the same call site works whether an operand is a
/// register or a spill slot — the register/memory choice is made by the
/// caller (`RegMap::host_of` returning `None`), not by this trait.
pub trait Emitter {
    /// Allocates a new, unbound label.
    fn new_label(&mut self) -> Label;

    /// Binds `label` at the current emit position. A label may be bound at
    /// most once.
    fn bind_label(&mut self, label: Label);

    /// `mov dst, src`. At most one of `dst`/`src` may be a memory operand;
    /// the caller is responsible for staging through [`HostReg::SCRATCH`]
    /// when both would otherwise be memory.
    fn mov(&mut self, dst: Operand, src: Operand);

    /// Sign-extends `src` into `dst` (`movsx`/`movsxd` family), widening to
    /// `dst`'s width.
    fn movsx(&mut self, dst: Operand, src: Operand);

    /// Zero-extends `src` into `dst` (`movzx` family), widening to `dst`'s
    /// width. On x86-64, a 32-bit destination register write already
    /// zero-extends to 64 bits, which is how `slt`/`sltu` lowerings get
    /// their result from `setcc` without an extra instruction.
    fn movzx(&mut self, dst: Operand, src: Operand);

    /// `op dst, src` for the two-operand ALU family.
    fn alu(&mut self, op: AluOp, dst: Operand, src: Operand);

    /// `neg dst` (used by in-place subtraction when `rd == rs2`, after
    /// `sub rd, rs1` leaves the operands in the wrong order).
    fn neg(&mut self, dst: Operand);

    /// Zeroes `dst` — `xor reg, reg` when `dst` is a register (avoiding a
    /// wider `mov reg, 0` encoding), or a 0-immediate store when `dst` is
    /// memory.
    fn zero(&mut self, dst: Operand);

    /// `op dst, amount` for the shift family, encoded at
    /// `width`: unlike the rest of the ALU family, a shift's mask width
    /// (5 bits at `Dword`, 6 bits at `Qword`) is part of its observable
    /// semantics, so width-32 shift lowerings must select the narrower
    /// encoding explicitly rather than truncating a 64-bit result after
    /// the fact. `amount` is either an immediate shift count or
    /// [`Operand::Reg(HostReg::SCRATCH_SHIFT)`] for the variable-count
    /// case, where the x86 encoding requires the count to live in `cl`.
    fn shift(&mut self, op: ShiftOp, width: Width, dst: Operand, amount: Operand);

    /// `cmp lhs, rhs`.
    fn cmp(&mut self, lhs: Operand, rhs: Operand);

    /// `setcc` into the low byte of `dst`. Callers combine this with
    /// [`Emitter::movzx`] to zero-extend into a full guest-register-width
    /// result.
    fn setcc(&mut self, cond: Cond, dst: Operand);

    /// Unconditional jump to `target`.
    fn jmp(&mut self, target: Label);

    /// Conditional jump to `target` if `cond` holds.
    fn jcc(&mut self, cond: Cond, target: Label);

    /// Pushes `reg` onto the host stack (prologue callee-save).
    fn push(&mut self, reg: HostReg);

    /// Pops into `reg` from the host stack (epilogue callee-restore).
    fn pop(&mut self, reg: HostReg);

    /// Emits a `ret`.
    fn ret(&mut self);

    /// Reports an encoding failure. The trace being built is invalid; the
    /// caller discards it rather than attempting recovery.
    fn report_error(&mut self, message: &str);
}

/// Moves `imm` into `dst`, staging through [`HostReg::SCRATCH`] first when
/// `dst` is memory and `imm` doesn't fit the 32-bit sign-extended
/// immediate x86 permits for a memory destination (`mov reg64, imm64`
/// exists; `mov mem64, imm64` does not). Every call site that might write
/// a full 64-bit guest PC or fusion constant into a spill slot goes
/// through this instead of calling [`Emitter::mov`] directly — the value
/// is never truncated, but the encoding still has to be legal.
pub(crate) fn mov_imm(emitter: &mut dyn Emitter, dst: Operand, imm: i64) {
    if dst.is_memory() && i32::try_from(imm).is_err() {
        emitter.mov(Operand::Reg(HostReg::SCRATCH), Operand::Imm(imm));
        emitter.mov(dst, Operand::Reg(HostReg::SCRATCH));
    } else {
        emitter.mov(dst, Operand::Imm(imm));
    }
}
