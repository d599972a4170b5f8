//! Static guest→host register binding.
//!
//! `RegMap` is a pure, injective partial function from guest registers to
//! host registers, baked into the ABI of every generated trace: the
//! prologue loads exactly these bindings from the processor struct, and
//! the epilogue spills exactly these bindings back.
//!
//! Any guest register *not* named by the binding table is "spilled": its
//! canonical home for the trace's lifetime is the processor struct in
//! host memory, addressed relative to [`HostReg::PROC_BASE`].
//!
//! Design note: a host id of zero (`rax`) is never used to mean "unbound"
//! here, even though `rax` is never a binding target anyway — `host_of`
//! returns `Option<HostReg>` instead, so "no binding" can never be
//! mistaken for "bound to rax".

use crate::common::reg::GuestReg;
use crate::jit::emitter::{HostReg, Operand, Width};

/// Layout of the guest processor struct's spill region, in bytes.
///
/// These offsets come from the concrete processor struct definition this
/// crate is embedded against; exposing them as values supplied at binding
/// time (rather than as link-time constants) keeps `RegMap` independent of
/// any one struct layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProcLayout {
    /// Byte offset of the integer register array (`ireg[0]`) within the
    /// processor struct.
    pub ireg_array_offset: i32,
    /// Byte offset of the `pc` field within the processor struct.
    pub pc_offset: i32,
    /// Size in bytes of one integer register slot (8 for RV64, `xlen_bytes`).
    pub xlen_bytes: i32,
}

impl ProcLayout {
    /// A conventional layout: `pc` first, then a 32-entry `u64` register
    /// array immediately after it: a processor struct whose first fields
    /// are a `pc` field and then a 32-entry integer register array, at
    /// known byte offsets.
    pub const DEFAULT: ProcLayout = ProcLayout {
        ireg_array_offset: 8,
        pc_offset: 0,
        xlen_bytes: 8,
    };

    /// Byte offset of guest register `reg`'s spill slot.
    #[must_use]
    pub fn ireg_offset(self, reg: GuestReg) -> i32 {
        self.ireg_array_offset + i32::from(reg.index()) * self.xlen_bytes
    }
}

/// The static guest→host register binding.
#[derive(Clone, Copy, Debug)]
pub struct RegMap {
    layout: ProcLayout,
}

impl RegMap {
    /// Creates a `RegMap` against the given processor struct layout.
    #[must_use]
    pub fn new(layout: ProcLayout) -> Self {
        Self { layout }
    }

    /// Creates a `RegMap` using [`ProcLayout::DEFAULT`].
    #[must_use]
    pub fn with_default_layout() -> Self {
        Self::new(ProcLayout::DEFAULT)
    }

    /// The processor struct layout this map was built against.
    #[must_use]
    pub fn layout(self) -> ProcLayout {
        self.layout
    }

    /// Resolves a guest register to its bound host register, if any.
    ///
    /// Matches this static binding table exactly:
    ///
    /// | Guest | Host |
    /// |---|---|
    /// | `x0` | none (spilled-but-constant) |
    /// | `ra` (`x1`) | `rdx` |
    /// | `sp` (`x2`) | `rbx` |
    /// | `t0` (`x5`) | `rsi` |
    /// | `t1` (`x6`) | `rdi` |
    /// | `a0..a7` (`x10..x17`) | `r8..r15` |
    ///
    /// `x0` is never bound: although the guest zero register is always
    /// zero, writes to it must be elided entirely by the lowering, not
    /// routed through a host register.
    #[must_use]
    pub fn host_of(self, reg: GuestReg) -> Option<HostReg> {
        match reg.index() {
            1 => Some(HostReg::Rdx),
            2 => Some(HostReg::Rbx),
            5 => Some(HostReg::Rsi),
            6 => Some(HostReg::Rdi),
            10 => Some(HostReg::R8),
            11 => Some(HostReg::R9),
            12 => Some(HostReg::R10),
            13 => Some(HostReg::R11),
            14 => Some(HostReg::R12),
            15 => Some(HostReg::R13),
            16 => Some(HostReg::R14),
            17 => Some(HostReg::R15),
            _ => None,
        }
    }

    /// Returns every `(guest, host)` pair this map binds, in a fixed
    /// order. Used by [`crate::jit::frame::FrameIo`] to generate the
    /// prologue loads and epilogue stores.
    #[must_use]
    pub fn bindings(self) -> Vec<(GuestReg, HostReg)> {
        const BOUND_GUEST: [u8; 10] = [1, 2, 5, 6, 10, 11, 12, 13, 14, 15];
        BOUND_GUEST
            .iter()
            .map(|&idx| {
                let g = GuestReg::new(idx).expect("BOUND_GUEST indices are always valid");
                let h = self.host_of(g).expect("BOUND_GUEST indices are always bound");
                (g, h)
            })
            .collect()
    }

    /// The memory operand for `reg`'s canonical spill slot:
    /// `[rbp + offsetof(ireg) + index * xlen_bytes]`.
    ///
    /// Valid (and meaningful) for every guest register, bound or not —
    /// some lowerings stage a bound register's *address* computation
    /// through its spill slot regardless (e.g. none currently do, but the
    /// accessor is total so future lowerings can rely on it).
    #[must_use]
    pub fn spill_addr(self, reg: GuestReg, width: Width) -> Operand {
        Operand::Mem {
            base: HostReg::PROC_BASE,
            disp: self.layout.ireg_offset(reg),
            width,
        }
    }

    /// The operand to use when *reading* `reg`: its bound host register,
    /// or its spill slot at qword width.
    #[must_use]
    pub fn read_operand(self, reg: GuestReg) -> Operand {
        match self.host_of(reg) {
            Some(h) => Operand::Reg(h),
            None => self.spill_addr(reg, Width::Qword),
        }
    }

    /// The memory operand for the processor struct's `pc` field.
    ///
    /// Used by branch lowerings to write an explicit target
    /// PC before exiting through `term`, and by [`crate::jit::frame::FrameIo`]
    /// to write `term_pc` in the epilogue.
    #[must_use]
    pub fn pc_slot(self) -> Operand {
        Operand::Mem {
            base: HostReg::PROC_BASE,
            disp: self.layout.pc_offset,
            width: Width::Qword,
        }
    }
}
