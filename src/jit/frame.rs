//! Prologue/epilogue generation.

use crate::jit::emitter::{mov_imm, Emitter, HostReg, Label, Operand, Width};
use crate::jit::regmap::RegMap;

/// Emits the trace's entry prologue and shared exit epilogue.
///
/// A `FrameIo` is constructed once per trace and its [`FrameIo::prologue`]
/// and [`FrameIo::epilogue`] are each called exactly once.
#[derive(Debug)]
pub struct FrameIo {
    regs: RegMap,
}

impl FrameIo {
    /// Creates a `FrameIo` that binds/spills according to `regs`.
    #[must_use]
    pub fn new(regs: RegMap) -> Self {
        Self { regs }
    }

    /// Emits the entry prologue:
    ///
    /// 1. Push callee-saved hosts that will be clobbered.
    /// 2. Move the sole argument register into [`HostReg::PROC_BASE`].
    /// 3. Load each bound guest register from its canonical memory slot.
    /// 4. Create (but do not yet bind) the shared exit label `term`.
    ///
    /// Returns the unbound `term` label; the caller binds it at the start
    /// of [`FrameIo::epilogue`].
    pub fn prologue(&self, emitter: &mut dyn Emitter, arg_reg: HostReg) -> Label {
        for &host in &HostReg::CALLEE_SAVED {
            emitter.push(host);
        }

        if arg_reg != HostReg::PROC_BASE {
            emitter.mov(
                Operand::Reg(HostReg::PROC_BASE),
                Operand::Reg(arg_reg),
            );
        }

        for (guest, host) in self.regs.bindings() {
            let slot = self.regs.spill_addr(guest, Width::Qword);
            emitter.mov(Operand::Reg(host), slot);
        }

        emitter.new_label()
    }

    /// Emits the shared exit epilogue:
    ///
    /// 1. If `term_pc != 0`, store it into the processor struct's `pc`
    ///    field as a full 64-bit immediate, never truncated to 32 bits.
    /// 2. Bind `term`.
    /// 3. Store each bound guest register back to its canonical memory
    ///    slot. This is unconditional: it's correct even when a branch
    ///    lowering already wrote `pc` and jumped here directly, since the
    ///    bindings still need to be spilled before the trace returns.
    /// 4. Pop callee-saved hosts in reverse.
    /// 5. Return.
    pub fn epilogue(&self, emitter: &mut dyn Emitter, term: Label, term_pc: u64, pc_offset: i32) {
        if term_pc != 0 {
            let pc_slot = Operand::Mem {
                base: HostReg::PROC_BASE,
                disp: pc_offset,
                width: Width::Qword,
            };
            mov_imm(emitter, pc_slot, term_pc as i64);
        }

        emitter.bind_label(term);

        for (guest, host) in self.regs.bindings() {
            let slot = self.regs.spill_addr(guest, Width::Qword);
            emitter.mov(slot, Operand::Reg(host));
        }

        for &host in HostReg::CALLEE_SAVED.iter().rev() {
            emitter.pop(host);
        }

        emitter.ret();
    }
}
