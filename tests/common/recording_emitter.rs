//! An `Emitter` test double that records the abstract host instruction
//! stream a real x86 assembler would have been asked to produce.
//!
//! Grounded on the hardware crate's mock-device style
//! (`tests/common/mocks/memory.rs`): a small in-memory stand-in that
//! records/replays instead of touching real hardware or, here, a real
//! encoder. This is test-only scaffolding, not a second code generator
//! backend.

use std::collections::HashMap;

use rv_trace_jit::jit::{AluOp, Cond, Emitter, HostReg, Label, Operand, ShiftOp, Width};

/// One recorded host instruction, at the same granularity as the
/// `Emitter` trait's methods.
#[derive(Clone, Debug)]
pub enum HostInstr {
    Mov(Operand, Operand),
    Movsx(Operand, Operand),
    Movzx(Operand, Operand),
    Alu(AluOp, Operand, Operand),
    Neg(Operand),
    Zero(Operand),
    Shift(ShiftOp, Width, Operand, Operand),
    Cmp(Operand, Operand),
    Setcc(Cond, Operand),
    Jmp(Label),
    Jcc(Cond, Label),
    Push(HostReg),
    Pop(HostReg),
    Ret,
}

/// Records every emitted instruction in order, and where each label was
/// bound (as an index into the recorded stream).
#[derive(Debug, Default)]
pub struct RecordingEmitter {
    pub ops: Vec<HostInstr>,
    pub label_positions: HashMap<Label, usize>,
    next_label: u32,
    pub errors: Vec<String>,
}

impl RecordingEmitter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Emitter for RecordingEmitter {
    fn new_label(&mut self) -> Label {
        let label = Label(self.next_label);
        self.next_label += 1;
        label
    }

    fn bind_label(&mut self, label: Label) {
        let _ = self.label_positions.insert(label, self.ops.len());
    }

    fn mov(&mut self, dst: Operand, src: Operand) {
        self.ops.push(HostInstr::Mov(dst, src));
    }

    fn movsx(&mut self, dst: Operand, src: Operand) {
        self.ops.push(HostInstr::Movsx(dst, src));
    }

    fn movzx(&mut self, dst: Operand, src: Operand) {
        self.ops.push(HostInstr::Movzx(dst, src));
    }

    fn alu(&mut self, op: AluOp, dst: Operand, src: Operand) {
        self.ops.push(HostInstr::Alu(op, dst, src));
    }

    fn neg(&mut self, dst: Operand) {
        self.ops.push(HostInstr::Neg(dst));
    }

    fn zero(&mut self, dst: Operand) {
        self.ops.push(HostInstr::Zero(dst));
    }

    fn shift(&mut self, op: ShiftOp, width: Width, dst: Operand, amount: Operand) {
        self.ops.push(HostInstr::Shift(op, width, dst, amount));
    }

    fn cmp(&mut self, lhs: Operand, rhs: Operand) {
        self.ops.push(HostInstr::Cmp(lhs, rhs));
    }

    fn setcc(&mut self, cond: Cond, dst: Operand) {
        self.ops.push(HostInstr::Setcc(cond, dst));
    }

    fn jmp(&mut self, target: Label) {
        self.ops.push(HostInstr::Jmp(target));
    }

    fn jcc(&mut self, cond: Cond, target: Label) {
        self.ops.push(HostInstr::Jcc(cond, target));
    }

    fn push(&mut self, reg: HostReg) {
        self.ops.push(HostInstr::Push(reg));
    }

    fn pop(&mut self, reg: HostReg) {
        self.ops.push(HostInstr::Pop(reg));
    }

    fn ret(&mut self) {
        self.ops.push(HostInstr::Ret);
    }

    fn report_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}
