//! End-to-end scenarios (S1-S6) and a sample of the quantified invariants,
//! run against the recording emitter and reference interpreter in
//! `common`.

use rv_trace_jit::jit::{HostReg, JitConfig, ProcLayout, RegMap, TraceDriver, TraceOutcome};
use rv_trace_jit::{DecodedInst, GuestReg, Op};

use crate::common::interpreter::GuestMachine;
use crate::common::recording_emitter::RecordingEmitter;

fn g(idx: u8) -> GuestReg {
    GuestReg::new(idx).expect("test register indices are always valid")
}

fn inst(op: Op, pc: u64, rd: Option<u8>, rs1: Option<u8>, rs2: Option<u8>, imm: i64) -> DecodedInst {
    DecodedInst {
        op,
        pc,
        rd: rd.map(g),
        rs1: rs1.map(g),
        rs2: rs2.map(g),
        imm,
        inst_bits: 0,
        inst_len: 4,
    }
}

/// Lowers `program` through a fresh [`TraceDriver`], returning the
/// recorded instruction stream and each instruction's [`TraceOutcome`].
fn lower(program: &[DecodedInst]) -> (RecordingEmitter, Vec<TraceOutcome>) {
    let mut emitter = RecordingEmitter::new();
    let mut driver = TraceDriver::new(RegMap::with_default_layout(), JitConfig::default());
    driver.emit_prolog(&mut emitter, HostReg::Rdi);

    let mut outcomes = Vec::with_capacity(program.len());
    for dec in program {
        let outcome = driver.emit(dec, &mut emitter);
        let done = matches!(outcome, TraceOutcome::Complete(_));
        outcomes.push(outcome);
        if done {
            break;
        }
    }
    driver.emit_epilog(&mut emitter);
    (emitter, outcomes)
}

fn machine() -> GuestMachine {
    GuestMachine::new(ProcLayout::DEFAULT)
}

#[test]
fn s1_arithmetic_sequence() {
    let start = 0x1000;
    let program = [
        inst(Op::Addi, start, Some(10), Some(0), None, 7),
        inst(Op::Addi, start + 4, Some(11), Some(0), None, 35),
        inst(Op::Add, start + 8, Some(12), Some(10), Some(11), 0),
    ];
    let (emitter, outcomes) = lower(&program);
    assert!(outcomes.iter().all(|o| *o == TraceOutcome::Continue));

    let mut m = machine();
    m.set_start_pc(start);
    m.call(&emitter, HostReg::Rdi);

    assert_eq!(m.guest_reg(10), 7);
    assert_eq!(m.guest_reg(11), 35);
    assert_eq!(m.guest_reg(12), 42);
    assert_eq!(m.pc(), start + 12);
}

#[test]
fn s2_lui_addiw_sign_extends() {
    let start = 0x2000;
    let program = [
        inst(Op::Lui, start, Some(10), None, None, 0x1234_5000),
        inst(Op::Addiw, start + 4, Some(10), Some(10), None, -1),
    ];
    let (emitter, outcomes) = lower(&program);
    assert!(outcomes.iter().all(|o| *o == TraceOutcome::Continue));

    let mut m = machine();
    m.set_start_pc(start);
    m.call(&emitter, HostReg::Rdi);

    assert_eq!(m.guest_reg(10), 0x0000_0000_1234_4FFF);
    assert_eq!(m.pc(), start + 8);
}

#[test]
fn s3_li_then_shift_right_logical() {
    let start = 0x3000;
    let program = [
        inst(Op::Li, start, Some(5), None, None, -1),
        inst(Op::Srli, start + 4, Some(5), Some(5), None, 32),
    ];
    let (emitter, outcomes) = lower(&program);
    assert!(outcomes.iter().all(|o| *o == TraceOutcome::Continue));

    let mut m = machine();
    m.set_start_pc(start);
    m.call(&emitter, HostReg::Rdi);

    assert_eq!(m.guest_reg(5), 0x0000_0000_FFFF_FFFF);
}

#[test]
fn s4_slt_sltu_comparisons() {
    let start = 0x4000;
    let program = [
        inst(Op::Addi, start, Some(10), Some(0), None, 5),
        inst(Op::Addi, start + 4, Some(11), Some(0), None, 3),
        inst(Op::Slt, start + 8, Some(12), Some(11), Some(10), 0),
        inst(Op::Sltu, start + 12, Some(13), Some(10), Some(11), 0),
    ];
    let (emitter, outcomes) = lower(&program);
    assert!(outcomes.iter().all(|o| *o == TraceOutcome::Continue));

    let mut m = machine();
    m.set_start_pc(start);
    m.call(&emitter, HostReg::Rdi);

    assert_eq!(m.guest_reg(12), 1);
    assert_eq!(m.guest_reg(13), 0);
}

#[test]
fn s5_branch_loop_completes_trace_on_pc_revisit() {
    let start = 0x5000;
    // addi a0, a0, 1 ; bne a0, a1, -4 (back to start)
    let program = [
        inst(Op::Addi, start, Some(10), Some(10), None, 1),
        inst(Op::Bne, start + 4, None, Some(10), Some(11), -4),
        // A third "instruction" at `start` again: the outer trace recorder
        // (not this crate) would decode this by re-fetching at `start`;
        // here we just feed the same PC again to exercise the dedup check.
        inst(Op::Addi, start, Some(10), Some(10), None, 1),
    ];
    let (_emitter, outcomes) = lower(&program);

    assert_eq!(outcomes[0], TraceOutcome::Continue);
    assert_eq!(outcomes[1], TraceOutcome::Continue);
    assert_eq!(
        outcomes[2],
        TraceOutcome::Complete(rv_trace_jit::CompleteReason::PcRevisit)
    );

    // The branch is its own loop back-edge (both `start` and the
    // fallthrough are bound labels by the time it's lowered), so it must
    // not have touched `term_pc` after zeroing it.
    let mut m = machine();
    m.set_start_pc(start);
    m.set_guest_reg(10, 0);
    m.set_guest_reg(11, 3);
    m.call(&_emitter, HostReg::Rdi);

    // The branch's target (`start`) is a bound label in this same trace,
    // so the generated code loops natively until `a0 == a1`, then falls
    // through to the instruction after the branch — one `call` runs the
    // whole guest loop to completion without re-entering the driver.
    assert_eq!(m.guest_reg(10), 3);
    assert_eq!(m.pc(), start + 4 + 4);
}

#[test]
fn s6_store_then_load_sign_extends() {
    let start = 0x6000;
    let buf = 0x9000u64;
    // sw a0, 8(sp) ; lw a1, 8(sp)
    let program = [
        inst(Op::Sw, start, None, Some(2), Some(10), 8),
        inst(Op::Lw, start + 4, Some(11), Some(2), None, 8),
    ];
    let (emitter, outcomes) = lower(&program);
    assert!(outcomes.iter().all(|o| *o == TraceOutcome::Continue));

    let mut m = machine();
    m.set_start_pc(start);
    m.set_guest_reg(2, buf); // sp -> buffer base
    m.set_guest_reg(10, 0xDEAD_BEEF);
    m.alloc_buffer(buf, 64);
    m.call(&emitter, HostReg::Rdi);

    assert_eq!(m.guest_reg(11), 0xFFFF_FFFF_DEAD_BEEF);
}

#[test]
fn rd_zero_is_elided_for_every_writer() {
    let start = 0x7000;
    let program = [inst(Op::Add, start, Some(0), Some(10), Some(11), 0)];
    let (emitter, _) = lower(&program);
    // Only the prologue/epilogue's own bookkeeping movs exist; the `add`
    // itself emits nothing since its destination is `x0`.
    assert!(emitter.ops.iter().all(|op| !matches!(
        op,
        crate::common::recording_emitter::HostInstr::Alu(..)
    )));
}

#[test]
fn xor_of_a_register_with_itself_zeroes_it() {
    let start = 0x8000;
    let program = [
        inst(Op::Addi, start, Some(10), Some(0), None, 123),
        inst(Op::Xor, start + 4, Some(10), Some(10), Some(10), 0),
    ];
    let (emitter, outcomes) = lower(&program);
    assert!(outcomes.iter().all(|o| *o == TraceOutcome::Continue));

    let mut m = machine();
    m.set_start_pc(start);
    m.call(&emitter, HostReg::Rdi);
    assert_eq!(m.guest_reg(10), 0);
}

#[test]
fn addi_boundary_immediates_sign_extend_correctly() {
    let start = 0x9100;
    let program = [
        inst(Op::Addi, start, Some(10), Some(0), None, 2047),
        inst(Op::Addi, start + 4, Some(11), Some(0), None, -2048),
    ];
    let (emitter, outcomes) = lower(&program);
    assert!(outcomes.iter().all(|o| *o == TraceOutcome::Continue));

    let mut m = machine();
    m.set_start_pc(start);
    m.call(&emitter, HostReg::Rdi);
    assert_eq!(m.guest_reg(10), 2047);
    assert_eq!(m.guest_reg(11) as i64, -2048);
}

#[test]
fn negative_displacement_store_and_load_address_the_same_byte() {
    let start = 0xA000;
    let buf = 0xB000u64;
    let program = [
        inst(Op::Sb, start, None, Some(2), Some(10), -8),
        inst(Op::Lbu, start + 4, Some(11), Some(2), None, -8),
    ];
    let (emitter, outcomes) = lower(&program);
    assert!(outcomes.iter().all(|o| *o == TraceOutcome::Continue));

    let mut m = machine();
    m.set_start_pc(start);
    m.set_guest_reg(2, buf + 16);
    m.set_guest_reg(10, 0xAB);
    m.alloc_buffer(buf, 32);
    m.call(&emitter, HostReg::Rdi);
    assert_eq!(m.guest_reg(11), 0xAB);
}
