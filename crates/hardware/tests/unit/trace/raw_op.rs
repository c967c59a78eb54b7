//! Micro-op reconstruction.

use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use rvx_core::common::constants::{ROI_END_INSN, ROI_START_INSN};
use rvx_core::common::{RegId, RegKind, SimError};
use rvx_core::core::cpu::state::{InsnLog, UopAddr};
use rvx_core::trace::raw_op::{self, MicroOp, RetiredInsn, micro_ops, touched_vregs};
use rvx_core::trace::sink::{MagicCode, TraceEvent};

use crate::common::asm;
use crate::common::harness::{DATA_BASE, RAM_BASE, TestContext};
use crate::common::mocks::MockSink;

fn vector_writes(regs: &[u64]) -> InsnLog {
    let mut log = InsnLog::default();
    for &r in regs {
        log.write_reg(RegId::new(r, RegKind::Vector), 0);
    }
    log
}

fn element_addresses(pairs: &[(u64, u64)]) -> InsnLog {
    let mut log = InsnLog::default();
    log.write_reg(RegId::new(pairs[0].0, RegKind::VectorGeneric), 0);
    log.uop_addrs = pairs
        .iter()
        .map(|&(vreg, addr)| UopAddr {
            addr,
            vreg: Some(vreg),
        })
        .collect();
    log
}

fn raws(ops: &[MicroOp]) -> Vec<u32> {
    ops.iter().map(|op| op.raw).collect()
}

#[test]
fn touched_registers_are_sorted_and_unique() {
    let mut log = vector_writes(&[5, 3]);
    log.write_reg(RegId::new(4, RegKind::Int), 1);
    log.uop_addrs = vec![
        UopAddr {
            addr: 0,
            vreg: Some(4),
        },
        UopAddr {
            addr: 8,
            vreg: Some(3),
        },
        UopAddr {
            addr: 16,
            vreg: None,
        },
    ];

    assert_eq!(touched_vregs(&log), vec![3, 4, 5]);
}

#[test]
fn vector_vector_form_bumps_every_field() {
    let ops = micro_ops(asm::vadd_vv(2, 4, 6), &vector_writes(&[2, 3]));
    assert_eq!(raws(&ops), vec![asm::vadd_vv(2, 4, 6), asm::vadd_vv(3, 5, 7)]);
    assert_eq!(ops[1].vreg, 3);
    assert!(ops[1].addresses.is_empty());
}

#[test]
fn scalar_operand_keeps_rs1() {
    let ops = micro_ops(asm::vadd_vx(2, 4, 10), &vector_writes(&[2, 3]));
    assert_eq!(raws(&ops), vec![asm::vadd_vx(2, 4, 10), asm::vadd_vx(3, 5, 10)]);
}

#[test]
fn move_from_scalar_keeps_vs2() {
    let ops = micro_ops(asm::vmv_v_x(2, 10), &vector_writes(&[2, 3, 4]));
    assert_eq!(
        raws(&ops),
        vec![asm::vmv_v_x(2, 10), asm::vmv_v_x(3, 10), asm::vmv_v_x(4, 10)]
    );
}

#[test]
fn unit_stride_memory_bumps_only_vd() {
    let log = element_addresses(&[(2, 0x100), (2, 0x104), (3, 0x108)]);
    let ops = micro_ops(asm::vle(32, 2, 10), &log);

    assert_eq!(raws(&ops), vec![asm::vle(32, 2, 10), asm::vle(32, 3, 10)]);
    assert_eq!(ops[0].addresses, vec![0x100, 0x104]);
    assert_eq!(ops[1].addresses, vec![0x108]);
}

#[test]
fn indexed_memory_bumps_the_index_register() {
    let log = element_addresses(&[(2, 0x100), (3, 0x200)]);
    let ops = micro_ops(asm::vluxei(32, 2, 10, 8), &log);

    assert_eq!(
        raws(&ops),
        vec![asm::vluxei(32, 2, 10, 8), asm::vluxei(32, 3, 10, 9)]
    );
}

#[test]
fn scalar_instruction_has_no_micro_ops() {
    let mut log = InsnLog::default();
    log.write_reg(RegId::new(1, RegKind::Int), 5);
    assert!(micro_ops(asm::addi(1, 0, 5), &log).is_empty());
}

#[test]
fn segment_load_emits_one_record_per_field() {
    let mut ctx = TestContext::new().with_program(&[
        asm::vsetivli(0, 4, asm::vtype(32, 0)),
        asm::vlseg(3, 32, 4, 10),
    ]);
    ctx.set_x(10, DATA_BASE);

    assert_eq!(ctx.run(2), 2);
    let events = ctx.trace.events();
    assert_eq!(events.len(), 5);
    assert_eq!(
        events[1],
        TraceEvent::Magic {
            code: MagicCode::User,
            arg1: 4,
            arg2: u64::from(asm::vtype(32, 0)),
        }
    );

    let records = ctx.trace.instructions();
    assert_eq!(records.len(), 4);
    for (field, record) in records[1..].iter().enumerate() {
        let expected: Vec<u64> = (0..4)
            .map(|i| DATA_BASE + i * 12 + field as u64 * 4)
            .collect();
        assert_eq!(record.address, RAM_BASE + 4);
        assert_eq!(record.size, 4);
        assert_eq!(record.addresses, expected);
        assert!(record.executed);
    }
}

#[test]
fn scalar_access_is_one_record() {
    let mut ctx = TestContext::new().with_program(&[asm::sd(5, 6, 0)]);
    ctx.set_x(6, DATA_BASE);

    assert_eq!(ctx.run(1), 1);
    let records = ctx.trace.instructions();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].addresses, vec![DATA_BASE]);
    assert!(!records[0].is_branch);
}

#[test]
fn region_of_interest_words_emit_markers() {
    let mut sink = MockSink::new();
    let _ = sink
        .expect_instruction()
        .withf(|r| r.address == RAM_BASE && r.addresses.is_empty())
        .times(2)
        .returning(|_| Ok(()));
    for code in [MagicCode::RoiStart, MagicCode::RoiEnd] {
        let _ = sink
            .expect_magic()
            .with(eq(code), eq(0), eq(0))
            .times(1)
            .returning(|_, _, _| Ok(()));
    }

    for word in [ROI_START_INSN, ROI_END_INSN] {
        let insn = RetiredInsn {
            pc: RAM_BASE,
            length: 4,
            word,
            vl: 0,
            vtype: 0,
        };
        raw_op::emit(&mut sink, &insn, &InsnLog::default()).unwrap();
    }
}

#[test]
fn roi_markers_are_ordinary_instructions_when_executed() {
    let mut ctx = TestContext::new().with_program(&[ROI_START_INSN, ROI_END_INSN]);

    assert_eq!(ctx.run(2), 2);
    let codes: Vec<MagicCode> = ctx
        .trace
        .events()
        .into_iter()
        .filter_map(|e| match e {
            TraceEvent::Magic { code, .. } => Some(code),
            TraceEvent::Instruction(_) => None,
        })
        .collect();
    assert_eq!(codes, vec![MagicCode::RoiStart, MagicCode::RoiEnd]);
}

#[test]
fn sink_failure_is_fatal() {
    let mut sink = MockSink::new();
    let _ = sink
        .expect_instruction()
        .returning(|_| Err(std::io::Error::other("disk full")));
    let mut ctx = TestContext::new().with_program(&[asm::addi(1, 0, 1)]);
    ctx.cpu.set_trace_sink(Box::new(sink));

    let err = ctx.cpu.step(1).unwrap_err();
    assert!(matches!(err, SimError::TraceSink(_)));
}
