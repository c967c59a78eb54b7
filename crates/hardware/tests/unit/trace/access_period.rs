//! Access-period bookkeeping.

use pretty_assertions::assert_eq;
use rvx_core::core::cpu::state::MemAccess;
use rvx_core::trace::access_period::{AccessPeriodTracker, Period};

use crate::common::asm;
use crate::common::harness::{DATA_BASE, TestContext};

fn access(addr: u64) -> MemAccess {
    MemAccess {
        addr,
        value: 0,
        size: 8,
    }
}

#[test]
fn store_then_load_closes_one_interval() {
    let mut ctx = TestContext::new().with_program(&[asm::sd(5, 6, 0), asm::ld(7, 6, 0)]);
    ctx.set_x(6, DATA_BASE);

    assert_eq!(ctx.run(1), 1);
    assert_eq!(ctx.run(1), 1);

    let history = ctx.cpu.tracer.access_periods.get(DATA_BASE).unwrap();
    assert_eq!(
        history.periods,
        vec![Period {
            interval: 1,
            is_vector: false
        }]
    );
    assert_eq!(history.last_access, 1);
}

#[test]
fn accesses_in_one_batch_share_a_stamp() {
    let mut ctx = TestContext::new().with_program(&[asm::sd(5, 6, 0), asm::ld(7, 6, 0)]);
    ctx.set_x(6, DATA_BASE);

    assert_eq!(ctx.run(2), 2);
    let history = ctx.cpu.tracer.access_periods.get(DATA_BASE).unwrap();
    assert_eq!(history.periods[0].interval, 0);
}

#[test]
fn vector_load_marks_its_period() {
    let mut ctx = TestContext::new().with_program(&[
        asm::vsetivli(0, 1, asm::vtype(32, 0)),
        asm::sw(5, 6, 0),
        asm::vle(32, 1, 6),
    ]);
    ctx.set_x(6, DATA_BASE);

    for _ in 0..3 {
        assert_eq!(ctx.run(1), 1);
    }
    let history = ctx.cpu.tracer.access_periods.get(DATA_BASE).unwrap();
    assert!(!history.is_vector);
    assert_eq!(
        history.periods,
        vec![Period {
            interval: 1,
            is_vector: true
        }]
    );
}

#[test]
fn writes_only_move_the_stamp() {
    let mut tracker = AccessPeriodTracker::new();
    let word = asm::sd(5, 6, 0);

    tracker.record(word, 10, &[], &[access(0x100)]);
    tracker.record(word, 18, &[], &[access(0x100)]);
    let history = tracker.get(0x100).unwrap();
    assert!(history.periods.is_empty());
    assert_eq!(history.last_access, 18);

    tracker.record(asm::ld(5, 6, 0), 25, &[access(0x100)], &[]);
    assert_eq!(tracker.get(0x100).unwrap().periods[0].interval, 7);
}

#[test]
fn writes_apply_before_reads_of_the_same_instruction() {
    let mut tracker = AccessPeriodTracker::new();
    tracker.record(asm::ld(5, 6, 0), 10, &[access(0x40)], &[]);
    tracker.record(asm::ld(5, 6, 0), 25, &[access(0x40)], &[access(0x40)]);

    let history = tracker.get(0x40).unwrap();
    assert_eq!(history.periods[0].interval, 0);
}

#[test]
fn first_read_only_opens_the_history() {
    let mut tracker = AccessPeriodTracker::new();
    assert!(tracker.is_empty());

    tracker.record(asm::ld(5, 6, 0), 3, &[access(0x200), access(0x208)], &[]);
    assert_eq!(tracker.len(), 2);
    assert!(tracker.iter().all(|(_, h)| h.periods.is_empty()));
    assert_eq!(
        tracker.iter().map(|(addr, _)| addr).collect::<Vec<_>>(),
        vec![0x200, 0x208]
    );
}

#[test]
fn json_is_keyed_by_address() {
    let mut tracker = AccessPeriodTracker::new();
    tracker.record(asm::sd(5, 6, 0), 10, &[], &[access(0x10)]);
    tracker.record(asm::ld(5, 6, 0), 25, &[access(0x10)], &[]);

    let value: serde_json::Value = serde_json::from_str(&tracker.to_json().unwrap()).unwrap();
    assert_eq!(value["16"]["last_access"], 25);
    assert_eq!(value["16"]["periods"][0]["interval"], 15);
    assert_eq!(value["16"]["periods"][0]["is_vector"], false);
}
