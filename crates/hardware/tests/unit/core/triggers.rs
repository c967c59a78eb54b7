//! Address triggers and instruction replay.

use pretty_assertions::assert_eq;
use rvx_core::common::constants::DEBUG_ROM_ENTRY;
use rvx_core::core::units::triggers::{Trigger, TriggerAction, TriggerModule, TriggerOp};
use rvx_core::isa::privileged::cause::{debug, exception};

use crate::common::asm;
use crate::common::harness::{DATA_BASE, RAM_BASE, TestContext};

fn data_trigger(load: bool, store: bool, action: TriggerAction) -> Trigger {
    Trigger {
        address: DATA_BASE,
        execute: false,
        load,
        store,
        action,
    }
}

#[test]
fn load_trigger_replays_once_then_halts() {
    let mut ctx = TestContext::new().with_program(&[asm::ld(5, 6, 0), asm::addi(1, 0, 1)]);
    ctx.set_x(6, DATA_BASE);
    ctx.poke(DATA_BASE, 8, 0xdead_beef);
    let _ = ctx
        .cpu
        .triggers
        .add(data_trigger(true, false, TriggerAction::DebugMode));

    assert_eq!(ctx.run(1), 1);
    assert_eq!(ctx.x(5), 0xdead_beef);
    assert_eq!(ctx.x(1), 0);
    assert_eq!(ctx.cpu.stats.trigger_replays, 1);
    assert!(ctx.cpu.triggers.matched().is_none());

    assert!(ctx.cpu.state.debug_mode);
    assert_eq!(ctx.cpu.csrs.dcsr.cause, debug::HWBP);
    assert_eq!(ctx.cpu.csrs.dpc, RAM_BASE + 4);

    let lines = ctx.commit_lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains(" x5  0x00000000deadbeef"), "{}", lines[0]);
}

#[test]
fn store_trigger_with_exception_action_traps_after_the_store() {
    let mut ctx = TestContext::new().with_program(&[asm::sd(5, 6, 0)]);
    ctx.set_x(5, 0x1234);
    ctx.set_x(6, DATA_BASE);
    ctx.cpu.csrs.mtvec = RAM_BASE + 0x400;
    let _ = ctx
        .cpu
        .triggers
        .add(data_trigger(false, true, TriggerAction::DebugException));

    assert_eq!(ctx.run(1), 1);
    assert_eq!(ctx.peek(DATA_BASE, 8), 0x1234);
    assert_eq!(ctx.cpu.csrs.mcause, exception::BREAKPOINT);
    assert_eq!(ctx.cpu.csrs.mtval, DATA_BASE);
    assert_eq!(ctx.cpu.csrs.mepc, RAM_BASE + 4);
    assert_eq!(ctx.cpu.pc(), RAM_BASE + 0x400);
    assert!(!ctx.cpu.state.debug_mode);
    assert_eq!(ctx.commit_lines().len(), 1);
}

#[test]
fn load_trigger_ignores_stores() {
    let mut ctx = TestContext::new().with_program(&[asm::sd(5, 6, 0)]);
    ctx.set_x(6, DATA_BASE);
    let _ = ctx
        .cpu
        .triggers
        .add(data_trigger(true, false, TriggerAction::DebugMode));

    assert_eq!(ctx.run(1), 1);
    assert_eq!(ctx.cpu.stats.trigger_replays, 0);
    assert!(!ctx.cpu.state.debug_mode);
}

#[test]
fn execute_trigger_halts_before_the_instruction() {
    let mut ctx = TestContext::new().with_program(&[asm::addi(1, 0, 1), asm::addi(2, 0, 2)]);
    let _ = ctx.cpu.triggers.add(Trigger {
        address: RAM_BASE + 4,
        execute: true,
        load: false,
        store: false,
        action: TriggerAction::DebugMode,
    });

    // The first increment, then the debug ROM's `wfi`.
    assert_eq!(ctx.run(5), 2);
    assert_eq!(ctx.x(1), 1);
    assert_eq!(ctx.x(2), 0);
    assert_eq!(ctx.cpu.stats.trigger_replays, 0);
    assert_eq!(ctx.cpu.csrs.dcsr.cause, debug::HWBP);
    assert_eq!(ctx.cpu.csrs.dpc, RAM_BASE + 4);
}

#[test]
fn triggers_are_ignored_in_debug_mode() {
    let mut ctx = TestContext::new();
    ctx.cpu.enter_debug_mode(debug::HALT);
    ctx.load_program(DEBUG_ROM_ENTRY, &[asm::ld(5, 6, 0), asm::WFI]);
    ctx.set_x(6, DATA_BASE);
    let _ = ctx
        .cpu
        .triggers
        .add(data_trigger(true, false, TriggerAction::DebugException));

    assert_eq!(ctx.run(4), 2);
    assert_eq!(ctx.cpu.stats.trigger_replays, 0);
    assert!(ctx.cpu.triggers.matched().is_none());
}

#[test]
fn recorded_match_suppresses_further_matches() {
    let mut module = TriggerModule::new();
    let index = module.add(data_trigger(true, true, TriggerAction::DebugMode));

    let hit = module.check_memory(TriggerOp::Load, DATA_BASE).unwrap_err();
    assert_eq!(hit.index, index);
    assert_eq!(hit.op, TriggerOp::Load);
    assert!(module.check_memory(TriggerOp::Store, DATA_BASE).is_ok());

    module.clear_matched();
    assert!(module.check_memory(TriggerOp::Load, DATA_BASE + 8).is_ok());
    assert!(module.check_memory(TriggerOp::Store, DATA_BASE).is_err());
}

#[test]
fn execute_matches_are_not_recorded() {
    let mut module = TriggerModule::new();
    let _ = module.add(Trigger {
        address: RAM_BASE,
        execute: true,
        load: false,
        store: false,
        action: TriggerAction::DebugException,
    });

    assert!(module.check_execute(RAM_BASE).is_err());
    assert!(module.check_execute(RAM_BASE).is_err());
    assert!(module.matched().is_none());
    assert!(module.check_execute(RAM_BASE + 4).is_ok());
}
