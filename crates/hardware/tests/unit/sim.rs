//! Round-robin scheduling and halt groups.

use pretty_assertions::assert_eq;
use rvx_core::config::Config;
use rvx_core::core::cpu::state::HaltRequest;
use rvx_core::isa::privileged::cause::debug;
use rvx_core::{Cpu, Simulator};

use crate::common::asm;
use crate::common::harness::{RAM_BASE, test_memory};

fn hart(id: u32) -> Cpu {
    let mut config = Config::default();
    config.general.hart_id = id;
    let mut cpu = Cpu::new(&config, Box::new(test_memory())).unwrap();
    for i in 0..8 {
        cpu.mmu
            .store(RAM_BASE + 4 * i, 4, u64::from(asm::addi(1, 1, 1)))
            .unwrap();
    }
    cpu
}

#[test]
fn every_hart_runs_its_quantum_each_round() {
    let mut sim = Simulator::new(vec![hart(0), hart(1)], 3);

    assert_eq!(sim.run(2).unwrap(), 12);
    assert_eq!(sim.rounds(), 2);
    for cpu in sim.harts() {
        assert_eq!(cpu.read_x(1), 6);
        assert_eq!(cpu.csrs.minstret, 6);
    }
}

#[test]
fn zero_quantum_runs_one_instruction() {
    let mut sim = Simulator::new(vec![hart(0)], 0);
    assert_eq!(sim.quantum(), 1);
    assert_eq!(sim.step_all().unwrap(), 1);
}

#[test]
fn halted_hart_halts_its_group_in_the_same_round() {
    let mut sim = Simulator::new(vec![hart(0), hart(1)], 3).with_halt_group(true);
    sim.hart_mut(0).unwrap().set_halt_request(HaltRequest::Regular);

    // Each hart enters debug mode and retires the ROM's `wfi`.
    assert_eq!(sim.step_all().unwrap(), 2);

    let harts = sim.harts();
    assert!(harts[0].state.debug_mode);
    assert_eq!(harts[0].csrs.dcsr.cause, debug::DEBUGINT);
    assert!(harts[1].state.debug_mode);
    assert_eq!(harts[1].csrs.dcsr.cause, debug::GROUP);
    assert_eq!(harts[1].csrs.dpc, RAM_BASE);
    assert_eq!(harts[1].read_x(1), 0);
}

#[test]
fn without_a_group_other_harts_keep_running() {
    let mut sim = Simulator::new(vec![hart(0), hart(1)], 3);
    sim.hart_mut(0).unwrap().set_halt_request(HaltRequest::Regular);

    assert_eq!(sim.step_all().unwrap(), 4);
    assert!(!sim.harts()[1].state.debug_mode);
    assert_eq!(sim.harts()[1].read_x(1), 3);
}

#[test]
fn out_of_range_hart_is_none() {
    let mut sim = Simulator::new(vec![hart(0)], 3);
    assert!(sim.hart_mut(1).is_none());
}
