//! Statistics collection and reporting.

use pretty_assertions::assert_eq;
use rstest::rstest;
use rvx_core::stats::{STATS_SECTIONS, SimStats};

use crate::common::asm;
use crate::common::harness::TestContext;

#[test]
fn step_loop_updates_the_counters() {
    let mut ctx = TestContext::new().with_program(&[
        asm::addi(1, 0, 1),
        asm::addi(2, 0, 2),
        asm::WFI,
        asm::ILLEGAL,
    ]);

    assert_eq!(ctx.run(10), 3);
    assert_eq!(ctx.run(10), 0);

    let stats = &ctx.cpu.stats;
    assert_eq!(stats.instructions_retired, 3);
    assert_eq!(stats.batches, 2);
    assert_eq!(stats.wfi_yields, 1);
    assert_eq!(stats.traps_taken, 1);
    assert_eq!(stats.icache_misses, 4);
    assert_eq!(stats.icache_hits, 0);
}

#[rstest]
#[case::summary("summary", "sim_insts", "traps ")]
#[case::control("control", "wfi_yields", "sim_insts")]
#[case::frontend("frontend", "icache accesses", "debug_entries")]
fn report_selects_sections(#[case] section: &str, #[case] present: &str, #[case] absent: &str) {
    let report = SimStats::default().report(&[section]);
    assert!(report.contains(present), "{report}");
    assert!(!report.contains(absent), "{report}");
}

#[test]
fn empty_selection_reports_everything() {
    let mut stats = SimStats::default();
    stats.instructions_retired = 42;
    stats.icache_hits = 3;
    stats.icache_misses = 1;
    let report = stats.report(&[]);

    assert_eq!(report.lines().count(), stats.report(STATS_SECTIONS).lines().count());
    assert!(report.contains("sim_insts                42"));
    assert!(report.contains("traps                    0"));
    assert!(report.contains("miss_rate: 25.00%"));
}

#[test]
fn unknown_section_reports_nothing() {
    assert_eq!(SimStats::default().report(&["pipeline"]), "");
}

#[test]
fn serializes_counters_without_the_clock() {
    let mut stats = SimStats::default();
    stats.traps_taken = 2;
    let value = serde_json::to_value(&stats).unwrap();

    assert_eq!(value["traps_taken"], 2);
    assert!(value.get("start_time").is_none());
    assert_eq!(value.as_object().unwrap().len(), 10);
}
