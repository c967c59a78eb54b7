//! Integer, control-transfer and scalar memory handlers.

use pretty_assertions::assert_eq;
use rstest::rstest;
use rvx_core::config::Config;
use rvx_core::isa::privileged::cause::exception;

use crate::common::asm;
use crate::common::harness::{DATA_BASE, RAM_BASE, TestContext};

const PATTERN: u64 = 0x8081_8283_8485_8687;

#[rstest]
#[case::lb(asm::lb(5, 6, 0), 0xffff_ffff_ffff_ff87)]
#[case::lbu(asm::lbu(5, 6, 0), 0x87)]
#[case::lh(asm::i_type(0x03, 5, 1, 6, 0), 0xffff_ffff_ffff_8687)]
#[case::lhu(asm::i_type(0x03, 5, 5, 6, 0), 0x8687)]
#[case::lw(asm::lw(5, 6, 0), 0xffff_ffff_8485_8687)]
#[case::lwu(asm::i_type(0x03, 5, 6, 6, 0), 0x8485_8687)]
#[case::ld(asm::ld(5, 6, 0), PATTERN)]
#[case::lb_offset(asm::lb(5, 6, 7), 0xffff_ffff_ffff_ff80)]
fn loads_extend_by_width(#[case] word: u32, #[case] expected: u64) {
    let mut ctx = TestContext::new().with_program(&[word]);
    ctx.poke(DATA_BASE, 8, PATTERN);
    ctx.set_x(6, DATA_BASE);

    assert_eq!(ctx.run(1), 1);
    assert_eq!(ctx.x(5), expected);
}

#[rstest]
#[case::sb(asm::sb(5, 6, 0), 0xff, " mem 0x0000000080008000 0xef")]
#[case::sw(asm::sw(5, 6, 0), 0xffff_ffff, " mem 0x0000000080008000 0xbeefbeef")]
#[case::sd(asm::sd(5, 6, 8), u64::MAX, " mem 0x0000000080008008 0xbeefbeefbeefbeef")]
fn stores_write_the_low_bytes(#[case] word: u32, #[case] mask: u64, #[case] suffix: &str) {
    let mut ctx = TestContext::new().with_program(&[word]);
    ctx.set_x(5, 0xbeef_beef_beef_beef);
    ctx.set_x(6, DATA_BASE);

    assert_eq!(ctx.run(1), 1);
    let offset = if suffix.contains("80008008") { 8 } else { 0 };
    assert_eq!(ctx.peek(DATA_BASE + offset, 8), 0xbeef_beef_beef_beef & mask);

    let lines = ctx.commit_lines();
    assert!(lines[0].ends_with(suffix), "{}", lines[0]);
}

#[test]
fn addi_wraps_and_x0_stays_zero() {
    let mut ctx = TestContext::new().with_program(&[asm::addi(1, 1, 1), asm::addi(0, 0, 5)]);
    ctx.set_x(1, u64::MAX);

    assert_eq!(ctx.run(2), 2);
    assert_eq!(ctx.x(1), 0);
    assert_eq!(ctx.x(0), 0);

    let lines = ctx.commit_lines();
    assert_eq!(lines[1], "core   0: 3 0x0000000080000004 (0x00500013)");
}

#[rstest]
#[case::positive(0x12345, 0x1234_5000)]
#[case::sign_extended(0x80000, 0xffff_ffff_8000_0000)]
fn lui_loads_the_upper_bits(#[case] imm20: u32, #[case] expected: u64) {
    let mut ctx = TestContext::new().with_program(&[asm::lui(5, imm20)]);

    assert_eq!(ctx.run(1), 1);
    assert_eq!(ctx.x(5), expected);
}

#[test]
fn jal_links_and_jumps() {
    let mut ctx = TestContext::new().with_program(&[asm::jal(1, 8)]);

    assert_eq!(ctx.run(1), 1);
    assert_eq!(ctx.x(1), RAM_BASE + 4);
    assert_eq!(ctx.cpu.pc(), RAM_BASE + 8);

    let record = &ctx.trace.instructions()[0];
    assert!(record.is_branch);
    assert!(record.taken);
}

#[test]
fn jalr_clears_the_low_bit() {
    let mut ctx = TestContext::new().with_program(&[asm::jalr(1, 6, 1)]);
    ctx.set_x(6, RAM_BASE + 0x20);

    assert_eq!(ctx.run(1), 1);
    assert_eq!(ctx.cpu.pc(), RAM_BASE + 0x20);
    assert_eq!(ctx.x(1), RAM_BASE + 4);
}

#[rstest]
#[case::beq_taken(asm::beq(1, 2, 12), 7, 7, true)]
#[case::beq_not_taken(asm::beq(1, 2, 12), 7, 8, false)]
#[case::bne_taken(asm::bne(1, 2, 12), 7, 8, true)]
#[case::bne_not_taken(asm::bne(1, 2, 12), 7, 7, false)]
fn conditional_branches(#[case] word: u32, #[case] a: u64, #[case] b: u64, #[case] taken: bool) {
    let mut ctx = TestContext::new().with_program(&[word]);
    ctx.set_x(1, a);
    ctx.set_x(2, b);

    assert_eq!(ctx.run(1), 1);
    let expected_pc = if taken { RAM_BASE + 12 } else { RAM_BASE + 4 };
    assert_eq!(ctx.cpu.pc(), expected_pc);

    let record = &ctx.trace.instructions()[0];
    assert!(record.is_branch);
    assert_eq!(record.taken, taken);
}

#[test]
fn misaligned_branch_target_traps_only_when_taken() {
    let mut ctx = TestContext::new().with_program(&[asm::beq(0, 0, 6)]);

    assert_eq!(ctx.run(1), 0);
    assert_eq!(ctx.cpu.csrs.mcause, exception::INSTRUCTION_ADDRESS_MISALIGNED);
    assert_eq!(ctx.cpu.csrs.mtval, RAM_BASE + 6);

    let mut ctx = TestContext::new().with_program(&[asm::bne(0, 0, 6)]);
    assert_eq!(ctx.run(1), 1);
}

fn rv32() -> Config {
    let mut config = Config::default();
    config.isa.xlen = 32;
    config
}

#[test]
fn rv32_sign_extends_and_prints_narrow_values() {
    let mut ctx = TestContext::with_config(&rv32()).with_program(&[asm::addi(1, 0, -1)]);

    assert_eq!(ctx.run(1), 1);
    assert_eq!(ctx.x(1), u64::MAX);
    assert_eq!(
        ctx.commit_lines(),
        vec!["core   0: 3 0x80000000 (0xfff00093) x1  0xffffffff".to_owned()]
    );
}

#[rstest]
#[case::ld(asm::ld(5, 6, 0))]
#[case::lwu(asm::i_type(0x03, 5, 6, 6, 0))]
#[case::sd(asm::sd(5, 6, 0))]
fn rv32_rejects_doubleword_forms(#[case] word: u32) {
    let mut ctx = TestContext::with_config(&rv32()).with_program(&[word]);
    ctx.set_x(6, DATA_BASE);

    assert_eq!(ctx.run(1), 0);
    assert_eq!(ctx.cpu.csrs.mcause, exception::ILLEGAL_INSTRUCTION);
    assert_eq!(ctx.cpu.csrs.mtval, u64::from(word));
}
