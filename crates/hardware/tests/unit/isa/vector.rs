//! Vector configuration, memory and arithmetic handlers.

use pretty_assertions::assert_eq;
use rstest::rstest;
use rvx_core::core::arch::vector::RoundingMode;
use rvx_core::isa::privileged::cause::exception;

use crate::common::asm;
use crate::common::harness::{DATA_BASE, TestContext};

const E32_M1: u32 = asm::vtype(32, 0);

/// Hart whose program starts with `vsetivli x0, vl, vtype`.
fn configured(vl: u32, vtype: u32, body: &[u32]) -> TestContext {
    let mut program = vec![asm::vsetivli(0, vl, vtype)];
    program.extend_from_slice(body);
    TestContext::new().with_program(&program)
}

fn fill(ctx: &mut TestContext, reg: u64, sew: u32, values: &[u64]) {
    for (i, &v) in values.iter().enumerate() {
        ctx.cpu.vu.set_elt(reg, i as u64, sew, v);
    }
}

fn elements(ctx: &TestContext, reg: u64, sew: u32, n: u64) -> Vec<u64> {
    (0..n).map(|i| ctx.cpu.vu.elt(reg, i, sew)).collect()
}

#[rstest]
#[case::avl_below_vlmax(asm::vsetvli(5, 10, E32_M1), 3, 3)]
#[case::avl_clamped(asm::vsetvli(5, 10, E32_M1), 10, 4)]
#[case::rs1_x0_selects_vlmax(asm::vsetvli(5, 0, asm::vtype(8, 1)), 0, 32)]
#[case::fractional_lmul(asm::vsetvli(5, 10, asm::vtype(8, -1)), 100, 8)]
#[case::immediate_avl(asm::vsetivli(5, 3, asm::vtype(16, 0)), 0, 3)]
fn vset_computes_vl(#[case] word: u32, #[case] avl: u64, #[case] vl: u64) {
    let mut ctx = TestContext::new().with_program(&[word]);
    ctx.set_x(10, avl);

    assert_eq!(ctx.run(1), 1);
    assert_eq!(ctx.x(5), vl);
    assert_eq!(ctx.cpu.vu.vl, vl);
    assert!(!ctx.cpu.vu.vill);
}

#[test]
fn vsetvl_takes_vtype_from_a_register() {
    let mut ctx = TestContext::new().with_program(&[asm::vsetvl(5, 10, 11)]);
    ctx.set_x(10, 2);
    ctx.set_x(11, u64::from(asm::vtype(64, 0)));

    assert_eq!(ctx.run(1), 1);
    assert_eq!(ctx.x(5), 2);
    assert_eq!(ctx.cpu.vu.vsew, 64);
    assert_eq!(ctx.cpu.vu.vtype, u64::from(asm::vtype(64, 0)));
}

#[test]
fn x0_forms_keep_vl_within_the_new_vlmax() {
    let mut ctx = TestContext::new().with_program(&[
        asm::vsetivli(0, 4, E32_M1),
        asm::vsetvli(0, 0, asm::vtype(64, 0)),
    ]);

    assert_eq!(ctx.run(2), 2);
    assert_eq!(ctx.cpu.vu.vl, 2);
}

#[test]
fn unsupported_vtype_sets_vill() {
    let mut ctx = TestContext::new().with_program(&[asm::vsetvli(5, 10, asm::vtype(64, -3))]);
    ctx.set_x(10, 4);

    assert_eq!(ctx.run(1), 1);
    assert!(ctx.cpu.vu.vill);
    assert_eq!(ctx.x(5), 0);
    assert_eq!(ctx.cpu.vu.vtype, 1 << 63);
}

#[test]
fn unit_stride_load_and_store() {
    let mut ctx = configured(4, E32_M1, &[asm::vle(32, 1, 10), asm::vse(32, 1, 11)]);
    for i in 0..4 {
        ctx.poke(DATA_BASE + 4 * i, 4, 0x100 + i);
    }
    ctx.set_x(10, DATA_BASE);
    ctx.set_x(11, DATA_BASE + 0x40);

    assert_eq!(ctx.run(3), 3);
    assert_eq!(elements(&ctx, 1, 32, 4), vec![0x100, 0x101, 0x102, 0x103]);
    for i in 0..4 {
        assert_eq!(ctx.peek(DATA_BASE + 0x40 + 4 * i, 4), 0x100 + i);
    }
    assert_eq!(ctx.cpu.vu.vstart, 0);
}

#[test]
fn strided_load() {
    let mut ctx = configured(3, E32_M1, &[asm::vlse(32, 2, 10, 11)]);
    for i in 0..3 {
        ctx.poke(DATA_BASE + 12 * i, 4, 7 * (i + 1));
    }
    ctx.set_x(10, DATA_BASE);
    ctx.set_x(11, 12);

    assert_eq!(ctx.run(2), 2);
    assert_eq!(elements(&ctx, 2, 32, 3), vec![7, 14, 21]);
}

#[test]
fn indexed_load_uses_the_index_group() {
    let mut ctx = configured(4, E32_M1, &[asm::vluxei(32, 2, 10, 8)]);
    for i in 0..4 {
        ctx.poke(DATA_BASE + 4 * i, 4, 0xa0 + i);
    }
    fill(&mut ctx, 8, 32, &[12, 0, 4, 8]);
    ctx.set_x(10, DATA_BASE);

    assert_eq!(ctx.run(2), 2);
    assert_eq!(elements(&ctx, 2, 32, 4), vec![0xa3, 0xa0, 0xa1, 0xa2]);
}

#[test]
fn segment_load_deinterleaves_fields() {
    let mut ctx = configured(4, E32_M1, &[asm::vlseg(3, 32, 4, 10)]);
    for i in 0..12 {
        ctx.poke(DATA_BASE + 4 * i, 4, i);
    }
    ctx.set_x(10, DATA_BASE);

    assert_eq!(ctx.run(2), 2);
    assert_eq!(elements(&ctx, 4, 32, 4), vec![0, 3, 6, 9]);
    assert_eq!(elements(&ctx, 5, 32, 4), vec![1, 4, 7, 10]);
    assert_eq!(elements(&ctx, 6, 32, 4), vec![2, 5, 8, 11]);
}

#[rstest]
#[case::segment_past_v31(asm::vlseg(3, 32, 30, 10))]
#[case::lumop_nonzero(asm::vmem(0x07, 1, 0, true, 8, 10, 32, 1))]
#[case::scalar_fp_width(asm::i_type(0x07, 1, 2, 10, 0))]
fn malformed_vector_memory_is_illegal(#[case] word: u32) {
    let mut ctx = configured(4, E32_M1, &[word]);
    ctx.set_x(10, DATA_BASE);

    assert_eq!(ctx.run(2), 1);
    assert_eq!(ctx.cpu.csrs.mcause, exception::ILLEGAL_INSTRUCTION);
}

#[test]
fn vector_instructions_need_a_legal_vtype() {
    let mut ctx = TestContext::new().with_program(&[asm::vadd_vv(3, 1, 2)]);

    assert_eq!(ctx.run(1), 0);
    assert_eq!(ctx.cpu.csrs.mcause, exception::ILLEGAL_INSTRUCTION);
}

#[test]
fn vadd_vv_over_a_register_group() {
    let mut ctx = configured(8, asm::vtype(32, 1), &[asm::vadd_vv(2, 4, 6)]);
    fill(&mut ctx, 4, 32, &[1, 2, 3, 4, 5, 6, 7, 8]);
    fill(&mut ctx, 6, 32, &[10, 20, 30, 40, 50, 60, 70, 80]);

    assert_eq!(ctx.run(2), 2);
    assert_eq!(elements(&ctx, 2, 32, 8), vec![11, 22, 33, 44, 55, 66, 77, 88]);

    let line = &ctx.commit_lines()[1];
    assert!(line.contains(" e32 m2 l8 v2  0x"), "{line}");
    assert!(line.contains(" v3  0x"), "{line}");
}

#[test]
fn misaligned_destination_group_is_illegal() {
    let mut ctx = configured(8, asm::vtype(32, 1), &[asm::vadd_vv(3, 4, 6)]);

    assert_eq!(ctx.run(2), 1);
    assert_eq!(ctx.cpu.csrs.mcause, exception::ILLEGAL_INSTRUCTION);
}

#[test]
fn masked_add_skips_inactive_elements() {
    let mut ctx = configured(4, E32_M1, &[asm::vadd_vv_masked(3, 1, 2)]);
    ctx.cpu.vu.set_elt(0, 0, 8, 0b0101);
    fill(&mut ctx, 1, 32, &[1, 2, 3, 4]);
    fill(&mut ctx, 2, 32, &[10, 20, 30, 40]);
    fill(&mut ctx, 3, 32, &[7, 7, 7, 7]);

    assert_eq!(ctx.run(2), 2);
    assert_eq!(elements(&ctx, 3, 32, 4), vec![11, 7, 33, 7]);
}

#[test]
fn masked_write_to_v0_is_illegal() {
    let mut ctx = configured(4, E32_M1, &[asm::vadd_vv_masked(0, 1, 2)]);

    assert_eq!(ctx.run(2), 1);
    assert_eq!(ctx.cpu.csrs.mcause, exception::ILLEGAL_INSTRUCTION);
}

#[test]
fn scalar_and_immediate_operands_wrap_at_sew() {
    let mut ctx = configured(
        4,
        asm::vtype(8, 0),
        &[asm::vadd_vx(2, 1, 10), asm::vadd_vi(3, 1, -2), asm::vmv_v_x(4, 11)],
    );
    fill(&mut ctx, 1, 8, &[1, 2, 0xff, 0x80]);
    ctx.set_x(10, 0x1_0001);
    ctx.set_x(11, 0x1234);

    assert_eq!(ctx.run(4), 4);
    assert_eq!(elements(&ctx, 2, 8, 4), vec![2, 3, 0, 0x81]);
    assert_eq!(elements(&ctx, 3, 8, 4), vec![0xff, 0, 0xfd, 0x7e]);
    assert_eq!(elements(&ctx, 4, 8, 4), vec![0x34; 4]);
}

#[rstest]
#[case::rnu_up(10, RoundingMode::Rnu, 3)]
#[case::rne_tie_to_even(10, RoundingMode::Rne, 2)]
#[case::rdn_truncates(10, RoundingMode::Rdn, 2)]
#[case::rod_jams(10, RoundingMode::Rod, 3)]
#[case::rnu_tie(6, RoundingMode::Rnu, 2)]
#[case::rne_tie_odd(6, RoundingMode::Rne, 2)]
#[case::rdn_tie(6, RoundingMode::Rdn, 1)]
#[case::rod_tie(6, RoundingMode::Rod, 1)]
fn vssrl_rounds_by_vxrm(#[case] value: u64, #[case] vxrm: RoundingMode, #[case] expected: u64) {
    let mut ctx = configured(1, asm::vtype(8, 0), &[asm::vssrl_vv(3, 1, 2)]);
    ctx.cpu.vu.vxrm = vxrm;
    fill(&mut ctx, 1, 8, &[value]);
    fill(&mut ctx, 2, 8, &[2]);

    assert_eq!(ctx.run(2), 2);
    assert_eq!(ctx.cpu.vu.elt(3, 0, 8), expected);
    assert_eq!(ctx.cpu.csrs.hpm(10), 1);
}

#[test]
fn vssrl_uses_only_log2_sew_shift_bits() {
    let mut ctx = configured(1, asm::vtype(8, 0), &[asm::vssrl_vv(3, 1, 2)]);
    ctx.cpu.vu.vxrm = RoundingMode::Rdn;
    fill(&mut ctx, 1, 8, &[0x80]);
    fill(&mut ctx, 2, 8, &[0x0b]);

    assert_eq!(ctx.run(2), 2);
    assert_eq!(ctx.cpu.vu.elt(3, 0, 8), 0x10);
}
