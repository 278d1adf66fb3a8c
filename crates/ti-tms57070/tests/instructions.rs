//! Instruction-level tests driving hand-assembled programs through the
//! step loop.
//!
//! Word layout reminders for the encodings used here:
//! - primary opcode in bits 31..24, flag8/flag4 in bits 23/22
//! - secondary opcode in bits 21..16, flag8/flag4 in bits 15/14
//! - addressing mode in bits 13..12, operand fields below

use ti_tms57070::{Fault, I24, Tms57070, U12};

/// Plain NOP: primary 0x00, secondary 0x00, mode 3 with idle nibbles.
const NOP: u32 = 0x0000_3000;

fn dsp_with(program: &[u32]) -> Tms57070 {
    let mut dsp = Tms57070::new();
    dsp.load_pmem(program);
    dsp
}

fn run(dsp: &mut Tms57070, steps: usize) {
    for _ in 0..steps {
        dsp.step().expect("program should not fault");
    }
}

// ===========================================================================
// Immediate loads and the ALU
// ===========================================================================

#[test]
fn load_acc1_immediate() {
    let mut dsp = dsp_with(&[0xCA12_3456]);
    run(&mut dsp, 1);

    assert_eq!(dsp.acc1.get(), 0x12_3456);
    assert!(!dsp.cr1().accz());
    assert!(!dsp.cr1().accn());
    assert_eq!(dsp.pc(), 1);
}

#[test]
fn load_acc2_immediate_sign_extends() {
    let mut dsp = dsp_with(&[0xCBFF_FFFF]);
    run(&mut dsp, 1);

    assert_eq!(dsp.acc2.get(), -1);
    assert!(dsp.cr1().accn());
    assert!(!dsp.cr1().accz());
}

#[test]
fn add_saturates_when_aovm_set() {
    // ADD DMEM[0] + ACC1 → ACC1, DMEM direct mode.
    let mut dsp = dsp_with(&[0x2000_1000]);
    dsp.set_cr1(1 << 8); // AOVM
    dsp.acc1 = I24::new(0x7F_FFFF);
    dsp.dmem[0] = I24::new(1);
    run(&mut dsp, 1);

    assert_eq!(dsp.acc1.get(), 0x7F_FFFF, "clamped at positive full scale");
    assert!(dsp.cr1().aov());
    assert!(dsp.cr1().aovl());
    assert!(!dsp.cr1().accn());
    assert!(!dsp.cr1().accz());
}

#[test]
fn add_wraps_when_aovm_clear() {
    let mut dsp = dsp_with(&[0x2000_1000]);
    dsp.acc1 = I24::new(0x7F_FFFF);
    dsp.dmem[0] = I24::new(1);
    run(&mut dsp, 1);

    assert_eq!(dsp.acc1.get(), -0x80_0000, "truncated, not clamped");
    assert!(dsp.cr1().aov());
    assert!(dsp.cr1().accn());
}

#[test]
fn subtract_from_cmem_source() {
    // SUB CMEM[2] − ACC2 → ACC2: src code 2, flag8 (ACC2 rhs), flag4 (dst).
    let mut dsp = dsp_with(&[0x26C0_2002]);
    dsp.acc2 = I24::new(30);
    dsp.cmem[2] = I24::new(100);
    run(&mut dsp, 1);

    assert_eq!(dsp.acc2.get(), 70);
}

#[test]
fn logic_ops_use_bit_patterns() {
    // AND, OR, XOR of DMEM[0] with ACC1.
    for (opcode, expected) in [
        (0x28u32, 0xF0_F000 & 0x0F_F00F),
        (0x2C, 0xF0_F000 | 0x0F_F00F),
        (0x30, 0xF0_F000 ^ 0x0F_F00F),
    ] {
        let mut dsp = dsp_with(&[opcode << 24 | 0x1000]);
        dsp.dmem[0] = I24::from_bits(0xF0_F000);
        dsp.acc1 = I24::from_bits(0x0F_F00F);
        run(&mut dsp, 1);
        assert_eq!(dsp.acc1.raw(), expected, "opcode {opcode:02X}");
    }
}

#[test]
fn compare_sets_flags_without_writing() {
    // CMP DMEM[0] − ACC1 with equal operands.
    let mut dsp = dsp_with(&[0x3400_1000]);
    dsp.acc1 = I24::new(5);
    dsp.acc2 = I24::new(77);
    dsp.dmem[0] = I24::new(5);
    run(&mut dsp, 1);

    assert!(dsp.cr1().accz());
    assert_eq!(dsp.acc1.get(), 5, "compare must not store");
    assert_eq!(dsp.acc2.get(), 77);
}

#[test]
fn load_absolute_value() {
    // Load ACC1 with |DMEM[0]|, src code 0.
    let mut dsp = dsp_with(&[0x0400_1000]);
    dsp.dmem[0] = I24::new(-100);
    run(&mut dsp, 1);
    assert_eq!(dsp.acc1.get(), 100);
}

#[test]
fn load_negated_and_complemented() {
    let mut dsp = dsp_with(&[0x0800_1000, 0x0C40_1000]);
    dsp.dmem[0] = I24::new(100);
    run(&mut dsp, 2);
    assert_eq!(dsp.acc1.get(), -100, "two's complement load");
    assert_eq!(dsp.acc2.raw(), !100_u32 & 0xFF_FFFF, "one's complement load");
}

#[test]
fn load_with_increment_and_decrement() {
    let mut dsp = dsp_with(&[0x1400_1000, 0x1840_1000]);
    dsp.dmem[0] = I24::new(10);
    run(&mut dsp, 2);
    assert_eq!(dsp.acc1.get(), 11);
    assert_eq!(dsp.acc2.get(), 9);
}

#[test]
fn acc_to_acc_transfer() {
    // Load ACC1 from ACC2: src code 2 with flag8 set.
    let mut dsp = dsp_with(&[0x1280_3000]);
    dsp.acc2 = I24::new(0x42);
    run(&mut dsp, 1);
    assert_eq!(dsp.acc1.get(), 0x42);
}

#[test]
fn shift_acc_left_and_right() {
    // Shift ACC1 left (flag8), then right.
    let mut dsp = dsp_with(&[0x1C80_3000, 0x1C00_3000]);
    dsp.acc1 = I24::new(3);
    run(&mut dsp, 1);
    assert_eq!(dsp.acc1.get(), 6);
    run(&mut dsp, 1);
    assert_eq!(dsp.acc1.get(), 3);
}

#[test]
fn zero_accumulators() {
    // 0x1D zeroes the selected ACC, 0x1F both.
    let mut dsp = dsp_with(&[0x1D40_3000, 0x1F00_3000]);
    dsp.acc1 = I24::new(5);
    dsp.acc2 = I24::new(6);
    run(&mut dsp, 1);
    assert_eq!(dsp.acc2.get(), 0, "flag4 selects ACC2");
    assert_eq!(dsp.acc1.get(), 5);
    run(&mut dsp, 1);
    assert_eq!(dsp.acc1.get(), 0);
    assert!(dsp.cr1().accz());
}

#[test]
fn dmem_cmem_combine_ops() {
    // ACC := DMEM[1] + CMEM[2] and ACC2 := DMEM[1] − CMEM[2] (flag8).
    let mut dsp = dsp_with(&[0x3C00_1001, 0x3CC0_1001]);
    dsp.dmem[1] = I24::new(50);
    dsp.cmem[1] = I24::new(20); // note: both banks resolve their own field
    dsp.cmem[2] = I24::new(20);
    run(&mut dsp, 2);
    // Mode 1 is a DMEM immediate; CMEM mode 1 reads through CA (zero here),
    // so the coefficient operand comes from CMEM[COFF + CA.one] = CMEM[0].
    let c = dsp.cmem[0].get();
    assert_eq!(dsp.acc1.get(), 50 + c);
    assert_eq!(dsp.acc2.get(), 50 - c);
}

// ===========================================================================
// Secondary operations
// ===========================================================================

#[test]
fn secondary_store_acc_to_dmem() {
    // Primary NOP, secondary 0x01: ACC1 → DMEM[3].
    let mut dsp = dsp_with(&[0x0001_1003]);
    dsp.acc1 = I24::new(0x22_2222);
    run(&mut dsp, 1);
    assert_eq!(dsp.dmem[3].get(), 0x22_2222);
}

#[test]
fn secondary_store_acc2_to_cmem() {
    // flag4 = ACC2 source, flag8 = CMEM destination, direct mode 2.
    let mut dsp = dsp_with(&[0x0001_E00A]);
    dsp.acc2 = I24::new(-5);
    run(&mut dsp, 1);
    assert_eq!(dsp.cmem[0xA].get(), -5);
}

#[test]
fn secondary_runs_before_primary() {
    // Secondary stores the old ACC1 while the primary replaces it from ACC2.
    let mut dsp = dsp_with(&[0x1281_1004]);
    dsp.acc1 = I24::new(7);
    dsp.acc2 = I24::new(0x111);
    run(&mut dsp, 1);
    assert_eq!(dsp.dmem[4].get(), 7, "store sees the pre-load value");
    assert_eq!(dsp.acc1.get(), 0x111);
}

#[test]
fn addressing_pair_load_and_store_via_cmem() {
    // 0x06 args=2 loads CA from a CMEM word; 0x07 args=3 stores CIR back.
    let mut dsp = dsp_with(&[0x0006_A005, 0x0007_E006]);
    dsp.cmem[5] = I24::from_bits(0xABC_123);
    dsp.cir = ti_tms57070::AddrPair::from_word(0xDEF_456);
    run(&mut dsp, 2);
    assert_eq!(dsp.ca.one.get(), 0x123);
    assert_eq!(dsp.ca.two.get(), 0xABC);
    assert_eq!(dsp.cmem[6].raw(), 0xDEF_456);
}

#[test]
fn addressing_register_from_acc() {
    // 0x04: DA element two (flag8) ← ACC2 (flag4), truncated to 12 bits.
    let mut dsp = dsp_with(&[0x0004_C000]);
    dsp.acc2 = I24::new(0x12_3456);
    run(&mut dsp, 1);
    assert_eq!(dsp.da.two.get(), 0x456);
}

#[test]
fn dereference_cmem_word_into_addressing_registers() {
    // 0x08: CMEM word → DA.one, then → DIR.two (flag4+flag8);
    // 0x09: CMEM word → CA.one. 0x0A saves DA.one back out.
    let mut dsp = dsp_with(&[0x0008_2004, 0x0008_E004, 0x0009_2004, 0x000A_2006]);
    dsp.cmem[4] = I24::from_bits(0xAB_C123);
    run(&mut dsp, 3);
    assert_eq!(dsp.da.one.get(), 0x123, "low 12 bits of the word");
    assert_eq!(dsp.dir.two.get(), 0x123);
    assert_eq!(dsp.ca.one.get(), 0x123);
    run(&mut dsp, 1);
    assert_eq!(dsp.cmem[6].get(), 0x123);
}

#[test]
fn transfer_register_roundtrip() {
    // T ← DMEM[5]; DMEM[6] ← T; GMEM[GOFF] ← T.
    let mut dsp = dsp_with(&[0x0020_1005, 0x0020_5006, 0x0020_9000]);
    dsp.dmem[5] = I24::new(0x31_4159);
    dsp.goff = U12::new(3);
    run(&mut dsp, 3);
    assert_eq!(dsp.t.get(), 0x31_4159);
    assert_eq!(dsp.dmem[6].get(), 0x31_4159);
    assert_eq!(dsp.gmem[3].get(), 0x31_4159);
}

#[test]
fn delay_line_offsets_step() {
    // 0x21 args=0: DOFF down one, GOFF up one.
    let mut dsp = dsp_with(&[0x0021_0000]);
    dsp.doff = U12::new(10);
    dsp.goff = U12::new(20);
    run(&mut dsp, 1);
    assert_eq!(dsp.doff.get(), 9);
    assert_eq!(dsp.goff.get(), 21);
}

#[test]
fn circular_rotate_moves_last_to_front() {
    // 0x27 on DMEM: DMEM[DOFF] ← DMEM[DCIRC], DOFF -= 1.
    let mut dsp = dsp_with(&[0x0027_0000]);
    dsp.doff = U12::new(4);
    dsp.dcirc = U12::new(9);
    dsp.dmem[9] = I24::new(0x66);
    dsp.xoff = 100;
    run(&mut dsp, 1);
    assert_eq!(dsp.dmem[4].get(), 0x66);
    assert_eq!(dsp.doff.get(), 3);
    assert_eq!(dsp.xoff, 99, "external offset tracks the rotation");
}

#[test]
fn control_register_transfer_through_cmem() {
    // 0x22 args=3 loads CR3 from CMEM; 0x23 args=1 stores CR1.
    let mut dsp = dsp_with(&[0x0022_E007, 0x0023_6008]);
    dsp.cmem[7] = I24::from_bits(2 << 17); // XBUS = 2
    run(&mut dsp, 1);
    assert_eq!(dsp.cr3.xbus(), 2);
    run(&mut dsp, 1);
    assert_eq!(dsp.cmem[8].raw(), dsp.cr1().value());
}

#[test]
fn mode_setters_update_mac_conditioning() {
    // 0x29 args=1 sets MOSM; a MAC read-out then shifts by +2.
    let mut dsp = dsp_with(&[0x0029_4000, NOP, NOP]);
    dsp.set_macc1_raw(0x10_0000_0000);
    run(&mut dsp, 3);
    assert_eq!(dsp.cr1().mosm(), 1);
    assert_eq!(dsp.macc1_delayed_upper(), (0x10_0000_0000_i64 << 2 >> 24) as i32);
}

#[test]
fn overflow_latch_clears_only_explicitly() {
    // Overflow an add, confirm AOVL sticks through another op, then clear
    // it with secondary 0x2C (flag8, flag4 clear = ALU latches).
    let mut dsp = dsp_with(&[0x2000_1000, 0x2000_1001, 0x002C_8000]);
    dsp.acc1 = I24::new(0x7F_FFFF);
    dsp.dmem[0] = I24::new(1);
    dsp.dmem[1] = I24::new(0);
    run(&mut dsp, 1);
    assert!(dsp.cr1().aovl());
    run(&mut dsp, 1);
    assert!(!dsp.cr1().aov(), "AOV tracks the latest result");
    assert!(dsp.cr1().aovl(), "AOVL latches");
    run(&mut dsp, 1);
    assert!(!dsp.cr1().aovl(), "explicit clear");
}

// ===========================================================================
// MAC unit through the instruction set
// ===========================================================================

#[test]
fn multiply_signed_cmem_by_acc() {
    // 0x40: MACC1 := CMEM[0] × ACC1, both near +0.5.
    let mut dsp = dsp_with(&[0x4000_2000, NOP, NOP]);
    dsp.cmem[0] = I24::new(0x3F_FFFF);
    dsp.acc1 = I24::new(0x3F_FFFF);
    run(&mut dsp, 2);

    assert_eq!(dsp.macc1_raw(), (0x3F_FFFF_i64 * 0x3F_FFFF) << 1);
    assert_eq!(dsp.macc1_delayed_upper(), 0x1F_FFFF);
}

#[test]
fn multiply_negated_into_second_unit() {
    // 0x41 with flag4 (MACC2) and flag8 (negate): CMEM × DMEM.
    let mut dsp = dsp_with(&[0x41C0_2003]);
    dsp.cmem[3] = I24::new(0x10_0000);
    dsp.dmem[0] = I24::new(4); // DMEM mode-2 address comes from DA = 0
    run(&mut dsp, 1);
    assert_eq!(dsp.macc2_raw(), -((0x10_0000_i64 * 4) << 1));
}

#[test]
fn mac_accumulates_prior_value() {
    // Two 0x50 ops in a row: second adds onto the first product.
    let mut dsp = dsp_with(&[0x5000_2000, 0x5000_2000]);
    dsp.cmem[0] = I24::new(0x10_0000);
    dsp.acc1 = I24::new(2);
    run(&mut dsp, 2);
    let product = (0x10_0000_i64 * 2) << 1;
    assert_eq!(dsp.macc1_raw(), product * 2);
}

#[test]
fn mac_row_0x60_downshifts_when_masm_neutral() {
    // 0x60: DMEM × ACC accumulate with the whole-word down-shift first.
    let mut dsp = dsp_with(&[0x6000_1000]);
    dsp.set_macc1_raw(0x5A_0000_0000);
    dsp.dmem[0] = I24::new(0);
    dsp.acc1 = I24::new(0);
    run(&mut dsp, 1);
    assert_eq!(dsp.macc1_raw(), 0x5A, "prior value dropped by 24 bits");
}

#[test]
fn mac_shift_and_clear() {
    // 0x72 shifts left (flag8); 0x73 clears MACC2 (flag4); 0x74 both.
    let mut dsp = dsp_with(&[0x7280_3000, 0x7340_3000, 0x7400_3000]);
    dsp.set_macc1_raw(4);
    dsp.set_macc2_raw(9);
    run(&mut dsp, 1);
    assert_eq!(dsp.macc1_raw(), 8);
    run(&mut dsp, 1);
    assert_eq!(dsp.macc2_raw(), 0);
    assert_eq!(dsp.macc1_raw(), 8);
    run(&mut dsp, 1);
    assert_eq!(dsp.macc1_raw(), 0);
}

#[test]
fn mac_load_upper_clears_lower() {
    // 0x78: MACC1 upper ← DMEM[0], lower cleared first.
    let mut dsp = dsp_with(&[0x7800_1000]);
    dsp.set_macc1_raw(0xAB_CDEF);
    dsp.dmem[0] = I24::new(0x12_3456);
    run(&mut dsp, 1);
    assert_eq!(dsp.macc1_raw(), 0x12_3456_i64 << 24);
}

#[test]
fn mac_load_lower_keeps_upper() {
    // 0x7B: MACC1 lower ← DMEM[0].
    let mut dsp = dsp_with(&[0x7800_1000, 0x7B00_1001]);
    dsp.dmem[0] = I24::new(0x12_3456);
    dsp.dmem[1] = I24::new(0x65_4321);
    run(&mut dsp, 2);
    assert_eq!(dsp.macc1_raw(), 0x12_3456_i64 << 24 | 0x65_4321);
}

#[test]
fn acc_pair_load_from_mac() {
    // 0x1E transfers the delayed MACC1 upper/lower into ACC1/ACC2.
    let mut dsp = dsp_with(&[NOP, NOP, 0x1E00_3000]);
    dsp.set_macc1_raw(0x12_3456_AB_CDEF_u64 as i64);
    run(&mut dsp, 3);
    assert_eq!(dsp.acc1.get(), 0x12_3456);
    assert_eq!(dsp.acc2.raw(), 0xAB_CDEF);
}

#[test]
fn mac_readout_is_two_cycles_delayed() {
    let mut dsp = dsp_with(&[NOP, NOP, NOP]);
    dsp.set_macc1_raw(0x77_i64 << 24);
    // The live value is not yet visible to the delayed rank.
    assert_eq!(dsp.macc1_delayed_upper(), 0);
    run(&mut dsp, 1);
    assert_eq!(dsp.macc1_delayed_upper(), 0, "one advance is not enough");
    run(&mut dsp, 1);
    assert_eq!(dsp.macc1_delayed_upper(), 0x77);
}

#[test]
fn normalize_shifts_mantissa_and_counts_exponent() {
    let mut dsp = dsp_with(&[0x3800_3000, 0x3800_3000]);
    dsp.set_macc1_raw(0x20_0000_i64 << 24); // upper = +0.25: one shift due
    run(&mut dsp, 1);
    assert_eq!(dsp.macc1_raw(), 0x40_0000_i64 << 24);
    assert_eq!(dsp.acc1.get(), -1);
    // Now at the normalization boundary: second application is a no-op.
    run(&mut dsp, 1);
    assert_eq!(dsp.macc1_raw(), 0x40_0000_i64 << 24);
    assert_eq!(dsp.acc1.get(), -1);
}

// ===========================================================================
// Class-2 dual issue
// ===========================================================================

#[test]
fn class2_pairs_mac_primary_with_secondary() {
    // Top byte 0x81 → secondary 0x01 (store ACC1 → DMEM); bits 21..16 =
    // 0x34 → translated primary 0x74 (clear both MACs).
    let mut dsp = dsp_with(&[0x8134_1007]);
    dsp.set_macc1_raw(123);
    dsp.set_macc2_raw(456);
    dsp.acc1 = I24::new(0x42);
    run(&mut dsp, 1);

    assert_eq!(dsp.macc1_raw(), 0);
    assert_eq!(dsp.macc2_raw(), 0);
    assert_eq!(dsp.dmem[7].get(), 0x42);
}

#[test]
fn class2_mac_flags_come_from_argument_bits() {
    // Translated primary 0x40 (CMEM × ACC multiply) with bit 14 set:
    // flag4 → MACC2, paired with ACC2.
    let mut dsp = dsp_with(&[0x8000_6000]);
    dsp.cmem[0] = I24::new(3);
    dsp.acc2 = I24::new(5);
    run(&mut dsp, 1);
    assert_eq!(dsp.macc2_raw(), (3 * 5) << 1);
    assert_eq!(dsp.macc1_raw(), 0);
}

// ===========================================================================
// Addressing and post-increments
// ===========================================================================

#[test]
fn indirect_load_with_post_increment() {
    // Load ACC1 from DMEM via DA.one (mode 2), then DA.one += 1.
    let mut dsp = dsp_with(&[0x1000_2200, 0x1000_2200]);
    dsp.da.one = U12::new(3);
    dsp.dmem[3] = I24::new(99);
    dsp.dmem[4] = I24::new(100);
    run(&mut dsp, 1);
    assert_eq!(dsp.acc1.get(), 99);
    assert_eq!(dsp.da.one.get(), 4);
    run(&mut dsp, 1);
    assert_eq!(dsp.acc1.get(), 100);
}

#[test]
fn post_increment_by_register() {
    // i nibble 0b1110: DA.two += DIR.two.
    let mut dsp = dsp_with(&[0x1000_2E00]);
    dsp.da.two = U12::new(0x20);
    dsp.dir.two = U12::new(0x10);
    run(&mut dsp, 1);
    assert_eq!(dsp.da.two.get(), 0x30);
}

#[test]
fn circular_offset_applies_to_dmem() {
    let mut dsp = dsp_with(&[0x1000_1005]);
    dsp.doff = U12::new(2);
    dsp.dmem[7] = I24::new(0x55);
    run(&mut dsp, 1);
    assert_eq!(dsp.acc1.get(), 0x55, "DOFF slides the resolved address");
}

#[test]
fn memory_round_trip_preserves_words() {
    for value in [0, 1, -1, 0x7F_FFFF, -0x80_0000, 0x12_3456] {
        let mut dsp = dsp_with(&[0x0001_1004]);
        dsp.acc1 = I24::new(value);
        run(&mut dsp, 1);
        assert_eq!(dsp.dmem[4].get(), value);
    }
}

// ===========================================================================
// Immediate loads through the write pipeline
// ===========================================================================

#[test]
fn addressing_register_load_is_two_cycles_delayed() {
    let mut dsp = dsp_with(&[0xC100_0005, NOP, NOP]);
    dsp.da.one = U12::new(9);

    run(&mut dsp, 1);
    assert_eq!(dsp.da.one.get(), 9, "write still pending");
    run(&mut dsp, 1);
    assert_eq!(dsp.da.one.get(), 9, "write in the delayed slot");
    run(&mut dsp, 1);
    assert_eq!(dsp.da.one.get(), 5, "write lands at the start of step 3");
}

#[test]
fn dual_pair_load_through_pipeline() {
    let mut dsp = dsp_with(&[0xC4AB_C123, NOP, NOP]);
    run(&mut dsp, 3);
    assert_eq!(dsp.ca.one.get(), 0x123);
    assert_eq!(dsp.ca.two.get(), 0xABC);
}

#[test]
fn single_element_selectors_cover_all_registers() {
    let mut dsp = dsp_with(&[
        0xC108_0001, // DA.two
        0xC110_0002, // DIR.one
        0xC138_0003, // CIR.two
        0xC120_0004, // CA.one
        NOP,
        NOP,
    ]);
    run(&mut dsp, 6);
    assert_eq!(dsp.da.two.get(), 1);
    assert_eq!(dsp.dir.one.get(), 2);
    assert_eq!(dsp.cir.two.get(), 3);
    assert_eq!(dsp.ca.one.get(), 4);
}

#[test]
fn offset_loads_are_not_pipelined() {
    // COFF/CCIRC and DOFF/DCIRC pack into one word each; XOFF is direct.
    let mut dsp = dsp_with(&[0xC7AB_C123, 0xC8DE_F456, 0xC912_3456]);
    run(&mut dsp, 1);
    assert_eq!(dsp.coff.get(), 0x123);
    assert_eq!(dsp.ccirc.get(), 0xABC);
    run(&mut dsp, 1);
    assert_eq!(dsp.doff.get(), 0x456);
    assert_eq!(dsp.dcirc.get(), 0xDEF);
    run(&mut dsp, 1);
    assert_eq!(dsp.xoff, 0x12_3456);
}

// ===========================================================================
// Repeat, jumps, calls
// ===========================================================================

#[test]
fn rptk_repeats_next_instruction() {
    // RPTK 3 then an ACC1 self-increment: runs once plus three repeats.
    let mut dsp = dsp_with(&[0xE003_0000, 0x1600_3000, NOP]);
    run(&mut dsp, 5);
    assert_eq!(dsp.acc1.get(), 4);
    assert_eq!(dsp.rptc(), 0);
    assert_eq!(dsp.pc(), 2);
}

#[test]
fn rptc_seeds_from_acc1() {
    let mut dsp = dsp_with(&[0xE200_0000, 0x1600_3000, NOP]);
    dsp.acc1 = I24::new(2);
    run(&mut dsp, 1);
    assert_eq!(dsp.rptc(), 2);
    // ACC1 increments 1 + 2 times on top of the seed value.
    run(&mut dsp, 3);
    assert_eq!(dsp.acc1.get(), 5);
}

#[test]
fn rptb_repeats_block_and_exits() {
    // Block of five NOPs at 1..=5, three repeats: one lead instruction
    // plus four passes.
    let mut dsp = dsp_with(&[0xE403_0005, NOP, NOP, NOP, NOP, NOP, NOP]);
    run(&mut dsp, 1 + 4 * 5);
    assert_eq!(dsp.pc(), 6);
    assert_eq!(dsp.rptc(), 0);
}

#[test]
fn rptb_of_single_instruction_is_ignored() {
    // End address equals the block start: hardware cannot loop one word.
    let mut dsp = dsp_with(&[0xE403_0001, NOP]);
    run(&mut dsp, 1);
    assert_eq!(dsp.rptc(), 0);
}

#[test]
fn unconditional_jump() {
    let mut dsp = dsp_with(&[0xF000_0009]);
    run(&mut dsp, 1);
    assert_eq!(dsp.pc(), 9);
}

#[test]
fn conditional_jump_on_accz() {
    // JZ taken when ACCZ, not taken otherwise.
    let mut dsp = dsp_with(&[0x1D00_3000, 0xF100_0009]);
    run(&mut dsp, 2);
    assert_eq!(dsp.pc(), 9, "ACCZ set by the zeroing load");

    let mut dsp = dsp_with(&[0xCA00_0001, 0xF100_0009]);
    run(&mut dsp, 2);
    assert_eq!(dsp.pc(), 2, "fall through when ACCZ clear");
}

#[test]
fn indirect_jump_through_acc1() {
    let mut dsp = dsp_with(&[0xF080_0000]);
    dsp.acc1 = I24::new(0x42);
    run(&mut dsp, 1);
    assert_eq!(dsp.pc(), 0x42);
}

#[test]
fn bio_jump_condition() {
    let mut dsp = dsp_with(&[0xF580_0007]);
    dsp.set_bio(true);
    run(&mut dsp, 1);
    assert_eq!(dsp.pc(), 7);

    let mut dsp = dsp_with(&[0xF580_0007]);
    run(&mut dsp, 1);
    assert_eq!(dsp.pc(), 1);
}

#[test]
fn call_and_return() {
    let mut dsp = dsp_with(&[0xF800_0005, NOP, NOP, NOP, NOP, 0xEC00_0000]);
    run(&mut dsp, 1);
    assert_eq!(dsp.pc(), 5);
    assert_eq!(dsp.sp(), 1);
    assert_eq!(dsp.stack_top(), Some(1));
    run(&mut dsp, 1);
    assert_eq!(dsp.pc(), 1);
    assert_eq!(dsp.sp(), 0);
}

#[test]
fn reti_restores_free_and_clears_repeat() {
    let mut dsp = dsp_with(&[0xF800_0002, NOP, 0xEE00_0000]);
    run(&mut dsp, 1);
    assert_eq!(dsp.pc(), 2);
    run(&mut dsp, 1);
    assert_eq!(dsp.pc(), 1);
    assert_eq!(dsp.sp(), 0);
    assert!(dsp.cr2.free());
    assert_eq!(dsp.rptc(), 0);
}

// ===========================================================================
// Interrupts
// ===========================================================================

#[test]
fn interrupt_dispatches_after_step() {
    let mut dsp = dsp_with(&[NOP, NOP]);
    dsp.cr2.set_value(1 << 17); // FREE, every source enabled
    dsp.sample_in(ti_tms57070::InputChannel::In1L, 0x69_6969);

    run(&mut dsp, 1);
    assert_eq!(dsp.pc(), 1, "ARI1 vectors to PC 1");
    assert_eq!(dsp.sp(), 1);
    assert_eq!(dsp.stack_top(), Some(1), "return address is the next word");
    assert!(!dsp.cr2.free());
    assert_eq!(dsp.cr2.flags(), 0, "serviced flag cleared");
    assert_eq!(dsp.ar1l.get(), 0x69_6969);
}

#[test]
fn disabled_interrupt_stays_pending() {
    let mut dsp = dsp_with(&[NOP, NOP]);
    dsp.cr2.set_value(1 << 17 | 0xFF << 8); // FREE but all sources masked
    dsp.sample_in(ti_tms57070::InputChannel::In2R, 1);

    run(&mut dsp, 1);
    assert_eq!(dsp.pc(), 1, "no dispatch");
    assert_ne!(dsp.cr2.flags(), 0, "flag still raised");
}

#[test]
fn lowest_flag_bit_wins() {
    use ti_tms57070::ExtInterrupt;
    let mut dsp = dsp_with(&[NOP, NOP]);
    dsp.cr2.set_value(1 << 17);
    dsp.ext_interrupt(ExtInterrupt::Int1); // flag bit 3 → vector 6
    dsp.ext_interrupt(ExtInterrupt::Int3); // flag bit 7 → vector 8

    run(&mut dsp, 1);
    assert_eq!(dsp.pc(), 6, "INT1 outranks INT3");
    assert_eq!(dsp.cr2.flags(), 1 << 7, "INT3 left pending");
}

#[test]
fn interrupt_blocked_until_free() {
    let mut dsp = dsp_with(&[NOP, NOP, NOP]);
    dsp.sample_in(ti_tms57070::InputChannel::In1L, 5);
    run(&mut dsp, 1);
    assert_eq!(dsp.pc(), 1, "FREE clear: no dispatch");
    dsp.cr2.set_free(true);
    run(&mut dsp, 1);
    assert_eq!(dsp.pc(), 1, "vectored from PC 2");
    assert_eq!(dsp.stack_top(), Some(2));
}

// ===========================================================================
// Faults
// ===========================================================================

#[test]
fn call_stack_overflow_is_fatal_and_latches() {
    let mut dsp = dsp_with(&[
        0xF800_0001,
        0xF800_0002,
        0xF800_0003,
        0xF800_0004,
        0xF800_0005,
    ]);
    run(&mut dsp, 4);
    let err = dsp.step().expect_err("fifth call overflows");
    assert_eq!(err, Fault::StackOverflow { pc: 4 });
    assert_eq!(dsp.fault(), Some(err));
    // The core stays frozen afterwards.
    assert_eq!(dsp.step().expect_err("still faulted"), err);
}

#[test]
fn return_with_empty_stack_is_fatal() {
    let mut dsp = dsp_with(&[0xEC00_0000]);
    let err = dsp.step().expect_err("underflow");
    assert_eq!(err, Fault::StackUnderflow { pc: 0 });
}

#[test]
fn unknown_opcode_strict_and_lenient() {
    let mut dsp = dsp_with(&[0xC000_0000]);
    let err = dsp.step().expect_err("strict mode faults");
    assert!(matches!(err, Fault::UnknownPrimary { opcode: 0xC0, .. }));

    let mut dsp = dsp_with(&[0xC000_0000, NOP]);
    dsp.set_strict_unknown(false);
    run(&mut dsp, 2);
    assert_eq!(dsp.unknown_count(), 1);
    assert_eq!(dsp.last_unknown(), 0xC000_0000);
}
