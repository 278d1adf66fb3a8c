//! Instruction execution: primary, secondary, and class-2 dispatch.
//!
//! The top byte of the 32-bit word classifies it:
//!
//! - `>= 0xC0`: primary-only (immediate loads, repeat, flow control).
//! - `0x80..0xC0`: class-2 dual issue. The secondary slot fields carry a
//!   MAC primary (opcode `0x40 + bits 21..16`, flags from bits 15/14) and
//!   the top byte carries the secondary with its argument bits cleared.
//! - `< 0x80`: class-1 dual issue. Secondary from bits 21..14, primary
//!   from the top byte, shared addressing field in bits 13..0.
//!
//! # Primary map
//!
//! | Range | Operation |
//! |-------|-----------|
//! | 00–03 | NOP |
//! | 04–07 | load ACC, absolute value |
//! | 08–0B | load ACC, negated |
//! | 0C–0F | load ACC, complemented |
//! | 10–13 | load ACC |
//! | 14–17 | load ACC + 1 |
//! | 18–1B | load ACC − 1 |
//! | 1C–1F | ACC shift / zero / MAC pair transfer |
//! | 20–37 | ADD SUB AND OR XOR CMP |
//! | 38–3E | normalize, external access, DMEM·CMEM ops |
//! | 40–7D | MAC unit (see `exec_mac_op`) |
//! | C1–CF | immediate register loads |
//! | E0–E4 | repeat control |
//! | EC/EE | RET / RETI |
//! | F0–FF | conditional jumps and calls |

use crate::cpu::{Fault, OutputChannel, Tms57070};
use crate::mac::{Mac, Signs};
use crate::pipeline::PairReg;
use crate::registers::AddrPair;
use crate::word::{I24, INT24_MAX, INT24_MIN, U9, U12, U24};

/// Two-operand ALU operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AluOp {
    Add,
    Sub,
    And,
    Or,
    Xor,
    /// Subtract for flags only; the destination is left alone.
    Cmp,
}

impl Tms57070 {
    // =====================================================================
    // ALU and load path
    // =====================================================================

    /// Condition an ALU result: overflow flags, optional saturation, and
    /// the zero/negative flags of the stored value.
    fn process_acc(&mut self, value: i32) -> I24 {
        let overflow = !(INT24_MIN..=INT24_MAX).contains(&value);
        self.cr1.set_aov(overflow);
        if overflow {
            self.cr1.set_aovl(true);
        }
        let stored = if overflow && self.cr1.aovm() {
            if value > INT24_MAX { I24::MAX } else { I24::MIN }
        } else {
            I24::new(value)
        };
        self.cr1.set_accz(stored.get() == 0);
        self.cr1.set_accn(stored.is_negative());
        stored
    }

    /// Condition a result and store it in the destination accumulator
    /// (ACC2 when flag 4 is set).
    fn write_acc(&mut self, value: i32) {
        let stored = self.process_acc(value);
        if self.opcode1_flag4 {
            self.acc2 = stored;
        } else {
            self.acc1 = stored;
        }
    }

    /// Fetch the single operand of a load-class primary. Source code in
    /// the low two opcode bits: DMEM, CMEM, an accumulator, or a MAC
    /// upper word (flag 8 picks the second register of the family).
    fn load_source(&mut self) -> I24 {
        match self.opcode1 & 3 {
            0 => self.dmem[self.dmem_address()],
            1 => self.cmem[self.cmem_address()],
            2 => {
                if self.opcode1_flag8 {
                    self.acc2
                } else {
                    self.acc1
                }
            }
            _ => self.mac_upper(self.opcode1_flag8),
        }
    }

    /// Two-operand arithmetic. The source code picks the memory operand
    /// (DMEM or CMEM) on the left and an accumulator or MAC upper word on
    /// the right; compare discards the result after flagging.
    fn arith(&mut self, op: AluOp) {
        let src = self.opcode1 & 3;
        let lhs = match src {
            0 | 1 => self.dmem[self.dmem_address()],
            _ => self.cmem[self.cmem_address()],
        };
        let rhs = match src {
            0 | 2 => {
                if self.opcode1_flag8 {
                    self.acc2
                } else {
                    self.acc1
                }
            }
            _ => self.mac_upper(self.opcode1_flag8),
        };

        let value = match op {
            AluOp::Add => lhs.get() + rhs.get(),
            AluOp::Sub | AluOp::Cmp => lhs.get() - rhs.get(),
            AluOp::And => I24::from_bits(lhs.raw() & rhs.raw()).get(),
            AluOp::Or => I24::from_bits(lhs.raw() | rhs.raw()).get(),
            AluOp::Xor => I24::from_bits(lhs.raw() ^ rhs.raw()).get(),
        };

        if op == AluOp::Cmp {
            self.process_acc(value);
        } else {
            self.write_acc(value);
        }
    }

    // =====================================================================
    // Primary dispatch
    // =====================================================================

    pub(crate) fn exec_primary(&mut self) -> Result<(), Fault> {
        match self.opcode1 {
            0x00..=0x03 | 0x3A | 0x3B | 0x3F => {} // NOP

            0x04..=0x07 => {
                let v = self.load_source().get();
                let value = if v < 0 { -v } else { v };
                self.write_acc(value);
            }
            0x08..=0x0B => {
                let v = self.load_source().get();
                self.write_acc(-v);
            }
            0x0C..=0x0F => {
                let v = self.load_source();
                self.write_acc(I24::from_bits(!v.raw()).get());
            }
            0x10..=0x13 => {
                let v = self.load_source().get();
                self.write_acc(v);
            }
            0x14..=0x17 => {
                let v = self.load_source().get();
                self.write_acc(v + 1);
            }
            0x18..=0x1B => {
                let v = self.load_source().get();
                self.write_acc(v - 1);
            }

            0x1C => {
                let acc = if self.opcode1_flag4 {
                    self.acc2
                } else {
                    self.acc1
                };
                let value = if self.opcode1_flag8 {
                    acc.get() << 1
                } else {
                    acc.get() >> 1
                };
                self.write_acc(value);
            }
            0x1D => self.write_acc(0),
            0x1E => {
                // ACC pair takes the selected MAC's upper and lower words.
                let second = self.opcode1_flag8;
                let upper = self.mac_upper(second);
                let lower = self.mac_lower(second);
                self.acc1 = upper;
                self.acc2 = I24::from_bits(lower.get());
            }
            0x1F => {
                let zero = self.process_acc(0);
                self.acc1 = zero;
                self.acc2 = zero;
            }

            0x20..=0x23 => self.arith(AluOp::Add),
            0x24..=0x27 => self.arith(AluOp::Sub),
            0x28..=0x2B => self.arith(AluOp::And),
            0x2C..=0x2F => self.arith(AluOp::Or),
            0x30..=0x33 => self.arith(AluOp::Xor),
            0x34..=0x37 => self.arith(AluOp::Cmp),

            0x38 => self.exec_normalize(),
            0x39 => {
                let addr = self.xmem_address() as usize;
                if self.opcode1_flag4 {
                    self.xmem[addr] = if self.opcode1_flag8 {
                        self.acc2
                    } else {
                        self.acc1
                    };
                } else {
                    self.xmem_read_addr = addr as u32;
                    self.xmem_read_cycles = self.xmem_read_latency();
                }
            }

            0x3C => {
                let d = self.dmem[self.dmem_address()].get();
                let c = self.cmem[self.cmem_address()].get();
                let value = if self.opcode1_flag8 { d - c } else { d + c };
                self.write_acc(value);
            }
            0x3D => {
                let d = self.dmem[self.dmem_address()].raw();
                let c = self.cmem[self.cmem_address()].raw();
                let bits = if self.opcode1_flag8 { d | c } else { d & c };
                self.write_acc(I24::from_bits(bits).get());
            }
            0x3E => {
                let d = self.dmem[self.dmem_address()].raw();
                let c = self.cmem[self.cmem_address()].raw();
                self.write_acc(I24::from_bits(d ^ c).get());
            }

            0x40..=0x7F => return self.exec_mac_op(),

            0xC1 => return self.exec_load_single(),
            0xC2 => {
                let pair = AddrPair::from_word(self.insn & 0xFF_FFFF);
                self.addr_pipe.stage_dual(PairReg::Da, pair);
            }
            0xC3 => {
                let pair = AddrPair::from_word(self.insn & 0xFF_FFFF);
                self.addr_pipe.stage_dual(PairReg::Dir, pair);
            }
            0xC4 => {
                let pair = AddrPair::from_word(self.insn & 0xFF_FFFF);
                self.addr_pipe.stage_dual(PairReg::Ca, pair);
            }
            0xC5 => {
                let pair = AddrPair::from_word(self.insn & 0xFF_FFFF);
                self.addr_pipe.stage_dual(PairReg::Cir, pair);
            }
            0xC6 => {
                // Address-extension variant of the single CA load.
                let two = self.insn & 0x0008_0000 != 0;
                self.addr_pipe
                    .stage_single(PairReg::Ca, two, U12::new(self.insn as u16));
            }

            0xC7 => {
                self.coff = U12::new(self.insn as u16);
                self.ccirc = U12::new((self.insn >> 12) as u16);
            }
            0xC8 => {
                self.doff = U12::new(self.insn as u16);
                self.dcirc = U12::new((self.insn >> 12) as u16);
            }
            0xC9 => self.xoff = self.insn & 0xFF_FFFF,

            0xCA => {
                let value = I24::from_bits(self.insn).get();
                self.acc1 = self.process_acc(value);
            }
            0xCB => {
                let value = I24::from_bits(self.insn).get();
                self.acc2 = self.process_acc(value);
            }
            0xCC => self.cr0.set_value(self.insn),
            0xCD => {
                self.cr1.set_value(self.insn);
                self.update_mac_modes();
            }
            0xCE => self.cr2.load(self.insn),
            0xCF => self.cr3.set_value(self.insn),

            0xE0 => {
                self.rptc = (self.insn >> 16) as u8;
                self.rep_start_pc = self.pc;
                self.rep_end_pc = self.pc;
            }
            0xE2 => {
                self.rptc = self.acc1.raw() as u8;
                self.rep_start_pc = self.pc;
                self.rep_end_pc = self.pc;
            }
            0xE3 => {
                self.rptc = self.acc2.raw() as u8;
                self.rep_start_pc = self.pc;
                self.rep_end_pc = self.pc;
            }
            0xE4 => {
                self.rptc = (self.insn >> 16) as u8;
                self.rep_start_pc = self.pc;
                self.rep_end_pc = U9::new(self.insn as u16);
                if self.rep_end_pc == self.rep_start_pc {
                    // A block of one instruction cannot repeat.
                    self.rptc = 0;
                }
            }

            0xEC => return self.pop_pc(),
            0xEE => {
                self.pop_pc()?;
                self.cr2.set_free(true);
                self.rptc = 0;
            }

            0xF0..=0xF7 => return self.exec_jump(false),
            0xF8..=0xFF => return self.exec_jump(true),

            opcode => {
                return self.unknown(Fault::UnknownPrimary {
                    opcode,
                    insn: self.insn,
                    pc: self.insn_pc.get(),
                });
            }
        }
        Ok(())
    }

    /// Float normalization helper: while the MAC mantissa is inside
    /// (−0.5, 0.5), one application shifts it up a bit and decrements the
    /// exponent counter in the same-numbered accumulator.
    fn exec_normalize(&mut self) {
        let raw = if self.opcode1_flag4 {
            self.macc2.raw()
        } else {
            self.macc1.raw()
        };
        let upper = (raw >> 24) as i32;
        if (-0x40_0000..0x40_0000).contains(&upper) {
            if self.opcode1_flag4 {
                self.macc2.shift(1);
                self.acc2 = self.acc2.wrapping_sub(1);
            } else {
                self.macc1.shift(1);
                self.acc1 = self.acc1.wrapping_sub(1);
            }
        }
    }

    /// Immediate load of a single addressing register element through the
    /// write pipeline. The selector byte walks DA/DIR/CA/CIR in element
    /// pairs; the two trailing rows are the address-extension loads.
    fn exec_load_single(&mut self) -> Result<(), Fault> {
        let selector = ((self.insn >> 16) & 0xFF) as u8;
        let value = U12::new(self.insn as u16);
        let (reg, two) = match selector {
            0x00 => (PairReg::Da, false),
            0x08 => (PairReg::Da, true),
            0x10 => (PairReg::Dir, false),
            0x18 => (PairReg::Dir, true),
            0x20 => (PairReg::Ca, false),
            0x28 => (PairReg::Ca, true),
            0x30 => (PairReg::Cir, false),
            0x38 => (PairReg::Cir, true),
            0x40 => (PairReg::Ca, false),
            0x48 => (PairReg::Ca, true),
            _ => {
                return self.unknown(Fault::UnknownRegisterLoad {
                    selector,
                    insn: self.insn,
                    pc: self.insn_pc.get(),
                });
            }
        };
        self.addr_pipe.stage_single(reg, two, value);
        Ok(())
    }

    // =====================================================================
    // MAC dispatch
    // =====================================================================

    /// The MAC encoding matrix. Flag 4 picks the unit, flag 8 negates the
    /// product. Multiply and accumulate rows step through the sign matrix
    /// SS/US/SU/UU; the low opcode bit picks the operand pairing.
    fn exec_mac_op(&mut self) -> Result<(), Fault> {
        let op = self.opcode1;
        let second = self.opcode1_flag4;
        let negate = self.opcode1_flag8;

        match op {
            // Multiply (0x40..0x4D) and multiply-accumulate (0x50..0x5D):
            // rows of four, even = CMEM × ACC, odd = CMEM × DMEM.
            0x40..=0x5F => {
                let sub = op & 0x0F;
                if sub & 2 != 0 {
                    return self.unknown(Fault::UnknownPrimary {
                        opcode: op,
                        insn: self.insn,
                        pc: self.insn_pc.get(),
                    });
                }
                let signs = Self::sign_row(sub >> 2);
                let lhs = self.cmem[self.cmem_address()];
                let rhs = if sub & 1 != 0 {
                    self.dmem[self.dmem_address()]
                } else {
                    self.mac_acc_operand(second)
                };
                let overflow = if op < 0x50 {
                    self.mac_unit_mut(second).multiply(lhs, rhs, signs, negate)
                } else {
                    self.mac_unit_mut(second).mac(lhs, rhs, signs, negate)
                };
                self.flag_mac_result(overflow);
            }

            // Accumulate rows with the implicit down-shift: when the
            // accumulation shifter is neutral, the prior value drops by a
            // whole word first. Even = DMEM × ACC, odd = CMEM × DMEM.
            0x60..=0x67 => {
                let sub = op & 7;
                let signs = Self::sign_row(sub >> 1);
                let lhs = if sub & 1 != 0 {
                    self.cmem[self.cmem_address()]
                } else {
                    self.dmem[self.dmem_address()]
                };
                let rhs = if sub & 1 != 0 {
                    self.dmem[self.dmem_address()]
                } else {
                    self.mac_acc_operand(second)
                };
                if self.cr1.masm() == 0 {
                    self.mac_unit_mut(second).shift(-24);
                }
                let overflow = self.mac_unit_mut(second).mac(lhs, rhs, signs, negate);
                self.flag_mac_result(overflow);
            }
            0x70 | 0x71 => {
                let lhs = self.cmem[self.cmem_address()];
                let rhs = if op & 1 != 0 {
                    self.dmem[self.dmem_address()]
                } else {
                    self.mac_acc_operand(second)
                };
                if self.cr1.masm() == 0 {
                    self.mac_unit_mut(second).shift(-24);
                }
                let overflow = self.mac_unit_mut(second).mac(lhs, rhs, Signs::SS, negate);
                self.flag_mac_result(overflow);
            }

            0x72 => {
                let amount = if self.opcode1_flag8 { 1 } else { -1 };
                self.mac_unit_mut(second).shift(amount);
            }
            0x73 => self.mac_unit_mut(second).clear(),
            0x74 => {
                self.macc1.clear();
                self.macc2.clear();
            }

            // Direct field loads. The first two rows replace the upper
            // word outright, lower half cleared.
            0x78 => {
                let v = self.dmem[self.dmem_address()];
                let mac = self.mac_unit_mut(second);
                mac.clear_lower();
                mac.set_upper(v);
            }
            0x79 => {
                let v = self.cmem[self.cmem_address()];
                let mac = self.mac_unit_mut(second);
                mac.clear_lower();
                mac.set_upper(v);
            }
            0x7A => {
                let v = if self.opcode1_flag8 {
                    self.acc2
                } else {
                    self.acc1
                };
                self.mac_unit_mut(second).set_upper(v);
            }
            0x7B => {
                let v = U24::new(self.dmem[self.dmem_address()].raw());
                self.mac_unit_mut(second).set_lower(v);
            }
            0x7C => {
                let v = U24::new(self.cmem[self.cmem_address()].raw());
                self.mac_unit_mut(second).set_lower(v);
            }
            0x7D => {
                let v = if self.opcode1_flag8 {
                    self.acc2
                } else {
                    self.acc1
                };
                let v = U24::new(v.raw());
                self.mac_unit_mut(second).set_lower(v);
            }

            opcode => {
                return self.unknown(Fault::UnknownPrimary {
                    opcode,
                    insn: self.insn,
                    pc: self.insn_pc.get(),
                });
            }
        }
        Ok(())
    }

    const fn sign_row(row: u8) -> Signs {
        match row {
            1 => Signs::US,
            2 => Signs::SU,
            3 => Signs::UU,
            _ => Signs::SS,
        }
    }

    /// The accumulator companion of a MAC operand fetch: each unit pairs
    /// with its same-numbered accumulator.
    fn mac_acc_operand(&self, second: bool) -> I24 {
        if second { self.acc2 } else { self.acc1 }
    }

    fn mac_unit_mut(&mut self, second: bool) -> &mut Mac {
        if second { &mut self.macc2 } else { &mut self.macc1 }
    }

    // =====================================================================
    // Class-2 translation
    // =====================================================================

    /// A class-2 word borrows the secondary slot for a MAC primary: the
    /// translated primary runs first, then the top byte executes as a
    /// secondary with cleared argument bits.
    pub(crate) fn exec_class2(&mut self) -> Result<(), Fault> {
        self.opcode1 = 0x40 + self.opcode2;
        self.opcode1_flag4 = self.opcode2_flag4;
        self.opcode1_flag8 = self.opcode2_flag8;
        self.exec_primary()?;

        self.opcode2 = ((self.insn >> 24) & 0x3F) as u8;
        self.opcode2_flag4 = false;
        self.opcode2_flag8 = false;
        self.opcode2_args = 0;
        self.exec_secondary()
    }

    // =====================================================================
    // Jumps and calls
    // =====================================================================

    /// Conditional jump (0xF0–0xF7) or call (0xF8–0xFF). The condition
    /// code spans bits 26..20; indirect codes take their target from an
    /// accumulator instead of the immediate field.
    fn exec_jump(&mut self, call: bool) -> Result<(), Fault> {
        let condition = ((self.insn >> 20) & 0x7F) as u8;
        let taken = match condition {
            0x00 | 0x08 | 0x0C => true,
            0x10 => self.cr1.accz(),
            0x18 => !self.cr1.accz(),
            0x20 => !(self.cr1.accz() || self.cr1.accn()),
            0x28 => self.cr1.accn(),
            0x30 => self.cr1.aov(),
            0x38 => self.cr1.aovl(),
            0x40 => self.cr1.mov(),
            0x48 => self.cr1.movl(),
            0x50 => self.cr1.movr(),
            0x58 => self.bio,
            _ => {
                return self.unknown(Fault::UnknownCondition {
                    condition,
                    insn: self.insn,
                    pc: self.insn_pc.get(),
                });
            }
        };
        if !taken {
            return Ok(());
        }
        let target = match condition {
            0x08 => U9::new(self.acc1.raw() as u16),
            0x0C => U9::new(self.acc2.raw() as u16),
            _ => U9::new(self.insn as u16),
        };
        if call {
            self.push_pc()?;
        }
        self.pc = target;
        Ok(())
    }

    // =====================================================================
    // Secondary dispatch
    // =====================================================================

    pub(crate) fn exec_secondary(&mut self) -> Result<(), Fault> {
        match self.opcode2 {
            0x00 => {} // NOP

            // Accumulator and MAC stores. Flag 4 picks the source
            // register, flag 8 the destination bank.
            0x01 => {
                let value = if self.opcode2_flag4 {
                    self.acc2
                } else {
                    self.acc1
                };
                if self.opcode2_flag8 {
                    let addr = self.cmem_address();
                    self.cmem[addr] = value;
                } else {
                    let addr = self.dmem_address();
                    self.dmem[addr] = value;
                }
            }
            0x02 => {
                let value = self.mac_upper(self.opcode2_flag4);
                if self.opcode2_flag8 {
                    let addr = self.cmem_address();
                    self.cmem[addr] = value;
                } else {
                    let addr = self.dmem_address();
                    self.dmem[addr] = value;
                }
            }
            0x03 => {
                let value = I24::from_bits(self.mac_lower(self.opcode2_flag4).get());
                if self.opcode2_flag8 {
                    let addr = self.cmem_address();
                    self.cmem[addr] = value;
                } else {
                    let addr = self.dmem_address();
                    self.dmem[addr] = value;
                }
            }

            // Addressing register transfers.
            0x04 => {
                let acc = if self.opcode2_flag4 {
                    self.acc2
                } else {
                    self.acc1
                };
                self.da.set(self.opcode2_flag8, U12::new(acc.raw() as u16));
            }
            0x05 => {
                let acc = if self.opcode2_flag4 {
                    self.acc2
                } else {
                    self.acc1
                };
                self.ca.set(self.opcode2_flag8, U12::new(acc.raw() as u16));
            }
            0x06 => {
                let pair = AddrPair::from_word(self.cmem[self.cmem_address()].raw());
                match self.opcode2_args {
                    0 => self.da = pair,
                    1 => self.dir = pair,
                    2 => self.ca = pair,
                    _ => self.cir = pair,
                }
            }
            0x07 => {
                let pair = match self.opcode2_args {
                    0 => self.da,
                    1 => self.dir,
                    2 => self.ca,
                    _ => self.cir,
                };
                let addr = self.cmem_address();
                self.cmem[addr] = I24::from_bits(pair.to_word());
            }
            0x08 => {
                let value = U12::new(self.cmem[self.cmem_address()].raw() as u16);
                if self.opcode2_flag4 {
                    self.dir.set(self.opcode2_flag8, value);
                } else {
                    self.da.set(self.opcode2_flag8, value);
                }
            }
            0x09 => {
                let value = U12::new(self.cmem[self.cmem_address()].raw() as u16);
                if self.opcode2_flag4 {
                    self.cir.set(self.opcode2_flag8, value);
                } else {
                    self.ca.set(self.opcode2_flag8, value);
                }
            }
            0x0A => {
                let value = if self.opcode2_flag4 {
                    self.dir.get(self.opcode2_flag8)
                } else {
                    self.da.get(self.opcode2_flag8)
                };
                let addr = self.cmem_address();
                self.cmem[addr] = I24::new(i32::from(value.get()));
            }
            0x0B => {
                let value = if self.opcode2_flag4 {
                    self.cir.get(self.opcode2_flag8)
                } else {
                    self.ca.get(self.opcode2_flag8)
                };
                let addr = self.cmem_address();
                self.cmem[addr] = I24::new(i32::from(value.get()));
            }

            // Audio input transfers: converter register → DMEM.
            0x0C | 0x0D => {
                let value = match (self.opcode2, self.opcode2_flag8) {
                    (0x0C, false) => self.ar1l,
                    (0x0C, true) => self.ar1r,
                    (_, false) => self.ar2l,
                    (_, true) => self.ar2r,
                };
                let addr = self.dmem_address();
                self.dmem[addr] = value;
            }
            // Nonexistent third input pair reads as silence.
            0x0E | 0x0F => {
                let addr = self.dmem_address();
                self.dmem[addr] = I24::ZERO;
            }

            // Audio output: MAC upper word → output register + callback.
            0x18 | 0x19 | 0x1A => {
                let value = self.mac_upper(self.opcode2_flag4);
                let channel = match (self.opcode2, self.opcode2_flag8) {
                    (0x18, false) => {
                        self.ax1l = value;
                        OutputChannel::Out1L
                    }
                    (0x18, true) => {
                        self.ax1r = value;
                        OutputChannel::Out1R
                    }
                    (0x19, false) => {
                        self.ax2l = value;
                        OutputChannel::Out2L
                    }
                    (0x19, true) => {
                        self.ax2r = value;
                        OutputChannel::Out2R
                    }
                    (_, false) => {
                        self.ax3l = value;
                        OutputChannel::Out3L
                    }
                    (_, true) => {
                        self.ax3r = value;
                        OutputChannel::Out3R
                    }
                };
                if let Some(cb) = self.sample_out_cb.as_mut() {
                    cb(channel, value.get());
                }
            }

            // Transfer register moves.
            0x20 => match self.opcode2_args {
                0 => self.t = self.dmem[self.dmem_address()],
                1 => {
                    let addr = self.dmem_address();
                    self.dmem[addr] = self.t;
                }
                2 => {
                    let addr = (self.goff.get() as usize) & (crate::cpu::GMEM_WORDS - 1);
                    self.gmem[addr] = self.t;
                }
                _ => {
                    let addr = self.dmem_address();
                    self.dmem[addr] = self.xrd;
                }
            },

            // Delay-line housekeeping.
            0x21 => match self.opcode2_args {
                0 => {
                    self.doff = self.doff.wrapping_sub(1);
                    self.goff = self.goff.wrapping_add(1);
                }
                1 => {
                    // Background external read at the streaming position.
                    self.xmem_read_addr = self.xmem_window(u32::from(self.goff.get()));
                    self.xmem_read_cycles = self.xmem_read_latency();
                }
                2 => self.goff = U12::ZERO,
                _ => {} // DRAM refresh slot
            },

            // Control register transfers.
            0x22 => {
                let value = self.cmem[self.cmem_address()].raw();
                match self.opcode2_args {
                    0 => self.cr0.set_value(value),
                    1 => {
                        self.cr1.set_value(value);
                        self.update_mac_modes();
                    }
                    2 => self.cr2.load(value),
                    _ => self.cr3.set_value(value),
                }
            }
            0x23 => {
                let value = match self.opcode2_args {
                    0 => self.cr0.value(),
                    1 => self.cr1.value(),
                    2 => self.cr2.value(),
                    _ => self.cr3.value(),
                };
                let addr = self.cmem_address();
                self.cmem[addr] = I24::from_bits(value);
            }

            0x26 => {
                let value = if self.opcode2_flag8 {
                    self.cmem[self.cmem_address()].raw()
                } else {
                    self.dmem[self.dmem_address()].raw()
                };
                self.hir = U24::new(value);
            }

            // Circular rotate: the region's last word moves to the front
            // and the offset slides down one.
            0x27 => {
                if self.opcode2_flag8 {
                    let last = (self.ccirc.get() as usize) & 0x1FF;
                    let front = (self.coff.get() as usize) & 0x1FF;
                    self.cmem[front] = self.cmem[last];
                    self.coff = self.coff.wrapping_sub(1);
                } else {
                    let last = (self.dcirc.get() as usize) & 0x1FF;
                    let front = (self.doff.get() as usize) & 0x1FF;
                    self.dmem[front] = self.dmem[last];
                    self.doff = self.doff.wrapping_sub(1);
                }
                if !self.cr3.lxmem() {
                    self.xoff = self.xoff.wrapping_sub(1) & 0xFF_FFFF;
                }
            }

            // MAC mode field writes.
            0x28 => {
                self.cr1.set_masm(self.opcode2_args);
                self.update_mac_modes();
            }
            0x29 => {
                self.cr1.set_mosm(self.opcode2_args);
                self.update_mac_modes();
            }
            0x2A => {
                self.cr1.set_mrdm(self.opcode2_args);
                self.update_mac_modes();
            }
            0x2B => {
                self.cr1.set_mrdm(self.opcode2_args + 4);
                self.update_mac_modes();
            }

            0x2C => {
                if self.opcode2_flag8 {
                    if self.opcode2_flag4 {
                        self.cr1.set_mov(false);
                        self.cr1.set_movl(false);
                        self.cr1.set_movr(false);
                    } else {
                        self.cr1.set_aov(false);
                        self.cr1.set_aovl(false);
                    }
                } else {
                    self.cr2.set_free(self.opcode2_flag4);
                }
            }
            0x2D => {
                if self.opcode2_flag8 {
                    self.cr1.set_movm(self.opcode2_flag4);
                    self.update_mac_modes();
                } else {
                    self.cr1.set_aovm(self.opcode2_flag4);
                }
            }
            0x2E => {
                if self.opcode2_flag8 {
                    self.cr1.set_lcmem(self.opcode2_flag4);
                } else {
                    self.cr1.set_ldmem(self.opcode2_flag4);
                }
            }

            // External bus transfers through the host callbacks.
            0x30..=0x33 => {
                let addr = self.dmem_address();
                self.dmem[addr] = self.xrd;
                let bus_addr = self.xmem_address();
                let fetched = self.ext_bus_in_cb.as_mut().map(|cb| cb(bus_addr));
                if let Some(value) = fetched {
                    self.xrd = I24::new(value);
                }
            }
            0x38..=0x3B => {
                let value = self.dmem[self.dmem_address()].get();
                let bus_addr = self.xmem_address();
                if let Some(cb) = self.ext_bus_out_cb.as_mut() {
                    cb(value, bus_addr);
                }
            }

            opcode => {
                return self.unknown(Fault::UnknownSecondary {
                    opcode,
                    insn: self.insn,
                    pc: self.insn_pc.get(),
                });
            }
        }
        Ok(())
    }
}
