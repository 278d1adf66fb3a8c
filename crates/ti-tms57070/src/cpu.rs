//! DSP core state and the step cycle.
//!
//! One `step()` call executes one instruction clock: fetch, PC advance
//! (with repeat handling), addressing-pipeline tick, decode and execute,
//! MAC shadow advance, external-read countdown, interrupt dispatch. The
//! order is fixed; every observable side effect of a step happens in that
//! sequence.

use std::fmt;

use dsp_core::{Observable, Tickable, Value};

use crate::mac::Mac;
use crate::pipeline::AddrPipeline;
use crate::registers::{AddrPair, Cr0, Cr1, Cr2, Cr3, INT_VECTORS, int_source};
use crate::word::{I24, U9, U12, U24};

/// Program memory size in 32-bit words.
pub const PMEM_WORDS: usize = 512;
/// Coefficient memory size in 24-bit words.
pub const CMEM_WORDS: usize = 512;
/// Data memory size in 24-bit words.
pub const DMEM_WORDS: usize = 512;
/// General memory size in 24-bit words.
pub const GMEM_WORDS: usize = 256;
/// External memory bank size. The external-bus window mask never exceeds
/// 64K words, so this backs every reachable bus configuration.
pub const XMEM_WORDS: usize = 0x1_0000;
/// Call/interrupt stack depth.
pub const STACK_DEPTH: usize = 4;

/// Audio input channels (two stereo converter pairs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputChannel {
    In1L,
    In1R,
    In2L,
    In2R,
}

/// Audio output channels (three stereo pairs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputChannel {
    Out1L,
    Out1R,
    Out2L,
    Out2R,
    Out3L,
    Out3R,
}

/// External interrupt lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtInterrupt {
    Int1,
    Int2,
    Int3,
}

/// A fatal emulation fault. Once raised, the core freezes: every further
/// `step()` returns the same fault without mutating state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Push with all four stack slots in use.
    StackOverflow { pc: u16 },
    /// Pop with an empty stack.
    StackUnderflow { pc: u16 },
    /// Unrecognised primary opcode (strict mode only).
    UnknownPrimary { opcode: u8, insn: u32, pc: u16 },
    /// Unrecognised secondary opcode (strict mode only).
    UnknownSecondary { opcode: u8, insn: u32, pc: u16 },
    /// Unrecognised register selector in an immediate load (strict mode only).
    UnknownRegisterLoad { selector: u8, insn: u32, pc: u16 },
    /// Unrecognised jump/call condition code (strict mode only).
    UnknownCondition { condition: u8, insn: u32, pc: u16 },
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StackOverflow { pc } => write!(f, "stack overflow at PC {pc:03X}"),
            Self::StackUnderflow { pc } => write!(f, "stack underflow at PC {pc:03X}"),
            Self::UnknownPrimary { opcode, insn, pc } => write!(
                f,
                "unknown primary opcode {opcode:02X} in {insn:08X} at PC {pc:03X}"
            ),
            Self::UnknownSecondary { opcode, insn, pc } => write!(
                f,
                "unknown secondary opcode {opcode:02X} in {insn:08X} at PC {pc:03X}"
            ),
            Self::UnknownRegisterLoad { selector, insn, pc } => write!(
                f,
                "unknown register selector {selector:02X} in {insn:08X} at PC {pc:03X}"
            ),
            Self::UnknownCondition { condition, insn, pc } => write!(
                f,
                "unknown condition code {condition:02X} in {insn:08X} at PC {pc:03X}"
            ),
        }
    }
}

impl std::error::Error for Fault {}

type SampleOutFn = dyn FnMut(OutputChannel, i32);
type ExtBusInFn = dyn FnMut(u32) -> i32;
type ExtBusOutFn = dyn FnMut(i32, u32);

/// The TMS57070 DSP core.
///
/// All state lives here; instances are independent and `step()` is the only
/// state-advancing operation. Hosts drive audio through `sample_in` and the
/// registered callbacks between steps.
pub struct Tms57070 {
    // === Memory banks ===
    /// Program memory, one 32-bit instruction word per entry.
    pub pmem: [u32; PMEM_WORDS],
    /// Coefficient memory.
    pub cmem: [I24; CMEM_WORDS],
    /// Data memory.
    pub dmem: [I24; DMEM_WORDS],
    /// General memory, addressed through GOFF.
    pub gmem: [I24; GMEM_WORDS],
    /// External memory window.
    pub xmem: Vec<I24>,

    // === Program flow ===
    pub(crate) pc: U9,
    pub(crate) stack: [U9; STACK_DEPTH],
    pub(crate) sp: u8,
    pub(crate) rptc: u8,
    pub(crate) rep_start_pc: U9,
    pub(crate) rep_end_pc: U9,

    // === Data registers ===
    pub acc1: I24,
    pub acc2: I24,
    pub(crate) macc1: Mac,
    pub(crate) macc2: Mac,
    pub(crate) macc1_delayed1: Mac,
    pub(crate) macc1_delayed2: Mac,
    pub(crate) macc2_delayed1: Mac,
    pub(crate) macc2_delayed2: Mac,
    /// Host interface register.
    pub hir: U24,
    /// External-read result register.
    pub xrd: I24,
    /// Scratch transfer register.
    pub t: I24,

    // === Audio registers ===
    pub ar1l: I24,
    pub ar1r: I24,
    pub ar2l: I24,
    pub ar2r: I24,
    pub ax1l: I24,
    pub ax1r: I24,
    pub ax2l: I24,
    pub ax2r: I24,
    pub ax3l: I24,
    pub ax3r: I24,

    // === Addressing ===
    pub ca: AddrPair,
    pub da: AddrPair,
    pub cir: AddrPair,
    pub dir: AddrPair,
    pub coff: U12,
    pub ccirc: U12,
    pub doff: U12,
    pub dcirc: U12,
    pub xoff: u32,
    pub goff: U12,
    pub(crate) addr_pipe: AddrPipeline,

    // === Control ===
    pub cr0: Cr0,
    pub(crate) cr1: Cr1,
    pub cr2: Cr2,
    pub cr3: Cr3,
    /// External boolean input sampled by the BIO jump condition.
    pub bio: bool,

    // === Per-step decode latches ===
    pub(crate) insn: u32,
    pub(crate) insn_pc: U9,
    pub(crate) opcode1: u8,
    pub(crate) opcode1_flag4: bool,
    pub(crate) opcode1_flag8: bool,
    pub(crate) opcode2: u8,
    pub(crate) opcode2_flag4: bool,
    pub(crate) opcode2_flag8: bool,
    pub(crate) opcode2_args: u8,

    // === External read latency ===
    pub(crate) xmem_read_addr: u32,
    pub(crate) xmem_read_cycles: u32,

    // === Fault and diagnostics ===
    fault: Option<Fault>,
    strict_unknown: bool,
    unknown_count: u64,
    last_unknown: u32,
    total_steps: u64,

    // === Host callbacks ===
    pub(crate) sample_out_cb: Option<Box<SampleOutFn>>,
    pub(crate) ext_bus_in_cb: Option<Box<ExtBusInFn>>,
    pub(crate) ext_bus_out_cb: Option<Box<ExtBusOutFn>>,
}

impl Default for Tms57070 {
    fn default() -> Self {
        Self::new()
    }
}

impl Tms57070 {
    /// Create a core in post-reset state with cleared memory banks.
    #[must_use]
    pub fn new() -> Self {
        let mut dsp = Self {
            pmem: [0; PMEM_WORDS],
            cmem: [I24::ZERO; CMEM_WORDS],
            dmem: [I24::ZERO; DMEM_WORDS],
            gmem: [I24::ZERO; GMEM_WORDS],
            xmem: vec![I24::ZERO; XMEM_WORDS],
            pc: U9::ZERO,
            stack: [U9::ZERO; STACK_DEPTH],
            sp: 0,
            rptc: 0,
            rep_start_pc: U9::ZERO,
            rep_end_pc: U9::ZERO,
            acc1: I24::ZERO,
            acc2: I24::ZERO,
            macc1: Mac::new(),
            macc2: Mac::new(),
            macc1_delayed1: Mac::new(),
            macc1_delayed2: Mac::new(),
            macc2_delayed1: Mac::new(),
            macc2_delayed2: Mac::new(),
            hir: U24::ZERO,
            xrd: I24::ZERO,
            t: I24::ZERO,
            ar1l: I24::ZERO,
            ar1r: I24::ZERO,
            ar2l: I24::ZERO,
            ar2r: I24::ZERO,
            ax1l: I24::ZERO,
            ax1r: I24::ZERO,
            ax2l: I24::ZERO,
            ax2r: I24::ZERO,
            ax3l: I24::ZERO,
            ax3r: I24::ZERO,
            ca: AddrPair::default(),
            da: AddrPair::default(),
            cir: AddrPair::default(),
            dir: AddrPair::default(),
            coff: U12::ZERO,
            ccirc: U12::ZERO,
            doff: U12::ZERO,
            dcirc: U12::ZERO,
            xoff: 0,
            goff: U12::ZERO,
            addr_pipe: AddrPipeline::new(),
            cr0: Cr0::default(),
            cr1: Cr1::default(),
            cr2: Cr2::default(),
            cr3: Cr3::default(),
            bio: false,
            insn: 0,
            insn_pc: U9::ZERO,
            opcode1: 0,
            opcode1_flag4: false,
            opcode1_flag8: false,
            opcode2: 0,
            opcode2_flag4: false,
            opcode2_flag8: false,
            opcode2_args: 0,
            xmem_read_addr: 0,
            xmem_read_cycles: 0,
            fault: None,
            strict_unknown: true,
            unknown_count: 0,
            last_unknown: 0,
            total_steps: 0,
            sample_out_cb: None,
            ext_bus_in_cb: None,
            ext_bus_out_cb: None,
        };
        dsp.reset();
        dsp
    }

    /// Reset to the post-reset register state.
    ///
    /// Memory banks are preserved so hosts can preload program and
    /// coefficient images before releasing the core.
    pub fn reset(&mut self) {
        self.pc = U9::ZERO;
        self.sp = 0;
        self.stack = [U9::ZERO; STACK_DEPTH];
        self.rptc = 0;
        self.rep_start_pc = U9::ZERO;
        self.rep_end_pc = U9::ZERO;

        self.acc1 = I24::ZERO;
        self.acc2 = I24::ZERO;
        self.macc1.clear();
        self.macc2.clear();
        self.macc1_delayed1.clear();
        self.macc1_delayed2.clear();
        self.macc2_delayed1.clear();
        self.macc2_delayed2.clear();
        self.hir = U24::ZERO;
        self.xrd = I24::ZERO;
        self.t = I24::ZERO;

        self.ar1l = I24::ZERO;
        self.ar1r = I24::ZERO;
        self.ar2l = I24::ZERO;
        self.ar2r = I24::ZERO;
        self.ax1l = I24::ZERO;
        self.ax1r = I24::ZERO;
        self.ax2l = I24::ZERO;
        self.ax2r = I24::ZERO;
        self.ax3l = I24::ZERO;
        self.ax3r = I24::ZERO;

        self.ca = AddrPair::default();
        self.da = AddrPair::default();
        self.cir = AddrPair::default();
        self.dir = AddrPair::default();
        self.coff = U12::ZERO;
        self.ccirc = U12::ZERO;
        self.doff = U12::ZERO;
        self.dcirc = U12::ZERO;
        self.xoff = 0;
        self.goff = U12::ZERO;
        self.addr_pipe.clear();

        // Post-reset control state: flags clear, every interrupt source
        // disabled, dispatch not free, narrowest external bus.
        self.cr0 = Cr0::default();
        self.cr1 = Cr1::default();
        self.cr2 = Cr2::default();
        self.cr2.set_value(0xFF << 8);
        self.cr3 = Cr3::default();
        self.update_mac_modes();

        self.xmem_read_addr = 0;
        self.xmem_read_cycles = 0;
        self.fault = None;
        self.unknown_count = 0;
        self.last_unknown = 0;
        self.total_steps = 0;
    }

    /// Advance one DSP clock.
    ///
    /// Returns the latched fault without touching state if the core has
    /// already faulted; latches and returns a fresh fault otherwise.
    pub fn step(&mut self) -> Result<(), Fault> {
        if let Some(fault) = self.fault {
            return Err(fault);
        }
        let result = self.step_inner();
        if let Err(fault) = result {
            self.fault = Some(fault);
        }
        result
    }

    fn step_inner(&mut self) -> Result<(), Fault> {
        self.total_steps += 1;

        // 1. Fetch.
        self.insn_pc = self.pc;
        self.insn = self.pmem[self.pc.get() as usize];

        // 2. Advance PC, honouring an active repeat.
        if self.rptc > 0 && self.pc == self.rep_end_pc {
            self.pc = self.rep_start_pc;
            self.rptc -= 1;
        } else {
            self.pc = self.pc.wrapping_add(1);
        }

        // 3. Addressing-register write pipeline ticks before execution, so
        // a write staged two steps ago lands now.
        let ready = self.addr_pipe.advance();
        if let Some(write) = ready.dual {
            *self.pair_mut(write.reg) = write.value;
        }
        if let Some(write) = ready.single {
            self.pair_mut(write.reg).set(write.two, write.value);
        }

        // 4. Decode and execute.
        self.opcode1 = (self.insn >> 24) as u8;
        self.opcode1_flag4 = self.insn & 0x0040_0000 != 0;
        self.opcode1_flag8 = self.insn & 0x0080_0000 != 0;
        self.opcode2 = ((self.insn >> 16) & 0x3F) as u8;
        self.opcode2_flag4 = self.insn & 0x0000_4000 != 0;
        self.opcode2_flag8 = self.insn & 0x0000_8000 != 0;
        self.opcode2_args = ((self.insn >> 14) & 3) as u8;

        if self.opcode1 >= 0xC0 {
            self.exec_primary()?;
        } else if self.opcode1 >= 0x80 {
            self.exec_class2()?;
            self.post_increments();
        } else {
            self.exec_secondary()?;
            self.exec_primary()?;
            self.post_increments();
        }

        // 5. MAC shadows advance one rank, unconditionally.
        self.macc1_delayed2.copy_value_from(&self.macc1_delayed1);
        self.macc2_delayed2.copy_value_from(&self.macc2_delayed1);
        self.macc1_delayed1.copy_value_from(&self.macc1);
        self.macc2_delayed1.copy_value_from(&self.macc2);

        // 6. External read countdown.
        if self.xmem_read_cycles > 0 {
            self.xmem_read_cycles -= 1;
            if self.xmem_read_cycles == 0 {
                let mut word = self.xmem[self.xmem_read_addr as usize].raw();
                if !self.cr3.xword() {
                    // Narrow transfers only carry the upper 16 bits.
                    word &= 0xFF_FF00;
                }
                self.xrd = I24::from_bits(word);
            }
        }

        // 7. Interrupt dispatch.
        if self.cr2.free() {
            let pending = self.cr2.pending();
            if pending != 0 {
                let source = pending.trailing_zeros() as u8;
                self.push_pc()?;
                self.cr2.set_free(false);
                self.cr2.acknowledge(source);
                self.pc = U9::new(INT_VECTORS[source as usize]);
            }
        }

        Ok(())
    }

    pub(crate) fn pair_mut(&mut self, reg: crate::pipeline::PairReg) -> &mut AddrPair {
        use crate::pipeline::PairReg;
        match reg {
            PairReg::Ca => &mut self.ca,
            PairReg::Da => &mut self.da,
            PairReg::Cir => &mut self.cir,
            PairReg::Dir => &mut self.dir,
        }
    }

    /// Push the current PC; stack overflow is fatal.
    pub(crate) fn push_pc(&mut self) -> Result<(), Fault> {
        if self.sp as usize == STACK_DEPTH {
            return Err(Fault::StackOverflow {
                pc: self.insn_pc.get(),
            });
        }
        self.stack[self.sp as usize] = self.pc;
        self.sp += 1;
        Ok(())
    }

    /// Pop into PC; stack underflow is fatal.
    pub(crate) fn pop_pc(&mut self) -> Result<(), Fault> {
        if self.sp == 0 {
            return Err(Fault::StackUnderflow {
                pc: self.insn_pc.get(),
            });
        }
        self.sp -= 1;
        self.pc = self.stack[self.sp as usize];
        Ok(())
    }

    /// Record an unknown encoding: fatal in strict mode, counted and
    /// skipped otherwise.
    pub(crate) fn unknown(&mut self, fault: Fault) -> Result<(), Fault> {
        if self.strict_unknown {
            Err(fault)
        } else {
            self.unknown_count += 1;
            self.last_unknown = self.insn;
            Ok(())
        }
    }

    /// Push the current CR1 mode fields into both MACs and their shadows.
    pub(crate) fn update_mac_modes(&mut self) {
        let cr1 = self.cr1;
        self.macc1.update_modes(cr1);
        self.macc2.update_modes(cr1);
        self.macc1_delayed1.update_modes(cr1);
        self.macc1_delayed2.update_modes(cr1);
        self.macc2_delayed1.update_modes(cr1);
        self.macc2_delayed2.update_modes(cr1);
    }

    /// Instruction-visible MAC upper read: the two-cycle delayed rank,
    /// conditioned by the output stage. Latches MOVR on an over-range read.
    pub(crate) fn mac_upper(&mut self, second: bool) -> I24 {
        let mac = if second {
            self.macc2_delayed2
        } else {
            self.macc1_delayed2
        };
        if mac.upper_overflows() {
            self.cr1.set_movr(true);
        }
        mac.upper()
    }

    /// Instruction-visible MAC lower read, conditioned.
    pub(crate) fn mac_lower(&mut self, second: bool) -> U24 {
        let mac = if second {
            self.macc2_delayed2
        } else {
            self.macc1_delayed2
        };
        if mac.upper_overflows() {
            self.cr1.set_movr(true);
        }
        mac.lower()
    }

    /// Flag a MAC arithmetic result: MOV tracks each operation, MOVL
    /// latches until explicitly cleared.
    pub(crate) fn flag_mac_result(&mut self, overflow: bool) {
        self.cr1.set_mov(overflow);
        if overflow {
            self.cr1.set_movl(true);
        }
    }

    // =====================================================================
    // Host surface
    // =====================================================================

    /// Feed one audio input sample. Sets the channel's input register and
    /// raises the matching receive interrupt flag as one atomic pair.
    pub fn sample_in(&mut self, channel: InputChannel, value: i32) {
        let sample = I24::new(value);
        match channel {
            InputChannel::In1L => {
                self.ar1l = sample;
                self.cr2.raise(int_source::ARI1);
            }
            InputChannel::In1R => {
                self.ar1r = sample;
                self.cr2.raise(int_source::ARI1);
            }
            InputChannel::In2L => {
                self.ar2l = sample;
                self.cr2.raise(int_source::ARI2);
            }
            InputChannel::In2R => {
                self.ar2r = sample;
                self.cr2.raise(int_source::ARI2);
            }
        }
    }

    /// Register the audio output callback, invoked synchronously inside
    /// `step()` when the program emits a sample. Must not re-enter the core.
    pub fn on_sample_out(&mut self, cb: impl FnMut(OutputChannel, i32) + 'static) {
        self.sample_out_cb = Some(Box::new(cb));
    }

    /// Register the external-bus read callback (`address → value`).
    pub fn on_ext_bus_in(&mut self, cb: impl FnMut(u32) -> i32 + 'static) {
        self.ext_bus_in_cb = Some(Box::new(cb));
    }

    /// Register the external-bus write callback (`value, address`).
    pub fn on_ext_bus_out(&mut self, cb: impl FnMut(i32, u32) + 'static) {
        self.ext_bus_out_cb = Some(Box::new(cb));
    }

    /// Pulse an external interrupt line.
    pub fn ext_interrupt(&mut self, line: ExtInterrupt) {
        match line {
            ExtInterrupt::Int1 => self.cr2.raise(int_source::INT1),
            ExtInterrupt::Int2 => self.cr2.raise(int_source::INT2),
            ExtInterrupt::Int3 => self.cr2.raise(int_source::INT3),
        }
    }

    /// Stage a host word into HIR and raise the host interrupt flag.
    pub fn hir_interrupt(&mut self, value: u32) {
        self.hir = U24::new(value);
        self.cr2.raise(int_source::HIR);
    }

    /// Read and clear the host interface register.
    pub fn hir_out(&mut self) -> u32 {
        let value = self.hir.get();
        self.hir = U24::ZERO;
        value
    }

    /// Drive the BIO input line.
    pub fn set_bio(&mut self, level: bool) {
        self.bio = level;
    }

    /// Treat unknown encodings as fatal (true, the default) or as
    /// counted no-ops.
    pub fn set_strict_unknown(&mut self, strict: bool) {
        self.strict_unknown = strict;
    }

    /// The latched fault, if the core has faulted.
    #[must_use]
    pub fn fault(&self) -> Option<Fault> {
        self.fault
    }

    /// Number of unknown encodings skipped in non-strict mode.
    #[must_use]
    pub fn unknown_count(&self) -> u64 {
        self.unknown_count
    }

    /// The most recent unknown instruction word.
    #[must_use]
    pub fn last_unknown(&self) -> u32 {
        self.last_unknown
    }

    /// Load a program image into PMEM, capped at the bank size.
    pub fn load_pmem(&mut self, words: &[u32]) {
        for (slot, &word) in self.pmem.iter_mut().zip(words) {
            *slot = word;
        }
    }

    /// Load a coefficient image into CMEM, capped at the bank size.
    pub fn load_cmem(&mut self, words: &[i32]) {
        for (slot, &word) in self.cmem.iter_mut().zip(words) {
            *slot = I24::new(word);
        }
    }

    // =====================================================================
    // Inspection
    // =====================================================================

    #[must_use]
    pub fn pc(&self) -> u16 {
        self.pc.get()
    }

    #[must_use]
    pub fn sp(&self) -> u8 {
        self.sp
    }

    /// Stack entry below the current pointer (the most recent push).
    #[must_use]
    pub fn stack_top(&self) -> Option<u16> {
        if self.sp == 0 {
            None
        } else {
            Some(self.stack[(self.sp - 1) as usize].get())
        }
    }

    #[must_use]
    pub fn rptc(&self) -> u8 {
        self.rptc
    }

    #[must_use]
    pub fn cr1(&self) -> Cr1 {
        self.cr1
    }

    /// Whole-word CR1 write; recomputes the MAC mode parameters.
    pub fn set_cr1(&mut self, value: u32) {
        self.cr1.set_value(value);
        self.update_mac_modes();
    }

    /// Raw 52-bit accumulator values (live rank).
    #[must_use]
    pub fn macc1_raw(&self) -> i64 {
        self.macc1.raw()
    }

    #[must_use]
    pub fn macc2_raw(&self) -> i64 {
        self.macc2.raw()
    }

    pub fn set_macc1_raw(&mut self, value: i64) {
        self.macc1.set_raw(value);
    }

    pub fn set_macc2_raw(&mut self, value: i64) {
        self.macc2.set_raw(value);
    }

    /// Conditioned upper word of the delayed rank the instruction set sees.
    #[must_use]
    pub fn macc1_delayed_upper(&self) -> i32 {
        self.macc1_delayed2.upper().get()
    }

    #[must_use]
    pub fn macc2_delayed_upper(&self) -> i32 {
        self.macc2_delayed2.upper().get()
    }

    #[must_use]
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }
}

impl Tickable for Tms57070 {
    /// One tick is one instruction clock. A faulted core stays frozen.
    fn tick(&mut self) {
        let _ = self.step();
    }
}

impl Observable for Tms57070 {
    fn query(&self, path: &str) -> Option<Value> {
        let value = match path {
            "pc" => Value::U16(self.pc.get()),
            "sp" => Value::U8(self.sp),
            "rptc" => Value::U8(self.rptc),
            "acc1" => Value::I32(self.acc1.get()),
            "acc2" => Value::I32(self.acc2.get()),
            "macc1" => Value::I64(self.macc1.raw()),
            "macc2" => Value::I64(self.macc2.raw()),
            "hir" => Value::U32(self.hir.get()),
            "xrd" => Value::I32(self.xrd.get()),
            "t" => Value::I32(self.t.get()),
            "bio" => Value::Bool(self.bio),
            "cr0" => Value::U32(self.cr0.value()),
            "cr1" => Value::U32(self.cr1.value()),
            "cr2" => Value::U32(self.cr2.value()),
            "cr3" => Value::U32(self.cr3.value()),
            "flags.aov" => Value::Bool(self.cr1.aov()),
            "flags.aovl" => Value::Bool(self.cr1.aovl()),
            "flags.accz" => Value::Bool(self.cr1.accz()),
            "flags.accn" => Value::Bool(self.cr1.accn()),
            "flags.mov" => Value::Bool(self.cr1.mov()),
            "flags.movl" => Value::Bool(self.cr1.movl()),
            "flags.movr" => Value::Bool(self.cr1.movr()),
            "flags.free" => Value::Bool(self.cr2.free()),
            "ca.one" => Value::U16(self.ca.one.get()),
            "ca.two" => Value::U16(self.ca.two.get()),
            "da.one" => Value::U16(self.da.one.get()),
            "da.two" => Value::U16(self.da.two.get()),
            "cir.one" => Value::U16(self.cir.one.get()),
            "cir.two" => Value::U16(self.cir.two.get()),
            "dir.one" => Value::U16(self.dir.one.get()),
            "dir.two" => Value::U16(self.dir.two.get()),
            "coff" => Value::U16(self.coff.get()),
            "doff" => Value::U16(self.doff.get()),
            "goff" => Value::U16(self.goff.get()),
            "xoff" => Value::U32(self.xoff),
            "unknown.count" => Value::U64(self.unknown_count),
            "unknown.last" => Value::U32(self.last_unknown),
            "faulted" => Value::Bool(self.fault.is_some()),
            _ => return None,
        };
        Some(value)
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "pc",
            "sp",
            "rptc",
            "acc1",
            "acc2",
            "macc1",
            "macc2",
            "hir",
            "xrd",
            "t",
            "bio",
            "cr0",
            "cr1",
            "cr2",
            "cr3",
            "flags.aov",
            "flags.aovl",
            "flags.accz",
            "flags.accn",
            "flags.mov",
            "flags.movl",
            "flags.movr",
            "flags.free",
            "ca.one",
            "ca.two",
            "da.one",
            "da.two",
            "cir.one",
            "cir.two",
            "dir.one",
            "dir.two",
            "coff",
            "doff",
            "goff",
            "xoff",
            "unknown.count",
            "unknown.last",
            "faulted",
        ]
    }
}
