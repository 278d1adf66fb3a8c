//! Two-cycle write pipeline for the addressing registers.
//!
//! Immediate loads of CA/DA/CIR/DIR (opcodes 0xC1–0xC6) do not land
//! immediately: the write staged during step N is applied at the start of
//! step N+2. The pipeline holds one slot bank for whole-pair writes and one
//! for single-element writes, each a (target, value) payload moving
//! pending → delayed → applied.
//!
//! Loads of non-addressing registers (accumulators, control registers,
//! circular offsets) bypass this pipeline entirely.

use crate::registers::AddrPair;
use crate::word::U12;

/// Which addressing register pair a staged write targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairReg {
    Ca,
    Da,
    Cir,
    Dir,
}

/// A whole-pair write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DualWrite {
    pub reg: PairReg,
    pub value: AddrPair,
}

/// A single-element write (`two` selects the second element).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SingleWrite {
    pub reg: PairReg,
    pub two: bool,
    pub value: U12,
}

/// Writes that have finished traversing the pipeline this step.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadyWrites {
    pub dual: Option<DualWrite>,
    pub single: Option<SingleWrite>,
}

/// The pipeline itself: a two-deep shift register per slot bank.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddrPipeline {
    pending_dual: Option<DualWrite>,
    delayed_dual: Option<DualWrite>,
    pending_single: Option<SingleWrite>,
    delayed_single: Option<SingleWrite>,
}

impl AddrPipeline {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending_dual: None,
            delayed_dual: None,
            pending_single: None,
            delayed_single: None,
        }
    }

    /// Drop all staged writes (reset).
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Stage a whole-pair write. Visible two steps from now.
    pub const fn stage_dual(&mut self, reg: PairReg, value: AddrPair) {
        self.pending_dual = Some(DualWrite { reg, value });
    }

    /// Stage a single-element write. Visible two steps from now.
    pub const fn stage_single(&mut self, reg: PairReg, two: bool, value: U12) {
        self.pending_single = Some(SingleWrite { reg, two, value });
    }

    /// Advance one step: returns the writes due now and shifts
    /// pending slots into the delayed rank.
    pub const fn advance(&mut self) -> ReadyWrites {
        let ready = ReadyWrites {
            dual: self.delayed_dual,
            single: self.delayed_single,
        };
        self.delayed_dual = self.pending_dual;
        self.delayed_single = self.pending_single;
        self.pending_dual = None;
        self.pending_single = None;
        ready
    }
}
