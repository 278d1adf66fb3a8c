//! TI TMS57070 audio DSP emulator.
//!
//! A cycle-stepped model of the fixed-point signal processor found in
//! 1990s effects units: 32-bit dual-issue instructions over 24-bit data,
//! two 52-bit multiply-accumulate units with pipelined read-out, four
//! word-addressable memory banks, circular addressing for delay lines, and
//! interrupt-driven audio and host I/O. One `step()` is one instruction
//! clock; the per-step side-effect order is fixed and documented on
//! [`Tms57070::step`].
//!
//! The emulator exists to replay firmware dumps against hardware captures,
//! so observable state is the contract: every register can be inspected
//! through `dsp_core::Observable`, and [`Tms57070::report_state`] emits
//! the JSON dump the comparison tooling consumes.
//!
//! # Memory banks
//!
//! | Bank | Size | Contents |
//! |------|------|----------|
//! | PMEM | 512  | 32-bit instruction words |
//! | CMEM | 512  | 24-bit coefficients |
//! | DMEM | 512  | 24-bit data |
//! | GMEM | 256  | 24-bit general storage |
//! | XMEM | bus-configured window | 24-bit external memory |
//!
//! # Host surface
//!
//! Audio enters through [`Tms57070::sample_in`] and leaves through the
//! sample-out callback; the external bus and host port work the same way.
//! All callbacks run synchronously inside `step()` and must not re-enter
//! the core. Fatal conditions (stack overflow/underflow, unknown opcodes
//! in strict mode) latch a [`Fault`] and freeze the core.

mod addressing;
mod cpu;
mod execute;
mod mac;
mod pipeline;
mod registers;
mod report;
mod word;

pub use cpu::{
    CMEM_WORDS, DMEM_WORDS, ExtInterrupt, Fault, GMEM_WORDS, InputChannel, OutputChannel,
    PMEM_WORDS, STACK_DEPTH, Tms57070, XMEM_WORDS,
};
pub use mac::{Mac, Signs, wrap52};
pub use registers::{AddrPair, Cr0, Cr1, Cr2, Cr3, INT_VECTORS, int_source};
pub use word::{I24, INT24_MAX, INT24_MIN, U9, U12, U24, UINT24_MAX};
