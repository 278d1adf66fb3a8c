//! Core traits and types for cycle-stepped DSP emulation.
//!
//! Everything advances at the instruction clock. A signal processor runs a
//! fixed program once per sample frame, so all timing derives from the
//! crystal frequency and the step count.

mod clock;
mod observable;
mod tickable;
mod ticks;

pub use clock::MasterClock;
pub use observable::{Observable, Value};
pub use tickable::Tickable;
pub use ticks::Ticks;
