//! Trait for components that can be advanced by clock ticks.

use crate::Ticks;

/// A component that can be advanced by clock ticks.
///
/// This is the core abstraction for cycle-stepped emulation. Every component
/// (processor core, converter front end, host bridge) implements this trait.
pub trait Tickable {
    /// Advance the component by one instruction-clock tick.
    ///
    /// A faulted component is free to make this a no-op; the fault itself
    /// stays reachable through the component's own API.
    fn tick(&mut self);

    /// Advance the component by multiple ticks.
    ///
    /// Default implementation calls `tick()` in a loop. Components may
    /// override for efficiency, but must produce identical results.
    fn tick_n(&mut self, count: Ticks) {
        for _ in 0..count.get() {
            self.tick();
        }
    }
}
