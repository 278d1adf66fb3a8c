//! Diagnostic state report.
//!
//! Produces the JSON dump used to compare emulator state against hardware
//! captures: every visible register plus the first 256 words of CMEM and
//! DMEM, each value a 6-digit uppercase hex string.

use serde_json::{Value as Json, json};

use crate::cpu::Tms57070;

/// Format a 24-bit value the way the comparison tooling expects.
fn hex24(value: u32) -> String {
    format!("{:06X}", value & 0xFF_FFFF)
}

impl Tms57070 {
    /// JSON dump of the visible register file and the first 256 words of
    /// CMEM and DMEM.
    #[must_use]
    pub fn report_state(&self) -> String {
        let cmem: Vec<Json> = self.cmem[..256]
            .iter()
            .map(|w| Json::String(hex24(w.raw())))
            .collect();
        let dmem: Vec<Json> = self.dmem[..256]
            .iter()
            .map(|w| Json::String(hex24(w.raw())))
            .collect();

        let report = json!({
            "ACC1": hex24(self.acc1.raw()),
            "ACC2": hex24(self.acc2.raw()),
            "MAC1": hex24(self.macc1.upper().raw()),
            "MAC2": hex24(self.macc2.upper().raw()),
            "MAC1L": hex24(self.macc1.lower().get()),
            "MAC2L": hex24(self.macc2.lower().get()),
            "CA1": hex24(u32::from(self.ca.one.get())),
            "CA2": hex24(u32::from(self.ca.two.get())),
            "DA1": hex24(u32::from(self.da.one.get())),
            "DA2": hex24(u32::from(self.da.two.get())),
            "XRD": hex24(self.xrd.raw()),
            "CR0": hex24(self.cr0.value()),
            "CR1": hex24(self.cr1().value()),
            "CR2": hex24(self.cr2.value()),
            "CR3": hex24(self.cr3.value()),
            "CIR1": hex24(u32::from(self.cir.one.get())),
            "CIR2": hex24(u32::from(self.cir.two.get())),
            "DIR1": hex24(u32::from(self.dir.one.get())),
            "DIR2": hex24(u32::from(self.dir.two.get())),
            "CMEM": cmem,
            "DMEM": dmem,
        });
        report.to_string()
    }
}
