// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

use crate::{
    counter::{CYCLE_COUNTER_INDEX, counter_bit},
    registers::Armv7Registers,
};
use arm_cp15::Pmcr;

/// Counter-level operations built from the raw ARMv7 PMU registers.
///
/// Event counters are reached indirectly through PMSELR, so every access to PMXEVTYPER or
/// PMXEVCNTR is preceded by a selection and a barrier. Index [`CYCLE_COUNTER_INDEX`] addresses
/// PMCCNTR directly.
#[derive(Debug)]
pub struct Armv7Access<R> {
    regs: R,
}

impl<R: Armv7Registers> Armv7Access<R> {
    /// Wraps the given registers.
    pub const fn new(regs: R) -> Self {
        Self { regs }
    }

    /// Returns the wrapped registers.
    pub fn into_inner(self) -> R {
        self.regs
    }

    /// Returns a mutable reference to the wrapped registers.
    pub fn regs_mut(&mut self) -> &mut R {
        &mut self.regs
    }

    /// Makes `index` the counter addressed by PMXEVTYPER and PMXEVCNTR.
    pub fn select_counter(&mut self, index: u32) {
        self.regs.write_pmselr(index);
        self.regs.isb();
    }

    /// Sets the event counted by counter `index`.
    pub fn select_event_type(&mut self, index: u32, event: u32) {
        self.select_counter(index);
        self.regs.write_pmxevtyper(event);
    }

    /// Reads counter `index`.
    pub fn read_count(&mut self, index: u32) -> u32 {
        if index == CYCLE_COUNTER_INDEX {
            self.regs.read_pmccntr()
        } else {
            self.select_counter(index);
            self.regs.read_pmxevcntr()
        }
    }

    /// Sets counter `index` to `value`.
    pub fn write_count(&mut self, index: u32, value: u32) {
        if index == CYCLE_COUNTER_INDEX {
            self.regs.write_pmccntr(value);
        } else {
            self.select_counter(index);
            self.regs.write_pmxevcntr(value);
        }
    }

    /// Starts counter `index` counting.
    pub fn enable_count(&mut self, index: u32) {
        self.regs.write_pmcntenset(counter_bit(index));
    }

    /// Stops counter `index` counting.
    pub fn disable_count(&mut self, index: u32) {
        self.regs.write_pmcntenclr(counter_bit(index));
    }

    /// Enables the overflow interrupt of counter `index`.
    pub fn enable_interrupt(&mut self, index: u32) {
        self.regs.write_pmintenset(counter_bit(index));
    }

    /// Disables the overflow interrupt of counter `index`.
    pub fn disable_interrupt(&mut self, index: u32) {
        self.regs.write_pmintenclr(counter_bit(index));
    }

    /// Returns the overflow flags, clearing those which were set.
    pub fn read_and_clear_overflow(&mut self) -> u32 {
        let overflow = self.regs.read_pmovsr();
        self.regs.write_pmovsr(overflow);
        overflow
    }

    /// Reads PMCR.
    pub fn read_control(&mut self) -> Pmcr {
        self.regs.read_pmcr()
    }

    /// Writes the software-writable bits of `value` to PMCR.
    pub fn write_control(&mut self, value: Pmcr) {
        let value = value.writable();
        self.regs.isb();
        self.regs.write_pmcr(value);
    }

    /// Returns the number of event counters implemented, excluding the cycle counter.
    pub fn hardware_counter_count(&mut self) -> u8 {
        self.read_control().counters()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{Access, FakeCp15, Register};

    fn access(counters: u8) -> Armv7Access<FakeCp15> {
        Armv7Access::new(FakeCp15::new(0x410f_c075, counters))
    }

    #[test]
    fn select_then_barrier_then_access() {
        let mut pmu = access(4);
        pmu.select_event_type(2, 0x11);
        pmu.read_count(2);
        assert_eq!(
            pmu.regs_mut().take_log(),
            [
                Access::Write(Register::Pmselr, 2),
                Access::Isb,
                Access::Write(Register::Pmxevtyper, 0x11),
                Access::Write(Register::Pmselr, 2),
                Access::Isb,
                Access::Read(Register::Pmxevcntr),
            ]
        );
    }

    #[test]
    fn cycle_counter_is_not_selected() {
        let mut pmu = access(4);
        pmu.write_count(CYCLE_COUNTER_INDEX, 77);
        assert_eq!(pmu.read_count(CYCLE_COUNTER_INDEX), 77);
        assert_eq!(
            pmu.regs_mut().take_log(),
            [
                Access::Write(Register::Pmccntr, 77),
                Access::Read(Register::Pmccntr),
            ]
        );
    }

    #[test]
    fn event_counter_read_write() {
        let mut pmu = access(4);
        pmu.write_count(1, 500);
        pmu.write_count(3, 9);
        assert_eq!(pmu.read_count(1), 500);
        assert_eq!(pmu.read_count(3), 9);
        assert_eq!(pmu.read_count(0), 0);
    }

    #[test]
    fn enable_and_disable_bits() {
        let mut pmu = access(4);
        pmu.enable_count(0);
        pmu.enable_count(3);
        pmu.enable_count(CYCLE_COUNTER_INDEX);
        assert_eq!(pmu.regs_mut().enabled(), 0x8000_0009);
        pmu.disable_count(3);
        assert_eq!(pmu.regs_mut().enabled(), 0x8000_0001);

        pmu.enable_interrupt(1);
        pmu.enable_interrupt(2);
        pmu.disable_interrupt(1);
        assert_eq!(pmu.regs_mut().interrupts_enabled(), 1 << 2);
    }

    #[test]
    fn overflow_is_cleared_by_reading() {
        let mut pmu = access(4);
        pmu.regs_mut().set_overflow(0x8000_0005);
        assert_eq!(pmu.read_and_clear_overflow(), 0x8000_0005);
        assert_eq!(pmu.read_and_clear_overflow(), 0);
    }

    #[test]
    fn control_write_is_masked_and_fenced() {
        let mut pmu = access(6);
        pmu.write_control(Pmcr::from_bits_retain(0xffff_ffff));
        let log = pmu.regs_mut().take_log();
        assert_eq!(log[0], Access::Isb);
        assert_eq!(log[1], Access::Write(Register::Pmcr, Pmcr::all().bits()));
        assert_eq!(pmu.hardware_counter_count(), 6);
        assert!(pmu.read_control().contains(Pmcr::E | Pmcr::DP));
    }
}
