// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! A model of one core's PMU registers, for testing drivers without hardware.
//!
//! Unlike the plain register file in `arm_cp15::fake`, [`FakeCp15`] implements the side effects
//! the drivers rely on: PMSELR indexing, set/clear enable registers, write-one-to-clear overflow
//! flags and the counter reset bits of PMCR and PMNC. Counters only advance when [`FakeCp15::tick`]
//! is called. Every register access is recorded so tests can check the order of operations.

use crate::{
    counter::{CYCLE_COUNTER_INDEX, MAX_GENERIC_COUNTERS, counter_bit},
    registers::{Armv6Registers, Armv7Registers},
};
use arm_cp15::{Midr, Pmcr, Pmnc};

/// ARM11 event code which never counts.
const ARM11_NOP_EVENT: u8 = 0x20;

/// A register accessed through [`FakeCp15`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Register {
    /// Main ID Register.
    Midr,
    /// Performance Monitors Control Register.
    Pmcr,
    /// Event Counter Selection Register.
    Pmselr,
    /// Event Type Select Register.
    Pmxevtyper,
    /// Event Count Register.
    Pmxevcntr,
    /// Cycle Count Register.
    Pmccntr,
    /// Count Enable Set Register.
    Pmcntenset,
    /// Count Enable Clear Register.
    Pmcntenclr,
    /// Interrupt Enable Set Register.
    Pmintenset,
    /// Interrupt Enable Clear Register.
    Pmintenclr,
    /// Overflow Flag Status Register.
    Pmovsr,
    /// ARM11 Performance Monitor Control Register.
    Pmnc,
    /// ARM11 Cycle Counter Register.
    Ccnt,
    /// ARM11 Count Register 0.
    Pmn0,
    /// ARM11 Count Register 1.
    Pmn1,
}

/// One access made through [`FakeCp15`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Access {
    /// An instruction synchronization barrier.
    Isb,
    /// A register read.
    Read(Register),
    /// A register write of the given raw value.
    Write(Register, u32),
}

/// The register state of a [`FakeCp15`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FakeState {
    /// MIDR value.
    pub midr: Midr,
    /// Number of event counters implemented, reported in PMCR.N.
    pub counters: u8,
    /// Writable PMCR bits. The reset bits always read as zero.
    pub control: Pmcr,
    /// Counter selected by PMSELR.
    pub selected: u32,
    /// Event type of each event counter.
    pub event_types: [u32; MAX_GENERIC_COUNTERS],
    /// Value of each event counter.
    pub event_counts: [u32; MAX_GENERIC_COUNTERS],
    /// Value of PMCCNTR.
    pub cycle_count: u32,
    /// Enabled counters, as read from PMCNTENSET.
    pub enabled: u32,
    /// Enabled overflow interrupts, as read from PMINTENSET.
    pub interrupts: u32,
    /// Pending overflow flags.
    pub overflow: u32,
    /// ARM11 PMNC value. The reset bits always read as zero.
    pub pmnc: Pmnc,
    /// ARM11 count registers.
    pub pmn: [u32; 2],
    /// ARM11 cycle counter.
    pub ccnt: u32,
}

/// A fake core implementing both the ARMv7 and the ARM11 PMU registers.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FakeCp15 {
    state: FakeState,
    log: Vec<Access>,
}

impl FakeCp15 {
    /// Creates a core with the given MIDR value and number of ARMv7 event counters.
    pub fn new(midr: u32, counters: u8) -> Self {
        Self {
            state: FakeState {
                midr: Midr::from_bits_retain(midr),
                counters: counters.min(MAX_GENERIC_COUNTERS as u8),
                ..Default::default()
            },
            log: Vec::new(),
        }
    }

    /// Returns a copy of the register state.
    pub fn state(&self) -> FakeState {
        self.state.clone()
    }

    /// Returns the accesses made since the log was last taken, and empties the log.
    pub fn take_log(&mut self) -> Vec<Access> {
        core::mem::take(&mut self.log)
    }

    /// Returns the enabled counters.
    pub fn enabled(&self) -> u32 {
        self.state.enabled
    }

    /// Returns the enabled overflow interrupts.
    pub fn interrupts_enabled(&self) -> u32 {
        self.state.interrupts
    }

    /// Returns the pending overflow flags.
    pub fn overflow(&self) -> u32 {
        self.state.overflow
    }

    /// Raises the given overflow flags.
    pub fn set_overflow(&mut self, flags: u32) {
        let implemented = self.implemented();
        self.state.overflow |= flags & implemented;
    }

    /// Raises the given ARM11 overflow flags.
    pub fn set_pmnc_overflow(&mut self, flags: Pmnc) {
        self.state.pmnc |= flags & Pmnc::OVERFLOW;
    }

    /// Returns the event type of event counter `index`.
    pub fn event_type(&self, index: usize) -> u32 {
        self.state.event_types.get(index).copied().unwrap_or(0)
    }

    /// Returns the value of event counter `index`.
    pub fn event_count(&self, index: usize) -> u32 {
        self.state.event_counts.get(index).copied().unwrap_or(0)
    }

    /// Sets the value of event counter `index`.
    pub fn set_event_count(&mut self, index: usize, value: u32) {
        if let Some(count) = self.state.event_counts.get_mut(index) {
            *count = value;
        }
    }

    /// Advances every running counter by `delta` cycles.
    ///
    /// A cycle counter advances by `delta`; an event counter advances by `delta` times its event
    /// code, so that tests can tell counters apart. ARM11 counters programmed with the NOP event
    /// don't advance. Counters which wrap raise their overflow flag.
    pub fn tick(&mut self, delta: u32) {
        let state = &mut self.state;
        if state.control.contains(Pmcr::E) {
            for index in 0..usize::from(state.counters) {
                if state.enabled & (1 << index) != 0 {
                    let (count, wrapped) = state.event_counts[index]
                        .overflowing_add(delta.wrapping_mul(state.event_types[index]));
                    state.event_counts[index] = count;
                    if wrapped {
                        state.overflow |= 1 << index;
                    }
                }
            }
            if state.enabled & counter_bit(CYCLE_COUNTER_INDEX) != 0 {
                let (count, wrapped) = state.cycle_count.overflowing_add(delta);
                state.cycle_count = count;
                if wrapped {
                    state.overflow |= counter_bit(CYCLE_COUNTER_INDEX);
                }
            }
        }

        if state.pmnc.contains(Pmnc::E) {
            let (count, wrapped) = state.ccnt.overflowing_add(delta);
            state.ccnt = count;
            if wrapped {
                state.pmnc |= Pmnc::CCR;
            }
            let events = [state.pmnc.evt_count0(), state.pmnc.evt_count1()];
            let flags = [Pmnc::CR0, Pmnc::CR1];
            for ((count, event), flag) in state.pmn.iter_mut().zip(events).zip(flags) {
                if event == ARM11_NOP_EVENT {
                    continue;
                }
                let (value, wrapped) = count.overflowing_add(delta.wrapping_mul(event.into()));
                *count = value;
                if wrapped {
                    state.pmnc |= flag;
                }
            }
        }
    }

    /// Returns the bits of the counters the core implements, including the cycle counter.
    fn implemented(&self) -> u32 {
        counter_bit(self.state.counters.into()).wrapping_sub(1) | counter_bit(CYCLE_COUNTER_INDEX)
    }

    /// Returns the selected event counter, if it is implemented.
    fn selected(&self) -> Option<usize> {
        let index = self.state.selected as usize;
        (index < usize::from(self.state.counters)).then_some(index)
    }

    fn read(&mut self, register: Register) {
        self.log.push(Access::Read(register));
    }

    fn write(&mut self, register: Register, value: u32) {
        self.log.push(Access::Write(register, value));
    }
}

impl Armv7Registers for FakeCp15 {
    fn read_midr(&mut self) -> Midr {
        self.read(Register::Midr);
        self.state.midr
    }

    fn read_pmcr(&mut self) -> Pmcr {
        self.read(Register::Pmcr);
        Pmcr::from_bits_retain(
            self.state.control.bits() | (u32::from(self.state.counters) << Pmcr::N_SHIFT),
        )
    }

    fn write_pmcr(&mut self, value: Pmcr) {
        self.write(Register::Pmcr, value.bits());
        let value = value.writable();
        if value.contains(Pmcr::P) {
            self.state.event_counts = [0; MAX_GENERIC_COUNTERS];
        }
        if value.contains(Pmcr::C) {
            self.state.cycle_count = 0;
        }
        self.state.control = value - Pmcr::P - Pmcr::C;
    }

    fn write_pmselr(&mut self, value: u32) {
        self.write(Register::Pmselr, value);
        self.state.selected = value & 0x1f;
    }

    fn write_pmxevtyper(&mut self, value: u32) {
        self.write(Register::Pmxevtyper, value);
        if let Some(index) = self.selected() {
            self.state.event_types[index] = value;
        }
    }

    fn read_pmxevcntr(&mut self) -> u32 {
        self.read(Register::Pmxevcntr);
        self.selected()
            .map_or(0, |index| self.state.event_counts[index])
    }

    fn write_pmxevcntr(&mut self, value: u32) {
        self.write(Register::Pmxevcntr, value);
        if let Some(index) = self.selected() {
            self.state.event_counts[index] = value;
        }
    }

    fn read_pmccntr(&mut self) -> u32 {
        self.read(Register::Pmccntr);
        self.state.cycle_count
    }

    fn write_pmccntr(&mut self, value: u32) {
        self.write(Register::Pmccntr, value);
        self.state.cycle_count = value;
    }

    fn write_pmcntenset(&mut self, value: u32) {
        self.write(Register::Pmcntenset, value);
        let implemented = self.implemented();
        self.state.enabled |= value & implemented;
    }

    fn write_pmcntenclr(&mut self, value: u32) {
        self.write(Register::Pmcntenclr, value);
        self.state.enabled &= !value;
    }

    fn write_pmintenset(&mut self, value: u32) {
        self.write(Register::Pmintenset, value);
        let implemented = self.implemented();
        self.state.interrupts |= value & implemented;
    }

    fn write_pmintenclr(&mut self, value: u32) {
        self.write(Register::Pmintenclr, value);
        self.state.interrupts &= !value;
    }

    fn read_pmovsr(&mut self) -> u32 {
        self.read(Register::Pmovsr);
        self.state.overflow
    }

    fn write_pmovsr(&mut self, value: u32) {
        self.write(Register::Pmovsr, value);
        self.state.overflow &= !value;
    }

    fn isb(&mut self) {
        self.log.push(Access::Isb);
    }
}

impl Armv6Registers for FakeCp15 {
    fn read_pmnc(&mut self) -> Pmnc {
        self.read(Register::Pmnc);
        self.state.pmnc
    }

    fn write_pmnc(&mut self, value: Pmnc) {
        self.write(Register::Pmnc, value.bits());
        if value.contains(Pmnc::P) {
            self.state.pmn = [0; 2];
        }
        if value.contains(Pmnc::C) {
            self.state.ccnt = 0;
        }
        let pending = self
            .state
            .pmnc
            .intersection(Pmnc::OVERFLOW)
            .difference(value);
        self.state.pmnc = value
            .difference(Pmnc::P | Pmnc::C | Pmnc::OVERFLOW)
            .union(pending);
    }

    fn read_ccnt(&mut self) -> u32 {
        self.read(Register::Ccnt);
        self.state.ccnt
    }

    fn read_pmn0(&mut self) -> u32 {
        self.read(Register::Pmn0);
        self.state.pmn[0]
    }

    fn read_pmn1(&mut self) -> u32 {
        self.read(Register::Pmn1);
        self.state.pmn[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enable_limited_to_implemented_counters() {
        let mut regs = FakeCp15::new(0, 2);
        regs.write_pmcntenset(0xffff_ffff);
        assert_eq!(regs.enabled(), 0x8000_0003);
        regs.write_pmintenset(0xffff_ffff);
        assert_eq!(regs.interrupts_enabled(), 0x8000_0003);
    }

    #[test]
    fn unimplemented_counter_reads_zero() {
        let mut regs = FakeCp15::new(0, 2);
        regs.write_pmselr(5);
        regs.write_pmxevcntr(42);
        assert_eq!(regs.read_pmxevcntr(), 0);
    }

    #[test]
    fn counters_only_run_when_enabled() {
        let mut regs = FakeCp15::new(0, 4);
        regs.write_pmselr(1);
        regs.write_pmxevtyper(3);
        regs.write_pmcntenset(0b10);
        regs.tick(5);
        assert_eq!(regs.event_count(1), 0);

        regs.write_pmcr(Pmcr::E);
        regs.tick(5);
        assert_eq!(regs.event_count(1), 15);
        assert_eq!(regs.read_pmccntr(), 0);
    }

    #[test]
    fn wrap_raises_overflow() {
        let mut regs = FakeCp15::new(0, 1);
        regs.write_pmcntenset(counter_bit(CYCLE_COUNTER_INDEX));
        regs.write_pmccntr(u32::MAX);
        regs.write_pmcr(Pmcr::E);
        regs.tick(2);
        assert_eq!(regs.read_pmccntr(), 1);
        assert_eq!(regs.overflow(), counter_bit(CYCLE_COUNTER_INDEX));
        regs.write_pmovsr(counter_bit(CYCLE_COUNTER_INDEX));
        assert_eq!(regs.overflow(), 0);
    }

    #[test]
    fn pmnc_overflow_write_one_to_clear() {
        let mut regs = FakeCp15::new(0, 0);
        regs.set_pmnc_overflow(Pmnc::CR0 | Pmnc::CCR);
        regs.write_pmnc(Pmnc::CR0);
        assert_eq!(regs.read_pmnc(), Pmnc::CCR);
    }
}
