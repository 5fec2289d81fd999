// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! The CP15 registers used by the PMU drivers, behind traits so that drivers can be tested
//! against a model of the hardware.

use arm_cp15::{Midr, Pmcr, Pmnc};

/// The ARMv7 identification and performance monitor registers of the current CPU.
pub trait Armv7Registers {
    /// Reads MIDR.
    fn read_midr(&mut self) -> Midr;

    /// Reads PMCR.
    fn read_pmcr(&mut self) -> Pmcr;

    /// Writes PMCR.
    fn write_pmcr(&mut self, value: Pmcr);

    /// Writes PMSELR, selecting the counter addressed by PMXEVTYPER and PMXEVCNTR.
    fn write_pmselr(&mut self, value: u32);

    /// Writes the event type of the selected counter.
    fn write_pmxevtyper(&mut self, value: u32);

    /// Reads the selected event counter.
    fn read_pmxevcntr(&mut self) -> u32;

    /// Writes the selected event counter.
    fn write_pmxevcntr(&mut self, value: u32);

    /// Reads the cycle counter.
    fn read_pmccntr(&mut self) -> u32;

    /// Writes the cycle counter.
    fn write_pmccntr(&mut self, value: u32);

    /// Enables the counters whose bits are set in `value`.
    fn write_pmcntenset(&mut self, value: u32);

    /// Disables the counters whose bits are set in `value`.
    fn write_pmcntenclr(&mut self, value: u32);

    /// Enables overflow interrupts for the counters whose bits are set in `value`.
    fn write_pmintenset(&mut self, value: u32);

    /// Disables overflow interrupts for the counters whose bits are set in `value`.
    fn write_pmintenclr(&mut self, value: u32);

    /// Reads the overflow flags.
    fn read_pmovsr(&mut self) -> u32;

    /// Clears the overflow flags whose bits are set in `value`.
    fn write_pmovsr(&mut self, value: u32);

    /// Issues an instruction synchronization barrier.
    fn isb(&mut self);
}

/// The ARM11 performance monitor registers of the current CPU.
pub trait Armv6Registers {
    /// Reads PMNC.
    fn read_pmnc(&mut self) -> Pmnc;

    /// Writes PMNC.
    fn write_pmnc(&mut self, value: Pmnc);

    /// Reads the cycle counter.
    fn read_ccnt(&mut self) -> u32;

    /// Reads count register 0.
    fn read_pmn0(&mut self) -> u32;

    /// Reads count register 1.
    fn read_pmn1(&mut self) -> u32;
}

/// Direct access to the CP15 registers of the CPU the caller is running on.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Cp15;

impl Armv7Registers for Cp15 {
    fn read_midr(&mut self) -> Midr {
        arm_cp15::read_midr()
    }

    fn read_pmcr(&mut self) -> Pmcr {
        arm_cp15::read_pmcr()
    }

    fn write_pmcr(&mut self, value: Pmcr) {
        arm_cp15::write_pmcr(value);
    }

    fn write_pmselr(&mut self, value: u32) {
        arm_cp15::write_pmselr(value);
    }

    fn write_pmxevtyper(&mut self, value: u32) {
        arm_cp15::write_pmxevtyper(value);
    }

    fn read_pmxevcntr(&mut self) -> u32 {
        arm_cp15::read_pmxevcntr()
    }

    fn write_pmxevcntr(&mut self, value: u32) {
        arm_cp15::write_pmxevcntr(value);
    }

    fn read_pmccntr(&mut self) -> u32 {
        arm_cp15::read_pmccntr()
    }

    fn write_pmccntr(&mut self, value: u32) {
        arm_cp15::write_pmccntr(value);
    }

    fn write_pmcntenset(&mut self, value: u32) {
        arm_cp15::write_pmcntenset(value);
    }

    fn write_pmcntenclr(&mut self, value: u32) {
        arm_cp15::write_pmcntenclr(value);
    }

    fn write_pmintenset(&mut self, value: u32) {
        arm_cp15::write_pmintenset(value);
    }

    fn write_pmintenclr(&mut self, value: u32) {
        arm_cp15::write_pmintenclr(value);
    }

    fn read_pmovsr(&mut self) -> u32 {
        arm_cp15::read_pmovsr()
    }

    fn write_pmovsr(&mut self, value: u32) {
        arm_cp15::write_pmovsr(value);
    }

    fn isb(&mut self) {
        arm_cp15::isb();
    }
}

impl Armv6Registers for Cp15 {
    fn read_pmnc(&mut self) -> Pmnc {
        arm_cp15::read_pmnc()
    }

    fn write_pmnc(&mut self, value: Pmnc) {
        arm_cp15::write_pmnc(value);
    }

    fn read_ccnt(&mut self) -> u32 {
        arm_cp15::read_ccnt()
    }

    fn read_pmn0(&mut self) -> u32 {
        arm_cp15::read_pmn0()
    }

    fn read_pmn1(&mut self) -> u32 {
        arm_cp15::read_pmn1()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip::{PartNum, detect};
    use arm_cp15::fake::CP15;
    use std::sync::Mutex;

    /// Serialises tests which use the shared fake register file.
    static LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn cp15_forwards_to_registers() {
        let _guard = LOCK.lock().unwrap();
        {
            let mut regs = CP15.lock().unwrap();
            regs.reset();
            regs.midr = Midr::from_bits_retain(0x410f_d034);
            regs.pmcr = Pmcr::from_bits_retain(6 << Pmcr::N_SHIFT);
            regs.pmccntr = 1234;
        }

        let mut cp15 = Cp15;
        assert_eq!(detect(&mut cp15), PartNum(0xd03));
        assert_eq!(cp15.read_pmcr().counters(), 6);
        assert_eq!(cp15.read_pmccntr(), 1234);

        cp15.write_pmselr(2);
        cp15.write_pmxevtyper(0x08);
        cp15.write_pmcntenset(1 << 2);
        {
            let regs = CP15.lock().unwrap();
            assert_eq!(regs.pmselr, 2);
            assert_eq!(regs.pmxevtyper, 0x08);
            assert_eq!(regs.pmcntenset, 1 << 2);
        }

        cp15.write_pmnc(Pmnc::E.with_evt_counts(0x07, 0x20));
        assert_eq!(cp15.read_pmnc().evt_count0(), 0x07);
        CP15.lock().unwrap().reset();
    }
}
