// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Access to the AArch32 CP15 identification and performance monitor registers.
//!
//! Every accessor compiles to a single `mrc` or `mcr` instruction. Unit tests and builds with
//! the `fakes` feature instead use the register file in [`fake`].

#![cfg_attr(not(any(test, feature = "fakes")), no_std)]

#[cfg(all(not(target_arch = "arm"), not(any(test, feature = "fakes"))))]
compile_error!("CP15 registers are only available on 32-bit Arm; enable `fakes` to build elsewhere");

#[cfg(not(any(test, feature = "fakes")))]
mod arm;
#[cfg(any(test, feature = "fakes"))]
pub mod fake;
mod macros;

use bitflags::bitflags;
use core::fmt::{self, Debug, Formatter};

#[doc(hidden)]
pub use paste as _paste;

/// MIDR (Main ID Register) value.
#[derive(Clone, Copy, Default, Eq, PartialEq)]
#[repr(transparent)]
pub struct Midr(u32);

impl Midr {
    /// Position of the lowest bit in the Revision field.
    pub const REVISION_SHIFT: u32 = 0;
    /// Mask for the Revision field.
    pub const REVISION_MASK: u32 = 0xf;
    /// Position of the lowest bit in the PartNum field.
    pub const PART_NUM_SHIFT: u32 = 4;
    /// Mask for the PartNum field.
    pub const PART_NUM_MASK: u32 = 0xfff;
    /// Position of the lowest bit in the Variant field.
    pub const VARIANT_SHIFT: u32 = 20;
    /// Mask for the Variant field.
    pub const VARIANT_MASK: u32 = 0xf;
    /// Position of the lowest bit in the Implementer field.
    pub const IMPLEMENTER_SHIFT: u32 = 24;
    /// Mask for the Implementer field.
    pub const IMPLEMENTER_MASK: u32 = 0xff;

    /// Creates a `Midr` from a raw register value.
    pub const fn from_bits_retain(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw register value.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns the primary part number, bits [15:4].
    pub const fn part_num(self) -> u16 {
        ((self.0 >> Self::PART_NUM_SHIFT) & Self::PART_NUM_MASK) as u16
    }

    /// Returns the implementer code, bits [31:24].
    pub const fn implementer(self) -> u8 {
        ((self.0 >> Self::IMPLEMENTER_SHIFT) & Self::IMPLEMENTER_MASK) as u8
    }

    /// Returns the major revision, bits [23:20].
    pub const fn variant(self) -> u8 {
        ((self.0 >> Self::VARIANT_SHIFT) & Self::VARIANT_MASK) as u8
    }

    /// Returns the minor revision, bits [3:0].
    pub const fn revision(self) -> u8 {
        ((self.0 >> Self::REVISION_SHIFT) & Self::REVISION_MASK) as u8
    }
}

impl Debug for Midr {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Midr({:#010x})", self.0)
    }
}

bitflags! {
    /// PMCR (Performance Monitors Control Register) value.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[repr(transparent)]
    pub struct Pmcr: u32 {
        /// Enable all counters.
        const E = 1 << 0;
        /// Reset all event counters to zero.
        const P = 1 << 1;
        /// Reset the cycle counter to zero.
        const C = 1 << 2;
        /// Cycle counter counts every 64th clock cycle.
        const D = 1 << 3;
        /// Export events to an external monitoring block.
        const X = 1 << 4;
        /// Disable the cycle counter while event counting is prohibited.
        const DP = 1 << 5;
    }
}

impl Pmcr {
    /// Position of the lowest bit in the N field.
    pub const N_SHIFT: u32 = 11;
    /// Mask for the N field.
    pub const N_MASK: u32 = 0x1f;

    /// Returns the number of event counters implemented, excluding the cycle counter.
    pub const fn counters(self) -> u8 {
        ((self.bits() >> Self::N_SHIFT) & Self::N_MASK) as u8
    }

    /// Returns only the bits software is allowed to write, bits [5:0].
    pub const fn writable(self) -> Self {
        self.intersection(Self::all())
    }
}

bitflags! {
    /// PMNC (ARM11 Performance Monitor Control Register) value.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[repr(transparent)]
    pub struct Pmnc: u32 {
        /// Enable all three counters.
        const E = 1 << 0;
        /// Reset both count registers to zero.
        const P = 1 << 1;
        /// Reset the cycle counter to zero.
        const C = 1 << 2;
        /// Cycle counter counts every 64th clock cycle.
        const D = 1 << 3;
        /// Interrupt on count register 0 overflow.
        const EC0 = 1 << 4;
        /// Interrupt on count register 1 overflow.
        const EC1 = 1 << 5;
        /// Interrupt on cycle counter overflow.
        const ECC = 1 << 6;
        /// Count register 0 overflowed. Write one to clear.
        const CR0 = 1 << 8;
        /// Count register 1 overflowed. Write one to clear.
        const CR1 = 1 << 9;
        /// Cycle counter overflowed. Write one to clear.
        const CCR = 1 << 10;
        /// Export events to the ETM.
        const X = 1 << 11;
    }
}

impl Pmnc {
    /// Position of the lowest bit in the EvtCount1 field.
    pub const EVT_COUNT1_SHIFT: u32 = 12;
    /// Position of the lowest bit in the EvtCount0 field.
    pub const EVT_COUNT0_SHIFT: u32 = 20;
    /// Mask for the EvtCount fields.
    pub const EVT_COUNT_MASK: u32 = 0xff;

    /// All overflow flags.
    pub const OVERFLOW: Self = Self::CR0.union(Self::CR1).union(Self::CCR);
    /// All overflow interrupt enables.
    pub const INTERRUPT_ENABLES: Self = Self::EC0.union(Self::EC1).union(Self::ECC);

    /// Returns the event counted by count register 0.
    pub const fn evt_count0(self) -> u8 {
        ((self.bits() >> Self::EVT_COUNT0_SHIFT) & Self::EVT_COUNT_MASK) as u8
    }

    /// Returns the event counted by count register 1.
    pub const fn evt_count1(self) -> u8 {
        ((self.bits() >> Self::EVT_COUNT1_SHIFT) & Self::EVT_COUNT_MASK) as u8
    }

    /// Returns a copy of `self` with both EvtCount fields replaced.
    pub const fn with_evt_counts(self, evt_count0: u8, evt_count1: u8) -> Self {
        let mask = (Self::EVT_COUNT_MASK << Self::EVT_COUNT0_SHIFT)
            | (Self::EVT_COUNT_MASK << Self::EVT_COUNT1_SHIFT);
        Self::from_bits_retain(
            (self.bits() & !mask)
                | ((evt_count0 as u32) << Self::EVT_COUNT0_SHIFT)
                | ((evt_count1 as u32) << Self::EVT_COUNT1_SHIFT),
        )
    }
}

/// Issues an instruction synchronization barrier.
///
/// ARMv7 has a dedicated `isb` instruction; ARMv6 uses the equivalent CP15 c7 operation.
pub fn isb() {
    #[cfg(all(target_feature = "v7", not(any(test, feature = "fakes"))))]
    // SAFETY: `isb` does not violate safe Rust guarantees.
    unsafe {
        core::arch::asm!("isb", options(nostack, preserves_flags));
    }
    #[cfg(all(not(target_feature = "v7"), not(any(test, feature = "fakes"))))]
    // SAFETY: The CP15 c7, c5, 4 flush prefetch buffer operation does not violate safe Rust
    // guarantees.
    unsafe {
        core::arch::asm!(
            "mcr p15, 0, {zero}, c7, c5, 4",
            options(nostack, preserves_flags),
            zero = in(reg) 0u32,
        );
    }
}

read_sysreg!(midr: [p15, 0, c0, c0, 0], u32: Midr);

read_write_sysreg!(pmcr: [p15, 0, c9, c12, 0], u32: Pmcr);
write_sysreg!(pmcntenset: [p15, 0, c9, c12, 1], u32);
write_sysreg!(pmcntenclr: [p15, 0, c9, c12, 2], u32);
read_write_sysreg!(pmovsr: [p15, 0, c9, c12, 3], u32);
write_sysreg!(pmselr: [p15, 0, c9, c12, 5], u32);
read_write_sysreg!(pmccntr: [p15, 0, c9, c13, 0], u32);
write_sysreg!(pmxevtyper: [p15, 0, c9, c13, 1], u32);
read_write_sysreg!(pmxevcntr: [p15, 0, c9, c13, 2], u32);
write_sysreg!(pmintenset: [p15, 0, c9, c14, 1], u32);
write_sysreg!(pmintenclr: [p15, 0, c9, c14, 2], u32);

read_write_sysreg!(pmnc: [p15, 0, c15, c12, 0], u32: Pmnc);
read_write_sysreg!(ccnt: [p15, 0, c15, c12, 1], u32);
read_write_sysreg!(pmn0: [p15, 0, c15, c12, 2], u32);
read_write_sysreg!(pmn1: [p15, 0, c15, c12, 3], u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midr_fields() {
        // Cortex-A7 r0p5.
        let midr = Midr::from_bits_retain(0x410f_c075);
        assert_eq!(midr.implementer(), 0x41);
        assert_eq!(midr.variant(), 0);
        assert_eq!(midr.part_num(), 0xc07);
        assert_eq!(midr.revision(), 5);
        assert_eq!(format!("{midr:?}"), "Midr(0x410fc075)");
    }

    #[test]
    fn pmcr_counters_and_writable() {
        let pmcr = Pmcr::from_bits_retain(0x4107_2000 | 0x3f);
        assert_eq!(pmcr.counters(), 4);
        assert_eq!(pmcr.writable().bits(), 0x3f);
        assert_eq!(
            format!("{:?}", Pmcr::E | Pmcr::C),
            "Pmcr(E | C)"
        );
    }

    #[test]
    fn pmnc_event_fields() {
        let pmnc = (Pmnc::E | Pmnc::CR1).with_evt_counts(0x07, 0xff);
        assert_eq!(pmnc.evt_count0(), 0x07);
        assert_eq!(pmnc.evt_count1(), 0xff);
        assert!(pmnc.contains(Pmnc::E | Pmnc::CR1));

        let pmnc = pmnc.with_evt_counts(0x20, 0x20);
        assert_eq!(pmnc.evt_count0(), 0x20);
        assert_eq!(pmnc.evt_count1(), 0x20);
        assert!(pmnc.contains(Pmnc::E | Pmnc::CR1));
    }

    #[test]
    fn fake_registers() {
        let mut regs = fake::CP15.lock().unwrap();
        regs.reset();
        regs.midr = Midr::from_bits_retain(0x410f_c0f4);
        drop(regs);

        assert_eq!(read_midr().part_num(), 0xc0f);
        write_pmselr(3);
        write_pmxevtyper(0x11);
        assert_eq!(fake::CP15.lock().unwrap().pmselr, 3);
        assert_eq!(fake::CP15.lock().unwrap().pmxevtyper, 0x11);
        fake::CP15.lock().unwrap().reset();
    }
}
