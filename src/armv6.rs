// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Driver for the ARM11 family PMU, used for cores which predate the ARMv7 Performance Monitors
//! Extension.
//!
//! The ARM11 PMU has two event counters and a cycle counter, all controlled through PMNC. There
//! is no per-counter enable, so an unused event counter is programmed to count [`NOP_EVENT`].

use crate::{
    chip::{ChipBinding, Microarch, PartNum, lookup},
    counter::{CounterSlot, PollValues, split_slots},
    events::ARM11_EVENTS,
    pmu::CpuPmuHw,
    registers::Armv6Registers,
};
use arm_cp15::Pmnc;
use log::{debug, info};

/// Event code which never counts.
pub const NOP_EVENT: u8 = 0x20;

/// Number of event counters.
const GENERIC_COUNTERS: usize = 2;

/// Cores driven by the ARM11 PMU driver.
pub static CHIPS: [ChipBinding; 4] = [
    ChipBinding::new(Microarch::Arm1136, &ARM11_EVENTS, "ARM1136"),
    ChipBinding::new(Microarch::Arm1156, &ARM11_EVENTS, "ARM1156"),
    ChipBinding::new(Microarch::Arm1176, &ARM11_EVENTS, "ARM1176"),
    ChipBinding::new(Microarch::Arm11MpCore, &ARM11_EVENTS, "ARM11 MPCore"),
];

/// The PMU of an ARM11 core.
#[derive(Debug)]
pub struct Armv6Pmu<R> {
    regs: R,
    chip: &'static ChipBinding,
}

impl<R: Armv6Registers> Armv6Pmu<R> {
    /// Name of the driver.
    pub const NAME: &'static str = "armv6_pmu";

    /// Binds the PMU reached through `regs`, if `part_num` is an ARM11 core.
    pub fn init(part_num: PartNum, regs: R) -> Option<Self> {
        let Some(chip) = lookup(&CHIPS, part_num) else {
            debug!("Part number {part_num} is not an ARM11 core");
            return None;
        };
        info!(
            "{} PMU: {} counters including the cycle counter",
            chip.cpu_name(),
            GENERIC_COUNTERS + 1
        );
        Some(Self { regs, chip })
    }

    /// Returns the registers the PMU was bound with.
    pub fn into_inner(self) -> R {
        self.regs
    }

    /// Returns a mutable reference to the registers the PMU was bound with.
    pub fn regs_mut(&mut self) -> &mut R {
        &mut self.regs
    }

    /// Stops all counters, zeroes them, clears pending overflows and disables overflow
    /// interrupts.
    pub fn reset_all(&mut self) {
        debug!("Resetting ARM11 counters");
        self.regs.write_pmnc(
            (Pmnc::P | Pmnc::C | Pmnc::OVERFLOW).with_evt_counts(NOP_EVENT, NOP_EVENT),
        );
    }
}

impl<R: Armv6Registers> CpuPmuHw for Armv6Pmu<R> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn chip(&self) -> &'static ChipBinding {
        self.chip
    }

    fn counter_count(&self) -> usize {
        GENERIC_COUNTERS + 1
    }

    fn start(&mut self, slots: &[CounterSlot]) {
        self.reset_all();
        let Some((generic, _)) = split_slots(slots) else {
            return;
        };
        let mut events = [NOP_EVENT; GENERIC_COUNTERS];
        for (event, slot) in events.iter_mut().zip(generic) {
            if slot.is_polling() {
                *event = u8::try_from(slot.event).unwrap_or(NOP_EVENT);
            }
        }
        debug!("Starting ARM11 counters with events {events:02x?}");
        self.regs
            .write_pmnc(Pmnc::E.with_evt_counts(events[0], events[1]));
    }

    fn stop(&mut self, _count: usize) {
        self.reset_all();
    }

    fn poll(&mut self, slots: &[CounterSlot]) -> PollValues {
        let mut values = PollValues::new();
        if let Some((generic, cycle)) = split_slots(slots) {
            for (index, slot) in generic.iter().take(GENERIC_COUNTERS).enumerate() {
                if slot.is_polling() {
                    values.push(if index == 0 {
                        self.regs.read_pmn0()
                    } else {
                        self.regs.read_pmn1()
                    });
                }
            }
            if cycle.is_polling() {
                values.push(self.regs.read_ccnt());
            }
        }
        // Overflow flags read as set are cleared by writing them back.
        let pmnc = self.regs.read_pmnc();
        self.regs.write_pmnc(pmnc | Pmnc::P | Pmnc::C | Pmnc::E);
        values
    }
}
