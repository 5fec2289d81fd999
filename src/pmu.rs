// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Detection of the CPU PMU and the interface the sampling engine drives it through.

#[cfg(feature = "legacy")]
use crate::armv6::Armv6Pmu;
use crate::{
    armv7::Armv7Pmu,
    chip::{CHIPS, ChipBinding, detect, lookup},
    counter::{CounterSlot, PollValues},
    error::PmuError,
    events::EventName,
    registers::{Armv6Registers, Armv7Registers, Cp15},
};
use log::{debug, warn};

/// Operations the sampling engine performs on a CPU PMU.
///
/// A counter configuration is a slice of [`CounterSlot`]s: the event counters in hardware index
/// order, followed by the cycle counter.
pub trait CpuPmuHw {
    /// Returns the name of the driver, such as `"armv7_pmu"`.
    ///
    /// This identifies the driver, not the CPU. Use [`CpuPmuHw::cpu_name`] for the display name
    /// of the detected core.
    fn name(&self) -> &'static str;

    /// Returns the binding of the detected CPU.
    fn chip(&self) -> &'static ChipBinding;

    /// Returns the number of counters, including the cycle counter.
    fn counter_count(&self) -> usize;

    /// Returns the display name of the detected CPU, such as `"Cortex-A7"`.
    fn cpu_name(&self) -> &'static str {
        self.chip().cpu_name()
    }

    /// Writes the truncated name of `event` into `out`.
    fn describe(&self, event: u32, out: Option<&mut EventName>) -> Result<(), PmuError> {
        self.chip().describe(event, out)
    }

    /// Checks that `event` may be assigned to slot `filled`, given the first `filled` slots.
    fn validate(&self, slots: &[CounterSlot], event: u32, filled: usize) -> Result<(), PmuError> {
        self.chip().validate(slots, event, filled)
    }

    /// Resets all counters, then starts the polling slots of `slots`.
    ///
    /// The configuration is assumed to have been validated.
    fn start(&mut self, slots: &[CounterSlot]);

    /// Stops and resets the first `count` counters, the last of which is the cycle counter.
    fn stop(&mut self, count: usize);

    /// Samples the polling slots of `slots` in order, then resets the counters and keeps them
    /// running.
    fn poll(&mut self, slots: &[CounterSlot]) -> PollValues;
}

/// The PMU driver bound to the current CPU.
#[derive(Debug)]
pub enum CpuPmu<R = Cp15> {
    /// A core with the ARMv7 Performance Monitors Extension.
    Armv7(Armv7Pmu<R>),
    /// An ARM11 core.
    #[cfg(feature = "legacy")]
    Armv6(Armv6Pmu<R>),
}

/// Detects the CPU and binds the matching PMU driver to it.
pub fn init<R: Armv7Registers + Armv6Registers>(mut regs: R) -> Result<CpuPmu<R>, PmuError> {
    let part_num = detect(&mut regs);
    if let Some(chip) = lookup(&CHIPS, part_num) {
        return Ok(CpuPmu::Armv7(Armv7Pmu::new(chip, regs)));
    }
    debug!("No ARMv7 PMU binding for part number {part_num}");
    #[cfg(feature = "legacy")]
    if let Some(pmu) = Armv6Pmu::init(part_num, regs) {
        return Ok(CpuPmu::Armv6(pmu));
    }
    warn!("Unsupported CPU part number {part_num}, PMU not available");
    Err(PmuError::UnsupportedHardware { part_num })
}

impl<R: Armv7Registers + Armv6Registers> CpuPmu<R> {
    fn driver(&self) -> &dyn CpuPmuHw {
        match self {
            Self::Armv7(pmu) => pmu,
            #[cfg(feature = "legacy")]
            Self::Armv6(pmu) => pmu,
        }
    }

    fn driver_mut(&mut self) -> &mut dyn CpuPmuHw {
        match self {
            Self::Armv7(pmu) => pmu,
            #[cfg(feature = "legacy")]
            Self::Armv6(pmu) => pmu,
        }
    }
}

impl<R: Armv7Registers + Armv6Registers> CpuPmuHw for CpuPmu<R> {
    fn name(&self) -> &'static str {
        self.driver().name()
    }

    fn chip(&self) -> &'static ChipBinding {
        self.driver().chip()
    }

    fn counter_count(&self) -> usize {
        self.driver().counter_count()
    }

    fn start(&mut self, slots: &[CounterSlot]) {
        self.driver_mut().start(slots);
    }

    fn stop(&mut self, count: usize) {
        self.driver_mut().stop(count);
    }

    fn poll(&mut self, slots: &[CounterSlot]) -> PollValues {
        self.driver_mut().poll(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{chip::PartNum, fake::FakeCp15};

    #[test]
    fn init_binds_each_armv7_chip() {
        for chip in &CHIPS {
            let midr = 0x4100_0000 | (u32::from(chip.microarch().part_num().0) << 4);
            let pmu = init(FakeCp15::new(midr, 6)).unwrap();
            assert!(matches!(pmu, CpuPmu::Armv7(_)));
            assert_eq!(pmu.name(), "armv7_pmu");
            assert_eq!(pmu.cpu_name(), chip.cpu_name());
            assert_eq!(pmu.chip(), chip);
            assert_eq!(pmu.counter_count(), 7);
        }
    }

    #[test]
    fn driver_name_differs_from_cpu_name() {
        let pmu = init(FakeCp15::new(0x410f_c075, 4)).unwrap();
        assert_eq!(pmu.name(), Armv7Pmu::<FakeCp15>::NAME);
        assert_eq!(pmu.cpu_name(), "Cortex-A7");
        assert_ne!(pmu.name(), pmu.cpu_name());
    }

    #[test]
    fn init_unsupported() {
        assert_eq!(
            init(FakeCp15::new(0x410f_c051, 2)).unwrap_err(),
            PmuError::UnsupportedHardware {
                part_num: PartNum(0xc05)
            }
        );
    }

    #[test]
    fn unsupported_error_message() {
        let error = PmuError::UnsupportedHardware {
            part_num: PartNum(0xc05),
        };
        assert_eq!(error.to_string(), "Unsupported CPU part number 0xc05");
    }

    #[cfg(feature = "legacy")]
    #[test]
    fn init_falls_back_to_arm11() {
        let pmu = init(FakeCp15::new(0x4107_b362, 0)).unwrap();
        assert!(matches!(pmu, CpuPmu::Armv6(_)));
        assert_eq!(pmu.name(), "armv6_pmu");
        assert_eq!(pmu.cpu_name(), "ARM1136");
        assert_eq!(pmu.counter_count(), 3);
    }

    #[test]
    fn scenario_through_dispatch() {
        let mut pmu = init(FakeCp15::new(0x410f_c0f2, 4)).unwrap();
        let slots = [
            CounterSlot::polling(0x08),
            CounterSlot::DISABLED,
            CounterSlot::polling(0x11),
            CounterSlot::DISABLED,
            CounterSlot::polling(0),
        ];
        for (filled, slot) in slots.iter().enumerate() {
            if slot.is_polling() && filled < slots.len() - 1 {
                pmu.validate(&slots, slot.event, filled).unwrap();
            }
        }
        pmu.start(&slots);
        let CpuPmu::Armv7(inner) = &mut pmu else {
            panic!("expected an ARMv7 PMU");
        };
        inner.access().regs_mut().tick(1);
        assert_eq!(pmu.poll(&slots).as_slice(), [0x08, 0x11, 1]);

        let mut name = EventName::default();
        pmu.describe(0x11, Some(&mut name)).unwrap();
        assert_eq!(name.as_str(), "Cycle count");

        pmu.stop(slots.len());
        pmu.stop(slots.len());
        assert_eq!(pmu.poll(&[]).len(), 0);
    }

    #[test]
    fn validate_examples() {
        let pmu = init(FakeCp15::new(0x410f_c075, 4)).unwrap();
        assert_eq!(
            pmu.validate(&[CounterSlot::polling(0x08)], 0x08, 1),
            Err(PmuError::DuplicateEvent {
                event: 0x08,
                counter: 0
            })
        );
        assert_eq!(
            pmu.validate(&[], 0x99, 0),
            Err(PmuError::UnknownEvent(0x99))
        );
    }
}
