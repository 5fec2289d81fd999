// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Driver for the ARMv7 Performance Monitors Extension.

mod access;

pub use access::Armv7Access;

use crate::{
    chip::ChipBinding,
    counter::{CYCLE_COUNTER_INDEX, CounterSlot, PollValues, split_slots},
    pmu::CpuPmuHw,
    registers::Armv7Registers,
};
use arm_cp15::Pmcr;
use log::{debug, info};

/// The PMU of an ARMv7 core, bound to the event catalog of that core.
#[derive(Debug)]
pub struct Armv7Pmu<R> {
    access: Armv7Access<R>,
    chip: &'static ChipBinding,
    counter_count: usize,
}

impl<R: Armv7Registers> Armv7Pmu<R> {
    /// Name of the driver.
    pub const NAME: &'static str = "armv7_pmu";

    /// Binds the PMU reached through `regs` to `chip`.
    pub fn new(chip: &'static ChipBinding, regs: R) -> Self {
        let mut access = Armv7Access::new(regs);
        let counter_count = usize::from(access.hardware_counter_count()) + 1;
        info!(
            "{} PMU: {} counters including the cycle counter",
            chip.cpu_name(),
            counter_count
        );
        Self {
            access,
            chip,
            counter_count,
        }
    }

    /// Returns the register level operations, for callers which need more than the lifecycle.
    pub fn access(&mut self) -> &mut Armv7Access<R> {
        &mut self.access
    }

    /// Returns the registers the PMU was bound with.
    pub fn into_inner(self) -> R {
        self.access.into_inner()
    }

    /// Disables the first `generic` event counters and the cycle counter along with their
    /// overflow interrupts, zeroes every counter and clears any pending overflow.
    pub fn reset_all(&mut self, generic: usize) {
        debug!("Resetting {generic} event counters");
        self.access.write_control(Pmcr::C | Pmcr::P);
        for index in generic_indices(generic).chain([CYCLE_COUNTER_INDEX]) {
            self.access.disable_interrupt(index);
            self.access.disable_count(index);
        }
        self.access.read_and_clear_overflow();
    }
}

impl<R: Armv7Registers> CpuPmuHw for Armv7Pmu<R> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn chip(&self) -> &'static ChipBinding {
        self.chip
    }

    fn counter_count(&self) -> usize {
        self.counter_count
    }

    fn start(&mut self, slots: &[CounterSlot]) {
        let Some((generic, cycle)) = split_slots(slots) else {
            self.reset_all(0);
            return;
        };
        debug!("Starting {} event counters", generic.len());
        self.reset_all(generic.len());
        for (index, slot) in generic_indices(generic.len()).zip(generic) {
            if slot.is_polling() {
                self.access.select_event_type(index, slot.event);
                self.access.enable_count(index);
            }
        }
        if cycle.is_polling() {
            self.access.enable_count(CYCLE_COUNTER_INDEX);
        }
        self.access.write_control(Pmcr::E);
    }

    fn stop(&mut self, count: usize) {
        self.reset_all(count.saturating_sub(1));
    }

    fn poll(&mut self, slots: &[CounterSlot]) -> PollValues {
        let mut values = PollValues::new();
        if let Some((generic, cycle)) = split_slots(slots) {
            for (index, slot) in generic_indices(generic.len()).zip(generic) {
                if slot.is_polling() {
                    values.push(self.access.read_count(index));
                }
            }
            if cycle.is_polling() {
                values.push(self.access.read_count(CYCLE_COUNTER_INDEX));
            }
        }
        self.access.write_control(Pmcr::C | Pmcr::P | Pmcr::E);
        values
    }
}

/// Returns the hardware indices of the first `count` event counters.
fn generic_indices(count: usize) -> impl Iterator<Item = u32> {
    (0..CYCLE_COUNTER_INDEX).take(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        chip::CHIPS,
        counter::CounterMode,
        fake::{Access, FakeCp15, Register},
    };

    const A: u32 = 0x08;
    const B: u32 = 0x11;

    fn cortex_a7(counters: u8) -> Armv7Pmu<FakeCp15> {
        Armv7Pmu::new(&CHIPS[0], FakeCp15::new(0x410f_c075, counters))
    }

    fn scenario_slots() -> [CounterSlot; 5] {
        [
            CounterSlot::polling(A),
            CounterSlot::DISABLED,
            CounterSlot::polling(B),
            CounterSlot::DISABLED,
            CounterSlot::polling(0),
        ]
    }

    #[test]
    fn counter_count_includes_cycle_counter() {
        let pmu = cortex_a7(4);
        assert_eq!(pmu.counter_count(), 5);
        assert_eq!(pmu.name(), "armv7_pmu");
        assert_eq!(pmu.cpu_name(), "Cortex-A7");
        assert_eq!(cortex_a7(0).counter_count(), 1);
    }

    #[test]
    fn reset_all_disables_and_clears() {
        let mut pmu = cortex_a7(4);
        {
            let regs = pmu.access().regs_mut();
            regs.write_pmcntenset(0x8000_000f);
            regs.write_pmintenset(0x8000_000f);
            regs.set_overflow(0x8000_0003);
            regs.set_event_count(2, 99);
            regs.write_pmccntr(1000);
        }
        pmu.reset_all(4);
        let regs = pmu.access().regs_mut();
        assert_eq!(regs.enabled(), 0);
        assert_eq!(regs.interrupts_enabled(), 0);
        assert_eq!(regs.overflow(), 0);
        assert_eq!(regs.event_count(2), 0);
        assert_eq!(regs.read_pmccntr(), 0);
        assert!(!regs.read_pmcr().contains(Pmcr::E));
    }

    #[test]
    fn reset_all_is_idempotent() {
        let mut pmu = cortex_a7(4);
        pmu.reset_all(4);
        let once = pmu.access().regs_mut().state();
        pmu.reset_all(4);
        assert_eq!(pmu.access().regs_mut().state(), once);
    }

    #[test]
    fn start_programs_polling_slots() {
        let mut pmu = cortex_a7(4);
        pmu.start(&scenario_slots());
        let regs = pmu.access().regs_mut();
        assert_eq!(regs.enabled(), 0x8000_0005);
        assert_eq!(regs.event_type(0), A);
        assert_eq!(regs.event_type(2), B);
        assert_eq!(regs.event_type(1), 0);
        assert_eq!(regs.read_pmcr().writable(), Pmcr::E);
    }

    #[test]
    fn start_selects_before_programming() {
        let mut pmu = cortex_a7(4);
        pmu.access().regs_mut().take_log();
        pmu.start(&[CounterSlot::polling(B), CounterSlot::DISABLED]);
        let log = pmu.access().regs_mut().take_log();
        let select = log
            .iter()
            .rposition(|access| *access == Access::Write(Register::Pmselr, 0))
            .unwrap();
        assert_eq!(log[select + 1], Access::Isb);
        assert_eq!(log[select + 2], Access::Write(Register::Pmxevtyper, B));
        assert_eq!(log[select + 3], Access::Write(Register::Pmcntenset, 1));
        assert_eq!(log.last(), Some(&Access::Write(Register::Pmcr, Pmcr::E.bits())));
    }

    #[test]
    fn start_empty_only_resets() {
        let mut pmu = cortex_a7(4);
        pmu.start(&[]);
        let regs = pmu.access().regs_mut();
        assert_eq!(regs.enabled(), 0);
        assert!(!regs.read_pmcr().contains(Pmcr::E));
    }

    #[test]
    fn poll_returns_polling_slots_in_order() {
        let mut pmu = cortex_a7(4);
        let slots = scenario_slots();
        pmu.start(&slots);
        pmu.access().regs_mut().tick(10);

        let values = pmu.poll(&slots);
        assert_eq!(values.as_slice(), [10 * A, 10 * B, 10]);

        // Polling resets the counters.
        pmu.access().regs_mut().tick(3);
        assert_eq!(pmu.poll(&slots).as_slice(), [3 * A, 3 * B, 3]);
        assert!(pmu.access().regs_mut().read_pmcr().contains(Pmcr::E));
    }

    #[test]
    fn poll_restarts_with_single_control_write() {
        let mut pmu = cortex_a7(4);
        let slots = scenario_slots();
        pmu.start(&slots);
        pmu.access().regs_mut().take_log();

        pmu.poll(&slots);
        let log = pmu.access().regs_mut().take_log();
        let last_read = log
            .iter()
            .rposition(|access| *access == Access::Read(Register::Pmccntr))
            .unwrap();
        assert_eq!(
            log[last_read + 1..],
            [
                Access::Isb,
                Access::Write(Register::Pmcr, (Pmcr::C | Pmcr::P | Pmcr::E).bits()),
            ]
        );
        assert!(
            !log.iter()
                .any(|access| *access == Access::Write(Register::Pmcntenclr, 1)),
            "poll must not disable counters"
        );
    }

    #[test]
    fn poll_values_non_decreasing_until_reset() {
        let mut pmu = cortex_a7(4);
        let slots = scenario_slots();
        pmu.start(&slots);
        let mut previous = [0; 3];
        for _ in 0..5 {
            pmu.access().regs_mut().tick(7);
            let regs = pmu.access().regs_mut();
            let current = [regs.event_count(0), regs.event_count(2), regs.read_pmccntr()];
            for (now, before) in current.iter().zip(previous) {
                assert!(*now >= before);
            }
            previous = current;
        }
        assert_eq!(pmu.poll(&slots).len(), 3);
    }

    #[test]
    fn poll_without_cycle_counter() {
        let mut pmu = cortex_a7(2);
        let slots = [
            CounterSlot::polling(A),
            CounterSlot::polling(B),
            CounterSlot {
                mode: CounterMode::Disabled,
                event: 0,
            },
        ];
        pmu.start(&slots);
        pmu.access().regs_mut().tick(2);
        assert_eq!(pmu.poll(&slots).as_slice(), [2 * A, 2 * B]);
        assert_eq!(pmu.access().regs_mut().enabled(), 0b11);
    }

    #[test]
    fn stop_twice_is_stop_once() {
        let mut pmu = cortex_a7(4);
        pmu.start(&scenario_slots());
        pmu.access().regs_mut().tick(5);
        pmu.stop(5);
        let once = pmu.access().regs_mut().state();
        pmu.stop(5);
        assert_eq!(pmu.access().regs_mut().state(), once);
        assert_eq!(once.enabled, 0);
    }

    #[test]
    fn stop_zero_does_not_underflow() {
        let mut pmu = cortex_a7(4);
        pmu.start(&scenario_slots());
        pmu.stop(0);
        assert_eq!(pmu.access().regs_mut().enabled() & (1 << CYCLE_COUNTER_INDEX), 0);
    }

    #[test]
    fn oversized_config_never_touches_cycle_bit_through_generic_slots() {
        let mut pmu = cortex_a7(4);
        let mut slots = [CounterSlot::DISABLED; 40];
        slots[31] = CounterSlot::polling(A);
        pmu.start(&slots);
        assert_eq!(pmu.access().regs_mut().enabled(), 0);
    }
}
