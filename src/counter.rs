// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Requested counter configuration, as supplied by the sampling engine on every start.

use arrayvec::ArrayVec;

/// Counter index which addresses the dedicated cycle counter rather than an event counter.
pub const CYCLE_COUNTER_INDEX: u32 = 31;

/// Largest number of event counters the PMCR.N field can report.
pub const MAX_GENERIC_COUNTERS: usize = 31;

/// Largest number of counters a driver can expose, including the cycle counter.
pub const MAX_COUNTERS: usize = MAX_GENERIC_COUNTERS + 1;

/// Values sampled by a poll, one per polling slot, in slot order.
pub type PollValues = ArrayVec<u32, MAX_COUNTERS>;

/// How a counter slot is used.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CounterMode {
    /// The counter is left disabled.
    #[default]
    Disabled,
    /// The counter is enabled and sampled on every poll.
    Polling,
}

/// Request for one hardware counter.
///
/// In a configuration slice every slot but the last describes an event counter, in hardware index
/// order. The last slot describes the cycle counter, and its `event` is ignored.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CounterSlot {
    /// Whether the counter is used.
    pub mode: CounterMode,
    /// The event to count.
    pub event: u32,
}

impl CounterSlot {
    /// A slot which leaves its counter disabled.
    pub const DISABLED: Self = Self {
        mode: CounterMode::Disabled,
        event: 0,
    };

    /// Creates a slot which counts `event` and is sampled on every poll.
    pub const fn polling(event: u32) -> Self {
        Self {
            mode: CounterMode::Polling,
            event,
        }
    }

    /// Returns whether the counter should be enabled and sampled.
    pub const fn is_polling(&self) -> bool {
        matches!(self.mode, CounterMode::Polling)
    }
}

/// Splits a configuration into its event counter slots and its cycle counter slot.
///
/// Event counter slots beyond [`MAX_GENERIC_COUNTERS`] are dropped, as no hardware index could
/// address them without aliasing the cycle counter.
pub(crate) fn split_slots(slots: &[CounterSlot]) -> Option<(&[CounterSlot], &CounterSlot)> {
    let (cycle, generic) = slots.split_last()?;
    Some((&generic[..generic.len().min(MAX_GENERIC_COUNTERS)], cycle))
}

/// Returns the register bit for counter `index`, or 0 if no such bit exists.
pub(crate) fn counter_bit(index: u32) -> u32 {
    1u32.checked_shl(index).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_empty() {
        assert_eq!(split_slots(&[]), None);
    }

    #[test]
    fn split_cycle_only() {
        let slots = [CounterSlot::polling(0x11)];
        let (generic, cycle) = split_slots(&slots).unwrap();
        assert!(generic.is_empty());
        assert_eq!(*cycle, CounterSlot::polling(0x11));
    }

    #[test]
    fn split_bounds_generic_slots() {
        let slots = [CounterSlot::polling(1); MAX_COUNTERS + 4];
        let (generic, _) = split_slots(&slots).unwrap();
        assert_eq!(generic.len(), MAX_GENERIC_COUNTERS);
    }

    #[test]
    fn counter_bits() {
        assert_eq!(counter_bit(0), 1);
        assert_eq!(counter_bit(CYCLE_COUNTER_INDEX), 0x8000_0000);
        assert_eq!(counter_bit(32), 0);
    }

    #[test]
    fn default_slot_disabled() {
        assert_eq!(CounterSlot::default(), CounterSlot::DISABLED);
        assert!(!CounterSlot::DISABLED.is_polling());
        assert!(CounterSlot::polling(8).is_polling());
    }
}
