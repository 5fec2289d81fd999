// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! CPU identification and the binding of each supported core to its event catalog.

use crate::{
    counter::CounterSlot,
    error::PmuError,
    events::{A7_EVENTS, A9_EVENTS, A53_EVENTS, EventDescriptor, EventName},
    registers::Armv7Registers,
};
use core::fmt::{self, Display, Formatter};
use num_enum::TryFromPrimitive;

/// The primary part number field of MIDR, bits [15:4].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PartNum(pub u16);

impl Display for PartNum {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{:#05x}", self.0)
    }
}

/// The CPU cores known to the PMU drivers, keyed by their MIDR part number.
#[derive(Clone, Copy, Debug, Eq, PartialEq, TryFromPrimitive)]
#[repr(u16)]
pub enum Microarch {
    /// Cortex-A7.
    CortexA7 = 0xc07,
    /// Cortex-A9.
    CortexA9 = 0xc09,
    /// Cortex-A12.
    CortexA12 = 0xc0d,
    /// Cortex-A15.
    CortexA15 = 0xc0f,
    /// Cortex-A17.
    CortexA17 = 0xc0e,
    /// Cortex-A53, running in AArch32 state.
    CortexA53 = 0xd03,
    /// Cortex-A57, running in AArch32 state.
    CortexA57 = 0xd07,
    /// ARM1136.
    Arm1136 = 0xb36,
    /// ARM1156.
    Arm1156 = 0xb56,
    /// ARM1176.
    Arm1176 = 0xb76,
    /// ARM11 MPCore.
    Arm11MpCore = 0xb02,
    /// Any core not listed above.
    Unknown = 0xfff,
}

impl Microarch {
    /// Resolves a part number, returning [`Microarch::Unknown`] if it isn't recognised.
    pub fn from_part_num(part_num: PartNum) -> Self {
        Self::try_from(part_num.0).unwrap_or(Self::Unknown)
    }

    /// Returns the MIDR part number of the core.
    pub const fn part_num(self) -> PartNum {
        PartNum(self as u16)
    }
}

/// Associates a CPU core with the events its PMU can count.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ChipBinding {
    microarch: Microarch,
    events: &'static [EventDescriptor],
    cpu_name: &'static str,
}

impl ChipBinding {
    /// The binding for an unrecognised CPU, with no events.
    pub const UNKNOWN: Self = Self::new(Microarch::Unknown, &[], "Unknown CPU");

    /// Creates a new binding.
    pub const fn new(
        microarch: Microarch,
        events: &'static [EventDescriptor],
        cpu_name: &'static str,
    ) -> Self {
        Self {
            microarch,
            events,
            cpu_name,
        }
    }

    /// Returns the bound core.
    pub const fn microarch(&self) -> Microarch {
        self.microarch
    }

    /// Returns the event catalog.
    pub const fn events(&self) -> &'static [EventDescriptor] {
        self.events
    }

    /// Returns the number of events in the catalog.
    pub const fn count(&self) -> usize {
        self.events.len()
    }

    /// Returns the display name of the core.
    pub const fn cpu_name(&self) -> &'static str {
        self.cpu_name
    }

    /// Returns the full name of `event`, if the catalog has it.
    pub fn event_name(&self, event: u32) -> Option<&'static str> {
        self.events
            .iter()
            .find(|descriptor| descriptor.event == event)
            .map(|descriptor| descriptor.name)
    }

    /// Writes the name of `event`, truncated to fit an event description buffer, into `out`.
    pub fn describe(&self, event: u32, out: Option<&mut EventName>) -> Result<(), PmuError> {
        let out = out.ok_or(PmuError::InvalidOutputBuffer)?;
        let name = self.event_name(event).ok_or(PmuError::UnknownEvent(event))?;
        *out = EventName::truncated(name);
        Ok(())
    }

    /// Checks whether `event` may be assigned to slot `filled`.
    ///
    /// Only the first `filled` slots are searched for duplicates; a duplicate is reported even
    /// when the event is also missing from the catalog.
    pub fn validate(
        &self,
        slots: &[CounterSlot],
        event: u32,
        filled: usize,
    ) -> Result<(), PmuError> {
        if let Some(counter) = slots
            .iter()
            .take(filled)
            .position(|slot| slot.event == event)
        {
            return Err(PmuError::DuplicateEvent { event, counter });
        }
        if self.event_name(event).is_none() {
            return Err(PmuError::UnknownEvent(event));
        }
        Ok(())
    }
}

/// Cores driven by the ARMv7 PMU driver.
pub static CHIPS: [ChipBinding; 7] = [
    ChipBinding::new(Microarch::CortexA7, &A7_EVENTS, "Cortex-A7"),
    ChipBinding::new(Microarch::CortexA9, &A9_EVENTS, "Cortex-A9"),
    ChipBinding::new(Microarch::CortexA12, &A7_EVENTS, "Cortex-A12"),
    ChipBinding::new(Microarch::CortexA15, &A7_EVENTS, "Cortex-A15"),
    ChipBinding::new(Microarch::CortexA17, &A7_EVENTS, "Cortex-A17"),
    ChipBinding::new(Microarch::CortexA53, &A53_EVENTS, "Cortex-A53"),
    ChipBinding::new(Microarch::CortexA57, &A7_EVENTS, "Cortex-A57"),
];

/// Finds the binding in `table` whose part number is exactly `part_num`.
pub fn lookup(table: &'static [ChipBinding], part_num: PartNum) -> Option<&'static ChipBinding> {
    table
        .iter()
        .find(|chip| chip.microarch.part_num() == part_num)
}

/// Finds the binding for `part_num` in any driver's table, falling back to
/// [`ChipBinding::UNKNOWN`].
pub fn lookup_or_unknown(part_num: PartNum) -> &'static ChipBinding {
    let chip = lookup(&CHIPS, part_num);
    #[cfg(feature = "legacy")]
    let chip = chip.or_else(|| lookup(&crate::armv6::CHIPS, part_num));
    chip.unwrap_or(&ChipBinding::UNKNOWN)
}

/// Reads the primary part number of the current CPU.
pub fn detect<R: Armv7Registers>(regs: &mut R) -> PartNum {
    PartNum(regs.read_midr().part_num())
}
