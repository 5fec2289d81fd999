// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

use crate::chip::PartNum;
use thiserror::Error;

/// Errors reported by PMU drivers.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum PmuError {
    /// Neither the ARMv7 driver nor the legacy fallback recognise the CPU.
    #[error("Unsupported CPU part number {part_num}")]
    UnsupportedHardware {
        /// The part number read from MIDR.
        part_num: PartNum,
    },
    /// The event is not in the catalog of the bound CPU.
    #[error("Event {0:#04x} is not implemented by this CPU")]
    UnknownEvent(u32),
    /// The event is already assigned to an earlier counter.
    #[error("Event {event:#04x} is already assigned to counter {counter}")]
    DuplicateEvent {
        /// The requested event code.
        event: u32,
        /// Index of the slot which already counts `event`.
        counter: usize,
    },
    /// No buffer was supplied to write an event description into.
    #[error("No buffer for the event description")]
    InvalidOutputBuffer,
}
