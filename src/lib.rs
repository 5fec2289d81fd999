// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Driver for the CPU performance monitor of 32-bit Arm cores.
//!
//! [`init`] reads MIDR to identify the core and binds either the ARMv7 Performance Monitors
//! Extension driver or, for ARM11 cores, the legacy driver. The resulting [`CpuPmu`] handle is
//! driven through [`CpuPmuHw`] by a sampling engine which, for each period, validates a counter
//! configuration, starts it, polls it and finally stops it.
//!
//! A handle owns its register accessor and must only be used on the core it was created on.

#![cfg_attr(not(any(test, feature = "fakes")), no_std)]

#[cfg(feature = "legacy")]
pub mod armv6;
pub mod armv7;
pub mod chip;
pub mod counter;
mod error;
pub mod events;
#[cfg(any(test, feature = "fakes"))]
pub mod fake;
mod pmu;
pub mod registers;

pub use chip::{ChipBinding, Microarch, PartNum};
pub use counter::{CounterMode, CounterSlot, PollValues};
pub use error::PmuError;
pub use events::EventName;
pub use pmu::{CpuPmu, CpuPmuHw, init};
pub use registers::Cp15;
