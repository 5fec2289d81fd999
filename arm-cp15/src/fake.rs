// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Fake implementations of CP15 register getters and setters for unit tests.
//!
//! Each register is a plain value: writes store, reads return the last store. Side effects such
//! as write-one-to-clear or counter selection are not modelled.

use crate::{Midr, Pmcr, Pmnc};
use std::sync::Mutex;

/// Generates a public function named `read_$reg` to read the fake register `$reg` of type `$type`.
#[macro_export]
macro_rules! read_sysreg {
    ($reg:ident : [$cp:ident, $opc1:literal, $crn:ident, $crm:ident, $opc2:literal], $type:ty) => {
        $crate::_paste::paste! {
            #[doc = "Returns the value of the `"]
            #[doc = stringify!($reg)]
            #[doc = "` register."]
            pub fn [< read_ $reg >]() -> $type {
                $crate::fake::CP15.lock().unwrap().$reg
            }
        }
    };
    (
        $reg:ident : [$cp:ident, $opc1:literal, $crn:ident, $crm:ident, $opc2:literal],
        $type:ty : $bitflags_type:ty
    ) => {
        $crate::_paste::paste! {
            #[doc = "Returns the value of the `"]
            #[doc = stringify!($reg)]
            #[doc = "` register."]
            pub fn [< read_ $reg >]() -> $bitflags_type {
                $crate::fake::CP15.lock().unwrap().$reg
            }
        }
    };
}

/// Generates a public function named `write_$reg` to write to the fake register `$reg` of type
/// `$type`.
#[macro_export]
macro_rules! write_sysreg {
    ($reg:ident : [$cp:ident, $opc1:literal, $crn:ident, $crm:ident, $opc2:literal], $type:ty) => {
        $crate::_paste::paste! {
            #[doc = "Writes `value` to the `"]
            #[doc = stringify!($reg)]
            #[doc = "` register."]
            pub fn [< write_ $reg >](value: $type) {
                $crate::fake::CP15.lock().unwrap().$reg = value;
            }
        }
    };
    (
        $reg:ident : [$cp:ident, $opc1:literal, $crn:ident, $crm:ident, $opc2:literal],
        $type:ty : $bitflags_type:ty
    ) => {
        $crate::_paste::paste! {
            #[doc = "Writes `value` to the `"]
            #[doc = stringify!($reg)]
            #[doc = "` register."]
            pub fn [< write_ $reg >](value: $bitflags_type) {
                $crate::fake::CP15.lock().unwrap().$reg = value;
            }
        }
    };
}

/// Values of fake CP15 registers.
pub static CP15: Mutex<Cp15Registers> = Mutex::new(Cp15Registers::new());

/// A set of fake CP15 registers.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Cp15Registers {
    /// Fake value for the MIDR register.
    pub midr: Midr,
    /// Fake value for the PMCR register.
    pub pmcr: Pmcr,
    /// Last value written to PMCNTENSET.
    pub pmcntenset: u32,
    /// Last value written to PMCNTENCLR.
    pub pmcntenclr: u32,
    /// Fake value for the PMOVSR register.
    pub pmovsr: u32,
    /// Last value written to PMSELR.
    pub pmselr: u32,
    /// Fake value for the PMCCNTR register.
    pub pmccntr: u32,
    /// Last value written to PMXEVTYPER.
    pub pmxevtyper: u32,
    /// Fake value for the PMXEVCNTR register.
    pub pmxevcntr: u32,
    /// Last value written to PMINTENSET.
    pub pmintenset: u32,
    /// Last value written to PMINTENCLR.
    pub pmintenclr: u32,
    /// Fake value for the ARM11 PMNC register.
    pub pmnc: Pmnc,
    /// Fake value for the ARM11 CCNT register.
    pub ccnt: u32,
    /// Fake value for the ARM11 PMN0 register.
    pub pmn0: u32,
    /// Fake value for the ARM11 PMN1 register.
    pub pmn1: u32,
}

impl Cp15Registers {
    const fn new() -> Self {
        Self {
            midr: Midr::from_bits_retain(0),
            pmcr: Pmcr::empty(),
            pmcntenset: 0,
            pmcntenclr: 0,
            pmovsr: 0,
            pmselr: 0,
            pmccntr: 0,
            pmxevtyper: 0,
            pmxevcntr: 0,
            pmintenset: 0,
            pmintenclr: 0,
            pmnc: Pmnc::empty(),
            ccnt: 0,
            pmn0: 0,
            pmn1: 0,
        }
    }

    /// Resets the fake registers to their initial state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
