// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

/// Generates a public function named `read_$reg` to read the CP15 register encoded as
/// `[$cp, $opc1, $crn, $crm, $opc2]` as a value of type `$type`.
///
/// Only registers which are safe to read at the current privilege level may be declared with this
/// macro.
#[macro_export]
macro_rules! read_sysreg {
    ($reg:ident : [$cp:ident, $opc1:literal, $crn:ident, $crm:ident, $opc2:literal], $type:ty) => {
        $crate::_paste::paste! {
            #[doc = "Returns the value of the `"]
            #[doc = stringify!($reg)]
            #[doc = "` register."]
            #[inline(always)]
            pub fn [< read_ $reg >]() -> $type {
                let value: $type;
                // SAFETY: The macro call site's author has determined that it is always safe to
                // read the given `$reg`.
                unsafe {
                    core::arch::asm!(
                        concat!(
                            "mrc ", stringify!($cp), ", ", stringify!($opc1), ", {value}, ",
                            stringify!($crn), ", ", stringify!($crm), ", ", stringify!($opc2)
                        ),
                        options(nostack, preserves_flags),
                        value = out(reg) value,
                    );
                }
                value
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
            #[inline(always)]
            pub fn [< read_ $reg >]() -> $bitflags_type {
                let value: $type;
                // SAFETY: The macro call site's author has determined that it is always safe to
                // read the given `$reg`.
                unsafe {
                    core::arch::asm!(
                        concat!(
                            "mrc ", stringify!($cp), ", ", stringify!($opc1), ", {value}, ",
                            stringify!($crn), ", ", stringify!($crm), ", ", stringify!($opc2)
                        ),
                        options(nostack, preserves_flags),
                        value = out(reg) value,
                    );
                }
                <$bitflags_type>::from_bits_retain(value)
            }
        }
    };
}

/// Generates a public function named `write_$reg` to write a value of type `$type` to the CP15
/// register encoded as `[$cp, $opc1, $crn, $crm, $opc2]`.
///
/// Only registers to which any value may be written without violating memory safety may be
/// declared with this macro. The performance monitor registers qualify: they change what is
/// counted, never what memory is accessible.
#[macro_export]
macro_rules! write_sysreg {
    ($reg:ident : [$cp:ident, $opc1:literal, $crn:ident, $crm:ident, $opc2:literal], $type:ty) => {
        $crate::_paste::paste! {
            #[doc = "Writes `value` to the `"]
            #[doc = stringify!($reg)]
            #[doc = "` register."]
            #[inline(always)]
            pub fn [< write_ $reg >](value: $type) {
                // SAFETY: The macro call site's author has determined that it is safe to write
                // any value to the given `$reg`.
                unsafe {
                    core::arch::asm!(
                        concat!(
                            "mcr ", stringify!($cp), ", ", stringify!($opc1), ", {value}, ",
                            stringify!($crn), ", ", stringify!($crm), ", ", stringify!($opc2)
                        ),
                        options(nostack, preserves_flags),
                        value = in(reg) value,
                    );
                }
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
            #[inline(always)]
            pub fn [< write_ $reg >](value: $bitflags_type) {
                let value: $type = value.bits();
                // SAFETY: The macro call site's author has determined that it is safe to write
                // any value to the given `$reg`.
                unsafe {
                    core::arch::asm!(
                        concat!(
                            "mcr ", stringify!($cp), ", ", stringify!($opc1), ", {value}, ",
                            stringify!($crn), ", ", stringify!($crm), ", ", stringify!($opc2)
                        ),
                        options(nostack, preserves_flags),
                        value = in(reg) value,
                    );
                }
            }
        }
    };
}
