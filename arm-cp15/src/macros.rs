// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

/// Generates public functions named `read_$reg` and `write_$reg` to read or write (respectively)
/// a value of type `$type` from/to the CP15 register encoded as `[$cp, $opc1, $crn, $crm, $opc2]`.
#[macro_export]
macro_rules! read_write_sysreg {
    (
        $reg:ident : [$cp:ident, $opc1:literal, $crn:ident, $crm:ident, $opc2:literal],
        $type:ty $(: $bitflags_type:ty)?
    ) => {
        $crate::read_sysreg!($reg: [$cp, $opc1, $crn, $crm, $opc2], $type $(: $bitflags_type)?);
        $crate::write_sysreg!($reg: [$cp, $opc1, $crn, $crm, $opc2], $type $(: $bitflags_type)?);
    };
}
