// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Per-microarchitecture tables of the hardware events a PMU can count.

use arrayvec::ArrayString;
use core::fmt::{self, Display, Formatter};

/// Size of an event description buffer, including the terminating NUL.
pub const MAX_EVENT_DESC: usize = 32;

/// A hardware event code and its human-readable name.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EventDescriptor {
    /// The value programmed into the event type register.
    pub event: u32,
    /// Description of what the event counts.
    pub name: &'static str,
}

impl EventDescriptor {
    /// Creates a new descriptor.
    pub const fn new(event: u32, name: &'static str) -> Self {
        Self { event, name }
    }
}

/// An event name truncated to fit a [`MAX_EVENT_DESC`] byte buffer with its terminator.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct EventName(ArrayString<{ MAX_EVENT_DESC - 1 }>);

impl EventName {
    /// Maximum length of the name in bytes, excluding the terminator.
    pub const CAPACITY: usize = MAX_EVENT_DESC - 1;

    /// Copies at most [`Self::CAPACITY`] bytes of `name`, cutting on a character boundary.
    pub fn truncated(name: &str) -> Self {
        let mut end = name.len().min(Self::CAPACITY);
        while !name.is_char_boundary(end) {
            end -= 1;
        }
        let mut text = ArrayString::new();
        text.push_str(&name[..end]);
        Self(text)
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the length of the name in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the name is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the name as a fixed-size NUL-terminated buffer.
    ///
    /// The final byte is always zero, as are all bytes after the name.
    pub fn to_c_bytes(&self) -> [u8; MAX_EVENT_DESC] {
        let mut buffer = [0; MAX_EVENT_DESC];
        buffer[..self.len()].copy_from_slice(self.0.as_bytes());
        buffer
    }
}

impl Display for EventName {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for EventName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Events counted by the Cortex-A7 PMU.
///
/// Cortex-A12, A15, A17 and A57 are bound to this table too; its architectural events are common
/// to all of them.
pub static A7_EVENTS: [EventDescriptor; 41] = [
    EventDescriptor::new(0x00, "Software increment"),
    EventDescriptor::new(0x01, "L1 I-cache refill"),
    EventDescriptor::new(0x02, "L1 I-TLB refill"),
    EventDescriptor::new(0x03, "L1 D-cache refill"),
    EventDescriptor::new(0x04, "L1 D-cache access"),
    EventDescriptor::new(0x05, "L1 D-TLB refill"),
    EventDescriptor::new(0x06, "Data read executed"),
    EventDescriptor::new(0x07, "Data write executed"),
    EventDescriptor::new(0x08, "Instruction executed"),
    EventDescriptor::new(0x09, "Exception taken"),
    EventDescriptor::new(0x0a, "Exception return executed"),
    EventDescriptor::new(0x0b, "CONTEXTIDR write executed"),
    EventDescriptor::new(0x0c, "Software change of PC"),
    EventDescriptor::new(0x0d, "Immediate branch executed"),
    EventDescriptor::new(0x0e, "Procedure return executed"),
    EventDescriptor::new(0x0f, "Unaligned load/store executed"),
    EventDescriptor::new(0x10, "Branch mispredicted"),
    EventDescriptor::new(0x11, "Cycle count"),
    EventDescriptor::new(0x12, "Predictable branch executed"),
    EventDescriptor::new(0x13, "Data memory access"),
    EventDescriptor::new(0x14, "L1 I-cache access"),
    EventDescriptor::new(0x15, "L1 D-cache write-back"),
    EventDescriptor::new(0x16, "L2 D-cache access"),
    EventDescriptor::new(0x17, "L2 D-cache refill"),
    EventDescriptor::new(0x18, "L2 D-cache write-back"),
    EventDescriptor::new(0x19, "Bus access"),
    EventDescriptor::new(0x1d, "Bus cycle"),
    EventDescriptor::new(0x60, "Bus read access"),
    EventDescriptor::new(0x61, "Bus write access"),
    EventDescriptor::new(0x86, "IRQ exception taken"),
    EventDescriptor::new(0x87, "FIQ exception taken"),
    EventDescriptor::new(0xc0, "External memory request"),
    EventDescriptor::new(0xc1, "Non-cacheable ext memory request"),
    EventDescriptor::new(0xc2, "Linefill because of prefetch"),
    EventDescriptor::new(0xc3, "Prefetch linefill dropped"),
    EventDescriptor::new(0xc4, "Entering read allocate mode"),
    EventDescriptor::new(0xc5, "Read allocate mode"),
    EventDescriptor::new(0xc7, "ETM Ext Out[0]"),
    EventDescriptor::new(0xc8, "ETM Ext Out[1]"),
    EventDescriptor::new(0xc9, "Data write stalled by full store buffer"),
    EventDescriptor::new(0xca, "Data snooped from other processor"),
];

/// Events counted by the Cortex-A9 PMU.
pub static A9_EVENTS: [EventDescriptor; 56] = [
    EventDescriptor::new(0x00, "Software increment"),
    EventDescriptor::new(0x01, "L1 I-cache refill"),
    EventDescriptor::new(0x02, "L1 I-TLB refill"),
    EventDescriptor::new(0x03, "L1 D-cache refill"),
    EventDescriptor::new(0x04, "L1 D-cache access"),
    EventDescriptor::new(0x05, "L1 D-TLB refill"),
    EventDescriptor::new(0x06, "Data read executed"),
    EventDescriptor::new(0x07, "Data write executed"),
    EventDescriptor::new(0x09, "Exception taken"),
    EventDescriptor::new(0x0a, "Exception return executed"),
    EventDescriptor::new(0x0b, "CONTEXTIDR write executed"),
    EventDescriptor::new(0x0c, "Software change of PC"),
    EventDescriptor::new(0x0d, "Immediate branch executed"),
    EventDescriptor::new(0x0f, "Unaligned load/store executed"),
    EventDescriptor::new(0x10, "Branch mispredicted"),
    EventDescriptor::new(0x11, "Cycle count"),
    EventDescriptor::new(0x12, "Predictable branch executed"),
    EventDescriptor::new(0x40, "Java bytecode executed"),
    EventDescriptor::new(0x41, "Software Java bytecode executed"),
    EventDescriptor::new(0x42, "Jazelle backward branch executed"),
    EventDescriptor::new(0x50, "Coherent linefill miss"),
    EventDescriptor::new(0x51, "Coherent linefill hit"),
    EventDescriptor::new(0x60, "I-cache dependent stall cycles"),
    EventDescriptor::new(0x61, "D-cache dependent stall cycles"),
    EventDescriptor::new(0x62, "Main TLB miss stall cycles"),
    EventDescriptor::new(0x63, "STREX passed"),
    EventDescriptor::new(0x64, "STREX failed"),
    EventDescriptor::new(0x65, "Data eviction"),
    EventDescriptor::new(0x66, "Cycles where issue does not dispatch any instruction"),
    EventDescriptor::new(0x67, "Cycles where issue stage is empty"),
    EventDescriptor::new(0x68, "Instructions out of register rename"),
    EventDescriptor::new(0x6e, "Predictable function return"),
    EventDescriptor::new(0x70, "Main execution unit instruction"),
    EventDescriptor::new(0x71, "Second execution unit instruction"),
    EventDescriptor::new(0x72, "Load/store instruction"),
    EventDescriptor::new(0x73, "Floating-point instruction"),
    EventDescriptor::new(0x74, "NEON instruction"),
    EventDescriptor::new(0x80, "PLD full stall cycles"),
    EventDescriptor::new(0x81, "Write buffer full stall cycles"),
    EventDescriptor::new(0x82, "Main TLB miss stall cycles (I)"),
    EventDescriptor::new(0x83, "Main TLB miss stall cycles (D)"),
    EventDescriptor::new(0x84, "Micro TLB miss stall cycles (I)"),
    EventDescriptor::new(0x85, "Micro TLB miss stall cycles (D)"),
    EventDescriptor::new(0x86, "DMB stall cycles"),
    EventDescriptor::new(0x8a, "Integer core clock enabled"),
    EventDescriptor::new(0x8b, "Data engine clock enabled"),
    EventDescriptor::new(0x90, "ISB instruction"),
    EventDescriptor::new(0x91, "DSB instruction"),
    EventDescriptor::new(0x92, "DMB instruction"),
    EventDescriptor::new(0x93, "External interrupt"),
    EventDescriptor::new(0xa0, "PLE cache line request completed"),
    EventDescriptor::new(0xa1, "PLE cache line request skipped"),
    EventDescriptor::new(0xa2, "PLE FIFO flush"),
    EventDescriptor::new(0xa3, "PLE request completed"),
    EventDescriptor::new(0xa4, "PLE FIFO overflow"),
    EventDescriptor::new(0xa5, "PLE request programmed"),
];

/// Events counted by the Cortex-A53 PMU when running in AArch32 state.
pub static A53_EVENTS: [EventDescriptor; 56] = [
    EventDescriptor::new(0x00, "Software increment"),
    EventDescriptor::new(0x01, "L1 I-cache refill"),
    EventDescriptor::new(0x02, "L1 I-TLB refill"),
    EventDescriptor::new(0x03, "L1 D-cache refill"),
    EventDescriptor::new(0x04, "L1 D-cache access"),
    EventDescriptor::new(0x05, "L1 D-TLB refill"),
    EventDescriptor::new(0x06, "Data read executed"),
    EventDescriptor::new(0x07, "Data write executed"),
    EventDescriptor::new(0x08, "Instruction architecturally executed"),
    EventDescriptor::new(0x09, "Exception taken"),
    EventDescriptor::new(0x0a, "Exception return executed"),
    EventDescriptor::new(0x0b, "CONTEXTIDR write executed"),
    EventDescriptor::new(0x0c, "Software change of PC"),
    EventDescriptor::new(0x0d, "Immediate branch executed"),
    EventDescriptor::new(0x0e, "Procedure return executed"),
    EventDescriptor::new(0x0f, "Unaligned load/store executed"),
    EventDescriptor::new(0x10, "Branch mispredicted"),
    EventDescriptor::new(0x11, "Cycle count"),
    EventDescriptor::new(0x12, "Predictable branch executed"),
    EventDescriptor::new(0x13, "Data memory access"),
    EventDescriptor::new(0x14, "L1 I-cache access"),
    EventDescriptor::new(0x15, "L1 D-cache write-back"),
    EventDescriptor::new(0x16, "L2 D-cache access"),
    EventDescriptor::new(0x17, "L2 D-cache refill"),
    EventDescriptor::new(0x18, "L2 D-cache write-back"),
    EventDescriptor::new(0x19, "Bus access"),
    EventDescriptor::new(0x1a, "Local memory error"),
    EventDescriptor::new(0x1d, "Bus cycle"),
    EventDescriptor::new(0x1e, "Odd counter overflow chain"),
    EventDescriptor::new(0x60, "Bus read access"),
    EventDescriptor::new(0x61, "Bus write access"),
    EventDescriptor::new(0x7a, "Indirect branch speculatively executed"),
    EventDescriptor::new(0x86, "IRQ exception taken"),
    EventDescriptor::new(0x87, "FIQ exception taken"),
    EventDescriptor::new(0xc0, "External memory request"),
    EventDescriptor::new(0xc1, "Non-cacheable ext memory request"),
    EventDescriptor::new(0xc2, "Linefill because of prefetch"),
    EventDescriptor::new(0xc3, "I-cache throttle"),
    EventDescriptor::new(0xc4, "Entering read allocate mode"),
    EventDescriptor::new(0xc5, "Read allocate mode"),
    EventDescriptor::new(0xc6, "Pre-decode error"),
    EventDescriptor::new(0xc7, "Data write stalled by full store buffer"),
    EventDescriptor::new(0xc8, "SCU snooped data from another CPU"),
    EventDescriptor::new(0xc9, "Conditional branch executed"),
    EventDescriptor::new(0xca, "Indirect branch mispredicted"),
    EventDescriptor::new(0xcb, "Indirect branch target mispredicted"),
    EventDescriptor::new(0xcc, "Conditional branch mispredicted"),
    EventDescriptor::new(0xd0, "L1 I-cache memory error"),
    EventDescriptor::new(0xd1, "L1 D-cache memory error"),
    EventDescriptor::new(0xd2, "TLB memory error"),
    EventDescriptor::new(0xe1, "Stall: IQ empty"),
    EventDescriptor::new(0xe2, "Stall: IQ empty after I-TLB miss"),
    EventDescriptor::new(0xe3, "Stall: IQ empty after I-cache miss"),
    EventDescriptor::new(0xe4, "Stall: IQ empty after pre-decode error"),
    EventDescriptor::new(0xe7, "Stall: load miss"),
    EventDescriptor::new(0xe8, "Stall: store"),
];

/// Events counted by the ARM11 family PMU.
#[cfg(feature = "legacy")]
pub static ARM11_EVENTS: [EventDescriptor; 19] = [
    EventDescriptor::new(0x00, "I-cache miss"),
    EventDescriptor::new(0x01, "Instruction buffer stall"),
    EventDescriptor::new(0x02, "Data dependency stall"),
    EventDescriptor::new(0x03, "Instruction micro TLB miss"),
    EventDescriptor::new(0x04, "Data micro TLB miss"),
    EventDescriptor::new(0x05, "Branch instruction executed"),
    EventDescriptor::new(0x06, "Branch mispredicted"),
    EventDescriptor::new(0x07, "Instruction executed"),
    EventDescriptor::new(0x09, "D-cache access (cacheable)"),
    EventDescriptor::new(0x0a, "D-cache access"),
    EventDescriptor::new(0x0b, "D-cache miss"),
    EventDescriptor::new(0x0c, "D-cache write-back"),
    EventDescriptor::new(0x0d, "Software change of PC"),
    EventDescriptor::new(0x0f, "Main TLB miss"),
    EventDescriptor::new(0x10, "Explicit external data access"),
    EventDescriptor::new(0x11, "Load/store queue full stall"),
    EventDescriptor::new(0x12, "Write buffer drained"),
    EventDescriptor::new(0x20, "No event"),
    EventDescriptor::new(0xff, "Cycle count"),
];
