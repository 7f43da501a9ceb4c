//! ADC capture path: the enable register in front of the capture logic and the block RAM it fills.
//!
//! Reads are not synchronized with the capture logic, a dump taken while capture is enabled may mix
//! old and new samples.

use crate::register::AddressSpace;
use core::fmt::Write;
use num_derive::FromPrimitive;

/// level of the capture-enable register, anything else read back is not a state the logic defines
#[repr(u32)]
#[derive(PartialEq, Eq, Clone, Copy, Debug, FromPrimitive)]
pub enum CaptureState {
    Disabled = 0x0000_0000,
    Enabled = 0xFFFF_FFFF,
}

impl CaptureState {
    pub fn from_register(value: u32) -> Option<Self> {
        num::FromPrimitive::from_u32(value)
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Disabled => "DISABLED",
            Self::Enabled => "ENABLED",
        }
    }
}

pub struct CaptureControl<'a, A: AddressSpace> {
    pub bus: &'a A,
    pub address: usize,
}

impl<'a, A: AddressSpace> CaptureControl<'a, A> {
    pub const fn new(bus: &'a A, address: usize) -> Self {
        Self { bus, address }
    }

    /// level-triggered: writing the same level again has no further effect
    pub fn set_enabled(&self, enabled: bool) {
        let state = if enabled {
            CaptureState::Enabled
        } else {
            CaptureState::Disabled
        };
        self.bus.write32(self.address, state as u32);
    }

    /// read back the enable register; `None` if it holds neither level
    pub fn state(&self) -> Option<CaptureState> {
        CaptureState::from_register(self.bus.read32(self.address))
    }
}

pub struct BramReader<'a, A: AddressSpace> {
    pub bus: &'a A,
    pub base: usize,
}

impl<'a, A: AddressSpace> BramReader<'a, A> {
    pub const fn new(bus: &'a A, base: usize) -> Self {
        Self { bus, base }
    }

    /// the address wraps around the bus width like the AXI address does
    pub fn read_word(&self, index: u32) -> u32 {
        self.bus.read32(self.base.wrapping_add((index as usize).wrapping_mul(4)))
    }

    /// `(index, word)` for exactly `count` consecutive words starting at `start`; the index wraps past `u32::MAX`
    pub fn words(&self, start: u32, count: u32) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..count).map(move |offset| {
            let index = start.wrapping_add(offset);
            (index, self.read_word(index))
        })
    }

    /// print one `BRAM[index] : 0x........` line per word
    pub fn read_range(&self, start: u32, count: u32, console: &mut impl Write) {
        for (index, word) in self.words(start, count) {
            let _ = writeln!(console, "BRAM[{index}] : {word:#010x}");
        }
    }
}
