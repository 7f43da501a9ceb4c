//! LED bank behind the AXI GPIO data register, one bit per LED.

use crate::register::AddressSpace;
use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Leds: u32 {
        const LED0 = 1 << 0;
        const LED1 = 1 << 1;
        const LED2 = 1 << 2;
        const LED3 = 1 << 3;
        const LED4 = 1 << 4;
        const LED5 = 1 << 5;
        const LED6 = 1 << 6;
        const LED7 = 1 << 7;
        /// every LED wired on the board
        const ALL_ON = (1 << crate::board::LED_COUNT) - 1;
    }
}

impl Leds {
    /// only the LED at bit `position` lit
    pub const fn single(position: u32) -> Self {
        Self::from_bits_retain(1 << position)
    }
}

pub struct LedRegister<'a, A: AddressSpace> {
    pub bus: &'a A,
    pub address: usize,
}

impl<'a, A: AddressSpace> LedRegister<'a, A> {
    pub const fn new(bus: &'a A, address: usize) -> Self {
        Self { bus, address }
    }

    /// bits above the physical LED count are passed through, the GPIO core ignores them
    pub fn write(&self, value: u32) {
        self.bus.write32(self.address, value);
    }

    pub fn read(&self) -> u32 {
        self.bus.read32(self.address)
    }

    pub fn set(&self, leds: Leds) {
        self.write(leds.bits());
    }

    pub fn get(&self) -> Leds {
        Leds::from_bits_retain(self.read())
    }
}
