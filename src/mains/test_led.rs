use crate::binding::*;
use crate::board::RegisterMap;
use crate::delay::{BusyDelay, DelayMs};
use crate::leds::{LedRegister, Leds};
use crate::register::XilAddressSpace;
use crate::sequencer::{Sequencer, LED_WALK_DELAY_MS};

/*
AD4134_MAIN=test_led cargo build --release --target armv7r-none-eabihf
*/

pub fn main() {
    println!("Test LED");
    disable_data_cache();
    let bus = unsafe { XilAddressSpace::new() };
    let map = RegisterMap::new();
    let mut delay = BusyDelay::new();

    println!("\n1. Shift from the highest wired LED");
    let leds = LedRegister::new(&bus, map.leds);
    leds.set(Leds::empty());
    let mut mask = Leds::LED6;
    for _ in 0..10 {
        leds.set(mask);
        println!("LEDs <= {:#04x}", mask.bits());
        mask = Leds::from_bits_retain(mask.bits() >> 1);
        if mask.is_empty() {
            mask = Leds::LED6;
        }
        delay.delay_ms(LED_WALK_DELAY_MS);
    }

    println!("\n2. Walk, all on, all off");
    let mut sequencer = Sequencer::new(&bus, map, delay, Printer);
    sequencer.led_test();
}
