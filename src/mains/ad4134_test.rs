use crate::binding::*;
use crate::board::RegisterMap;
use crate::delay::BusyDelay;
use crate::register::XilAddressSpace;
use crate::sequencer::Sequencer;

/*
AD4134_MAIN=ad4134_test cargo build --release --target armv7r-none-eabihf
then link target/armv7r-none-eabihf/release/libad4134_bringup.a into the Vitis application and call `rust_main`
*/

pub fn main() -> ! {
    disable_data_cache();
    let bus = unsafe { XilAddressSpace::new() };
    let mut sequencer = Sequencer::new(&bus, RegisterMap::new(), BusyDelay::new(), Printer);
    sequencer.run()
}
