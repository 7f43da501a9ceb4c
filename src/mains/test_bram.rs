use crate::binding::*;
use crate::board::RegisterMap;
use crate::bram::CaptureState;
use crate::delay::BusyDelay;
use crate::register::XilAddressSpace;
use crate::sequencer::{Sequencer, CAPTURE_WINDOW_MS};
use crate::util::*;

/*
AD4134_MAIN=test_bram cargo build --release --target armv7r-none-eabihf
*/

fn print_capture_state(state: Option<CaptureState>) {
    match state {
        Some(state) => println!("capture enable reads back {}", state.name()),
        None => println!("[warning] capture enable reads back UNKNOWN, is the register readable?"),
    }
}

pub fn main() {
    println!("Test BRAM");
    disable_data_cache();
    let bus = unsafe { XilAddressSpace::new() };
    let mut sequencer = Sequencer::new(&bus, RegisterMap::new(), BusyDelay::new(), Printer);

    println!("\n1. Capture enable readback");
    sequencer.capture.set_enabled(true);
    print_capture_state(sequencer.capture.state());
    sequencer.capture.set_enabled(false);
    print_capture_state(sequencer.capture.state());

    println!("\n2. Baseline");
    sequencer.bram_baseline();

    println!("\n3. Timed capture window");
    let window = measure(&BspTimer, || sequencer.capture_window());
    println!("capture enable was held for {:.1}ms (requested {CAPTURE_WINDOW_MS}ms)", window * 1e3);

    println!("\n4. Dump");
    sequencer.bram_after_capture();
    sequencer.bram_offset();
}
