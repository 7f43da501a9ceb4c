#![cfg_attr(not(test), no_std)]

#[macro_use]
pub mod binding;
pub mod board;
pub mod bram;
pub mod delay;
pub mod leds;
pub mod register;
pub mod sequencer;
pub mod util;
#[cfg(not(test))]
pub mod mains {
    automod::dir!(pub "src/mains");
}

pub use binding::*;
#[cfg(all(feature = "panic_halt", not(test)))]
use panic_halt as _;

#[cfg(not(test))]
#[no_mangle]
pub extern "C" fn rust_main_raw() {
    // use AD4134_MAIN=<name> to specify main entry
    include!(concat!(env!("OUT_DIR"), "/ad4134_main.name"));
}

pub const RUST_MAIN_NAME: &str = env!("AD4134_MAIN_NAME");

#[cfg(not(test))]
#[no_mangle]
pub extern "C" fn rust_main() -> ! {
    rust_main_raw();
    println!("[exit]");
    loop {}
}
