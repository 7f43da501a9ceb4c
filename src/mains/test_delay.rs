use crate::binding::*;
use crate::board::DELAY_LOOPS_PER_MS;
use crate::delay::{BusyDelay, DelayMs, NativeTimerDelay};
use crate::util::*;

/*
AD4134_MAIN=test_delay cargo build --release --target armv7r-none-eabihf
rebuild with DELAY_LOOPS_PER_MS=<printed value> to calibrate the busy loop
*/

/// check that the native timer advances at all by using `nop_delay`
pub fn sanity_check() {
    // assuming the CPU is not faster than 5GHz, such delay should be more than 2ms
    let diff = measure(&BspTimer, || nop_delay(2 * 1000 * 1000 * 5));
    if diff <= 0. {
        println!("[error] the timer has not changed as it supposed to be");
        panic!();
    }
    let time_per_nop = diff / 1.0e7;
    println!("diff: {diff}s after performing 10^7 nops");
    println!(
        "    roughly {}ns per nop or {} MHz",
        time_per_nop * 1.0e9,
        1.0e-6 / time_per_nop
    );
}

pub fn main() {
    println!("Test Delay");

    println!("\n1. Sanity Check");
    sanity_check();

    println!("\n2. Busy Loop Calibration");
    let requested_ms = 1000;
    let mut busy = BusyDelay::new();
    let elapsed = measure(&BspTimer, || busy.delay_ms(requested_ms));
    let measured_ms = elapsed * 1.0e3;
    println!("requested {requested_ms}ms with {DELAY_LOOPS_PER_MS} loops per ms, took {measured_ms:.1}ms");
    match calibrated_loops_per_ms(DELAY_LOOPS_PER_MS, requested_ms, elapsed) {
        Some(calibrated) => println!("    DELAY_LOOPS_PER_MS={calibrated}"),
        None => println!("[warning] cannot calibrate from this measurement"),
    }

    println!("\n3. Native Timer Delay");
    let mut native = NativeTimerDelay;
    let elapsed = measure(&BspTimer, || native.delay_ms(requested_ms));
    println!("requested {requested_ms}ms, took {:.1}ms", elapsed * 1.0e3);

    println!("\n4. Side by side");
    for count in [3, 2, 1] {
        println!("    busy {count}");
        busy.delay_ms(1000);
    }
    for count in [3, 2, 1] {
        println!("    native {count}");
        native.delay_ms(1000);
    }
}
