//! Board support symbols provided by the Xilinx BSP (C side of the Vitis project).
//!
//! The C project links `libad4134_bringup.a` and implements every function of [`extern_c`]
//! on top of `xil_io.h`, `xil_cache.h`, `xil_printf.h` and the platform timer, e.g.
//!
//! ```c
//! void print_char(char c) { outbyte(c); }
//! uint32_t xil_in32(uint32_t addr) { return Xil_In32(addr); }
//! void xil_out32(uint32_t addr, uint32_t value) { Xil_Out32(addr, value); }
//! void dcache_disable(void) { Xil_DCacheDisable(); }
//! ```

use core::arch::asm;
pub use core::fmt::Write;

#[cfg(not(test))]
pub mod extern_c {
    use cty::*;

    extern "C" {
        pub fn print_char(c: c_char);
        pub fn xil_in32(address: uint32_t) -> uint32_t;
        pub fn xil_out32(address: uint32_t, value: uint32_t);
        pub fn dcache_disable();
        pub fn get_native_time() -> uint64_t;
        pub fn diff_native_time(start: uint64_t, end: uint64_t) -> c_float;
    }
}


cfg_if::cfg_if! {
    if #[cfg(feature = "disable_print")] {
        pub fn print_string(_s: &str) {}
    } else {
        pub fn print_string(s: &str) {
            for c in s.chars() {
                if c == '\n' {
                    unsafe { extern_c::print_char(b'\r' as cty::c_char) };
                }
                unsafe { extern_c::print_char(c as cty::c_char) };
            }
        }
    }
}

/// the serial console of the BSP; `\n` is sent as `\r\n`
pub struct Printer;

impl Write for Printer {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        print_string(s);
        Ok(())
    }
}

#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => ({
        let _ = core::fmt::Write::write_fmt(&mut $crate::binding::Printer, format_args!($($arg)*));
    })
}

#[macro_export]
macro_rules! println {
    () => ($crate::print!("\n"));
    ($($arg:tt)*) => ({
        let _ = core::fmt::Write::write_fmt(&mut $crate::binding::Printer, format_args!($($arg)*));
        $crate::print!("\n");
    })
}

/// must run before the first register access so that reads observe the hardware rather than the cache
pub fn disable_data_cache() {
    unsafe { extern_c::dcache_disable() };
}

pub fn nop_delay(cycles: u32) {
    for _ in 0..cycles {
        unsafe {
            asm!("nop");
        }
    }
}
