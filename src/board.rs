//! Register map and timing constants of the board, fixed at build time.
//!
//! The addresses come from the Vivado address editor of the reference design and can be
//! overridden with `LEDS_BASE=0x...`, `BRAM_CTRL_BASE=0x...` and `BRAM_BASE=0x...` when building.

use konst::{option, primitive::parse_u32, result::unwrap_ctx};

include!(concat!(env!("OUT_DIR"), "/board_config.rs"));

/// busy-loop iterations per millisecond; 50000 roughly matches a 100MHz soft core without cache.
/// `test_delay` prints the measured value for the running CPU
pub const DELAY_LOOPS_PER_MS: u32 =
    unwrap_ctx!(parse_u32(option::unwrap_or!(option_env!("DELAY_LOOPS_PER_MS"), "50000")));

/// the number of LEDs physically wired on the board
pub const LED_COUNT: u32 = 7;

/// the register map the drivers are built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterMap {
    pub leds: usize,
    pub bram_ctrl: usize,
    pub bram: usize,
}

impl RegisterMap {
    pub const fn new() -> Self {
        Self {
            leds: LEDS_BASE,
            bram_ctrl: BRAM_CTRL_BASE,
            bram: BRAM_BASE,
        }
    }
}

impl Default for RegisterMap {
    fn default() -> Self {
        Self::new()
    }
}
