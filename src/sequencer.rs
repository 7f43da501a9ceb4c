//! The bring-up smoke test: a fixed script over the LED bank and the ADC capture path.
//!
//! Nothing read from the hardware changes the flow; the dumps are printed for a human to interpret
//! and the script ends by blinking LED 0 forever.

use crate::board::RegisterMap;
use crate::bram::{BramReader, CaptureControl};
use crate::delay::DelayMs;
use crate::leds::{LedRegister, Leds};
use crate::register::AddressSpace;
use core::fmt::Write;

pub const LED_WALK_STEPS: u32 = 8;
pub const LED_WALK_DELAY_MS: u32 = 200;
pub const LED_HOLD_MS: u32 = 500;
pub const CAPTURE_WINDOW_MS: u32 = 1000;
pub const BASELINE_WORDS: u32 = 8;
pub const CAPTURE_WORDS: u32 = 24;
pub const OFFSET_START: u32 = 100;
pub const OFFSET_WORDS: u32 = 12;
pub const BLINK_HALF_PERIOD_MS: u32 = 500;

const RULE: &str = "========================================";

pub struct Sequencer<'a, A: AddressSpace, D: DelayMs, W: Write> {
    pub leds: LedRegister<'a, A>,
    pub capture: CaptureControl<'a, A>,
    pub bram: BramReader<'a, A>,
    pub delay: D,
    pub console: W,
}

impl<'a, A: AddressSpace, D: DelayMs, W: Write> Sequencer<'a, A, D, W> {
    pub fn new(bus: &'a A, map: RegisterMap, delay: D, console: W) -> Self {
        Self {
            leds: LedRegister::new(bus, map.leds),
            capture: CaptureControl::new(bus, map.bram_ctrl),
            bram: BramReader::new(bus, map.bram),
            delay,
            console,
        }
    }

    // console errors are ignored, there is nowhere else to report them
    fn line(&mut self, args: core::fmt::Arguments) {
        let _ = self.console.write_fmt(args);
        let _ = self.console.write_str("\n");
    }

    pub fn banner(&mut self) {
        self.line(format_args!(""));
        self.line(format_args!("{RULE}"));
        self.line(format_args!("AD4134 Automatic Test"));
        self.line(format_args!("{RULE}"));
        self.line(format_args!(""));
    }

    /// walk a single lit LED across all bit positions, then all on and all off
    pub fn led_test(&mut self) {
        self.line(format_args!("--- Test 1: LED Test ---"));
        let current = self.leds.read();
        self.line(format_args!("Reading LED register: {current:#010x}"));
        for position in 0..LED_WALK_STEPS {
            let leds = Leds::single(position);
            self.leds.set(leds);
            self.line(format_args!("LEDs <= {:#04x}", leds.bits()));
            self.delay.delay_ms(LED_WALK_DELAY_MS);
        }
        self.leds.set(Leds::ALL_ON);
        self.line(format_args!("LEDs <= {:#04X} (all on)", Leds::ALL_ON.bits()));
        self.delay.delay_ms(LED_HOLD_MS);
        self.leds.set(Leds::empty());
        self.line(format_args!("LEDs <= {:#04X} (all off)", Leds::empty().bits()));
        self.delay.delay_ms(LED_HOLD_MS);
        self.line(format_args!("LED test complete."));
        self.line(format_args!(""));
    }

    fn dump(&mut self, start: u32, count: u32) {
        self.bram.read_range(start, count, &mut self.console);
        self.line(format_args!(""));
    }

    pub fn bram_baseline(&mut self) {
        self.line(format_args!("--- Test 2: BRAM Read (before capture) ---"));
        self.line(format_args!("Reading first {BASELINE_WORDS} BRAM words:"));
        self.dump(0, BASELINE_WORDS);
    }

    /// hold the capture enable high for one capture window
    pub fn capture_window(&mut self) {
        self.line(format_args!("--- Test 3: Enable BRAM Capture ---"));
        self.capture.set_enabled(true);
        self.line(format_args!("BRAM capture ENABLED"));
        self.line(format_args!("Waiting 1 second for ADC data..."));
        self.delay.delay_ms(CAPTURE_WINDOW_MS);
        self.capture.set_enabled(false);
        self.line(format_args!("BRAM capture DISABLED"));
        self.line(format_args!(""));
    }

    pub fn bram_after_capture(&mut self) {
        self.line(format_args!("--- Test 4: BRAM Read (after capture) ---"));
        self.line(format_args!("Reading first {CAPTURE_WORDS} BRAM words:"));
        self.dump(0, CAPTURE_WORDS);
    }

    pub fn bram_offset(&mut self) {
        self.line(format_args!("--- Test 5: BRAM Read (offset {OFFSET_START}) ---"));
        self.line(format_args!("Reading {OFFSET_WORDS} words starting at offset {OFFSET_START}:"));
        self.dump(OFFSET_START, OFFSET_WORDS);
    }

    pub fn summary(&mut self) {
        self.line(format_args!("{RULE}"));
        self.line(format_args!("Test Complete!"));
        self.line(format_args!("{RULE}"));
        self.line(format_args!(""));
        self.line(format_args!("Check results:"));
        self.line(format_args!("- If LEDs cycled: GPIO works"));
        self.line(format_args!("- If BRAM has non-zero data: ADC capture works"));
        self.line(format_args!("- If BRAM is all zeros: Check ADC connections"));
        self.line(format_args!(""));
    }

    /// every step of the script up to, not including, the idle blink
    pub fn run_tests(&mut self) {
        self.banner();
        self.led_test();
        self.bram_baseline();
        self.capture_window();
        self.bram_after_capture();
        self.bram_offset();
        self.summary();
    }

    /// one period of the idle blink: LED 0 on, then off
    pub fn blink_once(&mut self) {
        self.leds.set(Leds::LED0);
        self.delay.delay_ms(BLINK_HALF_PERIOD_MS);
        self.leds.set(Leds::empty());
        self.delay.delay_ms(BLINK_HALF_PERIOD_MS);
    }

    pub fn idle(&mut self) -> ! {
        self.line(format_args!("Blinking LED 0 to indicate test complete..."));
        loop {
            self.blink_once();
        }
    }

    pub fn run(&mut self) -> ! {
        self.run_tests();
        self.idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delay::RecordingDelay;
    use crate::register::SimulatedAddressSpace;

    type Space = SimulatedAddressSpace<256, 128>;

    /// records the LED and capture-enable registers at every delay
    struct SnoopDelay<'a> {
        space: &'a Space,
        map: RegisterMap,
        leds_at_delay: std::vec::Vec<u32>,
        capture_at_delay: std::vec::Vec<u32>,
        requested: std::vec::Vec<u32>,
        /// panic after this many delays, to get out of the idle loop
        budget: Option<usize>,
    }

    impl<'a> SnoopDelay<'a> {
        fn new(space: &'a Space) -> Self {
            Self {
                space,
                map: RegisterMap::new(),
                leds_at_delay: vec![],
                capture_at_delay: vec![],
                requested: vec![],
                budget: None,
            }
        }
    }

    impl DelayMs for SnoopDelay<'_> {
        fn delay_ms(&mut self, ms: u32) {
            if self.budget == Some(self.requested.len()) {
                panic!("delay budget exhausted");
            }
            self.requested.push(ms);
            self.leds_at_delay.push(self.space.read32(self.map.leds));
            self.capture_at_delay.push(self.space.read32(self.map.bram_ctrl));
        }
    }

    #[test]
    fn sequencer_led_walk() {
        // cargo test sequencer_led_walk -- --nocapture
        let space = Space::new();
        let map = RegisterMap::new();
        let mut sequencer = Sequencer::new(&space, map, SnoopDelay::new(&space), String::new());
        sequencer.led_test();
        print!("{}", sequencer.console);
        let delay = &sequencer.delay;
        for i in 0..8 {
            assert_eq!(delay.leds_at_delay[i], 1 << i);
            assert_eq!(delay.requested[i], 200);
        }
        assert_eq!(&delay.leds_at_delay[8..], &[0x7F, 0x00]);
        assert_eq!(&delay.requested[8..], &[500, 500]);
        assert_eq!(space.read32(map.leds), 0x00);
        let lines: std::vec::Vec<&str> = sequencer.console.lines().collect();
        assert_eq!(lines[0], "--- Test 1: LED Test ---");
        assert_eq!(lines[1], "Reading LED register: 0x00000000");
        assert_eq!(lines[2], "LEDs <= 0x01");
        assert_eq!(lines[9], "LEDs <= 0x80");
        assert_eq!(lines[10], "LEDs <= 0x7F (all on)");
        assert_eq!(lines[10], format!("LEDs <= {:#04X} (all on)", Leds::ALL_ON.bits()));
        assert_eq!(&delay.leds_at_delay[8], &Leds::ALL_ON.bits());
        assert_eq!(lines[11], "LEDs <= 0x00 (all off)");
        assert_eq!(lines[12], "LED test complete.");
    }

    #[test]
    fn sequencer_reports_initial_led_register() {
        // cargo test sequencer_reports_initial_led_register -- --nocapture
        let space = Space::new();
        let map = RegisterMap::new();
        space.preload(map.leds, &[0x0000_0042]);
        let mut sequencer = Sequencer::new(&space, map, RecordingDelay::<32>::new(), String::new());
        sequencer.led_test();
        assert!(sequencer.console.contains("Reading LED register: 0x00000042\n"));
    }

    #[test]
    fn sequencer_capture_window() {
        // cargo test sequencer_capture_window -- --nocapture
        let space = Space::new();
        let map = RegisterMap::new();
        let mut sequencer = Sequencer::new(&space, map, SnoopDelay::new(&space), String::new());
        sequencer.capture_window();
        assert_eq!(sequencer.delay.requested, vec![1000]);
        assert_eq!(sequencer.delay.capture_at_delay, vec![0xFFFF_FFFF]);
        assert_eq!(space.writes_to(map.bram_ctrl).as_slice(), &[0xFFFF_FFFF, 0x0000_0000]);
        assert_eq!(space.read32(map.bram_ctrl), 0);
    }

    #[test]
    fn sequencer_full_script() {
        // cargo test sequencer_full_script -- --nocapture
        let space = Space::new();
        let map = RegisterMap::new();
        let samples: std::vec::Vec<u32> = (0..128).map(|i| 0x0100_0000 + i).collect();
        space.preload(map.bram, &samples);
        let mut sequencer = Sequencer::new(&space, map, RecordingDelay::<32>::new(), String::new());
        sequencer.run_tests();
        print!("{}", sequencer.console);

        // registers touched, in order
        let mut expected: std::vec::Vec<(usize, u32)> = (0..8).map(|i| (map.leds, 1 << i)).collect();
        expected.extend([
            (map.leds, 0x7F),
            (map.leds, 0x00),
            (map.bram_ctrl, 0xFFFF_FFFF),
            (map.bram_ctrl, 0x0000_0000),
        ]);
        assert_eq!(space.journal().as_slice(), expected.as_slice());

        let mut expected_delays = vec![200; 8];
        expected_delays.extend([500, 500, 1000]);
        assert_eq!(sequencer.delay.requested.as_slice(), expected_delays.as_slice());
        assert_eq!(sequencer.delay.dropped, 0);

        let console = &sequencer.console;
        let dumped: std::vec::Vec<&str> = console.lines().filter(|line| line.starts_with("BRAM[")).collect();
        assert_eq!(dumped.len(), 8 + 24 + 12);
        assert_eq!(dumped[0], "BRAM[0] : 0x01000000");
        assert_eq!(dumped[7], "BRAM[7] : 0x01000007");
        assert_eq!(dumped[8], "BRAM[0] : 0x01000000");
        assert_eq!(dumped[31], "BRAM[23] : 0x01000017");
        assert_eq!(dumped[32], "BRAM[100] : 0x01000064");
        assert_eq!(dumped[43], "BRAM[111] : 0x0100006f");

        let headers: std::vec::Vec<&str> = console.lines().filter(|line| line.starts_with("--- ")).collect();
        assert_eq!(
            headers,
            vec![
                "--- Test 1: LED Test ---",
                "--- Test 2: BRAM Read (before capture) ---",
                "--- Test 3: Enable BRAM Capture ---",
                "--- Test 4: BRAM Read (after capture) ---",
                "--- Test 5: BRAM Read (offset 100) ---",
            ]
        );
        assert!(console.starts_with("\n========================================\nAD4134 Automatic Test\n"));
        assert!(console.contains("Reading first 24 BRAM words:\n"));
        assert!(console.contains("Reading 12 words starting at offset 100:\n"));
        assert!(console.ends_with("- If BRAM is all zeros: Check ADC connections\n\n"));
    }

    #[test]
    fn sequencer_all_zero_bram_is_only_printed() {
        // cargo test sequencer_all_zero_bram_is_only_printed -- --nocapture
        let space = Space::new();
        let map = RegisterMap::new();
        let mut sequencer = Sequencer::new(&space, map, RecordingDelay::<32>::new(), String::new());
        sequencer.run_tests();
        let console = &sequencer.console;
        assert!(console
            .lines()
            .filter(|line| line.starts_with("BRAM["))
            .all(|line| line.ends_with(": 0x00000000")));
        assert!(console.contains("Test Complete!"));
    }

    #[test]
    fn sequencer_blink_once() {
        // cargo test sequencer_blink_once -- --nocapture
        let space = Space::new();
        let map = RegisterMap::new();
        let mut sequencer = Sequencer::new(&space, map, SnoopDelay::new(&space), String::new());
        for _ in 0..10 {
            sequencer.blink_once();
        }
        assert_eq!(sequencer.delay.requested, vec![500; 20]);
        let expected: std::vec::Vec<u32> = (0..20).map(|i| if i % 2 == 0 { 0x01 } else { 0x00 }).collect();
        assert_eq!(sequencer.delay.leds_at_delay, expected);
        assert!(space.journal().iter().all(|(address, _)| *address == map.leds));
        assert!(sequencer.console.is_empty());
    }

    #[test]
    fn sequencer_idle_never_returns() {
        // cargo test sequencer_idle_never_returns -- --nocapture
        let space = Space::new();
        let map = RegisterMap::new();
        let mut delay = SnoopDelay::new(&space);
        delay.budget = Some(41);
        let mut sequencer = Sequencer::new(&space, map, delay, String::new());
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            sequencer.idle();
        }));
        assert!(result.is_err(), "idle loop should only be left through the delay panic");
        let writes = space.writes_to(map.leds);
        assert_eq!(writes.len(), 42);
        for (index, value) in writes.iter().enumerate() {
            assert_eq!(*value, if index % 2 == 0 { 0x01 } else { 0x00 });
        }
        assert_eq!(space.journal().len(), writes.len());
        assert_eq!(sequencer.console, "Blinking LED 0 to indicate test complete...\n");
    }
}
