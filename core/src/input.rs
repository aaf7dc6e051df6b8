use alloc::string::String;

use crate::display::{Display, TouchState};
use crate::ui::geom::{Region, hit_test};

/// Millisecond time source used for long-press and idle timing.
pub trait Clock {
    fn now_ms(&mut self) -> u64;
}

/// Truncates another clock to whole seconds, the resolution of a plain
/// wall clock. Long presses still work, just with coarse timing.
pub struct CoarseClock<C>(pub C);

impl<C: Clock> Clock for CoarseClock<C> {
    fn now_ms(&mut self) -> u64 {
        self.0.now_ms() / 1000 * 1000
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollMode {
    /// Wait until a touch lands on one of the regions.
    Blocking,
    /// Sample the touch controller once and return.
    NonBlocking,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub x: i32,
    pub y: i32,
    /// The touch was still held when the threshold ran out.
    pub long_press: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandbyConfig {
    pub timeout_ms: u32,
    pub backlight_pin: Option<u8>,
    pub sleep_units: u16,
}

pub struct TouchPoller<C: Clock> {
    clock: C,
    last_input_ms: u64,
    standby: Option<StandbyConfig>,
}

impl<C: Clock> TouchPoller<C> {
    pub fn new(mut clock: C) -> Self {
        let last_input_ms = clock.now_ms();
        Self {
            clock,
            last_input_ms,
            standby: None,
        }
    }

    pub fn with_standby(mut self, standby: Option<StandbyConfig>) -> Self {
        self.standby = standby;
        self
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn reset_idle(&mut self) {
        self.last_input_ms = self.clock.now_ms();
    }

    /// Waits for (or in non-blocking mode, checks for) a touch on one of
    /// `regions`.
    ///
    /// With a non-zero `long_press_ms` the release is awaited; a touch held
    /// past the threshold returns straight away with `long_press` set while
    /// the finger is still down.
    pub fn poll_key<D: Display>(
        &mut self,
        display: &mut D,
        regions: &[Region],
        long_press_ms: u32,
        mode: PollMode,
    ) -> Option<KeyEvent> {
        if mode == PollMode::Blocking {
            self.reset_idle();
        }
        loop {
            self.check_standby(display);
            if display.touch_state() == TouchState::Down {
                let x = display.touch_x();
                let y = display.touch_y();
                let long_press = long_press_ms > 0 && self.wait_release(display, long_press_ms);
                self.reset_idle();
                if let Some(region) = hit_test(regions, x, y) {
                    return Some(KeyEvent {
                        key: region.key.clone(),
                        x,
                        y,
                        long_press,
                    });
                }
            }
            if mode == PollMode::NonBlocking {
                return None;
            }
        }
    }

    /// Returns true once the touch has been held longer than `threshold_ms`.
    fn wait_release<D: Display>(&mut self, display: &mut D, threshold_ms: u32) -> bool {
        let start = self.clock.now_ms();
        loop {
            if !display.touch_state().is_held() {
                return false;
            }
            let held = self.clock.now_ms().saturating_sub(start);
            if held > u64::from(threshold_ms) {
                log::debug!("Long press after {} ms", held);
                return true;
            }
        }
    }

    fn check_standby<D: Display>(&mut self, display: &mut D) {
        let Some(standby) = self.standby else {
            return;
        };
        let idle = self.clock.now_ms().saturating_sub(self.last_input_ms);
        if idle <= u64::from(standby.timeout_ms) {
            return;
        }
        log::info!("Idle for {} ms, entering standby", idle);
        if let Some(pin) = standby.backlight_pin {
            display.set_pin(pin, false);
        }
        display.sleep(standby.sleep_units);
        // the touch that wakes the screen must not reach a widget
        while display.touch_state() != TouchState::Down {}
        while display.touch_state().is_held() {}
        if let Some(pin) = standby.backlight_pin {
            display.set_pin(pin, true);
        }
        self.reset_idle();
        log::info!("Woke from standby");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockDisplay, StepClock};
    use alloc::vec;

    fn regions() -> alloc::vec::Vec<Region> {
        vec![
            Region::new(0, 0, 99, 99, "a"),
            Region::new(100, 0, 199, 99, "b"),
        ]
    }

    #[test]
    fn blocking_poll_skips_misses_and_returns_first_hit() {
        let mut display = MockDisplay::new();
        display.idle(3);
        display.tap(500, 500);
        display.tap(150, 20);
        let mut poller = TouchPoller::new(StepClock::new(10));
        let event = poller
            .poll_key(&mut display, &regions(), 0, PollMode::Blocking)
            .unwrap();
        assert_eq!(event.key, "b");
        assert_eq!((event.x, event.y), (150, 20));
        assert!(!event.long_press);
        assert!(display.script_is_empty());
    }

    #[test]
    fn non_blocking_poll_returns_after_one_sample() {
        let mut display = MockDisplay::new();
        display.idle(1);
        display.tap(10, 10);
        let mut poller = TouchPoller::new(StepClock::new(10));
        assert_eq!(
            poller.poll_key(&mut display, &regions(), 0, PollMode::NonBlocking),
            None
        );
        let event = poller.poll_key(&mut display, &regions(), 0, PollMode::NonBlocking);
        assert_eq!(event.map(|e| e.key), Some(String::from("a")));
    }

    #[test]
    fn long_press_returns_before_release() {
        let mut display = MockDisplay::new();
        // 100 ms per clock read: held for 1.2 s before the release sample
        display.hold(10, 10, 12);
        let mut poller = TouchPoller::new(StepClock::new(100));
        let event = poller
            .poll_key(&mut display, &regions(), 1000, PollMode::Blocking)
            .unwrap();
        assert!(event.long_press);
        assert_eq!(event.key, "a");
        assert!(!display.script_is_empty(), "release must not be awaited");
    }

    #[test]
    fn short_press_is_a_tap() {
        let mut display = MockDisplay::new();
        display.hold(10, 10, 2);
        let mut poller = TouchPoller::new(StepClock::new(100));
        let event = poller
            .poll_key(&mut display, &regions(), 1000, PollMode::Blocking)
            .unwrap();
        assert!(!event.long_press);
        assert!(display.script_is_empty());
    }

    #[test]
    fn coarse_clock_truncates_to_seconds() {
        let mut clock = CoarseClock(StepClock::starting_at(2_750, 0));
        assert_eq!(clock.now_ms(), 2_000);
    }

    #[test]
    fn standby_swallows_wake_touch() {
        let mut display = MockDisplay::new();
        display.idle(2);
        // wake-up touch lands on "a" but must be discarded
        display.hold(10, 10, 1);
        display.tap(150, 10);
        let mut poller = TouchPoller::new(StepClock::new(1_000)).with_standby(Some(StandbyConfig {
            timeout_ms: 1_500,
            backlight_pin: Some(3),
            sleep_units: 60,
        }));
        let event = poller
            .poll_key(&mut display, &regions(), 0, PollMode::Blocking)
            .unwrap();
        assert_eq!(event.key, "b");
        assert_eq!(display.pins, vec![(3, false), (3, true)]);
        assert_eq!(display.sleeps, vec![60]);
    }
}
