/// Time a reading has to hold before it is accepted.
pub const DEBOUNCE_MS: u64 = 20;

/// Release detector for an active-low push button on a pulled-up input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Debouncer {
    stable_high: bool,
    last_high: bool,
    last_change_ms: u64,
    delay_ms: u64,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_MS)
    }
}

impl Debouncer {
    pub const fn new(delay_ms: u64) -> Self {
        Self {
            stable_high: true,
            last_high: true,
            last_change_ms: 0,
            delay_ms,
        }
    }

    /// Feed a raw reading taken at `now_ms`. Returns `true` exactly once per
    /// release, after the line has been stable for longer than the delay.
    pub fn update(&mut self, is_high: bool, now_ms: u64) -> bool {
        let mut released = false;

        if is_high != self.last_high {
            self.last_change_ms = now_ms;
        }

        if now_ms.saturating_sub(self.last_change_ms) > self.delay_ms && is_high != self.stable_high {
            self.stable_high = is_high;
            released = is_high;
        }
        self.last_high = is_high;

        released
    }
}
