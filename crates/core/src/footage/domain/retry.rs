use std::time::Duration;

/// Waits between provider attempts. Swapped for [`NoSleep`] in tests.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}

pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

pub struct NoSleep;

impl Sleeper for NoSleep {
    fn sleep(&self, _duration: Duration) {}
}

/// Bounded attempts with a fixed delay between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Runs `op` until it succeeds or the attempts run out, sleeping between
    /// attempts but not after the last one. Returns `None` when every
    /// attempt failed.
    pub fn run<T, E, F>(&self, sleeper: &dyn Sleeper, mut op: F) -> Option<T>
    where
        E: std::fmt::Display,
        F: FnMut(u32) -> Result<T, E>,
    {
        for attempt in 1..=self.max_attempts {
            match op(attempt) {
                Ok(value) => return Some(value),
                Err(e) => {
                    log::warn!(
                        "Attempt {attempt}/{} failed: {e}",
                        self.max_attempts
                    );
                    if attempt < self.max_attempts {
                        sleeper.sleep(self.delay);
                    }
                }
            }
        }
        log::warn!("Giving up after {} attempts", self.max_attempts);
        None
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(2))
    }
}
