//! System utilities for embedded devices.
//!
//! The request loop needs two things from the platform besides sockets: a
//! monotonic millisecond clock to enforce request deadlines, and a way to
//! suspend the calling thread between cycles. Both live behind [`Clock`].
//!
//! ```rust,no_run
//! use iotloop::system::Clock;
//!
//! struct Ticks(u64);
//!
//! impl Clock for Ticks {
//!     fn now_ms(&self) -> u64 {
//!         self.0
//!     }
//!
//!     fn sleep_ms(&mut self, ms: u32) {
//!         // Busy-wait on a hardware timer, yield to an RTOS, ...
//!         self.0 += u64::from(ms);
//!     }
//! }
//! ```

/// Monotonic time source and blocking delay.
pub trait Clock {
    /// Milliseconds since an arbitrary, fixed origin. Never goes backwards.
    fn now_ms(&self) -> u64;

    /// Block the calling thread for `ms` milliseconds.
    fn sleep_ms(&mut self, ms: u32);
}

impl<T: Clock + ?Sized> Clock for &mut T {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }

    fn sleep_ms(&mut self, ms: u32) {
        (**self).sleep_ms(ms)
    }
}

/// [`Clock`] backed by `std::time::Instant` and `std::thread::sleep`.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// A clock whose origin is now.
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn sleep_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}
