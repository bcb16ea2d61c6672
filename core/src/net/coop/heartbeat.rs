//! Heartbeat cadence
//!
//! A full snapshot goes out on every cadence boundary whether or not
//! anything changed, so silence from the peer means the link is gone.

/// Counts frames and reports cadence boundaries
#[derive(Debug, Clone)]
pub struct Heartbeat {
    interval: u32,
    frame: u64,
    sent: u64,
}

impl Heartbeat {
    /// `interval` is in frames. Zero is treated as every frame.
    pub fn new(interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            frame: 0,
            sent: 0,
        }
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Frames counted so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Heartbeats reported due so far
    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// Advance one frame. Returns true on a cadence boundary.
    pub fn advance(&mut self) -> bool {
        self.frame += 1;
        let due = self.frame % u64::from(self.interval) == 0;
        if due {
            self.sent += 1;
        }
        due
    }
}
