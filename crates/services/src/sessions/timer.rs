use chrono::{DateTime, Utc};

use quiz_core::model::{ExamResult, Session};

/// What one tick of the countdown produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerTick {
    /// Countdown still running.
    Running { remaining_seconds: u32 },
    /// The budget ran out on this tick; the session was submitted and
    /// scored here, exactly once.
    Expired(ExamResult),
    /// The driver has released the session: it was stopped explicitly or
    /// the session was already submitted elsewhere.
    Stopped,
}

/// Countdown driver for one session.
///
/// The embedder feeds it one `tick` per second from its clock source; the
/// driver never sleeps or spawns. On reaching zero it submits the session
/// through the same status guard manual submission uses, so the two
/// triggers can race freely without double-scoring. Once stopped it stays
/// stopped; stopping never un-submits a session.
#[derive(Debug, Clone, Default)]
pub struct TimerDriver {
    stopped: bool,
}

impl TimerDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Release the session without touching its state.
    ///
    /// Resource cleanup only, e.g. when the user navigates away.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Advance the countdown by one second.
    ///
    /// `now` is this tick's wall-clock timestamp, used for elapsed-time
    /// reporting if the session expires here.
    pub fn tick(&mut self, session: &mut Session, now: DateTime<Utc>) -> TimerTick {
        if self.stopped || session.is_submitted() {
            // Manual submission cancels the countdown: no further
            // decrements, no late expiry firing.
            self.stopped = true;
            return TimerTick::Stopped;
        }

        match session.record_tick() {
            Ok(0) => {
                self.stopped = true;
                match session.submit(now) {
                    Ok(result) => TimerTick::Expired(result),
                    // The manual trigger won between the decrement and the
                    // submit; first caller wins, we just stop.
                    Err(_) => TimerTick::Stopped,
                }
            }
            Ok(remaining) => TimerTick::Running {
                remaining_seconds: remaining,
            },
            Err(_) => {
                self.stopped = true;
                TimerTick::Stopped
            }
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
