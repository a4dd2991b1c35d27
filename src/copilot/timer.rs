use serde::{Deserialize, Serialize};

/// Where a step's countdown stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    /// The step mentions no duration
    NoTimer,
    /// Duration known, not counting
    Ready,
    /// Counting down
    Running,
    /// Reached zero; stays at zero until reset or step change
    Expired,
}

/// Result of one countdown tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer not running; nothing changed
    Idle,
    /// Decremented, still running
    Counting(u64),
    /// Just reached zero
    Expired,
}

/// Countdown for the active step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepTimer {
    duration: Option<u64>,
    remaining: Option<u64>,
    running: bool,
    expired: bool,
}

impl StepTimer {
    pub fn new(duration: Option<u64>) -> Self {
        Self {
            duration,
            remaining: duration,
            running: false,
            expired: false,
        }
    }

    pub fn remaining(&self) -> Option<u64> {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn phase(&self) -> TimerPhase {
        match self.remaining {
            None => TimerPhase::NoTimer,
            Some(_) if self.running => TimerPhase::Running,
            Some(_) if self.expired => TimerPhase::Expired,
            Some(_) => TimerPhase::Ready,
        }
    }

    /// Start or pause the countdown
    ///
    /// Returns false when there is nothing to count: no duration, or the
    /// countdown already sits at zero.
    pub fn toggle(&mut self) -> bool {
        match self.remaining {
            None | Some(0) => false,
            Some(_) => {
                self.running = !self.running;
                true
            }
        }
    }

    /// Stop and rewind to the full duration
    pub fn reset(&mut self) {
        self.running = false;
        self.expired = false;
        self.remaining = self.duration;
    }

    /// Stop counting without rewinding
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Advance the countdown by one tick
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }

        let Some(remaining) = self.remaining else {
            self.running = false;
            return TickOutcome::Idle;
        };

        let remaining = remaining.saturating_sub(1);
        self.remaining = Some(remaining);

        if remaining == 0 {
            self.running = false;
            self.expired = true;
            TickOutcome::Expired
        } else {
            TickOutcome::Counting(remaining)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_timer() {
        let mut timer = StepTimer::new(None);
        assert_eq!(timer.phase(), TimerPhase::NoTimer);
        assert!(!timer.toggle());
        assert_eq!(timer.tick(), TickOutcome::Idle);
        assert_eq!(timer.remaining(), None);
    }

    #[test]
    fn test_countdown_to_expiry() {
        let mut timer = StepTimer::new(Some(2));
        assert_eq!(timer.phase(), TimerPhase::Ready);

        assert!(timer.toggle());
        assert_eq!(timer.phase(), TimerPhase::Running);

        assert_eq!(timer.tick(), TickOutcome::Counting(1));
        assert_eq!(timer.tick(), TickOutcome::Expired);
        assert_eq!(timer.remaining(), Some(0));
        assert!(!timer.is_running());
        assert_eq!(timer.phase(), TimerPhase::Expired);

        // Expiry fires once; further ticks do nothing
        assert_eq!(timer.tick(), TickOutcome::Idle);
    }

    #[test]
    fn test_expired_timer_cannot_restart() {
        let mut timer = StepTimer::new(Some(1));
        timer.toggle();
        timer.tick();

        assert!(!timer.toggle());
        assert_eq!(timer.phase(), TimerPhase::Expired);
    }

    #[test]
    fn test_pause_keeps_remaining() {
        let mut timer = StepTimer::new(Some(10));
        timer.toggle();
        timer.tick();
        timer.tick();

        assert!(timer.toggle());
        assert_eq!(timer.phase(), TimerPhase::Ready);
        assert_eq!(timer.remaining(), Some(8));
        assert_eq!(timer.tick(), TickOutcome::Idle);
    }

    #[test]
    fn test_reset_rewinds() {
        let mut timer = StepTimer::new(Some(3));
        timer.toggle();
        timer.tick();
        timer.tick();
        timer.tick();
        assert_eq!(timer.phase(), TimerPhase::Expired);

        timer.reset();
        assert_eq!(timer.remaining(), Some(3));
        assert_eq!(timer.phase(), TimerPhase::Ready);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_zero_duration_is_ready_not_runnable() {
        let mut timer = StepTimer::new(Some(0));
        assert_eq!(timer.phase(), TimerPhase::Ready);
        assert!(!timer.toggle());
    }
}
