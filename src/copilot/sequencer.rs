use super::timer::{StepTimer, TickOutcome};
use crate::recipe::detect_duration;

/// Step cursor plus the countdown of the active step
///
/// Holds no I/O; `CopilotSession` drives it and schedules ticks. With no
/// steps every navigation is a no-op and there is never a timer.
#[derive(Debug, Clone)]
pub struct Sequencer {
    steps: Vec<String>,
    current: usize,
    timer: StepTimer,
}

impl Sequencer {
    pub fn new(steps: Vec<String>) -> Self {
        let timer = StepTimer::new(steps.first().and_then(|s| detect_duration(s)));
        Self {
            steps,
            current: 0,
            timer,
        }
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> Option<&str> {
        self.steps.get(self.current).map(String::as_str)
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.steps.len()
    }

    /// Fraction of the recipe reached, counting the active step
    pub fn progress(&self) -> f64 {
        if self.steps.is_empty() {
            return 0.0;
        }
        (self.current + 1) as f64 / self.steps.len() as f64
    }

    pub fn timer(&self) -> &StepTimer {
        &self.timer
    }

    /// Activate step `index` with a freshly derived countdown
    ///
    /// Out-of-range indexes leave everything untouched and return false.
    pub fn go_to_step(&mut self, index: usize) -> bool {
        let Some(step) = self.steps.get(index) else {
            return false;
        };

        self.current = index;
        self.timer = StepTimer::new(detect_duration(step));
        true
    }

    pub fn next(&mut self) -> bool {
        self.go_to_step(self.current + 1)
    }

    pub fn previous(&mut self) -> bool {
        match self.current.checked_sub(1) {
            Some(index) => self.go_to_step(index),
            None => false,
        }
    }

    pub fn toggle_timer(&mut self) -> bool {
        self.timer.toggle()
    }

    pub fn pause_timer(&mut self) {
        self.timer.pause();
    }

    /// Stop the countdown and rewind it to the active step's duration
    pub fn reset_timer(&mut self) {
        let duration = self.current_step().and_then(detect_duration);
        self.timer = StepTimer::new(duration);
    }

    pub fn tick(&mut self) -> TickOutcome {
        self.timer.tick()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::copilot::timer::TimerPhase;
    use crate::recipe::extract_steps;

    fn sequencer() -> Sequencer {
        Sequencer::new(extract_steps(
            "1. Chop onions\n2. Simmer for 10 minutes\n3. Rest 45 seconds\n4. Serve",
        ))
    }

    #[test]
    fn test_starts_on_first_step() {
        let seq = sequencer();
        assert_eq!(seq.current_index(), 0);
        assert_eq!(seq.current_step(), Some("Chop onions"));
        assert_eq!(seq.timer().phase(), TimerPhase::NoTimer);
        assert_eq!(seq.progress(), 0.25);
    }

    #[test]
    fn test_navigation_bounds() {
        let mut seq = sequencer();
        assert!(!seq.previous());
        assert_eq!(seq.current_index(), 0);

        assert!(seq.next());
        assert!(seq.next());
        assert!(seq.next());
        assert!(seq.is_last());
        assert!(!seq.next());
        assert_eq!(seq.current_index(), 3);
        assert_eq!(seq.progress(), 1.0);

        assert!(!seq.go_to_step(4));
        assert_eq!(seq.current_index(), 3);
    }

    #[test]
    fn test_step_change_rederives_timer() {
        let mut seq = sequencer();
        seq.go_to_step(1);
        assert_eq!(seq.timer().remaining(), Some(600));

        seq.toggle_timer();
        seq.tick();
        assert_eq!(seq.timer().remaining(), Some(599));

        seq.next();
        assert_eq!(seq.timer().remaining(), Some(45));
        assert!(!seq.timer().is_running());

        seq.previous();
        assert_eq!(seq.timer().remaining(), Some(600));
    }

    #[test]
    fn test_reset_timer() {
        let mut seq = sequencer();
        seq.go_to_step(2);
        seq.toggle_timer();
        seq.tick();
        seq.reset_timer();

        assert_eq!(seq.timer().remaining(), Some(45));
        assert!(!seq.timer().is_running());
    }

    #[test]
    fn test_empty_sequencer() {
        let mut seq = Sequencer::new(Vec::new());
        assert_eq!(seq.current_step(), None);
        assert_eq!(seq.progress(), 0.0);
        assert!(!seq.next());
        assert!(!seq.previous());
        assert!(!seq.go_to_step(0));
        assert!(!seq.toggle_timer());
        seq.reset_timer();
        assert_eq!(seq.timer().phase(), TimerPhase::NoTimer);
    }
}
