use std::time::Duration;

/// Maps the running score to the tick interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyPolicy {
    pub base_ms: u64,
    pub step_ms: u64,
    pub floor_ms: u64,
    pub threshold: u32,
}

impl Default for DifficultyPolicy {
    fn default() -> Self {
        DifficultyPolicy {
            base_ms: 150,
            step_ms: 10,
            floor_ms: 80,
            threshold: 50,
        }
    }
}

impl DifficultyPolicy {
    pub fn base_interval(&self) -> u64 {
        self.base_ms
    }

    /// Called with the score right after it was incremented. Returns the new
    /// interval when `score` lands on a threshold and the floor has not been
    /// reached yet.
    pub fn next_interval(&self, current_ms: u64, score: u32) -> Option<u64> {
        if score == 0 || self.threshold == 0 || score % self.threshold != 0 {
            return None;
        }
        if current_ms <= self.floor_ms {
            return None;
        }
        Some(current_ms.saturating_sub(self.step_ms).max(self.floor_ms))
    }
}

pub fn as_duration(interval_ms: u64) -> Duration {
    Duration::from_millis(interval_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_base() {
        assert_eq!(DifficultyPolicy::default().base_interval(), 150);
    }

    #[test]
    fn speeds_up_on_multiples_of_threshold() {
        let policy = DifficultyPolicy::default();
        assert_eq!(policy.next_interval(150, 10), None);
        assert_eq!(policy.next_interval(150, 50), Some(140));
        assert_eq!(policy.next_interval(140, 60), None);
        assert_eq!(policy.next_interval(140, 100), Some(130));
    }

    #[test]
    fn zero_score_never_triggers() {
        assert_eq!(DifficultyPolicy::default().next_interval(150, 0), None);
    }

    #[test]
    fn stops_at_floor() {
        let policy = DifficultyPolicy::default();
        let mut interval = policy.base_interval();
        let mut score = 0;
        while score < 2_000 {
            score += 10;
            if let Some(next) = policy.next_interval(interval, score) {
                assert!(next < interval);
                interval = next;
            }
        }
        assert_eq!(interval, 80);
        assert_eq!(policy.next_interval(80, 2_050), None);
    }

    #[test]
    fn step_is_clamped_to_floor() {
        let policy = DifficultyPolicy {
            step_ms: 25,
            ..DifficultyPolicy::default()
        };
        assert_eq!(policy.next_interval(95, 50), Some(80));
    }
}
