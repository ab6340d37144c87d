//! One submission per finished run

/// Tracks whether the current run has been submitted.
///
/// The driver calls [`SubmitGate::try_begin`] before sending, then
/// [`SubmitGate::finish`] with the outcome, and [`SubmitGate::reset`] when a
/// new run starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitGate {
    #[default]
    Open,
    InFlight,
    /// Saved, remotely or on the device
    Done,
}

impl SubmitGate {
    /// Claim the run for a submission. False while one is in flight or
    /// after the run was already saved.
    pub fn try_begin(&mut self) -> bool {
        if *self != SubmitGate::Open {
            return false;
        }
        *self = SubmitGate::InFlight;
        true
    }

    /// A rejected submission (bad name, storage failure) may be retried
    pub fn finish(&mut self, saved: bool) {
        *self = if saved { SubmitGate::Done } else { SubmitGate::Open };
    }

    pub fn reset(&mut self) {
        *self = SubmitGate::Open;
    }

    pub fn is_busy(&self) -> bool {
        *self == SubmitGate::InFlight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat_click_is_refused() {
        let mut gate = SubmitGate::default();
        assert!(gate.try_begin());
        assert!(gate.is_busy());
        assert!(!gate.try_begin());

        gate.finish(true);
        assert!(!gate.try_begin());
        assert_eq!(gate, SubmitGate::Done);
    }

    #[test]
    fn test_failed_submit_can_retry() {
        let mut gate = SubmitGate::default();
        assert!(gate.try_begin());
        gate.finish(false);
        assert!(gate.try_begin());
    }

    #[test]
    fn test_new_run_reopens() {
        let mut gate = SubmitGate::default();
        assert!(gate.try_begin());
        gate.finish(true);
        gate.reset();
        assert!(gate.try_begin());
    }
}
