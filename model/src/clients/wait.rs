use std::time::Duration;

/// A polling budget: check up to `periods` times, sleeping `period_length` between checks.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WaitPeriods {
    pub periods: u32,
    pub period_length: Duration,
}

impl WaitPeriods {
    /// How long the controller gets to pick up a newly created object.
    pub const CONSUMED: WaitPeriods = WaitPeriods::new(10, Duration::from_secs(5));

    /// How long a condition gets to reach the desired status.
    pub const CONDITION: WaitPeriods = WaitPeriods::new(2, Duration::from_secs(60));

    /// How long an object gets to disappear after it has been deleted.
    pub const DELETE: WaitPeriods = WaitPeriods::new(3, Duration::from_secs(10));

    pub const fn new(periods: u32, period_length: Duration) -> Self {
        Self {
            periods,
            period_length,
        }
    }

    /// The longest this budget can wait, ignoring the time spent on API calls.
    pub fn total(&self) -> Duration {
        self.period_length * self.periods
    }
}

#[test]
fn delete_budget_is_thirty_seconds() {
    assert_eq!(WaitPeriods::DELETE.total(), Duration::from_secs(30));
    assert_eq!(WaitPeriods::CONDITION.total(), Duration::from_secs(120));
}
