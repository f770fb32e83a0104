use std::time::{Duration, Instant};

/// A propagating deadline (§5). Every external call inherits the caller's
/// remaining budget; this type makes that arithmetic explicit instead of
/// threading raw `Instant`s through every signature.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    deadline: Instant,
}

impl Deadline {
    pub fn after(duration: Duration) -> Self {
        Self {
            deadline: Instant::now() + duration,
        }
    }

    pub fn from_instant(deadline: Instant) -> Self {
        Self { deadline }
    }

    /// Remaining budget, or `Duration::ZERO` if already expired.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_zero()
    }

    /// Derive a child deadline capped at `cap`, never exceeding the parent's
    /// remaining budget (§5: "releases downstream deadlines proportionally").
    pub fn child(&self, cap: Duration) -> Self {
        let remaining = self.remaining();
        Self {
            deadline: Instant::now() + remaining.min(cap),
        }
    }
}
