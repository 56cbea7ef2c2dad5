use crate::error::{ChatError, Result};
use tracing::debug;

/// Default ceiling on model calls for one session.
pub const DEFAULT_MAX_CALLS: u32 = 20;

/// Monotonic counter of model calls for a session. Must be charged right
/// before every outbound model call, including the first; there is no way to
/// refund a call.
#[derive(Debug, Clone)]
pub struct CallBudget {
    used: u32,
    limit: u32,
}

impl CallBudget {
    pub fn new(limit: u32) -> Self {
        Self { used: 0, limit }
    }

    pub fn check_and_increment(&mut self) -> Result<()> {
        if self.used >= self.limit {
            return Err(ChatError::BudgetExceeded {
                limit: self.limit,
                partial_output: String::new(),
            });
        }

        self.used += 1;
        debug!(used = self.used, limit = self.limit, "model call charged");
        Ok(())
    }

    pub fn used(&self) -> u32 {
        self.used
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.used)
    }

    pub fn is_exhausted(&self) -> bool {
        self.used >= self.limit
    }
}

impl Default for CallBudget {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CALLS)
    }
}
