//! Runtime configuration for the dashboard core.

use std::time::Duration;

/// What `all_my_groups` targeting does when the actor belongs to no group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyFanoutPolicy {
    /// Persist the entity with no recipients
    #[default]
    Allow,
    /// Fail with a validation error
    Reject,
}

/// Tunables shared by every component.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Upper bound for each document store call
    pub call_timeout: Duration,
    /// Extra attempts when a topic recompute loses a version race
    pub recompute_retries: u32,
    pub empty_fanout: EmptyFanoutPolicy,
}

impl DashboardConfig {
    pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);
    pub const DEFAULT_RECOMPUTE_RETRIES: u32 = 5;
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            call_timeout: Self::DEFAULT_CALL_TIMEOUT,
            recompute_retries: Self::DEFAULT_RECOMPUTE_RETRIES,
            empty_fanout: EmptyFanoutPolicy::default(),
        }
    }
}
