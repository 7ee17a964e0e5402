//! Workflow timing and retry configuration.
//!
//! Defaults match the behavior the orchestrator was tuned for: 3 total
//! attempts with a 2 s delay, a 30 s page-load ceiling, 1 s settle after
//! load and a 1 s politeness delay between units.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use tabflow::WorkflowConfig;
//!
//! let config = WorkflowConfig::new()
//!     .with_max_attempts(5)
//!     .with_politeness_delay(Duration::from_secs(3));
//! assert_eq!(config.max_attempts, 5);
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

// ============================================================================
// WorkflowConfig
// ============================================================================

/// Timing and retry knobs for a workflow instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowConfig {
    /// Total attempts per unit and per discovery, including the first.
    pub max_attempts: u32,

    /// Fixed wait between retry attempts.
    pub retry_delay: Duration,

    /// Ceiling for one page load (listen + settle).
    pub load_timeout: Duration,

    /// Extra wait after "load complete" before extraction.
    pub settle_delay: Duration,

    /// Wait after a successful unit before the next one starts.
    pub politeness_delay: Duration,
}

// ============================================================================
// Constructors
// ============================================================================

impl WorkflowConfig {
    /// Creates a configuration with default settings.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_secs(2),
            load_timeout: Duration::from_secs(30),
            settle_delay: Duration::from_secs(1),
            politeness_delay: Duration::from_secs(1),
        }
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl WorkflowConfig {
    /// Sets the total attempt budget (clamped to at least 1).
    #[inline]
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = if max_attempts == 0 { 1 } else { max_attempts };
        self
    }

    /// Sets the inter-attempt retry delay.
    #[inline]
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Sets the page-load ceiling.
    #[inline]
    #[must_use]
    pub const fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = timeout;
        self
    }

    /// Sets the post-load settle delay.
    #[inline]
    #[must_use]
    pub const fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Sets the inter-unit politeness delay.
    #[inline]
    #[must_use]
    pub const fn with_politeness_delay(mut self, delay: Duration) -> Self {
        self.politeness_delay = delay;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WorkflowConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.retry_delay, Duration::from_secs(2));
        assert_eq!(config.load_timeout, Duration::from_secs(30));
        assert_eq!(config.settle_delay, Duration::from_secs(1));
        assert_eq!(config.politeness_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_builder_chain() {
        let config = WorkflowConfig::new()
            .with_max_attempts(5)
            .with_retry_delay(Duration::from_millis(500))
            .with_load_timeout(Duration::from_secs(10))
            .with_settle_delay(Duration::ZERO)
            .with_politeness_delay(Duration::from_secs(2));

        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.retry_delay, Duration::from_millis(500));
        assert_eq!(config.load_timeout, Duration::from_secs(10));
        assert_eq!(config.settle_delay, Duration::ZERO);
        assert_eq!(config.politeness_delay, Duration::from_secs(2));
    }

    #[test]
    fn test_zero_attempts_clamped() {
        let config = WorkflowConfig::new().with_max_attempts(0);
        assert_eq!(config.max_attempts, 1);
    }
}
