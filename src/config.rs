use std::time::Duration;

use crate::constants::{
    DEFAULT_ECHO_REQUESTS, DEFAULT_INTERVAL, DEFAULT_PAYLOAD_SIZE, DEFAULT_TIMEOUT, MAX_DURATION,
    MAX_PAYLOAD_SIZE,
};
use crate::error::ConfigError;

/// How many rounds an iteration loop runs.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Repeat {
    Count(u64),
    /// Runs until cancelled or until the consumer stops pulling rounds.
    Continuous,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct IterationConfig {
    pub echo_requests: u32,
    pub timeout: Duration,
    pub interval: Duration,
    pub repeat: Repeat,
    pub payload_size: usize,
}

impl IterationConfig {
    /// Checks that every setting is within its valid range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.echo_requests == 0 {
            return Err(ConfigError::ZeroEchoRequests);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.timeout > MAX_DURATION {
            return Err(ConfigError::TimeoutTooLarge(self.timeout));
        }
        if self.interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        if self.interval > MAX_DURATION {
            return Err(ConfigError::IntervalTooLarge(self.interval));
        }
        if self.repeat == Repeat::Count(0) {
            return Err(ConfigError::ZeroCount);
        }
        if self.payload_size > MAX_PAYLOAD_SIZE {
            return Err(ConfigError::PayloadTooLarge(self.payload_size));
        }
        Ok(())
    }

    pub(crate) fn payload(&self) -> Vec<u8> {
        vec![0; self.payload_size]
    }

    /// Whether another round should follow the `completed`-th one.
    pub(crate) fn has_round_after(&self, completed: u64) -> bool {
        match self.repeat {
            Repeat::Count(count) => completed < count,
            Repeat::Continuous => true,
        }
    }
}

impl Default for IterationConfig {
    fn default() -> Self {
        Self {
            echo_requests: DEFAULT_ECHO_REQUESTS,
            timeout: DEFAULT_TIMEOUT,
            interval: DEFAULT_INTERVAL,
            repeat: Repeat::Count(1),
            payload_size: DEFAULT_PAYLOAD_SIZE,
        }
    }
}

/// Builder for [`IterationConfig`].
///
/// ```
/// use async_ping::config::{IterationConfigBuilder, Repeat};
/// use std::time::Duration;
///
/// let config = IterationConfigBuilder::new()
///     .with_echo_requests(2)
///     .with_timeout(Duration::from_millis(500))
///     .with_count(10)
///     .build()
///     .unwrap();
/// assert_eq!(config.repeat, Repeat::Count(10));
/// ```
#[derive(Clone, Debug, Default)]
pub struct IterationConfigBuilder {
    echo_requests: Option<u32>,
    timeout: Option<Duration>,
    interval: Option<Duration>,
    count: Option<u64>,
    continuous: bool,
    payload_size: Option<usize>,
}

impl IterationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_echo_requests(mut self, echo_requests: u32) -> Self {
        self.echo_requests = Some(echo_requests);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    pub fn continuous(mut self) -> Self {
        self.continuous = true;
        self
    }

    pub fn with_payload_size(mut self, payload_size: usize) -> Self {
        self.payload_size = Some(payload_size);
        self
    }

    /// Validates the collected settings.
    ///
    /// # Errors
    /// Fails if both a count and continuous mode were requested, or if any
    /// numeric setting is zero or out of range.
    pub fn build(&self) -> Result<IterationConfig, ConfigError> {
        let defaults = IterationConfig::default();
        let repeat = match (self.count, self.continuous) {
            (Some(_), true) => return Err(ConfigError::ConflictingRepeatModes),
            (Some(count), false) => Repeat::Count(count),
            (None, true) => Repeat::Continuous,
            (None, false) => defaults.repeat,
        };
        let config = IterationConfig {
            echo_requests: self.echo_requests.unwrap_or(defaults.echo_requests),
            timeout: self.timeout.unwrap_or(defaults.timeout),
            interval: self.interval.unwrap_or(defaults.interval),
            repeat,
            payload_size: self.payload_size.unwrap_or(defaults.payload_size),
        };
        config.validate()?;
        Ok(config)
    }
}
