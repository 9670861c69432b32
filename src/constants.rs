use std::time::Duration;

pub(crate) const DEFAULT_ECHO_REQUESTS: u32 = 4;
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub(crate) const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);
pub(crate) const DEFAULT_PAYLOAD_SIZE: usize = 32;
pub(crate) const MAX_PAYLOAD_SIZE: usize = 65500;
/// Upper bound for the probe timeout and for the interval between rounds.
pub(crate) const MAX_DURATION: Duration = Duration::from_secs(24 * 60 * 60);

/// Slack added on top of the probe timeout before a round's join gives up.
pub(crate) const DEFAULT_JOIN_MARGIN: Duration = Duration::from_secs(1);
