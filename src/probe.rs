use std::{fmt, future::Future, net::Ipv4Addr, time::Duration};

/// Outcome class of a single echo exchange.
///
/// `Success` is the only status that marks a host as online.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum ProbeStatus {
    Success,
    TimedOut,
    DestinationUnreachable,
    Unknown,
}

impl ProbeStatus {
    pub fn is_success(self) -> bool {
        self == ProbeStatus::Success
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProbeStatus::Success => "Success",
            ProbeStatus::TimedOut => "TimedOut",
            ProbeStatus::DestinationUnreachable => "DestinationUnreachable",
            ProbeStatus::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ProbeOutcome {
    pub status: ProbeStatus,
    /// Round-trip time, present only when `status` is `Success`.
    pub rtt: Option<Duration>,
}

impl ProbeOutcome {
    pub fn success(rtt: Duration) -> Self {
        Self {
            status: ProbeStatus::Success,
            rtt: Some(rtt),
        }
    }

    /// Builds a failed outcome. Passing `Success` yields `Unknown`, since a
    /// successful exchange always carries a round-trip time.
    pub fn failure(status: ProbeStatus) -> Self {
        let status = match status {
            ProbeStatus::Success => ProbeStatus::Unknown,
            other => other,
        };
        Self { status, rtt: None }
    }
}

/// A single echo request/response exchange.
///
/// Implementations must absorb every transport failure into the returned
/// [`ProbeOutcome`] and must give up after `timeout`. Any network handle
/// acquired for the exchange has to be released before the future resolves.
pub trait Echo {
    fn echo(
        &self,
        target: Ipv4Addr,
        timeout: Duration,
        payload: &[u8],
    ) -> impl Future<Output = ProbeOutcome>;
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{ProbeOutcome, ProbeStatus};

    #[test]
    fn test_failure_never_reports_success() {
        let outcome = ProbeOutcome::failure(ProbeStatus::Success);
        assert_eq!(outcome.status, ProbeStatus::Unknown);
        assert_eq!(outcome.rtt, None);
    }

    #[test]
    fn test_success_carries_rtt() {
        let outcome = ProbeOutcome::success(Duration::from_millis(12));
        assert!(outcome.status.is_success());
        assert_eq!(outcome.rtt, Some(Duration::from_millis(12)));
    }
}
