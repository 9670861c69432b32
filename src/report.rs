//! Per-host aggregation of one round's probe outcomes.

use std::{fmt, net::Ipv4Addr, time::Duration};

use crate::probe::{ProbeOutcome, ProbeStatus};

/// Summary of one host for one round.
///
/// Built once from the complete outcome list; never updated afterwards.
#[derive(Clone, PartialEq, Debug)]
pub struct HostReport {
    pub host: String,
    /// Address the probes were sent to, absent if the name did not resolve.
    pub address: Option<Ipv4Addr>,
    pub online: bool,
    pub status: ProbeStatus,
    pub sent: u32,
    pub received: u32,
    pub lost: u32,
    /// Lost share in whole percent, truncated towards zero.
    pub percent_lost: u32,
    /// Mean round-trip time in milliseconds, rounded to two decimals.
    pub average: Option<f64>,
    pub min: Option<Duration>,
    pub p50: Option<Duration>,
    pub p90: Option<Duration>,
    pub max: Option<Duration>,
    /// Successful round-trip times in completion order.
    pub raw_values: Vec<Duration>,
}

impl HostReport {
    /// Folds the outcomes of one round into a report.
    ///
    /// `outcomes` must be in completion order; it is the order `raw_values`
    /// keeps.
    pub fn from_outcomes(host: String, address: Option<Ipv4Addr>, outcomes: &[ProbeOutcome]) -> Self {
        let raw_values: Vec<Duration> = outcomes
            .iter()
            .filter(|outcome| outcome.status.is_success())
            .filter_map(|outcome| outcome.rtt)
            .collect();

        let sent = outcomes.len() as u32;
        let received = raw_values.len() as u32;
        let lost = sent - received;
        let percent_lost = percent_of(lost, sent);
        let online = received > 0;
        let status = if online {
            ProbeStatus::Success
        } else {
            dominant_failure(outcomes)
        };

        let mut sorted = raw_values.clone();
        sorted.sort_unstable();
        let n = sorted.len();
        let rank = |numerator: usize| sorted.get(n * numerator / 10).copied();

        Self {
            host,
            address,
            online,
            status,
            sent,
            received,
            lost,
            percent_lost,
            average: average_millis(&raw_values),
            min: sorted.first().copied(),
            p50: rank(5),
            p90: rank(9),
            max: sorted.last().copied(),
            raw_values,
        }
    }
}

/// Most frequent status among failed outcomes. A tie for the top count, or no
/// outcomes at all, yields `Unknown`.
fn dominant_failure(outcomes: &[ProbeOutcome]) -> ProbeStatus {
    let mut counts: Vec<(ProbeStatus, usize)> = Vec::new();
    for outcome in outcomes {
        match counts.iter_mut().find(|(status, _)| *status == outcome.status) {
            Some((_, count)) => *count += 1,
            None => counts.push((outcome.status, 1)),
        }
    }
    let Some(top) = counts.iter().map(|(_, count)| *count).max() else {
        return ProbeStatus::Unknown;
    };
    let mut leaders = counts.iter().filter(|(_, count)| *count == top);
    match (leaders.next(), leaders.next()) {
        (Some((status, _)), None) => *status,
        _ => ProbeStatus::Unknown,
    }
}

/// `part` as a whole percentage of `total`, truncated. Zero when `total` is.
fn percent_of(part: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (u64::from(part) * 100 / u64::from(total)) as u32
}

fn average_millis(values: &[Duration]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let total: f64 = values.iter().map(|rtt| rtt.as_secs_f64() * 1000.0).sum();
    let mean = total / values.len() as f64;
    Some((mean * 100.0).round() / 100.0)
}

fn millis(value: Option<Duration>) -> String {
    match value {
        Some(rtt) => format!("{:.2}", rtt.as_secs_f64() * 1000.0),
        None => "-".to_string(),
    }
}

impl fmt::Display for HostReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} sent={} received={} lost={}% min={} p50={} p90={} max={}",
            self.host,
            self.status,
            self.sent,
            self.received,
            self.percent_lost,
            millis(self.min),
            millis(self.p50),
            millis(self.p90),
            millis(self.max),
        )
    }
}
