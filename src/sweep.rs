use std::{cmp::Ordering, net::Ipv4Addr};

use crate::caching::Resolve;
use crate::config::{IterationConfig, Repeat};
use crate::error::Result;
use crate::iteration::IterationLoop;
use crate::probe::Echo;
use crate::range::AddressRange;
use crate::report::HostReport;
use crate::scheduler::ProbeScheduler;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct SweepOptions {
    /// Keep only hosts that answered at least once.
    pub online_only: bool,
    /// Order reports by address instead of probe order.
    pub sort_by_address: bool,
}

/// Probes every address of `range` for a single round.
///
/// The repeat mode of `config` is ignored; a sweep always runs exactly one
/// round. An empty range yields an empty batch without sending anything.
///
/// # Errors
/// Fails if `config` holds an out-of-range setting.
pub async fn sweep_with<E: Echo, R: Resolve>(
    scheduler: ProbeScheduler<E, R>,
    range: &AddressRange,
    options: SweepOptions,
    config: &IterationConfig,
) -> Result<Vec<HostReport>> {
    let config = IterationConfig {
        repeat: Repeat::Count(1),
        ..config.clone()
    };
    let targets = range.iter().map(|address| address.to_string());
    let mut iteration = IterationLoop::new(scheduler, targets, config)?;
    let mut reports = match iteration.next_round().await {
        Some(round) => round.reports,
        None => Vec::new(),
    };

    if options.online_only {
        reports.retain(|report| report.online);
    }
    if options.sort_by_address {
        reports.sort_by(|a, b| compare_hosts(&a.host, &b.host));
    }
    Ok(reports)
}

/// IPv4 literals first, in numeric order, then every other name in
/// lexicographic order.
fn compare_hosts(a: &str, b: &str) -> Ordering {
    match (a.parse::<Ipv4Addr>(), b.parse::<Ipv4Addr>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
