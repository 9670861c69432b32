//! ## Example
//! Following example demonstrates sweeping an IPv4 subnet and printing the hosts that answered.
//! ICMP sockets usually require elevated privileges (or `net.ipv4.ping_group_range` on Linux).
//! ```no_run
#![doc = include_str!("../demos/sweep.rs")]
//! ```
//! Repeated latency measurement against a fixed set of hosts is available through [`probe()`],
//! which yields one [`iteration::Round`] per completed round.

use futures::Stream;

pub mod config;
pub mod error;
pub mod iteration;
pub mod probe;
pub mod range;
pub mod report;
pub mod scheduler;
pub mod sweep;

pub(crate) mod caching;
pub(crate) mod constants;
pub(crate) mod echo;

#[cfg(test)]
pub(crate) mod testing;

pub use caching::{DnsResolver, Resolve};
pub use config::{IterationConfig, IterationConfigBuilder, Repeat};
pub use echo::IcmpEcho;
pub use error::{ConfigError, Error, RangeError, Result};
pub use iteration::{IterationLoop, Round};
pub use probe::{Echo, ProbeOutcome, ProbeStatus};
pub use range::AddressRange;
pub use report::HostReport;
pub use scheduler::ProbeScheduler;
pub use sweep::{sweep_with, SweepOptions};

/// Repeatedly probes `targets` over ICMP as described by `config`.
///
/// Rounds are produced lazily; stop polling the stream to stop probing. Must
/// be called from within a tokio runtime.
///
/// # Errors
/// Fails before any probe is sent if `config` is invalid or the ICMP socket
/// cannot be opened.
pub fn probe<I, S>(targets: I, config: IterationConfig) -> Result<impl Stream<Item = Round>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    config.validate()?;
    let scheduler = ProbeScheduler::new()?;
    Ok(IterationLoop::new(scheduler, targets, config)?.into_rounds())
}

/// Sweeps every address of `range` over ICMP for a single round.
///
/// # Errors
/// Fails before any probe is sent if `config` is invalid or the ICMP socket
/// cannot be opened.
pub async fn sweep(
    range: &AddressRange,
    options: SweepOptions,
    config: &IterationConfig,
) -> Result<Vec<HostReport>> {
    config.validate()?;
    sweep_with(ProbeScheduler::new()?, range, options, config).await
}
