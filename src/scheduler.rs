use std::{net::Ipv4Addr, time::Duration};

use futures::stream::{FuturesUnordered, StreamExt};
use log::debug;
use tokio::time::Instant;

use crate::caching::{DnsResolver, Resolve, ResolutionCache};
use crate::config::IterationConfig;
use crate::constants::{DEFAULT_JOIN_MARGIN, MAX_DURATION};
use crate::echo::IcmpEcho;
use crate::error::Result;
use crate::probe::{Echo, ProbeOutcome, ProbeStatus};

/// Raw outcomes gathered for one host during one round.
#[derive(Clone, Debug, PartialEq)]
pub struct HostProbes {
    pub host: String,
    pub address: Option<Ipv4Addr>,
    /// Outcomes in completion order.
    pub outcomes: Vec<ProbeOutcome>,
}

/// Fans out the echo requests of a round and joins them under one deadline.
///
/// Host names are resolved once per scheduler; the result is reused by every
/// later round.
#[derive(Debug)]
pub struct ProbeScheduler<E = IcmpEcho, R = DnsResolver> {
    echo: E,
    resolver: R,
    cache: ResolutionCache,
    join_margin: Duration,
}

impl ProbeScheduler {
    /// Creates a scheduler backed by an ICMP socket and the system resolver.
    ///
    /// # Errors
    /// Returns an error if the ICMP socket cannot be opened.
    pub fn new() -> Result<Self> {
        Ok(Self::with_transport(IcmpEcho::new()?, DnsResolver))
    }
}

impl<E: Echo, R: Resolve> ProbeScheduler<E, R> {
    pub fn with_transport(echo: E, resolver: R) -> Self {
        Self {
            echo,
            resolver,
            cache: ResolutionCache::new(),
            join_margin: DEFAULT_JOIN_MARGIN,
        }
    }

    /// Sets the slack granted on top of the probe timeout before outstanding
    /// probes of a round are written off. Capped at 24 hours.
    pub fn with_join_margin(mut self, margin: Duration) -> Self {
        self.join_margin = margin.min(MAX_DURATION);
        self
    }

    pub fn echo(&self) -> &E {
        &self.echo
    }

    /// Runs one round: `config.echo_requests` probes for every entry of
    /// `hosts`, all in flight at once.
    ///
    /// The result holds one entry per element of `hosts`, in the same order.
    /// Probes still pending at `timeout + join margin` are recorded as
    /// `Unknown`. Hosts that do not resolve are not sent anything; each of
    /// their probes is recorded as `Unknown`.
    ///
    /// # Example
    /// ```no_run
    /// use async_ping::{IterationConfig, ProbeScheduler};
    ///
    /// tokio_test::block_on(async {
    ///     let mut scheduler = ProbeScheduler::new().unwrap();
    ///     let hosts = ["192.0.2.1".to_string(), "example.com".to_string()];
    ///     for host in scheduler.run_round(&hosts, &IterationConfig::default()).await {
    ///         println!("{}: {:?}", host.host, host.outcomes);
    ///     }
    /// })
    /// ```
    pub async fn run_round(&mut self, hosts: &[String], config: &IterationConfig) -> Vec<HostProbes> {
        let mut addresses = Vec::with_capacity(hosts.len());
        for host in hosts {
            addresses.push(self.cache.lookup(&self.resolver, host).await);
        }

        let payload = config.payload();
        let payload = payload.as_slice();
        let timeout = config.timeout;
        let deadline = Instant::now() + timeout + self.join_margin;
        let echo = &self.echo;

        let mut pending: FuturesUnordered<_> = addresses
            .iter()
            .enumerate()
            .flat_map(|(index, address)| {
                (0..config.echo_requests).map(move |_| (index, *address))
            })
            .map(move |(index, address)| async move {
                let Some(target) = address else {
                    return (index, ProbeOutcome::failure(ProbeStatus::Unknown));
                };
                let outcome =
                    match tokio::time::timeout_at(deadline, echo.echo(target, timeout, payload))
                        .await
                    {
                        Ok(outcome) => outcome,
                        Err(_) => {
                            debug!("echo to {} still pending at round deadline", target);
                            ProbeOutcome::failure(ProbeStatus::Unknown)
                        }
                    };
                (index, outcome)
            })
            .collect();

        let per_host = config.echo_requests as usize;
        let mut outcomes = vec![Vec::with_capacity(per_host); hosts.len()];
        while let Some((index, outcome)) = pending.next().await {
            outcomes[index].push(outcome);
        }

        hosts
            .iter()
            .zip(addresses)
            .zip(outcomes)
            .map(|((host, address), outcomes)| HostProbes {
                host: host.clone(),
                address,
                outcomes,
            })
            .collect()
    }
}
