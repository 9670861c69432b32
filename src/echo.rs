use std::{
    future::Future,
    net::{IpAddr, Ipv4Addr},
    sync::atomic::{AtomicU16, Ordering},
    time::Duration,
};

use log::debug;
use surge_ping::{Client, Config, PingIdentifier, PingSequence, SurgeError};

use crate::error::{Error, Result};
use crate::probe::{Echo, ProbeOutcome, ProbeStatus};

/// ICMPv4 echo transport backed by a shared `surge-ping` socket.
///
/// Every exchange gets its own identifier and sequence number. On Linux
/// datagram ICMP sockets the kernel owns the identifier, so replies are told
/// apart by host and sequence alone; concurrent probes towards one host must
/// therefore never share a sequence number.
pub struct IcmpEcho {
    client: Client,
    exchanges: ExchangeIds,
}

/// Hands out a fresh identifier and sequence number per exchange.
#[derive(Debug)]
struct ExchangeIds {
    next_identifier: AtomicU16,
    next_sequence: AtomicU16,
}

impl ExchangeIds {
    fn new(seed: u16) -> Self {
        Self {
            next_identifier: AtomicU16::new(seed),
            next_sequence: AtomicU16::new(0),
        }
    }

    fn next(&self) -> (PingIdentifier, PingSequence) {
        (
            PingIdentifier(self.next_identifier.fetch_add(1, Ordering::Relaxed)),
            PingSequence(self.next_sequence.fetch_add(1, Ordering::Relaxed)),
        )
    }
}

impl IcmpEcho {
    /// Opens the ICMP socket. Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// Returns [`Error::Socket`] if the socket cannot be created, typically
    /// because the process lacks the privileges for raw or datagram ICMP.
    pub fn new() -> Result<Self> {
        let client = Client::new(&Config::default()).map_err(Error::Socket)?;
        Ok(Self {
            client,
            exchanges: ExchangeIds::new(std::process::id() as u16),
        })
    }

    async fn exchange(&self, target: Ipv4Addr, timeout: Duration, payload: &[u8]) -> ProbeOutcome {
        let (identifier, sequence) = self.exchanges.next();
        // The pinger unregisters itself from the socket when dropped.
        let mut pinger = self.client.pinger(IpAddr::V4(target), identifier).await;
        pinger.timeout(timeout);

        match tokio::time::timeout(timeout, pinger.ping(sequence, payload)).await {
            Ok(Ok((_, rtt))) => ProbeOutcome::success(rtt),
            Ok(Err(err)) => {
                debug!("echo to {} failed: {}", target, err);
                ProbeOutcome::failure(status_of(&err))
            }
            Err(_) => ProbeOutcome::failure(ProbeStatus::TimedOut),
        }
    }
}

impl std::fmt::Debug for IcmpEcho {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IcmpEcho").finish_non_exhaustive()
    }
}

impl Echo for IcmpEcho {
    fn echo(
        &self,
        target: Ipv4Addr,
        timeout: Duration,
        payload: &[u8],
    ) -> impl Future<Output = ProbeOutcome> {
        self.exchange(target, timeout, payload)
    }
}

fn status_of(err: &SurgeError) -> ProbeStatus {
    match err {
        SurgeError::Timeout { .. } => ProbeStatus::TimedOut,
        SurgeError::NetworkError => ProbeStatus::DestinationUnreachable,
        _ => ProbeStatus::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, io, net::Ipv4Addr};

    use surge_ping::{PingIdentifier, PingSequence, SurgeError};

    use super::{status_of, ExchangeIds};
    use crate::probe::ProbeStatus;

    #[test]
    fn test_exchanges_never_share_a_sequence() {
        let exchanges = ExchangeIds::new(u16::MAX);
        let mut sequences = HashSet::new();
        let mut identifiers = HashSet::new();
        for _ in 0..1000 {
            let (PingIdentifier(identifier), PingSequence(sequence)) = exchanges.next();
            assert!(sequences.insert(sequence));
            assert!(identifiers.insert(identifier));
        }
        assert!(sequences.contains(&0));
        assert!(identifiers.contains(&u16::MAX));
        assert!(identifiers.contains(&0));
    }

    #[test]
    fn test_status_of_surge_errors() {
        assert_eq!(
            status_of(&SurgeError::Timeout {
                seq: PingSequence(3)
            }),
            ProbeStatus::TimedOut
        );
        assert_eq!(
            status_of(&SurgeError::NetworkError),
            ProbeStatus::DestinationUnreachable
        );
        assert_eq!(
            status_of(&SurgeError::IdenticalRequests {
                host: Ipv4Addr::LOCALHOST.into(),
                ident: None,
                seq: PingSequence(0),
            }),
            ProbeStatus::Unknown
        );
        assert_eq!(
            status_of(&SurgeError::IOError(io::Error::new(
                io::ErrorKind::Other,
                "socket closed"
            ))),
            ProbeStatus::Unknown
        );
    }
}
