use std::{
    net::Ipv4Addr,
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_ping::{
    sweep_with, AddressRange, DnsResolver, Echo, IterationConfigBuilder, IterationLoop,
    ProbeOutcome, ProbeScheduler, ProbeStatus, SweepOptions,
};
use futures::StreamExt;

/// Answers from even last octets, reports odd ones as unreachable.
#[derive(Debug, Default)]
struct EvenHostsEcho {
    sent: AtomicUsize,
}

impl Echo for EvenHostsEcho {
    async fn echo(&self, target: Ipv4Addr, _timeout: Duration, payload: &[u8]) -> ProbeOutcome {
        self.sent.fetch_add(1, Ordering::SeqCst);
        assert_eq!(payload.len(), 56);
        if target.octets()[3] % 2 == 0 {
            tokio::time::sleep(Duration::from_millis(u64::from(target.octets()[3]))).await;
            ProbeOutcome::success(Duration::from_millis(u64::from(target.octets()[3])))
        } else {
            ProbeOutcome::failure(ProbeStatus::DestinationUnreachable)
        }
    }
}

#[tokio::test]
async fn test_sweep_through_public_api() {
    let range = AddressRange::parse_subnet("10.20.30.0", Some("255.255.255.248"), false).unwrap();
    let config = IterationConfigBuilder::new()
        .with_echo_requests(3)
        .with_timeout(Duration::from_millis(500))
        .with_payload_size(56)
        .build()
        .unwrap();
    let scheduler = ProbeScheduler::with_transport(EvenHostsEcho::default(), DnsResolver);
    let options = SweepOptions {
        online_only: true,
        sort_by_address: true,
    };

    let reports = sweep_with(scheduler, &range, options, &config).await.unwrap();

    let hosts: Vec<_> = reports.iter().map(|report| report.host.as_str()).collect();
    assert_eq!(hosts, ["10.20.30.2", "10.20.30.4", "10.20.30.6"]);
    for report in &reports {
        assert_eq!(report.status, ProbeStatus::Success);
        assert_eq!((report.sent, report.received, report.lost), (3, 3, 0));
        assert_eq!(report.percent_lost, 0);
        assert_eq!(report.address.map(|ip| ip.to_string()).as_deref(), Some(report.host.as_str()));
        assert_eq!(report.raw_values.len(), 3);
        assert_eq!(report.min, report.max);
    }
}

#[tokio::test]
async fn test_probe_rounds_through_public_api() {
    let config = IterationConfigBuilder::new()
        .with_echo_requests(2)
        .with_timeout(Duration::from_millis(500))
        .with_interval(Duration::from_millis(10))
        .with_count(3)
        .with_payload_size(56)
        .build()
        .unwrap();
    let scheduler = ProbeScheduler::with_transport(EvenHostsEcho::default(), DnsResolver);
    let iteration = IterationLoop::new(scheduler, ["10.0.0.2", "10.0.0.3"], config).unwrap();

    let rounds: Vec<_> = iteration.into_rounds().collect().await;

    assert_eq!(rounds.len(), 3);
    for round in &rounds {
        let up = &round.reports[0];
        let down = &round.reports[1];
        assert!(up.online);
        assert_eq!(up.p50, Some(Duration::from_millis(2)));
        assert!(!down.online);
        assert_eq!(down.status, ProbeStatus::DestinationUnreachable);
        assert_eq!(down.percent_lost, 100);
        assert_eq!(down.average, None);
    }
}
