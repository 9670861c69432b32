//! Scripted transport doubles for unit tests.

use std::{
    collections::HashMap,
    net::Ipv4Addr,
    sync::Mutex,
    time::Duration,
};

use crate::caching::Resolve;
use crate::probe::{Echo, ProbeOutcome, ProbeStatus};

#[derive(Clone, Debug)]
pub(crate) enum Script {
    /// Replies after the given delay, cycling through the list per call.
    Replies(Vec<Duration>),
    /// Fails with the given statuses, cycling through the list per call.
    Failures(Vec<ProbeStatus>),
    /// Never answers.
    Silent,
}

#[derive(Debug, Default)]
pub(crate) struct ScriptedEcho {
    scripts: HashMap<Ipv4Addr, Script>,
    calls: Mutex<Vec<Ipv4Addr>>,
}

impl ScriptedEcho {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_script(mut self, target: Ipv4Addr, script: Script) -> Self {
        self.scripts.insert(target, script);
        self
    }

    pub(crate) fn calls_to(&self, target: Ipv4Addr) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|ip| **ip == target)
            .count()
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Echo for ScriptedEcho {
    async fn echo(&self, target: Ipv4Addr, timeout: Duration, _payload: &[u8]) -> ProbeOutcome {
        let nth = {
            let mut calls = self.calls.lock().unwrap();
            let nth = calls.iter().filter(|ip| **ip == target).count();
            calls.push(target);
            nth
        };
        match self.scripts.get(&target) {
            Some(Script::Replies(delays)) => {
                let delay = delays[nth % delays.len()];
                if delay >= timeout {
                    tokio::time::sleep(timeout).await;
                    return ProbeOutcome::failure(ProbeStatus::TimedOut);
                }
                tokio::time::sleep(delay).await;
                ProbeOutcome::success(delay)
            }
            Some(Script::Failures(statuses)) => ProbeOutcome::failure(statuses[nth % statuses.len()]),
            Some(Script::Silent) => std::future::pending().await,
            None => ProbeOutcome::failure(ProbeStatus::DestinationUnreachable),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct StaticResolver {
    hosts: HashMap<String, Ipv4Addr>,
    lookups: Mutex<HashMap<String, usize>>,
}

impl StaticResolver {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_host(mut self, name: &str, ip: Ipv4Addr) -> Self {
        self.hosts.insert(name.to_string(), ip);
        self
    }

    pub(crate) fn lookups(&self, name: &str) -> usize {
        self.lookups.lock().unwrap().get(name).copied().unwrap_or(0)
    }
}

impl Resolve for StaticResolver {
    async fn resolve(&self, host: &str) -> Option<Ipv4Addr> {
        *self.lookups.lock().unwrap().entry(host.to_string()).or_default() += 1;
        self.hosts
            .get(host)
            .copied()
            .or_else(|| host.parse().ok())
    }
}
