use std::{collections::HashMap, future::Future, net::Ipv4Addr};

use log::warn;

/// Name resolution used before a host is probed for the first time.
pub trait Resolve {
    /// Returns the first IPv4 address of `host`, or `None` if it does not
    /// resolve.
    fn resolve(&self, host: &str) -> impl Future<Output = Option<Ipv4Addr>>;
}

/// Resolver backed by the system's `getaddrinfo` through tokio.
#[derive(Copy, Clone, Debug, Default)]
pub struct DnsResolver;

impl Resolve for DnsResolver {
    async fn resolve(&self, host: &str) -> Option<Ipv4Addr> {
        if let Ok(ip) = host.parse::<Ipv4Addr>() {
            return Some(ip);
        }
        let addrs = tokio::net::lookup_host((host, 0)).await.ok()?;
        addrs
            .filter_map(|addr| match addr.ip() {
                std::net::IpAddr::V4(ip) => Some(ip),
                std::net::IpAddr::V6(_) => None,
            })
            .next()
    }
}

/// Per-invocation record of which host names resolved, and to what.
///
/// Entries never expire: a name is looked up at most once for the lifetime of
/// the cache, and an unresolvable name is reported at most once.
#[derive(Debug, Default)]
pub(crate) struct ResolutionCache {
    entries: HashMap<String, Option<Ipv4Addr>>,
}

impl ResolutionCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn lookup<R: Resolve>(&mut self, resolver: &R, host: &str) -> Option<Ipv4Addr> {
        if let Some(cached) = self.entries.get(host) {
            return *cached;
        }
        let resolved = resolver.resolve(host).await;
        if resolved.is_none() {
            warn!("unable to resolve host name '{}', probes will fail", host);
        }
        self.entries.insert(host.to_string(), resolved);
        resolved
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::{DnsResolver, Resolve, ResolutionCache};
    use crate::testing::StaticResolver;

    #[tokio::test]
    async fn test_lookup_is_cached() {
        let resolver = StaticResolver::new().with_host("gateway", Ipv4Addr::new(10, 0, 0, 1));
        let mut cache = ResolutionCache::new();
        for _ in 0..3 {
            assert_eq!(
                cache.lookup(&resolver, "gateway").await,
                Some(Ipv4Addr::new(10, 0, 0, 1))
            );
            assert_eq!(cache.lookup(&resolver, "missing").await, None);
        }
        assert_eq!(resolver.lookups("gateway"), 1);
        assert_eq!(resolver.lookups("missing"), 1);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_dns_resolver_accepts_literals() {
        assert_eq!(
            DnsResolver.resolve("192.0.2.7").await,
            Some(Ipv4Addr::new(192, 0, 2, 7))
        );
    }
}
