//! Forward (A) and reverse (PTR) record checks.
//!
//! `foreman-installer` refuses to run when the host's FQDN does not resolve
//! in both directions, so these lookups query DNS through the system
//! resolver configuration rather than trusting `/etc/hosts` alone.

use std::collections::HashMap;
use std::fmt;
use std::net::IpAddr;

use trust_dns_resolver::Resolver;

/// Why a lookup produced no usable record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupFailure(pub String);

impl fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Record lookups used by the pre-flight DNS checks
pub trait DnsLookup {
    /// A records for `hostname`
    fn forward(&self, hostname: &str) -> Result<Vec<IpAddr>, LookupFailure>;
    /// PTR names for `address`
    fn reverse(&self, address: IpAddr) -> Result<Vec<String>, LookupFailure>;
}

/// Resolver built from `/etc/resolv.conf`
pub struct SystemDns {
    resolver: Option<Resolver>,
    init_error: Option<String>,
}

impl SystemDns {
    pub fn new() -> Self {
        match Resolver::from_system_conf() {
            Ok(resolver) => Self {
                resolver: Some(resolver),
                init_error: None,
            },
            Err(e) => {
                log::warn!("Failed to load system resolver configuration: {}", e);
                Self {
                    resolver: None,
                    init_error: Some(e.to_string()),
                }
            }
        }
    }

    fn resolver(&self) -> Result<&Resolver, LookupFailure> {
        self.resolver.as_ref().ok_or_else(|| {
            LookupFailure(format!(
                "resolver unavailable: {}",
                self.init_error.as_deref().unwrap_or("unknown error")
            ))
        })
    }
}

impl Default for SystemDns {
    fn default() -> Self {
        Self::new()
    }
}

impl DnsLookup for SystemDns {
    fn forward(&self, hostname: &str) -> Result<Vec<IpAddr>, LookupFailure> {
        let lookup = self
            .resolver()?
            .ipv4_lookup(hostname)
            .map_err(|e| LookupFailure(e.to_string()))?;
        let addrs: Vec<IpAddr> = lookup.iter().map(|a| IpAddr::V4(a.0)).collect();
        log::debug!("A {} -> {:?}", hostname, addrs);
        if addrs.is_empty() {
            return Err(LookupFailure(format!("no A record for {}", hostname)));
        }
        Ok(addrs)
    }

    fn reverse(&self, address: IpAddr) -> Result<Vec<String>, LookupFailure> {
        let lookup = self
            .resolver()?
            .reverse_lookup(address)
            .map_err(|e| LookupFailure(e.to_string()))?;
        let names: Vec<String> = lookup.iter().map(|name| name.to_string()).collect();
        log::debug!("PTR {} -> {:?}", address, names);
        if names.is_empty() {
            return Err(LookupFailure(format!("no PTR record for {}", address)));
        }
        Ok(names)
    }
}

/// Fixed answers, for tests and for checking a planned hosts-file layout
#[derive(Debug, Clone, Default)]
pub struct StaticDns {
    forward: HashMap<String, Vec<IpAddr>>,
    reverse: HashMap<IpAddr, Vec<String>>,
}

impl StaticDns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register both the A and the PTR record for a host
    pub fn with_host(mut self, hostname: &str, address: IpAddr) -> Self {
        self = self.with_forward(hostname, address);
        self.with_reverse(address, hostname)
    }

    pub fn with_forward(mut self, hostname: &str, address: IpAddr) -> Self {
        self.forward
            .entry(hostname.to_string())
            .or_default()
            .push(address);
        self
    }

    pub fn with_reverse(mut self, address: IpAddr, hostname: &str) -> Self {
        self.reverse
            .entry(address)
            .or_default()
            .push(format!("{}.", hostname.trim_end_matches('.')));
        self
    }
}

impl DnsLookup for StaticDns {
    fn forward(&self, hostname: &str) -> Result<Vec<IpAddr>, LookupFailure> {
        self.forward
            .get(hostname)
            .cloned()
            .ok_or_else(|| LookupFailure(format!("NXDOMAIN: {}", hostname)))
    }

    fn reverse(&self, address: IpAddr) -> Result<Vec<String>, LookupFailure> {
        self.reverse
            .get(&address)
            .cloned()
            .ok_or_else(|| LookupFailure(format!("NXDOMAIN: {}", address)))
    }
}
