//! Host environment detection
//!
//! Collects the facts the pre-flight checks need: kernel release, logical
//! CPU count, total memory, hostname and the address the hostname resolves
//! to, plus whether the session runs inside screen or tmux.
//!
//! # Integration
//!
//! Call `HostProfile::detect()` once at startup. The profile is never
//! mutated afterwards; tests build one directly.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, ToSocketAddrs, UdpSocket};

use sysinfo::System;

/// Bytes per "GB" as the memory threshold has always been computed
const BYTES_PER_GB: f64 = 1_024_000_000.0;

/// Detected properties of the machine being installed on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostProfile {
    /// Kernel release, e.g. `4.18.0-513.el8.x86_64`
    pub release: String,
    /// Logical CPU count
    pub cpu_cores: usize,
    /// Total memory rounded to whole GB
    pub memory_gb: u64,
    pub hostname: String,
    /// Address the hostname resolves to locally
    pub ip_address: IpAddr,
    /// Session is attached to screen or tmux
    pub multiplexed: bool,
}

impl HostProfile {
    /// Detect the host environment. Never panics; missing facts fall back
    /// to values that make the corresponding check fail visibly.
    pub fn detect() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu();

        let release = System::kernel_version().unwrap_or_default();
        let cpu_cores = sys.cpus().len().max(1);
        let memory_gb = memory_gb_from_bytes(sys.total_memory());
        let hostname = System::host_name().unwrap_or_else(|| "localhost".to_string());
        let ip_address = resolve_host_address(&hostname);
        let multiplexed = session_is_multiplexed(
            std::env::var("TERM").ok().as_deref(),
            std::env::var("TMUX").ok().as_deref(),
            std::env::var("STY").ok().as_deref(),
        );

        let profile = Self {
            release,
            cpu_cores,
            memory_gb,
            hostname,
            ip_address,
            multiplexed,
        };
        log::info!("Host detection: {}", profile);
        profile
    }

    /// Hosts-file line mapping the detected address to the hostname
    pub fn hosts_entry(&self) -> String {
        format!("{}    {}", self.ip_address, self.hostname)
    }
}

impl fmt::Display for HostProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "release={}, cpus={}, memory={}GB, host={} ({}), multiplexed={}",
            self.release,
            self.cpu_cores,
            self.memory_gb,
            self.hostname,
            self.ip_address,
            self.multiplexed
        )
    }
}

/// Round total memory to whole GB.
pub fn memory_gb_from_bytes(bytes: u64) -> u64 {
    (bytes as f64 / BYTES_PER_GB).round() as u64
}

/// True when the session is attached to screen or tmux.
pub fn session_is_multiplexed(term: Option<&str>, tmux: Option<&str>, sty: Option<&str>) -> bool {
    let set = |v: Option<&str>| v.is_some_and(|s| !s.is_empty());
    if set(tmux) || set(sty) {
        return true;
    }
    term.is_some_and(|t| t.starts_with("screen") || t.starts_with("tmux"))
}

/// Resolve the hostname through the local resolver (hosts file included),
/// preferring IPv4. Falls back to the address of the outbound interface.
pub fn resolve_host_address(hostname: &str) -> IpAddr {
    match (hostname, 0u16).to_socket_addrs() {
        Ok(addrs) => {
            let addrs: Vec<SocketAddr> = addrs.collect();
            if let Some(v4) = addrs.iter().find(|a| a.is_ipv4()) {
                return v4.ip();
            }
            if let Some(any) = addrs.first() {
                return any.ip();
            }
            log::warn!("{} resolved to no addresses", hostname);
        }
        Err(e) => log::warn!("Could not resolve {} locally: {}", hostname, e),
    }
    outbound_address().unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

/// Address the kernel would use to reach the outside; no packet is sent.
fn outbound_address() -> Option<IpAddr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    socket.connect((Ipv4Addr::new(192, 0, 2, 1), 9)).ok()?;
    socket.local_addr().ok().map(|a| a.ip())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_rounding() {
        assert_eq!(memory_gb_from_bytes(0), 0);
        assert_eq!(memory_gb_from_bytes(8_192_000_000), 8);
        // 16 GiB rounds to 17 with this divisor
        assert_eq!(memory_gb_from_bytes(17_179_869_184), 17);
        assert_eq!(memory_gb_from_bytes(5_500_000_000), 5);
    }

    #[test]
    fn test_multiplexer_detection() {
        assert!(session_is_multiplexed(Some("screen"), None, None));
        assert!(session_is_multiplexed(Some("screen-256color"), None, None));
        assert!(session_is_multiplexed(Some("tmux-256color"), None, None));
        assert!(session_is_multiplexed(Some("xterm"), Some("/tmp/tmux-0/default,1,0"), None));
        assert!(session_is_multiplexed(Some("xterm"), None, Some("1234.pts-0.host")));
        assert!(!session_is_multiplexed(Some("xterm-256color"), None, None));
        assert!(!session_is_multiplexed(None, Some(""), None));
    }

    #[test]
    fn test_hosts_entry() {
        let profile = HostProfile {
            release: "4.18.0-513.el8.x86_64".into(),
            cpu_cores: 4,
            memory_gb: 20,
            hostname: "foreman.example.com".into(),
            ip_address: "192.0.2.10".parse().unwrap(),
            multiplexed: true,
        };
        assert_eq!(profile.hosts_entry(), "192.0.2.10    foreman.example.com");
    }

    #[test]
    fn test_resolve_localhost_is_loopback() {
        assert!(resolve_host_address("localhost").is_loopback());
    }

    #[test]
    fn test_detect_runs() {
        let profile = HostProfile::detect();
        assert!(profile.cpu_cores >= 1);
    }
}
